//! Conversion between literal geometries and `geo` types.
//!
//! Only XY coordinates convert. An empty Point maps to `POINT EMPTY`, a point
//! whose coordinates are both NaN.

use geo::{
    Coord, Geometry as GeoGeometry, GeometryCollection, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use geozero::ToWkt;

use crate::coordinates::Coordinates;
use crate::error::{GeoCallError, Result};
use crate::geometry::{Geometry, GeometryKind, LiteralGeometry};

fn list(c: &Coordinates) -> Result<&[Coordinates]> {
    c.as_list()
        .ok_or_else(|| GeoCallError::invalid("expected a coordinate list"))
}

fn coord(c: &Coordinates) -> Result<Coord<f64>> {
    match list(c)? {
        [x, y] => match (x.as_number(), y.as_number()) {
            (Some(x), Some(y)) => Ok(Coord { x, y }),
            _ => Err(GeoCallError::invalid("non-numeric coordinate")),
        },
        other => Err(GeoCallError::invalid(format!(
            "only XY coordinates are supported, got {} values",
            other.len()
        ))),
    }
}

fn line(c: &Coordinates) -> Result<LineString<f64>> {
    list(c)?
        .iter()
        .map(coord)
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn polygon(c: &Coordinates) -> Result<Polygon<f64>> {
    let mut rings = list(c)?.iter().map(line);
    let exterior = rings
        .next()
        .transpose()?
        .unwrap_or_else(|| LineString::new(vec![]));
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn each<T>(c: &Coordinates, f: impl Fn(&Coordinates) -> Result<T>) -> Result<Vec<T>> {
    list(c)?.iter().map(f).collect()
}

impl TryFrom<&LiteralGeometry> for GeoGeometry<f64> {
    type Error = GeoCallError;

    fn try_from(g: &LiteralGeometry) -> Result<Self> {
        if let Some(members) = g.geometries() {
            let members = members
                .iter()
                .map(GeoGeometry::try_from)
                .collect::<Result<Vec<_>>>()?;
            return Ok(GeoGeometry::GeometryCollection(GeometryCollection(members)));
        }
        let c = g
            .coordinates()
            .ok_or_else(|| GeoCallError::invalid("geometry has no coordinates"))?;
        let geom = match g.kind() {
            GeometryKind::Point if c.is_empty() => {
                GeoGeometry::Point(Point::new(f64::NAN, f64::NAN))
            }
            GeometryKind::Point => GeoGeometry::Point(Point::from(coord(c)?)),
            GeometryKind::MultiPoint => {
                GeoGeometry::MultiPoint(MultiPoint::new(each(c, |p| coord(p).map(Point::from))?))
            }
            GeometryKind::LineString | GeometryKind::LinearRing => {
                GeoGeometry::LineString(line(c)?)
            }
            GeometryKind::MultiLineString => {
                GeoGeometry::MultiLineString(MultiLineString::new(each(c, line)?))
            }
            GeometryKind::Polygon => GeoGeometry::Polygon(polygon(c)?),
            GeometryKind::MultiPolygon => {
                GeoGeometry::MultiPolygon(MultiPolygon::new(each(c, polygon)?))
            }
            GeometryKind::GeometryCollection => {
                return Err(GeoCallError::invalid("collection without members"));
            }
        };
        Ok(geom)
    }
}

fn coord_list(c: Coord<f64>) -> Coordinates {
    Coordinates::from(vec![c.x, c.y])
}

fn line_list(ls: &LineString<f64>) -> Coordinates {
    Coordinates::List(ls.coords().copied().map(coord_list).collect())
}

fn polygon_list(p: &Polygon<f64>) -> Coordinates {
    let rings = std::iter::once(p.exterior())
        .chain(p.interiors())
        .filter(|ring| !ring.0.is_empty())
        .map(line_list)
        .collect();
    Coordinates::List(rings)
}

impl LiteralGeometry {
    /// Build a literal from a `geo` geometry.
    ///
    /// `Line` becomes a LineString; `Rect` and `Triangle` become Polygons.
    /// Empty geometries other than Points and Multi kinds are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use geo::{Geometry, Rect, coord};
    /// use geocall_core::geometry::{GeometryKind, LiteralGeometry};
    ///
    /// let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 1.0 });
    /// let g = LiteralGeometry::from_geo(&Geometry::Rect(rect)).unwrap();
    /// assert_eq!(g.kind(), GeometryKind::Polygon);
    /// ```
    pub fn from_geo(geom: &GeoGeometry<f64>) -> Result<Self> {
        let (kind, coords) = match geom {
            GeoGeometry::Point(p) if p.x().is_nan() && p.y().is_nan() => {
                (GeometryKind::Point, Coordinates::empty())
            }
            GeoGeometry::Point(p) => (GeometryKind::Point, coord_list(p.0)),
            GeoGeometry::Line(l) => (
                GeometryKind::LineString,
                Coordinates::List(vec![coord_list(l.start), coord_list(l.end)]),
            ),
            GeoGeometry::LineString(ls) => (GeometryKind::LineString, line_list(ls)),
            GeoGeometry::Polygon(p) => (GeometryKind::Polygon, polygon_list(p)),
            GeoGeometry::MultiPoint(mp) => (
                GeometryKind::MultiPoint,
                Coordinates::List(mp.0.iter().map(|p| coord_list(p.0)).collect()),
            ),
            GeoGeometry::MultiLineString(mls) => (
                GeometryKind::MultiLineString,
                Coordinates::List(mls.0.iter().map(line_list).collect()),
            ),
            GeoGeometry::MultiPolygon(mp) => (
                GeometryKind::MultiPolygon,
                Coordinates::List(mp.0.iter().map(polygon_list).collect()),
            ),
            GeoGeometry::Rect(r) => (GeometryKind::Polygon, polygon_list(&r.to_polygon())),
            GeoGeometry::Triangle(t) => (GeometryKind::Polygon, polygon_list(&t.to_polygon())),
            GeoGeometry::GeometryCollection(gc) => {
                let members = gc.0.iter().map(Self::from_geo).collect::<Result<Vec<_>>>()?;
                return Ok(Self::collection(members));
            }
        };
        Self::new(kind, coords)
    }

    pub fn to_geo(&self) -> Result<GeoGeometry<f64>> {
        GeoGeometry::try_from(self)
    }

    /// WKT text of this geometry.
    pub fn to_wkt(&self) -> Result<String> {
        Ok(self.to_geo()?.to_wkt()?)
    }
}

impl Geometry {
    pub fn to_geo(&self) -> Result<GeoGeometry<f64>> {
        self.literal("Can't convert a computed geometry to a geo geometry.")?
            .to_geo()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geo::{coord, Area, Line, Triangle};

    use super::*;
    use crate::value::DeferredCall;

    fn literal(kind: GeometryKind, c: impl Into<Coordinates>) -> LiteralGeometry {
        LiteralGeometry::new(kind, c.into()).unwrap()
    }

    fn segment() -> LiteralGeometry {
        let points = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        literal(GeometryKind::LineString, points)
    }

    fn square() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![2.0, 0.0],
            vec![2.0, 2.0],
            vec![0.0, 2.0],
            vec![0.0, 0.0],
        ]
    }

    #[test]
    fn point_to_geo() {
        let g = literal(GeometryKind::Point, vec![1.5, 2.5]);
        let g = g.to_geo().unwrap();
        assert_eq!(g, GeoGeometry::Point(Point::new(1.5, 2.5)));
    }

    #[test]
    fn empty_point_is_nan() {
        let g = literal(GeometryKind::Point, Coordinates::empty());
        let g = g.to_geo().unwrap();
        let GeoGeometry::Point(p) = g else {
            panic!("expected point");
        };
        assert!(p.x().is_nan() && p.y().is_nan());
        let back = LiteralGeometry::from_geo(&GeoGeometry::Point(p)).unwrap();
        assert!(back.coordinates().unwrap().is_empty());
    }

    #[test]
    fn xyz_point_is_rejected() {
        let g = literal(GeometryKind::Point, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(g.to_geo().is_err());
    }

    #[test]
    fn polygon_with_hole_area() {
        let hole = vec![
            vec![0.5, 0.5],
            vec![1.0, 0.5],
            vec![1.0, 1.0],
            vec![0.5, 1.0],
            vec![0.5, 0.5],
        ];
        let g = literal(GeometryKind::Polygon, vec![square(), hole]);
        let GeoGeometry::Polygon(p) = g.to_geo().unwrap() else {
            panic!("expected polygon");
        };
        assert_eq!(p.interiors().len(), 1);
        assert!((p.unsigned_area() - 3.75).abs() < 1e-10);
    }

    #[test]
    fn empty_multi_polygon_to_geo() {
        let g = literal(GeometryKind::MultiPolygon, Coordinates::empty());
        assert_eq!(
            g.to_geo().unwrap(),
            GeoGeometry::MultiPolygon(MultiPolygon::new(vec![]))
        );
    }

    #[test]
    fn linear_ring_becomes_line_string() {
        let g = literal(GeometryKind::LinearRing, square());
        let g = g.to_geo().unwrap();
        assert!(matches!(g, GeoGeometry::LineString(ls) if ls.0.len() == 5));
    }

    #[test]
    fn geo_round_trip_polygon() {
        let g = literal(GeometryKind::Polygon, vec![square()]);
        let back = LiteralGeometry::from_geo(&g.to_geo().unwrap()).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn line_and_triangle_from_geo() {
        let line = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 });
        let g = LiteralGeometry::from_geo(&GeoGeometry::Line(line)).unwrap();
        assert_eq!(g.kind(), GeometryKind::LineString);

        let tri = Triangle::new(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 0.0, y: 1.0 },
        );
        let g = LiteralGeometry::from_geo(&GeoGeometry::Triangle(tri)).unwrap();
        assert_eq!(g.kind(), GeometryKind::Polygon);
    }

    #[test]
    fn empty_line_string_from_geo_fails() {
        let empty = GeoGeometry::LineString(LineString::new(vec![]));
        assert!(LiteralGeometry::from_geo(&empty).is_err());
    }

    #[test]
    fn collection_to_geo() {
        let g = LiteralGeometry::collection(vec![
            literal(GeometryKind::Point, vec![0.0, 0.0]),
            segment(),
        ]);
        let GeoGeometry::GeometryCollection(gc) = g.to_geo().unwrap() else {
            panic!("expected collection");
        };
        assert_eq!(gc.0.len(), 2);
    }

    #[test]
    fn wkt_output() {
        let wkt = segment().to_wkt().unwrap();
        assert!(wkt.starts_with("LINESTRING"), "got: {wkt}");
    }

    #[test]
    fn deferred_has_no_geo() {
        let call = DeferredCall::new("GeometryConstructors.Point", BTreeMap::new());
        assert!(Geometry::Deferred(call).to_geo().is_err());
    }
}
