//! Geometry constructor functions.
//!
//! Point, MultiPoint, Rectangle, LineString, LinearRing, MultiLineString,
//! Polygon, MultiPolygon, GeometryCollection

use crate::args::{collect_args, CallArgs};
use crate::coordinates::Coordinates;
use crate::error::{GeoCallError, Result};
use crate::function_catalog::initialize;
use crate::geometry::{Geometry, GeometryKind, LiteralGeometry};
use crate::resolver::{construct, resolve_args, Resolution};

const POINT_KEYWORDS: &[&str] = &["lon", "lat"];
const RECTANGLE_KEYWORDS: &[&str] = &["xlo", "ylo", "xhi", "yhi"];

fn build(kind: GeometryKind, call: CallArgs) -> Result<Geometry> {
    initialize();
    let args = collect_args(call, &[])?;
    construct(kind.name(), kind.depth().unwrap_or(0), args)
}

/// Point: from `[x, y]`, or from two numbers.
///
/// Legacy keywords `lon` and `lat` fill the first two slots.
///
/// # Example
///
/// ```
/// use geocall_core::args::CallArgs;
/// use geocall_core::functions::constructors::point;
///
/// let a = point(CallArgs::new().arg(vec![1.0, 2.0])).unwrap();
/// let b = point(CallArgs::new().arg(1.0).arg(2.0)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn point(call: CallArgs) -> Result<Geometry> {
    initialize();
    let args = collect_args(call, POINT_KEYWORDS)?;
    let geom = construct(GeometryKind::Point.name(), 1, args)?;
    if let Geometry::Literal(g) = &geom {
        let values = g.coordinates().and_then(Coordinates::as_list);
        if values.map(<[_]>::len) != Some(2) {
            let msg = "The Geometry.Point constructor requires 2 coordinates.";
            return Err(GeoCallError::invalid(msg));
        }
    }
    Ok(geom)
}

/// MultiPoint: from a list of points, point geometries, or flat `x, y` numbers.
pub fn multi_point(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::MultiPoint, call)
}

/// Rectangle: a Polygon from two corner points or `xMin, yMin, xMax, yMax`.
///
/// Legacy keywords `xlo`, `ylo`, `xhi` and `yhi` fill the first four slots.
///
/// # Example
///
/// ```
/// use geocall_core::args::CallArgs;
/// use geocall_core::coordinates::Coordinates;
/// use geocall_core::functions::constructors::rectangle;
/// use geocall_core::geometry::GeometryKind;
///
/// let rect = rectangle(CallArgs::new().arg(vec![0.0, 0.0, 10.0, 10.0])).unwrap();
/// let poly = rect.as_literal().unwrap();
/// assert_eq!(poly.kind(), GeometryKind::Polygon);
/// assert_eq!(
///     poly.coordinates().unwrap(),
///     &Coordinates::from(vec![vec![
///         vec![0.0, 10.0],
///         vec![0.0, 0.0],
///         vec![10.0, 0.0],
///         vec![10.0, 10.0],
///     ]])
/// );
/// ```
pub fn rectangle(call: CallArgs) -> Result<Geometry> {
    initialize();
    let args = collect_args(call, RECTANGLE_KEYWORDS)?;
    match resolve_args("Rectangle", 2, args)? {
        Resolution::Deferred(call) => Ok(Geometry::Deferred(call)),
        Resolution::Literal(coords) => {
            let [(x1, y1), (x2, y2)] = corners(&coords).ok_or_else(|| {
                GeoCallError::invalid(
                    "The Geometry.Rectangle constructor requires 2 points or 4 coordinates.",
                )
            })?;
            let ring = vec![vec![x1, y2], vec![x1, y1], vec![x2, y1], vec![x2, y2]];
            let poly = LiteralGeometry::new(GeometryKind::Polygon, Coordinates::from(vec![ring]))?;
            Ok(Geometry::Literal(poly))
        }
    }
}

fn corners(coords: &Coordinates) -> Option<[(f64, f64); 2]> {
    let xy = |c: &Coordinates| -> Option<(f64, f64)> {
        let pt = c.as_list()?;
        Some((pt.first()?.as_number()?, pt.get(1)?.as_number()?))
    };
    match coords.as_list()? {
        [lo, hi] => Some([xy(lo)?, xy(hi)?]),
        _ => None,
    }
}

/// LineString: at least two points, as coordinates, point geometries or numbers.
///
/// # Example
///
/// ```
/// use geocall_core::args::CallArgs;
/// use geocall_core::coordinates::Coordinates;
/// use geocall_core::functions::constructors::line_string;
///
/// let line = line_string(CallArgs::from_values([0.0, 0.0, 1.0, 1.0, 2.0, 2.0])).unwrap();
/// assert_eq!(
///     line.as_literal().unwrap().coordinates().unwrap(),
///     &Coordinates::from(vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]])
/// );
/// ```
pub fn line_string(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::LineString, call)
}

/// LinearRing: the points of a closed ring.
pub fn linear_ring(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::LinearRing, call)
}

/// MultiLineString: a list of lines, or the points of a single line.
pub fn multi_line_string(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::MultiLineString, call)
}

/// Polygon: a list of rings, ring geometries, or the numbers of one ring.
///
/// # Example
///
/// ```
/// use geocall_core::args::CallArgs;
/// use geocall_core::functions::constructors::polygon;
///
/// let projected = polygon(
///     CallArgs::new()
///         .arg(vec![vec![vec![0, 0], vec![1, 0], vec![1, 1], vec![0, 0]]])
///         .arg("EPSG:3857"),
/// )
/// .unwrap();
/// let call = projected.as_deferred().unwrap();
/// assert_eq!(call.function, "GeometryConstructors.Polygon");
/// ```
pub fn polygon(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::Polygon, call)
}

/// MultiPolygon: a list of polygons, or the numbers of one polygon boundary.
pub fn multi_polygon(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::MultiPolygon, call)
}

/// GeometryCollection: a list of geometries.
pub fn geometry_collection(call: CallArgs) -> Result<Geometry> {
    build(GeometryKind::GeometryCollection, call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn coords(g: &Geometry) -> &Coordinates {
        g.as_literal().unwrap().coordinates().unwrap()
    }

    #[test]
    fn point_from_keywords() {
        let g = point(CallArgs::new().kwarg("lon", 1.0).kwarg("lat", 2.0)).unwrap();
        assert_eq!(coords(&g), &Coordinates::from(vec![1.0, 2.0]));
    }

    #[test]
    fn point_requires_two_coordinates() {
        assert!(point(CallArgs::new().arg(Vec::<f64>::new())).is_err());
        assert!(point(CallArgs::from_values([1.0, 2.0, 3.0, 4.0])).is_err());
        assert!(point(CallArgs::from_values([1.0])).is_err());
    }

    #[test]
    fn point_with_projection_defers() {
        let call = CallArgs::new().arg(vec![1, 2]).arg("EPSG:3857");
        let g = point(call).unwrap();
        let call = g.as_deferred().unwrap();
        assert_eq!(call.function, "GeometryConstructors.Point");
    }

    #[test]
    fn multi_point_from_single_pair() {
        let g = multi_point(CallArgs::from_values([1.0, 2.0])).unwrap();
        assert_eq!(coords(&g), &Coordinates::from(vec![vec![1.0, 2.0]]));
    }

    #[test]
    fn empty_multi_point() {
        let g = multi_point(CallArgs::new()).unwrap();
        assert!(coords(&g).is_empty());
        assert!(g.as_literal().unwrap().is_empty());
    }

    #[test]
    fn rectangle_from_keywords() {
        let call = CallArgs::new()
            .kwarg("xlo", 0)
            .kwarg("ylo", 0)
            .kwarg("xhi", 10)
            .kwarg("yhi", 10);
        let g = rectangle(call).unwrap();
        let expected = rectangle(CallArgs::from_values([0, 0, 10, 10])).unwrap();
        assert_eq!(g, expected);
    }

    #[test]
    fn rectangle_from_corner_points() {
        let corners = vec![vec![-1, -2], vec![3, 4]];
        let g = rectangle(CallArgs::new().arg(corners)).unwrap();
        assert_eq!(
            coords(&g),
            &Coordinates::from(vec![vec![
                vec![-1.0, 4.0],
                vec![-1.0, -2.0],
                vec![3.0, -2.0],
                vec![3.0, 4.0],
            ]])
        );
    }

    #[test]
    fn rectangle_needs_two_points() {
        let err = rectangle(CallArgs::from_values([0, 0, 1, 1, 2, 2])).unwrap_err();
        assert!(err.to_string().contains("requires 2 points"));
    }

    #[test]
    fn rectangle_with_geodesic_defers() {
        let call = CallArgs::new().arg(vec![0, 0, 1, 1]).null().arg(false);
        let g = rectangle(call).unwrap();
        let call = g.as_deferred().unwrap();
        assert_eq!(call.function, "GeometryConstructors.Rectangle");
        assert_eq!(call.arg("geodesic"), Some(&Value::Bool(false)));
    }

    #[test]
    fn linear_ring_from_numbers() {
        let g = linear_ring(CallArgs::from_values([0, 0, 1, 0, 1, 1, 0, 0])).unwrap();
        assert_eq!(g.as_literal().unwrap().kind(), GeometryKind::LinearRing);
        assert_eq!(coords(&g).as_list().unwrap().len(), 4);
    }

    #[test]
    fn multi_line_string_from_points_is_single_line() {
        let g = multi_line_string(CallArgs::from_values([0, 0, 1, 1])).unwrap();
        assert_eq!(
            coords(&g),
            &Coordinates::from(vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]])
        );
    }

    #[test]
    fn polygon_from_ring_geometries() {
        let ring = linear_ring(CallArgs::from_values([0, 0, 1, 0, 1, 1, 0, 0])).unwrap();
        let g = polygon(CallArgs::new().arg(vec![ring])).unwrap();
        assert_eq!(g.as_literal().unwrap().kind(), GeometryKind::Polygon);
        assert_eq!(crate::coordinates::nesting_depth(coords(&g)), Some(3));
    }

    #[test]
    fn multi_polygon_from_polygons() {
        let a = polygon(CallArgs::from_values([0, 0, 1, 0, 1, 1, 0, 0])).unwrap();
        let b = polygon(CallArgs::from_values([5, 5, 6, 5, 6, 6, 5, 5])).unwrap();
        let g = multi_polygon(CallArgs::new().arg(vec![a, b])).unwrap();
        assert_eq!(coords(&g).as_list().unwrap().len(), 2);
    }

    #[test]
    fn empty_polygon_rejected() {
        assert!(polygon(CallArgs::new()).is_err());
    }

    #[test]
    fn unknown_keyword_rejected() {
        assert!(line_string(CallArgs::new().kwarg("lon", 1)).is_err());
    }

    #[test]
    fn collection_keeps_members_in_order() {
        let p = point(CallArgs::from_values([1, 2])).unwrap();
        let l = line_string(CallArgs::from_values([0, 0, 1, 1])).unwrap();
        let call = CallArgs::new().arg(vec![p, l]);
        let g = geometry_collection(call).unwrap();
        let kinds: Vec<_> = g
            .as_literal()
            .unwrap()
            .geometries()
            .unwrap()
            .iter()
            .map(LiteralGeometry::kind)
            .collect();
        assert_eq!(kinds, vec![GeometryKind::Point, GeometryKind::LineString]);
    }
}
