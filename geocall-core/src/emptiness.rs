use crate::coordinates::Coordinates;
use crate::geometry::{GeometryBody, LiteralGeometry};

fn has_no_points(c: &Coordinates) -> bool {
    match c {
        Coordinates::Number(_) => false,
        Coordinates::List(items) => {
            items.is_empty() || (items[0].as_list().is_some() && items.iter().all(has_no_points))
        }
    }
}

pub(crate) fn is_empty_geometry(geom: &LiteralGeometry) -> bool {
    match geom.body() {
        GeometryBody::Coordinates(c) => has_no_points(c),
        GeometryBody::Geometries(gs) => gs.is_empty() || gs.iter().all(is_empty_geometry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryKind;

    #[test]
    fn empty_multipolygon() {
        let g = LiteralGeometry::new(GeometryKind::MultiPolygon, Coordinates::empty()).unwrap();
        assert!(is_empty_geometry(&g));
    }

    #[test]
    fn point_is_not_empty() {
        let g = LiteralGeometry::new(GeometryKind::Point, vec![1.0, 2.0].into()).unwrap();
        assert!(!is_empty_geometry(&g));
    }

    #[test]
    fn collection_of_empties_is_empty() {
        let empty = LiteralGeometry::new(GeometryKind::MultiPoint, Coordinates::empty()).unwrap();
        assert!(is_empty_geometry(&LiteralGeometry::collection(vec![])));
        assert!(is_empty_geometry(&LiteralGeometry::collection(vec![empty])));
    }
}
