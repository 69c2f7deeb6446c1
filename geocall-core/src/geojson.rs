//! GeoJSON literal ingestion and export.
//!
//! Only named CRS declarations are understood:
//! `{"type": "name", "properties": {"name": "EPSG:4326"}}`.

use serde_json::{json, Map, Value as JsonValue};

use crate::coordinates::Coordinates;
use crate::error::{GeoCallError, Result};
use crate::geometry::{Geometry, GeometryBody, GeometryKind, LiteralGeometry};

const COMPUTED_GEOJSON: &str =
    "Can't convert a computed geometry to GeoJSON. Use getInfo() instead.";

fn invalid_geojson() -> GeoCallError {
    GeoCallError::invalid("Invalid GeoJSON geometry.")
}

fn parse_structure(json: &JsonValue) -> Option<LiteralGeometry> {
    let obj = json.as_object()?;
    let kind: GeometryKind = obj.get("type")?.as_str()?.parse().ok()?;
    if kind == GeometryKind::GeometryCollection {
        let members = obj
            .get("geometries")?
            .as_array()?
            .iter()
            .map(parse_structure)
            .collect::<Option<Vec<_>>>()?;
        return Some(LiteralGeometry::collection(members));
    }
    let coords = Coordinates::from_json(obj.get("coordinates")?)?;
    LiteralGeometry::new(kind, coords).ok()
}

fn crs_name(crs: &JsonValue) -> Option<&str> {
    let crs = crs.as_object()?;
    if crs.get("type")?.as_str()? != "name" {
        return None;
    }
    crs.get("properties")?.as_object()?.get("name")?.as_str()
}

fn truthy(v: &JsonValue) -> bool {
    match v {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

impl LiteralGeometry {
    /// Validate a GeoJSON geometry object and build a literal from it.
    ///
    /// `proj` and `geodesic` override the object's `crs` and `geodesic`
    /// members; the `crs` member is only inspected when `proj` is `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use geocall_core::geometry::{GeometryKind, LiteralGeometry};
    /// use serde_json::json;
    ///
    /// let doc = json!({
    ///     "type": "LineString",
    ///     "coordinates": [[0, 0], [1, 1]],
    ///     "crs": {"type": "name", "properties": {"name": "EPSG:3857"}},
    ///     "geodesic": false,
    /// });
    /// let line = LiteralGeometry::from_geojson(&doc, None, None).unwrap();
    /// assert_eq!(line.kind(), GeometryKind::LineString);
    /// assert_eq!(line.projection(), Some("EPSG:3857"));
    /// assert_eq!(line.geodesic(), Some(false));
    /// ```
    pub fn from_geojson(
        json: &JsonValue,
        proj: Option<String>,
        geodesic: Option<bool>,
    ) -> Result<Self> {
        let geometry = parse_structure(json).ok_or_else(invalid_geojson)?;

        let proj = match (proj, json.get("crs")) {
            (Some(p), _) => Some(p),
            (None, Some(crs)) => match crs_name(crs) {
                Some(name) => Some(name.to_string()),
                None => {
                    let msg = format!("Invalid CRS declaration in GeoJSON: {crs}");
                    return Err(GeoCallError::invalid(msg));
                }
            },
            (None, None) => None,
        };
        let geodesic = geodesic.or_else(|| json.get("geodesic").map(truthy));

        Ok(geometry.with_projection(proj).with_geodesic(geodesic))
    }

    /// GeoJSON object for this geometry, with `crs` and `geodesic` members
    /// when they are set.
    pub fn to_geojson(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("type".into(), json!(self.kind().name()));
        match self.body() {
            GeometryBody::Coordinates(c) => {
                obj.insert("coordinates".into(), c.to_json());
            }
            GeometryBody::Geometries(gs) => {
                let members = gs.iter().map(LiteralGeometry::to_geojson).collect();
                obj.insert("geometries".into(), JsonValue::Array(members));
            }
        }
        if let Some(proj) = self.projection() {
            obj.insert(
                "crs".into(),
                json!({"type": "name", "properties": {"name": proj}}),
            );
        }
        if let Some(geodesic) = self.geodesic() {
            obj.insert("geodesic".into(), JsonValue::Bool(geodesic));
        }
        JsonValue::Object(obj)
    }
}

impl Geometry {
    /// Parse GeoJSON text into a literal geometry.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let json: JsonValue = serde_json::from_str(text)?;
        LiteralGeometry::from_geojson(&json, None, None).map(Geometry::Literal)
    }

    /// GeoJSON object of a literal geometry.
    pub fn to_geojson(&self) -> Result<JsonValue> {
        Ok(self.literal(COMPUTED_GEOJSON)?.to_geojson())
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_geojson()?)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::value::DeferredCall;

    fn parse(doc: JsonValue) -> Result<LiteralGeometry> {
        LiteralGeometry::from_geojson(&doc, None, None)
    }

    #[test]
    fn point_round_trip() {
        let doc = json!({"type": "Point", "coordinates": [1.0, 2.0]});
        let g = parse(doc.clone()).unwrap();
        assert_eq!(g.to_geojson(), doc);
    }

    #[test]
    fn wrong_nesting_for_type() {
        let doc = json!({"type": "Polygon", "coordinates": [[0, 0], [1, 1]]});
        let err = parse(doc).unwrap_err();
        assert_eq!(err.to_string(), "Invalid GeoJSON geometry.");
    }

    #[test]
    fn unknown_type_tag() {
        let circle = json!({"type": "Circle", "coordinates": [0, 0]});
        assert!(parse(circle).is_err());
        assert!(parse(json!({"coordinates": [0, 0]})).is_err());
        assert!(parse(json!([0, 0])).is_err());
    }

    #[test]
    fn missing_coordinates() {
        assert!(parse(json!({"type": "LineString"})).is_err());
    }

    #[test]
    fn non_numeric_coordinates() {
        let doc = json!({"type": "Point", "coordinates": ["a", "b"]});
        assert!(parse(doc).is_err());
    }

    #[test]
    fn empty_multi_kinds_accepted() {
        for t in ["MultiPoint", "MultiLineString", "MultiPolygon"] {
            let doc = json!({"type": t, "coordinates": []});
            assert!(parse(doc).is_ok(), "{t}");
        }
        let doc = json!({"type": "Polygon", "coordinates": []});
        assert!(parse(doc).is_err());
    }

    #[test]
    fn nested_collection() {
        let doc = json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [0, 0]},
                {"type": "GeometryCollection", "geometries": []},
            ],
        });
        let g = parse(doc).unwrap();
        assert_eq!(g.geometries().unwrap().len(), 2);
    }

    #[test]
    fn collection_with_bad_member() {
        let doc = json!({
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [0]}],
        });
        assert!(parse(doc).is_err());
    }

    #[test]
    fn linked_crs_rejected() {
        let doc = json!({
            "type": "Point",
            "coordinates": [0, 0],
            "crs": {"type": "link", "properties": {"href": "http://example.com"}},
        });
        let err = parse(doc).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid CRS declaration"), "{msg}");
    }

    #[test]
    fn explicit_projection_skips_crs_member() {
        let doc = json!({"type": "Point", "coordinates": [0, 0], "crs": 5});
        let proj = Some("EPSG:32610".to_string());
        let g = LiteralGeometry::from_geojson(&doc, proj, None).unwrap();
        assert_eq!(g.projection(), Some("EPSG:32610"));
    }

    #[test]
    fn geodesic_member_and_override() {
        let doc = json!({"type": "Point", "coordinates": [0, 0], "geodesic": 1});
        assert_eq!(parse(doc.clone()).unwrap().geodesic(), Some(true));
        let g = LiteralGeometry::from_geojson(&doc, None, Some(false)).unwrap();
        assert_eq!(g.geodesic(), Some(false));
    }

    #[test]
    fn export_includes_crs_and_geodesic() {
        let doc = json!({"type": "MultiPoint", "coordinates": []});
        let g = parse(doc)
            .unwrap()
            .with_projection(Some("EPSG:4326".into()))
            .with_geodesic(Some(true));
        assert_eq!(
            g.to_geojson(),
            json!({
                "type": "MultiPoint",
                "coordinates": [],
                "crs": {"type": "name", "properties": {"name": "EPSG:4326"}},
                "geodesic": true,
            })
        );
    }

    #[test]
    fn deferred_geometry_has_no_geojson() {
        let call = DeferredCall::new("GeometryConstructors.Point", BTreeMap::new());
        let g = Geometry::Deferred(call);
        let err = g.to_geojson().unwrap_err();
        assert!(matches!(err, GeoCallError::ComputedGeometry(_)));
        assert!(g.to_geojson_string().is_err());
    }

    #[test]
    fn parse_text() {
        let text = r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#;
        let g = Geometry::from_geojson_str(text).unwrap();
        let text = g.to_geojson_string().unwrap();
        let back: JsonValue = serde_json::from_str(&text).unwrap();
        let expected = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        assert_eq!(back, expected);
        assert!(matches!(
            Geometry::from_geojson_str("{"),
            Err(GeoCallError::Json(_))
        ));
    }
}
