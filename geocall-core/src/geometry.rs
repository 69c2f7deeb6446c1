//! The resolved geometry: a literal structure or a deferred remote call.

use std::fmt;
use std::str::FromStr;

use crate::coordinates::{nesting_depth, Coordinates};
use crate::error::{GeoCallError, Result};
use crate::value::DeferredCall;

/// GeoJSON geometry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    LinearRing,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 8] = [
        GeometryKind::Point,
        GeometryKind::MultiPoint,
        GeometryKind::LineString,
        GeometryKind::LinearRing,
        GeometryKind::MultiLineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    /// Coordinate nesting depth, `None` for collections.
    pub fn depth(self) -> Option<usize> {
        match self {
            GeometryKind::Point => Some(1),
            GeometryKind::MultiPoint => Some(2),
            GeometryKind::LineString | GeometryKind::LinearRing => Some(2),
            GeometryKind::MultiLineString | GeometryKind::Polygon => Some(3),
            GeometryKind::MultiPolygon => Some(4),
            GeometryKind::GeometryCollection => None,
        }
    }

    /// Multi kinds may carry an empty coordinate list.
    pub fn allows_empty(self) -> bool {
        matches!(
            self,
            GeometryKind::MultiPoint | GeometryKind::MultiLineString | GeometryKind::MultiPolygon
        )
    }

    /// Whether `coords` is an acceptable coordinate tree for this kind.
    pub fn accepts(self, coords: &Coordinates) -> bool {
        let Some(depth) = self.depth() else {
            return false;
        };
        nesting_depth(coords) == Some(depth) || (self.allows_empty() && coords.is_empty())
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryKind {
    type Err = GeoCallError;

    fn from_str(s: &str) -> Result<Self> {
        GeometryKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| unknown_kind(s))
    }
}

fn unknown_kind(name: &str) -> GeoCallError {
    GeoCallError::invalid(format!("Unknown geometry type: {name}"))
}

/// Coordinates, or member geometries for a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryBody {
    Coordinates(Coordinates),
    Geometries(Vec<LiteralGeometry>),
}

/// A geometry fully described on the client.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralGeometry {
    kind: GeometryKind,
    body: GeometryBody,
    proj: Option<String>,
    geodesic: Option<bool>,
}

impl LiteralGeometry {
    /// Build a non-collection geometry, checking the coordinate nesting.
    ///
    /// NaN and infinite coordinates are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use geocall_core::coordinates::Coordinates;
    /// use geocall_core::geometry::{GeometryKind, LiteralGeometry};
    ///
    /// let line = Coordinates::from(vec![vec![0.0, 0.0], vec![1.0, 1.0]]);
    /// assert!(LiteralGeometry::new(GeometryKind::LineString, line.clone()).is_ok());
    /// assert!(LiteralGeometry::new(GeometryKind::Polygon, line).is_err());
    /// ```
    pub fn new(kind: GeometryKind, coordinates: Coordinates) -> Result<Self> {
        if !kind.accepts(&coordinates) || !coordinates.is_finite() {
            let msg = format!("Invalid {kind} coordinates.");
            return Err(GeoCallError::invalid(msg));
        }
        Ok(Self {
            kind,
            body: GeometryBody::Coordinates(coordinates),
            proj: None,
            geodesic: None,
        })
    }

    pub fn collection(geometries: Vec<LiteralGeometry>) -> Self {
        Self {
            kind: GeometryKind::GeometryCollection,
            body: GeometryBody::Geometries(geometries),
            proj: None,
            geodesic: None,
        }
    }

    pub fn with_projection(mut self, proj: Option<String>) -> Self {
        self.proj = proj;
        self
    }

    pub fn with_geodesic(mut self, geodesic: Option<bool>) -> Self {
        self.geodesic = geodesic;
        self
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn body(&self) -> &GeometryBody {
        &self.body
    }

    /// `None` for collections.
    pub fn coordinates(&self) -> Option<&Coordinates> {
        match &self.body {
            GeometryBody::Coordinates(c) => Some(c),
            GeometryBody::Geometries(_) => None,
        }
    }

    /// `None` unless this is a collection.
    pub fn geometries(&self) -> Option<&[LiteralGeometry]> {
        match &self.body {
            GeometryBody::Geometries(g) => Some(g),
            GeometryBody::Coordinates(_) => None,
        }
    }

    /// CRS name or WKT; `None` inherits the platform default.
    pub fn projection(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    /// `None` lets the CRS decide.
    pub fn geodesic(&self) -> Option<bool> {
        self.geodesic
    }

    pub fn is_empty(&self) -> bool {
        crate::emptiness::is_empty_geometry(self)
    }
}

/// A geometry constructed by a client call.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Literal(LiteralGeometry),
    Deferred(DeferredCall),
}

impl Geometry {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Geometry::Deferred(_))
    }

    pub fn as_literal(&self) -> Option<&LiteralGeometry> {
        match self {
            Geometry::Literal(g) => Some(g),
            Geometry::Deferred(_) => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&DeferredCall> {
        match self {
            Geometry::Deferred(c) => Some(c),
            Geometry::Literal(_) => None,
        }
    }

    /// Coordinates that can be spliced into another literal as-is.
    ///
    /// Only literals with no projection or geodesic state qualify: anything
    /// else has to be reconciled by the remote platform first.
    pub fn as_inline_coordinates(&self) -> Option<&Coordinates> {
        match self {
            Geometry::Literal(g) if g.proj.is_none() && g.geodesic.is_none() => g.coordinates(),
            _ => None,
        }
    }

    /// Re-state a geometry with projection and geodesic overrides.
    ///
    /// Overrides can't be applied to a deferred geometry on the client.
    pub fn reinterpret(self, proj: Option<String>, geodesic: Option<bool>) -> Result<Self> {
        match self {
            Geometry::Deferred(call) => {
                if proj.is_some() || geodesic.is_some() {
                    return Err(GeoCallError::ComputedGeometry(
                        "Setting the CRS or geodesic on a computed Geometry is not supported. \
                         Use Geometry.transform().",
                    ));
                }
                Ok(Geometry::Deferred(call))
            }
            Geometry::Literal(mut g) => {
                if proj.is_some() {
                    g.proj = proj;
                }
                if geodesic.is_some() {
                    g.geodesic = geodesic;
                }
                Ok(Geometry::Literal(g))
            }
        }
    }

    pub(crate) fn literal(&self, op: &'static str) -> Result<&LiteralGeometry> {
        self.as_literal().ok_or(GeoCallError::ComputedGeometry(op))
    }
}

impl From<LiteralGeometry> for Geometry {
    fn from(g: LiteralGeometry) -> Self {
        Geometry::Literal(g)
    }
}

impl From<DeferredCall> for Geometry {
    fn from(c: DeferredCall) -> Self {
        Geometry::Deferred(c)
    }
}
