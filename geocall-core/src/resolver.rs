//! Decide between a literal geometry and a deferred remote constructor call.
//!
//! Collected arguments are mapped onto the slots
//! `[coordinates, crs, geodesic, maxError]`. A call is resolved on the client
//! only when every coordinate is a plain number and none of the optional
//! slots is set; reprojection, geodesic reinterpretation and tolerance-bounded
//! work belong to the remote platform.

use std::collections::BTreeMap;

use crate::coordinates::{fix_depth, CoordinateNode, Coordinates};
use crate::error::{GeoCallError, Result};
use crate::function_catalog::{lookup, qualified_name};
use crate::geometry::{Geometry, GeometryKind, LiteralGeometry};
use crate::value::{DeferredCall, Value};

/// Positional slot names, in order.
pub const SLOT_NAMES: [&str; 4] = ["coordinates", "crs", "geodesic", "maxError"];

/// Collected arguments mapped onto their slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    pub coordinates: Option<Value>,
    pub crs: Option<Value>,
    pub geodesic: Option<Value>,
    pub max_error: Option<Value>,
}

impl Slots {
    /// Map collected arguments onto slots.
    ///
    /// An all-numeric argument list is a flat coordinate list (the
    /// `Point(lng, lat)` convenience form). Otherwise arguments are taken
    /// positionally and nulls leave their slot empty.
    pub fn from_args(args: Vec<Value>) -> Result<Self> {
        if args.iter().all(Value::is_number) {
            return Ok(Slots {
                coordinates: Some(Value::List(args)),
                ..Slots::default()
            });
        }
        if args.len() > SLOT_NAMES.len() {
            let msg = "Geometry constructor given extra arguments.";
            return Err(GeoCallError::invalid(msg));
        }
        let mut args = args.into_iter().map(|v| Some(v).filter(|v| !v.is_null()));
        let mut next = || args.next().flatten();
        Ok(Slots {
            coordinates: next(),
            crs: next(),
            geodesic: next(),
            max_error: next(),
        })
    }

    fn option_reason(&self) -> Option<&'static str> {
        if self.crs.is_some() {
            Some("coordinate reference supplied")
        } else if self.geodesic.is_some() {
            Some("geodesic flag supplied")
        } else if self.max_error.is_some() {
            Some("max error supplied")
        } else {
            None
        }
    }

    fn into_params(self) -> BTreeMap<String, Value> {
        [self.coordinates, self.crs, self.geodesic, self.max_error]
            .into_iter()
            .zip(SLOT_NAMES)
            .filter_map(|(value, name)| value.map(|v| (name.to_string(), v)))
            .collect()
    }
}

/// Outcome of argument resolution for a coordinate-based constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Coordinates normalized to the requested depth.
    Literal(Coordinates),
    Deferred(DeferredCall),
}

fn defer(ctor_name: &str, slots: Slots, reason: &str) -> Result<DeferredCall> {
    let name = qualified_name(ctor_name);
    log::debug!("deferring {name}: {reason}");
    lookup(&name)?.apply(slots.into_params())
}

/// Resolve collected arguments for `ctor_name`, whose points sit at `depth`.
pub fn resolve_args(ctor_name: &str, depth: usize, args: Vec<Value>) -> Result<Resolution> {
    let slots = Slots::from_args(args)?;
    let node = match &slots.coordinates {
        Some(value) => CoordinateNode::from_value(value)?,
        None => {
            let msg = format!("The Geometry.{ctor_name} constructor requires coordinates.");
            return Err(GeoCallError::invalid(msg));
        }
    };

    if node.has_remote() {
        return defer(ctor_name, slots, "unresolved coordinate").map(Resolution::Deferred);
    }
    if let Some(reason) = slots.option_reason() {
        return defer(ctor_name, slots, reason).map(Resolution::Deferred);
    }

    let coords = node
        .into_literal()
        .ok_or_else(|| GeoCallError::invalid("Invalid geometry."))?;
    let coords = fix_depth(depth, coords)?;
    log::trace!("resolved {ctor_name} locally");
    Ok(Resolution::Literal(coords))
}

/// Construct a geometry of kind `ctor_name` from collected arguments.
///
/// # Example
///
/// ```
/// use geocall_core::function_catalog::initialize;
/// use geocall_core::resolver::construct;
/// use geocall_core::value::Value;
///
/// initialize();
/// let line = construct("LineString", 2, vec![Value::from(vec![0, 0, 1, 1, 2, 2])]).unwrap();
/// assert!(!line.is_deferred());
///
/// let args = vec![Value::from(vec![vec![0, 0], vec![1, 1]]), Value::from("EPSG:3857")];
/// let projected = construct("LineString", 2, args).unwrap();
/// assert!(projected.is_deferred());
/// ```
pub fn construct(ctor_name: &str, depth: usize, args: Vec<Value>) -> Result<Geometry> {
    if ctor_name == GeometryKind::GeometryCollection.name() {
        return construct_collection(args);
    }
    match resolve_args(ctor_name, depth, args)? {
        Resolution::Deferred(call) => Ok(Geometry::Deferred(call)),
        Resolution::Literal(coords) => {
            let kind: GeometryKind = ctor_name.parse()?;
            Ok(Geometry::Literal(LiteralGeometry::new(kind, coords)?))
        }
    }
}

fn construct_collection(args: Vec<Value>) -> Result<Geometry> {
    let ctor_name = GeometryKind::GeometryCollection.name();
    let slots = Slots::from_args(args)?;
    let members = match &slots.coordinates {
        Some(Value::List(items)) => items.as_slice(),
        None => {
            let msg = "The Geometry.GeometryCollection constructor requires geometries.";
            return Err(GeoCallError::invalid(msg));
        }
        Some(other) => {
            let found = other.type_name();
            let msg = format!("GeometryCollection requires a list of geometries, got {found}");
            return Err(GeoCallError::invalid(msg));
        }
    };

    let mut literals = Vec::with_capacity(members.len());
    let mut unresolved = false;
    for member in members {
        match member {
            Value::Geometry(g) => match g.as_ref() {
                Geometry::Literal(lit) => literals.push(lit.clone()),
                Geometry::Deferred(_) => unresolved = true,
            },
            Value::Computed(_) => unresolved = true,
            other => {
                let found = other.type_name();
                let msg = format!("GeometryCollection members must be geometries, got {found}");
                return Err(GeoCallError::invalid(msg));
            }
        }
    }

    if unresolved {
        return defer(ctor_name, slots, "unresolved member geometry").map(Geometry::Deferred);
    }
    if let Some(reason) = slots.option_reason() {
        return defer(ctor_name, slots, reason).map(Geometry::Deferred);
    }
    log::trace!("resolved {ctor_name} locally");
    Ok(Geometry::Literal(LiteralGeometry::collection(literals)))
}
