//! Canonical catalog of remote geometry constructors.
//!
//! Constructor calls that cannot be resolved on the client are expressed as
//! [`DeferredCall`]s against one of these declarations. Names only resolve
//! once the API has been bound with [`initialize`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{GeoCallError, Result};
use crate::value::{DeferredCall, Value};

/// Namespace of the remote geometry constructors.
pub const CONSTRUCTOR_NAMESPACE: &str = "GeometryConstructors";

/// Remote constructor declaration metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorSpec {
    pub name: &'static str,
    pub params: &'static [&'static str],
}

const GEOMETRY_PARAMS: &[&str] = &["coordinates", "crs", "geodesic", "maxError"];

pub const GEOMETRY_CONSTRUCTORS: &[ConstructorSpec] = &[
    ConstructorSpec {
        name: "GeometryConstructors.Point",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.MultiPoint",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.Rectangle",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.LineString",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.LinearRing",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.MultiLineString",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.Polygon",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.MultiPolygon",
        params: GEOMETRY_PARAMS,
    },
    ConstructorSpec {
        name: "GeometryConstructors.GeometryCollection",
        params: GEOMETRY_PARAMS,
    },
];

static API_BOUND: AtomicBool = AtomicBool::new(false);

/// Bind the constructor API. Idempotent; only the first caller does the work.
pub fn initialize() {
    if API_BOUND
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
    {
        log::debug!(
            "bound {} {CONSTRUCTOR_NAMESPACE} functions",
            GEOMETRY_CONSTRUCTORS.len()
        );
    }
}

/// Unbind the constructor API. Intended for test isolation.
pub fn reset() {
    if API_BOUND.swap(false, Ordering::AcqRel) {
        log::debug!("cleared {CONSTRUCTOR_NAMESPACE} bindings");
    }
}

pub fn is_bound() -> bool {
    API_BOUND.load(Ordering::Acquire)
}

/// Fully qualified remote name for a client constructor.
pub fn qualified_name(ctor_name: &str) -> String {
    format!("{CONSTRUCTOR_NAMESPACE}.{ctor_name}")
}

/// Resolve a remote constructor by fully qualified name.
///
/// # Example
///
/// ```
/// use geocall_core::function_catalog::{initialize, lookup};
///
/// initialize();
/// let spec = lookup("GeometryConstructors.Polygon").unwrap();
/// assert!(spec.params.contains(&"geodesic"));
/// assert!(lookup("GeometryConstructors.Circle").is_err());
/// ```
pub fn lookup(name: &str) -> Result<&'static ConstructorSpec> {
    if !is_bound() {
        return Err(GeoCallError::ApiNotBound);
    }
    GEOMETRY_CONSTRUCTORS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| GeoCallError::UnknownFunction(name.to_string()))
}

impl ConstructorSpec {
    /// Build a call to this constructor with named parameters.
    pub fn apply(&self, params: BTreeMap<String, Value>) -> Result<DeferredCall> {
        if let Some(unknown) = params.keys().find(|k| !self.params.contains(&k.as_str())) {
            return Err(GeoCallError::UnexpectedParameter {
                function: self.name,
                parameter: unknown.clone(),
            });
        }
        Ok(DeferredCall::new(self.name, params))
    }
}
