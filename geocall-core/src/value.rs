//! Constructor argument values.
//!
//! A [`Value`] is anything a caller may hand to a geometry constructor: plain
//! numbers and nested lists of them, flags and identifiers, geometries built
//! earlier, or references to computations that only the remote platform can
//! evaluate.

use std::collections::BTreeMap;

use crate::geometry::Geometry;

/// A call to a named remote function that has not been evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredCall {
    /// Fully qualified function name, e.g. `GeometryConstructors.Polygon`.
    pub function: String,
    /// Named arguments, in name order.
    pub args: BTreeMap<String, Value>,
}

impl DeferredCall {
    pub fn new(function: impl Into<String>, args: BTreeMap<String, Value>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }

    /// Argument by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}

/// A single constructor argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An explicit null: holds its position but counts as not supplied.
    Null,
    Number(f64),
    Bool(bool),
    String(String),
    List(Vec<Value>),
    Geometry(Box<Geometry>),
    Computed(DeferredCall),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Geometry(_) => "geometry",
            Value::Computed(_) => "computed value",
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Geometry> for Value {
    fn from(g: Geometry) -> Self {
        Value::Geometry(Box::new(g))
    }
}

impl From<DeferredCall> for Value {
    fn from(c: DeferredCall) -> Self {
        Value::Computed(c)
    }
}
