//! Positional and keyword arguments for a single constructor call.

use crate::error::{GeoCallError, Result};
use crate::value::Value;

/// The arguments of one constructor call, as the caller wrote them.
///
/// Positional slots may be left unset, which removes them from the argument
/// list, or set to [`Value::Null`], which keeps later arguments in place.
/// Legacy keywords name positional slots by index in a constructor-specific
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Option<Value>>,
    keywords: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// All-positional arguments.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(|v| Some(v.into())).collect(),
            keywords: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(Some(value.into()));
        self
    }

    /// Append an unset positional slot.
    pub fn unset(mut self) -> Self {
        self.positional.push(None);
        self
    }

    /// Append an explicit null.
    pub fn null(mut self) -> Self {
        self.positional.push(Some(Value::Null));
        self
    }

    /// Append a positional argument, or a null that keeps its position.
    pub fn opt(mut self, value: Option<impl Into<Value>>) -> Self {
        let value = value.map_or(Value::Null, Into::into);
        self.positional.push(Some(value));
        self
    }

    /// Add a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }
}

/// Resolve keywords onto their slots and drop unset slots, keeping order.
///
/// `keyword_slots[i]` is the legacy keyword that fills positional slot `i`.
///
/// # Example
///
/// ```
/// use geocall_core::args::{collect_args, CallArgs};
/// use geocall_core::value::Value;
///
/// let call = CallArgs::new().kwarg("lat", 2.0).kwarg("lon", 1.0);
/// let args = collect_args(call, &["lon", "lat"]).unwrap();
/// assert_eq!(args, vec![Value::Number(1.0), Value::Number(2.0)]);
/// ```
pub fn collect_args(call: CallArgs, keyword_slots: &[&str]) -> Result<Vec<Value>> {
    let CallArgs {
        mut positional,
        keywords,
    } = call;

    for (name, value) in keywords {
        let slot = keyword_slots
            .iter()
            .position(|k| *k == name)
            .ok_or_else(|| GeoCallError::UnknownKeyword(name.clone()))?;
        if positional.len() <= slot {
            positional.resize(slot + 1, None);
        }
        if positional[slot].is_some() {
            return Err(GeoCallError::ConflictingKeyword(name));
        }
        positional[slot] = Some(value);
    }

    Ok(positional.into_iter().flatten().collect())
}
