//! Coordinate trees, nesting analysis and depth normalization.
//!
//! Nesting depth counts list levels down to the numeric leaves:
//!
//! | depth | shape                              | kinds                               |
//! |-------|------------------------------------|-------------------------------------|
//! | 1     | `[x, y]`                           | Point                               |
//! | 2     | `[[x, y], …]`                      | MultiPoint, LineString, LinearRing  |
//! | 3     | `[[[x, y], …], …]`                 | MultiLineString, Polygon            |
//! | 4     | `[[[[x, y], …], …], …]`            | MultiPolygon                        |

use serde_json::Value as JsonValue;

use crate::error::{GeoCallError, Result};
use crate::value::Value;

/// Deepest nesting any geometry kind uses.
pub const MAX_DEPTH: usize = 4;

/// A literal coordinate tree: numbers and lists of numbers only.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Number(f64),
    List(Vec<Coordinates>),
}

impl Coordinates {
    pub fn empty() -> Self {
        Coordinates::List(Vec::new())
    }

    pub fn as_list(&self) -> Option<&[Coordinates]> {
        match self {
            Coordinates::List(items) => Some(items),
            Coordinates::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Coordinates::Number(n) => Some(*n),
            Coordinates::List(_) => None,
        }
    }

    /// True for an empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, Coordinates::List(items) if items.is_empty())
    }

    /// True when every number in the tree is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Coordinates::Number(n) => n.is_finite(),
            Coordinates::List(items) => items.iter().all(Coordinates::is_finite),
        }
    }

    fn is_flat_numbers(&self) -> bool {
        match self {
            Coordinates::List(items) => items.iter().all(|c| c.as_number().is_some()),
            Coordinates::Number(_) => false,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Coordinates::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Coordinates::List(items) => {
                JsonValue::Array(items.iter().map(Coordinates::to_json).collect())
            }
        }
    }

    /// Read a JSON array tree. Anything other than numbers and arrays is rejected.
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Number(n) => n.as_f64().map(Coordinates::Number),
            JsonValue::Array(items) => items
                .iter()
                .map(Coordinates::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Coordinates::List),
            _ => None,
        }
    }
}

impl From<f64> for Coordinates {
    fn from(n: f64) -> Self {
        Coordinates::Number(n)
    }
}

impl<T: Into<Coordinates>> From<Vec<T>> for Coordinates {
    fn from(items: Vec<T>) -> Self {
        Coordinates::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&Coordinates> for Value {
    fn from(c: &Coordinates) -> Self {
        match c {
            Coordinates::Number(n) => Value::Number(*n),
            Coordinates::List(items) => Value::List(items.iter().map(Value::from).collect()),
        }
    }
}

/// A coordinate tree as supplied by a caller, before it is known whether it
/// can be resolved locally.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateNode {
    Number(f64),
    Sequence(Vec<CoordinateNode>),
    /// A value only the remote platform can resolve.
    Remote(Value),
}

impl CoordinateNode {
    /// Classify a constructor argument.
    ///
    /// Literal geometries without projection or geodesic state are inlined as
    /// their coordinates; every other geometry is remote.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) if n.is_finite() => Ok(CoordinateNode::Number(*n)),
            Value::Number(n) => {
                let msg = format!("Invalid coordinate: {n}");
                Err(GeoCallError::invalid(msg))
            }
            Value::List(items) => items
                .iter()
                .map(CoordinateNode::from_value)
                .collect::<Result<Vec<_>>>()
                .map(CoordinateNode::Sequence),
            Value::Geometry(g) => Ok(match g.as_inline_coordinates() {
                Some(coords) => CoordinateNode::from(coords),
                None => CoordinateNode::Remote(value.clone()),
            }),
            Value::Computed(_) => Ok(CoordinateNode::Remote(value.clone())),
            Value::Null | Value::Bool(_) | Value::String(_) => {
                let msg = format!("Invalid coordinate: unexpected {}", value.type_name());
                Err(GeoCallError::invalid(msg))
            }
        }
    }

    pub fn has_remote(&self) -> bool {
        match self {
            CoordinateNode::Number(_) => false,
            CoordinateNode::Sequence(items) => items.iter().any(CoordinateNode::has_remote),
            CoordinateNode::Remote(_) => true,
        }
    }

    /// The literal tree, or `None` if any node is remote.
    pub fn into_literal(self) -> Option<Coordinates> {
        match self {
            CoordinateNode::Number(n) => Some(Coordinates::Number(n)),
            CoordinateNode::Sequence(items) => items
                .into_iter()
                .map(CoordinateNode::into_literal)
                .collect::<Option<Vec<_>>>()
                .map(Coordinates::List),
            CoordinateNode::Remote(_) => None,
        }
    }
}

impl From<&Coordinates> for CoordinateNode {
    fn from(c: &Coordinates) -> Self {
        match c {
            Coordinates::Number(n) => CoordinateNode::Number(*n),
            Coordinates::List(items) => {
                CoordinateNode::Sequence(items.iter().map(CoordinateNode::from).collect())
            }
        }
    }
}

/// Nesting depth of a coordinate tree, or `None` if it is malformed.
///
/// Siblings must share the same depth. Leaf lists must hold an even count
/// of numbers. An empty list has depth 1.
///
/// # Example
///
/// ```
/// use geocall_core::coordinates::{nesting_depth, Coordinates};
///
/// let ring = Coordinates::from(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]]);
/// assert_eq!(nesting_depth(&ring), Some(2));
///
/// let odd = Coordinates::from(vec![0.0, 1.0, 2.0]);
/// assert_eq!(nesting_depth(&odd), None);
/// ```
pub fn nesting_depth(shape: &Coordinates) -> Option<usize> {
    let items = shape.as_list()?;
    match items.first() {
        Some(Coordinates::List(_)) => {
            let depth = nesting_depth(&items[0])?;
            for sibling in &items[1..] {
                if nesting_depth(sibling)? != depth {
                    return None;
                }
            }
            Some(depth + 1)
        }
        _ => {
            if items.iter().any(|c| c.as_number().is_none()) {
                return None;
            }
            (items.len() % 2 == 0).then_some(1)
        }
    }
}

/// Pair a flat list of numbers into points: `[x1, y1, x2, y2]` becomes
/// `[[x1, y1], [x2, y2]]`.
///
/// A single pair stays unpaired. Anything that is not a non-empty flat list of
/// numbers is returned unchanged.
pub fn coordinates_to_line(coords: Coordinates) -> Result<Coordinates> {
    let items = match coords {
        Coordinates::List(items) => items,
        number => return Ok(number),
    };
    if !matches!(items.first(), Some(Coordinates::Number(_))) {
        return Ok(Coordinates::List(items));
    }
    if items.len() == 2 {
        return Ok(Coordinates::List(items));
    }
    if items.len() % 2 != 0 {
        return Err(GeoCallError::invalid(format!(
            "Invalid number of coordinates: {}",
            items.len()
        )));
    }
    let line = items
        .chunks_exact(2)
        .map(|pair| Coordinates::List(pair.to_vec()))
        .collect();
    Ok(Coordinates::List(line))
}

/// Bring a coordinate tree to exactly `depth` levels of nesting.
///
/// Flat number lists are paired into points, then the tree is wrapped in
/// extra lists until it is deep enough. Over-nested input is never unwrapped;
/// it fails validation instead. A tree whose only content is an empty list
/// collapses to the empty list.
///
/// # Example
///
/// ```
/// use geocall_core::coordinates::{fix_depth, Coordinates};
///
/// let flat = Coordinates::from(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
/// let polygon = fix_depth(3, flat).unwrap();
/// assert_eq!(
///     polygon,
///     Coordinates::from(vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]]])
/// );
/// ```
pub fn fix_depth(depth: usize, coords: Coordinates) -> Result<Coordinates> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(GeoCallError::invalid("Unexpected nesting level."));
    }

    let mut coords = if coords.is_flat_numbers() {
        coordinates_to_line(coords)?
    } else {
        coords
    };

    let mut count = 0;
    let mut item = Some(&coords);
    while let Some(Coordinates::List(items)) = item {
        item = items.first();
        count += 1;
    }
    while count < depth {
        coords = Coordinates::List(vec![coords]);
        count += 1;
    }

    if nesting_depth(&coords) != Some(depth) {
        return Err(GeoCallError::invalid("Invalid geometry."));
    }

    let mut item = &coords;
    while let Coordinates::List(items) = item {
        match items.as_slice() {
            [only] => item = only,
            [] => return Ok(Coordinates::empty()),
            _ => break,
        }
    }

    Ok(coords)
}
