//! Polymorphic JSON values with a total order.
//!
//! Values of different kinds order by a fixed rank:
//!
//! 1. numbers (`Int` and `Float` share a rank and compare numerically)
//! 2. strings
//! 3. booleans
//! 4. lists
//! 5. maps
//! 6. null
//!
//! Within a rank, strings compare byte-wise, `false < true`, and lists compare
//! element by element with a strict prefix ordering first. Maps are JSON
//! objects, so they compare by key-sorted members regardless of the order they
//! are stored in.

use crate::fields::{compare_fields, sorted_refs};
use crate::{error::Result, Error, Field, FieldList};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;

/// A JSON value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(FieldList),
}

impl Value {
    /// Rank used to order values of different kinds. Changing it changes the
    /// order of every stored canonical form.
    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::String(_) => 1,
            Value::Bool(_) => 2,
            Value::List(_) => 3,
            Value::Map(_) => 4,
            Value::Null => 5,
        }
    }

    /// Name of the value kind, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Three-way comparison.
    pub fn compare(&self, rhs: &Value) -> Ordering {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => compare_floats(*a, *b),
            (Value::Int(a), Value::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => compare_int_float(*b, *a).reverse(),
            (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => compare_lists(a, b),
            (Value::Map(a), Value::Map(b)) => compare_maps(a, b),
            (Value::Null, Value::Null) => Ordering::Equal,
            _ => self.rank().cmp(&rhs.rank()),
        }
    }

    /// True when `self` orders strictly before `rhs`.
    pub fn less(&self, rhs: &Value) -> bool {
        self.compare(rhs) == Ordering::Less
    }

    /// Structural equality, consistent with [`Value::compare`].
    pub fn equals(&self, rhs: &Value) -> bool {
        match (self, rhs) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && compare_maps(a, b) == Ordering::Equal
            }
            _ => self.compare(rhs) == Ordering::Equal,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are converted.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldList> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Convert to the plain `serde_json` representation.
    ///
    /// Maps lose duplicate names (the last one wins) and their member order.
    pub fn to_unstructured(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| Error::Encode(format!("unsupported value: {}", f)))?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_unstructured)
                    .collect::<Result<_>>()?,
            ),
            Value::Map(fields) => {
                let mut obj = serde_json::Map::new();
                for field in fields.iter() {
                    obj.insert(field.name.clone(), field.value.to_unstructured()?);
                }
                serde_json::Value::Object(obj)
            }
        })
    }

    /// Build from the plain `serde_json` representation.
    pub fn from_unstructured(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(f)) => Value::Float(f),
                // only reachable with serde_json's arbitrary_precision
                (None, None) => Value::String(n.to_string()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_unstructured).collect())
            }
            serde_json::Value::Object(obj) => {
                let mut fields: FieldList = obj
                    .into_iter()
                    .map(|(name, value)| Field::new(name, Value::from_unstructured(value)))
                    .collect();
                fields.sort();
                Value::Map(fields)
            }
        }
    }
}

/// Numeric comparison, so `-0.0 == 0.0`. NaN falls back to the IEEE total
/// order and sorts past the infinities by sign.
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer against a float.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    match compare_floats(i as f64, f) {
        // `i as f64` may have rounded; `f` is integral and in range here.
        Ordering::Equal => i128::from(i).cmp(&(f as i128)),
        other => other,
    }
}

fn compare_lists(lhs: &[Value], rhs: &[Value]) -> Ordering {
    for (l, r) in lhs.iter().zip(rhs) {
        match l.compare(r) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    lhs.len().cmp(&rhs.len())
}

fn compare_maps(lhs: &FieldList, rhs: &FieldList) -> Ordering {
    if lhs.is_sorted_by_name() && rhs.is_sorted_by_name() {
        return compare_fields(lhs.iter(), rhs.iter());
    }
    let lhs = sorted_refs(lhs);
    let rhs = sorted_refs(rhs);
    compare_fields(lhs.into_iter(), rhs.into_iter())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Value {}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            // serde_json would quietly write `null` for these
            Value::Float(f) if !f.is_finite() => Err(ser::Error::custom(format!(
                "unsupported value: {}",
                f
            ))),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(fields) => fields.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from_unstructured)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from_unstructured(value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<FieldList> for Value {
    fn from(fields: FieldList) -> Self {
        Value::Map(fields)
    }
}
