use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::MalformedInputError;

pub mod ids;

pub use ids::{set_id, with_ids, Identified};

/// Nesting limit for cloning; anything deeper is treated as malformed.
pub const MAX_DEPTH: usize = 256;

/// Insertion-ordered string-keyed mapping, the shape of a record.
pub type Mapping = IndexMap<String, PlainValue>;

/// Data handed over by views and the store. Opaque leaves are explicit so they
/// are never walked as if they were mappings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlainValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<PlainValue>),
    Mapping(Mapping),
    Opaque(OpaqueValue),
}

impl PlainValue {
    /// The entries if this is a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            PlainValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The items if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[PlainValue]> {
        match self {
            PlainValue::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Looks up `key` when this is a mapping; `None` for any other variant.
    pub fn get(&self, key: &str) -> Option<&PlainValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Non-negative integers only. Floats and negatives yield `None`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            PlainValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlainValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to JSON. Fails on the first opaque leaf.
    pub fn to_json(&self) -> Result<Value, MalformedInputError> {
        Ok(match self {
            PlainValue::Null => Value::Null,
            PlainValue::Bool(b) => Value::Bool(*b),
            PlainValue::Number(n) => Value::Number(n.clone()),
            PlainValue::String(s) => Value::String(s.clone()),
            PlainValue::Sequence(items) => Value::Array(
                items
                    .iter()
                    .map(PlainValue::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            PlainValue::Mapping(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), value.to_json()?);
                }
                Value::Object(out)
            }
            PlainValue::Opaque(opaque) => {
                return Err(MalformedInputError::Opaque {
                    type_name: opaque.type_name(),
                })
            }
        })
    }
}

impl From<Value> for PlainValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PlainValue::Null,
            Value::Bool(b) => PlainValue::Bool(b),
            Value::Number(n) => PlainValue::Number(n),
            Value::String(s) => PlainValue::String(s),
            Value::Array(items) => {
                PlainValue::Sequence(items.into_iter().map(PlainValue::from).collect())
            }
            Value::Object(map) => PlainValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, PlainValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PlainValue {
    fn from(value: &str) -> Self {
        PlainValue::String(value.to_owned())
    }
}

impl From<u64> for PlainValue {
    fn from(value: u64) -> Self {
        PlainValue::Number(value.into())
    }
}

/// A value that is not plain data (a date handle, a component, a callback).
#[derive(Clone)]
pub struct OpaqueValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &OpaqueValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.type_name).finish()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Decides what a deep clone does with an opaque leaf.
pub trait OpaqueStrategy {
    fn clone_opaque(&self, value: &OpaqueValue) -> Result<PlainValue, MalformedInputError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RejectOpaque;

impl OpaqueStrategy for RejectOpaque {
    fn clone_opaque(&self, value: &OpaqueValue) -> Result<PlainValue, MalformedInputError> {
        Err(MalformedInputError::Opaque {
            type_name: value.type_name(),
        })
    }
}

/// Keeps the same handle in the copy. Only sound for immutable payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareOpaque;

impl OpaqueStrategy for ShareOpaque {
    fn clone_opaque(&self, value: &OpaqueValue) -> Result<PlainValue, MalformedInputError> {
        Ok(PlainValue::Opaque(value.clone()))
    }
}

impl<F> OpaqueStrategy for F
where
    F: Fn(&OpaqueValue) -> Result<PlainValue, MalformedInputError>,
{
    fn clone_opaque(&self, value: &OpaqueValue) -> Result<PlainValue, MalformedInputError> {
        self(value)
    }
}

pub fn deep_clone(value: &PlainValue) -> Result<PlainValue, MalformedInputError> {
    deep_clone_with(value, &RejectOpaque)
}

pub fn deep_clone_with<S>(
    value: &PlainValue,
    strategy: &S,
) -> Result<PlainValue, MalformedInputError>
where
    S: OpaqueStrategy + ?Sized,
{
    clone_at_depth(value, strategy, 0)
}

fn clone_at_depth<S>(
    value: &PlainValue,
    strategy: &S,
    depth: usize,
) -> Result<PlainValue, MalformedInputError>
where
    S: OpaqueStrategy + ?Sized,
{
    if depth > MAX_DEPTH {
        return Err(MalformedInputError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(match value {
        PlainValue::Null => PlainValue::Null,
        PlainValue::Bool(b) => PlainValue::Bool(*b),
        PlainValue::Number(n) => PlainValue::Number(n.clone()),
        PlainValue::String(s) => PlainValue::String(s.clone()),
        PlainValue::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(clone_at_depth(item, strategy, depth + 1)?);
            }
            PlainValue::Sequence(out)
        }
        PlainValue::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key.clone(), clone_at_depth(item, strategy, depth + 1)?);
            }
            PlainValue::Mapping(out)
        }
        PlainValue::Opaque(opaque) => strategy.clone_opaque(opaque)?,
    })
}
