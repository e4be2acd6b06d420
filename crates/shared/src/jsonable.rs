//! The dual-shape serialization contract
//!
//! Every entity produces a *full* document (lossless: decoding it yields an
//! equivalent entity) and a *compact* document (bulky or derivable nested
//! detail reduced). Containers pass the requested [`Shape`] down to their
//! children, so a compact document never embeds a full-shaped child.

use crate::error::{MalformedDocumentError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Which of the two serialization shapes to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// All declared fields, nested entities in full shape
    #[default]
    Full,
    /// Nested entities in their own compact shape, bulky fields dropped
    Compact,
}

impl Shape {
    pub fn is_compact(&self) -> bool {
        matches!(self, Shape::Compact)
    }
}

/// Produce the full and compact JSON shapes of a value
pub trait Jsonable {
    /// Full shape
    fn to_json(&self) -> Value;

    /// Compact shape; defaults to the full shape
    fn to_compact_json(&self) -> Value {
        self.to_json()
    }

    /// Shape selected at runtime; containers use this to propagate the
    /// parent's shape to nested entities
    fn to_shape(&self, shape: Shape) -> Value {
        match shape {
            Shape::Full => self.to_json(),
            Shape::Compact => self.to_compact_json(),
        }
    }
}

/// Construct a value from a JSON document
pub trait FromJson: Sized {
    fn from_json(json: &Value) -> Result<Self>;
}

/// Serialize a slice of entities as an array in the given shape
pub fn shape_all<T: Jsonable>(items: &[T], shape: Shape) -> Value {
    Value::Array(items.iter().map(|item| item.to_shape(shape)).collect())
}

/// Serialize a serde-backed record; records only hold string-keyed data, so
/// conversion cannot fail in practice
pub fn to_serde<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

/// Decode a serde-backed record, reporting failures as malformed documents
pub fn from_serde<T: DeserializeOwned>(json: &Value) -> Result<T> {
    if !json.is_object() {
        return Err(MalformedDocumentError::wrong_type("$", "an object").into());
    }
    serde_json::from_value(json.clone()).map_err(|e| {
        let message = e.to_string();
        let field = offending_field(&message).unwrap_or_else(|| short_type_name::<T>().to_string());
        MalformedDocumentError::new(field, message).into()
    })
}

/// serde reports missing fields as "missing field `name`"
fn offending_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Implement [`Jsonable`] and [`FromJson`] for serde-derived value records,
/// whose full and compact shapes coincide
#[macro_export]
macro_rules! impl_serde_jsonable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Jsonable for $ty {
                fn to_json(&self) -> ::serde_json::Value {
                    $crate::jsonable::to_serde(self)
                }
            }

            impl $crate::FromJson for $ty {
                fn from_json(json: &::serde_json::Value) -> $crate::Result<Self> {
                    $crate::jsonable::from_serde(json)
                }
            }
        )+
    };
}
