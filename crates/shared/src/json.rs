//! Typed field readers over JSON objects
//!
//! Every structural decoder goes through [`Fields`], so a missing or
//! ill-typed field always surfaces as a `MalformedDocument` error that names
//! the full path of the offending field (`payload.file.fileCode`,
//! `members[2]`, ...).

use crate::error::{CubeError, MalformedDocumentError, Result};
use crate::jsonable::FromJson;
use serde_json::{Map, Value};

/// A JSON object
pub type JsonObject = Map<String, Value>;

/// Read-only view over a JSON object that reports errors with field paths
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    object: &'a JsonObject,
    path: Option<String>,
}

impl<'a> Fields<'a> {
    /// View a document as an object
    pub fn of(json: &'a Value) -> Result<Self> {
        match json {
            Value::Object(object) => Ok(Self { object, path: None }),
            _ => Err(MalformedDocumentError::wrong_type("$", "an object").into()),
        }
    }

    /// The underlying object
    pub fn object(&self) -> &'a JsonObject {
        self.object
    }

    fn qualify(&self, field: &str) -> String {
        match &self.path {
            Some(path) => format!("{}.{}", path, field),
            None => field.to_string(),
        }
    }

    fn missing(&self, field: &str) -> CubeError {
        MalformedDocumentError::missing(self.qualify(field)).into()
    }

    fn wrong_type(&self, field: &str, expected: &str) -> CubeError {
        MalformedDocumentError::wrong_type(self.qualify(field), expected).into()
    }

    /// Whether the field is present and not null
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field value; null counts as absent
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|v| !v.is_null())
    }

    pub fn value(&self, field: &str) -> Result<&'a Value> {
        self.get(field).ok_or_else(|| self.missing(field))
    }

    // ========== Strings ==========

    pub fn str(&self, field: &str) -> Result<&'a str> {
        self.value(field)?
            .as_str()
            .ok_or_else(|| self.wrong_type(field, "a string"))
    }

    pub fn string(&self, field: &str) -> Result<String> {
        self.str(field).map(str::to_string)
    }

    pub fn opt_string(&self, field: &str) -> Result<Option<String>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.string(field).map(Some),
        }
    }

    // ========== Numbers ==========

    pub fn i64(&self, field: &str) -> Result<i64> {
        self.value(field)?
            .as_i64()
            .ok_or_else(|| self.wrong_type(field, "an integer"))
    }

    pub fn opt_i64(&self, field: &str) -> Result<Option<i64>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.i64(field).map(Some),
        }
    }

    pub fn i32(&self, field: &str) -> Result<i32> {
        i32::try_from(self.i64(field)?).map_err(|_| self.wrong_type(field, "a 32-bit integer"))
    }

    pub fn opt_i32(&self, field: &str) -> Result<Option<i32>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.i32(field).map(Some),
        }
    }

    pub fn f64(&self, field: &str) -> Result<f64> {
        self.value(field)?
            .as_f64()
            .ok_or_else(|| self.wrong_type(field, "a number"))
    }

    pub fn opt_f64(&self, field: &str) -> Result<Option<f64>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.f64(field).map(Some),
        }
    }

    // ========== Booleans ==========

    pub fn bool(&self, field: &str) -> Result<bool> {
        self.value(field)?
            .as_bool()
            .ok_or_else(|| self.wrong_type(field, "a boolean"))
    }

    pub fn opt_bool(&self, field: &str) -> Result<Option<bool>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.bool(field).map(Some),
        }
    }

    // ========== Containers ==========

    /// View a required nested object; errors inside it carry the parent path
    pub fn nested(&self, field: &str) -> Result<Fields<'a>> {
        match self.value(field)? {
            Value::Object(object) => Ok(Fields {
                object,
                path: Some(self.qualify(field)),
            }),
            _ => Err(self.wrong_type(field, "an object")),
        }
    }

    /// Raw object value, kept as JSON (context blobs and the like)
    pub fn opt_object_value(&self, field: &str) -> Result<Option<Value>> {
        match self.get(field) {
            None => Ok(None),
            Some(value @ Value::Object(_)) => Ok(Some(value.clone())),
            Some(_) => Err(self.wrong_type(field, "an object")),
        }
    }

    pub fn array(&self, field: &str) -> Result<&'a Vec<Value>> {
        self.value(field)?
            .as_array()
            .ok_or_else(|| self.wrong_type(field, "an array"))
    }

    pub fn opt_array(&self, field: &str) -> Result<Option<&'a Vec<Value>>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.array(field).map(Some),
        }
    }

    /// Integer array such as a member id list
    pub fn i64_array(&self, field: &str) -> Result<Vec<i64>> {
        self.array(field)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_i64()
                    .ok_or_else(|| self.wrong_type(&format!("{}[{}]", field, i), "an integer"))
            })
            .collect()
    }

    // ========== Nested entities ==========

    /// Decode a required nested entity
    pub fn entity<T: FromJson>(&self, field: &str) -> Result<T> {
        let value = self.value(field)?;
        T::from_json(value).map_err(|e| nest(e, &self.qualify(field)))
    }

    /// Decode an optional nested entity
    pub fn opt_entity<T: FromJson>(&self, field: &str) -> Result<Option<T>> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.entity(field).map(Some),
        }
    }

    /// Decode a required array of nested entities
    pub fn entities<T: FromJson>(&self, field: &str) -> Result<Vec<T>> {
        let qualified = self.qualify(field);
        self.array(field)?
            .iter()
            .enumerate()
            .map(|(i, v)| T::from_json(v).map_err(|e| nest(e, &format!("{}[{}]", qualified, i))))
            .collect()
    }

    /// Decode an optional array of nested entities; absent means empty
    pub fn opt_entities<T: FromJson>(&self, field: &str) -> Result<Vec<T>> {
        if self.has(field) {
            self.entities(field)
        } else {
            Ok(Vec::new())
        }
    }
}

/// Prefix the field path of a nested decoding error with its parent field
pub fn nest(err: CubeError, parent: &str) -> CubeError {
    match err {
        CubeError::MalformedDocument(mut e) => {
            e.field = if e.field == "$" {
                parent.to_string()
            } else {
                format!("{}.{}", parent, e.field)
            };
            CubeError::MalformedDocument(e)
        }
        other => other,
    }
}

/// Insert a value only when it is present
pub fn put_opt<V: Into<Value>>(object: &mut JsonObject, key: &str, value: Option<V>) {
    if let Some(value) = value {
        object.insert(key.to_string(), value.into());
    }
}

/// Unwrap a `Value` built with `json!({...})` into its object
pub fn into_object(value: Value) -> JsonObject {
    match value {
        Value::Object(object) => object,
        _ => JsonObject::new(),
    }
}
