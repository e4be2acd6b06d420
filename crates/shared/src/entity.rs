//! Base entity: identity, owning domain and optional timestamp
//!
//! Concrete entities embed an [`EntityBase`] and implement [`Entity`].
//! Identity is `(id, domain)`: two values with the same id in the same domain
//! are the same entity even if their other fields differ.

use crate::error::Result;
use crate::json::{Fields, JsonObject};
use crate::jsonable::{FromJson, Jsonable};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_SERIAL: AtomicI64 = AtomicI64::new(0);

/// Generate a process-unique, increasing serial number for entity ids.
///
/// The value is the current Unix time in milliseconds scaled by 1000, bumped
/// past the previously issued number when several ids fall in the same
/// millisecond.
pub fn generate_serial_number() -> i64 {
    let candidate = chrono::Utc::now().timestamp_millis() * 1000;
    let previous = LAST_SERIAL
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(candidate.max(last + 1))
        })
        .unwrap_or(candidate);
    candidate.max(previous + 1)
}

/// Current time in Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fields shared by every entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityBase {
    id: i64,
    domain: String,
    timestamp: Option<i64>,
}

impl EntityBase {
    /// Create a base with an explicit id
    pub fn new(id: i64, domain: impl Into<String>) -> Self {
        Self {
            id,
            domain: domain.into(),
            timestamp: None,
        }
    }

    /// Create a base with a freshly generated id
    pub fn generate(domain: impl Into<String>) -> Self {
        Self::new(generate_serial_number(), domain)
    }

    /// Builder: set timestamp
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builder: stamp with the current time
    pub fn stamped_now(self) -> Self {
        self.with_timestamp(now_millis())
    }

    /// Read `id`, `domain` and `timestamp` from a document. A missing id is
    /// generated; a missing domain is empty.
    pub fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        let id = match fields.opt_i64("id")? {
            Some(id) => id,
            None => generate_serial_number(),
        };
        Ok(Self {
            id,
            domain: fields.opt_string("domain")?.unwrap_or_default(),
            timestamp: fields.opt_i64("timestamp")?,
        })
    }

    /// Write `id`, `domain` and (when set) `timestamp`
    pub fn write_into(&self, object: &mut JsonObject) {
        object.insert("id".to_string(), Value::from(self.id));
        object.insert("domain".to_string(), Value::from(self.domain.clone()));
        if let Some(timestamp) = self.timestamp {
            object.insert("timestamp".to_string(), Value::from(timestamp));
        }
    }

    /// Start a document with the base fields already written
    pub fn to_object(&self) -> JsonObject {
        let mut object = JsonObject::new();
        self.write_into(&mut object);
        object
    }

    // ========== Getters ==========

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Index key combining id and domain
    pub fn unique_key(&self) -> String {
        format!("{}_{}", self.id, self.domain)
    }

    /// Identity comparison: same id within the same domain
    pub fn same_identity(&self, other: &EntityBase) -> bool {
        self.id == other.id && self.domain == other.domain
    }

    // ========== Setters ==========

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = Some(timestamp);
    }

    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
    }
}

impl Jsonable for EntityBase {
    fn to_json(&self) -> Value {
        Value::Object(self.to_object())
    }
}

impl FromJson for EntityBase {
    fn from_json(json: &Value) -> Result<Self> {
        Self::from_fields(&Fields::of(json)?)
    }
}

/// An identified, domain-scoped entity
pub trait Entity: Jsonable {
    fn base(&self) -> &EntityBase;

    fn id(&self) -> i64 {
        self.base().id()
    }

    fn domain(&self) -> &str {
        self.base().domain()
    }

    fn timestamp(&self) -> Option<i64> {
        self.base().timestamp()
    }

    fn unique_key(&self) -> String {
        self.base().unique_key()
    }
}

/// Implement [`Entity`] over a `base` field plus identity equality and
/// hashing (`PartialEq`/`Eq`/`Hash` by id and domain)
#[macro_export]
macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Entity for $ty {
                fn base(&self) -> &$crate::EntityBase {
                    &self.base
                }
            }

            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    self.base.same_identity(&other.base)
                }
            }

            impl Eq for $ty {}

            impl ::std::hash::Hash for $ty {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    ::std::hash::Hash::hash(&self.base.id(), state);
                    ::std::hash::Hash::hash(self.base.domain(), state);
                }
            }
        )+
    };
}
