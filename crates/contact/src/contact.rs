//! Contact and AnonymousContact
//!
//! Both share the profile fields of every contact-like entity (display
//! name, context blob, external id); groups reuse the same profile.

use crate::device::Device;
use regex::Regex;
use serde_json::Value;
use shared::json::put_opt;
use shared::{shape_all, EntityBase, Fields, FromJson, JsonObject, Jsonable, Result, Shape};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s").expect("whitespace pattern is valid"));

/// Strip all whitespace from a display name
fn sanitize_name(name: &str) -> String {
    WHITESPACE.replace_all(name, "").into_owned()
}

/// Profile fields shared by contacts, anonymous contacts and groups
#[derive(Debug, Clone, PartialEq)]
pub struct ContactProfile {
    /// Display name
    name: String,
    /// Free-form JSON context (avatar, badges, ...)
    context: Option<Value>,
    /// Identifier in an external system
    external_id: Option<String>,
}

impl ContactProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
            external_id: None,
        }
    }

    pub fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            name: fields.string("name")?,
            context: fields.opt_object_value("context")?,
            external_id: fields.opt_string("externalId")?,
        })
    }

    pub fn write_into(&self, object: &mut JsonObject) {
        object.insert("name".to_string(), Value::from(self.name.clone()));
        put_opt(object, "context", self.context.clone());
        put_opt(object, "externalId", self.external_id.clone());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Rename; whitespace is stripped. Returns `false` if the name is
    /// unchanged.
    pub fn set_name(&mut self, name: &str) -> bool {
        if self.name == name {
            return false;
        }
        self.name = sanitize_name(name);
        true
    }

    pub fn set_context(&mut self, context: Option<Value>) {
        self.context = context;
    }

    pub fn set_external_id(&mut self, external_id: Option<String>) {
        self.external_id = external_id;
    }
}

// ============================================================================
// Contact
// ============================================================================

/// A registered contact
#[derive(Debug, Clone)]
pub struct Contact {
    base: EntityBase,
    profile: ContactProfile,
    /// Devices currently signed in
    devices: Vec<Device>,
}

impl Contact {
    pub fn new(base: EntityBase, name: impl Into<String>) -> Self {
        Self {
            base,
            profile: ContactProfile::new(name),
            devices: Vec::new(),
        }
    }

    /// Builder: add a device
    pub fn with_device(mut self, device: Device) -> Self {
        self.add_device(device);
        self
    }

    /// Builder: set external id
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.profile.set_external_id(Some(external_id.into()));
        self
    }

    /// Builder: set context
    pub fn with_context(mut self, context: Value) -> Self {
        self.profile.set_context(Some(context));
        self
    }

    pub fn profile(&self) -> &ContactProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut ContactProfile {
        &mut self.profile
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Add a device, replacing an existing record of the same device
    pub fn add_device(&mut self, device: Device) {
        self.devices.retain(|d| !d.same_device(&device));
        self.devices.push(device);
    }

    /// Remove a device; returns whether it was present
    pub fn remove_device(&mut self, device: &Device) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| !d.same_device(device));
        self.devices.len() != before
    }

    fn to_object(&self, shape: Shape) -> JsonObject {
        let mut object = self.base.to_object();
        self.profile.write_into(&mut object);
        if !shape.is_compact() {
            object.insert("devices".to_string(), shape_all(&self.devices, shape));
        }
        object
    }
}

impl Jsonable for Contact {
    fn to_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Full))
    }

    fn to_compact_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Compact))
    }
}

impl FromJson for Contact {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            profile: ContactProfile::from_fields(&fields)?,
            devices: fields.opt_entities("devices")?,
        })
    }
}

shared::impl_entity!(Contact);

// ============================================================================
// AnonymousContact
// ============================================================================

/// A contact without a registered account (guests, visitors)
#[derive(Debug, Clone)]
pub struct AnonymousContact {
    base: EntityBase,
    profile: ContactProfile,
}

impl AnonymousContact {
    pub fn new(base: EntityBase, name: impl Into<String>) -> Self {
        Self {
            base,
            profile: ContactProfile::new(name),
        }
    }

    pub fn profile(&self) -> &ContactProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    /// Structural probe: the document carries `"anonymous": true`
    pub fn is_anonymous(fields: &Fields<'_>) -> bool {
        fields
            .get("anonymous")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl Jsonable for AnonymousContact {
    fn to_json(&self) -> Value {
        let mut object = self.base.to_object();
        self.profile.write_into(&mut object);
        object.insert("anonymous".to_string(), Value::Bool(true));
        Value::Object(object)
    }
}

impl FromJson for AnonymousContact {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            profile: ContactProfile::from_fields(&fields)?,
        })
    }
}

shared::impl_entity!(AnonymousContact);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::Entity;

    fn alice() -> Contact {
        Contact::new(EntityBase::new(50001001, "shixincube.com").with_timestamp(1000), "Alice")
            .with_external_id("wx-alice")
            .with_context(json!({"avatar": "default"}))
            .with_device(Device::new("Chrome", "Web"))
    }

    // ============== Contact Tests ==============

    #[test]
    fn test_contact_full_shape() {
        let json = alice().to_json();
        assert_eq!(json["id"], 50001001);
        assert_eq!(json["domain"], "shixincube.com");
        assert_eq!(json["timestamp"], 1000);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["externalId"], "wx-alice");
        assert_eq!(json["context"]["avatar"], "default");
        assert_eq!(json["devices"][0]["name"], "Chrome");
    }

    #[test]
    fn test_contact_compact_drops_devices() {
        let json = alice().to_compact_json();
        assert!(json.get("devices").is_none());
        assert_eq!(json["name"], "Alice");
    }

    #[test]
    fn test_contact_round_trip() {
        let contact = alice();
        let parsed = Contact::from_json(&contact.to_json()).unwrap();
        assert_eq!(parsed, contact);
        assert_eq!(parsed.to_json(), contact.to_json());
        assert_eq!(parsed.devices().len(), 1);
    }

    #[test]
    fn test_contact_missing_name() {
        let err = Contact::from_json(&json!({"id": 1, "domain": "d"})).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_contact_bad_device() {
        let err = Contact::from_json(&json!({
            "id": 1,
            "name": "Bob",
            "devices": [{"name": "Chrome"}]
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("devices[0].platform"));
    }

    #[test]
    fn test_contact_generated_id() {
        let contact = Contact::from_json(&json!({"name": "Bob"})).unwrap();
        assert!(contact.id() > 0);
        assert_eq!(contact.domain(), "");
    }

    #[test]
    fn test_set_name_strips_whitespace() {
        let mut contact = alice();
        assert!(contact.profile_mut().set_name("Alice  Liu\t"));
        assert_eq!(contact.name(), "AliceLiu");
        assert!(!contact.profile_mut().set_name("AliceLiu"));
    }

    #[test]
    fn test_add_device_replaces_same_device() {
        let mut contact = alice();
        contact.add_device(Device::new("Chrome", "Web").with_endpoint("1.1.1.1", 80));
        assert_eq!(contact.devices().len(), 1);
        assert_eq!(contact.devices()[0].port, Some(80));

        assert!(contact.remove_device(&Device::new("Chrome", "Web")));
        assert!(contact.devices().is_empty());
        assert!(!contact.remove_device(&Device::new("Chrome", "Web")));
    }

    // ============== AnonymousContact Tests ==============

    #[test]
    fn test_anonymous_shape() {
        let guest = AnonymousContact::new(EntityBase::new(9, "demo"), "Guest");
        let json = guest.to_json();
        assert_eq!(json, json!({"id": 9, "domain": "demo", "name": "Guest", "anonymous": true}));
        assert_eq!(guest.to_compact_json(), json);
        assert_eq!(AnonymousContact::from_json(&json).unwrap(), guest);
    }

    #[test]
    fn test_anonymous_probe() {
        let yes = json!({"anonymous": true});
        let no = json!({"anonymous": false});
        let text = json!({"anonymous": "true"});
        assert!(AnonymousContact::is_anonymous(&Fields::of(&yes).unwrap()));
        assert!(!AnonymousContact::is_anonymous(&Fields::of(&no).unwrap()));
        assert!(!AnonymousContact::is_anonymous(&Fields::of(&text).unwrap()));
    }
}
