//! Contact behavior events (sign-in, sign-out, device changes, ...)

use crate::contact::Contact;
use crate::device::Device;
use serde_json::Value;
use shared::json::put_opt;
use shared::{EntityBase, Fields, FromJson, Jsonable, Result, Shape};

/// Something a contact did, optionally on a specific device
#[derive(Debug, Clone)]
pub struct ContactBehavior {
    base: EntityBase,
    contact: Contact,
    /// Behavior name, e.g. `"SignIn"`
    behavior: String,
    device: Option<Device>,
    /// Behavior-specific payload
    data: Option<Value>,
}

impl ContactBehavior {
    pub fn new(contact: Contact, behavior: impl Into<String>) -> Self {
        let base = EntityBase::generate(shared::Entity::domain(&contact)).stamped_now();
        Self {
            base,
            contact,
            behavior: behavior.into(),
            device: None,
            data: None,
        }
    }

    /// Builder: attach behavior data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = Some(device);
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = self.base.to_object();
        object.insert("contact".to_string(), self.contact.to_shape(shape));
        object.insert("behavior".to_string(), Value::from(self.behavior.clone()));
        put_opt(&mut object, "device", self.device.as_ref().map(Jsonable::to_json));
        if !shape.is_compact() {
            put_opt(&mut object, "data", self.data.clone());
        }
        Value::Object(object)
    }
}

impl Jsonable for ContactBehavior {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for ContactBehavior {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            contact: fields.entity("contact")?,
            behavior: fields.string("behavior")?,
            device: fields.opt_entity("device")?,
            data: fields.get("data").cloned(),
        })
    }
}

shared::impl_entity!(ContactBehavior);
