//! Widget payloads and their tag registry
//!
//! Widgets name their variant explicitly in `widgetType`. The registry maps
//! each tag to a constructor; an absent or unregistered tag is an
//! `UnknownVariant` error, never a default widget.

use crate::file_label::FileLabel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::json::{into_object, put_opt};
use shared::{
    FromJson, JsonObject, Jsonable, MalformedDocumentError, Result, Shape, UnknownVariantError,
};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Discriminator field
pub const WIDGET_TYPE: &str = "widgetType";

/// Family name reported in `UnknownVariant` errors
pub const WIDGET_FAMILY: &str = "Widget";

/// Plain text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextWidget {
    pub text: String,
    /// Markup of `text`, e.g. `"markdown"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TextWidget {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
        }
    }
}

/// Link card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWidget {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl LinkWidget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }
}

shared::impl_serde_jsonable!(TextWidget, LinkWidget);

/// Image backed by a stored file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageWidget {
    pub file: FileLabel,
    pub caption: Option<String>,
}

impl ImageWidget {
    pub fn new(file: FileLabel) -> Self {
        Self {
            file,
            caption: None,
        }
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = JsonObject::new();
        object.insert("file".to_string(), self.file.to_shape(shape));
        put_opt(&mut object, "caption", self.caption.clone());
        Value::Object(object)
    }
}

impl Jsonable for ImageWidget {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for ImageWidget {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = shared::Fields::of(json)?;
        Ok(Self {
            file: fields.entity("file")?,
            caption: fields.opt_string("caption")?,
        })
    }
}

/// Widget of an application-registered type, kept as raw JSON
#[derive(Debug, Clone, PartialEq)]
pub struct CustomWidget {
    pub widget_type: String,
    /// Document fields other than `widgetType`
    pub data: JsonObject,
}

/// Any widget payload
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Text(TextWidget),
    Image(ImageWidget),
    Link(LinkWidget),
    Custom(CustomWidget),
}

impl Widget {
    pub fn widget_type(&self) -> &str {
        match self {
            Widget::Text(_) => "Text",
            Widget::Image(_) => "Image",
            Widget::Link(_) => "Link",
            Widget::Custom(custom) => &custom.widget_type,
        }
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = match self {
            Widget::Text(text) => into_object(text.to_shape(shape)),
            Widget::Image(image) => into_object(image.to_shape(shape)),
            Widget::Link(link) => into_object(link.to_shape(shape)),
            Widget::Custom(custom) => custom.data.clone(),
        };
        object.insert(WIDGET_TYPE.to_string(), Value::from(self.widget_type()));
        Value::Object(object)
    }
}

impl Jsonable for Widget {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for Widget {
    /// Resolves through the built-in registry
    fn from_json(json: &Value) -> Result<Self> {
        WidgetRegistry::default().resolve(json)
    }
}

/// Builds a widget from its document
pub type WidgetConstructor = fn(&Value) -> Result<Widget>;

fn build_text(json: &Value) -> Result<Widget> {
    TextWidget::from_json(json).map(Widget::Text)
}

fn build_image(json: &Value) -> Result<Widget> {
    ImageWidget::from_json(json).map(Widget::Image)
}

fn build_link(json: &Value) -> Result<Widget> {
    LinkWidget::from_json(json).map(Widget::Link)
}

/// Constructor for tags whose content is kept verbatim
pub fn build_custom(json: &Value) -> Result<Widget> {
    let mut data = json
        .as_object()
        .cloned()
        .ok_or_else(|| MalformedDocumentError::wrong_type("$", "an object"))?;
    let widget_type = match data.remove(WIDGET_TYPE) {
        Some(Value::String(tag)) => tag,
        _ => return Err(MalformedDocumentError::missing(WIDGET_TYPE).into()),
    };
    Ok(Widget::Custom(CustomWidget { widget_type, data }))
}

/// Maps `widgetType` tags to constructors
#[derive(Clone)]
pub struct WidgetRegistry {
    constructors: HashMap<String, WidgetConstructor>,
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry").field("tags", &self.tags()).finish()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("Text", build_text);
        registry.register("Image", build_image);
        registry.register("Link", build_link);
        registry
    }
}

impl WidgetRegistry {
    /// Registry without the built-in widgets
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor, replacing any previous one for the tag
    pub fn register(&mut self, tag: impl Into<String>, constructor: WidgetConstructor) {
        self.constructors.insert(tag.into(), constructor);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn resolve(&self, json: &Value) -> Result<Widget> {
        let tag = json
            .as_object()
            .ok_or_else(|| MalformedDocumentError::wrong_type("$", "an object"))?
            .get(WIDGET_TYPE)
            .and_then(Value::as_str)
            .ok_or_else(|| UnknownVariantError::new(WIDGET_FAMILY, "<absent>"))?;

        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| UnknownVariantError::new(WIDGET_FAMILY, tag))?;

        debug!(widget_type = tag, "Resolving widget");
        constructor(json)
    }
}
