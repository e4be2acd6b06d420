//! Complex resources: `{..base, subject, payload}` wrappers
//!
//! The subject is read and checked by the concrete type the caller parses
//! with; a document is never inspected to guess its subject.

use crate::file_label::FileLabel;
use crate::widget::{Widget, WidgetRegistry};
use regex::Regex;
use serde_json::Value;
use shared::json::{nest, put_opt};
use std::sync::LazyLock;
use shared::{EntityBase, Fields, FromJson, JsonObject, Jsonable, MalformedDocumentError, Result, Shape};
use std::fmt;

/// Resource subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    File,
    Hyperlink,
    Chart,
    Attachment,
    Widget,
}

impl Subject {
    pub const ALL: &'static [Subject] = &[
        Subject::File,
        Subject::Hyperlink,
        Subject::Chart,
        Subject::Attachment,
        Subject::Widget,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Subject::File => "File",
            Subject::Hyperlink => "Hyperlink",
            Subject::Chart => "Chart",
            Subject::Attachment => "Attachment",
            Subject::Widget => "Widget",
        }
    }

    /// Case-insensitive lookup; there is no fallback subject
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Read `subject` and require it to be `expected`
fn expect_subject(fields: &Fields<'_>, expected: Subject) -> Result<()> {
    let raw = fields.str("subject")?;
    match Subject::parse(raw) {
        Some(subject) if subject == expected => Ok(()),
        _ => Err(MalformedDocumentError::new(
            "subject",
            format!("is '{}', expected '{}'", raw, expected),
        )
        .into()),
    }
}

/// Base fields plus `subject`
fn resource_object(base: &EntityBase, subject: Subject) -> JsonObject {
    let mut object = base.to_object();
    object.insert("subject".to_string(), Value::from(subject.name()));
    object
}

// ============================================================================
// FileResource
// ============================================================================

/// A stored file
#[derive(Debug, Clone)]
pub struct FileResource {
    base: EntityBase,
    file: FileLabel,
}

impl FileResource {
    pub fn new(file: FileLabel) -> Self {
        Self {
            base: EntityBase::generate(shared::Entity::domain(&file)),
            file,
        }
    }

    pub fn file(&self) -> &FileLabel {
        &self.file
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = resource_object(&self.base, Subject::File);
        object.insert("payload".to_string(), self.file.to_shape(shape));
        Value::Object(object)
    }
}

impl Jsonable for FileResource {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for FileResource {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        expect_subject(&fields, Subject::File)?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            file: fields.entity("payload")?,
        })
    }
}

shared::impl_entity!(FileResource);

// ============================================================================
// HyperlinkResource
// ============================================================================

/// Link meta types
pub mod meta_type {
    pub const PAGE: &str = "page";
    pub const PLAIN: &str = "plain";
    pub const IMAGE: &str = "image";
    pub const VIDEO: &str = "video";
    pub const AUDIO: &str = "audio";
    pub const OTHER: &str = "other";
    pub const FAILURE: &str = "failure";
}

static URL_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*://)?(?:[^@/?#]*@)?([^:/?#]+)")
        .expect("URL host pattern is valid")
});

/// Host part of a URL, without scheme, credentials or port
pub fn extract_domain(url: &str) -> String {
    URL_HOST
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Media dimensions of an image or video link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFormat {
    pub width: i32,
    pub height: i32,
    pub format: String,
}

/// A web resource referenced by URL
#[derive(Debug, Clone)]
pub struct HyperlinkResource {
    base: EntityBase,
    pub url: String,
    pub site: String,
    /// One of [`meta_type`]
    pub meta_type: String,
    pub mime_type: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub illustration: Option<String>,
    /// Local cache path
    pub path: Option<String>,
    pub size: i64,
    pub num_words: i32,
    pub media: Option<MediaFormat>,
    pub thumbnail: Option<String>,
}

impl HyperlinkResource {
    pub fn new(url: impl Into<String>, meta_type: impl Into<String>) -> Self {
        let url = url.into();
        let site = extract_domain(&url);
        Self {
            base: EntityBase::generate(""),
            content: Some(format!("[{}]({})", site, url)),
            site,
            url,
            meta_type: meta_type.into(),
            mime_type: "text/plain".to_string(),
            title: None,
            illustration: None,
            path: None,
            size: 0,
            num_words: 0,
            media: None,
            thumbnail: None,
        }
    }

    /// Declared word count, or the content length when none was declared
    pub fn num_words(&self) -> usize {
        match (self.num_words, &self.content) {
            (0, Some(content)) => content.chars().count(),
            (n, _) => usize::try_from(n).unwrap_or(0),
        }
    }

    /// Trim every content line and drop lines shorter than two characters
    pub fn fix_content(&mut self) {
        if let Some(content) = &self.content {
            let lines: Vec<&str> = content
                .lines()
                .map(str::trim)
                .filter(|line| line.chars().count() >= 2)
                .collect();
            self.content = Some(lines.join("\n"));
        }
    }

    fn payload(&self, shape: Shape) -> JsonObject {
        let mut payload = JsonObject::new();
        payload.insert("url".to_string(), Value::from(self.url.clone()));
        payload.insert("site".to_string(), Value::from(self.site.clone()));
        payload.insert("metaType".to_string(), Value::from(self.meta_type.clone()));
        payload.insert("mimeType".to_string(), Value::from(self.mime_type.clone()));
        put_opt(&mut payload, "title", self.title.clone());
        put_opt(&mut payload, "content", self.content.clone());
        put_opt(&mut payload, "illustration", self.illustration.clone());
        if self.num_words > 0 {
            payload.insert("numWords".to_string(), Value::from(self.num_words));
        }
        if !shape.is_compact() {
            put_opt(&mut payload, "path", self.path.clone());
        }
        if self.size > 0 {
            payload.insert("size".to_string(), Value::from(self.size));
        }
        if let Some(media) = &self.media {
            payload.insert("width".to_string(), Value::from(media.width));
            payload.insert("height".to_string(), Value::from(media.height));
            payload.insert("format".to_string(), Value::from(media.format.clone()));
        }
        put_opt(&mut payload, "thumbnail", self.thumbnail.clone());
        payload
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = resource_object(&self.base, Subject::Hyperlink);
        object.insert("payload".to_string(), Value::Object(self.payload(shape)));
        Value::Object(object)
    }
}

impl Jsonable for HyperlinkResource {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for HyperlinkResource {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        expect_subject(&fields, Subject::Hyperlink)?;
        let base = EntityBase::from_fields(&fields)?;
        let payload = fields.nested("payload")?;

        let url = payload.opt_string("url")?.unwrap_or_default();
        let site = match payload.opt_string("site")? {
            Some(site) => site,
            None => extract_domain(&url),
        };
        let media = match payload.opt_string("format")? {
            Some(format) => Some(MediaFormat {
                width: payload.opt_i32("width")?.unwrap_or(0),
                height: payload.opt_i32("height")?.unwrap_or(0),
                format,
            }),
            None => None,
        };

        Ok(Self {
            base,
            url,
            site,
            meta_type: payload.string("metaType")?,
            mime_type: payload.string("mimeType")?,
            title: payload.opt_string("title")?,
            content: payload.opt_string("content")?,
            illustration: payload.opt_string("illustration")?,
            path: payload.opt_string("path")?,
            size: payload.opt_i64("size")?.unwrap_or(0),
            num_words: payload.opt_i32("numWords")?.unwrap_or(0),
            media,
            thumbnail: payload.opt_string("thumbnail")?,
        })
    }
}

shared::impl_entity!(HyperlinkResource);

// ============================================================================
// WidgetResource
// ============================================================================

/// A UI widget
#[derive(Debug, Clone)]
pub struct WidgetResource {
    base: EntityBase,
    widget: Widget,
}

impl WidgetResource {
    pub fn new(base: EntityBase, widget: Widget) -> Self {
        Self { base, widget }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = resource_object(&self.base, Subject::Widget);
        object.insert("payload".to_string(), self.widget.to_shape(shape));
        Value::Object(object)
    }
}

impl Jsonable for WidgetResource {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl WidgetResource {
    /// Decode with a caller's registry, so widgets of registered custom
    /// tags round-trip
    pub fn from_json_with(json: &Value, registry: &WidgetRegistry) -> Result<Self> {
        let fields = Fields::of(json)?;
        expect_subject(&fields, Subject::Widget)?;
        let widget = registry
            .resolve(fields.value("payload")?)
            .map_err(|e| nest(e, "payload"))?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            widget,
        })
    }
}

impl FromJson for WidgetResource {
    /// Decodes with the built-in widgets only
    fn from_json(json: &Value) -> Result<Self> {
        Self::from_json_with(json, &WidgetRegistry::default())
    }
}

shared::impl_entity!(WidgetResource);

// ============================================================================
// ComplexResource
// ============================================================================

/// Any complex resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexResource {
    File(FileResource),
    Hyperlink(HyperlinkResource),
    Widget(WidgetResource),
}

impl ComplexResource {
    pub fn subject(&self) -> Subject {
        match self {
            ComplexResource::File(_) => Subject::File,
            ComplexResource::Hyperlink(_) => Subject::Hyperlink,
            ComplexResource::Widget(_) => Subject::Widget,
        }
    }
}

impl Jsonable for ComplexResource {
    fn to_json(&self) -> Value {
        match self {
            ComplexResource::File(r) => r.to_json(),
            ComplexResource::Hyperlink(r) => r.to_json(),
            ComplexResource::Widget(r) => r.to_json(),
        }
    }

    fn to_compact_json(&self) -> Value {
        match self {
            ComplexResource::File(r) => r.to_compact_json(),
            ComplexResource::Hyperlink(r) => r.to_compact_json(),
            ComplexResource::Widget(r) => r.to_compact_json(),
        }
    }
}

impl shared::Entity for ComplexResource {
    fn base(&self) -> &EntityBase {
        match self {
            ComplexResource::File(r) => &r.base,
            ComplexResource::Hyperlink(r) => &r.base,
            ComplexResource::Widget(r) => &r.base,
        }
    }
}

impl From<FileResource> for ComplexResource {
    fn from(resource: FileResource) -> Self {
        ComplexResource::File(resource)
    }
}

impl From<HyperlinkResource> for ComplexResource {
    fn from(resource: HyperlinkResource) -> Self {
        ComplexResource::Hyperlink(resource)
    }
}

impl From<WidgetResource> for ComplexResource {
    fn from(resource: WidgetResource) -> Self {
        ComplexResource::Widget(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_label::sample_label;
    use crate::widget::TextWidget;
    use serde_json::json;
    use shared::Entity;

    // ============== Subject Tests ==============

    #[test]
    fn test_subject_parse() {
        assert_eq!(Subject::parse("File"), Some(Subject::File));
        assert_eq!(Subject::parse("hyperlink"), Some(Subject::Hyperlink));
        assert_eq!(Subject::parse("Slides"), None);
    }

    // ============== FileResource Tests ==============

    #[test]
    fn test_file_resource_shapes() {
        let resource = FileResource::new(sample_label());
        assert_eq!(resource.domain(), "shixincube.com");

        let full = resource.to_json();
        assert_eq!(full["subject"], "File");
        assert_eq!(full["payload"]["fileURL"], "http://cube/f0c1d2");

        let compact = resource.to_compact_json();
        assert_eq!(compact["subject"], "File");
        assert!(compact["payload"].get("fileURL").is_none());
        assert_eq!(compact["payload"]["fileCode"], "f0c1d2");
    }

    #[test]
    fn test_file_resource_round_trip() {
        let resource = FileResource::new(sample_label());
        let parsed = FileResource::from_json(&resource.to_json()).unwrap();
        assert_eq!(parsed, resource);
        assert_eq!(parsed.to_json(), resource.to_json());
    }

    #[test]
    fn test_wrong_subject_rejected() {
        let resource = FileResource::new(sample_label());
        let err = HyperlinkResource::from_json(&resource.to_json()).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.field(), Some("subject"));

        let mut json = resource.to_json();
        json["subject"] = json!("Slides");
        assert_eq!(FileResource::from_json(&json).unwrap_err().field(), Some("subject"));
    }

    #[test]
    fn test_missing_payload_field_path() {
        let json = json!({"id": 1, "subject": "File", "payload": {"completedTime": 0}});
        let err = FileResource::from_json(&json).unwrap_err();
        assert_eq!(err.field(), Some("payload.fileCode"));
    }

    // ============== HyperlinkResource Tests ==============

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.shixincube.com/docs?a=1"), "www.shixincube.com");
        assert_eq!(extract_domain("http://user:pw@host.io:8080/x"), "host.io");
        assert_eq!(extract_domain("example.org/page"), "example.org");
        assert_eq!(extract_domain(""), "");
    }

    #[test]
    fn test_hyperlink_new() {
        let link = HyperlinkResource::new("https://shixincube.com/a", meta_type::PAGE);
        assert_eq!(link.site, "shixincube.com");
        assert_eq!(link.content.as_deref(), Some("[shixincube.com](https://shixincube.com/a)"));
        assert_eq!(link.mime_type, "text/plain");
    }

    #[test]
    fn test_hyperlink_compact_drops_path() {
        let mut link = HyperlinkResource::new("https://shixincube.com/a", meta_type::IMAGE);
        link.path = Some("/tmp/cache/a".to_string());
        link.media = Some(MediaFormat {
            width: 640,
            height: 480,
            format: "png".to_string(),
        });

        let full = link.to_json();
        assert_eq!(full["subject"], "Hyperlink");
        assert_eq!(full["payload"]["path"], "/tmp/cache/a");
        assert_eq!(full["payload"]["width"], 640);

        let compact = link.to_compact_json();
        assert!(compact["payload"].get("path").is_none());
        assert_eq!(compact["payload"]["format"], "png");
    }

    #[test]
    fn test_hyperlink_round_trip() {
        let mut link = HyperlinkResource::new("https://shixincube.com/a", meta_type::PAGE);
        link.title = Some("Cube".to_string());
        link.size = 2048;
        link.num_words = 120;
        link.path = Some("/tmp/a".to_string());

        let parsed = HyperlinkResource::from_json(&link.to_json()).unwrap();
        assert_eq!(parsed, link);
        assert_eq!(parsed.to_json(), link.to_json());
    }

    #[test]
    fn test_hyperlink_site_derived_when_absent() {
        let json = json!({
            "id": 3,
            "subject": "Hyperlink",
            "payload": {"url": "https://cube.io/x", "metaType": "page", "mimeType": "text/html"}
        });
        let link = HyperlinkResource::from_json(&json).unwrap();
        assert_eq!(link.site, "cube.io");
        assert!(link.media.is_none());

        let err = HyperlinkResource::from_json(&json!({
            "subject": "Hyperlink",
            "payload": {"url": "https://cube.io/x"}
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("payload.metaType"));
    }

    #[test]
    fn test_num_words_falls_back_to_content() {
        let mut link = HyperlinkResource::new("https://a.b", meta_type::PLAIN);
        link.content = Some("hello".to_string());
        assert_eq!(link.num_words(), 5);
        link.num_words = 42;
        assert_eq!(link.num_words(), 42);
    }

    #[test]
    fn test_fix_content() {
        let mut link = HyperlinkResource::new("https://a.b", meta_type::PAGE);
        link.content = Some("  title  \n\nx\n body text \n".to_string());
        link.fix_content();
        assert_eq!(link.content.as_deref(), Some("title\nbody text"));
    }

    // ============== WidgetResource Tests ==============

    #[test]
    fn test_widget_resource() {
        let resource = WidgetResource::new(
            EntityBase::new(5, "shixincube.com"),
            Widget::Text(TextWidget::new("hi")),
        );
        let json = resource.to_json();
        assert_eq!(json["subject"], "Widget");
        assert_eq!(json["payload"]["widgetType"], "Text");

        let parsed = WidgetResource::from_json(&json).unwrap();
        assert_eq!(parsed.widget(), resource.widget());

        let mut bad = json.clone();
        bad["payload"]["widgetType"] = json!("Marquee");
        assert!(WidgetResource::from_json(&bad).unwrap_err().is_unknown_variant());
    }

    #[test]
    fn test_custom_widget_resource_round_trip() {
        let mut registry = WidgetRegistry::default();
        registry.register("Poll", crate::widget::build_custom);

        let widget = registry
            .resolve(&json!({"widgetType": "Poll", "question": "Lunch?", "options": ["yes", "no"]}))
            .unwrap();
        let resource = WidgetResource::new(EntityBase::new(6, "shixincube.com"), widget);
        let json = resource.to_json();
        assert_eq!(json["payload"]["widgetType"], "Poll");

        let parsed = WidgetResource::from_json_with(&json, &registry).unwrap();
        assert_eq!(parsed.widget(), resource.widget());
        assert_eq!(parsed.to_json(), json);

        // Built-in registry does not know the tag
        assert!(WidgetResource::from_json(&json).unwrap_err().is_unknown_variant());
    }

    #[test]
    fn test_widget_payload_error_path() {
        let json = json!({"id": 7, "subject": "Widget", "payload": {"widgetType": "Link"}});
        let err = WidgetResource::from_json(&json).unwrap_err();
        assert_eq!(err.field(), Some("payload.url"));
    }

    // ============== ComplexResource Tests ==============

    #[test]
    fn test_complex_resource_delegates() {
        let resource: ComplexResource = FileResource::new(sample_label()).into();
        assert_eq!(resource.subject(), Subject::File);
        assert!(resource.to_compact_json()["payload"].get("fileURL").is_none());
        assert!(resource.id() > 0);
    }
}
