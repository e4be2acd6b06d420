//! # Cube Resource
//!
//! File labels, complex resources and UI widgets.

pub mod complex;
pub mod file_label;
pub mod widget;

// Re-exports
pub use complex::{
    extract_domain, meta_type, ComplexResource, FileResource, HyperlinkResource, MediaFormat,
    Subject, WidgetResource,
};
pub use file_label::FileLabel;
pub use widget::{
    build_custom, CustomWidget, ImageWidget, LinkWidget, TextWidget, Widget, WidgetConstructor,
    WidgetRegistry,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_label::sample_label;
    use serde_json::{json, Value};
    use shared::{EntityBase, Jsonable};

    /// Keys only full-shaped resources carry
    const FULL_ONLY_KEYS: &[&str] = &["fileURL", "fileSecureURL", "directURL", "context", "path"];

    fn collect_keys(value: &Value, keys: &mut Vec<String>) {
        match value {
            Value::Object(object) => {
                for (key, child) in object {
                    keys.push(key.clone());
                    collect_keys(child, keys);
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect_keys(item, keys)),
            _ => {}
        }
    }

    fn loaded_label() -> FileLabel {
        let mut label = sample_label();
        label.direct_url = Some("file:///data/f0c1d2".to_string());
        label.context = Some(json!({"album": "2024"}));
        label
    }

    // ============== Compact Shape Tests ==============

    #[test]
    fn test_compact_resources_hold_no_full_children() {
        let mut link = HyperlinkResource::new("https://shixincube.com/a", meta_type::PAGE);
        link.path = Some("/tmp/cache/a".to_string());

        let resources: Vec<ComplexResource> = vec![
            FileResource::new(loaded_label()).into(),
            link.into(),
            WidgetResource::new(
                EntityBase::new(8, "shixincube.com"),
                Widget::Image(ImageWidget::new(loaded_label())),
            )
            .into(),
        ];

        for resource in &resources {
            let mut full_keys = Vec::new();
            collect_keys(&resource.to_json(), &mut full_keys);
            assert!(FULL_ONLY_KEYS.iter().any(|k| full_keys.iter().any(|f| f == k)));

            let mut keys = Vec::new();
            collect_keys(&resource.to_compact_json(), &mut keys);
            for key in FULL_ONLY_KEYS {
                assert!(
                    !keys.iter().any(|k| k == key),
                    "compact {} resource contains '{}'",
                    resource.subject(),
                    key
                );
            }
        }
    }
}
