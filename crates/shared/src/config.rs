//! Codec configuration

use crate::error::{CubeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Settings applied when decoding and printing documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecConfig {
    /// Domain assigned to documents that carry none
    #[serde(default)]
    pub default_domain: String,

    /// Pretty-print output documents
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Emit the compact shape instead of the full shape
    #[serde(default)]
    pub compact: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_domain: String::new(),
            pretty: default_pretty(),
            compact: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a YAML (`.yaml`/`.yml`) or JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(CubeError::Config(format!(
                    "unsupported config format: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };
        Ok(config)
    }

    /// Builder: set default domain
    pub fn with_default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = domain.into();
        self
    }

    /// Fill in `domain` on a top-level document that lacks one
    pub fn apply_default_domain(&self, document: &mut Value) {
        if self.default_domain.is_empty() {
            return;
        }
        if let Value::Object(object) = document {
            let missing = match object.get("domain") {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                object.insert(
                    "domain".to_string(),
                    Value::from(self.default_domain.clone()),
                );
            }
        }
    }

    /// Render a document according to the `pretty` setting
    pub fn render(&self, document: &Value) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.default_domain, "");
        assert!(config.pretty);
        assert!(!config.compact);
    }

    #[test]
    fn test_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "defaultDomain: shixincube.com\ncompact: true").unwrap();

        let config = CodecConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_domain, "shixincube.com");
        assert!(config.compact);
        assert!(config.pretty);
    }

    #[test]
    fn test_json_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"pretty": false}}"#).unwrap();

        let config = CodecConfig::from_file(file.path()).unwrap();
        assert!(!config.pretty);
        assert_eq!(config.default_domain, "");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = CodecConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, CubeError::Config(_)));
    }

    #[test]
    fn test_apply_default_domain() {
        let config = CodecConfig::default().with_default_domain("demo");

        let mut doc = json!({"id": 1});
        config.apply_default_domain(&mut doc);
        assert_eq!(doc["domain"], "demo");

        let mut doc = json!({"id": 1, "domain": ""});
        config.apply_default_domain(&mut doc);
        assert_eq!(doc["domain"], "demo");

        let mut doc = json!({"id": 1, "domain": "kept"});
        config.apply_default_domain(&mut doc);
        assert_eq!(doc["domain"], "kept");
    }

    #[test]
    fn test_render() {
        let config = CodecConfig {
            pretty: false,
            ..Default::default()
        };
        assert_eq!(config.render(&json!({"a": 1})).unwrap(), r#"{"a":1}"#);
    }
}
