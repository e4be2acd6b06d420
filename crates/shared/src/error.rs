//! Error types for Cube entities

use thiserror::Error;

/// Error raised when a document is missing a required field or carries the
/// wrong JSON type for it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed document: field '{field}' {reason}")]
pub struct MalformedDocumentError {
    pub field: String,
    pub reason: String,
}

impl MalformedDocumentError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The field is absent
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "is missing")
    }

    /// The field is present but has the wrong JSON type
    pub fn wrong_type(field: impl Into<String>, expected: &str) -> Self {
        Self::new(field, format!("is not {}", expected))
    }
}

/// Error raised when a polymorphic document names a variant that nothing is
/// registered for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {family} variant '{tag}'")]
pub struct UnknownVariantError {
    pub family: String,
    pub tag: String,
}

impl UnknownVariantError {
    pub fn new(family: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            tag: tag.into(),
        }
    }
}

/// General Cube error type
#[derive(Debug, Error)]
pub enum CubeError {
    #[error(transparent)]
    MalformedDocument(#[from] MalformedDocumentError),

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariantError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CubeError {
    /// Name of the offending field, if this is a malformed-document error
    pub fn field(&self) -> Option<&str> {
        match self {
            CubeError::MalformedDocument(e) => Some(&e.field),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, CubeError::MalformedDocument(_))
    }

    pub fn is_unknown_variant(&self) -> bool {
        matches!(self, CubeError::UnknownVariant(_))
    }
}

pub type Result<T> = std::result::Result<T, CubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = MalformedDocumentError::missing("file");
        assert_eq!(err.to_string(), "Malformed document: field 'file' is missing");

        let err = MalformedDocumentError::wrong_type("members", "an array");
        assert_eq!(
            err.to_string(),
            "Malformed document: field 'members' is not an array"
        );
    }

    #[test]
    fn test_unknown_variant_display() {
        let err = UnknownVariantError::new("widget", "Carousel");
        assert_eq!(err.to_string(), "Unknown widget variant 'Carousel'");
    }

    #[test]
    fn test_cube_error_transparent() {
        let err: CubeError = MalformedDocumentError::missing("name").into();
        assert!(err.is_malformed());
        assert_eq!(err.field(), Some("name"));
        assert_eq!(err.to_string(), "Malformed document: field 'name' is missing");

        let err: CubeError = UnknownVariantError::new("widget", "").into();
        assert!(err.is_unknown_variant());
        assert_eq!(err.field(), None);
    }
}
