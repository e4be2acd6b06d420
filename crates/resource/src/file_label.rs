//! File label: the descriptor of a stored file

use serde_json::Value;
use shared::json::put_opt;
use shared::{EntityBase, Fields, FromJson, JsonObject, Jsonable, Result, Shape};

/// Metadata and access URLs of a stored file
#[derive(Debug, Clone)]
pub struct FileLabel {
    base: EntityBase,
    /// Storage code, unique per file
    pub file_code: String,
    pub owner_id: i64,
    pub file_name: String,
    /// Size in bytes
    pub file_size: i64,
    pub last_modified: i64,
    /// When the upload completed (Unix ms)
    pub completed_time: i64,
    pub expiry_time: i64,
    /// Preferred extension, e.g. `"jpg"`
    pub file_type: String,
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub file_url: Option<String>,
    pub file_secure_url: Option<String>,
    pub direct_url: Option<String>,
    pub context: Option<Value>,
}

impl FileLabel {
    pub fn new(
        base: EntityBase,
        file_code: impl Into<String>,
        owner_id: i64,
        file_name: impl Into<String>,
        file_size: i64,
        completed_time: i64,
    ) -> Self {
        let file_name = file_name.into();
        let file_type = extension_of(&file_name);
        Self {
            base,
            file_code: file_code.into(),
            owner_id,
            file_name,
            file_size,
            last_modified: completed_time,
            completed_time,
            expiry_time: 0,
            file_type,
            md5: None,
            sha1: None,
            file_url: None,
            file_secure_url: None,
            direct_url: None,
            context: None,
        }
    }

    /// Builder: set the plain and secure URLs
    pub fn with_urls(mut self, file_url: impl Into<String>, secure_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self.file_secure_url = Some(secure_url.into());
        self
    }

    /// Builder: set the MD5 digest
    pub fn with_md5(mut self, md5: impl Into<String>) -> Self {
        self.md5 = Some(md5.into());
        self
    }

    /// Whether the file can no longer be downloaded at `now`
    pub fn is_expired(&self, now: i64) -> bool {
        self.expiry_time > 0 && self.expiry_time <= now
    }

    fn to_object(&self, shape: Shape) -> JsonObject {
        let mut object = self.base.to_object();
        object.insert("fileCode".to_string(), Value::from(self.file_code.clone()));
        object.insert("ownerId".to_string(), Value::from(self.owner_id));
        object.insert("fileName".to_string(), Value::from(self.file_name.clone()));
        object.insert("fileSize".to_string(), Value::from(self.file_size));
        object.insert("lastModified".to_string(), Value::from(self.last_modified));
        object.insert("completedTime".to_string(), Value::from(self.completed_time));
        object.insert("expiryTime".to_string(), Value::from(self.expiry_time));
        object.insert("fileType".to_string(), Value::from(self.file_type.clone()));
        put_opt(&mut object, "md5", self.md5.clone());
        put_opt(&mut object, "sha1", self.sha1.clone());

        // URLs are short-lived and the context can be large
        if !shape.is_compact() {
            put_opt(&mut object, "fileURL", self.file_url.clone());
            put_opt(&mut object, "fileSecureURL", self.file_secure_url.clone());
            put_opt(&mut object, "directURL", self.direct_url.clone());
            put_opt(&mut object, "context", self.context.clone());
        }
        object
    }
}

fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => "unknown".to_string(),
    }
}

impl Jsonable for FileLabel {
    fn to_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Full))
    }

    fn to_compact_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Compact))
    }
}

impl FromJson for FileLabel {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let completed_time = fields.i64("completedTime")?;

        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            file_code: fields.string("fileCode")?,
            owner_id: fields.i64("ownerId")?,
            file_name: fields.string("fileName")?,
            file_size: fields.i64("fileSize")?,
            last_modified: fields.opt_i64("lastModified")?.unwrap_or(completed_time),
            completed_time,
            expiry_time: fields.i64("expiryTime")?,
            file_type: fields.string("fileType")?,
            md5: fields.opt_string("md5")?,
            sha1: fields.opt_string("sha1")?,
            file_url: fields.opt_string("fileURL")?,
            file_secure_url: fields.opt_string("fileSecureURL")?,
            direct_url: fields.opt_string("directURL")?,
            context: fields.opt_object_value("context")?,
        })
    }
}

shared::impl_entity!(FileLabel);

#[cfg(test)]
pub(crate) fn sample_label() -> FileLabel {
    FileLabel::new(
        EntityBase::new(900, "shixincube.com"),
        "f0c1d2",
        50001001,
        "Holiday.JPG",
        204800,
        1700000000000,
    )
    .with_urls("http://cube/f0c1d2", "https://cube/f0c1d2")
    .with_md5("9e107d9d372bb6826bd81d3542a419d6")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_type_from_name() {
        assert_eq!(sample_label().file_type, "jpg");
        let label = FileLabel::new(EntityBase::new(1, ""), "c", 1, "README", 1, 0);
        assert_eq!(label.file_type, "unknown");
    }

    #[test]
    fn test_full_shape() {
        let json = sample_label().to_json();
        assert_eq!(json["fileCode"], "f0c1d2");
        assert_eq!(json["fileName"], "Holiday.JPG");
        assert_eq!(json["lastModified"], 1700000000000i64);
        assert_eq!(json["fileURL"], "http://cube/f0c1d2");
        assert_eq!(json["md5"], "9e107d9d372bb6826bd81d3542a419d6");
        assert!(json.get("sha1").is_none());
    }

    #[test]
    fn test_compact_drops_urls() {
        let mut label = sample_label();
        label.direct_url = Some("http://direct".to_string());
        label.context = Some(json!({"album": "2024"}));

        let json = label.to_compact_json();
        for key in ["fileURL", "fileSecureURL", "directURL", "context"] {
            assert!(json.get(key).is_none(), "{} should be dropped", key);
        }
        assert_eq!(json["fileCode"], "f0c1d2");
        assert_eq!(json["md5"], "9e107d9d372bb6826bd81d3542a419d6");
    }

    #[test]
    fn test_round_trip() {
        let label = sample_label();
        let parsed = FileLabel::from_json(&label.to_json()).unwrap();
        assert_eq!(parsed, label);
        assert_eq!(parsed.to_json(), label.to_json());
    }

    #[test]
    fn test_last_modified_defaults_to_completed() {
        let mut json = sample_label().to_json();
        json.as_object_mut().unwrap().remove("lastModified");
        let parsed = FileLabel::from_json(&json).unwrap();
        assert_eq!(parsed.last_modified, parsed.completed_time);
    }

    #[test]
    fn test_missing_file_code() {
        let mut json = sample_label().to_json();
        json.as_object_mut().unwrap().remove("fileCode");
        let err = FileLabel::from_json(&json).unwrap_err();
        assert_eq!(err.field(), Some("fileCode"));
    }

    #[test]
    fn test_expiry() {
        let mut label = sample_label();
        assert!(!label.is_expired(i64::MAX));
        label.expiry_time = 100;
        assert!(label.is_expired(100));
        assert!(!label.is_expired(99));
    }
}
