//! cube inspect command

use aigc::{
    FacialExpressionResult, HandEstimation, KeypointDetection, KnowledgeArticle, PoseEstimation,
    SpeakerIndicator, SpeechRecognitionInfo, VoiceDiarization,
};
use anyhow::Context;
use clap::{Args, ValueEnum};
use contact::{ContactBehavior, ContactResolver, ContactZone, ContactZoneBundle, Group};
use resource::{FileLabel, FileResource, HyperlinkResource, Widget, WidgetResource};
use serde_json::Value;
use shared::{CodecConfig, FromJson, Jsonable, Shape};
use std::path::{Path, PathBuf};

/// Entity type a document is decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    /// Any member of the contact family (resolved structurally)
    Contact,
    Group,
    Zone,
    ZoneBundle,
    Behavior,
    File,
    FileResource,
    HyperlinkResource,
    WidgetResource,
    Widget,
    Pose,
    Hand,
    Keypoints,
    FacialExpression,
    Speech,
    Diarization,
    Speaker,
    Knowledge,
}

impl DocumentKind {
    /// Decode `document` and re-encode it in `shape`
    pub fn reshape(&self, document: &Value, shape: Shape) -> shared::Result<Value> {
        match self {
            DocumentKind::Contact => Ok(ContactResolver.resolve(document)?.to_shape(shape)),
            DocumentKind::Group => reshape::<Group>(document, shape),
            DocumentKind::Zone => reshape::<ContactZone>(document, shape),
            DocumentKind::ZoneBundle => reshape::<ContactZoneBundle>(document, shape),
            DocumentKind::Behavior => reshape::<ContactBehavior>(document, shape),
            DocumentKind::File => reshape::<FileLabel>(document, shape),
            DocumentKind::FileResource => reshape::<FileResource>(document, shape),
            DocumentKind::HyperlinkResource => reshape::<HyperlinkResource>(document, shape),
            DocumentKind::WidgetResource => reshape::<WidgetResource>(document, shape),
            DocumentKind::Widget => reshape::<Widget>(document, shape),
            DocumentKind::Pose => reshape::<PoseEstimation>(document, shape),
            DocumentKind::Hand => reshape::<HandEstimation>(document, shape),
            DocumentKind::Keypoints => reshape::<KeypointDetection>(document, shape),
            DocumentKind::FacialExpression => reshape::<FacialExpressionResult>(document, shape),
            DocumentKind::Speech => reshape::<SpeechRecognitionInfo>(document, shape),
            DocumentKind::Diarization => reshape::<VoiceDiarization>(document, shape),
            DocumentKind::Speaker => reshape::<SpeakerIndicator>(document, shape),
            DocumentKind::Knowledge => reshape::<KnowledgeArticle>(document, shape),
        }
    }
}

fn reshape<T: FromJson + Jsonable>(document: &Value, shape: Shape) -> shared::Result<Value> {
    Ok(T::from_json(document)?.to_shape(shape))
}

#[derive(Debug, Args)]
pub struct InspectCommand {
    /// Entity type of the document
    #[arg(value_enum)]
    pub kind: DocumentKind,

    /// JSON document to decode
    pub path: PathBuf,

    /// Print the compact shape
    #[arg(long)]
    pub compact: bool,

    /// Codec configuration file (YAML or JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Domain for documents that carry none
    #[arg(long)]
    pub domain: Option<String>,
}

impl InspectCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// Effective configuration: file values overridden by flags
    pub fn config(&self) -> anyhow::Result<CodecConfig> {
        let mut config = match &self.config {
            Some(path) => CodecConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CodecConfig::default(),
        };
        if self.compact {
            config.compact = true;
        }
        if let Some(domain) = &self.domain {
            config = config.with_default_domain(domain.clone());
        }
        Ok(config)
    }

    /// Decode the document and render it in the configured shape
    pub fn render(&self) -> anyhow::Result<String> {
        let config = self.config()?;
        let mut document = read_document(&self.path)?;
        config.apply_default_domain(&mut document);

        let shape = if config.compact {
            Shape::Compact
        } else {
            Shape::Full
        };
        tracing::debug!(kind = ?self.kind, ?shape, "Inspecting document");

        let output = self
            .kind
            .reshape(&document, shape)
            .with_context(|| format!("invalid {:?} document {}", self.kind, self.path.display()))?;
        Ok(config.render(&output)?)
    }
}

fn read_document(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn document(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn command(kind: DocumentKind, path: &Path) -> InspectCommand {
        InspectCommand {
            kind,
            path: path.to_path_buf(),
            compact: false,
            config: None,
            domain: None,
        }
    }

    fn group_json() -> Value {
        json!({
            "id": 20001,
            "domain": "shixincube.com",
            "name": "Cube Team",
            "tag": "public",
            "ownerId": 10001,
            "creation": 1700000000000i64,
            "lastActive": 1700000000000i64,
            "state": 0,
            "members": [10001, 10002]
        })
    }

    // ============== Shape Tests ==============

    #[test]
    fn test_full_and_compact() {
        let file = document(&group_json());
        let mut cmd = command(DocumentKind::Group, file.path());

        let full: Value = serde_json::from_str(&cmd.render().unwrap()).unwrap();
        assert_eq!(full["members"], json!([10001, 10002]));

        cmd.compact = true;
        let compact: Value = serde_json::from_str(&cmd.render().unwrap()).unwrap();
        assert!(compact.get("members").is_none());
        assert_eq!(compact["ownerId"], 10001);
    }

    #[test]
    fn test_contact_kind_resolves_group() {
        let file = document(&group_json());
        let cmd = command(DocumentKind::Contact, file.path());
        let output: Value = serde_json::from_str(&cmd.render().unwrap()).unwrap();
        assert_eq!(output["tag"], "public");
    }

    // ============== Config Tests ==============

    #[test]
    fn test_config_file_and_domain_flag() {
        let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(config, "defaultDomain: from-config\npretty: false\ncompact: true").unwrap();

        let file = document(&json!({"text": "hello", "widgetType": "Text"}));
        let mut cmd = command(DocumentKind::Widget, file.path());
        cmd.config = Some(config.path().to_path_buf());
        let rendered = cmd.render().unwrap();
        assert!(!rendered.contains('\n'));

        let effective = cmd.config().unwrap();
        assert!(effective.compact);
        assert_eq!(effective.default_domain, "from-config");

        cmd.domain = Some("from-flag".to_string());
        assert_eq!(cmd.config().unwrap().default_domain, "from-flag");
    }

    #[test]
    fn test_default_domain_applied() {
        let mut group = group_json();
        group.as_object_mut().unwrap().remove("domain");
        let file = document(&group);

        let mut cmd = command(DocumentKind::Group, file.path());
        cmd.domain = Some("demo".to_string());
        let output: Value = serde_json::from_str(&cmd.render().unwrap()).unwrap();
        assert_eq!(output["domain"], "demo");
    }

    // ============== Error Tests ==============

    #[test]
    fn test_malformed_document_reports_field() {
        let file = document(&json!({"id": 1, "ownerId": 10001}));
        let err = command(DocumentKind::Group, file.path()).render().unwrap_err();
        let root = err.downcast_ref::<shared::CubeError>().unwrap();
        assert!(root.is_malformed());
    }

    #[test]
    fn test_unknown_widget_tag() {
        let file = document(&json!({"widgetType": "Carousel"}));
        let err = command(DocumentKind::Widget, file.path()).render().unwrap_err();
        let root = err.downcast_ref::<shared::CubeError>().unwrap();
        assert!(root.is_unknown_variant());
    }

    #[test]
    fn test_missing_file() {
        let cmd = command(DocumentKind::File, Path::new("/nonexistent/cube.json"));
        assert!(cmd.render().is_err());
    }
}
