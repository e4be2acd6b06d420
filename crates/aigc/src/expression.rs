//! Facial expression recognition

use resource::FileLabel;
use serde_json::Value;
use shared::{shape_all, EntityBase, Fields, FromJson, JsonObject, Jsonable, Result, Shape, WireEnum};

use crate::geometry::BoundingBox;

/// Recognized facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Happy,
    Sad,
    Angry,
    Surprise,
    Fear,
    Disgust,
    Neutral,
    Contempt,
    Other,
}

impl WireEnum for Expression {
    type Code = i32;
    const FAMILY: &'static str = "Expression";
    const FALLBACK: Self = Expression::Other;
    const ALL: &'static [Self] = &[
        Expression::Happy,
        Expression::Sad,
        Expression::Angry,
        Expression::Surprise,
        Expression::Fear,
        Expression::Disgust,
        Expression::Neutral,
        Expression::Contempt,
        Expression::Other,
    ];

    fn code(&self) -> i32 {
        match self {
            Expression::Happy => 1,
            Expression::Sad => 2,
            Expression::Angry => 3,
            Expression::Surprise => 4,
            Expression::Fear => 5,
            Expression::Disgust => 6,
            Expression::Neutral => 7,
            Expression::Contempt => 8,
            Expression::Other => 0,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Expression::Happy => "Happy",
            Expression::Sad => "Sad",
            Expression::Angry => "Angry",
            Expression::Surprise => "Surprise",
            Expression::Fear => "Fear",
            Expression::Disgust => "Disgust",
            Expression::Neutral => "Neutral",
            Expression::Contempt => "Contempt",
            Expression::Other => "Other",
        }
    }
}

impl Expression {
    pub fn label_zh(&self) -> &'static str {
        match self {
            Expression::Happy => "高兴",
            Expression::Sad => "悲伤",
            Expression::Angry => "愤怒",
            Expression::Surprise => "惊讶",
            Expression::Fear => "恐惧",
            Expression::Disgust => "厌恶",
            Expression::Neutral => "平静",
            Expression::Contempt => "轻蔑",
            Expression::Other => "其他",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Surprise => "surprised",
            Expression::Fear => "fearful",
            Expression::Disgust => "disgusted",
            Expression::Neutral => "calm",
            Expression::Contempt => "contemptuous",
            Expression::Other => "other",
        }
    }

    /// Match the symbolic name or either label, ignoring case and
    /// surrounding whitespace
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|e| {
                e.name().to_lowercase() == text || e.label_en() == text || e.label_zh() == text
            })
            .unwrap_or(Self::FALLBACK)
    }
}

/// One detected face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceExpression {
    pub bbox: BoundingBox,
    pub expression: Expression,
    /// Model confidence in `[0, 1]`
    pub confidence: f64,
}

impl Jsonable for FaceExpression {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert("bbox".to_string(), self.bbox.to_json());
        object.insert("expression".to_string(), Value::from(self.expression.name()));
        object.insert("confidence".to_string(), Value::from(self.confidence));
        Value::Object(object)
    }
}

impl FromJson for FaceExpression {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            bbox: fields.entity("bbox")?,
            expression: Expression::parse(fields.str("expression")?),
            confidence: fields.f64("confidence")?,
        })
    }
}

/// Expressions recognized in an image file
#[derive(Debug, Clone)]
pub struct FacialExpressionResult {
    base: EntityBase,
    file: FileLabel,
    faces: Vec<FaceExpression>,
}

impl FacialExpressionResult {
    pub fn new(file: FileLabel, faces: Vec<FaceExpression>) -> Self {
        Self {
            base: EntityBase::generate(shared::Entity::domain(&file)).stamped_now(),
            file,
            faces,
        }
    }

    pub fn file(&self) -> &FileLabel {
        &self.file
    }

    pub fn faces(&self) -> &[FaceExpression] {
        &self.faces
    }

    /// Expression of the most confident face
    pub fn dominant(&self) -> Option<Expression> {
        self.faces
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|face| face.expression)
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = self.base.to_object();
        object.insert("file".to_string(), self.file.to_shape(shape));
        object.insert("faces".to_string(), shape_all(&self.faces, shape));
        Value::Object(object)
    }
}

impl Jsonable for FacialExpressionResult {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for FacialExpressionResult {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            file: fields.entity("file")?,
            faces: fields.entities("faces")?,
        })
    }
}

shared::impl_entity!(FacialExpressionResult);
