//! Pose and hand keypoints
//!
//! Estimations are maps from a keypoint enum to an image point, encoded as
//! JSON objects keyed by the keypoint's wire name. The wire names are fixed
//! per variant and are not uniform: several pose keypoints use snake_case
//! while the rest use PascalCase.

use crate::geometry::Point;
use resource::FileLabel;
use serde_json::Value;
use shared::{keyed, shape_all, EntityBase, Fields, FromJson, JsonObject, Jsonable, Result, Shape, WireEnum};
use std::collections::BTreeMap;

// ============================================================================
// HandKeypoint
// ============================================================================

/// The 21 hand landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandKeypoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
    Unknown,
}

impl WireEnum for HandKeypoint {
    type Code = i32;
    const FAMILY: &'static str = "HandKeypoint";
    const FALLBACK: Self = HandKeypoint::Unknown;
    const ALL: &'static [Self] = &[
        HandKeypoint::Wrist,
        HandKeypoint::ThumbCmc,
        HandKeypoint::ThumbMcp,
        HandKeypoint::ThumbIp,
        HandKeypoint::ThumbTip,
        HandKeypoint::IndexFingerMcp,
        HandKeypoint::IndexFingerPip,
        HandKeypoint::IndexFingerDip,
        HandKeypoint::IndexFingerTip,
        HandKeypoint::MiddleFingerMcp,
        HandKeypoint::MiddleFingerPip,
        HandKeypoint::MiddleFingerDip,
        HandKeypoint::MiddleFingerTip,
        HandKeypoint::RingFingerMcp,
        HandKeypoint::RingFingerPip,
        HandKeypoint::RingFingerDip,
        HandKeypoint::RingFingerTip,
        HandKeypoint::PinkyMcp,
        HandKeypoint::PinkyPip,
        HandKeypoint::PinkyDip,
        HandKeypoint::PinkyTip,
        HandKeypoint::Unknown,
    ];

    fn code(&self) -> i32 {
        match self {
            HandKeypoint::Unknown => -1,
            // Landmarks are numbered in declaration order
            other => Self::ALL.iter().position(|k| k == other).map_or(-1, |i| i as i32),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            HandKeypoint::Wrist => "Wrist",
            HandKeypoint::ThumbCmc => "ThumbCmc",
            HandKeypoint::ThumbMcp => "ThumbMcp",
            HandKeypoint::ThumbIp => "ThumbIp",
            HandKeypoint::ThumbTip => "ThumbTip",
            HandKeypoint::IndexFingerMcp => "IndexFingerMcp",
            HandKeypoint::IndexFingerPip => "IndexFingerPip",
            HandKeypoint::IndexFingerDip => "IndexFingerDip",
            HandKeypoint::IndexFingerTip => "IndexFingerTip",
            HandKeypoint::MiddleFingerMcp => "MiddleFingerMcp",
            HandKeypoint::MiddleFingerPip => "MiddleFingerPip",
            HandKeypoint::MiddleFingerDip => "MiddleFingerDip",
            HandKeypoint::MiddleFingerTip => "MiddleFingerTip",
            HandKeypoint::RingFingerMcp => "RingFingerMcp",
            HandKeypoint::RingFingerPip => "RingFingerPip",
            HandKeypoint::RingFingerDip => "RingFingerDip",
            HandKeypoint::RingFingerTip => "RingFingerTip",
            HandKeypoint::PinkyMcp => "PinkyMcp",
            HandKeypoint::PinkyPip => "PinkyPip",
            HandKeypoint::PinkyDip => "PinkyDip",
            HandKeypoint::PinkyTip => "PinkyTip",
            HandKeypoint::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// PoseKeypoint
// ============================================================================

/// The 17 body landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoseKeypoint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    Unknown,
}

impl WireEnum for PoseKeypoint {
    type Code = i32;
    const FAMILY: &'static str = "PoseKeypoint";
    const FALLBACK: Self = PoseKeypoint::Unknown;
    const ALL: &'static [Self] = &[
        PoseKeypoint::Nose,
        PoseKeypoint::LeftEye,
        PoseKeypoint::RightEye,
        PoseKeypoint::LeftEar,
        PoseKeypoint::RightEar,
        PoseKeypoint::LeftShoulder,
        PoseKeypoint::RightShoulder,
        PoseKeypoint::LeftElbow,
        PoseKeypoint::RightElbow,
        PoseKeypoint::LeftWrist,
        PoseKeypoint::RightWrist,
        PoseKeypoint::LeftHip,
        PoseKeypoint::RightHip,
        PoseKeypoint::LeftKnee,
        PoseKeypoint::RightKnee,
        PoseKeypoint::LeftAnkle,
        PoseKeypoint::RightAnkle,
        PoseKeypoint::Unknown,
    ];

    fn code(&self) -> i32 {
        match self {
            PoseKeypoint::Unknown => -1,
            other => Self::ALL.iter().position(|k| k == other).map_or(-1, |i| i as i32),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PoseKeypoint::Nose => "Nose",
            PoseKeypoint::LeftEye => "LeftEye",
            PoseKeypoint::RightEye => "RightEye",
            PoseKeypoint::LeftEar => "left_ear",
            PoseKeypoint::RightEar => "right_ear",
            PoseKeypoint::LeftShoulder => "LeftShoulder",
            PoseKeypoint::RightShoulder => "RightShoulder",
            PoseKeypoint::LeftElbow => "left_elbow",
            PoseKeypoint::RightElbow => "right_elbow",
            PoseKeypoint::LeftWrist => "LeftWrist",
            PoseKeypoint::RightWrist => "RightWrist",
            PoseKeypoint::LeftHip => "left_hip",
            PoseKeypoint::RightHip => "right_hip",
            PoseKeypoint::LeftKnee => "LeftKnee",
            PoseKeypoint::RightKnee => "RightKnee",
            PoseKeypoint::LeftAnkle => "left_ankle",
            PoseKeypoint::RightAnkle => "right_ankle",
            PoseKeypoint::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Handedness
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
    Unknown,
}

impl WireEnum for Handedness {
    type Code = i32;
    const FAMILY: &'static str = "Handedness";
    const FALLBACK: Self = Handedness::Unknown;
    const ALL: &'static [Self] = &[Handedness::Left, Handedness::Right, Handedness::Unknown];

    fn code(&self) -> i32 {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
            Handedness::Unknown => -1,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
            Handedness::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Estimations
// ============================================================================

/// Keypoints of one detected body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseEstimation {
    pub keypoints: BTreeMap<PoseKeypoint, Point>,
    /// Detection score in `[0, 1]`
    pub score: f64,
}

impl PoseEstimation {
    pub fn new(score: f64) -> Self {
        Self {
            keypoints: BTreeMap::new(),
            score,
        }
    }

    /// Builder: set a keypoint
    pub fn with(mut self, keypoint: PoseKeypoint, point: Point) -> Self {
        self.keypoints.insert(keypoint, point);
        self
    }

    pub fn get(&self, keypoint: PoseKeypoint) -> Option<&Point> {
        self.keypoints.get(&keypoint)
    }
}

impl Jsonable for PoseEstimation {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert(
            "keypoints".to_string(),
            keyed::encode(&self.keypoints, Shape::Full),
        );
        object.insert("score".to_string(), Value::from(self.score));
        Value::Object(object)
    }
}

impl FromJson for PoseEstimation {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            keypoints: keyed::decode_keyed(fields.value("keypoints")?)
                .map_err(|e| shared::json::nest(e, "keypoints"))?,
            score: fields.f64("score")?,
        })
    }
}

/// Keypoints of one detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandEstimation {
    pub handedness: Handedness,
    pub keypoints: BTreeMap<HandKeypoint, Point>,
    pub score: f64,
}

impl HandEstimation {
    pub fn new(handedness: Handedness, score: f64) -> Self {
        Self {
            handedness,
            keypoints: BTreeMap::new(),
            score,
        }
    }

    /// Builder: set a keypoint
    pub fn with(mut self, keypoint: HandKeypoint, point: Point) -> Self {
        self.keypoints.insert(keypoint, point);
        self
    }

    pub fn get(&self, keypoint: HandKeypoint) -> Option<&Point> {
        self.keypoints.get(&keypoint)
    }
}

impl Jsonable for HandEstimation {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert(
            "handedness".to_string(),
            Value::from(self.handedness.name()),
        );
        object.insert(
            "keypoints".to_string(),
            keyed::encode(&self.keypoints, Shape::Full),
        );
        object.insert("score".to_string(), Value::from(self.score));
        Value::Object(object)
    }
}

impl FromJson for HandEstimation {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let handedness = fields
            .opt_string("handedness")?
            .map_or(Handedness::Unknown, |h| Handedness::from_name(&h));

        Ok(Self {
            handedness,
            keypoints: keyed::decode_keyed(fields.value("keypoints")?)
                .map_err(|e| shared::json::nest(e, "keypoints"))?,
            score: fields.f64("score")?,
        })
    }
}

// ============================================================================
// KeypointDetection
// ============================================================================

/// Poses and hands detected in an image file
#[derive(Debug, Clone)]
pub struct KeypointDetection {
    base: EntityBase,
    file: FileLabel,
    poses: Vec<PoseEstimation>,
    hands: Vec<HandEstimation>,
}

impl KeypointDetection {
    pub fn new(file: FileLabel) -> Self {
        Self {
            base: EntityBase::generate(shared::Entity::domain(&file)).stamped_now(),
            file,
            poses: Vec::new(),
            hands: Vec::new(),
        }
    }

    /// Builder: add a pose
    pub fn with_pose(mut self, pose: PoseEstimation) -> Self {
        self.poses.push(pose);
        self
    }

    /// Builder: add a hand
    pub fn with_hand(mut self, hand: HandEstimation) -> Self {
        self.hands.push(hand);
        self
    }

    pub fn file(&self) -> &FileLabel {
        &self.file
    }

    pub fn poses(&self) -> &[PoseEstimation] {
        &self.poses
    }

    pub fn hands(&self) -> &[HandEstimation] {
        &self.hands
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = self.base.to_object();
        object.insert("file".to_string(), self.file.to_shape(shape));
        object.insert("poses".to_string(), shape_all(&self.poses, shape));
        object.insert("hands".to_string(), shape_all(&self.hands, shape));
        Value::Object(object)
    }
}

impl Jsonable for KeypointDetection {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for KeypointDetection {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            file: fields.entity("file")?,
            poses: fields.opt_entities("poses")?,
            hands: fields.opt_entities("hands")?,
        })
    }
}

shared::impl_entity!(KeypointDetection);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::image_label;
    use serde_json::json;

    // ============== Enum Tests ==============

    #[test]
    fn test_hand_keypoint_parse() {
        assert_eq!(HandKeypoint::parse("Wrist"), HandKeypoint::Wrist);
        assert_eq!(HandKeypoint::Wrist.code(), 0);
        assert_eq!(HandKeypoint::PinkyTip.code(), 20);
        assert_eq!(HandKeypoint::from_code(8), HandKeypoint::IndexFingerTip);
        assert_eq!(HandKeypoint::parse("not-a-real-key"), HandKeypoint::Unknown);
        assert_eq!(HandKeypoint::Unknown.code(), -1);
    }

    #[test]
    fn test_pose_wire_names_preserved() {
        assert_eq!(PoseKeypoint::LeftEye.name(), "LeftEye");
        assert_eq!(PoseKeypoint::LeftEar.name(), "left_ear");
        assert_eq!(PoseKeypoint::from_name("left_ear"), PoseKeypoint::LeftEar);
        // Names are not normalized
        assert_eq!(PoseKeypoint::from_name("LeftEar"), PoseKeypoint::Unknown);
        assert_eq!(PoseKeypoint::from_name("left_eye"), PoseKeypoint::Unknown);
        assert_eq!(PoseKeypoint::RightAnkle.code(), 16);
    }

    #[test]
    fn test_wire_names_unique() {
        let mut names: Vec<&str> = PoseKeypoint::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PoseKeypoint::ALL.len());
        assert_eq!(HandKeypoint::ALL.len(), 22);
    }

    // ============== Estimation Tests ==============

    #[test]
    fn test_pose_round_trip() {
        let json = json!({
            "keypoints": {
                "Nose": {"x": 10.0, "y": 5.0},
                "left_ear": {"x": 6.0, "y": 4.0},
                "LeftShoulder": {"x": 3.0, "y": 20.0}
            },
            "score": 0.8
        });
        let pose = PoseEstimation::from_json(&json).unwrap();
        assert_eq!(pose.get(PoseKeypoint::LeftEar), Some(&Point::new(6.0, 4.0)));
        assert_eq!(pose.to_json(), json);
    }

    #[test]
    fn test_pose_unknown_keys_collapse() {
        let json = json!({
            "keypoints": {
                "Nose": {"x": 1.0, "y": 1.0},
                "Tail": {"x": 2.0, "y": 2.0},
                "Horn": {"x": 3.0, "y": 3.0}
            },
            "score": 0.5
        });
        let pose = PoseEstimation::from_json(&json).unwrap();
        assert_eq!(pose.keypoints.len(), 2);
        assert!(pose.get(PoseKeypoint::Unknown).is_some());
        assert!(pose.to_json()["keypoints"].get("Unknown").is_some());
    }

    #[test]
    fn test_hand_round_trip() {
        let hand = HandEstimation::new(Handedness::Right, 0.97)
            .with(HandKeypoint::Wrist, Point::new(0.0, 0.0))
            .with(HandKeypoint::ThumbTip, Point::new(12.0, -3.5));
        let json = hand.to_json();
        assert_eq!(json["handedness"], "Right");
        assert_eq!(json["keypoints"]["ThumbTip"], json!({"x": 12.0, "y": -3.5}));
        assert_eq!(HandEstimation::from_json(&json).unwrap(), hand);
    }

    #[test]
    fn test_hand_handedness_fallback() {
        let hand = HandEstimation::from_json(&json!({
            "handedness": "Both",
            "keypoints": {},
            "score": 0.1
        }))
        .unwrap();
        assert_eq!(hand.handedness, Handedness::Unknown);
    }

    #[test]
    fn test_bad_keypoint_value_path() {
        let err = PoseEstimation::from_json(&json!({
            "keypoints": {"Nose": {"x": 1.0}},
            "score": 0.5
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("keypoints.Nose.y"));
    }

    // ============== KeypointDetection Tests ==============

    #[test]
    fn test_detection_shapes_and_round_trip() {
        let detection = KeypointDetection::new(image_label())
            .with_pose(PoseEstimation::new(0.9).with(PoseKeypoint::Nose, Point::new(1.0, 2.0)))
            .with_hand(
                HandEstimation::new(Handedness::Left, 0.8)
                    .with(HandKeypoint::Wrist, Point::new(3.0, 4.0)),
            );

        let full = detection.to_json();
        assert_eq!(full["poses"][0]["keypoints"]["Nose"]["x"], 1.0);
        assert_eq!(full["hands"][0]["handedness"], "Left");
        assert!(full["file"].get("fileURL").is_some());
        assert!(detection.to_compact_json()["file"].get("fileURL").is_none());

        let parsed = KeypointDetection::from_json(&full).unwrap();
        assert_eq!(parsed, detection);
        assert_eq!(parsed.poses(), detection.poses());
        assert_eq!(parsed.hands(), detection.hands());
    }

    #[test]
    fn test_detection_hand_error_path() {
        let mut json = KeypointDetection::new(image_label()).to_json();
        json["hands"] = json!([{"keypoints": {}}]);
        let err = KeypointDetection::from_json(&json).unwrap_err();
        assert_eq!(err.field(), Some("hands[0].score"));
    }
}
