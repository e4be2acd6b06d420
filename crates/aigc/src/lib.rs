//! # Cube AIGC
//!
//! Annotations produced by the AI services: facial expressions, body and
//! hand keypoints, speech recognition, speaker diarization and knowledge
//! articles.

pub mod diarization;
pub mod expression;
pub mod geometry;
pub mod keypoint;
pub mod knowledge;
pub mod speech;

// Re-exports
pub use diarization::{SpeakerIndicator, VoiceDiarization, LABEL_COUNSELOR, LABEL_CUSTOMER};
pub use expression::{Expression, FaceExpression, FacialExpressionResult};
pub use geometry::{BoundingBox, Point};
pub use keypoint::{
    HandEstimation, HandKeypoint, Handedness, KeypointDetection, PoseEstimation, PoseKeypoint,
};
pub use knowledge::{KnowledgeArticle, KnowledgeScope, ANONYMOUS_AUTHOR};
pub use speech::{EmotionRatio, Sentiment, SpeechEmotion, SpeechRecognitionInfo, VoiceSegment};
