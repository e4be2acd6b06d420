//! Speaker diarization of recordings and per-speaker indicators

use crate::speech::{EmotionRatio, SpeechEmotion, VoiceSegment};
use resource::FileLabel;
use serde_json::Value;
use shared::json::put_opt;
use shared::{keyed, shape_all, EntityBase, Fields, FromJson, JsonObject, Jsonable, Result, Shape, WireEnum};
use std::collections::BTreeMap;

/// Label given to the speaker who opens the recording
pub const LABEL_COUNSELOR: &str = "counselor";

/// Label given to every other speaker
pub const LABEL_CUSTOMER: &str = "customer";

/// A recording split into speaker turns
#[derive(Debug, Clone)]
pub struct VoiceDiarization {
    base: EntityBase,
    pub contact_id: i64,
    pub title: String,
    pub remark: String,
    pub file_code: String,
    /// The recording itself, when loaded
    pub file: Option<FileLabel>,
    /// Recording length in seconds
    pub duration: f64,
    /// Processing time in ms
    pub elapsed: i64,
    pub tracks: Vec<VoiceSegment>,
}

impl VoiceDiarization {
    pub fn new(base: EntityBase, contact_id: i64, file_code: impl Into<String>, duration: f64) -> Self {
        Self {
            base,
            contact_id,
            title: String::new(),
            remark: String::new(),
            file_code: file_code.into(),
            file: None,
            duration,
            elapsed: 0,
            tracks: Vec::new(),
        }
    }

    /// Builder: attach the recording file (its code replaces `file_code`)
    pub fn with_file(mut self, file: FileLabel) -> Self {
        self.file_code = file.file_code.clone();
        self.file = Some(file);
        self
    }

    /// Distinct speaker labels in order of first appearance
    pub fn track_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for track in &self.tracks {
            if !labels.contains(&track.label.as_str()) {
                labels.push(&track.label);
            }
        }
        labels
    }

    /// Number the tracks from 1 and relabel speakers: the first speaker
    /// becomes the counselor and the next distinct speaker the customer.
    /// A single speaker is always the customer.
    pub fn align_speaker_labels(&mut self) {
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.track = (i + 1).to_string();
        }

        let labels: Vec<String> = self.track_labels().into_iter().map(str::to_string).collect();
        tracing::debug!(id = self.base.id(), speakers = labels.len(), "Aligning speaker labels");
        match labels.as_slice() {
            [] => {}
            [_] => {
                for track in &mut self.tracks {
                    track.label = LABEL_CUSTOMER.to_string();
                }
            }
            [first, second, ..] => {
                for track in &mut self.tracks {
                    if &track.label == first {
                        track.label = LABEL_COUNSELOR.to_string();
                    } else if &track.label == second {
                        track.label = LABEL_CUSTOMER.to_string();
                    }
                }
            }
        }
    }

    /// Per-speaker indicators keyed by speaker label
    pub fn speaker_indicators(&self) -> BTreeMap<String, SpeakerIndicator> {
        let mut indicators: BTreeMap<String, SpeakerIndicator> = BTreeMap::new();
        for track in &self.tracks {
            indicators
                .entry(track.label.clone())
                .or_insert_with(|| SpeakerIndicator::new(&track.label, &track.label))
                .add_segment(track);
        }
        for indicator in indicators.values_mut() {
            indicator.finish(self.duration);
        }
        indicators
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = self.base.to_object();
        object.insert("contactId".to_string(), Value::from(self.contact_id));
        object.insert("title".to_string(), Value::from(self.title.clone()));
        object.insert("remark".to_string(), Value::from(self.remark.clone()));
        put_opt(&mut object, "file", self.file.as_ref().map(|f| f.to_shape(shape)));
        object.insert("fileCode".to_string(), Value::from(self.file_code.clone()));
        object.insert("duration".to_string(), Value::from(self.duration));
        object.insert("elapsed".to_string(), Value::from(self.elapsed));
        object.insert("tracks".to_string(), shape_all(&self.tracks, shape));
        Value::Object(object)
    }
}

impl Jsonable for VoiceDiarization {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for VoiceDiarization {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let file: Option<FileLabel> = fields.opt_entity("file")?;
        let file_code = match &file {
            Some(file) => file.file_code.clone(),
            None => fields.opt_string("fileCode")?.unwrap_or_default(),
        };

        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            contact_id: fields.opt_i64("contactId")?.unwrap_or(0),
            title: fields.opt_string("title")?.unwrap_or_default(),
            remark: fields.opt_string("remark")?.unwrap_or_default(),
            file_code,
            file,
            duration: fields.f64("duration")?,
            elapsed: fields.i64("elapsed")?,
            tracks: fields.entities("tracks")?,
        })
    }
}

shared::impl_entity!(VoiceDiarization);

// ============================================================================
// SpeakerIndicator
// ============================================================================

/// Speaking statistics of one speaker
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerIndicator {
    pub speaker: String,
    pub label: String,
    /// Seconds spoken
    pub total_duration: f64,
    pub total_words: i64,
    /// Utterances per emotion
    pub emotion_counts: BTreeMap<SpeechEmotion, i64>,
    /// Share of the recording spoken, in percent
    pub duration_ratio: i32,
    /// Words per minute
    pub rhythm: i32,
    pub emotion_ratio: EmotionRatio,
}

impl SpeakerIndicator {
    /// Empty indicator with every emotion counted at zero
    pub fn new(speaker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            label: label.into(),
            total_duration: 0.0,
            total_words: 0,
            emotion_counts: SpeechEmotion::ALL.iter().map(|e| (*e, 0)).collect(),
            duration_ratio: 0,
            rhythm: 0,
            emotion_ratio: EmotionRatio::default(),
        }
    }

    /// Accumulate one speaker turn
    pub fn add_segment(&mut self, segment: &VoiceSegment) {
        self.total_duration += segment.duration();
        self.total_words = self.total_words.saturating_add(segment.num_words() as i64);
        let count = self.emotion_counts.entry(segment.emotion).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Derive the ratios once every segment has been added
    pub fn finish(&mut self, recording_duration: f64) {
        if recording_duration > 0.0 {
            self.duration_ratio = (self.total_duration * 100.0 / recording_duration).round() as i32;
        }
        if self.total_duration > 0.0 {
            self.rhythm = (self.total_words as f64 / (self.total_duration / 60.0)).round() as i32;
        }
        self.emotion_ratio = EmotionRatio::from_counts(&self.emotion_counts);
    }
}

impl Jsonable for SpeakerIndicator {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert("speaker".to_string(), Value::from(self.speaker.clone()));
        object.insert("label".to_string(), Value::from(self.label.clone()));
        object.insert("totalDuration".to_string(), Value::from(self.total_duration));
        object.insert("totalWords".to_string(), Value::from(self.total_words));
        object.insert(
            "emotionCounts".to_string(),
            keyed::encode_with(&self.emotion_counts, |count| Value::from(*count)),
        );
        object.insert("durationRatio".to_string(), Value::from(self.duration_ratio));
        object.insert("rhythm".to_string(), Value::from(self.rhythm));
        object.insert("emotionRatio".to_string(), self.emotion_ratio.to_json());
        Value::Object(object)
    }
}

impl FromJson for SpeakerIndicator {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let emotion_counts = keyed::decode_with(
            fields.value("emotionCounts")?,
            SpeechEmotion::from_name,
            keyed::decode_i64,
        )
        .map_err(|e| shared::json::nest(e, "emotionCounts"))?;

        Ok(Self {
            speaker: fields.string("speaker")?,
            label: fields.string("label")?,
            total_duration: fields.f64("totalDuration")?,
            total_words: fields.i64("totalWords")?,
            emotion_counts,
            duration_ratio: fields.i32("durationRatio")?,
            rhythm: fields.i32("rhythm")?,
            emotion_ratio: fields.entity("emotionRatio")?,
        })
    }
}
