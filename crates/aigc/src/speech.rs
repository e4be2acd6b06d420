//! Speech recognition records, sentiment and speech emotion

use serde::{Deserialize, Serialize};
use shared::WireEnum;

/// Sentiment polarity of a text or utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// Both positive and negative
    Both,
    Undefined,
}

impl WireEnum for Sentiment {
    type Code = i32;
    const FAMILY: &'static str = "Sentiment";
    const FALLBACK: Self = Sentiment::Undefined;
    const ALL: &'static [Self] = &[
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Both,
        Sentiment::Undefined,
    ];

    fn code(&self) -> i32 {
        match self {
            Sentiment::Neutral => 0,
            Sentiment::Positive => 1,
            Sentiment::Negative => 2,
            Sentiment::Both => 3,
            Sentiment::Undefined => -1,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Both => "Both",
            Sentiment::Undefined => "Undefined",
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.name().to_string()
    }
}

impl From<String> for Sentiment {
    fn from(name: String) -> Self {
        Sentiment::from_name(&name)
    }
}

/// Emotion detected in a speaker's voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SpeechEmotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Surprise,
}

impl WireEnum for SpeechEmotion {
    type Code = i32;
    const FAMILY: &'static str = "SpeechEmotion";
    const FALLBACK: Self = SpeechEmotion::Neutral;
    const ALL: &'static [Self] = &[
        SpeechEmotion::Neutral,
        SpeechEmotion::Happy,
        SpeechEmotion::Sad,
        SpeechEmotion::Angry,
        SpeechEmotion::Fearful,
        SpeechEmotion::Surprise,
    ];

    fn code(&self) -> i32 {
        match self {
            SpeechEmotion::Neutral => 0,
            SpeechEmotion::Happy => 1,
            SpeechEmotion::Sad => 2,
            SpeechEmotion::Angry => 3,
            SpeechEmotion::Fearful => 4,
            SpeechEmotion::Surprise => 5,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SpeechEmotion::Neutral => "Neutral",
            SpeechEmotion::Happy => "Happy",
            SpeechEmotion::Sad => "Sad",
            SpeechEmotion::Angry => "Angry",
            SpeechEmotion::Fearful => "Fearful",
            SpeechEmotion::Surprise => "Surprise",
        }
    }
}

impl SpeechEmotion {
    /// Weight of the emotion on a negative-to-positive scale
    pub fn weight(&self) -> f64 {
        match self {
            SpeechEmotion::Angry => -0.2,
            SpeechEmotion::Fearful => -0.3,
            SpeechEmotion::Happy => 0.8,
            SpeechEmotion::Neutral => 0.0,
            SpeechEmotion::Sad => -0.5,
            SpeechEmotion::Surprise => 0.2,
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        match self.weight() {
            w if w > 0.0 => Sentiment::Positive,
            w if w < 0.0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

impl From<SpeechEmotion> for String {
    fn from(emotion: SpeechEmotion) -> Self {
        emotion.name().to_string()
    }
}

impl From<String> for SpeechEmotion {
    fn from(name: String) -> Self {
        SpeechEmotion::from_name(&name)
    }
}

/// Share of positive, negative and neutral utterances, in percent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionRatio {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl EmotionRatio {
    /// Ratio from per-emotion utterance counts
    pub fn from_counts<'a>(counts: impl IntoIterator<Item = (&'a SpeechEmotion, &'a i64)>) -> Self {
        // f64 sums cannot overflow on document-supplied counts
        let (mut positive, mut negative, mut neutral) = (0.0f64, 0.0f64, 0.0f64);
        for (emotion, count) in counts {
            let count = (*count).max(0) as f64;
            match emotion.sentiment() {
                Sentiment::Positive => positive += count,
                Sentiment::Negative => negative += count,
                _ => neutral += count,
            }
        }
        let total = positive + negative + neutral;
        if total == 0.0 {
            return Self::default();
        }
        let percent = |n: f64| n * 100.0 / total;
        Self {
            positive: percent(positive),
            negative: percent(negative),
            neutral: percent(neutral),
        }
    }

    pub fn dominant(&self) -> Sentiment {
        if self.positive == 0.0 && self.negative == 0.0 && self.neutral == 0.0 {
            Sentiment::Undefined
        } else if self.positive > self.negative && self.positive >= self.neutral {
            Sentiment::Positive
        } else if self.negative > self.positive && self.negative >= self.neutral {
            Sentiment::Negative
        } else if self.positive > 0.0 && self.positive == self.negative && self.positive >= self.neutral {
            Sentiment::Both
        } else {
            Sentiment::Neutral
        }
    }
}

/// Text recognized from an audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecognitionInfo {
    /// Code of the source audio file
    pub file_code: String,
    pub lang: String,
    pub text: String,
    #[serde(default)]
    pub words: Vec<String>,
    /// Recognition time in ms
    #[serde(default)]
    pub elapsed: i64,
}

impl SpeechRecognitionInfo {
    pub fn new(file_code: impl Into<String>, lang: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            file_code: file_code.into(),
            lang: lang.into(),
            words: text.split_whitespace().map(str::to_string).collect(),
            text,
            elapsed: 0,
        }
    }
}

/// One speaker turn within a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSegment {
    /// Track number, 1-based
    pub track: String,
    /// Speaker label
    pub label: String,
    /// Offsets in seconds
    pub start: f64,
    pub end: f64,
    #[serde(default = "neutral")]
    pub emotion: SpeechEmotion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognition: Option<SpeechRecognitionInfo>,
}

fn neutral() -> SpeechEmotion {
    SpeechEmotion::Neutral
}

impl VoiceSegment {
    pub fn new(label: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            track: String::new(),
            label: label.into(),
            start,
            end,
            emotion: SpeechEmotion::Neutral,
            recognition: None,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn num_words(&self) -> usize {
        self.recognition.as_ref().map_or(0, |r| r.words.len())
    }
}

shared::impl_serde_jsonable!(EmotionRatio, SpeechRecognitionInfo, VoiceSegment);
