// Core data models for the interview emotion analysis engine

use crate::error::{EmotionAnalysisError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// The closed set of recognized emotions.
///
/// The declaration order is canonical: it is the iteration and display order
/// and breaks ties when two emotions carry equal probability or equal counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// All emotions in canonical order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Position of this emotion in the canonical order
    pub fn canonical_index(self) -> usize {
        self as usize
    }

    /// Whether this emotion counts as interview-appropriate
    pub fn is_positive(self) -> bool {
        matches!(self, Emotion::Happy | Emotion::Neutral | Emotion::Surprise)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Emotion::Angry => "Angry",
            Emotion::Disgust => "Disgust",
            Emotion::Fear => "Fear",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Surprise => "Surprise",
            Emotion::Neutral => "Neutral",
        };
        write!(f, "{name}")
    }
}

/// Probability distribution over the seven emotions.
///
/// Always constructed through [`EmotionDistribution::from_probs`], which
/// enforces the estimator contract: exactly seven non-negative finite values
/// with a positive sum, normalized so the stored values sum to 1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct EmotionDistribution {
    probs: [f64; 7],
}

impl EmotionDistribution {
    /// Builds a distribution from raw per-emotion values in canonical order.
    ///
    /// The values are normalized by their sum. Fails with a schema error when
    /// the slice is not exactly seven values, contains a negative or
    /// non-finite value, or sums to zero.
    pub fn from_probs(values: &[f64]) -> Result<Self> {
        if values.len() != Emotion::ALL.len() {
            return Err(EmotionAnalysisError::DistributionSchema(format!(
                "expected {} emotion probabilities, got {}",
                Emotion::ALL.len(),
                values.len()
            )));
        }

        let mut probs = [0.0f64; 7];
        for (i, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(EmotionAnalysisError::DistributionSchema(format!(
                    "invalid probability {} for {}",
                    value,
                    Emotion::ALL[i]
                )));
            }
            probs[i] = value;
        }

        let total: f64 = probs.iter().sum();
        if total <= 0.0 {
            return Err(EmotionAnalysisError::DistributionSchema(
                "emotion probabilities sum to zero".to_string(),
            ));
        }

        for p in &mut probs {
            *p /= total;
        }

        Ok(Self { probs })
    }

    /// Probability assigned to a single emotion
    pub fn get(&self, emotion: Emotion) -> f64 {
        self.probs[emotion.canonical_index()]
    }

    /// Iterates (emotion, probability) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.iter().map(|&e| (e, self.get(e)))
    }

    /// The emotion with maximal probability and that probability.
    ///
    /// Ties resolve to the emotion appearing first in canonical order.
    pub fn dominant(&self) -> (Emotion, f64) {
        let mut best = Emotion::ALL[0];
        let mut best_prob = self.probs[0];
        for &emotion in &Emotion::ALL[1..] {
            let prob = self.get(emotion);
            if prob > best_prob {
                best = emotion;
                best_prob = prob;
            }
        }
        (best, best_prob)
    }
}

impl Serialize for EmotionDistribution {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Emotion::ALL.len()))?;
        for (emotion, prob) in self.iter() {
            map.serialize_entry(&emotion, &prob)?;
        }
        map.end()
    }
}

/// A single decoded video frame with RGB data
#[derive(Clone, Debug)]
pub struct Frame {
    /// Raw RGB pixel data (width * height * 3 bytes)
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    /// Creates a new Frame with the given parameters
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Checks that the buffer is a well-formed RGB frame
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EmotionAnalysisError::InvalidInput(format!(
                "frame has zero dimension ({}x{})",
                self.width, self.height
            )));
        }

        let expected = self.width as usize * self.height as usize * 3;
        if self.data.len() != expected {
            return Err(EmotionAnalysisError::InvalidInput(format!(
                "frame buffer holds {} bytes, expected {} for {}x{} RGB",
                self.data.len(),
                expected,
                self.width,
                self.height
            )));
        }

        Ok(())
    }
}

/// Axis-aligned face bounding box within a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Analysis result for one detected face; immutable after creation
#[derive(Clone, Debug, Serialize)]
pub struct FaceResult {
    /// Bounding box of the face within the frame
    pub region: FaceRegion,
    /// Full probability distribution over emotions
    pub emotions: EmotionDistribution,
    /// Emotion with the highest probability
    pub dominant_emotion: Emotion,
    /// Probability of the dominant emotion
    pub confidence: f64,
    /// Interview-appropriateness score (0-100)
    pub score: f64,
    /// Whether the dominant emotion is interview-appropriate
    pub is_positive: bool,
}

/// Analysis result for one frame; never mutated after creation
#[derive(Clone, Debug, Serialize)]
pub struct FrameResult {
    /// When the frame was analyzed
    pub timestamp: DateTime<Utc>,
    /// Monotonic frame sequence number, starting at 1
    pub frame_number: u64,
    /// Number of faces found in the frame
    pub faces_detected: usize,
    /// Per-face results in detection order
    pub faces: Vec<FaceResult>,
}

/// Compacted projection of one face result, appended to session history
#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub emotion: Emotion,
    pub score: f64,
    pub confidence: f64,
}

/// Direction of the recent score trend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Aggregated statistics over a slice of session history
#[derive(Clone, Debug, Serialize)]
pub struct SessionStatistics {
    /// Number of history entries covered (one per detected face)
    pub total_frames: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Share of each observed emotion among the covered entries
    pub emotion_distribution: HashMap<Emotion, f64>,
    /// Fraction of entries whose emotion is interview-appropriate
    pub positive_ratio: f64,
    /// Most frequent emotion, if any entries exist
    pub dominant_emotion: Option<Emotion>,
    /// Trend over the most recent entries
    pub recent_trend: Trend,
}
