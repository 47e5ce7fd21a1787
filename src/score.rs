// Interview-appropriateness scoring over emotion distributions

use crate::models::{Emotion, EmotionDistribution};

/// Scoring weight of an emotion for interview assessment.
///
/// Higher weights mark emotions an interviewer reads as engaged and
/// composed.
pub fn emotion_weight(emotion: Emotion) -> f64 {
    match emotion {
        Emotion::Happy => 1.0,
        Emotion::Neutral => 0.8,
        Emotion::Surprise => 0.6,
        Emotion::Fear => 0.3,
        Emotion::Sad => 0.2,
        Emotion::Disgust => 0.1,
        Emotion::Angry => 0.0,
    }
}

/// Reduces an emotion distribution to a single score in [0, 100].
///
/// Score = 100 * sum over emotions of probability * weight. Pure function;
/// a well-formed distribution always yields a score in range.
pub fn emotion_score(distribution: &EmotionDistribution) -> f64 {
    let weighted: f64 = distribution
        .iter()
        .map(|(emotion, prob)| prob * emotion_weight(emotion))
        .sum();

    weighted * 100.0
}
