// Session statistics and trend classification over emotion history

use crate::models::{Emotion, HistoryEntry, SessionStatistics, Trend};
use std::collections::HashMap;

/// Number of most recent entries considered for the trend
const TREND_WINDOW: usize = 10;

/// Slope magnitude (score units per entry) separating a trend from noise
const TREND_SLOPE_THRESHOLD: f64 = 2.0;

/// Aggregates a slice of history into session statistics.
///
/// With `last_n` set, only the most recent `n` entries are covered. An empty
/// slice yields the zero state (total 0, all scores 0, empty distribution,
/// ratio 0, no dominant emotion, stable trend) rather than an error, so
/// statistics queries are always safe to issue.
pub fn session_statistics(
    history: &[HistoryEntry],
    last_n: Option<usize>,
) -> SessionStatistics {
    let entries = match last_n {
        Some(n) if n < history.len() => &history[history.len() - n..],
        _ => history,
    };

    if entries.is_empty() {
        return SessionStatistics {
            total_frames: 0,
            average_score: 0.0,
            min_score: 0.0,
            max_score: 0.0,
            emotion_distribution: HashMap::new(),
            positive_ratio: 0.0,
            dominant_emotion: None,
            recent_trend: Trend::Stable,
        };
    }

    let total = entries.len();
    let scores: Vec<f64> = entries.iter().map(|e| e.score).collect();

    let average_score = scores.iter().sum::<f64>() / total as f64;
    let min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut counts: HashMap<Emotion, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.emotion).or_insert(0) += 1;
    }

    let emotion_distribution = counts
        .iter()
        .map(|(&emotion, &count)| (emotion, count as f64 / total as f64))
        .collect();

    let positive_count = entries.iter().filter(|e| e.emotion.is_positive()).count();
    let positive_ratio = positive_count as f64 / total as f64;

    // Highest count wins; ties resolve to the earlier canonical emotion
    let mut dominant_emotion = None;
    let mut dominant_count = 0usize;
    for &emotion in &Emotion::ALL {
        let count = counts.get(&emotion).copied().unwrap_or(0);
        if count > dominant_count {
            dominant_emotion = Some(emotion);
            dominant_count = count;
        }
    }

    let window_start = scores.len().saturating_sub(TREND_WINDOW);
    let recent_trend = score_trend(&scores[window_start..]);

    SessionStatistics {
        total_frames: total,
        average_score,
        min_score,
        max_score,
        emotion_distribution,
        positive_ratio,
        dominant_emotion,
        recent_trend,
    }
}

/// Classifies the direction of a score sequence.
///
/// Fits an ordinary least-squares line over (index, score) and compares the
/// slope against the fixed threshold: above +2 improving, below -2
/// declining, otherwise stable. Fewer than two points are always stable.
pub fn score_trend(scores: &[f64]) -> Trend {
    if scores.len() < 2 {
        return Trend::Stable;
    }

    let n = scores.len() as f64;
    let sum_x: f64 = (0..scores.len()).map(|i| i as f64).sum();
    let sum_y: f64 = scores.iter().sum();
    let sum_xy: f64 = scores.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..scores.len()).map(|i| (i as f64) * (i as f64)).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);

    if slope > TREND_SLOPE_THRESHOLD {
        Trend::Improving
    } else if slope < -TREND_SLOPE_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
