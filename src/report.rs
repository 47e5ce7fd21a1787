// Session report generation: recommendations and performance rating

use crate::models::{Emotion, SessionStatistics, Trend};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Severity flavor of a recommendation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Warning,
    Info,
    Success,
}

/// How urgently a recommendation should be acted on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One piece of actionable feedback derived from session statistics
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub category: &'static str,
    pub message: &'static str,
    pub priority: Priority,
}

/// Overall performance rating for the session
#[derive(Clone, Debug, Serialize)]
pub struct PerformanceScore {
    /// Weighted blend of average score and positivity, one decimal
    pub score: f64,
    pub rating: &'static str,
    pub color: &'static str,
}

/// Complete feedback report for one session
#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub performance: PerformanceScore,
    pub statistics: SessionStatistics,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

/// Builds the full report for a statistics snapshot
pub fn build_report(statistics: &SessionStatistics) -> SessionReport {
    SessionReport {
        performance: performance_score(statistics),
        statistics: statistics.clone(),
        recommendations: generate_recommendations(statistics),
        generated_at: Utc::now(),
    }
}

/// Derives recommendations from score, positivity, trend and the share of
/// specific problematic emotions
pub fn generate_recommendations(stats: &SessionStatistics) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if stats.average_score < 50.0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            category: "Overall Performance",
            message: "Your emotional expression could be more positive. Try to maintain a friendly and engaged demeanor.",
            priority: Priority::High,
        });
    } else if stats.average_score < 70.0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Info,
            category: "Overall Performance",
            message: "Good emotional expression overall. Consider being slightly more expressive to show enthusiasm.",
            priority: Priority::Medium,
        });
    } else {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            category: "Overall Performance",
            message: "Excellent emotional expression! You maintained a positive and professional demeanor.",
            priority: Priority::Low,
        });
    }

    if stats.positive_ratio < 0.5 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            category: "Emotional Balance",
            message: "Try to maintain more positive emotions during the interview. Practice relaxation techniques before interviews.",
            priority: Priority::High,
        });
    } else if stats.positive_ratio < 0.7 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Info,
            category: "Emotional Balance",
            message: "Your emotional balance is decent. Focus on staying calm and confident.",
            priority: Priority::Medium,
        });
    }

    match stats.recent_trend {
        Trend::Declining => recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            category: "Energy Level",
            message: "Your energy seems to be declining. Take short breaks during long interviews and stay hydrated.",
            priority: Priority::Medium,
        }),
        Trend::Improving => recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            category: "Energy Level",
            message: "Great! Your confidence is growing throughout the interview.",
            priority: Priority::Low,
        }),
        Trend::Stable => {}
    }

    let share = |emotion: Emotion| {
        stats
            .emotion_distribution
            .get(&emotion)
            .copied()
            .unwrap_or(0.0)
    };

    if share(Emotion::Fear) > 0.3 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            category: "Confidence",
            message: "You show signs of nervousness. Practice mock interviews to build confidence.",
            priority: Priority::High,
        });
    }

    if share(Emotion::Angry) > 0.2 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            category: "Composure",
            message: "Try to maintain composure even during challenging questions. Take a breath before answering.",
            priority: Priority::High,
        });
    }

    if share(Emotion::Sad) > 0.2 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Info,
            category: "Engagement",
            message: "Show more enthusiasm and energy. Sit up straight and make eye contact.",
            priority: Priority::Medium,
        });
    }

    recommendations
}

/// Blends the average score with the positivity ratio into a single rating
pub fn performance_score(stats: &SessionStatistics) -> PerformanceScore {
    let overall = stats.average_score * 0.6 + stats.positive_ratio * 100.0 * 0.4;

    let (rating, color) = if overall >= 80.0 {
        ("Excellent", "green")
    } else if overall >= 70.0 {
        ("Good", "lime")
    } else if overall >= 60.0 {
        ("Fair", "yellow")
    } else {
        ("Needs Improvement", "red")
    };

    PerformanceScore {
        score: (overall * 10.0).round() / 10.0,
        rating,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;
    use std::collections::HashMap;

    fn stats(
        average_score: f64,
        positive_ratio: f64,
        trend: Trend,
        distribution: &[(Emotion, f64)],
    ) -> SessionStatistics {
        SessionStatistics {
            total_frames: 10,
            average_score,
            min_score: 0.0,
            max_score: 100.0,
            emotion_distribution: distribution.iter().copied().collect::<HashMap<_, _>>(),
            positive_ratio,
            dominant_emotion: None,
            recent_trend: trend,
        }
    }

    fn categories(recommendations: &[Recommendation]) -> Vec<&'static str> {
        recommendations.iter().map(|r| r.category).collect()
    }

    #[test]
    fn low_score_session_gets_high_priority_warnings() {
        let stats = stats(40.0, 0.3, Trend::Stable, &[]);
        let recs = generate_recommendations(&stats);

        assert_eq!(recs[0].kind, RecommendationKind::Warning);
        assert_eq!(recs[0].category, "Overall Performance");
        assert_eq!(recs[0].priority, Priority::High);
        assert!(categories(&recs).contains(&"Emotional Balance"));
    }

    #[test]
    fn strong_session_gets_success_feedback_only() {
        let stats = stats(85.0, 0.9, Trend::Stable, &[]);
        let recs = generate_recommendations(&stats);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Success);
    }

    #[test]
    fn trend_drives_energy_feedback() {
        let declining = generate_recommendations(&stats(85.0, 0.9, Trend::Declining, &[]));
        assert!(categories(&declining).contains(&"Energy Level"));
        assert!(declining
            .iter()
            .any(|r| r.category == "Energy Level" && r.kind == RecommendationKind::Warning));

        let improving = generate_recommendations(&stats(85.0, 0.9, Trend::Improving, &[]));
        assert!(improving
            .iter()
            .any(|r| r.category == "Energy Level" && r.kind == RecommendationKind::Success));
    }

    #[test]
    fn problematic_emotion_shares_trigger_specific_advice() {
        let stats = stats(
            85.0,
            0.9,
            Trend::Stable,
            &[
                (Emotion::Fear, 0.35),
                (Emotion::Angry, 0.25),
                (Emotion::Sad, 0.25),
            ],
        );
        let recs = generate_recommendations(&stats);
        let cats = categories(&recs);

        assert!(cats.contains(&"Confidence"));
        assert!(cats.contains(&"Composure"));
        assert!(cats.contains(&"Engagement"));
    }

    #[test]
    fn emotion_shares_at_threshold_do_not_trigger() {
        let stats = stats(
            85.0,
            0.9,
            Trend::Stable,
            &[(Emotion::Fear, 0.3), (Emotion::Angry, 0.2)],
        );
        let cats = categories(&generate_recommendations(&stats));

        assert!(!cats.contains(&"Confidence"));
        assert!(!cats.contains(&"Composure"));
    }

    #[test]
    fn performance_rating_bands() {
        // 90 * 0.6 + 1.0 * 100 * 0.4 = 94
        let perf = performance_score(&stats(90.0, 1.0, Trend::Stable, &[]));
        assert_eq!(perf.rating, "Excellent");
        assert!((perf.score - 94.0).abs() < 1e-6);

        // 70 * 0.6 + 0.7 * 100 * 0.4 = 70
        let perf = performance_score(&stats(70.0, 0.7, Trend::Stable, &[]));
        assert_eq!(perf.rating, "Good");

        // 60 * 0.6 + 0.6 * 100 * 0.4 = 60
        let perf = performance_score(&stats(60.0, 0.6, Trend::Stable, &[]));
        assert_eq!(perf.rating, "Fair");

        let perf = performance_score(&stats(30.0, 0.2, Trend::Stable, &[]));
        assert_eq!(perf.rating, "Needs Improvement");
        assert_eq!(perf.color, "red");
    }

    #[test]
    fn report_bundles_statistics_and_recommendations() {
        let stats = stats(40.0, 0.3, Trend::Declining, &[]);
        let report = build_report(&stats);

        assert_eq!(report.performance.rating, "Needs Improvement");
        assert!(!report.recommendations.is_empty());
        assert_eq!(report.statistics.total_frames, 10);
    }
}
