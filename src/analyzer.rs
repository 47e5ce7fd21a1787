// Frame analysis orchestration: detection, estimation, scoring, history

use crate::error::Result;
use crate::estimator::EmotionEstimator;
use crate::face::{self, FaceDetector};
use crate::models::{FaceResult, Frame, FrameResult, HistoryEntry, SessionStatistics};
use crate::score::emotion_score;
use crate::stats::session_statistics;
use chrono::Utc;
use tokio::sync::broadcast;

/// Capacity of the frame-result broadcast channel
const RESULT_CHANNEL_CAPACITY: usize = 32;

/// Runs the full per-frame pipeline and accumulates session history.
///
/// One analyzer owns one history and one frame counter; callers that
/// multiplex sessions keep one analyzer per session (see
/// [`crate::session::SessionManager`]) or serialize access externally.
pub struct EmotionAnalyzer {
    detector: FaceDetector,
    estimator: EmotionEstimator,
    history: Vec<HistoryEntry>,
    frame_count: u64,
    result_sender: broadcast::Sender<FrameResult>,
}

impl EmotionAnalyzer {
    /// Creates a new analyzer from a face detector and an estimator
    pub fn new(detector: FaceDetector, estimator: EmotionEstimator) -> Self {
        let (result_sender, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        Self {
            detector,
            estimator,
            history: Vec::new(),
            frame_count: 0,
            result_sender,
        }
    }

    /// Subscribes to frame results as they are produced
    pub fn subscribe(&self) -> broadcast::Receiver<FrameResult> {
        self.result_sender.subscribe()
    }

    /// Analyzes a single frame.
    ///
    /// Detects faces, estimates and scores each one in detection order, and
    /// appends one history entry per face. The frame counter advances by
    /// exactly one per successful call, faces or not. A failure anywhere
    /// leaves history and counter untouched; there are no partial writes.
    pub fn analyze(&mut self, frame: &Frame) -> Result<FrameResult> {
        let gray = face::to_grayscale(frame)?;
        let regions = self.detector.detect_in_gray(&gray)?;

        let timestamp = Utc::now();
        let mut faces = Vec::with_capacity(regions.len());
        let mut entries = Vec::with_capacity(regions.len());

        for region in regions {
            let face_roi = face::extract_region(&gray, &region)?;
            let emotions = self.estimator.estimate(&face_roi)?;

            let (dominant_emotion, confidence) = emotions.dominant();
            let score = emotion_score(&emotions);

            entries.push(HistoryEntry {
                timestamp,
                emotion: dominant_emotion,
                score,
                confidence,
            });

            faces.push(FaceResult {
                region,
                emotions,
                dominant_emotion,
                confidence,
                score,
                is_positive: dominant_emotion.is_positive(),
            });
        }

        // Every face succeeded; commit counter and history together
        self.frame_count += 1;
        self.history.extend(entries);

        let result = FrameResult {
            timestamp,
            frame_number: self.frame_count,
            faces_detected: faces.len(),
            faces,
        };

        // Nobody listening is fine
        let _ = self.result_sender.send(result.clone());

        Ok(result)
    }

    /// Computes statistics over the accumulated history, optionally limited
    /// to the most recent `last_n` entries
    pub fn statistics(&self, last_n: Option<usize>) -> SessionStatistics {
        session_statistics(&self.history, last_n)
    }

    /// The accumulated history in append order
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of frames analyzed since creation or the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clears history and frame counter together.
    ///
    /// Exclusive access makes the reset atomic: no caller can observe the
    /// history cleared with the counter still set, or the reverse.
    pub fn reset(&mut self) {
        self.history.clear();
        self.frame_count = 0;
    }
}
