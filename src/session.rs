// Session registry: one analyzer (and one history) per session id

use crate::analyzer::EmotionAnalyzer;
use crate::error::Result;
use crate::estimator::EmotionEstimator;
use crate::face::FaceDetector;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

struct SessionEntry {
    analyzer: Arc<Mutex<EmotionAnalyzer>>,
    created_at: DateTime<Utc>,
}

/// Keeps one mutex-guarded [`EmotionAnalyzer`] per session id.
///
/// Every session owns its detector, estimator, history and frame counter, so
/// resetting or removing one session never disturbs another. Sessions are
/// created on first use and live until explicitly removed.
pub struct SessionManager {
    cascade_path: String,
    model_path: Option<String>,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionManager {
    /// Creates a manager that builds analyzers from the given cascade and
    /// optional ONNX model
    pub fn new(cascade_path: impl Into<String>, model_path: Option<String>) -> Self {
        Self {
            cascade_path: cascade_path.into(),
            model_path,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the analyzer for a session, creating it on first use
    pub fn session(&self, session_id: &str) -> Result<Arc<Mutex<EmotionAnalyzer>>> {
        let mut sessions = self.sessions.lock().expect("session map poisoned");

        if let Some(entry) = sessions.get(session_id) {
            return Ok(entry.analyzer.clone());
        }

        let detector = FaceDetector::new(&self.cascade_path)?;
        let estimator = EmotionEstimator::from_model_path(self.model_path.as_deref())?;
        let analyzer = Arc::new(Mutex::new(EmotionAnalyzer::new(detector, estimator)));

        info!("Created analysis session {}", session_id);
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                analyzer: analyzer.clone(),
                created_at: Utc::now(),
            },
        );

        Ok(analyzer)
    }

    /// Removes a session and drops its history; returns whether it existed
    pub fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let removed = sessions.remove(session_id).is_some();
        if removed {
            info!("Removed analysis session {}", session_id);
        }
        removed
    }

    /// Creation time of a session, if it exists
    pub fn created_at(&self, session_id: &str) -> Option<DateTime<Utc>> {
        let sessions = self.sessions.lock().expect("session map poisoned");
        sessions.get(session_id).map(|entry| entry.created_at)
    }

    /// Ids of all live sessions
    pub fn session_ids(&self) -> Vec<String> {
        let sessions = self.sessions.lock().expect("session map poisoned");
        sessions.keys().cloned().collect()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session map poisoned").len()
    }

    /// Whether no sessions exist
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
