//! End-to-end pipeline tests over the analyzer and session registry.
//!
//! These tests need the OpenCV frontal-face Haar cascade. They look for it in
//! the repository assets and the usual system install locations (or the
//! INTERVIEW_EMOTION_CASCADE environment variable) and skip when none is
//! found, so the suite stays green on machines without the cascade data.

use interview_emotion::analyzer::EmotionAnalyzer;
use interview_emotion::error::EmotionAnalysisError;
use interview_emotion::estimator::EmotionEstimator;
use interview_emotion::face::FaceDetector;
use interview_emotion::models::{Frame, Trend};
use interview_emotion::session::SessionManager;
use std::path::Path;

fn find_cascade() -> Option<String> {
    if let Ok(path) = std::env::var("INTERVIEW_EMOTION_CASCADE") {
        if Path::new(&path).exists() {
            return Some(path);
        }
    }

    let candidates = [
        "assets/models/haarcascade_frontalface_default.xml",
        "/usr/share/opencv4/haarcascades/haarcascade_frontalface_default.xml",
        "/usr/local/share/opencv4/haarcascades/haarcascade_frontalface_default.xml",
        "/usr/share/opencv/haarcascades/haarcascade_frontalface_default.xml",
    ];

    candidates
        .iter()
        .find(|path| Path::new(path).exists())
        .map(|path| (*path).to_string())
}

fn heuristic_analyzer(cascade: &str) -> EmotionAnalyzer {
    let detector = FaceDetector::new(cascade).expect("cascade should load");
    EmotionAnalyzer::new(detector, EmotionEstimator::heuristic())
}

/// A uniform dark frame contains no detectable face
fn faceless_frame() -> Frame {
    Frame::new(vec![20u8; 320 * 240 * 3], 320, 240)
}

#[test]
fn zero_face_frame_advances_counter_without_history() {
    let Some(cascade) = find_cascade() else {
        eprintln!("skipping: no Haar cascade available");
        return;
    };
    let mut analyzer = heuristic_analyzer(&cascade);

    let result = analyzer.analyze(&faceless_frame()).unwrap();

    assert_eq!(result.frame_number, 1);
    assert_eq!(result.faces_detected, 0);
    assert!(result.faces.is_empty());
    assert!(analyzer.history().is_empty());

    // The counter keeps advancing one per call.
    let result = analyzer.analyze(&faceless_frame()).unwrap();
    assert_eq!(result.frame_number, 2);
    assert_eq!(analyzer.frame_count(), 2);
}

#[test]
fn malformed_frame_is_rejected_without_state_change() {
    let Some(cascade) = find_cascade() else {
        eprintln!("skipping: no Haar cascade available");
        return;
    };
    let mut analyzer = heuristic_analyzer(&cascade);

    // Buffer too short for the claimed dimensions.
    let bad = Frame::new(vec![0u8; 100], 320, 240);
    let err = analyzer.analyze(&bad).unwrap_err();
    assert!(matches!(err, EmotionAnalysisError::InvalidInput(_)));

    // No partial writes: counter and history are untouched.
    assert_eq!(analyzer.frame_count(), 0);
    assert!(analyzer.history().is_empty());

    let result = analyzer.analyze(&faceless_frame()).unwrap();
    assert_eq!(result.frame_number, 1);
}

#[test]
fn statistics_after_reset_observe_the_empty_state() {
    let Some(cascade) = find_cascade() else {
        eprintln!("skipping: no Haar cascade available");
        return;
    };
    let mut analyzer = heuristic_analyzer(&cascade);

    analyzer.analyze(&faceless_frame()).unwrap();
    analyzer.analyze(&faceless_frame()).unwrap();
    assert_eq!(analyzer.frame_count(), 2);

    analyzer.reset();

    assert_eq!(analyzer.frame_count(), 0);
    assert!(analyzer.history().is_empty());

    let stats = analyzer.statistics(None);
    assert_eq!(stats.total_frames, 0);
    assert_eq!(stats.average_score, 0.0);
    assert!(stats.emotion_distribution.is_empty());
    assert_eq!(stats.positive_ratio, 0.0);
    assert_eq!(stats.dominant_emotion, None);
    assert_eq!(stats.recent_trend, Trend::Stable);
}

#[test]
fn frame_results_reach_subscribers() {
    let Some(cascade) = find_cascade() else {
        eprintln!("skipping: no Haar cascade available");
        return;
    };
    let mut analyzer = heuristic_analyzer(&cascade);
    let mut receiver = analyzer.subscribe();

    analyzer.analyze(&faceless_frame()).unwrap();

    let broadcast = receiver.try_recv().unwrap();
    assert_eq!(broadcast.frame_number, 1);
    assert_eq!(broadcast.faces_detected, 0);
}

#[test]
fn sessions_keep_independent_state() {
    let Some(cascade) = find_cascade() else {
        eprintln!("skipping: no Haar cascade available");
        return;
    };
    let manager = SessionManager::new(cascade, None);

    let first = manager.session("interview-1").unwrap();
    let second = manager.session("interview-2").unwrap();

    first.lock().unwrap().analyze(&faceless_frame()).unwrap();
    first.lock().unwrap().analyze(&faceless_frame()).unwrap();
    second.lock().unwrap().analyze(&faceless_frame()).unwrap();

    assert_eq!(first.lock().unwrap().frame_count(), 2);
    assert_eq!(second.lock().unwrap().frame_count(), 1);

    // Resetting one session leaves the other alone.
    first.lock().unwrap().reset();
    assert_eq!(first.lock().unwrap().frame_count(), 0);
    assert_eq!(second.lock().unwrap().frame_count(), 1);

    // The same id resolves to the same analyzer instance.
    let again = manager.session("interview-2").unwrap();
    assert_eq!(again.lock().unwrap().frame_count(), 1);

    assert!(manager.remove("interview-1"));
    assert!(!manager.remove("interview-1"));
    assert_eq!(manager.len(), 1);

    // A removed id starts over with fresh state.
    let fresh = manager.session("interview-1").unwrap();
    assert_eq!(fresh.lock().unwrap().frame_count(), 0);
}

#[test]
fn detector_distinguishes_bad_input_from_no_face() {
    let Some(cascade) = find_cascade() else {
        eprintln!("skipping: no Haar cascade available");
        return;
    };
    let mut detector = FaceDetector::new(&cascade).unwrap();

    let empty = Frame::new(Vec::new(), 0, 0);
    let err = detector.detect(&empty).unwrap_err();
    assert!(matches!(err, EmotionAnalysisError::InvalidInput(_)));

    let regions = detector.detect(&faceless_frame()).unwrap();
    assert!(regions.is_empty());
}
