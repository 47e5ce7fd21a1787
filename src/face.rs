// Face detection module using OpenCV Haar Cascade

use crate::error::{EmotionAnalysisError, Result};
use crate::models::{FaceRegion, Frame};
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::{self, CascadeClassifier};
use opencv::prelude::*;
use tracing::error;

/// Face detector using OpenCV Haar Cascade
pub struct FaceDetector {
    classifier: CascadeClassifier,
}

impl FaceDetector {
    /// Creates a new FaceDetector by loading the Haar Cascade classifier
    pub fn new(cascade_path: &str) -> Result<Self> {
        let classifier = CascadeClassifier::new(cascade_path).map_err(|e| {
            error!("Failed to load Haar Cascade: {}", e);
            EmotionAnalysisError::ModelLoad(format!("Haar Cascade load failed: {e}"))
        })?;

        if classifier.empty()? {
            return Err(EmotionAnalysisError::ModelLoad(
                "Haar Cascade classifier is empty".to_string(),
            ));
        }

        Ok(Self { classifier })
    }

    /// Detects faces in the given frame.
    ///
    /// Returns face regions in the classifier's native detection order,
    /// restricted to regions with positive dimensions that lie fully inside
    /// the frame. Fails with an invalid-input error on a malformed frame so
    /// callers can distinguish "no face" from "bad input".
    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>> {
        let gray = to_grayscale(frame)?;
        self.detect_in_gray(&gray)
    }

    /// Runs the cascade over an already-converted grayscale frame
    pub(crate) fn detect_in_gray(&mut self, gray: &Mat) -> Result<Vec<FaceRegion>> {
        let mut faces = Vector::<Rect>::new();
        self.classifier
            .detect_multi_scale(
                gray,
                &mut faces,
                1.1,                            // scale factor
                5,                              // min neighbors
                objdetect::CASCADE_SCALE_IMAGE, // flags
                Size::new(48, 48),              // min size
                Size::new(0, 0),                // max size (0,0 means no limit)
            )
            .map_err(|e| {
                EmotionAnalysisError::FaceDetection(format!("Face detection failed: {e}"))
            })?;

        let cols = gray.cols();
        let rows = gray.rows();

        // Keep only regions the classifier placed fully inside the frame
        let regions = faces
            .iter()
            .filter(|r| {
                r.width > 0
                    && r.height > 0
                    && r.x >= 0
                    && r.y >= 0
                    && r.x + r.width <= cols
                    && r.y + r.height <= rows
            })
            .map(|r| FaceRegion {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
            })
            .collect();

        Ok(regions)
    }
}

/// Converts a validated RGB frame to a single-channel grayscale Mat
pub(crate) fn to_grayscale(frame: &Frame) -> Result<Mat> {
    frame.validate()?;

    let mat = Mat::from_slice(&frame.data)
        .map_err(|e| EmotionAnalysisError::InvalidInput(format!("Failed to create Mat: {e}")))?;

    let mat = mat
        .reshape(3, frame.height as i32)
        .map_err(|e| EmotionAnalysisError::InvalidInput(format!("Failed to reshape Mat: {e}")))?;

    let mut gray = Mat::default();
    imgproc::cvt_color(
        &mat,
        &mut gray,
        imgproc::COLOR_RGB2GRAY,
        0,
        opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
    )
    .map_err(|e| {
        EmotionAnalysisError::FaceDetection(format!("Failed to convert to grayscale: {e}"))
    })?;

    Ok(gray)
}

/// Extracts a face region from the grayscale frame as a continuous Mat
pub(crate) fn extract_region(gray: &Mat, region: &FaceRegion) -> Result<Mat> {
    let rect = Rect::new(region.x, region.y, region.width, region.height);

    let face_roi = Mat::roi(gray, rect).map_err(|e| {
        EmotionAnalysisError::FaceDetection(format!("Failed to crop face region: {e}"))
    })?;

    // Clone the ROI so the Mat is continuous in memory
    face_roi
        .try_clone()
        .map_err(|e| EmotionAnalysisError::FaceDetection(format!("Failed to clone face ROI: {e}")))
}
