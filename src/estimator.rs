// Emotion estimation module: ONNX model inference with a heuristic fallback

use crate::error::{EmotionAnalysisError, Result};
use crate::models::{Emotion, EmotionDistribution};
use opencv::core::{self, Mat, Size, Vector};
use opencv::imgproc;
use opencv::prelude::*;
use ort::session::Session;
use ort::value::Value;
use tracing::error;

/// Model input edge length in pixels
const MODEL_INPUT_SIZE: i32 = 48;

/// Estimation backend, fixed at construction time
enum Backend {
    /// Trained ONNX classifier producing one probability per emotion
    Model(Session),
    /// Deterministic image-feature heuristic
    Heuristic,
}

/// Produces an emotion probability distribution for one face region.
///
/// Runs a trained ONNX model when one was supplied at construction and falls
/// back to a deterministic heuristic over simple grayscale features
/// otherwise.
pub struct EmotionEstimator {
    backend: Backend,
}

impl EmotionEstimator {
    /// Creates a model-backed estimator by loading the ONNX model
    pub fn with_model(model_path: &str) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| {
                EmotionAnalysisError::ModelLoad(format!("Failed to create session builder: {e}"))
            })?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load ONNX model: {}", e);
                EmotionAnalysisError::ModelLoad(format!("ONNX model load failed: {e}"))
            })?;

        Ok(Self {
            backend: Backend::Model(session),
        })
    }

    /// Creates a heuristic estimator that needs no model artifact
    pub fn heuristic() -> Self {
        Self {
            backend: Backend::Heuristic,
        }
    }

    /// Selects the backend from an optional model path
    pub fn from_model_path(model_path: Option<&str>) -> Result<Self> {
        match model_path {
            Some(path) => Self::with_model(path),
            None => Ok(Self::heuristic()),
        }
    }

    /// Whether a trained model backs this estimator
    pub fn is_model_backed(&self) -> bool {
        matches!(self.backend, Backend::Model(_))
    }

    /// Estimates the emotion distribution for a grayscale face region
    pub fn estimate(&mut self, gray_face: &Mat) -> Result<EmotionDistribution> {
        if gray_face.empty() {
            return Err(EmotionAnalysisError::InvalidInput(
                "empty face region".to_string(),
            ));
        }

        match &mut self.backend {
            Backend::Model(session) => {
                let input = preprocess_face(gray_face)?;
                run_inference(session, input)
            }
            Backend::Heuristic => heuristic_distribution(gray_face),
        }
    }
}

/// Resizes a grayscale face region to the model input size and normalizes
/// pixel values to [0, 1]
fn preprocess_face(gray_face: &Mat) -> Result<Vec<f32>> {
    let mut resized = Mat::default();
    imgproc::resize(
        gray_face,
        &mut resized,
        Size::new(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )
    .map_err(|e| EmotionAnalysisError::Inference(format!("Failed to resize face: {e}")))?;

    let data = resized
        .data_bytes()
        .map_err(|e| EmotionAnalysisError::Inference(format!("Failed to get resized data: {e}")))?;

    Ok(data.iter().map(|&pixel| f32::from(pixel) / 255.0).collect())
}

/// Runs the ONNX session over a preprocessed face and validates the output
/// against the seven-emotion contract
fn run_inference(session: &mut Session, input: Vec<f32>) -> Result<EmotionDistribution> {
    let side = MODEL_INPUT_SIZE as usize;
    let input_array = ndarray::Array4::from_shape_vec((1, 1, side, side), input).map_err(|e| {
        error!("Failed to create input array with shape [1, 1, 48, 48]: {}", e);
        EmotionAnalysisError::Inference(format!("Failed to create input array: {e}"))
    })?;

    let input_tensor = Value::from_array(input_array)
        .map_err(|e| EmotionAnalysisError::Inference(format!("Failed to create input tensor: {e}")))?;

    let inputs = ort::inputs![input_tensor];
    let outputs = session.run(inputs).map_err(|e| {
        error!("ONNX inference failed: {}", e);
        EmotionAnalysisError::Inference(format!("Inference failed: {e}"))
    })?;

    let (_, output_value) = outputs
        .iter()
        .next()
        .ok_or_else(|| EmotionAnalysisError::Inference("No output from model".to_string()))?;

    let tensor = output_value.try_extract_tensor::<f32>().map_err(|e| {
        EmotionAnalysisError::Inference(format!("Failed to extract output tensor: {e}"))
    })?;

    let probs: Vec<f64> = tensor.1.iter().map(|&p| f64::from(p)).collect();

    // A wrong-arity or negative output is an estimator contract violation
    EmotionDistribution::from_probs(&probs)
}

/// Heuristic fallback over three grayscale features: mean intensity
/// (brightness), intensity standard deviation (contrast), and Canny
/// edge-pixel density. Deterministic for a fixed input region.
fn heuristic_distribution(gray_face: &Mat) -> Result<EmotionDistribution> {
    let mut mean = Vector::<f64>::new();
    let mut stddev = Vector::<f64>::new();
    core::mean_std_dev(gray_face, &mut mean, &mut stddev, &core::no_array()).map_err(|e| {
        EmotionAnalysisError::Inference(format!("Failed to compute intensity stats: {e}"))
    })?;

    let brightness = mean.get(0)?;
    let contrast = stddev.get(0)?;

    let mut edges = Mat::default();
    imgproc::canny(gray_face, &mut edges, 50.0, 150.0, 3, false)
        .map_err(|e| EmotionAnalysisError::Inference(format!("Edge detection failed: {e}")))?;

    let edge_pixels = core::count_non_zero(&edges)? as f64;
    let edge_density = edge_pixels / edges.total() as f64;

    // Neutral baseline keeps the vector from ever being all-zero
    let mut scores = [0.0f64; 7];
    scores[Emotion::Neutral.canonical_index()] = 0.4;

    if brightness > 140.0 {
        scores[Emotion::Happy.canonical_index()] += 0.3;
    }
    if contrast > 50.0 {
        scores[Emotion::Surprise.canonical_index()] += 0.2;
    }
    if edge_density > 0.15 {
        scores[Emotion::Fear.canonical_index()] += 0.1;
    }

    EmotionDistribution::from_probs(&scores)
}
