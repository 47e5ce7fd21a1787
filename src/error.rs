// Error types for the interview emotion analysis engine

use thiserror::Error;

/// Main error type for the emotion analysis pipeline
#[derive(Debug, Error)]
pub enum EmotionAnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Distribution schema violation: {0}")]
    DistributionSchema(String),

    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Face detection failed: {0}")]
    FaceDetection(String),

    #[error("Annotation failed: {0}")]
    Annotation(String),

    #[error("OpenCV error: {0}")]
    OpenCv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Result type alias for emotion analysis operations
pub type Result<T> = std::result::Result<T, EmotionAnalysisError>;

// Conversion from OpenCV errors
impl From<opencv::Error> for EmotionAnalysisError {
    fn from(err: opencv::Error) -> Self {
        EmotionAnalysisError::OpenCv(err.to_string())
    }
}

// Conversion from ONNX Runtime errors
impl From<ort::Error> for EmotionAnalysisError {
    fn from(err: ort::Error) -> Self {
        EmotionAnalysisError::Inference(err.to_string())
    }
}
