// Frame annotation: per-face overlays for presentation

use crate::error::{EmotionAnalysisError, Result};
use crate::models::{Frame, FrameResult};
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

/// Box and label color for interview-appropriate faces (RGB green)
const POSITIVE_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);
/// Box and label color for other faces (RGB orange)
const NEGATIVE_COLOR: (f64, f64, f64) = (255.0, 165.0, 0.0);

/// Draws bounding boxes, dominant-emotion labels and scores onto a copy of
/// the frame. Purely presentational; the input frame is left untouched.
pub fn draw_annotations(frame: &Frame, result: &FrameResult) -> Result<Frame> {
    frame.validate()?;

    let mat = Mat::from_slice(&frame.data)
        .map_err(|e| EmotionAnalysisError::Annotation(format!("Failed to create Mat: {e}")))?;
    let mat = mat
        .reshape(3, frame.height as i32)
        .map_err(|e| EmotionAnalysisError::Annotation(format!("Failed to reshape Mat: {e}")))?;
    let mut annotated = mat
        .try_clone()
        .map_err(|e| EmotionAnalysisError::Annotation(format!("Failed to copy frame: {e}")))?;

    for face in &result.faces {
        let (r, g, b) = if face.is_positive {
            POSITIVE_COLOR
        } else {
            NEGATIVE_COLOR
        };
        let color = Scalar::new(r, g, b, 0.0);

        let region = face.region;
        let bbox = Rect::new(region.x, region.y, region.width, region.height);

        imgproc::rectangle(&mut annotated, bbox, color, 2, imgproc::LINE_8, 0)?;

        // Label with a filled background above the box
        let label = format!("{}: {:.1}%", face.dominant_emotion, face.confidence * 100.0);
        let mut baseline = 0;
        let label_size = imgproc::get_text_size(
            &label,
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.6,
            2,
            &mut baseline,
        )?;

        let background = Rect::new(
            region.x,
            region.y - label_size.height - 10,
            label_size.width,
            label_size.height + 10,
        );
        imgproc::rectangle(&mut annotated, background, color, imgproc::FILLED, imgproc::LINE_8, 0)?;

        imgproc::put_text(
            &mut annotated,
            &label,
            Point::new(region.x, region.y - 5),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.6,
            Scalar::new(0.0, 0.0, 0.0, 0.0),
            2,
            imgproc::LINE_8,
            false,
        )?;

        let score_text = format!("Score: {:.1}", face.score);
        imgproc::put_text(
            &mut annotated,
            &score_text,
            Point::new(region.x, region.y + region.height + 20),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.5,
            color,
            1,
            imgproc::LINE_8,
            false,
        )?;
    }

    let data = annotated
        .data_bytes()
        .map_err(|e| EmotionAnalysisError::Annotation(format!("Failed to read annotated data: {e}")))?
        .to_vec();

    Ok(Frame::new(data, frame.width, frame.height))
}
