use clap::Parser;
use interview_emotion::analyzer::EmotionAnalyzer;
use interview_emotion::annotate;
use interview_emotion::error::{EmotionAnalysisError, Result};
use interview_emotion::estimator::EmotionEstimator;
use interview_emotion::face::FaceDetector;
use interview_emotion::models::Frame;
use interview_emotion::report;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interview emotion analysis over still frames")]
struct Args {
    /// Image files to analyze, in order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Path to the Haar Cascade XML for face detection
    #[arg(
        long,
        default_value = "assets/models/haarcascade_frontalface_default.xml"
    )]
    cascade: String,

    /// Path to an ONNX emotion model; omit to use the heuristic estimator
    #[arg(long)]
    model: Option<String>,

    /// Restrict statistics to the most recent N history entries
    #[arg(long)]
    last_n: Option<usize>,

    /// Emit results, statistics and report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write annotated copies of the input images into this directory
    #[arg(long)]
    annotate_dir: Option<PathBuf>,
}

/// Initializes the logging system (file only, no console output)
fn init_logging() -> Result<()> {
    let log_file = std::fs::File::create("emotion_analysis.log")?;

    let file_layer = fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false);

    tracing_subscriber::registry().with(file_layer).init();

    Ok(())
}

/// Decodes an image file into an RGB frame
fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height))
}

/// Encodes an annotated RGB frame back to an image file
fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    let buffer = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| {
            EmotionAnalysisError::Annotation("annotated frame has wrong size".to_string())
        })?;
    buffer.save(path)?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let args = Args::parse();

    if let Some(dir) = &args.annotate_dir {
        std::fs::create_dir_all(dir)?;
    }

    let detector = FaceDetector::new(&args.cascade)?;
    let estimator = EmotionEstimator::from_model_path(args.model.as_deref())?;
    info!(
        "Analyzer ready ({} estimation)",
        if estimator.is_model_backed() {
            "model"
        } else {
            "heuristic"
        }
    );

    let mut analyzer = EmotionAnalyzer::new(detector, estimator);

    for path in &args.images {
        let frame = match load_frame(path) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Skipping {}: {}", path.display(), e);
                eprintln!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        let result = analyzer.analyze(&frame)?;

        if args.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!(
                "frame {} ({}): {} face(s)",
                result.frame_number,
                path.display(),
                result.faces_detected
            );
            for face in &result.faces {
                println!(
                    "  {} at ({}, {}) {}x{} - score {:.1}, confidence {:.1}%",
                    face.dominant_emotion,
                    face.region.x,
                    face.region.y,
                    face.region.width,
                    face.region.height,
                    face.score,
                    face.confidence * 100.0
                );
            }
        }

        if let Some(dir) = &args.annotate_dir {
            let annotated = annotate::draw_annotations(&frame, &result)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("frame_{}.png", result.frame_number));
            let out_path = dir.join(file_name);
            save_frame(&annotated, &out_path)?;
            info!("Wrote annotated frame to {}", out_path.display());
        }
    }

    let statistics = analyzer.statistics(args.last_n);
    let session_report = report::build_report(&statistics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session_report)?);
    } else {
        println!();
        println!("=== Session Statistics ===");
        println!("entries:        {}", statistics.total_frames);
        println!("average score:  {:.1}", statistics.average_score);
        println!(
            "score range:    {:.1} - {:.1}",
            statistics.min_score, statistics.max_score
        );
        println!(
            "positive ratio: {:.0}%",
            statistics.positive_ratio * 100.0
        );
        match statistics.dominant_emotion {
            Some(emotion) => println!("dominant:       {emotion}"),
            None => println!("dominant:       -"),
        }
        println!("trend:          {}", statistics.recent_trend);

        println!();
        println!(
            "Performance: {} ({:.1})",
            session_report.performance.rating, session_report.performance.score
        );
        for rec in &session_report.recommendations {
            println!("  [{:?}] {}: {}", rec.priority, rec.category, rec.message);
        }
    }

    Ok(())
}
