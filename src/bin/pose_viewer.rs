use anyhow::Result;
use std::time::Instant;

use yoga_mate::camera::{mat_to_rgb, OpenCvCamera};
use yoga_mate::catalog::PoseCatalog;
use yoga_mate::classify::{PoseClassifier, Verdict};
use yoga_mate::config::Config;
use yoga_mate::pose::{preprocess_for_movenet, PoseDetector};
use yoga_mate::render::MinifbRenderer;

/// Live camera view with per-frame verdicts for one pose. No timer, no speech.
///
/// Usage: pose_viewer [pose name]
fn main() -> Result<()> {
    let (config, config_err) = Config::load_or_default("config.toml");
    if let Some(e) = config_err {
        eprintln!("[config] using defaults: {e:#}");
    }
    let (catalog, catalog_err) = PoseCatalog::load_or_empty(&config.catalog.path);
    if let Some(e) = catalog_err {
        eprintln!("[catalog] {e}");
    }

    let pose = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let pose = if pose.is_empty() {
        catalog.default_pose().unwrap_or("Tree Pose").to_string()
    } else {
        pose
    };
    let classifier = PoseClassifier::new(catalog.names());
    let target = classifier.target(&pose)?;

    println!("Pose Viewer ({}) - {}", env!("GIT_VERSION"), target.name());
    println!("Press ESC to exit");

    println!("Opening camera...");
    let mut camera = OpenCvCamera::from_config(&config.camera)?;
    let (width, height) = camera.resolution();
    println!("Camera resolution: {}x{}", width, height);

    println!("Loading model from {}...", config.detector.model_path.display());
    let mut detector = PoseDetector::new(&config.detector.model_path, config.detector.min_confidence)?;
    println!("Model loaded");

    let mut renderer = MinifbRenderer::new("Pose Viewer", width as usize, height as usize)?;

    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut last_verdict: Option<Verdict> = None;

    while renderer.is_open() {
        let frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Frame capture error: {}", e);
                continue;
            }
        };

        let input = preprocess_for_movenet(&frame)?;
        let skeleton = detector.detect(input)?;
        let verdict = skeleton.as_ref().map(|s| target.classify(s));

        let canvas = renderer.canvas();
        canvas.draw_frame(&mat_to_rgb(&frame)?);
        if let Some(s) = &skeleton {
            canvas.draw_skeleton(s, verdict.as_ref());
        }
        renderer.update()?;

        if verdict != last_verdict {
            match verdict {
                Some(Verdict::Correct) => println!("correct"),
                Some(Verdict::WrongPose(other)) => println!("looks like {}", other),
                Some(Verdict::Incorrect(msg)) => println!("{}", msg),
                None => println!("no person"),
            }
            last_verdict = verdict;
        }

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!("FPS: {:.1}", frame_count as f32 / elapsed);
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    println!("Shutting down...");
    Ok(())
}
