use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use yoga_mate::catalog::PoseCatalog;
use yoga_mate::classify::PoseClassifier;
use yoga_mate::config::Config;
use yoga_mate::log;
use yoga_mate::logging::Logger;
use yoga_mate::session::{FrameUpdate, HoldSetting, SessionOutcome, SessionRunner, SessionSink};
use yoga_mate::source::ReplaySource;

const CONFIG_PATH: &str = "config.toml";

struct ReplayArgs {
    path: PathBuf,
    pose: Option<String>,
    hold_secs: Option<u32>,
    fps: u32,
}

fn parse_args() -> Result<ReplayArgs> {
    // Usage: replay <skeletons.jsonl> [--pose NAME] [--hold SECS] [--fps N]
    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut pose = None;
    let mut hold_secs = None;
    let mut fps = 30;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pose" => pose = Some(args.next().context("--pose needs a name")?),
            "--hold" => {
                hold_secs = Some(args.next().context("--hold needs seconds")?.parse()?);
            }
            "--fps" => fps = args.next().context("--fps needs a number")?.parse()?,
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {arg}"),
        }
    }
    let Some(path) = path else {
        bail!("usage: replay <skeletons.jsonl> [--pose NAME] [--hold SECS] [--fps N]");
    };
    if fps == 0 {
        bail!("--fps must be positive");
    }
    Ok(ReplayArgs { path, pose, hold_secs, fps })
}

/// Prints status and timer changes to stdout
#[derive(Default)]
struct ConsoleSink {
    frames: usize,
    no_person: usize,
}

impl SessionSink for ConsoleSink {
    fn set_status(&mut self, text: &str) {
        println!("[status] {}", text);
    }

    fn set_timer(&mut self, text: &str) {
        println!("[timer] {}", text);
    }

    fn frame_processed(&mut self, update: FrameUpdate) {
        self.frames += 1;
        if update.verdict.is_none() {
            self.no_person += 1;
        }
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        println!(
            "[end] {:?} after {} frames ({} without a person)",
            outcome, self.frames, self.no_person
        );
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let logger = Logger::stderr_only();
    log!(logger, "Replay ({})", env!("GIT_VERSION"));

    let (config, config_err) = Config::load_or_default(CONFIG_PATH);
    if let Some(e) = config_err {
        log!(logger, "[config] using defaults: {e:#}");
    }
    let (catalog, catalog_err) = PoseCatalog::load_or_empty(&config.catalog.path);
    if let Some(e) = catalog_err {
        log!(logger, "[catalog] {e}");
    }

    let pose = match args.pose.as_deref().or(catalog.default_pose()) {
        Some(p) => p.to_string(),
        None => bail!("no pose given and the catalog is empty"),
    };
    let classifier = PoseClassifier::new(catalog.names());
    let target = classifier.target(&pose)?;

    let hold = HoldSetting::new(args.hold_secs.unwrap_or(config.session.default_hold_secs));
    let mut session_config = config.session.clone();
    session_config.frame_delay_ms = 0;

    // recorded frames are spaced evenly at the given rate
    let frame_step = Duration::from_secs_f64(1.0 / args.fps as f64);
    let t0 = Instant::now();
    let mut frame_index = 0u32;
    let mut runner = SessionRunner::new(target, &session_config, hold, logger).with_clock(move || {
        frame_index += 1;
        t0 + frame_step * frame_index
    });

    let mut source = ReplaySource::open(&args.path)?;
    let mut sink = ConsoleSink::default();
    let outcome = runner.run(&mut source, &mut sink);
    if let SessionOutcome::DeviceUnavailable(reason) = outcome {
        bail!("replay failed: {reason}");
    }
    Ok(())
}
