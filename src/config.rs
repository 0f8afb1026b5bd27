use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// OpenCV device index
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self { index: 0, width: default_width(), height: default_height() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Frames whose mean landmark confidence falls below this count as "no person"
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

fn default_model_path() -> PathBuf { PathBuf::from("models/movenet_lightning.onnx") }
fn default_min_confidence() -> f32 { 0.3 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { model_path: default_model_path(), min_confidence: default_min_confidence() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Consecutive correct frames before the hold timer starts
    #[serde(default = "default_debounce_frames")]
    pub debounce_frames: u32,
    #[serde(default = "default_feedback_cooldown")]
    pub feedback_cooldown_secs: u64,
    #[serde(default = "default_hold_secs")]
    pub default_hold_secs: u32,
    #[serde(default = "default_frame_delay")]
    pub frame_delay_ms: u64,
}

fn default_debounce_frames() -> u32 { 10 }
fn default_feedback_cooldown() -> u64 { 10 }
fn default_hold_secs() -> u32 { 30 }
fn default_frame_delay() -> u64 { 10 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_frames: default_debounce_frames(),
            feedback_cooldown_secs: default_feedback_cooldown(),
            default_hold_secs: default_hold_secs(),
            frame_delay_ms: default_frame_delay(),
        }
    }
}

impl SessionConfig {
    pub fn feedback_cooldown(&self) -> Duration {
        Duration::from_secs(self.feedback_cooldown_secs)
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_speech_cooldown")]
    pub cooldown_secs: u64,
    /// External TTS program; the utterance is passed as its last argument
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_true() -> bool { true }
fn default_speech_cooldown() -> u64 { 4 }
fn default_program() -> String { "espeak".to_string() }
fn default_args() -> Vec<String> { vec!["-s".to_string(), "150".to_string()] }

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            cooldown_secs: default_speech_cooldown(),
            program: default_program(),
            args: default_args(),
        }
    }
}

impl SpeechConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf { PathBuf::from("pose_instructions.json") }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Defaults when the file is missing or malformed, with the reason for the fallback
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.session.debounce_frames, 10);
        assert_eq!(config.session.feedback_cooldown(), Duration::from_secs(10));
        assert_eq!(config.speech.cooldown(), Duration::from_secs(4));
        assert_eq!(config.speech.args, ["-s", "150"]);
        assert_eq!(config.catalog.path, PathBuf::from("pose_instructions.json"));
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str(
            r#"
            [session]
            default_hold_secs = 60

            [speech]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.session.default_hold_secs, 60);
        assert_eq!(config.session.frame_delay(), Duration::from_millis(10));
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.program, "espeak");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[camera]\nindex = 2\n[detector]\nmin_confidence = 0.5\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.camera.index, 2);
        assert!((config.detector.min_confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_load_or_default_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session\n").unwrap();
        let (config, err) = Config::load_or_default(&path);
        assert_eq!(config.session.debounce_frames, 10);
        assert!(err.is_some());

        let (_, err) = Config::load_or_default(dir.path().join("missing.toml"));
        assert!(err.is_some());
    }
}
