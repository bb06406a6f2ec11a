use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::zone::{MAX_ZONE_COUNT, MIN_ZONE_COUNT};
use crate::PipelineError;

const DEFAULT_SOURCE: &str = "stub://lot";
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_ZONE_COUNT: u32 = 6;
const DEFAULT_SKIP_FRAMES: u32 = 0;
const DEFAULT_OVERLAP_THRESHOLD: f32 = crate::resolve::DEFAULT_OVERLAP_THRESHOLD;
const DEFAULT_STABILIZER_WINDOW: usize = crate::stabilize::DEFAULT_WINDOW;

/// Optional JSON config file shape. Everything is optional; defaults fill the
/// gaps and env variables override the result.
#[derive(Debug, Deserialize, Default)]
struct AnalysisConfigFile {
    source: Option<String>,
    detector_backend: Option<String>,
    confidence_threshold: Option<f32>,
    zone_count: Option<u32>,
    skip_frames: Option<u32>,
    overlap_threshold: Option<f32>,
    stabilizer_window: Option<usize>,
    show_original: Option<bool>,
}

/// Session configuration bundle.
///
/// Layering: built-in defaults, then the JSON file named by
/// `PARKWATCH_CONFIG` (if set), then `PARKWATCH_*` env overrides, then
/// validation. Out-of-range values are rejected before a session starts.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Frame source locator (`stub://name` or a local image path).
    pub source: String,
    /// Registered detector backend name.
    pub detector_backend: String,
    /// Minimum detection confidence, 0.1 - 1.0.
    pub confidence_threshold: f32,
    /// Number of parking zones, 4 - 12.
    pub zone_count: u32,
    /// Process every (skip_frames + 1)-th frame. Throughput trade-off only.
    pub skip_frames: u32,
    /// Fraction of a zone a detection must cover, 0.05 - 0.95.
    pub overlap_threshold: f32,
    /// Stabilization window length, 1 - 30 samples.
    pub stabilizer_window: usize,
    /// Render the unannotated frame instead of the overlay. No effect on
    /// occupancy logic.
    pub show_original: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            detector_backend: DEFAULT_BACKEND.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            zone_count: DEFAULT_ZONE_COUNT,
            skip_frames: DEFAULT_SKIP_FRAMES,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            stabilizer_window: DEFAULT_STABILIZER_WINDOW,
            show_original: false,
        }
    }
}

impl AnalysisConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("PARKWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => AnalysisConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AnalysisConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            source: file.source.unwrap_or(defaults.source),
            detector_backend: file.detector_backend.unwrap_or(defaults.detector_backend),
            confidence_threshold: file
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
            zone_count: file.zone_count.unwrap_or(defaults.zone_count),
            skip_frames: file.skip_frames.unwrap_or(defaults.skip_frames),
            overlap_threshold: file.overlap_threshold.unwrap_or(defaults.overlap_threshold),
            stabilizer_window: file.stabilizer_window.unwrap_or(defaults.stabilizer_window),
            show_original: file.show_original.unwrap_or(defaults.show_original),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(source) = std::env::var("PARKWATCH_SOURCE") {
            if !source.trim().is_empty() {
                self.source = source;
            }
        }
        if let Ok(backend) = std::env::var("PARKWATCH_BACKEND") {
            if !backend.trim().is_empty() {
                self.detector_backend = backend;
            }
        }
        if let Ok(value) = std::env::var("PARKWATCH_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = value
                .parse()
                .map_err(|_| anyhow!("PARKWATCH_CONFIDENCE_THRESHOLD must be a float"))?;
        }
        if let Ok(value) = std::env::var("PARKWATCH_ZONE_COUNT") {
            self.zone_count = value
                .parse()
                .map_err(|_| anyhow!("PARKWATCH_ZONE_COUNT must be an integer"))?;
        }
        if let Ok(value) = std::env::var("PARKWATCH_SKIP_FRAMES") {
            self.skip_frames = value
                .parse()
                .map_err(|_| anyhow!("PARKWATCH_SKIP_FRAMES must be an integer"))?;
        }
        if let Ok(value) = std::env::var("PARKWATCH_OVERLAP_THRESHOLD") {
            self.overlap_threshold = value
                .parse()
                .map_err(|_| anyhow!("PARKWATCH_OVERLAP_THRESHOLD must be a float"))?;
        }
        if let Ok(value) = std::env::var("PARKWATCH_STABILIZER_WINDOW") {
            self.stabilizer_window = value
                .parse()
                .map_err(|_| anyhow!("PARKWATCH_STABILIZER_WINDOW must be an integer"))?;
        }
        if let Ok(value) = std::env::var("PARKWATCH_SHOW_ORIGINAL") {
            self.show_original = matches!(value.trim(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Range checks for every tunable. Called by `load` and again by the
    /// session, so hand-built configs get the same treatment.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfiguration(msg));

        if self.source.trim().is_empty() {
            return invalid("source must not be empty".to_string());
        }
        if self.detector_backend.trim().is_empty() {
            return invalid("detector_backend must not be empty".to_string());
        }
        if !(0.1..=1.0).contains(&self.confidence_threshold) {
            return invalid(format!(
                "confidence_threshold must be in [0.1, 1.0] (got {})",
                self.confidence_threshold
            ));
        }
        if !(MIN_ZONE_COUNT..=MAX_ZONE_COUNT).contains(&self.zone_count) {
            return invalid(format!(
                "zone_count must be in [{}, {}] (got {})",
                MIN_ZONE_COUNT, MAX_ZONE_COUNT, self.zone_count
            ));
        }
        if !(0.05..=0.95).contains(&self.overlap_threshold) {
            return invalid(format!(
                "overlap_threshold must be in [0.05, 0.95] (got {})",
                self.overlap_threshold
            ));
        }
        if !(1..=30).contains(&self.stabilizer_window) {
            return invalid(format!(
                "stabilizer_window must be in [1, 30] (got {})",
                self.stabilizer_window
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AnalysisConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
