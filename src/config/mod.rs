//! Configuration system with YAML schema and validation.
//!
//! Mistakes are caught in two passes:
//! - schema constraints via `validator` derive attributes
//! - semantic checks that span fields
//!
//! ```yaml
//! run:
//!   samples_target: 1000
//!   batch_size: 250
//!   seed: 42          # omit for an entropy seed
//! driver:
//!   paced: true
//!   fps: 60
//! recording:
//!   enabled: false
//!   capacity: 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::driver::{DEFAULT_BATCH_SIZE, DEFAULT_FPS};
use crate::error::{EstimatorError, EstimatorResult};

/// Largest target accepted from configuration.
pub const MAX_SAMPLES_TARGET: u64 = 99_999;

/// Top-level estimator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Run parameters.
    #[validate(nested)]
    #[serde(default)]
    pub run: RunConfig,

    /// Frame pacing.
    #[validate(nested)]
    #[serde(default)]
    pub driver: DriverConfig,

    /// Point retention for plotting hosts.
    #[validate(nested)]
    #[serde(default)]
    pub recording: RecordingConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl EstimatorConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> EstimatorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> EstimatorResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> EstimatorResult<String> {
        serde_yaml::to_string(self).map_err(|e| EstimatorError::serialization(e.to_string()))
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// Builders and CLI overrides skip validation, so anything that consumes
    /// a config calls this first.
    ///
    /// # Errors
    ///
    /// Returns the first failed constraint.
    pub fn check(&self) -> EstimatorResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate constraints that span fields.
    fn validate_semantic(&self) -> EstimatorResult<()> {
        if self.recording.enabled && self.recording.capacity == 0 {
            return Err(EstimatorError::config(
                "Recording is enabled but capacity is 0",
            ));
        }

        if self.driver.paced && self.driver.fps == 0 {
            return Err(EstimatorError::config("Paced driver requires fps >= 1"));
        }

        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            run: RunConfig::default(),
            driver: DriverConfig::default(),
            recording: RecordingConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct EstimatorConfigBuilder {
    samples_target: Option<u64>,
    batch_size: Option<u64>,
    seed: Option<u64>,
    fps: Option<u32>,
    paced: Option<bool>,
    recording: Option<usize>,
}

impl EstimatorConfigBuilder {
    /// Set the number of samples to draw.
    #[must_use]
    pub const fn samples_target(mut self, samples_target: u64) -> Self {
        self.samples_target = Some(samples_target);
        self
    }

    /// Set the samples drawn per frame.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the frame rate for paced runs.
    #[must_use]
    pub const fn fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Enable or disable frame pacing.
    #[must_use]
    pub const fn paced(mut self, paced: bool) -> Self {
        self.paced = Some(paced);
        self
    }

    /// Enable point recording with the given capacity.
    #[must_use]
    pub const fn recording(mut self, capacity: usize) -> Self {
        self.recording = Some(capacity);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EstimatorConfig {
        let mut config = EstimatorConfig::default();

        if let Some(samples_target) = self.samples_target {
            config.run.samples_target = samples_target;
        }

        if let Some(batch_size) = self.batch_size {
            config.run.batch_size = batch_size;
        }

        config.run.seed = self.seed;

        if let Some(fps) = self.fps {
            config.driver.fps = fps;
        }

        if let Some(paced) = self.paced {
            config.driver.paced = paced;
        }

        if let Some(capacity) = self.recording {
            config.recording.enabled = true;
            config.recording.capacity = capacity;
        }

        config
    }
}

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Samples to draw before the run completes.
    #[validate(range(min = 1, max = MAX_SAMPLES_TARGET))]
    #[serde(default = "default_samples_target")]
    pub samples_target: u64,
    /// Samples drawn per frame.
    #[validate(range(min = 1))]
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Fixed seed; `None` draws one from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_samples_target() -> u64 {
    1000
}

const fn default_batch_size() -> u64 {
    DEFAULT_BATCH_SIZE
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples_target: default_samples_target(),
            batch_size: default_batch_size(),
            seed: None,
        }
    }
}

/// Frame pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Sleep between frames to hold `fps`.
    #[serde(default = "default_true")]
    pub paced: bool,
    /// Frames per second when paced.
    #[validate(range(max = 240))]
    #[serde(default = "default_fps")]
    pub fps: u32,
}

const fn default_true() -> bool {
    true
}

const fn default_fps() -> u32 {
    DEFAULT_FPS
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            paced: true,
            fps: default_fps(),
        }
    }
}

/// Point retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RecordingConfig {
    /// Whether to keep drawn points.
    #[serde(default)]
    pub enabled: bool,
    /// Most recent points to keep.
    #[validate(range(max = 100_000))]
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

const fn default_capacity() -> usize {
    2000
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: default_capacity(),
        }
    }
}
