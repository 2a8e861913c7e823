// src/core/config.rs

use crate::core::common::MrptError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default maximum tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Default probability that a projection coordinate is non-zero.
pub const DEFAULT_ALPHA: f64 = 0.1;
/// Default bucket size below which a node stays a leaf.
pub const DEFAULT_MIN_SPLIT: usize = 10;

/// Configuration for a random-projection tree index.
///
/// `size` and `dim` are not part of the configuration; they are derived
/// from the vector set handed to `initialize`. Unknown keys in a TOML file
/// are ignored, and missing keys fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RpTreeConfig {
    /// Maximum tree depth. The projection schedule holds one direction per
    /// reachable depth, at most `max_depth + 1`.
    pub max_depth: usize,
    /// Per-coordinate probability of drawing a projection coordinate from N(0, 1).
    pub alpha: f64,
    /// Buckets with fewer vectors than this are never split.
    pub min_split: usize,
    /// Seed for the projection schedule. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

/// Builder for `RpTreeConfig`.
#[derive(Debug, Clone, Default)]
pub struct RpTreeConfigBuilder {
    max_depth: Option<usize>,
    alpha: Option<f64>,
    min_split: Option<usize>,
    seed: Option<u64>,
}

impl RpTreeConfigBuilder {
    /// Creates a new builder with every option unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum tree depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the projection sparsity
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Sets the minimum bucket size for splitting
    pub fn min_split(mut self, min_split: usize) -> Self {
        self.min_split = Some(min_split);
        self
    }

    /// Fixes the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the config, applying defaults and validating the result
    pub fn build(self) -> Result<RpTreeConfig, MrptError> {
        let config = RpTreeConfig {
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
            min_split: self.min_split.unwrap_or(DEFAULT_MIN_SPLIT),
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for RpTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            alpha: DEFAULT_ALPHA,
            min_split: DEFAULT_MIN_SPLIT,
            seed: None,
        }
    }
}

impl RpTreeConfig {
    /// Creates a new builder for fluent configuration
    pub fn builder() -> RpTreeConfigBuilder {
        RpTreeConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `MrptError::Configuration` if `alpha` is not a positive finite
    /// number or `min_split` is zero.
    pub fn validate(&self) -> Result<(), MrptError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(MrptError::Configuration(format!(
                "alpha must be greater than 0, got {}",
                self.alpha
            )));
        }

        if self.min_split == 0 {
            return Err(MrptError::Configuration(
                "min_split must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `MrptError::Configuration` if the file cannot be parsed or
    /// fails validation, and `MrptError::Io` for other read failures.
    pub fn load_from_file(path: &Path) -> Result<Self, MrptError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    MrptError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;

                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(MrptError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path, defaulting when `None`.
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, MrptError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
