// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Analysis configuration
//!
//! Loaded with priority file > env > defaults. The detection seed is part of
//! the configuration rather than process-wide state, so two runs with the
//! same config and input always produce the same partition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AgoraError, AgoraResult};

/// Top-level configuration for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

/// Community detection parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Seed for the node visiting order
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Resolution parameter (higher = more, smaller communities)
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// Maximum local-moving sweeps per level
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Maximum aggregation levels
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,

    /// Minimum modularity improvement for a level to be kept
    #[serde(default = "default_min_improvement")]
    pub min_improvement: f64,
}

/// Sentiment lexicon overrides
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SentimentConfig {
    /// Extra or replacement word polarities
    #[serde(default)]
    pub lexicon: BTreeMap<String, f64>,

    /// Words that flip the polarity of the next scored word.
    /// Empty means the built-in list.
    #[serde(default)]
    pub negations: Vec<String>,
}

// Default values
fn default_seed() -> u64 {
    42
}

fn default_resolution() -> f64 {
    1.0
}

fn default_max_passes() -> usize {
    100
}

fn default_max_levels() -> usize {
    32
}

fn default_min_improvement() -> f64 {
    1e-7
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            resolution: default_resolution(),
            max_passes: default_max_passes(),
            max_levels: default_max_levels(),
            min_improvement: default_min_improvement(),
        }
    }
}

impl DetectionConfig {
    /// Default parameters with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AgoraResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - AGORA_SEED: detection seed (default: 42)
    /// - AGORA_RESOLUTION: modularity resolution (default: 1.0)
    /// - AGORA_MAX_PASSES: local-moving sweeps per level (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("AGORA_SEED") {
            if let Ok(val) = seed.parse() {
                config.detection.seed = val;
            }
        }

        if let Ok(resolution) = std::env::var("AGORA_RESOLUTION") {
            if let Ok(val) = resolution.parse() {
                config.detection.resolution = val;
            }
        }

        if let Ok(passes) = std::env::var("AGORA_MAX_PASSES") {
            if let Ok(val) = passes.parse() {
                config.detection.max_passes = val;
            }
        }

        config
    }

    /// Load configuration with priority: file > env > defaults
    pub fn load(config_file: Option<PathBuf>) -> AgoraResult<Self> {
        let config = match config_file {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            }
            Some(path) => {
                tracing::warn!("Config file not found: {:?}, using environment", path);
                Self::from_env()
            }
            None => Self::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> AgoraResult<()> {
        let detection = &self.detection;
        if !detection.resolution.is_finite() || detection.resolution <= 0.0 {
            return Err(AgoraError::Config(format!(
                "resolution must be a positive number, got {}",
                detection.resolution
            )));
        }
        if detection.max_passes == 0 {
            return Err(AgoraError::Config("max_passes must be at least 1".into()));
        }
        if detection.max_levels == 0 {
            return Err(AgoraError::Config("max_levels must be at least 1".into()));
        }
        if let Some((word, _)) = self
            .sentiment
            .lexicon
            .iter()
            .find(|(_, score)| !score.is_finite())
        {
            return Err(AgoraError::Config(format!(
                "lexicon score for '{}' is not a number",
                word
            )));
        }
        Ok(())
    }
}
