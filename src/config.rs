//! Application configuration for RideSplit
//!
//! Every tunable the analyses depend on is an explicit, validated parameter
//! here rather than a constant buried in a scan loop. The configuration is
//! persistable as TOML in the platform config directory.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RideSplitError;
use crate::models::Units;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Unit system for displayed speeds
    pub units: Units,

    /// Stop detection and merging parameters
    pub segmenter: SegmenterConfig,

    /// Power zone classification parameters
    pub zones: ZoneConfig,

    /// Upper bound on accepted stream length
    pub max_samples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            units: Units::Metric,
            segmenter: SegmenterConfig::default(),
            zones: ZoneConfig::default(),
            max_samples: 1_000_000,
        }
    }
}

/// Stop segmentation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Seconds between consecutive samples that itself triggers a stop
    /// candidate (a recording gap)
    pub stop_gap_threshold: i64,

    /// Distance delta in kilometers below which adjacent stops merge
    pub merge_distance: Decimal,

    /// Which merge rules are active
    pub merge_rules: MergeRules,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            stop_gap_threshold: 60,
            merge_distance: dec!(0.3),
            merge_rules: MergeRules::default(),
        }
    }
}

/// Independently toggleable merge rules for adjacent stop candidates.
///
/// A candidate merges into the previous stop when any active rule matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRules {
    /// Merge when the sample indices are contiguous
    pub contiguous_index: bool,

    /// Merge when one stop starts exactly where the previous one ends
    pub shared_boundary: bool,

    /// Merge when the stops lie within `merge_distance` of each other
    pub distance_proximity: bool,
}

impl Default for MergeRules {
    fn default() -> Self {
        Self {
            contiguous_index: true,
            shared_boundary: true,
            distance_proximity: true,
        }
    }
}

/// Power zone classification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Seconds above which an inter-sample interval is excluded from zone
    /// totals (a device or recording gap, not real effort)
    pub gap_exclusion: i64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self { gap_exclusion: 600 }
    }
}

impl AnalysisConfig {
    /// Validate all thresholds before any scan runs.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.segmenter.stop_gap_threshold <= 0 {
            return Err(RideSplitError::InvalidConfiguration(format!(
                "stop_gap_threshold must be positive, got {}",
                self.segmenter.stop_gap_threshold
            )));
        }
        if self.segmenter.merge_distance < Decimal::ZERO {
            return Err(RideSplitError::InvalidConfiguration(format!(
                "merge_distance must not be negative, got {}",
                self.segmenter.merge_distance
            )));
        }
        if self.zones.gap_exclusion <= 0 {
            return Err(RideSplitError::InvalidConfiguration(format!(
                "gap_exclusion must be positive, got {}",
                self.zones.gap_exclusion
            )));
        }
        if self.max_samples == 0 {
            return Err(RideSplitError::InvalidConfiguration(
                "max_samples must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Default config file location (`<config_dir>/ridesplit/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("could not determine config directory")?;
        Ok(base.join("ridesplit").join("config.toml"))
    }

    /// Load configuration from a TOML file, or defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Persist configuration as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }
}
