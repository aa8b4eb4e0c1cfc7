//! Aggregated robot configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lifter::LifterConfig;
use crate::motion::SelectorConfig;
use crate::tracker::{AssignmentConfig, TrackerConfig};

/// All tunables of the pick-up pipeline.
///
/// Every section falls back to its calibrated defaults, so a JSON file only
/// needs to name what differs on a given site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub tracker: TrackerConfig,
    pub selector: SelectorConfig,
    pub lifter: LifterConfig,
    pub assignment: AssignmentConfig,
}

impl RobotConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
