//! Scheduler tuning knobs.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};

const DEFAULT_HORIZON_DAYS: u32 = 7;
const DEFAULT_MAX_GAP_MINUTES: u32 = 24 * 60;
/// Upper bound on `horizon_days`, about ten years.
pub const MAX_HORIZON_DAYS: u32 = 3660;

/// Limits applied by [`crate::Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// How many days past `since` a gap search may look, 1 through [`MAX_HORIZON_DAYS`].
    pub horizon_days: u32,
    /// Longest gap a caller may ask for, in minutes.
    pub max_gap_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_gap_minutes: DEFAULT_MAX_GAP_MINUTES,
        }
    }
}

impl SchedulerConfig {
    /// Parse a JSON object; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SchedulerConfig =
            serde_json::from_str(json).map_err(|e| CadenceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CadenceError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(CadenceError::InvalidConfig(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(CadenceError::InvalidConfig(format!(
                "horizon_days must be at most {}, got {}",
                MAX_HORIZON_DAYS, self.horizon_days
            )));
        }
        if self.max_gap_minutes == 0 {
            return Err(CadenceError::InvalidConfig(
                "max_gap_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn horizon(&self) -> Duration {
        Duration::days(i64::from(self.horizon_days))
    }

    pub fn max_gap(&self) -> Duration {
        Duration::minutes(i64::from(self.max_gap_minutes))
    }
}
