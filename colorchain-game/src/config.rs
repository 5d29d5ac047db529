//! Session tuning that hosts may override without touching the balance math.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{INTER_FLASH_GAP_MS, MAX_LEVEL, PRE_ROLL_MS, TWIST_THRESHOLD};

const MAX_PRE_ROLL_MS: u64 = 10_000;
const MAX_GAP_MS: u64 = 5_000;

/// Errors raised when game configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u64,
        value: u64,
    },
    #[error("{field} must be at most {max} (got {value})")]
    MaxViolation {
        field: &'static str,
        max: u64,
        value: u64,
    },
    #[error("invalid game config JSON: {0}")]
    Json(String),
}

/// Host-tunable session parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Last playable level; completing it ends the session.
    #[serde(default = "GameConfig::default_max_level")]
    pub max_level: u32,
    /// First level at which even-numbered levels apply a color twist.
    #[serde(default = "GameConfig::default_twist_threshold")]
    pub twist_threshold: u32,
    /// Delay between level setup and the first flash.
    #[serde(default = "GameConfig::default_pre_roll_ms")]
    pub pre_roll_ms: u64,
    /// Pause separating consecutive flashes.
    #[serde(default = "GameConfig::default_inter_flash_gap_ms")]
    pub inter_flash_gap_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_level: Self::default_max_level(),
            twist_threshold: Self::default_twist_threshold(),
            pre_roll_ms: Self::default_pre_roll_ms(),
            inter_flash_gap_ms: Self::default_inter_flash_gap_ms(),
        }
    }
}

impl GameConfig {
    const fn default_max_level() -> u32 {
        MAX_LEVEL
    }

    const fn default_twist_threshold() -> u32 {
        TWIST_THRESHOLD
    }

    const fn default_pre_roll_ms() -> u64 {
        PRE_ROLL_MS
    }

    const fn default_inter_flash_gap_ms() -> u64 {
        INTER_FLASH_GAP_MS
    }

    /// Parse and validate a config from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the session relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::MinViolation {
                field: "max_level",
                min: 1,
                value: 0,
            });
        }
        if self.twist_threshold == 0 {
            return Err(ConfigError::MinViolation {
                field: "twist_threshold",
                min: 1,
                value: 0,
            });
        }
        if self.pre_roll_ms > MAX_PRE_ROLL_MS {
            return Err(ConfigError::MaxViolation {
                field: "pre_roll_ms",
                max: MAX_PRE_ROLL_MS,
                value: self.pre_roll_ms,
            });
        }
        if self.inter_flash_gap_ms > MAX_GAP_MS {
            return Err(ConfigError::MaxViolation {
                field: "inter_flash_gap_ms",
                max: MAX_GAP_MS,
                value: self.inter_flash_gap_ms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = GameConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.max_level, 50);
        assert_eq!(cfg.inter_flash_gap_ms, 200);
    }

    #[test]
    fn rejects_zero_levels_and_long_gaps() {
        assert_eq!(
            GameConfig::from_json(r#"{"max_level": 0}"#),
            Err(ConfigError::MinViolation {
                field: "max_level",
                min: 1,
                value: 0
            })
        );
        let err = GameConfig::from_json(r#"{"inter_flash_gap_ms": 60000}"#).unwrap_err();
        assert!(err.to_string().contains("inter_flash_gap_ms"));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
