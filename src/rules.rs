//! Ruleset constants.
//!
//! The board is always 4x4. What can be tuned is the spawn odds, the value
//! that counts as a win, and which tile values are reported as milestones
//! and achievement tiers. [`Rules::default`] is the classic ruleset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a ruleset is malformed.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Rules could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Spawn probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("{field} value {value} is not a power of two of at least 4")]
    InvalidValue { field: &'static str, value: u32 },
}

/// Tunable constants of the game.
///
/// # Example
///
/// ```rust
/// use tilemerge::Rules;
///
/// let rules = Rules::from_json(r#"{ "four_probability": 0.25 }"#).unwrap();
/// assert_eq!(rules.four_probability, 0.25);
/// assert_eq!(rules.win_value, 2048);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Chance that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,

    /// First tile value that wins the game.
    pub win_value: u32,

    /// Tile values whose first appearance in a game is recorded.
    pub milestones: Vec<u32>,

    /// Values past the win that raise a distinguished win of their own.
    pub achievement_tiers: Vec<u32>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            four_probability: 0.1,
            win_value: 2048,
            milestones: vec![256, 512, 1024, 2048, 4096, 8192],
            achievement_tiers: vec![4096, 8192],
        }
    }
}

impl Rules {
    /// Parse a ruleset from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(RulesError::InvalidProbability(self.four_probability));
        }
        check_value("win_value", self.win_value)?;
        for &value in &self.milestones {
            check_value("milestone", value)?;
        }
        for &value in &self.achievement_tiers {
            check_value("achievement tier", value)?;
        }
        Ok(())
    }

    pub fn is_milestone(&self, value: u32) -> bool {
        self.milestones.contains(&value)
    }
}

fn check_value(field: &'static str, value: u32) -> Result<(), RulesError> {
    if value >= 4 && value.is_power_of_two() {
        Ok(())
    } else {
        Err(RulesError::InvalidValue { field, value })
    }
}
