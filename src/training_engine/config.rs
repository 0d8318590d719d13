//! Tunable economy constants.
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes: `{"wrong_penalty": 150}` is a complete config.

use serde::{Deserialize, Serialize};

use crate::training_engine::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Stack on a new game and after `reset`.
    pub starting_stack: u32,
    /// Chips won per correct answer before the streak bonus.
    pub reward_base: u32,
    /// Extra chips per point of streak.
    pub reward_streak_bonus: u32,
    pub score_per_correct: u32,
    pub xp_base: u32,
    pub xp_streak_bonus: u32,
    /// Chips lost per wrong answer.
    pub wrong_penalty: u32,
    /// Stack after a bankruptcy refill.
    pub refill_amount: u32,
    /// xp threshold after a level-up is `level * level_xp_multiplier`.
    pub level_xp_multiplier: u32,
    /// xp threshold for leaving level 1.
    pub first_level_xp: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            starting_stack: 1000,
            reward_base: 50,
            reward_streak_bonus: 10,
            score_per_correct: 100,
            xp_base: 50,
            xp_streak_bonus: 10,
            wrong_penalty: 200,
            refill_amount: 1000,
            level_xp_multiplier: 500,
            first_level_xp: 500,
        }
    }
}

impl EconomyConfig {
    /// Parse from JSON and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a threshold is zero.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_stack == 0 {
            return Err(ConfigError::Zero("starting_stack"));
        }
        if self.level_xp_multiplier == 0 {
            return Err(ConfigError::Zero("level_xp_multiplier"));
        }
        if self.first_level_xp == 0 {
            return Err(ConfigError::Zero("first_level_xp"));
        }
        if self.refill_amount == 0 {
            return Err(ConfigError::Zero("refill_amount"));
        }
        Ok(())
    }

    /// Chips for a correct answer at `streak`.
    pub fn reward(&self, streak: u32) -> u32 {
        self.reward_base.saturating_add(streak.saturating_mul(self.reward_streak_bonus))
    }

    /// xp for a correct answer at `streak`.
    pub fn xp_gain(&self, streak: u32) -> u32 {
        self.xp_base.saturating_add(streak.saturating_mul(self.xp_streak_bonus))
    }

    pub fn xp_threshold(&self, level: u32) -> u32 {
        level.saturating_mul(self.level_xp_multiplier)
    }
}
