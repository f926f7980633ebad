//! Game configuration
//!
//! Defaults come from `crate::consts`; any subset can be overridden from JSON
//! (LocalStorage on web).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// What happens to the score when a new attempt starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Score carries over across attempts in a session
    #[default]
    Cumulative,
    /// Score resets to zero on every retry
    PerAttempt,
}

/// Tunable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Match ===
    /// Seconds per attempt
    pub game_duration_secs: u32,
    /// Attempts per session
    pub initial_attempts: u32,
    /// Score increment per catch
    pub catch_value: u64,
    /// Score carry-over between attempts
    pub score_policy: ScorePolicy,

    // === Spawning ===
    /// Live entity cap
    pub max_entities: usize,
    /// Frames between spawn attempts
    pub spawn_interval_ticks: u32,

    // === Entities (pixels, pixels per frame) ===
    pub entity_radius: f32,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
    /// Maximum horizontal speed either way
    pub max_drift: f32,

    // === Paddle (pixels) ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_margin: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_duration_secs: GAME_DURATION,
            initial_attempts: INITIAL_ATTEMPTS,
            catch_value: CATCH_VALUE,
            score_policy: ScorePolicy::Cumulative,

            max_entities: MAX_ENTITIES,
            spawn_interval_ticks: SPAWN_INTERVAL,

            entity_radius: ENTITY_RADIUS,
            min_fall_speed: MIN_FALL_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            max_drift: MAX_DRIFT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
        }
    }
}

impl GameConfig {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "plank_catch_config";

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        if self.game_duration_secs == 0 {
            return Err(GameError::InvalidConfig(
                "game_duration_secs must be positive".into(),
            ));
        }
        if self.initial_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "initial_attempts must be positive".into(),
            ));
        }
        if self.max_entities == 0 {
            return Err(GameError::InvalidConfig("max_entities must be positive".into()));
        }
        if self.spawn_interval_ticks == 0 {
            return Err(GameError::InvalidConfig(
                "spawn_interval_ticks must be positive".into(),
            ));
        }
        if !(self.entity_radius > 0.0) {
            return Err(GameError::InvalidConfig("entity_radius must be positive".into()));
        }
        if !(self.min_fall_speed > 0.0) || self.max_fall_speed < self.min_fall_speed {
            return Err(GameError::InvalidConfig(format!(
                "fall speed range {}..{} is empty",
                self.min_fall_speed, self.max_fall_speed
            )));
        }
        if !(self.max_drift >= 0.0) {
            return Err(GameError::InvalidConfig("max_drift must not be negative".into()));
        }
        if !(self.paddle_width > 0.0) || !(self.paddle_height > 0.0) {
            return Err(GameError::InvalidConfig("paddle size must be positive".into()));
        }
        Ok(())
    }

    /// Load config override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
