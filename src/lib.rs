//! Plank Catch - a timed catch-the-falling-balls arcade mini-game
//!
//! Core modules:
//! - `sim`: Pure simulation (entities, paddle, collisions, match state)
//! - `game_loop`: Cooperative frame driver with start/stop lifecycle
//! - `platform`: Input mapping and rendering/navigation/persistence seams
//! - `settings`: Data-driven game configuration
//! - `highscores`: Finished-attempt leaderboard

pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game_loop::{FrameStatus, GameEvent, GameLoop, LoopState, RetryAction};
pub use highscores::ScoreBoard;
pub use settings::{GameConfig, ScorePolicy};

/// Game configuration defaults
pub mod consts {
    /// Seconds per attempt
    pub const GAME_DURATION: u32 = 1000;
    /// Attempts per session
    pub const INITIAL_ATTEMPTS: u32 = 3;
    /// Maximum live entities at once
    pub const MAX_ENTITIES: usize = 10;
    /// Frames between spawns
    pub const SPAWN_INTERVAL: u32 = 60;
    /// Score awarded per caught entity
    pub const CATCH_VALUE: u64 = 1;

    /// Countdown cadence in seconds (independent of the frame rate)
    pub const COUNTDOWN_STEP: f32 = 1.0;
    /// Nominal display refresh (frames per second) for the real-time driver
    pub const FRAME_RATE: f32 = 60.0;
    /// Maximum frames simulated per `update` call to prevent spiral of death
    pub const MAX_FRAMES_PER_UPDATE: u32 = 4;

    /// Entity defaults (pixels, pixels per frame)
    pub const ENTITY_RADIUS: f32 = 14.0;
    pub const MIN_FALL_SPEED: f32 = 2.0;
    pub const MAX_FALL_SPEED: f32 = 5.0;
    pub const MAX_DRIFT: f32 = 1.0;

    /// Paddle defaults (pixels)
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the bottom edge to the paddle centre at reset
    pub const PADDLE_BOTTOM_MARGIN: f32 = 60.0;
}
