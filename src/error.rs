//! Error types
//!
//! Gameplay input never errors (bad or out-of-order input is a no-op); only
//! setup preconditions and configuration are reported to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The platform could not provide a drawing surface
    #[error("no canvas or render context available")]
    MissingRenderContext,

    #[error("invalid canvas bounds {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
