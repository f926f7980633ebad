//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One frame per `advance` step, one second per `countdown`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod paddle;
pub mod pool;
pub mod state;

pub use collision::{Outcome, circle_rect_overlap, resolve};
pub use paddle::{Paddle, PaddleCommand};
pub use pool::{EntityPool, PoolEvent};
pub use state::{
    AttemptResult, AttemptStats, Bounds, Entity, MatchPhase, MatchState, NavigationSignal,
    RetryOutcome,
};
