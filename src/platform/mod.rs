//! Platform abstraction layer
//!
//! The simulation never draws, navigates or stores anything itself. These
//! traits are the seams the browser (or a headless driver) plugs into:
//! - `RenderSurface`: canvas size and drawing of a frame snapshot
//! - `Navigator`: leaving the game screen
//! - `ResultSink`: receiving finished attempts

pub mod input;

pub use input::{POINTER_EVENT_TYPES, PointerEvent, PointerPhase, client_point};

use crate::game_loop::GameEvent;
use crate::sim::{AttemptResult, Bounds, Entity, MatchPhase, NavigationSignal, Paddle};

/// Read-only view of one frame for the rendering collaborator
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub entities: &'a [Entity],
    pub paddle: &'a Paddle,
    pub bounds: Bounds,
    pub phase: MatchPhase,
    pub time_left: u32,
    pub score: u64,
    pub attempts_remaining: u32,
}

pub trait RenderSurface {
    /// Current drawable size, or None if there is no usable context
    fn bounds(&self) -> Option<Bounds>;

    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}

pub trait Navigator {
    fn navigate(&mut self, signal: NavigationSignal);
}

pub trait ResultSink {
    fn attempt_ended(&mut self, result: &AttemptResult);
}

/// Hand queued game events to their collaborators
pub fn dispatch(
    events: impl IntoIterator<Item = GameEvent>,
    navigator: &mut impl Navigator,
    sink: &mut impl ResultSink,
) {
    for event in events {
        match event {
            GameEvent::AttemptEnded(result) => sink.attempt_ended(&result),
            GameEvent::Navigate(signal) => navigator.navigate(signal),
        }
    }
}

/// Surface that draws nothing; used by the native demo and tests
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pub bounds: Option<Bounds>,
    pub frames_drawn: u64,
    pub last_entity_count: usize,
    /// HUD value from the last drawn frame
    pub last_attempts_remaining: Option<u32>,
}

impl HeadlessSurface {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            frames_drawn: 0,
            last_entity_count: 0,
            last_attempts_remaining: None,
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        self.frames_drawn += 1;
        self.last_entity_count = frame.entities.len();
        self.last_attempts_remaining = Some(frame.attempts_remaining);
    }
}

/// Navigator that only records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub signals: Vec<NavigationSignal>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, signal: NavigationSignal) {
        log::info!("Navigation requested: {:?}", signal);
        self.signals.push(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::ScoreBoard;
    use crate::sim::AttemptStats;

    #[test]
    fn test_dispatch_routes_events() {
        let result = AttemptResult {
            score: 4,
            attempts_remaining: 2,
            stats: AttemptStats::default(),
        };
        let events = vec![
            GameEvent::AttemptEnded(result),
            GameEvent::Navigate(NavigationSignal::BackToHome),
        ];
        let mut navigator = RecordingNavigator::default();
        let mut board = ScoreBoard::new();
        dispatch(events, &mut navigator, &mut board);

        assert_eq!(navigator.signals, vec![NavigationSignal::BackToHome]);
        assert_eq!(board.top_score(), Some(4));
    }

    #[test]
    fn test_headless_surface_counts_frames() {
        let bounds = Bounds::new(320.0, 240.0);
        let mut surface = HeadlessSurface::new(bounds);
        let paddle = Paddle::new(&crate::settings::GameConfig::default(), bounds);
        let snapshot = FrameSnapshot {
            entities: &[],
            paddle: &paddle,
            bounds,
            phase: MatchPhase::Running,
            time_left: 10,
            score: 0,
            attempts_remaining: 3,
        };
        surface.draw(&snapshot);
        assert_eq!(surface.frames_drawn, 1);
        assert_eq!(surface.last_entity_count, 0);
        assert_eq!(surface.last_attempts_remaining, Some(3));
        assert_eq!(surface.bounds(), Some(bounds));
    }
}
