//! Cooperative frame driver
//!
//! One `frame` per display refresh and one `second` per countdown step. The
//! platform owns the scheduling (requestAnimationFrame, an interval timer or
//! a test loop); this controller only decides whether it wants more frames.

use crate::consts::*;
use crate::error::GameError;
use crate::platform::{FrameSnapshot, RenderSurface};
use crate::settings::GameConfig;
use crate::sim::{
    AttemptResult, Bounds, EntityPool, MatchState, NavigationSignal, Paddle, PaddleCommand,
    PoolEvent, RetryOutcome,
};

/// Bounds used until the surface reports its real size
const PLACEHOLDER_BOUNDS: Bounds = Bounds {
    width: 800.0,
    height: 600.0,
};

/// Scheduling state of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Never started
    Idle,
    /// Wants a frame every refresh
    Running,
    /// Attempt ended; no frames until a retry
    Halted,
    /// Torn down; input listeners should be gone
    Stopped,
}

/// Whether the caller should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Halted,
}

/// Result of a retry request, as the scheduler needs to see it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// New attempt started. `request_frame` is false when the previous
    /// frame chain never halted and is still pending.
    Restarted { request_frame: bool },
    /// No attempts left; a navigation event was queued
    Exhausted,
    /// Attempt still in play
    Ignored,
}

/// Outbound, fire-and-forget notifications for collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    AttemptEnded(AttemptResult),
    Navigate(NavigationSignal),
}

pub struct GameLoop {
    match_state: MatchState,
    pool: EntityPool,
    paddle: Paddle,
    bounds: Bounds,
    /// Resize received mid-frame, applied at the start of the next one
    pending_bounds: Option<Bounds>,
    state: LoopState,
    events: Vec<GameEvent>,
    frame_accumulator: f32,
    second_accumulator: f32,
    frames: u64,
}

impl GameLoop {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            match_state: MatchState::new(&config),
            pool: EntityPool::new(&config, PLACEHOLDER_BOUNDS, seed),
            paddle: Paddle::new(&config, PLACEHOLDER_BOUNDS),
            bounds: PLACEHOLDER_BOUNDS,
            pending_bounds: None,
            state: LoopState::Idle,
            events: Vec::new(),
            frame_accumulator: 0.0,
            second_accumulator: 0.0,
            frames: 0,
        })
    }

    /// Begin scheduling frames against `surface`.
    ///
    /// Fails if the surface has no usable drawing context.
    pub fn start(&mut self, surface: &impl RenderSurface) -> Result<(), GameError> {
        if self.state == LoopState::Running {
            return Ok(());
        }
        let bounds = surface.bounds().ok_or(GameError::MissingRenderContext)?;
        if !bounds.is_usable() {
            return Err(GameError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        self.bounds = bounds;
        self.pending_bounds = None;
        self.pool.reset(bounds);
        self.paddle.reset(bounds);
        self.frame_accumulator = 0.0;
        self.second_accumulator = 0.0;
        self.state = LoopState::Running;
        log::info!(
            "Game loop started on {}x{} canvas ({} attempts, {}s each)",
            bounds.width,
            bounds.height,
            self.match_state.attempts_remaining,
            self.match_state.time_left
        );
        Ok(())
    }

    /// Tear down: no more frames or countdown steps until `start` again
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.paddle.cancel_drag();
        log::info!("Game loop stopped after {} frames", self.frames);
    }

    /// True while the platform should keep requesting frames
    pub fn is_scheduled(&self) -> bool {
        self.state == LoopState::Running
    }

    /// True while pointer input should be listened for
    pub fn accepts_input(&self) -> bool {
        self.state == LoopState::Running && self.match_state.is_running()
    }

    /// Deliver a plank command; ignored unless an attempt is in play
    pub fn handle_input(&mut self, command: PaddleCommand) {
        if !self.accepts_input() {
            return;
        }
        self.paddle.apply(command);
    }

    /// Record a canvas resize; takes effect at the next frame boundary
    pub fn resize(&mut self, bounds: Bounds) {
        if !bounds.is_usable() {
            log::warn!("Ignoring unusable canvas size {}x{}", bounds.width, bounds.height);
            return;
        }
        self.pending_bounds = Some(bounds);
    }

    /// One display refresh: advance entities, score catches, draw
    pub fn frame(&mut self, surface: &mut impl RenderSurface) -> FrameStatus {
        if self.state != LoopState::Running {
            return FrameStatus::Halted;
        }
        self.apply_pending_bounds();

        // Covers a countdown step that landed between frames
        if self.match_state.observe_expiry() {
            self.on_attempt_ended();
        }

        if !self.match_state.is_running() {
            self.pool.reset(self.bounds);
            self.paddle.cancel_drag();
            self.state = LoopState::Halted;
            surface.draw(&self.snapshot());
            log::info!("Frame loop halted (attempt over)");
            return FrameStatus::Halted;
        }

        for event in self.pool.advance(1, &self.paddle) {
            if let PoolEvent::Removed { outcome, .. } = event {
                self.match_state.apply_outcome(outcome);
            }
        }
        self.frames += 1;

        surface.draw(&self.snapshot());
        FrameStatus::Continue
    }

    /// One countdown step
    pub fn second(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        if self.match_state.countdown() {
            self.on_attempt_ended();
        }
    }

    /// Real-time driver: feeds both cadences from elapsed seconds
    pub fn update(&mut self, dt: f32, surface: &mut impl RenderSurface) -> FrameStatus {
        let dt = dt.clamp(0.0, 0.25);
        self.second_accumulator += dt;
        self.frame_accumulator += dt;

        while self.second_accumulator >= COUNTDOWN_STEP {
            self.second_accumulator -= COUNTDOWN_STEP;
            self.second();
        }

        let frame_dt = 1.0 / FRAME_RATE;
        let mut frames = 0;
        let mut status = if self.is_scheduled() {
            FrameStatus::Continue
        } else {
            FrameStatus::Halted
        };
        while self.frame_accumulator >= frame_dt && frames < MAX_FRAMES_PER_UPDATE {
            self.frame_accumulator -= frame_dt;
            frames += 1;
            status = self.frame(surface);
            if status == FrameStatus::Halted {
                self.frame_accumulator = 0.0;
                break;
            }
        }
        status
    }

    /// Ask for another attempt.
    ///
    /// A countdown step can end the attempt before the halting frame runs, so
    /// a frame may still be pending; only a halted loop needs a new request.
    pub fn retry(&mut self) -> RetryAction {
        match self.match_state.retry() {
            RetryOutcome::Restarted => {
                let request_frame = self.state == LoopState::Halted;
                self.apply_pending_bounds();
                self.pool.reset(self.bounds);
                self.paddle.reset(self.bounds);
                self.frame_accumulator = 0.0;
                self.second_accumulator = 0.0;
                if self.state != LoopState::Stopped {
                    self.state = LoopState::Running;
                }
                log::info!(
                    "Retry: {} attempts remaining, score {}",
                    self.match_state.attempts_remaining,
                    self.match_state.score
                );
                RetryAction::Restarted {
                    request_frame: request_frame && self.state == LoopState::Running,
                }
            }
            RetryOutcome::Exhausted => {
                log::info!("No attempts left, leaving game");
                self.events
                    .push(GameEvent::Navigate(NavigationSignal::RetryExhausted));
                RetryAction::Exhausted
            }
            RetryOutcome::Ignored => RetryAction::Ignored,
        }
    }

    /// Leave the game screen. Only honoured after an attempt has ended.
    pub fn back_to_home(&mut self) -> bool {
        match self.match_state.back_to_home() {
            Some(signal) => {
                self.events.push(GameEvent::Navigate(signal));
                true
            }
            None => false,
        }
    }

    /// Take queued events for the collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            entities: self.pool.entities(),
            paddle: &self.paddle,
            bounds: self.bounds,
            phase: self.match_state.phase,
            time_left: self.match_state.time_left,
            score: self.match_state.score,
            attempts_remaining: self.match_state.attempts_remaining,
        }
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn apply_pending_bounds(&mut self) {
        if let Some(bounds) = self.pending_bounds.take() {
            log::info!("Canvas resized to {}x{}", bounds.width, bounds.height);
            self.bounds = bounds;
            self.pool.set_bounds(bounds);
            self.paddle.set_bounds(bounds);
        }
    }

    fn on_attempt_ended(&mut self) {
        self.paddle.cancel_drag();
        let result = self.match_state.result();
        log::info!(
            "Attempt ended: score {}, caught {}, missed {}, {} attempts remaining",
            result.score,
            result.stats.caught,
            result.stats.missed,
            result.attempts_remaining
        );
        self.events.push(GameEvent::AttemptEnded(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessSurface;
    use crate::sim::MatchPhase;
    use glam::Vec2;

    fn config(duration: u32, attempts: u32) -> GameConfig {
        GameConfig {
            game_duration_secs: duration,
            initial_attempts: attempts,
            ..Default::default()
        }
    }

    fn started(config: GameConfig) -> (GameLoop, HeadlessSurface) {
        let surface = HeadlessSurface::new(Bounds::new(800.0, 600.0));
        let mut game = GameLoop::new(config, 12345).unwrap();
        game.start(&surface).unwrap();
        (game, surface)
    }

    fn run_out(game: &mut GameLoop) {
        while game.match_state().is_running() {
            game.second();
        }
    }

    #[test]
    fn test_start_requires_render_context() {
        let mut surface = HeadlessSurface::new(Bounds::new(800.0, 600.0));
        surface.bounds = None;
        let mut game = GameLoop::new(GameConfig::default(), 1).unwrap();
        assert!(matches!(
            game.start(&surface),
            Err(GameError::MissingRenderContext)
        ));
        assert_eq!(game.state(), LoopState::Idle);

        surface.bounds = Some(Bounds::new(0.0, 600.0));
        assert!(matches!(
            game.start(&surface),
            Err(GameError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameLoop::new(
            GameConfig {
                max_entities: 0,
                ..Default::default()
            },
            1,
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_frame_before_start_is_halted() {
        let mut surface = HeadlessSurface::new(Bounds::new(800.0, 600.0));
        let mut game = GameLoop::new(GameConfig::default(), 1).unwrap();
        assert_eq!(game.frame(&mut surface), FrameStatus::Halted);
        assert_eq!(surface.frames_drawn, 0);
    }

    #[test]
    fn test_frames_draw_and_spawn() {
        let (mut game, mut surface) = started(GameConfig {
            spawn_interval_ticks: 5,
            ..Default::default()
        });
        for _ in 0..5 {
            assert_eq!(game.frame(&mut surface), FrameStatus::Continue);
        }
        assert_eq!(surface.frames_drawn, 5);
        assert_eq!(game.pool().len(), 1);
        assert_eq!(surface.last_entity_count, 1);
    }

    #[test]
    fn test_attempt_end_halts_and_clears() {
        let (mut game, mut surface) = started(GameConfig {
            spawn_interval_ticks: 1,
            ..config(2, 3)
        });
        game.frame(&mut surface);
        assert!(!game.pool().is_empty());

        run_out(&mut game);
        assert_eq!(game.match_state().phase, MatchPhase::Ended);
        assert_eq!(game.match_state().time_left, 0);
        let events = game.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::AttemptEnded(_)]));

        assert_eq!(game.frame(&mut surface), FrameStatus::Halted);
        assert!(game.pool().is_empty());
        assert_eq!(game.state(), LoopState::Halted);
        assert_eq!(game.frame(&mut surface), FrameStatus::Halted);
    }

    #[test]
    fn test_expiry_observed_by_frame() {
        let (mut game, mut surface) = started(config(5, 3));
        game.match_state.time_left = 0;
        assert_eq!(game.frame(&mut surface), FrameStatus::Halted);
        assert_eq!(game.match_state().phase, MatchPhase::Ended);
        assert_eq!(game.drain_events().len(), 1);
        // A late countdown step doesn't end it twice
        game.second();
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_retry_then_exhaustion() {
        let (mut game, mut surface) = started(config(2, 2));
        assert_eq!(game.retry(), RetryAction::Ignored);

        run_out(&mut game);
        game.frame(&mut surface);
        assert_eq!(
            game.retry(),
            RetryAction::Restarted {
                request_frame: true
            }
        );
        assert_eq!(game.match_state().attempts_remaining, 1);
        assert_eq!(game.match_state().time_left, 2);
        assert_eq!(game.match_state().phase, MatchPhase::Running);
        assert!(game.pool().is_empty());
        assert!(game.is_scheduled());
        assert_eq!(game.frame(&mut surface), FrameStatus::Continue);
        assert_eq!(surface.last_attempts_remaining, Some(1));

        run_out(&mut game);
        game.drain_events();
        assert_eq!(game.retry(), RetryAction::Exhausted);
        assert_eq!(game.match_state().attempts_remaining, 1);
        assert_eq!(game.match_state().phase, MatchPhase::Ended);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Navigate(NavigationSignal::RetryExhausted)]
        );
    }

    #[test]
    fn test_retry_before_halting_frame_keeps_single_chain() {
        let (mut game, mut surface) = started(config(1, 3));
        assert_eq!(game.frame(&mut surface), FrameStatus::Continue);

        // Countdown ends the attempt; the pending frame hasn't run yet
        game.second();
        assert!(game.is_scheduled());
        assert!(!game.accepts_input());

        assert_eq!(
            game.retry(),
            RetryAction::Restarted {
                request_frame: false
            }
        );
        assert!(game.accepts_input());
        // The already-pending frame picks the new attempt up
        assert_eq!(game.frame(&mut surface), FrameStatus::Continue);
        assert_eq!(game.state(), LoopState::Running);
    }

    #[test]
    fn test_accepts_input_follows_phase() {
        let (mut game, mut surface) = started(config(1, 3));
        assert!(game.accepts_input());

        game.second();
        assert!(!game.accepts_input());
        game.frame(&mut surface);
        assert!(!game.accepts_input());

        game.retry();
        assert!(game.accepts_input());

        game.stop();
        assert!(!game.accepts_input());
    }

    #[test]
    fn test_back_to_home_only_after_end() {
        let (mut game, _) = started(config(1, 3));
        assert!(!game.back_to_home());
        assert!(game.drain_events().is_empty());

        game.second();
        game.drain_events();
        assert!(game.back_to_home());
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Navigate(NavigationSignal::BackToHome)]
        );
    }

    #[test]
    fn test_each_catch_scores_once() {
        // Narrow field with the plank pulled to the top: every spawn lands on it
        let width = crate::consts::PADDLE_WIDTH;
        let surface_bounds = Bounds::new(width, 600.0);
        let mut surface = HeadlessSurface::new(surface_bounds);
        let config = GameConfig {
            spawn_interval_ticks: 1,
            max_drift: 0.0,
            ..Default::default()
        };
        let catch_value = config.catch_value;
        let mut game = GameLoop::new(config, 3).unwrap();
        game.start(&surface).unwrap();
        game.handle_input(PaddleCommand::Acquire(Vec2::ZERO));
        game.handle_input(PaddleCommand::Drag(Vec2::new(0.0, -1000.0)));

        for _ in 0..10 {
            game.frame(&mut surface);
        }
        assert_eq!(game.match_state().stats.caught, 10);
        assert_eq!(game.match_state().score, 10 * catch_value);
        assert!(game.pool().is_empty());
    }

    #[test]
    fn test_input_ignored_after_end() {
        let (mut game, mut surface) = started(config(1, 3));
        game.handle_input(PaddleCommand::Acquire(Vec2::ZERO));
        assert!(game.paddle().is_dragging);

        game.second();
        assert!(!game.paddle().is_dragging);
        let pos = game.paddle().position();
        game.handle_input(PaddleCommand::Acquire(Vec2::ZERO));
        game.handle_input(PaddleCommand::Drag(Vec2::new(100.0, 0.0)));
        assert_eq!(game.paddle().position(), pos);
        game.frame(&mut surface);
        assert!(!game.paddle().is_dragging);
    }

    #[test]
    fn test_resize_applies_at_next_frame() {
        let (mut game, mut surface) = started(GameConfig::default());
        let new_bounds = Bounds::new(400.0, 300.0);
        game.resize(new_bounds);
        assert_eq!(game.bounds(), Bounds::new(800.0, 600.0));
        game.frame(&mut surface);
        assert_eq!(game.bounds(), new_bounds);
        assert_eq!(game.pool().bounds(), new_bounds);
        let (_, max) = game.paddle().rect();
        assert!(max.x <= 400.0 && max.y <= 300.0);

        game.resize(Bounds::new(-1.0, 10.0));
        game.frame(&mut surface);
        assert_eq!(game.bounds(), new_bounds);
    }

    #[test]
    fn test_stop_halts_everything() {
        let (mut game, mut surface) = started(config(5, 3));
        game.stop();
        assert!(!game.is_scheduled());
        assert_eq!(game.frame(&mut surface), FrameStatus::Halted);
        game.second();
        assert_eq!(game.match_state().time_left, 5);
        assert_eq!(surface.frames_drawn, 0);
    }

    #[test]
    fn test_update_drives_both_cadences() {
        let (mut game, mut surface) = started(config(3, 3));
        let dt = 1.0 / FRAME_RATE;
        let mut status = FrameStatus::Continue;
        let mut steps = 0;
        while status == FrameStatus::Continue && steps < 10_000 {
            status = game.update(dt, &mut surface);
            steps += 1;
        }
        assert_eq!(status, FrameStatus::Halted);
        assert_eq!(game.match_state().phase, MatchPhase::Ended);
        assert_eq!(game.match_state().time_left, 0);
        // Roughly three seconds of frames
        assert!(surface.frames_drawn >= 150 && surface.frames_drawn <= 200);
    }
}
