//! The player's plank
//!
//! Driven by three pointer phases (acquire, drag, release). A drag moves the
//! plank by the pointer's displacement from the contact point, so grabbing
//! anywhere on the field works without the plank jumping to the finger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Bounds;
use crate::settings::GameConfig;

/// Typed input for the plank, produced by the platform input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleCommand {
    Acquire(Vec2),
    Drag(Vec2),
    Release(Vec2),
}

/// Axis-aligned plank rectangle, centred on `pos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    pub is_dragging: bool,
    /// Pointer position at acquire
    grab_point: Vec2,
    /// Plank position at acquire
    grab_origin: Vec2,
    bounds: Bounds,
    bottom_margin: f32,
}

impl Paddle {
    pub fn new(config: &GameConfig, bounds: Bounds) -> Self {
        let mut paddle = Self {
            pos: Vec2::ZERO,
            size: Vec2::new(config.paddle_width, config.paddle_height),
            is_dragging: false,
            grab_point: Vec2::ZERO,
            grab_origin: Vec2::ZERO,
            bounds,
            bottom_margin: config.paddle_bottom_margin,
        };
        paddle.reset(bounds);
        paddle
    }

    /// Centre the plank near the bottom edge and drop any drag in progress
    pub fn reset(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.is_dragging = false;
        self.pos = self.clamped(Vec2::new(
            bounds.width / 2.0,
            bounds.height - self.bottom_margin,
        ));
    }

    /// Keep the current position but pull it back inside new bounds
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.pos = self.clamped(self.pos);
    }

    pub fn apply(&mut self, command: PaddleCommand) {
        match command {
            PaddleCommand::Acquire(p) => self.acquire(p),
            PaddleCommand::Drag(p) => self.drag(p),
            PaddleCommand::Release(p) => self.release(p),
        }
    }

    /// Begin a drag; ignored if one is already in progress
    pub fn acquire(&mut self, point: Vec2) {
        if self.is_dragging {
            return;
        }
        self.is_dragging = true;
        self.grab_point = point;
        self.grab_origin = self.pos;
    }

    /// Follow the pointer while dragging
    pub fn drag(&mut self, point: Vec2) {
        if !self.is_dragging {
            return;
        }
        self.pos = self.clamped(self.grab_origin + (point - self.grab_point));
    }

    /// End the drag, committing the final pointer position if one was active
    pub fn release(&mut self, point: Vec2) {
        if self.is_dragging {
            self.drag(point);
        }
        self.is_dragging = false;
    }

    /// Drop a drag without moving (attempt ended mid-drag)
    pub fn cancel_drag(&mut self) {
        self.is_dragging = false;
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    /// Top-left and bottom-right corners
    pub fn rect(&self) -> (Vec2, Vec2) {
        let half = self.half_size();
        (self.pos - half, self.pos + half)
    }

    fn clamped(&self, p: Vec2) -> Vec2 {
        let half = self.half_size();
        Vec2::new(
            self.bounds.clamp_x(p.x, half.x),
            self.bounds.clamp_y(p.y, half.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Paddle {
        Paddle::new(&GameConfig::default(), Bounds::new(800.0, 600.0))
    }

    #[test]
    fn test_reset_position() {
        let p = paddle();
        assert_eq!(p.pos, Vec2::new(400.0, 600.0 - crate::consts::PADDLE_BOTTOM_MARGIN));
        assert!(!p.is_dragging);
    }

    #[test]
    fn test_drag_moves_by_displacement() {
        let mut p = paddle();
        let start = p.pos;
        p.acquire(Vec2::new(100.0, 100.0));
        p.drag(Vec2::new(150.0, 90.0));
        assert_eq!(p.pos, start + Vec2::new(50.0, -10.0));
        p.release(Vec2::new(160.0, 90.0));
        assert_eq!(p.pos, start + Vec2::new(60.0, -10.0));
        assert!(!p.is_dragging);
    }

    #[test]
    fn test_drag_without_acquire_is_noop() {
        let mut p = paddle();
        let start = p.pos;
        p.drag(Vec2::new(10.0, 10.0));
        assert_eq!(p.pos, start);
        p.release(Vec2::new(10.0, 10.0));
        assert_eq!(p.pos, start);
        assert!(!p.is_dragging);
    }

    #[test]
    fn test_second_acquire_keeps_first_contact() {
        let mut p = paddle();
        let start = p.pos;
        p.acquire(Vec2::new(100.0, 100.0));
        p.acquire(Vec2::new(300.0, 300.0));
        p.drag(Vec2::new(110.0, 100.0));
        assert_eq!(p.pos, start + Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_drag_clamped_to_bounds() {
        let mut p = paddle();
        p.acquire(Vec2::ZERO);
        p.drag(Vec2::new(-5000.0, 5000.0));
        let half = p.half_size();
        assert_eq!(p.pos, Vec2::new(half.x, 600.0 - half.y));
    }

    #[test]
    fn test_set_bounds_clamps() {
        let mut p = paddle();
        p.set_bounds(Bounds::new(300.0, 200.0));
        let (min, max) = p.rect();
        assert!(min.x >= 0.0 && max.x <= 300.0);
        assert!(min.y >= 0.0 && max.y <= 200.0);
    }
}
