//! Pointer and touch input mapping
//!
//! Raw DOM-style events are reduced to a phase plus a canvas-relative point,
//! then turned into `PaddleCommand`s. No simulation state is touched here.

use glam::Vec2;

use crate::sim::PaddleCommand;

/// Pointer phase, shared by mouse and touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

impl PointerPhase {
    /// Map a DOM event type name to its phase
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "mousedown" | "touchstart" => Some(PointerPhase::Start),
            "mousemove" | "touchmove" => Some(PointerPhase::Move),
            "mouseup" | "touchend" | "touchcancel" => Some(PointerPhase::End),
            _ => None,
        }
    }
}

/// Event types the platform layer should listen for
pub const POINTER_EVENT_TYPES: [&str; 7] = [
    "mousedown",
    "mousemove",
    "mouseup",
    "touchstart",
    "touchmove",
    "touchend",
    "touchcancel",
];

/// A pointer event in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub point: Vec2,
}

impl PointerEvent {
    /// Build from client coordinates and the canvas' top-left in client space
    pub fn from_client(phase: PointerPhase, client: Vec2, canvas_origin: Vec2) -> Self {
        Self {
            phase,
            point: client - canvas_origin,
        }
    }

    pub fn to_command(self) -> PaddleCommand {
        match self.phase {
            PointerPhase::Start => PaddleCommand::Acquire(self.point),
            PointerPhase::Move => PaddleCommand::Drag(self.point),
            PointerPhase::End => PaddleCommand::Release(self.point),
        }
    }
}

/// Pick the client point of an event.
///
/// `changedTouches` wins (it is the only list populated on touchend), then
/// `touches`, then the mouse position. Falls back to the origin.
pub fn client_point(
    changed_touch: Option<Vec2>,
    touch: Option<Vec2>,
    mouse: Option<Vec2>,
) -> Vec2 {
    changed_touch.or(touch).or(mouse).unwrap_or(Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        assert_eq!(PointerPhase::from_event_type("mousedown"), Some(PointerPhase::Start));
        assert_eq!(PointerPhase::from_event_type("touchmove"), Some(PointerPhase::Move));
        assert_eq!(PointerPhase::from_event_type("touchend"), Some(PointerPhase::End));
        assert_eq!(PointerPhase::from_event_type("keydown"), None);
        for name in POINTER_EVENT_TYPES {
            assert!(PointerPhase::from_event_type(name).is_some());
        }
    }

    #[test]
    fn test_canvas_relative_command() {
        let event = PointerEvent::from_client(
            PointerPhase::Move,
            Vec2::new(130.0, 250.0),
            Vec2::new(30.0, 50.0),
        );
        assert_eq!(event.to_command(), PaddleCommand::Drag(Vec2::new(100.0, 200.0)));
    }

    #[test]
    fn test_client_point_priority() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(2.0, 2.0);
        let c = Vec2::new(3.0, 3.0);
        assert_eq!(client_point(Some(a), Some(b), Some(c)), a);
        assert_eq!(client_point(None, Some(b), Some(c)), b);
        assert_eq!(client_point(None, None, Some(c)), c);
        assert_eq!(client_point(None, None, None), Vec2::ZERO);
    }
}
