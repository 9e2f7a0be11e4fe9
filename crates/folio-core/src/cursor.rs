//! Custom cursor: a dot and a trailing ring, both spring-followed.

use glam::Vec2;

use crate::color::Rgba;
use crate::constants::*;
use crate::spring::{Spring, SpringConfig, SpringVec2};

#[derive(Clone, Debug, PartialEq)]
pub struct CursorConfig {
    pub dot: SpringConfig,
    pub ring: SpringConfig,
    /// Spring for the ring diameter transition.
    pub ring_size: SpringConfig,
    /// Spring for the dot shrinking over interactive elements.
    pub dot_scale: SpringConfig,
    pub ring_diameter: f32,
    pub ring_diameter_interactive: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            dot: SpringConfig::new(CURSOR_DOT_STIFFNESS, CURSOR_DOT_DAMPING, CURSOR_DOT_MASS),
            ring: SpringConfig::new(CURSOR_RING_STIFFNESS, CURSOR_RING_DAMPING, CURSOR_RING_MASS),
            ring_size: SpringConfig::new(300.0, 20.0, 1.0),
            dot_scale: SpringConfig::critical(600.0, 1.0),
            ring_diameter: CURSOR_RING_SIZE,
            ring_diameter_interactive: CURSOR_RING_SIZE_INTERACTIVE,
        }
    }
}

/// What the host applies to the two cursor elements this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorFrame {
    pub dot: Vec2,
    pub follower: Vec2,
    pub follower_size: f32,
    pub dot_scale: f32,
    pub visible: bool,
    pub interactive: bool,
    pub ring_color: Rgba,
}

#[derive(Clone, Debug)]
pub struct CursorState {
    config: CursorConfig,
    dot: SpringVec2,
    follower: SpringVec2,
    size: Spring,
    scale: Spring,
    visible: bool,
    interactive: bool,
    seen: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new(CursorConfig::default())
    }
}

impl CursorState {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            dot: SpringVec2::new(Vec2::ZERO, config.dot),
            follower: SpringVec2::new(Vec2::ZERO, config.ring),
            size: Spring::new(config.ring_diameter, config.ring_size),
            scale: Spring::new(1.0, config.dot_scale),
            visible: false,
            interactive: false,
            seen: false,
            config,
        }
    }

    /// Pointer moved to `at`; `interactive` is true over links and buttons.
    pub fn pointer_moved(&mut self, at: Vec2, interactive: bool) {
        if !at.is_finite() {
            return;
        }
        if !self.seen {
            // first sighting: appear in place instead of flying in from the corner
            self.dot.snap(at);
            self.follower.snap(at);
            self.seen = true;
        }
        self.dot.set_target(at);
        self.follower.set_target(at);
        self.visible = true;
        if interactive != self.interactive {
            self.interactive = interactive;
            self.size.set_target(if interactive {
                self.config.ring_diameter_interactive
            } else {
                self.config.ring_diameter
            });
            self.scale.set_target(if interactive { 0.0 } else { 1.0 });
        }
    }

    pub fn pointer_left(&mut self) {
        self.visible = false;
    }

    pub fn pointer_entered(&mut self) {
        if self.seen {
            self.visible = true;
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.dot.update(dt);
        self.follower.update(dt);
        self.size.update(dt);
        self.scale.update(dt);
    }

    pub fn frame(&self) -> CursorFrame {
        CursorFrame {
            dot: self.dot.value(),
            follower: self.follower.value(),
            follower_size: self.size.value(),
            dot_scale: self.scale.value().max(0.0),
            visible: self.visible,
            interactive: self.interactive,
            ring_color: if self.interactive {
                Rgba::rgb8(139, 92, 246).with_alpha(0.8)
            } else {
                Rgba::rgb8(59, 130, 246).with_alpha(0.6)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(c: &mut CursorState, secs: f32) {
        for _ in 0..(secs * 60.0) as usize {
            c.update(1.0 / 60.0);
        }
    }

    #[test]
    fn hidden_until_first_move_then_appears_in_place() {
        let mut c = CursorState::default();
        assert!(!c.frame().visible);
        c.pointer_entered();
        assert!(!c.frame().visible);
        c.pointer_moved(Vec2::new(200.0, 100.0), false);
        let f = c.frame();
        assert!(f.visible);
        assert_eq!(f.dot, Vec2::new(200.0, 100.0));
        assert_eq!(f.follower, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn dot_leads_the_ring() {
        let mut c = CursorState::default();
        c.pointer_moved(Vec2::ZERO, false);
        c.pointer_moved(Vec2::new(300.0, 0.0), false);
        run(&mut c, 0.05);
        let f = c.frame();
        assert!(f.dot.x > f.follower.x, "dot {:?} ring {:?}", f.dot, f.follower);
        run(&mut c, 3.0);
        let f = c.frame();
        assert!((f.dot.x - 300.0).abs() < 0.5 && (f.follower.x - 300.0).abs() < 0.5);
    }

    #[test]
    fn interactive_grows_ring_and_hides_dot() {
        let mut c = CursorState::default();
        c.pointer_moved(Vec2::new(10.0, 10.0), true);
        run(&mut c, 1.0);
        let f = c.frame();
        assert!(f.interactive);
        assert!((f.follower_size - 60.0).abs() < 0.5);
        assert!(f.dot_scale < 0.01);
        c.pointer_moved(Vec2::new(10.0, 10.0), false);
        run(&mut c, 1.0);
        assert!((c.frame().follower_size - 40.0).abs() < 0.5);
    }

    #[test]
    fn leaving_hides_and_entering_shows() {
        let mut c = CursorState::default();
        c.pointer_moved(Vec2::new(1.0, 1.0), false);
        c.pointer_left();
        assert!(!c.frame().visible);
        c.pointer_entered();
        assert!(c.frame().visible);
    }
}
