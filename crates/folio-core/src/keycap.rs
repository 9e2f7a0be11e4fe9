//! Interaction spring controller for one keycap.
//!
//! Mode is idle, hovered or pressed. Pressed wins whenever any press source
//! (the bound key or a pointer click) is active; otherwise hover decides.
//! The four rendered parameters are springs chasing the mode's targets, so a
//! mode change never snaps the visuals.

use crate::constants::*;
use crate::spring::{Spring, SpringConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeycapMode {
    Idle,
    Hovered,
    Pressed,
}

/// Independent inputs that can hold a keycap down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PressSource {
    Key,
    Pointer,
}

/// Per-frame render inputs for one keycap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeycapParams {
    pub scale: f32,
    pub vertical_offset: f32,
    pub emissive_intensity: f32,
    pub glow_intensity: f32,
}

impl KeycapParams {
    pub const IDLE: Self = Self::new(1.0, 0.0, 0.3, 0.4);
    pub const HOVERED: Self = Self::new(1.02, 0.0, 0.6, 1.0);
    pub const PRESSED: Self = Self::new(0.96, -0.12, 1.0, 1.5);

    pub const fn new(
        scale: f32,
        vertical_offset: f32,
        emissive_intensity: f32,
        glow_intensity: f32,
    ) -> Self {
        Self {
            scale,
            vertical_offset,
            emissive_intensity,
            glow_intensity,
        }
    }

    pub fn target_for(mode: KeycapMode) -> Self {
        match mode {
            KeycapMode::Idle => Self::IDLE,
            KeycapMode::Hovered => Self::HOVERED,
            KeycapMode::Pressed => Self::PRESSED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct KeycapController {
    trigger: char,
    hovered: bool,
    key_down: bool,
    pointer_down: bool,
    /// Seconds left before a click-originated press releases itself.
    click_timer: Option<f32>,
    click_release: f32,
    scale: Spring,
    vertical_offset: Spring,
    emissive: Spring,
    glow: Spring,
}

impl KeycapController {
    pub fn new(trigger: char) -> Self {
        Self::with_config(trigger, SpringConfig::default(), CLICK_RELEASE_SEC)
    }

    pub fn with_config(trigger: char, spring: SpringConfig, click_release: f32) -> Self {
        let idle = KeycapParams::IDLE;
        Self {
            trigger: trigger.to_ascii_lowercase(),
            hovered: false,
            key_down: false,
            pointer_down: false,
            click_timer: None,
            click_release,
            scale: Spring::new(idle.scale, spring),
            vertical_offset: Spring::new(idle.vertical_offset, spring),
            emissive: Spring::new(idle.emissive_intensity, spring),
            glow: Spring::new(idle.glow_intensity, spring),
        }
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    pub fn mode(&self) -> KeycapMode {
        if self.key_down || self.pointer_down {
            KeycapMode::Pressed
        } else if self.hovered {
            KeycapMode::Hovered
        } else {
            KeycapMode::Idle
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.mode() == KeycapMode::Pressed
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// True if `key` (a `KeyboardEvent.key` value) is this keycap's trigger.
    pub fn matches_key(&self, key: &str) -> bool {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_lowercase().eq(self.trigger.to_lowercase()),
            _ => false,
        }
    }

    pub fn pointer_enter(&mut self) {
        self.set_hovered(true);
    }

    pub fn pointer_leave(&mut self) {
        self.set_hovered(false);
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        self.retarget();
    }

    /// Returns true if the key matched and the controller consumed it.
    pub fn key_down(&mut self, key: &str) -> bool {
        if !self.matches_key(key) {
            return false;
        }
        self.press(PressSource::Key);
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        if !self.matches_key(key) {
            return false;
        }
        self.release(PressSource::Key);
        true
    }

    pub fn press(&mut self, source: PressSource) {
        match source {
            PressSource::Key => self.key_down = true,
            PressSource::Pointer => {
                self.pointer_down = true;
                self.click_timer = None;
            }
        }
        self.retarget();
    }

    pub fn release(&mut self, source: PressSource) {
        match source {
            PressSource::Key => self.key_down = false,
            PressSource::Pointer => {
                self.pointer_down = false;
                self.click_timer = None;
            }
        }
        self.retarget();
    }

    /// Synthetic click: pointer press that releases itself after the click
    /// release delay (counted down by [`update`](Self::update)).
    pub fn click(&mut self) {
        self.pointer_down = true;
        self.click_timer = Some(self.click_release);
        self.retarget();
    }

    /// Advances the click timer and all four springs.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        if let Some(left) = self.click_timer {
            let left = left - dt;
            if left <= 0.0 {
                self.release(PressSource::Pointer);
            } else {
                self.click_timer = Some(left);
            }
        }
        for spring in self.springs_mut() {
            spring.update(dt);
        }
    }

    pub fn params(&self) -> KeycapParams {
        KeycapParams {
            scale: self.scale.value(),
            vertical_offset: self.vertical_offset.value(),
            emissive_intensity: self.emissive.value(),
            glow_intensity: self.glow.value(),
        }
    }

    pub fn is_settled(&self) -> bool {
        [&self.scale, &self.vertical_offset, &self.emissive, &self.glow]
            .iter()
            .all(|s| s.is_at_rest())
    }

    fn springs_mut(&mut self) -> [&mut Spring; 4] {
        [
            &mut self.scale,
            &mut self.vertical_offset,
            &mut self.emissive,
            &mut self.glow,
        ]
    }

    fn retarget(&mut self) {
        let t = KeycapParams::target_for(self.mode());
        self.scale.set_target(t.scale);
        self.vertical_offset.set_target(t.vertical_offset);
        self.emissive.set_target(t.emissive_intensity);
        self.glow.set_target(t.glow_intensity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(c: &mut KeycapController, secs: f32) {
        let frames = (secs * 60.0).round() as usize;
        for _ in 0..frames {
            c.update(1.0 / 60.0);
        }
    }

    #[test]
    fn starts_idle_at_idle_targets() {
        let c = KeycapController::new('r');
        assert_eq!(c.mode(), KeycapMode::Idle);
        assert_eq!(c.params(), KeycapParams::IDLE);
    }

    #[test]
    fn key_match_is_case_insensitive_and_single_char() {
        let c = KeycapController::new('R');
        assert!(c.matches_key("r"));
        assert!(c.matches_key("R"));
        assert!(!c.matches_key("t"));
        assert!(!c.matches_key("Enter"));
        assert!(!c.matches_key(""));
    }

    #[test]
    fn hover_then_leave() {
        let mut c = KeycapController::new('a');
        c.pointer_enter();
        assert_eq!(c.mode(), KeycapMode::Hovered);
        c.pointer_leave();
        assert_eq!(c.mode(), KeycapMode::Idle);
    }

    #[test]
    fn release_while_hovered_returns_to_hovered() {
        let mut c = KeycapController::new('a');
        c.pointer_enter();
        c.key_down("a");
        assert_eq!(c.mode(), KeycapMode::Pressed);
        c.key_up("A");
        assert_eq!(c.mode(), KeycapMode::Hovered);
    }

    #[test]
    fn click_releases_itself_after_delay() {
        let mut c = KeycapController::new('a');
        c.click();
        assert!(c.is_pressed());
        run(&mut c, 0.1);
        assert!(c.is_pressed());
        run(&mut c, 0.1);
        assert!(!c.is_pressed());
    }

    #[test]
    fn pressed_params_settle_on_pressed_targets() {
        let mut c = KeycapController::new('a');
        c.press(PressSource::Key);
        run(&mut c, 0.5);
        let p = c.params();
        let t = KeycapParams::PRESSED;
        assert!((p.scale - t.scale).abs() < 1e-3);
        assert!((p.vertical_offset - t.vertical_offset).abs() < 1e-3);
        assert!((p.emissive_intensity - t.emissive_intensity).abs() < 1e-3);
        assert!((p.glow_intensity - t.glow_intensity).abs() < 1e-3);
        assert!(c.is_settled());
    }

    #[test]
    fn unmatched_keys_are_not_consumed() {
        let mut c = KeycapController::new('a');
        assert!(!c.key_down("b"));
        assert_eq!(c.mode(), KeycapMode::Idle);
    }
}
