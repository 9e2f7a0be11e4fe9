//! Latest pointer position, written by event handlers and read by frame ticks.

use glam::Vec2;

/// Pointer position in logical viewport pixels, or `None` once it has left.
///
/// Owned by the mounted component and passed into each step explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    position: Option<Vec2>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, x: f32, y: f32) {
        self.position = if x.is_finite() && y.is_finite() {
            Some(Vec2::new(x, y))
        } else {
            None
        };
    }

    pub fn left(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// The glow under the field is only painted while both coordinates are
    /// strictly positive, which also excludes a pointer parked at the origin.
    pub fn glow_position(&self) -> Option<Vec2> {
        self.position.filter(|p| p.x > 0.0 && p.y > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_away_and_tracks_moves() {
        let mut p = PointerState::new();
        assert_eq!(p.position(), None);
        p.moved(10.0, 20.0);
        assert_eq!(p.position(), Some(Vec2::new(10.0, 20.0)));
        p.left();
        assert_eq!(p.position(), None);
    }

    #[test]
    fn non_finite_coordinates_count_as_away() {
        let mut p = PointerState::new();
        p.moved(f32::NAN, 3.0);
        assert_eq!(p.position(), None);
    }

    #[test]
    fn glow_needs_positive_coordinates() {
        let mut p = PointerState::new();
        p.moved(0.0, 50.0);
        assert!(p.position().is_some());
        assert_eq!(p.glow_position(), None);
        p.moved(1.0, 50.0);
        assert_eq!(p.glow_position(), Some(Vec2::new(1.0, 50.0)));
    }
}
