//! Straight-alpha sRGB colors plus the small helpers the animation layer needs:
//! hex parsing, CSS formatting for the 2D canvas, percentage lighten/darken for
//! keycap shading and per-channel interpolation for gradients.

use crate::error::FolioError;

/// sRGB color with straight (non-premultiplied) alpha, all components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parses `#rrggbb` / `rrggbb` (case insensitive) into an opaque color.
    pub fn from_hex(hex: &str) -> Result<Self, FolioError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(FolioError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| FolioError::InvalidColor(format!("'{hex}': {e}")))
        };
        Ok(Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Returns `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(r, g, b, a)` string for canvas fill and stroke styles.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {:.3})", self.a.clamp(0.0, 1.0))
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Shifts every channel up by `round(2.55 * percent)` on the 0..255 scale.
    pub fn lighten(self, percent: f32) -> Self {
        self.shift_channels((2.55 * percent).round() as i32)
    }

    /// Shifts every channel down by `round(2.55 * percent)` on the 0..255 scale.
    pub fn darken(self, percent: f32) -> Self {
        self.shift_channels(-((2.55 * percent).round() as i32))
    }

    fn shift_channels(self, amount: i32) -> Self {
        let [r, g, b, _] = self.to_rgba8();
        let shift = |c: u8| (c as i32 + amount).clamp(0, 255) as u8;
        Self {
            a: self.a,
            ..Self::rgb8(shift(r), shift(g), shift(b))
        }
    }

    /// Per-channel linear interpolation (straight alpha).
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Linear-light RGB for GPU materials (alpha untouched).
    pub fn to_linear(self) -> [f32; 4] {
        let decode = |c: f32| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        [decode(self.r), decode(self.g), decode(self.b), self.a]
    }
}

/// Translucent color templates shared by the particle field ("aurora" palette).
pub const AURORA: [Rgba; 4] = [
    Rgba::new(0.0, 1.0, 135.0 / 255.0, 1.0),                   // mint green
    Rgba::new(96.0 / 255.0, 239.0 / 255.0, 1.0, 1.0),          // sky blue
    Rgba::new(1.0, 107.0 / 255.0, 107.0 / 255.0, 1.0),         // coral
    Rgba::new(168.0 / 255.0, 85.0 / 255.0, 247.0 / 255.0, 1.0), // purple
];

/// Pale blue used for the snow glow's middle stop.
pub const SNOW_BLUE: Rgba = Rgba::new(147.0 / 255.0, 197.0 / 255.0, 253.0 / 255.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        let a = Rgba::from_hex("#61DAFB").unwrap();
        let b = Rgba::from_hex("61dafb").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rgba8(), [0x61, 0xda, 0xfb, 255]);
    }

    #[test]
    fn rejects_short_and_non_hex_strings() {
        assert!(matches!(
            Rgba::from_hex("#fff"),
            Err(FolioError::InvalidColor(_))
        ));
        assert!(matches!(
            Rgba::from_hex("#gg0000"),
            Err(FolioError::InvalidColor(_))
        ));
    }

    #[test]
    fn lighten_clamps_at_white() {
        let c = Rgba::from_hex("#61DAFB").unwrap().lighten(15.0);
        assert_eq!(c.to_hex(), "#87ffff");
    }

    #[test]
    fn darken_clamps_at_black() {
        let c = Rgba::from_hex("#000000").unwrap().darken(10.0);
        assert_eq!(c.to_hex(), "#000000");
        let d = Rgba::from_hex("#336791").unwrap().darken(10.0);
        // 2.55 * 10 = 25.5 rounds to 26
        assert_eq!(d.to_hex(), "#194d77");
    }

    #[test]
    fn css_string_uses_integer_channels_and_alpha() {
        let css = AURORA[0].with_alpha(0.5).to_css();
        assert_eq!(css, "rgba(0, 255, 135, 0.500)");
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Rgba::new(0.0, 0.0, 0.0, 0.0);
        let b = Rgba::new(1.0, 0.5, 0.25, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let m = a.lerp(b, 0.5);
        assert!((m.r - 0.5).abs() < 1e-6 && (m.a - 0.5).abs() < 1e-6);
    }
}
