//! Error types for the animation core.

use thiserror::Error;

/// Errors produced by the animation core.
///
/// None of these are meant to reach the host page: front-ends log them and
/// degrade (skip a component, drop a label) instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FolioError {
    /// A viewport, pixmap or texture had a zero (or non-finite) dimension.
    #[error("invalid dimensions {width}x{height}: both must be positive and finite")]
    InvalidDimensions { width: f32, height: f32 },

    /// SVG path data could not be parsed.
    #[error("malformed path data at byte {offset}: {reason}")]
    MalformedPath { offset: usize, reason: String },

    /// An icon produced no drawable geometry.
    #[error("icon '{0}' has no drawable paths")]
    EmptyIcon(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A raster request was outside the supported size range.
    #[error("invalid texture size {0}: must be between 1 and 4096")]
    InvalidTextureSize(u32),
}
