//! Icon descriptors: the narrow interface the label generator consumes.

use glam::Vec2;

use crate::error::FolioError;
use crate::path::{flatten, parse_path};

/// The coordinate box icon path data is authored in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub min: Vec2,
    pub size: Vec2,
}

impl ViewBox {
    pub const fn square(edge: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            size: Vec2::new(edge, edge),
        }
    }
}

/// Anything that can describe itself as filled SVG path data.
pub trait IconDescriptor {
    /// Stable identity, used as part of the label cache key.
    fn id(&self) -> &str;

    fn view_box(&self) -> ViewBox;

    /// Path data strings, each filled with the non-zero rule.
    fn paths(&self) -> Vec<&str>;

    /// Parses and flattens every path into closed contours in view box units.
    fn outline(&self, tolerance: f32) -> Result<Vec<Vec<Vec2>>, FolioError> {
        let mut contours = Vec::new();
        for data in self.paths() {
            contours.extend(flatten(&parse_path(data)?, tolerance));
        }
        if contours.is_empty() {
            return Err(FolioError::EmptyIcon(self.id().to_string()));
        }
        Ok(contours)
    }
}

/// Owned icon data.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgIcon {
    id: String,
    view_box: ViewBox,
    paths: Vec<String>,
}

impl SvgIcon {
    pub fn new(id: impl Into<String>, view_box: ViewBox, paths: Vec<String>) -> Self {
        Self {
            id: id.into(),
            view_box,
            paths,
        }
    }
}

impl IconDescriptor for SvgIcon {
    fn id(&self) -> &str {
        &self.id
    }

    fn view_box(&self) -> ViewBox {
        self.view_box
    }

    fn paths(&self) -> Vec<&str> {
        self.paths.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_collects_contours_from_every_path() {
        let icon = SvgIcon::new(
            "two-squares",
            ViewBox::square(24.0),
            vec!["M0 0h4v4h-4z".into(), "M10 10h4v4h-4z".into()],
        );
        assert_eq!(icon.outline(0.5).unwrap().len(), 2);
    }

    #[test]
    fn empty_icon_is_an_error() {
        let icon = SvgIcon::new("blank", ViewBox::square(24.0), vec![]);
        assert_eq!(
            icon.outline(0.5).unwrap_err(),
            FolioError::EmptyIcon("blank".into())
        );
    }

    #[test]
    fn malformed_path_propagates() {
        let icon = SvgIcon::new("bad", ViewBox::square(24.0), vec!["M0 0 L".into()]);
        assert!(matches!(
            icon.outline(0.5),
            Err(FolioError::MalformedPath { .. })
        ));
    }
}
