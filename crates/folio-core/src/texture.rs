//! Procedural label textures: an icon rasterised into a square, transparent
//! image, cached per (icon, color, size).

use fnv::FnvHashMap;
use glam::Vec2;
use image::RgbaImage;
use std::rc::Rc;

use crate::color::Rgba;
use crate::constants::*;
use crate::error::FolioError;
use crate::icon::IconDescriptor;
use crate::raster::Pixmap;

const MAX_TEXTURE_SIZE: u32 = 4096;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelKey {
    pub icon: String,
    pub color: [u8; 4],
    pub size: u32,
}

/// Immutable rasterised label.
#[derive(Debug)]
pub struct LabelTexture {
    key: LabelKey,
    image: RgbaImage,
}

impl LabelTexture {
    pub fn key(&self) -> &LabelKey {
        &self.key
    }

    pub fn size(&self) -> u32 {
        self.key.size
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Tightly packed straight-alpha RGBA8 rows.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Maps view box coordinates into the icon square of a `size` texture.
fn label_transform(view_box_min: Vec2, view_box_size: Vec2, size: f32) -> (f32, Vec2) {
    let icon_edge = size * LABEL_ICON_FRACTION;
    let inset = size * LABEL_INSET_FRACTION;
    let longest = view_box_size.x.max(view_box_size.y);
    let scale = icon_edge / longest;
    // center the shorter axis inside the icon square
    let pad = (Vec2::splat(icon_edge) - view_box_size * scale) * 0.5;
    (scale, Vec2::splat(inset) + pad - view_box_min * scale)
}

/// Rasterises `icon` in `color` centred in a `size` x `size` transparent square.
pub fn build_label(
    icon: &dyn IconDescriptor,
    color: Rgba,
    size: u32,
) -> Result<LabelTexture, FolioError> {
    if size == 0 || size > MAX_TEXTURE_SIZE {
        return Err(FolioError::InvalidTextureSize(size));
    }
    let vb = icon.view_box();
    if !(vb.size.x > 0.0 && vb.size.y > 0.0) {
        return Err(FolioError::InvalidDimensions {
            width: vb.size.x,
            height: vb.size.y,
        });
    }
    let (scale, offset) = label_transform(vb.min, vb.size, size as f32);
    // about a quarter pixel of flattening error once scaled
    let tolerance = 0.25 / scale;
    let contours: Vec<Vec<Vec2>> = icon
        .outline(tolerance)?
        .into_iter()
        .map(|c| c.into_iter().map(|p| p * scale + offset).collect())
        .collect();

    let mut pixmap = Pixmap::new(size, size)?;
    pixmap.fill_polygons(&contours, color);
    if pixmap.is_blank() {
        return Err(FolioError::EmptyIcon(icon.id().to_string()));
    }
    Ok(LabelTexture {
        key: LabelKey {
            icon: icon.id().to_string(),
            color: color.to_rgba8(),
            size,
        },
        image: pixmap.to_image(),
    })
}

/// Lazily built labels for one owner.
///
/// Failures are cached as `None` so a broken icon is logged once and never
/// rasterised again; the owner draws that element without a label.
#[derive(Debug)]
pub struct LabelCache {
    size: u32,
    entries: FnvHashMap<LabelKey, Option<Rc<LabelTexture>>>,
    builds: usize,
}

impl Default for LabelCache {
    fn default() -> Self {
        Self::new(LABEL_TEXTURE_SIZE)
    }
}

impl LabelCache {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            entries: FnvHashMap::default(),
            builds: 0,
        }
    }

    pub fn get_or_build(&mut self, icon: &dyn IconDescriptor, color: Rgba) -> Option<Rc<LabelTexture>> {
        let key = LabelKey {
            icon: icon.id().to_string(),
            color: color.to_rgba8(),
            size: self.size,
        };
        if let Some(entry) = self.entries.get(&key) {
            return entry.clone();
        }
        self.builds += 1;
        let entry = match build_label(icon, color, self.size) {
            Ok(texture) => Some(Rc::new(texture)),
            Err(e) => {
                log::warn!("label '{}' not rasterised: {e}", key.icon);
                None
            }
        };
        self.entries.insert(key, entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rasterisations performed so far (cache misses).
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Drops every cached label; returns how many entries were held.
    pub fn dispose(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{SvgIcon, ViewBox};
    use crate::icons;

    fn square_icon() -> SvgIcon {
        SvgIcon::new(
            "square",
            ViewBox::square(24.0),
            vec!["M0 0h24v24H0z".into()],
        )
    }

    #[test]
    fn full_square_icon_fills_the_inset_region() {
        let tex = build_label(&square_icon(), Rgba::WHITE, 256).unwrap();
        let img = tex.image();
        assert_eq!(img.dimensions(), (256, 256));
        // 17.5% inset is 44.8 px; 65% icon edge is 166.4 px
        assert_eq!(img.get_pixel(128, 128).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(50, 50).0[3], 255);
        assert_eq!(img.get_pixel(40, 128).0[3], 0);
        assert_eq!(img.get_pixel(215, 128).0[3], 0);
        assert_eq!(img.get_pixel(5, 5).0[3], 0);
    }

    #[test]
    fn wide_view_box_is_centred_vertically() {
        let icon = SvgIcon::new(
            "wide",
            ViewBox {
                min: Vec2::ZERO,
                size: Vec2::new(48.0, 24.0),
            },
            vec!["M0 0h48v24H0z".into()],
        );
        let tex = build_label(&icon, Rgba::WHITE, 100).unwrap();
        // icon square is 17.5..82.5, the half-height band is 33.75..66.25
        assert_eq!(tex.image().get_pixel(50, 50).0[3], 255);
        assert_eq!(tex.image().get_pixel(50, 25).0[3], 0);
        assert_eq!(tex.image().get_pixel(50, 75).0[3], 0);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert_eq!(
            build_label(&square_icon(), Rgba::WHITE, 0).unwrap_err(),
            FolioError::InvalidTextureSize(0)
        );
        assert!(build_label(&square_icon(), Rgba::WHITE, 5000).is_err());
    }

    #[test]
    fn builtin_icons_produce_visible_pixels() {
        let icon = icons::builtin("react").unwrap();
        let tex = build_label(&icon, Rgba::WHITE, 64).unwrap();
        assert!(tex.as_bytes().chunks(4).any(|px| px[3] > 0));
    }

    #[test]
    fn cache_builds_once_per_icon_and_color() {
        let mut cache = LabelCache::new(32);
        let icon = square_icon();
        let a = cache.get_or_build(&icon, Rgba::WHITE).unwrap();
        let b = cache.get_or_build(&icon, Rgba::WHITE).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.builds(), 1);
        cache.get_or_build(&icon, Rgba::BLACK).unwrap();
        assert_eq!(cache.builds(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_cached_as_absent() {
        let mut cache = LabelCache::new(32);
        let bad = SvgIcon::new("bad", ViewBox::square(24.0), vec!["M0 0 Q".into()]);
        assert!(cache.get_or_build(&bad, Rgba::WHITE).is_none());
        assert!(cache.get_or_build(&bad, Rgba::WHITE).is_none());
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn dispose_releases_everything() {
        let mut cache = LabelCache::new(16);
        cache.get_or_build(&square_icon(), Rgba::WHITE);
        assert_eq!(cache.dispose(), 1);
        assert!(cache.is_empty());
    }
}
