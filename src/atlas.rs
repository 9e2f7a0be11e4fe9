//! Label atlas: every keycap label rasterised once and packed into one
//! RGBA8 texture so the box pipeline needs a single bind group.

use fnv::FnvHashMap;
use folio_core::icon::SvgIcon;
use folio_core::icons;
use folio_core::keyboard::Skill;
use folio_core::texture::{LabelCache, LabelTexture};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    pub cols: u32,
    pub rows: u32,
    pub cell: u32,
}

impl AtlasLayout {
    pub fn size(&self) -> (u32, u32) {
        (self.cols * self.cell, self.rows * self.cell)
    }

    pub fn capacity(&self) -> u32 {
        self.cols * self.rows
    }

    /// Top-left pixel of `slot`, if the atlas has room for it.
    pub fn slot_origin(&self, slot: u32) -> Option<(u32, u32)> {
        (slot < self.capacity()).then(|| ((slot % self.cols) * self.cell, (slot / self.cols) * self.cell))
    }
}

/// Copies a label into its atlas cell. Labels of another size are skipped.
pub fn blit_label(pixels: &mut [u8], layout: &AtlasLayout, slot: u32, label: &LabelTexture) -> bool {
    let Some((x0, y0)) = layout.slot_origin(slot) else {
        return false;
    };
    if label.size() != layout.cell {
        return false;
    }
    let (atlas_w, _) = layout.size();
    let row_bytes = (layout.cell * 4) as usize;
    for (row, src) in label.as_bytes().chunks_exact(row_bytes).enumerate() {
        let start = (((y0 as usize + row) * atlas_w as usize) + x0 as usize) * 4;
        pixels[start..start + row_bytes].copy_from_slice(src);
    }
    true
}

pub struct LabelAtlas {
    pub layout: AtlasLayout,
    /// Empty once taken for the GPU upload.
    pixels: Vec<u8>,
    slots: FnvHashMap<&'static str, u32>,
}

impl LabelAtlas {
    /// Builds labels for every skill through `cache` and packs them.
    /// Skills whose icon is unknown or fails to rasterise get no slot.
    pub fn build(skills: &[Skill], cache: &mut LabelCache, layout: AtlasLayout) -> Self {
        Self::build_with(skills, cache, layout, icons::builtin)
    }

    /// Like [`LabelAtlas::build`], resolving icon names through `resolve`.
    pub fn build_with(
        skills: &[Skill],
        cache: &mut LabelCache,
        layout: AtlasLayout,
        resolve: impl Fn(&str) -> Option<SvgIcon>,
    ) -> Self {
        let (w, h) = layout.size();
        let mut atlas = Self {
            layout,
            pixels: vec![0; (w * h * 4) as usize],
            slots: FnvHashMap::default(),
        };
        let mut next = 0;
        for skill in skills {
            if atlas.slots.contains_key(skill.icon) {
                continue;
            }
            let Some(icon) = resolve(skill.icon) else {
                log::warn!("no icon named '{}' for {}", skill.icon, skill.name);
                continue;
            };
            let Some(label) = cache.get_or_build(&icon, skill.icon_color()) else {
                continue;
            };
            if blit_label(&mut atlas.pixels, &layout, next, &label) {
                atlas.slots.insert(skill.icon, next);
                next += 1;
            }
        }
        atlas
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Hands the RGBA bytes over for upload; slot lookups keep working.
    pub fn take_pixels(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pixels)
    }

    pub fn slot(&self, icon: &str) -> Option<u32> {
        self.slots.get(icon).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
