// Host-side tests for label atlas packing.

#![allow(dead_code)]
#[path = "../src/atlas.rs"]
mod atlas;

use atlas::*;
use folio_core::icon::{SvgIcon, ViewBox};
use folio_core::icons;
use folio_core::scene::{GpuInstance, LabelRef, Material, MeshInstance};
use folio_core::texture::{build_label, LabelCache};
use folio_core::{Rgba, Skill, SKILLS};
use glam::Vec3;

const CELL: u32 = 32;

fn layout() -> AtlasLayout {
    AtlasLayout {
        cols: 4,
        rows: 4,
        cell: CELL,
    }
}

#[test]
fn slots_fill_rows_left_to_right() {
    let l = layout();
    assert_eq!(l.size(), (128, 128));
    assert_eq!(l.slot_origin(0), Some((0, 0)));
    assert_eq!(l.slot_origin(3), Some((96, 0)));
    assert_eq!(l.slot_origin(4), Some((0, 32)));
    assert_eq!(l.slot_origin(15), Some((96, 96)));
    assert_eq!(l.slot_origin(16), None);
}

#[test]
fn every_skill_gets_a_distinct_slot() {
    let mut cache = LabelCache::new(CELL);
    let atlas = LabelAtlas::build(&SKILLS, &mut cache, layout());
    assert_eq!(atlas.len(), SKILLS.len());
    let mut slots: Vec<u32> = SKILLS.iter().filter_map(|s| atlas.slot(s.icon)).collect();
    slots.sort_unstable();
    slots.dedup();
    assert_eq!(slots.len(), SKILLS.len());
    assert_eq!(cache.builds(), SKILLS.len());
}

#[test]
fn blit_copies_into_the_right_cell() {
    let square = SvgIcon::new("square", ViewBox::square(24.0), vec!["M0 0H24V24H0Z".to_string()]);
    let label = build_label(&square, Rgba::WHITE, CELL).unwrap();
    let l = layout();
    let (w, h) = l.size();
    let mut pixels = vec![0u8; (w * h * 4) as usize];
    assert!(blit_label(&mut pixels, &l, 5, &label));

    // slot 5 is column 1, row 1; its centre carries the icon
    let (cx, cy) = (CELL + CELL / 2, CELL + CELL / 2);
    let alpha = pixels[((cy * w + cx) * 4 + 3) as usize];
    assert!(alpha > 0);
    // slot 0 stays empty
    let alpha0 = pixels[(((CELL / 2) * w + CELL / 2) * 4 + 3) as usize];
    assert_eq!(alpha0, 0);
}

#[test]
fn blit_rejects_wrong_size_and_full_atlas() {
    let square = SvgIcon::new("square", ViewBox::square(24.0), vec!["M0 0H24V24H0Z".to_string()]);
    let big = build_label(&square, Rgba::WHITE, CELL * 2).unwrap();
    let small = build_label(&square, Rgba::WHITE, CELL).unwrap();
    let l = layout();
    let (w, h) = l.size();
    let mut pixels = vec![0u8; (w * h * 4) as usize];
    assert!(!blit_label(&mut pixels, &l, 0, &big));
    assert!(!blit_label(&mut pixels, &l, 16, &small));
    assert!(pixels.iter().all(|&b| b == 0));
}

/// Skills with one icon that fails to parse and one that draws nothing.
fn skills_with_bad_icons() -> [Skill; 16] {
    let mut skills = SKILLS;
    skills[2].icon = "broken";
    skills[5].icon = "blank";
    skills
}

fn resolve(name: &str) -> Option<SvgIcon> {
    match name {
        "broken" => Some(SvgIcon::new(name, ViewBox::square(24.0), vec!["M0 0 Q".into()])),
        "blank" => Some(SvgIcon::new(name, ViewBox::square(24.0), vec!["M4 4".into()])),
        _ => icons::builtin(name),
    }
}

#[test]
fn unknown_icon_gets_no_slot() {
    let mut skills = SKILLS;
    skills[0].icon = "no-such-icon";
    let mut cache = LabelCache::new(CELL);
    let atlas = LabelAtlas::build(&skills, &mut cache, layout());
    assert_eq!(atlas.slot("no-such-icon"), None);
    assert_eq!(atlas.len(), SKILLS.len() - 1);
}

#[test]
fn unrasterisable_labels_are_skipped_and_built_once() {
    let skills = skills_with_bad_icons();
    let mut cache = LabelCache::new(CELL);
    let atlas = LabelAtlas::build_with(&skills, &mut cache, layout(), resolve);
    assert_eq!(atlas.slot("broken"), None);
    assert_eq!(atlas.slot("blank"), None);
    assert_eq!(atlas.len(), SKILLS.len() - 2);
    // every icon, good or bad, was rasterised exactly once
    assert_eq!(cache.builds(), SKILLS.len());

    // a rebuild through the same cache hits the cached failures
    let again = LabelAtlas::build_with(&skills, &mut cache, layout(), resolve);
    assert_eq!(cache.builds(), SKILLS.len());
    assert_eq!(again.len(), atlas.len());
}

#[test]
fn keycap_without_a_label_renders_without_a_slot() {
    let skills = skills_with_bad_icons();
    let mut cache = LabelCache::new(CELL);
    let atlas = LabelAtlas::build_with(&skills, &mut cache, layout(), resolve);
    let mut top = MeshInstance::cuboid(Vec3::ZERO, Vec3::ONE, Material::standard(Rgba::WHITE, 0.3, 0.1));
    top.label = Some(LabelRef {
        icon: "broken",
        color: Rgba::WHITE,
        scale: 0.8,
    });
    let slot = top.label.as_ref().and_then(|l| atlas.slot(l.icon));
    let gpu = GpuInstance::from_mesh(&top, slot);
    assert_eq!(gpu.params[0], -1.0);
    assert_eq!(gpu.color[3], 1.0);
}

#[test]
fn taking_pixels_keeps_the_slot_table() {
    let mut cache = LabelCache::new(CELL);
    let mut atlas = LabelAtlas::build(&SKILLS, &mut cache, layout());
    let (w, h) = layout().size();
    let pixels = atlas.take_pixels();
    assert_eq!(pixels.len(), (w * h * 4) as usize);
    assert!(atlas.pixels().is_empty());
    assert_eq!(atlas.slot(SKILLS[0].icon), Some(0));
}
