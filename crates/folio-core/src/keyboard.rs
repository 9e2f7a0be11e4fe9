//! Skills keyboard: the keycap table and the model that routes input to one
//! [`KeycapController`] per keycap.

use glam::Vec3;

use crate::color::Rgba;
use crate::constants::*;
use crate::keycap::{KeycapController, KeycapMode, KeycapParams};
use crate::points::FloatingPoints;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Skill {
    pub name: &'static str,
    /// Built-in icon name, see [`crate::icons::builtin`].
    pub icon: &'static str,
    pub color: [u8; 3],
    pub icon_color: [u8; 3],
    pub trigger: char,
    pub position: [f32; 3],
}

impl Skill {
    pub fn keycap_color(&self) -> Rgba {
        let [r, g, b] = self.color;
        Rgba::rgb8(r, g, b)
    }

    pub fn icon_color(&self) -> Rgba {
        let [r, g, b] = self.icon_color;
        Rgba::rgb8(r, g, b)
    }

    /// Top surface: keycap color lightened 15%.
    pub fn top_color(&self) -> Rgba {
        self.keycap_color().lighten(15.0)
    }

    /// Keycap sides: darkened 10%.
    pub fn side_color(&self) -> Rgba {
        self.keycap_color().darken(10.0)
    }

    /// Switch stem: darkened 5%.
    pub fn stem_color(&self) -> Rgba {
        self.keycap_color().darken(5.0)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

const WHITE: [u8; 3] = [0xff, 0xff, 0xff];

const fn skill(
    name: &'static str,
    icon: &'static str,
    color: u32,
    icon_color: [u8; 3],
    trigger: char,
    position: [f32; 3],
) -> Skill {
    Skill {
        name,
        icon,
        color: [(color >> 16) as u8, (color >> 8) as u8, color as u8],
        icon_color,
        trigger,
        position,
    }
}

/// Four staggered rows: frontend, backend, databases, tools.
pub const SKILLS: [Skill; 16] = [
    skill("React", "react", 0x61DAFB, WHITE, 'r', [0.0, 0.0, 1.0]),
    skill("Next.js", "nextjs", 0x000000, WHITE, 'n', [1.1, 0.0, 1.0]),
    skill("TypeScript", "typescript", 0x3178C6, WHITE, 't', [2.2, 0.0, 1.0]),
    skill("JavaScript", "javascript", 0xF7DF1E, [0, 0, 0], 'j', [3.3, 0.0, 1.0]),
    skill("Tailwind", "tailwind", 0x38BDF8, WHITE, 'w', [4.4, 0.0, 1.0]),
    skill("Node.js", "nodejs", 0x68A063, WHITE, 'o', [0.0, 0.0, 0.0]),
    skill("Python", "python", 0x3776AB, [0xFF, 0xD4, 0x3B], 'p', [1.1, 0.0, 0.0]),
    skill("Java", "java", 0xED8B00, WHITE, 'a', [2.2, 0.0, 0.0]),
    skill("Express", "express", 0x000000, WHITE, 'e', [3.3, 0.0, 0.0]),
    skill("Spring", "spring", 0x6DB33F, WHITE, 's', [4.4, 0.0, 0.0]),
    skill("MongoDB", "mongodb", 0x47A248, WHITE, 'm', [0.55, 0.0, -1.0]),
    skill("PostgreSQL", "postgresql", 0x336791, WHITE, 'q', [1.65, 0.0, -1.0]),
    skill("MySQL", "mysql", 0x00758F, [0xF2, 0x91, 0x11], 'y', [2.75, 0.0, -1.0]),
    skill("Git", "git", 0xF05032, WHITE, 'g', [3.85, 0.0, -1.0]),
    skill("Docker", "docker", 0x2496ED, WHITE, 'd', [1.1, 0.0, -2.0]),
    skill("Figma", "figma", 0xF24E1E, WHITE, 'f', [2.2, 0.0, -2.0]),
];

// Keycap body box relative to the keycap origin, used for pointer picking.
const PICK_HALF_EXTENT: Vec3 = Vec3::new(0.44, 0.15, 0.44);
const PICK_CENTER_Y: f32 = 0.15;

/// Slab test; returns the entry distance along `dir` if the ray hits the box.
pub fn ray_aabb(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = dir.recip();
    let t0 = (min - origin) * inv;
    let t1 = (max - origin) * inv;
    let t_near = t0.min(t1).max_element();
    let t_far = t0.max(t1).min_element();
    if t_near.is_nan() || t_far.is_nan() || t_far < t_near.max(0.0) {
        return None;
    }
    Some(t_near.max(0.0))
}

#[derive(Clone, Debug)]
pub struct Keycap {
    pub skill: Skill,
    pub controller: KeycapController,
    /// Current bob offset; frozen while the key is held down.
    float_y: f32,
}

impl Keycap {
    pub fn new(skill: Skill) -> Self {
        Self {
            controller: KeycapController::new(skill.trigger),
            skill,
            float_y: 0.0,
        }
    }

    pub fn params(&self) -> KeycapParams {
        self.controller.params()
    }

    pub fn mode(&self) -> KeycapMode {
        self.controller.mode()
    }

    pub fn float_offset(&self) -> f32 {
        self.float_y
    }

    /// World-space origin including the bob.
    pub fn origin(&self) -> Vec3 {
        self.skill.position() + Vec3::Y * self.float_y
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        let center = self.origin() + Vec3::Y * PICK_CENTER_Y;
        (center - PICK_HALF_EXTENT, center + PICK_HALF_EXTENT)
    }
}

#[derive(Clone, Debug)]
pub struct Keyboard {
    keys: Vec<Keycap>,
    hovered: Option<usize>,
    elapsed: f32,
    floating: FloatingPoints,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new(&SKILLS)
    }
}

impl Keyboard {
    pub fn new(skills: &[Skill]) -> Self {
        Self {
            keys: skills.iter().copied().map(Keycap::new).collect(),
            hovered: None,
            elapsed: 0.0,
            floating: FloatingPoints::default(),
        }
    }

    pub fn keys(&self) -> &[Keycap] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> Option<&Keycap> {
        self.keys.get(index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn floating_points(&self) -> &FloatingPoints {
        &self.floating
    }

    /// Routes a key-down to every keycap bound to `key`; true if any matched.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.keys
            .iter_mut()
            .fold(false, |hit, k| k.controller.key_down(key) | hit)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.keys
            .iter_mut()
            .fold(false, |hit, k| k.controller.key_up(key) | hit)
    }

    /// Nearest keycap hit by the ray, if any.
    pub fn pick(&self, origin: Vec3, dir: Vec3) -> Option<usize> {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(i, k)| {
                let (min, max) = k.bounds();
                ray_aabb(origin, dir, min, max).map(|t| (i, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Moves hover to whichever keycap the pointer ray hits.
    pub fn hover_ray(&mut self, origin: Vec3, dir: Vec3) -> Option<usize> {
        let hit = self.pick(origin, dir);
        self.set_hovered(hit);
        hit
    }

    pub fn pointer_left(&mut self) {
        self.set_hovered(None);
    }

    /// Clicks the keycap under the ray (press with auto release).
    pub fn click_ray(&mut self, origin: Vec3, dir: Vec3) -> Option<usize> {
        let hit = self.pick(origin, dir)?;
        self.keys[hit].controller.click();
        Some(hit)
    }

    fn set_hovered(&mut self, index: Option<usize>) {
        if self.hovered == index {
            return;
        }
        if let Some(old) = self.hovered.and_then(|i| self.keys.get_mut(i)) {
            old.controller.pointer_leave();
        }
        if let Some(new) = index.and_then(|i| self.keys.get_mut(i)) {
            new.controller.pointer_enter();
        }
        self.hovered = index;
    }

    /// Advances the bob clock, every keycap spring and the floating points.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.floating.advance(dt);
        let t = self.elapsed;
        for k in &mut self.keys {
            k.controller.update(dt);
            if !k.controller.is_pressed() {
                k.float_y = (t * KEYCAP_FLOAT_RATE + k.skill.position[0] * 2.0).sin()
                    * KEYCAP_FLOAT_AMPLITUDE;
            }
        }
    }

    /// True while a hovered or pressed keycap wants the pointer cursor.
    pub fn wants_pointer_cursor(&self) -> bool {
        self.keys.iter().any(|k| k.mode() != KeycapMode::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_unique_triggers() {
        let mut triggers: Vec<char> = SKILLS.iter().map(|s| s.trigger).collect();
        triggers.sort_unstable();
        triggers.dedup();
        assert_eq!(triggers.len(), SKILLS.len());
    }

    #[test]
    fn derived_colors_shift_channels() {
        let react = SKILLS[0];
        assert_eq!(react.top_color().to_hex(), "#87ffff");
        let postgres = SKILLS.iter().find(|s| s.name == "PostgreSQL").unwrap();
        assert_eq!(postgres.stem_color().to_hex(), "#265a84");
        assert_eq!(postgres.side_color().to_hex(), "#194d77");
    }

    #[test]
    fn key_events_reach_the_bound_keycap_only() {
        let mut kb = Keyboard::default();
        assert!(kb.key_down("T"));
        let ts = kb.keys().iter().position(|k| k.skill.name == "TypeScript").unwrap();
        for (i, k) in kb.keys().iter().enumerate() {
            assert_eq!(k.controller.is_pressed(), i == ts);
        }
        assert!(kb.key_up("t"));
        assert!(!kb.keys()[ts].controller.is_pressed());
        assert!(!kb.key_down("z"));
    }

    #[test]
    fn ray_hits_box_from_above() {
        let t = ray_aabb(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::NEG_Y,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert_eq!(t, Some(4.0));
        assert_eq!(
            ray_aabb(
                Vec3::new(3.0, 5.0, 0.0),
                Vec3::NEG_Y,
                Vec3::splat(-1.0),
                Vec3::splat(1.0)
            ),
            None
        );
    }

    #[test]
    fn hover_moves_between_keycaps() {
        let mut kb = Keyboard::default();
        let down = Vec3::NEG_Y;
        let over_react = kb.hover_ray(Vec3::new(0.0, 5.0, 1.0), down);
        assert_eq!(over_react, Some(0));
        assert_eq!(kb.keys()[0].mode(), KeycapMode::Hovered);

        let over_next = kb.hover_ray(Vec3::new(1.1, 5.0, 1.0), down);
        assert_eq!(over_next, Some(1));
        assert_eq!(kb.keys()[0].mode(), KeycapMode::Idle);
        assert_eq!(kb.keys()[1].mode(), KeycapMode::Hovered);

        kb.pointer_left();
        assert!(kb.keys().iter().all(|k| k.mode() == KeycapMode::Idle));
        assert!(!kb.wants_pointer_cursor());
    }

    #[test]
    fn click_presses_then_releases() {
        let mut kb = Keyboard::default();
        let hit = kb.click_ray(Vec3::new(2.2, 5.0, -2.0), Vec3::NEG_Y);
        let figma = SKILLS.iter().position(|s| s.name == "Figma").unwrap();
        assert_eq!(hit, Some(figma));
        assert!(kb.keys()[figma].controller.is_pressed());
        for _ in 0..12 {
            kb.update(1.0 / 60.0);
        }
        assert!(!kb.keys()[figma].controller.is_pressed());
    }

    #[test]
    fn bob_freezes_while_pressed() {
        let mut kb = Keyboard::default();
        kb.update(0.3);
        kb.key_down("r");
        let frozen = kb.keys()[0].float_offset();
        kb.update(0.4);
        assert_eq!(kb.keys()[0].float_offset(), frozen);
        assert_ne!(kb.keys()[1].float_offset(), 0.0);
    }
}
