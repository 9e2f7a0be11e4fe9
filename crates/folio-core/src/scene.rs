//! Declarative description of the skills keyboard scene.
//!
//! The core never talks to a GPU: each frame it emits a [`Scene`] (camera,
//! lights, box meshes, point sprites, post passes) and the front end's renderer turns it
//! into draw calls. The only per-frame inputs taken from the keyboard model
//! are each keycap's [`KeycapParams`](crate::keycap::KeycapParams) and bob.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::PI;

use crate::color::Rgba;
use crate::keyboard::{Keyboard, Keycap};
use crate::keycap::KeycapMode;
use crate::points::PointSprite;

const BACKGROUND: Rgba = Rgba::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0);
const CASE_ORIGIN: Vec3 = Vec3::new(2.2, -0.55, -0.5);
const HOUSING_OFFSET_Y: f32 = -0.45;
const LABEL_DECAL_SCALE: f32 = 0.58;

fn hex(rgb: u32) -> Rgba {
    Rgba::rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Perspective camera looking at a target.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect.max(1e-3), self.znear, self.zfar)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray through a point in normalised device coordinates
    /// (x right, y up, both in [-1, 1]).
    pub fn ray(&self, ndc: Vec2, aspect: f32) -> (Vec3, Vec3) {
        let inv = self.view_proj(aspect).inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        (self.eye, (far - self.eye).normalize_or_zero())
    }
}

/// Orbit controller around a fixed target: drag to rotate, wheel to zoom,
/// no panning. Distance and polar angle are clamped.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle from the +Y axis.
    pub polar: f32,
    /// Rotation around +Y, measured from +Z toward +X.
    pub azimuth: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub fovy_radians: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(Vec3::new(6.0, 5.0, 6.0), Vec3::new(2.2, 0.0, 0.0))
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length();
        let mut cam = Self {
            target,
            distance,
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
            min_distance: 8.0,
            max_distance: 15.0,
            min_polar: PI / 6.0,
            max_polar: PI / 2.2,
            fovy_radians: 50f32.to_radians(),
        };
        cam.clamp();
        cam
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.polar = self.polar.clamp(self.min_polar, self.max_polar);
    }

    /// Rotates by a drag delta in radians.
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth -= d_azimuth;
        self.polar -= d_polar;
        self.clamp();
    }

    /// Multiplies the distance by `factor` (> 1 zooms out).
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance *= factor;
            self.clamp();
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    pub fn camera(&self) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            fovy_radians: self.fovy_radians,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Rgba,
    pub emissive: Rgba,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    /// False for emissive strips and LEDs that should bloom past white.
    pub tone_mapped: bool,
}

impl Material {
    pub fn standard(color: Rgba, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            emissive: Rgba::BLACK,
            emissive_intensity: 0.0,
            roughness,
            metalness,
            opacity: 1.0,
            tone_mapped: true,
        }
    }

    pub fn glowing(mut self, emissive: Rgba, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn untonemapped(mut self) -> Self {
        self.tone_mapped = false;
        self
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Label decal on a mesh's top face.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRef {
    pub icon: &'static str,
    pub color: Rgba,
    /// Decal edge as a fraction of the face edge.
    pub scale: f32,
}

/// Axis-aligned box mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshInstance {
    pub center: Vec3,
    pub size: Vec3,
    pub corner_radius: f32,
    pub material: Material,
    pub label: Option<LabelRef>,
}

impl MeshInstance {
    pub fn cuboid(center: Vec3, size: Vec3, material: Material) -> Self {
        Self {
            center,
            size,
            corner_radius: 0.0,
            material,
            label: None,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size, glam::Quat::IDENTITY, self.center)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient {
        intensity: f32,
    },
    Spot {
        position: Vec3,
        target: Vec3,
        angle: f32,
        penumbra: f32,
        intensity: f32,
    },
    Point {
        position: Vec3,
        color: Rgba,
        intensity: f32,
        /// Zero means unlimited range.
        distance: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PostPass {
    Bloom {
        intensity: f32,
        threshold: f32,
        smoothing: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Rgba,
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub background: Rgba,
    pub fog: Option<Fog>,
    pub lights: Vec<Light>,
    pub meshes: Vec<MeshInstance>,
    /// Additive camera-facing sprites, drawn after the meshes.
    pub points: Vec<PointSprite>,
    pub post: Vec<PostPass>,
}

impl Scene {
    pub fn ambient_intensity(&self) -> f32 {
        self.lights
            .iter()
            .map(|l| match l {
                Light::Ambient { intensity } => *intensity,
                _ => 0.0,
            })
            .sum()
    }

    pub fn bloom(&self) -> Option<(f32, f32)> {
        self.post.iter().find_map(|p| match *p {
            PostPass::Bloom {
                intensity,
                threshold,
                ..
            } => Some((intensity, threshold)),
        })
    }
}

fn studio_lights() -> Vec<Light> {
    vec![
        Light::Ambient { intensity: 1.2 },
        Light::Spot {
            position: Vec3::new(5.0, 8.0, 5.0),
            target: Vec3::ZERO,
            angle: 0.5,
            penumbra: 0.5,
            intensity: 150.0,
        },
        Light::Point {
            position: Vec3::new(-5.0, 5.0, -5.0),
            color: hex(0x3b82f6),
            intensity: 50.0,
            distance: 0.0,
        },
        Light::Point {
            position: Vec3::new(0.0, 2.0, -8.0),
            color: hex(0x8b5cf6),
            intensity: 50.0,
            distance: 0.0,
        },
        Light::Point {
            position: Vec3::new(2.0, 3.0, 8.0),
            color: Rgba::WHITE,
            intensity: 40.0,
            distance: 0.0,
        },
    ]
}

fn push_case(meshes: &mut Vec<MeshInstance>, lights: &mut Vec<Light>) {
    let glass = Material::standard(hex(0x1a1a2e), 0.1, 0.3).translucent(0.15);
    meshes.push(MeshInstance::cuboid(
        CASE_ORIGIN,
        Vec3::new(6.2, 0.25, 3.8),
        glass,
    ));
    let strips = [
        (Vec3::new(0.0, 0.1, 1.85), Vec3::new(5.8, 0.02, 0.05), 0x3b82f6, 1.5),
        (Vec3::new(-3.05, 0.1, 0.0), Vec3::new(0.05, 0.02, 3.6), 0x8b5cf6, 1.2),
        (Vec3::new(3.05, 0.1, 0.0), Vec3::new(0.05, 0.02, 3.6), 0x06b6d4, 1.2),
    ];
    for (offset, size, rgb, intensity) in strips {
        let c = hex(rgb);
        meshes.push(MeshInstance::cuboid(
            CASE_ORIGIN + offset,
            size,
            Material::standard(c, 0.5, 0.0)
                .glowing(c, intensity)
                .untonemapped(),
        ));
    }
    lights.push(Light::Point {
        position: CASE_ORIGIN + Vec3::new(0.0, -0.3, 0.0),
        color: hex(0x3b82f6),
        intensity: 10.0,
        distance: 2.5,
    });
}

fn push_keycap(meshes: &mut Vec<MeshInstance>, lights: &mut Vec<Light>, key: &Keycap) {
    let skill = &key.skill;
    let p = key.params();
    let origin = key.origin();
    let color = skill.keycap_color();

    // housing stays put
    let housing = origin + Vec3::Y * HOUSING_OFFSET_Y;
    meshes.push(MeshInstance::cuboid(
        housing,
        Vec3::new(0.85, 0.22, 0.85),
        Material::standard(hex(0x2a2a2a), 0.3, 0.2),
    ));
    meshes.push(MeshInstance::cuboid(
        housing + Vec3::Y * 0.12,
        Vec3::new(0.78, 0.04, 0.78),
        Material::standard(hex(0x3a3a3a), 0.4, 0.1),
    ));
    meshes.push(MeshInstance::cuboid(
        housing + Vec3::Y * 0.08,
        Vec3::new(0.5, 0.02, 0.5),
        Material::standard(color, 0.5, 0.0)
            .glowing(color, p.glow_intensity * 0.8)
            .untonemapped(),
    ));

    // stem and keycap travel together
    let moving = origin + Vec3::Y * p.vertical_offset;
    meshes.push(MeshInstance::cuboid(
        moving + Vec3::Y * -0.2,
        Vec3::new(0.4, 0.16, 0.4),
        Material::standard(skill.stem_color(), 0.5, 0.1),
    ));
    let cross = moving + Vec3::Y * -0.08;
    for size in [Vec3::new(0.05, 0.08, 0.22), Vec3::new(0.22, 0.08, 0.05)] {
        meshes.push(MeshInstance::cuboid(
            cross,
            size,
            Material::standard(color, 0.4, 0.0),
        ));
    }

    let s = p.scale;
    meshes.push(MeshInstance {
        center: moving + Vec3::Y * (0.15 * s),
        size: Vec3::new(0.88, 0.28, 0.88) * s,
        corner_radius: 0.06 * s,
        material: Material::standard(color, 0.35, 0.1).glowing(color, p.emissive_intensity),
        label: None,
    });
    meshes.push(MeshInstance {
        center: moving + Vec3::Y * (0.28 * s),
        size: Vec3::new(0.72, 0.03, 0.72) * s,
        corner_radius: 0.03 * s,
        material: Material::standard(skill.top_color(), 0.25, 0.15)
            .glowing(color, p.emissive_intensity),
        label: Some(LabelRef {
            icon: skill.icon,
            color: skill.icon_color(),
            scale: LABEL_DECAL_SCALE / 0.72,
        }),
    });

    let mode = key.mode();
    if mode != KeycapMode::Idle {
        lights.push(Light::Point {
            position: origin + Vec3::Y * -0.3,
            color,
            intensity: if mode == KeycapMode::Pressed { 1.5 } else { 0.8 },
            distance: 0.8,
        });
    }
}

/// Builds this frame's scene from the keyboard model.
pub fn describe_keyboard(keyboard: &Keyboard, camera: &OrbitCamera) -> Scene {
    let mut meshes = Vec::with_capacity(4 + keyboard.keys().len() * 8);
    let mut lights = studio_lights();
    push_case(&mut meshes, &mut lights);
    for key in keyboard.keys() {
        push_keycap(&mut meshes, &mut lights, key);
    }
    Scene {
        camera: camera.camera(),
        background: BACKGROUND,
        fog: Some(Fog {
            color: BACKGROUND,
            near: 10.0,
            far: 25.0,
        }),
        lights,
        meshes,
        points: keyboard.floating_points().sprites().collect(),
        post: vec![PostPass::Bloom {
            intensity: 1.2,
            threshold: 0.3,
            smoothing: 0.7,
        }],
    }
}

/// Per-instance record uploaded to the GPU for the box pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuInstance {
    pub model: [[f32; 4]; 4],
    /// Linear base color, alpha = opacity.
    pub color: [f32; 4],
    /// Linear emissive color premultiplied by intensity; w = 1 when tone mapped.
    pub emissive: [f32; 4],
    /// x = label atlas slot (-1 for none), y = label scale, z = roughness, w = metalness.
    pub params: [f32; 4],
}

impl GpuInstance {
    pub fn from_mesh(mesh: &MeshInstance, label_slot: Option<u32>) -> Self {
        let m = &mesh.material;
        let [r, g, b, _] = m.color.to_linear();
        let [er, eg, eb, _] = m.emissive.to_linear();
        let k = m.emissive_intensity;
        Self {
            model: mesh.model_matrix().to_cols_array_2d(),
            color: [r, g, b, m.opacity],
            emissive: [er * k, eg * k, eb * k, if m.tone_mapped { 1.0 } else { 0.0 }],
            params: [
                label_slot.map_or(-1.0, |s| s as f32),
                mesh.label.as_ref().map_or(0.0, |l| l.scale),
                m.roughness,
                m.metalness,
            ],
        }
    }
}

/// Per-instance record for the additive point sprite pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuPoint {
    /// xyz world position, w = sprite edge.
    pub position: [f32; 4],
    /// Linear color, alpha = opacity.
    pub color: [f32; 4],
}

impl GpuPoint {
    pub fn from_sprite(sprite: &PointSprite) -> Self {
        let p = sprite.position;
        let [r, g, b, _] = sprite.color.to_linear();
        Self {
            position: [p.x, p.y, p.z, sprite.size],
            color: [r, g, b, sprite.opacity],
        }
    }
}

/// Point light record for the GPU light buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuLight {
    /// xyz position, w = range (0 = unlimited).
    pub position: [f32; 4],
    /// Linear color premultiplied by intensity.
    pub color: [f32; 4],
}

/// Flattens spot and point lights into GPU records; ambient is returned separately.
pub fn gpu_lights(scene: &Scene, max: usize) -> Vec<GpuLight> {
    scene
        .lights
        .iter()
        .filter_map(|l| match *l {
            Light::Ambient { .. } => None,
            Light::Spot {
                position,
                intensity,
                ..
            } => Some(GpuLight {
                position: [position.x, position.y, position.z, 0.0],
                color: [intensity; 4],
            }),
            Light::Point {
                position,
                color,
                intensity,
                distance,
            } => {
                let [r, g, b, _] = color.to_linear();
                Some(GpuLight {
                    position: [position.x, position.y, position.z, distance],
                    color: [r * intensity, g * intensity, b * intensity, intensity],
                })
            }
        })
        .take(max)
        .collect()
}
