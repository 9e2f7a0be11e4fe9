pub mod background;
pub mod color;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod field;
pub mod icon;
pub mod icons;
pub mod keyboard;
pub mod keycap;
pub mod paint;
pub mod particle;
pub mod path;
pub mod pointer;
pub mod points;
pub mod proximity;
pub mod raster;
pub mod scene;
pub mod snow;
pub mod spring;
pub mod texture;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
pub static BLIT_WGSL: &str = include_str!("../shaders/blit.wgsl");
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");

pub use background::{CountingScheduler, FrameScheduler, ParticleBackground};
pub use color::Rgba;
pub use constants::*;
pub use cursor::{CursorConfig, CursorFrame, CursorState};
pub use error::FolioError;
pub use field::{FieldConfig, ParticleField, Viewport};
pub use icon::{IconDescriptor, SvgIcon, ViewBox};
pub use keyboard::{Keyboard, Keycap, Skill, SKILLS};
pub use keycap::{KeycapController, KeycapMode, KeycapParams, PressSource};
pub use paint::{render_field, render_static, GradientStop, Painter, RecordingPainter};
pub use particle::Particle;
pub use pointer::PointerState;
pub use points::{FloatingPoints, PointSprite};
pub use proximity::{edges, Edge};
pub use raster::Pixmap;
pub use scene::{describe_keyboard, Camera, GpuInstance, GpuLight, GpuPoint, OrbitCamera, Scene};
pub use snow::{render_snow, SnowConfig, SnowField};
pub use spring::{Spring, SpringConfig, SpringVec2};
pub use texture::{build_label, LabelCache, LabelTexture};
