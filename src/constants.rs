// DOM hooks and front-end tuning. Simulation constants live in
// `folio_core::constants`.

// Element ids
pub const PARTICLE_CANVAS_ID: &str = "particle-canvas";
pub const SNOW_CANVAS_ID: &str = "snow-canvas";
pub const KEYBOARD_CANVAS_ID: &str = "keyboard-canvas";
pub const CURSOR_DOT_ID: &str = "cursor-dot";
pub const CURSOR_FOLLOWER_ID: &str = "cursor-follower";

// Reduced motion media query
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Elements the custom cursor treats as interactive
pub const INTERACTIVE_SELECTOR: &str =
    "a, button, [role='button'], [data-cursor-hover], input, textarea, select";

// Orbit controls
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005; // drag sensitivity
pub const ORBIT_WHEEL_ZOOM_PER_PX: f32 = 0.001; // wheel delta to distance factor
pub const CLICK_SLOP_PX: f32 = 4.0; // drags shorter than this still count as clicks

// Label atlas: one cell per skill
pub const ATLAS_COLS: u32 = 4;
pub const ATLAS_ROWS: u32 = 4;
pub const ATLAS_CELL_PX: u32 = folio_core::constants::LABEL_TEXTURE_SIZE;

// GPU
pub const MAX_GPU_LIGHTS: usize = 24; // must match MAX_LIGHTS in scene.wgsl
pub const BLOOM_BLUR_PASSES: usize = 2; // horizontal + vertical pairs
