// Shared tuning constants for the animation layer, used by both the web and
// native front-ends.

// Particle pool
pub const PARTICLE_COUNT: usize = 60; // pool size with full motion
pub const REDUCED_PARTICLE_COUNT: usize = 30; // pool size when the user prefers reduced motion

// Particle field motion (logical px per frame unless noted)
pub const PHASE_STEP: f32 = 0.01; // global phase clock advance per frame
pub const FLOAT_AMPLITUDE: f32 = 0.2; // ambient circular float radius
pub const DRIFT_MAX: f32 = 0.15; // |vx|, |vy| upper bound for the fixed drift
pub const WRAP_MARGIN: f32 = 50.0; // how far past an edge before a particle re-enters opposite
pub const INFLUENCE_RADIUS: f32 = 150.0; // pointer attraction radius
pub const ATTRACTION_GAIN: f32 = 0.02; // peak per-frame nudge as a fraction of the influence radius
pub const PULSE_AMPLITUDE: f32 = 0.3; // relative radius oscillation
pub const PULSE_RATE: f32 = 2.0; // pulse runs at twice the phase clock

// Particle appearance
pub const BASE_RADIUS_MIN: f32 = 1.0;
pub const BASE_RADIUS_SPAN: f32 = 2.0; // base radius in [1, 3)
pub const OPACITY_MIN: f32 = 0.2;
pub const OPACITY_SPAN: f32 = 0.6; // opacity in [0.2, 0.8)
pub const GLOW_SCALE: f32 = 3.0; // glow disc radius relative to the particle radius
pub const CORE_OPACITY_BOOST: f32 = 0.2; // core is drawn slightly more opaque than the glow

// Proximity graph
pub const CONNECTION_DISTANCE: f32 = 180.0; // max distance for an edge
pub const EDGE_MAX_OPACITY: f32 = 0.4; // opacity of an edge of zero length
pub const EDGE_WIDTH: f32 = 1.0;

// Pointer glow drawn under the field
pub const POINTER_GLOW_RADIUS: f32 = 200.0;

// Keycap springs: tension/mass follow the tactile press feel, damping is critical
pub const KEYCAP_STIFFNESS: f32 = 600.0;
pub const KEYCAP_MASS: f32 = 0.3;
pub const CLICK_RELEASE_SEC: f32 = 0.15; // synthetic click press duration

// Keycap float animation
pub const KEYCAP_FLOAT_AMPLITUDE: f32 = 0.015;
pub const KEYCAP_FLOAT_RATE: f32 = 1.5;

// Spring integrator
pub const SPRING_MAX_SUBSTEP_SEC: f32 = 1.0 / 240.0; // integrate in steps no longer than this
pub const SPRING_MAX_FRAME_SEC: f32 = 0.1; // clamp huge frame gaps (tab switches)
pub const SPRING_REST_EPSILON: f32 = 1e-4;

// Snow overlay
pub const SNOWFLAKE_COUNT: usize = 100;
pub const SNOW_RESPAWN_Y: f32 = -10.0;
pub const SNOW_SPARKLE_CHANCE: f64 = 0.02; // per flake, per frame, for flakes with radius > 2

// Custom cursor springs
pub const CURSOR_DOT_STIFFNESS: f32 = 500.0;
pub const CURSOR_DOT_DAMPING: f32 = 28.0;
pub const CURSOR_DOT_MASS: f32 = 0.5;
pub const CURSOR_RING_STIFFNESS: f32 = 150.0;
pub const CURSOR_RING_DAMPING: f32 = 30.0;
pub const CURSOR_RING_MASS: f32 = 1.0;
pub const CURSOR_RING_SIZE: f32 = 40.0; // follower diameter (px)
pub const CURSOR_RING_SIZE_INTERACTIVE: f32 = 60.0; // follower diameter over links/buttons

// Label textures
pub const LABEL_TEXTURE_SIZE: u32 = 256;
pub const LABEL_ICON_FRACTION: f32 = 0.65; // icon edge relative to the texture edge
pub const LABEL_INSET_FRACTION: f32 = 0.175; // margin on each side

// Floating points drifting around the keyboard (per 60 Hz frame unless noted)
pub const FLOATING_POINT_COUNT: usize = 20;
pub const FLOATING_POINT_SEED: u64 = 0x5eed_f1a7;
pub const FLOATING_POINT_BOB: f32 = 0.001; // y drift amplitude
pub const FLOATING_POINT_SPIN: f32 = 0.0005; // cloud rotation around +Y (rad)
pub const FLOATING_POINT_SIZE: f32 = 0.05; // sprite edge in world units
pub const FLOATING_POINT_OPACITY: f32 = 0.6;
pub const REFERENCE_FRAME_RATE: f32 = 60.0; // per-frame rates above are tuned at this rate
