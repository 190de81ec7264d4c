// Shared tuning constants for the backdrop pipeline. Per-preset values live in
// `preset.rs`; these are the fixed limits and defaults the presets build on.

// Scene limits
pub const MAX_PRIMITIVES: u32 = 16; // upper bound on `sphereCount`
pub const EMPTY_SCENE_DISTANCE: f32 = f32::INFINITY; // distance reported by a field with no primitives

// Ray marching defaults
pub const DEFAULT_MAX_STEPS: u32 = 100;
pub const DEFAULT_SURFACE_EPSILON: f32 = 1.0e-3;
pub const DEFAULT_MAX_DISTANCE: f32 = 100.0;
pub const DEFAULT_STEP_DAMPING: f32 = 1.0;

// Shading
pub const NORMAL_EPSILON: f32 = 1.0e-3; // central-difference offset for normals
pub const DEGENERATE_GRADIENT: f32 = 1.0e-8; // below this the normal falls back to +Y
pub const SHADOW_MAX_STEPS: u32 = 32;
pub const SHADOW_START: f32 = 0.01; // march offset along the shadow ray
pub const SHADOW_BIAS: f32 = 2.0e-3; // push along the normal before marching toward a light
pub const AO_SAMPLES: u32 = 5;
pub const AO_WEIGHT_DECAY: f32 = 0.85;
pub const CONTRAST_PIVOT: f32 = 0.5;

// Camera sway (radians / angular speed)
pub const SWAY_YAW_AMPLITUDE: f32 = 0.1;
pub const SWAY_YAW_SPEED: f32 = 0.1;
pub const SWAY_PITCH_AMPLITUDE: f32 = 0.05;
pub const SWAY_PITCH_SPEED: f32 = 0.08;

// Interaction
pub const POINTER_Z_WOBBLE: f32 = 0.3; // z lift applied near the pointer
pub const PROXIMITY_DISTANCE_GAIN: f32 = 1.2; // pointer distance to movement-scale mapping

// Output
pub const GAMMA: f32 = 2.2;
