/// Web front-end tuning constants.
///
/// Kept free of web-sys types so the host-side tests can include this file.
// DOM hooks
pub const CANVAS_ID: &str = "backdrop-canvas";
pub const DATA_PRESET: &str = "preset"; // data-preset on the canvas
pub const DATA_PALETTE: &str = "palette"; // data-palette, three comma-separated hex colors

// Accessibility
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Pointer sampling
pub const POINTER_THROTTLE_MS: f64 = 10.0; // at most one pointer sample per interval

// Backing store sizing
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0; // caps work on very dense screens
pub const MAX_BACKING_DIMENSION: u32 = 4096; // per axis, after scaling

// Frame timing
pub const MAX_FRAME_DELTA_SEC: f32 = 0.25; // longer gaps (hidden tab) do not jump the clock
