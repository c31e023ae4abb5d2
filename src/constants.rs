// Front-end tuning constants: camera placement, background and UI ranges.

// Camera (starts at (0, CAMERA_HEIGHT, CAMERA_DISTANCE) looking at the origin)
pub const CAMERA_DISTANCE: f32 = 12.0;
pub const CAMERA_HEIGHT: f32 = 5.0;
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Seconds per full orbit at rotation speed 1.0
pub const ORBIT_PERIOD_SEC: f32 = 30.0;

// Background
pub const CLEAR_COLOR: [f64; 3] = [0.02, 0.02, 0.02];

// Settings panel ranges
pub const ROTATION_SPEED_RANGE: (f32, f32) = (0.0, 5.0);
pub const BLOOM_STRENGTH_RANGE: (f32, f32) = (0.0, 3.0);
pub const CANDLE_COUNT_MAX: u32 = crate::core::constants::MAX_CANDLES;
