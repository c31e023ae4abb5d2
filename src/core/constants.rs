//! Shape and timing constants for the cake scene and its melody.
//!
//! Particle counts are shape constants: they never depend on
//! `SceneParameters`. Only the candle count scales the candle layer.

// Tier 1 (base cylinder)
pub const BASE_RADIUS: f32 = 3.5;
pub const BASE_HEIGHT: f32 = 2.0;
pub const BASE_PARTICLES: usize = 4000;

// Tier 2 (top cylinder), stacked on tier 1
pub const TOP_RADIUS: f32 = 2.0;
pub const TOP_HEIGHT: f32 = 1.5;
pub const TOP_PARTICLES: usize = 2500;
pub const TOP_Y_OFFSET: f32 = BASE_HEIGHT / 2.0 + TOP_HEIGHT / 2.0;

// Fraction of tier samples pinned to the lateral surface
pub const SURFACE_PROBABILITY: f64 = 0.7;
pub const TIER_SCALE_MIN: f32 = 0.5;
pub const TIER_SCALE_MAX: f32 = 1.0;

// Icing ring along the tier seam
pub const ICING_PARTICLES: usize = 500;
pub const ICING_RADIUS_OFFSET: f32 = 0.1;
pub const ICING_RIPPLE_AMPLITUDE: f32 = 0.1;
pub const ICING_RIPPLE_CYCLES: f32 = 20.0; // scallops per revolution
pub const ICING_SCALE: f32 = 2.0;

// Candles, placed on a ring on top of tier 2
pub const CANDLE_RING_RADIUS: f32 = 1.5;
pub const CANDLE_HEIGHT: f32 = 0.8;
pub const CANDLE_BASE_Y: f32 = TOP_Y_OFFSET + TOP_HEIGHT / 2.0;
pub const CANDLE_STICK_PARTICLES: usize = 50;
pub const CANDLE_STICK_SCALE: f32 = 0.8;
pub const MAX_CANDLES: u32 = 24;
pub const CANDLE_STICK_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Flames float just above each stick
pub const FLAME_PARTICLES_PER_CANDLE: usize = 20;
pub const FLAME_GAP: f32 = 0.1;
pub const FLAME_JITTER_XZ: f32 = 0.1; // full width of the horizontal box
pub const FLAME_JITTER_Y: f32 = 0.3;

// Shading
pub const POINT_SIZE_MULTIPLIER: f32 = 40.0;

// Audio scheduling
pub const LEAD_IN_SEC: f64 = 0.1;
pub const LOOP_TAIL_SEC: f64 = 1.0; // silence kept after the last note before looping
pub const ENVELOPE_PEAK: f32 = 0.3;
pub const ENVELOPE_ATTACK_SEC: f64 = 0.05;
pub const ENVELOPE_FLOOR: f32 = 0.001;
