pub mod color;
pub mod constants;
pub mod melody;
pub mod params;
pub mod scene;
pub mod sequencer;
pub mod shader_feed;
pub mod timers;

pub use color::*;
pub use melody::*;
pub use params::*;
pub use scene::*;
pub use sequencer::*;
pub use shader_feed::*;
pub use timers::*;

// Shaders bundled as string constants
pub static CAKE_WGSL: &str = include_str!("../../shaders/cake.wgsl");
