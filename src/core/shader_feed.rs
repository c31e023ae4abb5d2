use super::color::Color;
use super::constants::POINT_SIZE_MULTIPLIER;
use super::params::SceneParameters;
use instant::Instant;

/// Uniform values handed to the particle and flame shading stages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderUniforms {
    pub time: f32,
    pub point_size: f32,
    pub flame_color: [f32; 3],
}

/// Pass-through for per-frame shading parameters.
///
/// `time` counts seconds since the feed was started and only goes back to
/// zero on [`restart`](Self::restart). The flame tint can change at any time
/// without rebuilding geometry; the point size follows each rebuild.
#[derive(Clone, Debug)]
pub struct ShaderParameterFeed {
    started: Instant,
    flame_color: Color,
    point_size: f32,
}

impl ShaderParameterFeed {
    pub fn new(params: &SceneParameters) -> Self {
        Self::starting_at(Instant::now(), params)
    }

    pub fn starting_at(started: Instant, params: &SceneParameters) -> Self {
        Self {
            started,
            flame_color: params.flame_color,
            point_size: params.particle_size * POINT_SIZE_MULTIPLIER,
        }
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    pub fn current_time(&self) -> f32 {
        self.time_at(Instant::now())
    }

    /// Seconds elapsed at `now`; never negative.
    pub fn time_at(&self, now: Instant) -> f32 {
        if now <= self.started {
            return 0.0;
        }
        (now - self.started).as_secs_f32()
    }

    pub fn set_flame_color(&mut self, color: Color) {
        self.flame_color = color;
    }

    pub fn flame_color(&self) -> Color {
        self.flame_color
    }

    pub fn set_point_size(&mut self, particle_size: f32) {
        self.point_size = particle_size * POINT_SIZE_MULTIPLIER;
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn uniforms(&self) -> ShaderUniforms {
        self.uniforms_at(Instant::now())
    }

    pub fn uniforms_at(&self, now: Instant) -> ShaderUniforms {
        ShaderUniforms {
            time: self.time_at(now),
            point_size: self.point_size,
            flame_color: self.flame_color.to_array(),
        }
    }
}
