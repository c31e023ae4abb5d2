use super::color::Color;
use super::constants::*;
use super::params::SceneParameters;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::TAU;
use std::ops::Range;

/// Shape layers inside a [`ParticleBatch`], in generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    BaseTier,
    TopTier,
    IcingRing,
    CandleSticks,
}

/// Per-particle attributes baked at build time.
///
/// `positions`, `colors` and `scales` are parallel arrays. A batch is never
/// edited after it is built; a parameter change produces a new one.
#[derive(Clone, Debug, Default)]
pub struct ParticleBatch {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    scales: Vec<f32>,
    layers: SmallVec<[(Layer, Range<usize>); 4]>,
}

impl ParticleBatch {
    fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
            scales: Vec::with_capacity(n),
            layers: SmallVec::new(),
        }
    }

    #[inline]
    fn push(&mut self, position: Vec3, color: Vec3, scale: f32) {
        self.positions.push(position);
        self.colors.push(color);
        self.scales.push(scale);
    }

    /// Record everything pushed since `start` as belonging to `layer`.
    fn close_layer(&mut self, layer: Layer, start: usize) {
        self.layers.push((layer, start..self.positions.len()));
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index range occupied by `layer`; empty if the layer was not generated.
    pub fn layer(&self, layer: Layer) -> Range<usize> {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, r)| r.clone())
            .unwrap_or(0..0)
    }
}

/// Flame particles: positions plus an opaque size factor in `[0, 1)` that the
/// flame shading stage maps to flicker and fade.
#[derive(Clone, Debug, Default)]
pub struct FlameBatch {
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
}

impl FlameBatch {
    fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            sizes: Vec::with_capacity(n),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Solid cylinder description used by both tiers.
struct Tier {
    radius: f32,
    height: f32,
    center_y: f32,
    samples: usize,
}

/// Turns [`SceneParameters`] into the cake's particle and flame batches.
///
/// Counts and shapes are fixed; exact placement is random. Any parameter set
/// (including zero candles) yields a valid batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParticleFieldBuilder;

impl ParticleFieldBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build with an entropy-seeded generator.
    pub fn build(&self, params: &SceneParameters) -> (ParticleBatch, FlameBatch) {
        let mut rng = StdRng::from_entropy();
        self.build_with_rng(params, &mut rng)
    }

    /// Build with a caller-provided generator (seed it for reproducible output).
    pub fn build_with_rng<R: Rng>(
        &self,
        params: &SceneParameters,
        rng: &mut R,
    ) -> (ParticleBatch, FlameBatch) {
        // Parameters built by hand can skip `apply`, so bound the count here too
        let candle_count = params.candle_count.min(MAX_CANDLES);
        let candles = candle_count as usize;
        let mut particles = ParticleBatch::with_capacity(
            (BASE_PARTICLES + TOP_PARTICLES + ICING_PARTICLES)
                .saturating_add(candles.saturating_mul(CANDLE_STICK_PARTICLES)),
        );
        let mut flames =
            FlameBatch::with_capacity(candles.saturating_mul(FLAME_PARTICLES_PER_CANDLE));

        let base = Tier {
            radius: BASE_RADIUS,
            height: BASE_HEIGHT,
            center_y: 0.0,
            samples: BASE_PARTICLES,
        };
        let top = Tier {
            radius: TOP_RADIUS,
            height: TOP_HEIGHT,
            center_y: TOP_Y_OFFSET,
            samples: TOP_PARTICLES,
        };

        let start = particles.len();
        add_tier(&mut particles, &base, params.base_color, rng);
        particles.close_layer(Layer::BaseTier, start);

        let start = particles.len();
        add_tier(&mut particles, &top, params.top_color, rng);
        particles.close_layer(Layer::TopTier, start);

        let start = particles.len();
        add_icing_ring(&mut particles, params.icing_color);
        particles.close_layer(Layer::IcingRing, start);

        let start = particles.len();
        add_candles(&mut particles, &mut flames, candle_count, rng);
        particles.close_layer(Layer::CandleSticks, start);

        log::debug!(
            "[scene] built {} particles, {} flame particles ({} candles)",
            particles.len(),
            flames.len(),
            candle_count
        );
        (particles, flames)
    }
}

fn add_tier<R: Rng>(out: &mut ParticleBatch, tier: &Tier, color: Color, rng: &mut R) {
    let color = color.to_vec3();
    let half = tier.height / 2.0;
    for _ in 0..tier.samples {
        let theta = rng.gen_range(0.0..TAU);
        let y = tier.center_y + rng.gen_range(-half..=half);
        // Most samples sit on the shell to keep the silhouette crisp
        let r = if rng.gen_bool(SURFACE_PROBABILITY) {
            tier.radius
        } else {
            rng.gen_range(0.0..=tier.radius)
        };
        let scale = rng.gen_range(TIER_SCALE_MIN..=TIER_SCALE_MAX);
        out.push(Vec3::new(r * theta.cos(), y, r * theta.sin()), color, scale);
    }
}

fn add_icing_ring(out: &mut ParticleBatch, color: Color) {
    let color = color.to_vec3();
    let y = BASE_HEIGHT / 2.0;
    for i in 0..ICING_PARTICLES {
        let theta = (i as f32 / ICING_PARTICLES as f32) * TAU;
        let r = BASE_RADIUS
            + ICING_RADIUS_OFFSET
            + (theta * ICING_RIPPLE_CYCLES).sin() * ICING_RIPPLE_AMPLITUDE;
        out.push(Vec3::new(r * theta.cos(), y, r * theta.sin()), color, ICING_SCALE);
    }
}

fn add_candles<R: Rng>(
    out: &mut ParticleBatch,
    flames: &mut FlameBatch,
    candle_count: u32,
    rng: &mut R,
) {
    let stick_color = Vec3::from(CANDLE_STICK_COLOR);
    let half_jitter = FLAME_JITTER_XZ / 2.0;
    let flame_y = CANDLE_BASE_Y + CANDLE_HEIGHT + FLAME_GAP;
    for c in 0..candle_count {
        let angle = (c as f32 / candle_count as f32) * TAU;
        let cx = angle.cos() * CANDLE_RING_RADIUS;
        let cz = angle.sin() * CANDLE_RING_RADIUS;

        for j in 0..CANDLE_STICK_PARTICLES {
            let y = CANDLE_BASE_Y + (j as f32 / CANDLE_STICK_PARTICLES as f32) * CANDLE_HEIGHT;
            out.push(Vec3::new(cx, y, cz), stick_color, CANDLE_STICK_SCALE);
        }

        for _ in 0..FLAME_PARTICLES_PER_CANDLE {
            flames.positions.push(Vec3::new(
                cx + rng.gen_range(-half_jitter..half_jitter),
                flame_y + rng.gen_range(0.0..FLAME_JITTER_Y),
                cz + rng.gen_range(-half_jitter..half_jitter),
            ));
            flames.sizes.push(rng.gen::<f32>());
        }
    }
}
