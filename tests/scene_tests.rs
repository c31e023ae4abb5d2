// Host-side tests for the particle field builder.

use cake_web::core::constants::*;
use cake_web::core::{Color, Layer, ParticleFieldBuilder, SceneParameters};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f32 = 1e-4;

fn build(params: &SceneParameters, seed: u64) -> (cake_web::core::ParticleBatch, cake_web::core::FlameBatch) {
    let mut rng = StdRng::seed_from_u64(seed);
    ParticleFieldBuilder::new().build_with_rng(params, &mut rng)
}

#[test]
fn attribute_arrays_are_parallel() {
    for candles in [0, 1, 8, 17] {
        let params = SceneParameters {
            candle_count: candles,
            ..Default::default()
        };
        let (particles, flames) = build(&params, 7);
        assert_eq!(particles.positions().len(), particles.colors().len());
        assert_eq!(particles.positions().len(), particles.scales().len());
        assert_eq!(flames.positions().len(), flames.sizes().len());
    }
}

#[test]
fn shape_layers_have_fixed_counts() {
    let params = SceneParameters {
        candle_count: 3,
        particle_size: 0.9,
        ..Default::default()
    };
    let (particles, _) = build(&params, 1);
    assert_eq!(particles.layer(Layer::BaseTier).len(), BASE_PARTICLES);
    assert_eq!(particles.layer(Layer::TopTier).len(), TOP_PARTICLES);
    assert_eq!(particles.layer(Layer::IcingRing).len(), ICING_PARTICLES);
    assert_eq!(BASE_PARTICLES, 4000);
    assert_eq!(TOP_PARTICLES, 2500);
    assert_eq!(ICING_PARTICLES, 500);
    assert_eq!(
        particles.len(),
        BASE_PARTICLES + TOP_PARTICLES + ICING_PARTICLES + 3 * CANDLE_STICK_PARTICLES
    );
}

#[test]
fn candle_and_flame_counts_scale_with_candle_count() {
    for n in [0_u32, 1, 5, 12] {
        let params = SceneParameters {
            candle_count: n,
            ..Default::default()
        };
        let (particles, flames) = build(&params, n as u64);
        assert_eq!(particles.layer(Layer::CandleSticks).len(), 50 * n as usize);
        assert_eq!(flames.len(), 20 * n as usize);
    }
}

#[test]
fn zero_candles_yield_empty_flames() {
    let params = SceneParameters {
        candle_count: 0,
        ..Default::default()
    };
    let (particles, flames) = build(&params, 3);
    assert!(flames.is_empty());
    assert!(particles.layer(Layer::CandleSticks).is_empty());
    assert!(!particles.is_empty());
}

#[test]
fn base_tier_stays_inside_its_cylinder() {
    let (particles, _) = build(&SceneParameters::default(), 11);
    let range = particles.layer(Layer::BaseTier);
    for p in &particles.positions()[range] {
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!(r <= BASE_RADIUS + EPS, "radius {r} outside base tier");
        assert!(p.y >= -BASE_HEIGHT / 2.0 - EPS && p.y <= BASE_HEIGHT / 2.0 + EPS);
    }
}

#[test]
fn top_tier_stays_inside_its_offset_cylinder() {
    let (particles, _) = build(&SceneParameters::default(), 12);
    let range = particles.layer(Layer::TopTier);
    let lo = TOP_Y_OFFSET - TOP_HEIGHT / 2.0;
    let hi = TOP_Y_OFFSET + TOP_HEIGHT / 2.0;
    assert!((lo - BASE_HEIGHT / 2.0).abs() < EPS, "top tier must sit on the base");
    for p in &particles.positions()[range] {
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!(r <= TOP_RADIUS + EPS);
        assert!(p.y >= lo - EPS && p.y <= hi + EPS);
    }
}

#[test]
fn most_tier_particles_sit_on_the_surface() {
    let (particles, _) = build(&SceneParameters::default(), 99);
    let range = particles.layer(Layer::BaseTier);
    let on_surface = particles.positions()[range]
        .iter()
        .filter(|p| ((p.x * p.x + p.z * p.z).sqrt() - BASE_RADIUS).abs() < 1e-3)
        .count();
    let fraction = on_surface as f32 / BASE_PARTICLES as f32;
    // 0.7 expected; 4000 samples keep this well inside the band
    assert!(fraction > 0.65 && fraction < 0.75, "surface fraction {fraction}");
}

#[test]
fn colors_and_scales_are_baked_per_layer() {
    let params = SceneParameters {
        base_color: Color::rgb(1.0, 0.0, 0.0),
        top_color: Color::rgb(0.0, 1.0, 0.0),
        icing_color: Color::rgb(0.0, 0.0, 1.0),
        candle_count: 2,
        ..Default::default()
    };
    let (particles, _) = build(&params, 5);
    let colors = particles.colors();
    let scales = particles.scales();

    for i in particles.layer(Layer::BaseTier) {
        assert_eq!(colors[i], params.base_color.to_vec3());
        assert!(scales[i] >= 0.5 && scales[i] <= 1.0);
    }
    for i in particles.layer(Layer::TopTier) {
        assert_eq!(colors[i], params.top_color.to_vec3());
    }
    for i in particles.layer(Layer::IcingRing) {
        assert_eq!(colors[i], params.icing_color.to_vec3());
        assert_eq!(scales[i], ICING_SCALE);
    }
    for i in particles.layer(Layer::CandleSticks) {
        assert_eq!(colors[i].to_array(), CANDLE_STICK_COLOR);
        assert_eq!(scales[i], CANDLE_STICK_SCALE);
    }
}

#[test]
fn icing_ring_is_scalloped_around_the_seam() {
    let (particles, _) = build(&SceneParameters::default(), 2);
    let range = particles.layer(Layer::IcingRing);
    let mut min_r = f32::MAX;
    let mut max_r = f32::MIN;
    for p in &particles.positions()[range] {
        assert!((p.y - BASE_HEIGHT / 2.0).abs() < EPS);
        let r = (p.x * p.x + p.z * p.z).sqrt();
        min_r = min_r.min(r);
        max_r = max_r.max(r);
    }
    let mid = BASE_RADIUS + ICING_RADIUS_OFFSET;
    assert!(min_r >= mid - ICING_RIPPLE_AMPLITUDE - EPS);
    assert!(max_r <= mid + ICING_RIPPLE_AMPLITUDE + EPS);
    assert!(max_r - min_r > ICING_RIPPLE_AMPLITUDE, "ring should ripple");
}

#[test]
fn candles_are_vertical_sticks_on_a_ring() {
    let params = SceneParameters {
        candle_count: 4,
        ..Default::default()
    };
    let (particles, _) = build(&params, 8);
    let range = particles.layer(Layer::CandleSticks);
    let sticks = &particles.positions()[range];
    for stick in sticks.chunks(CANDLE_STICK_PARTICLES) {
        let base = stick[0];
        let r = (base.x * base.x + base.z * base.z).sqrt();
        assert!((r - CANDLE_RING_RADIUS).abs() < EPS);
        assert!((base.y - CANDLE_BASE_Y).abs() < EPS);
        for pair in stick.windows(2) {
            assert_eq!(pair[0].x, pair[1].x);
            assert_eq!(pair[0].z, pair[1].z);
            assert!(pair[1].y > pair[0].y);
        }
        assert!(stick[stick.len() - 1].y < CANDLE_BASE_Y + CANDLE_HEIGHT);
    }
    // First candle sits at angle zero
    assert!((sticks[0].x - CANDLE_RING_RADIUS).abs() < EPS);
    assert!(sticks[0].z.abs() < EPS);
}

#[test]
fn flames_hover_above_their_candles() {
    let params = SceneParameters {
        candle_count: 6,
        ..Default::default()
    };
    let (particles, flames) = build(&params, 21);
    let sticks = &particles.positions()[particles.layer(Layer::CandleSticks)];
    let flame_base = CANDLE_BASE_Y + CANDLE_HEIGHT + FLAME_GAP;
    for (c, group) in flames.positions().chunks(FLAME_PARTICLES_PER_CANDLE).enumerate() {
        let stick = sticks[c * CANDLE_STICK_PARTICLES];
        for p in group {
            assert!((p.x - stick.x).abs() <= FLAME_JITTER_XZ / 2.0 + EPS);
            assert!((p.z - stick.z).abs() <= FLAME_JITTER_XZ / 2.0 + EPS);
            assert!(p.y >= flame_base - EPS && p.y < flame_base + FLAME_JITTER_Y + EPS);
        }
    }
    for s in flames.sizes() {
        assert!((0.0..1.0).contains(s), "size factor {s} outside [0, 1)");
    }
}

#[test]
fn seeded_builds_are_reproducible_and_entropy_builds_keep_shape() {
    let params = SceneParameters::default();
    let (a, fa) = build(&params, 42);
    let (b, fb) = build(&params, 42);
    assert_eq!(a.positions(), b.positions());
    assert_eq!(fa.sizes(), fb.sizes());

    let (c, fc) = ParticleFieldBuilder::new().build(&params);
    assert_eq!(c.len(), a.len());
    assert_eq!(fc.len(), fa.len());
}

#[test]
fn oversized_candle_counts_are_bounded_by_the_builder() {
    let params = SceneParameters {
        candle_count: u32::MAX,
        ..Default::default()
    };
    let (particles, flames) = build(&params, 4);
    let max = MAX_CANDLES as usize;
    assert_eq!(particles.layer(Layer::CandleSticks).len(), max * CANDLE_STICK_PARTICLES);
    assert_eq!(flames.len(), max * FLAME_PARTICLES_PER_CANDLE);
}
