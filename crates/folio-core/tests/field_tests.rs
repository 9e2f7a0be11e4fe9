// Behaviour of the particle field through the public API.

use folio_core::field::{attraction_delta, FieldConfig, ParticleField, Viewport};
use folio_core::paint::{render_field, RecordingPainter};
use folio_core::proximity::edges;
use folio_core::{
    CountingScheduler, Particle, ParticleBackground, PointerState, CONNECTION_DISTANCE,
    EDGE_MAX_OPACITY,
};
use glam::Vec2;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn still_config() -> FieldConfig {
    FieldConfig {
        float_amplitude: 0.0,
        ..FieldConfig::default()
    }
}

#[test]
fn particle_past_right_margin_reenters_from_left() {
    let viewport = Viewport::new(800.0, 600.0);
    let p = Particle::at(Vec2::new(viewport.width + 51.0, 300.0));
    let mut field = ParticleField::from_particles(still_config(), viewport, vec![p]).unwrap();
    field.step(&PointerState::new(), 0.01);
    let x = field.particles()[0].position.x;
    assert!(x <= 0.0, "x = {x}");
}

#[test]
fn particle_past_bottom_margin_reenters_from_top() {
    let viewport = Viewport::new(800.0, 600.0);
    let p = Particle::at(Vec2::new(400.0, viewport.height + 60.0));
    let mut field = ParticleField::from_particles(still_config(), viewport, vec![p]).unwrap();
    field.step(&PointerState::new(), 0.01);
    assert!(field.particles()[0].position.y <= 0.0);
}

#[test]
fn pointer_pull_moves_particle_only_inside_radius() {
    let viewport = Viewport::new(800.0, 600.0);
    let near = Particle::at(Vec2::new(100.0, 100.0));
    let far = Particle::at(Vec2::new(600.0, 100.0));
    let mut field = ParticleField::from_particles(still_config(), viewport, vec![near, far]).unwrap();
    let mut pointer = PointerState::new();
    pointer.moved(150.0, 100.0);
    field.step(&pointer, 0.01);
    assert!(field.particles()[0].position.x > 100.0);
    assert_eq!(field.particles()[1].position, Vec2::new(600.0, 100.0));

    // the pull stops as soon as the pointer leaves
    pointer.left();
    let before = field.particles()[0].position;
    field.step(&pointer, 0.01);
    assert_eq!(field.particles()[0].position, before);
}

proptest! {
    #[test]
    fn closer_particles_are_pulled_harder(
        d1 in 0.1f32..149.8,
        gap in 0.01f32..1.0,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let d2 = (d1 + gap * (149.9 - d1)).max(d1 + 0.01);
        prop_assume!(d2 < 150.0);
        let dir = Vec2::from_angle(angle);
        let pointer = Vec2::new(400.0, 300.0);
        let a = attraction_delta(pointer - dir * d1, pointer, 150.0, 0.02).length();
        let b = attraction_delta(pointer - dir * d2, pointer, 150.0, 0.02).length();
        prop_assert!(a > b, "d1={} -> {}, d2={} -> {}", d1, a, d2, b);
    }

    #[test]
    fn particles_outside_radius_get_no_pull(
        d in 150.01f32..2000.0,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let pointer = Vec2::new(10.0, -20.0);
        let delta = attraction_delta(pointer - Vec2::from_angle(angle) * d, pointer, 150.0, 0.02);
        prop_assert_eq!(delta, Vec2::ZERO);
    }

    #[test]
    fn every_close_pair_is_connected_once(
        points in prop::collection::vec((0.0f32..600.0, 0.0f32..400.0), 0..40),
    ) {
        let particles: Vec<Particle> = points
            .iter()
            .map(|&(x, y)| Particle::at(Vec2::new(x, y)))
            .collect();

        let mut expected = 0;
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                if particles[i].position.distance(particles[j].position) < CONNECTION_DISTANCE {
                    expected += 1;
                }
            }
        }

        let found: Vec<_> = edges(&particles, CONNECTION_DISTANCE, EDGE_MAX_OPACITY).collect();
        prop_assert_eq!(found.len(), expected);
        for e in &found {
            prop_assert!(e.a < e.b);
        }
        let mut pairs: Vec<_> = found.iter().map(|e| (e.a, e.b)).collect();
        pairs.dedup();
        prop_assert_eq!(pairs.len(), expected);

        // and the renderer draws exactly those lines
        let field = ParticleField::from_particles(
            FieldConfig::default(),
            Viewport::new(600.0, 400.0),
            particles,
        )
        .unwrap();
        let mut painter = RecordingPainter::new();
        render_field(&mut painter, &field, &PointerState::new());
        prop_assert_eq!(painter.lines(), expected);
    }
}

#[test]
fn reduced_motion_uses_small_pool_and_never_schedules() {
    let mut bg = ParticleBackground::new(
        FieldConfig::default(),
        CountingScheduler::default(),
        StdRng::seed_from_u64(42),
    );
    let mut painter = RecordingPainter::new();
    bg.mount(Viewport::new(1280.0, 720.0), true, &mut painter);

    assert_eq!(bg.field().map(|f| f.len()), Some(30));
    assert_eq!(painter.circles(), 30);
    let drawn = painter.ops.len();

    for _ in 0..5 {
        bg.frame(&mut painter);
    }
    assert_eq!(bg.scheduler().requests, 0);
    assert_eq!(painter.ops.len(), drawn);
}

#[test]
fn full_motion_uses_large_pool_and_keeps_scheduling() {
    let mut bg = ParticleBackground::new(
        FieldConfig::default(),
        CountingScheduler::default(),
        StdRng::seed_from_u64(43),
    );
    let mut painter = RecordingPainter::new();
    bg.mount(Viewport::new(1280.0, 720.0), false, &mut painter);
    assert_eq!(bg.field().map(|f| f.len()), Some(60));
    for _ in 0..3 {
        bg.frame(&mut painter);
    }
    assert_eq!(bg.scheduler().requests, 4);
}
