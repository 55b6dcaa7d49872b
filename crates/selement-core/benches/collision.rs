//! Benchmarks for the two-phase overlap test
//!
//! Run with: cargo bench --package selement-core --bench collision

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec2;
use selement_core::collision::{Anchor, CollisionShape, Mask};

fn benchmark_mask_overlap(c: &mut Criterion) {
    let mob = Arc::new(Mask::circle(128.0));
    let arrow = Arc::new(Mask::filled(256, 64).rotated(30.0));

    let mut group = c.benchmark_group("mask_overlap");

    let target = CollisionShape::from_mask(mob.clone(), Anchor::BottomCenter, Vec2::ZERO);
    let hit = CollisionShape::from_mask(arrow.clone(), Anchor::BottomCenter, Vec2::new(40.0, -20.0));
    group.bench_function("hit", |b| {
        b.iter(|| black_box(target.test_overlap(black_box(&hit))))
    });

    // Bounds overlap but the pixels do not
    let corner = CollisionShape::from_mask(mob.clone(), Anchor::BottomCenter, Vec2::new(240.0, -240.0));
    group.bench_function("near_miss", |b| {
        b.iter(|| black_box(target.test_overlap(black_box(&corner))))
    });

    let far = CollisionShape::from_mask(arrow, Anchor::BottomCenter, Vec2::new(5000.0, 0.0));
    group.bench_function("broad_phase_reject", |b| {
        b.iter(|| black_box(target.test_overlap(black_box(&far))))
    });

    group.finish();
}

fn benchmark_projectile_sweep(c: &mut Criterion) {
    let mob = CollisionShape::from_mask(Arc::new(Mask::circle(128.0)), Anchor::BottomCenter, Vec2::ZERO);
    let ring: Vec<CollisionShape> = (0..120)
        .map(|i| {
            let angle = (i as f32 * 3.0).to_radians();
            CollisionShape::from_radius(32.0, Anchor::BottomCenter, Vec2::from_angle(angle) * 150.0)
        })
        .collect();

    c.bench_function("burster_volley_vs_mob", |b| {
        b.iter(|| {
            ring.iter()
                .filter(|shape| mob.test_overlap(shape).is_some())
                .count()
        })
    });
}

criterion_group!(benches, benchmark_mask_overlap, benchmark_projectile_sweep);
criterion_main!(benches);
