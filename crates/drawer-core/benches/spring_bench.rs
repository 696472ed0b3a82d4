//! Benchmark: per-frame cost of the animator and a full drawer frame.
//!
//! Run with: `cargo bench -p drawer-core --bench spring_bench`
//!
//! The frame loop runs at display rate, so `tick` has to stay well under a
//! microsecond even with every value in flight.

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use drawer_core::animation::{Spring, SpringAnimator, SpringParams, ValueId};
use drawer_core::{Drawer, DrawerConfig, ViewportMetrics};
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);

fn bench_spring_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("spring_advance");

    group.bench_function("16ms_frame", |b| {
        let mut spring = Spring::new(100.0, 35.0, SpringParams::SHEET);
        b.iter(|| {
            spring.advance(black_box(FRAME));
            if spring.is_at_rest() {
                spring.set_target(if spring.target() > 50.0 { 35.0 } else { 100.0 });
            }
            black_box(spring.position())
        });
    });

    // Long frame (tab regained focus): subdivided into 4ms steps.
    group.bench_function("250ms_frame", |b| {
        let mut spring = Spring::new(100.0, 35.0, SpringParams::SHEET);
        b.iter(|| {
            spring.advance(black_box(Duration::from_millis(250)));
            spring.set_target(if spring.target() > 50.0 { 35.0 } else { 100.0 });
            black_box(spring.position())
        });
    });

    group.finish();
}

fn bench_animator_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("animator_tick");

    group.bench_function("all_values_in_flight", |b| {
        let mut animator = SpringAnimator::default();
        let mut flip = false;
        b.iter(|| {
            if !animator.is_animating() {
                flip = !flip;
                let target = if flip { 100.0 } else { 0.0 };
                for id in ValueId::ALL {
                    animator.animate_to(id, target, SpringParams::SHEET);
                }
            }
            black_box(animator.tick(FRAME))
        });
    });

    group.bench_function("idle", |b| {
        let mut animator = SpringAnimator::default();
        b.iter(|| black_box(animator.tick(FRAME)));
    });

    group.finish();
}

fn bench_drawer_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawer_frame");

    group.bench_function("open_close_cycle", |b| {
        let mut drawer: Drawer =
            Drawer::new(DrawerConfig::default(), ViewportMetrics::shared(900.0)).unwrap();
        b.iter(|| {
            if !drawer.tick(FRAME) {
                if drawer.state().is_open() {
                    drawer.close();
                } else {
                    drawer.open();
                }
                drawer.drain_notifications();
            }
            black_box(drawer.geometry())
        });
    });

    group.bench_function("live_drag_move", |b| {
        let mut drawer: Drawer =
            Drawer::new(DrawerConfig::default(), ViewportMetrics::shared(900.0)).unwrap();
        drawer.open();
        while drawer.tick(FRAME) {}
        let start = Instant::now();
        drawer.drag_start(start).unwrap();
        let mut step = 0u32;
        b.iter(|| {
            step += 1;
            let delta = f64::from(step % 400);
            black_box(drawer.drag_move(delta, start + FRAME * step))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_spring_advance,
    bench_animator_tick,
    bench_drawer_frame
);
criterion_main!(benches);
