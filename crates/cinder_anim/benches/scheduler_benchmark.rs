//! # Scheduler Read-Path Benchmark
//!
//! The render pass and producer-side add are the operations other threads
//! pay for; the driver never starts here, so the numbers are pure data-path.
//!
//! Run with: `cargo bench --package cinder_anim`

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use cinder_anim::{
    Animation, AnimationScheduler, BoxedAnimation, DrawCommand, DrawList, Layer, SchedulerConfig,
    World,
};

/// Animations resident in the set during the render benchmark.
const RESIDENT: usize = 1_000;

struct Glow {
    layer: Layer,
}

impl Animation for Glow {
    fn layer(&self) -> Layer {
        self.layer
    }
    fn finished(&self) -> bool {
        false
    }
    fn advance(&mut self, _elapsed: Duration) {}
    fn render(&self, out: &mut DrawList) {
        out.push(DrawCommand::Sprite {
            sprite: 3,
            x: 8.0,
            y: 8.0,
            scale: 1.0,
            opacity: 0.8,
        });
    }
}

struct StillWorld;

impl World for StillWorld {
    fn speed_multiplier(&self) -> f32 {
        1.0
    }
    fn spawn_ambient(&self) -> BoxedAnimation {
        Box::new(Glow { layer: Layer::Sky })
    }
}

fn populated_scheduler() -> AnimationScheduler {
    let scheduler = AnimationScheduler::new(Arc::new(StillWorld), SchedulerConfig::default());
    for i in 0..RESIDENT {
        let layer = if i % 2 == 0 { Layer::Ground } else { Layer::Sky };
        scheduler.add(Box::new(Glow { layer }));
    }
    scheduler
}

/// Benchmark: layer-filtered render over 1k resident animations.
fn bench_render_pass(c: &mut Criterion) {
    let scheduler = populated_scheduler();
    let mut list = DrawList::new();

    c.bench_function("render_1k_half_on_layer", |b| {
        b.iter(|| {
            list.clear();
            scheduler.render(&mut list, Layer::Ground);
            black_box(list.len())
        });
    });
}

/// Benchmark: producer-side add of 1k animations.
fn bench_add(c: &mut Criterion) {
    c.bench_function("add_1k", |b| {
        b.iter_batched(
            || AnimationScheduler::new(Arc::new(StillWorld), SchedulerConfig::default()),
            |scheduler| {
                for _ in 0..RESIDENT {
                    scheduler.add(Box::new(Glow { layer: Layer::Air }));
                }
                black_box(scheduler.len())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_render_pass, bench_add);
criterion_main!(benches);
