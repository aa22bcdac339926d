//! Frame cost benchmarks: cached vs uncached draw-all frames.
//!
//! The scene is a seeded random map (`SceneBuilder`) with up to four
//! components per entity, 10% of entities selected. The cached frame should
//! stay roughly flat as the scan cost grows with scene size, while the
//! uncached frame pays for the full scan every time.
//!
//! Run with: `cargo bench --bench frame_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use drawall_editor::demo::{register_demo_visualizers, SceneBuilder};
use drawall_editor::prelude::*;

const SEED: u64 = 0xD1A7_A115;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Editor with `entity_count` random entities, draw-all enabled, and one
/// frame already drawn so the cache is warm.
fn setup_editor(entity_count: usize, no_cache: bool) -> Editor {
    let mut editor = Editor::new(EditorOptions::default()).unwrap();
    register_demo_visualizers(editor.visualizers_mut());
    let (_, level) = editor.load_map().unwrap();

    let mut builder = SceneBuilder::new(SEED);
    let scene = builder.populate(&mut editor, level, entity_count, 4).unwrap();
    builder
        .select_random(&mut editor, &scene.entities, entity_count / 10)
        .unwrap();

    editor
        .execute_console_command("DrawAllVisualizers.Enabled 1")
        .unwrap();
    if no_cache {
        editor
            .execute_console_command("DrawAllVisualizers.NoCache 1")
            .unwrap();
    }
    editor.tick(1.0 / 60.0);
    editor
}

// ---------------------------------------------------------------------------
// Benchmark 1: steady-state frame, cached vs uncached
// ---------------------------------------------------------------------------

fn bench_frame_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_scaling");

    for &count in &[100usize, 1_000, 5_000] {
        let mut cached = setup_editor(count, false);
        group.bench_with_input(BenchmarkId::new("cached", count), &count, |b, _| {
            b.iter(|| black_box(cached.tick(1.0 / 60.0)));
        });

        let mut uncached = setup_editor(count, true);
        group.bench_with_input(BenchmarkId::new("no_cache", count), &count, |b, _| {
            b.iter(|| black_box(uncached.tick(1.0 / 60.0)));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark 2: frame after a selection change
// ---------------------------------------------------------------------------

fn bench_selection_rebuild(c: &mut Criterion) {
    let entity_count = 1_000;
    let mut editor = setup_editor(entity_count, false);
    let entities: Vec<ObjectId> = {
        let scene = editor.scene();
        let level = scene.levels(scene.world_contexts()[0])[0];
        scene.entities(level).to_vec()
    };
    let mut builder = SceneBuilder::new(SEED ^ 1);

    c.bench_function("frame_after_selection_change_1k", |b| {
        b.iter(|| {
            builder
                .select_random(&mut editor, &entities, entity_count / 10)
                .unwrap();
            black_box(editor.tick(1.0 / 60.0));
        });
    });
}

// ---------------------------------------------------------------------------
// Benchmark 3: full cache rebuild
// ---------------------------------------------------------------------------

fn bench_full_rebuild(c: &mut Criterion) {
    let editor = setup_editor(1_000, false);
    let config = editor.config_snapshot();
    let mut cache = VisualizerCache::new();

    c.bench_function("cache_rebuild_1k", |b| {
        b.iter(|| black_box(cache.rebuild(editor.scene(), &config)));
    });
}

criterion_group!(
    benches,
    bench_frame_scaling,
    bench_selection_rebuild,
    bench_full_rebuild
);
criterion_main!(benches);
