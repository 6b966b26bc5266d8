//! Executor pump throughput: frame-sized updates over looping demo scenes.
//!
//! Run with: cargo bench -p cadence-sequencer-core --bench sequencer_tick

use std::hint::black_box;

use cadence_sequencer::scenes::chat_draft::{chat_rotation, default_scripts};
use cadence_sequencer::scenes::code_rotation::{code_rotation, default_snippets};
use cadence_sequencer::{Config, Sequencer};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn fast_config(interval: u64) -> Config {
    Config {
        type_interval_ms: interval,
        erase_interval_ms: interval,
        ..Config::default()
    }
}

fn bench_chat_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer/chat_draft");
    for frames in [60u64, 600, 6_000] {
        group.throughput(Throughput::Elements(frames));
        group.bench_with_input(BenchmarkId::new("frames", frames), &frames, |b, &frames| {
            b.iter(|| {
                let cfg = fast_config(16);
                let mut seq = Sequencer::new(cfg.clone());
                let rot = chat_rotation(default_scripts(), &cfg).expect("scripts build");
                seq.start_rotation(rot).expect("rotation starts");
                for _ in 0..frames {
                    black_box(seq.update(16));
                }
            })
        });
    }
    group.finish();
}

fn bench_large_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer/code_rotation");
    for dt in [1_000u64, 60_000] {
        group.bench_with_input(BenchmarkId::new("single_update_ms", dt), &dt, |b, &dt| {
            b.iter(|| {
                let cfg = fast_config(1);
                let mut seq = Sequencer::new(cfg.clone());
                let rot = code_rotation(default_snippets(), &cfg).expect("snippets build");
                seq.start_rotation(rot).expect("rotation starts");
                black_box(seq.update(dt).changes.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chat_frames, bench_large_step);
criterion_main!(benches);
