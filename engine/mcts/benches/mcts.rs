//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full searches with varying playout budgets
//! - Searches from different game positions (opening, midgame)
//! - Rerooting the tree after a move

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mcts::{MctsConfig, MctsPlayer, Player};
use propnet_core::{JointMove, StateMachine};
use propnet_games::tictactoe;

fn machine(name: &str) -> StateMachine {
    propnet_games::register_all_games();
    StateMachine::new(propnet_core::create_network(name).unwrap())
}

fn far() -> Instant {
    Instant::now() + Duration::from_secs(60)
}

// =============================================================================
// Full Search Benchmarks
// =============================================================================

fn bench_search_playouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_playouts");

    for playouts in [100u64, 400, 1600] {
        group.throughput(Throughput::Elements(playouts));
        group.bench_with_input(
            BenchmarkId::new("tictactoe", playouts),
            &playouts,
            |b, &playouts| {
                let config = MctsConfig::for_testing().with_playouts(playouts);
                let sm = machine(tictactoe::NAME);
                b.iter(|| {
                    let mut player = MctsPlayer::with_seed(sm.dupe(), 0, config.clone(), 42);
                    black_box(player.on_next_move(far()).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_search_games(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_games");
    let config = MctsConfig::for_testing().with_playouts(500);

    for name in [
        propnet_games::subtraction::NAME,
        propnet_games::rock_paper_scissors::NAME,
        tictactoe::NAME,
    ] {
        let sm = machine(name);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut player = MctsPlayer::with_seed(sm.dupe(), 0, config.clone(), 7);
                black_box(player.on_next_move(far()).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_search_midgame(c: &mut Criterion) {
    let noop = tictactoe::NOOP;
    let config = MctsConfig::for_testing().with_playouts(500);
    let sm = machine(tictactoe::NAME);

    c.bench_function("mcts_search_tictactoe_midgame", |b| {
        b.iter(|| {
            let mut player = MctsPlayer::with_seed(sm.dupe(), 0, config.clone(), 3);
            for joint in [[4, noop], [noop, 0], [8, noop], [noop, 2]] {
                player
                    .on_apply_move(&JointMove::from_choices(joint.to_vec()))
                    .unwrap();
            }
            black_box(player.on_next_move(far()).unwrap())
        });
    });
}

// =============================================================================
// Tree Reuse Benchmarks
// =============================================================================

fn bench_reroot(c: &mut Criterion) {
    let noop = tictactoe::NOOP;
    let config = MctsConfig::for_testing().with_playouts(2000);
    let sm = machine(tictactoe::NAME);

    c.bench_function("mcts_reroot_after_move", |b| {
        b.iter_batched(
            || {
                let mut player = MctsPlayer::with_seed(sm.dupe(), 0, config.clone(), 11);
                let choice = player.on_next_move(far()).unwrap();
                (player, JointMove::from_choices(vec![choice, noop]))
            },
            |(mut player, joint)| {
                player.on_apply_move(&joint).unwrap();
                black_box(player.tree().map(|tree| tree.len()))
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_search_playouts,
    bench_search_games,
    bench_search_midgame,
    bench_reroot,
);
criterion_main!(benches);
