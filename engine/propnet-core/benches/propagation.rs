//! Propagation benchmarks.
//!
//! Run with: `cargo bench -p propnet-core`
//!
//! These benchmarks measure:
//! - Single transitions through `next_state`
//! - Position jumps through `update_bases`
//! - Complete random rollouts (the depth-charge inner loop)

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use propnet_core::{DepthChargeTest, JointMove, Position, StateMachine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn machine(name: &str) -> StateMachine {
    propnet_games::register_all_games();
    let network = propnet_core::create_network(name).unwrap();
    StateMachine::new(network)
}

/// Positions visited by one seeded random game.
fn sample_positions(sm: &mut StateMachine, seed: u64) -> Vec<Position> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut joint = sm.joint_move();
    let mut next = sm.new_base_state();
    sm.reset();
    let mut positions = vec![sm.current().clone()];
    while !sm.is_terminal() {
        for role in 0..sm.role_count() {
            let legal = sm.legal_state(role).unwrap();
            joint.set(role, legal.get(rng.gen_range(0..legal.count())));
        }
        sm.next_state(&joint, &mut next).unwrap();
        positions.push(next.clone());
    }
    sm.reset();
    positions
}

fn bench_next_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_state");
    for name in ["tictactoe", "rock_paper_scissors", "subtraction"] {
        group.bench_function(name, |b| {
            let mut sm = machine(name);
            let mut next = sm.new_base_state();
            let mut joint = JointMove::new(sm.role_count());
            b.iter(|| {
                if sm.is_terminal() {
                    sm.reset();
                }
                for role in 0..sm.role_count() {
                    let first = sm.legal_state(role).unwrap().get(0);
                    joint.set(role, first);
                }
                sm.next_state(black_box(&joint), &mut next).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_update_bases(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_bases");
    let mut sm = machine("tictactoe");
    let positions = sample_positions(&mut sm, 7);
    group.throughput(Throughput::Elements(positions.len() as u64));
    group.bench_function("tictactoe_game_replay", |b| {
        b.iter(|| {
            for position in &positions {
                sm.update_bases(black_box(position)).unwrap();
            }
        });
    });
    group.finish();
}

fn bench_rollouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollouts");
    for name in ["tictactoe", "subtraction"] {
        group.bench_with_input(BenchmarkId::new("depth_charge", name), &name, |b, &name| {
            let mut test = DepthChargeTest::with_seed(machine(name), 42);
            b.iter(|| {
                test.do_rollouts(std::time::Duration::ZERO).unwrap();
                black_box(test.transitions())
            });
        });
    }
    group.finish();
}

fn bench_dupe(c: &mut Criterion) {
    let sm = machine("tictactoe");
    c.bench_function("dupe_tictactoe", |b| b.iter(|| black_box(sm.dupe())));
    let network = Arc::clone(sm.network());
    c.bench_function("new_tictactoe", |b| {
        b.iter(|| black_box(StateMachine::new(Arc::clone(&network))))
    });
}

criterion_group!(
    benches,
    bench_next_state,
    bench_update_bases,
    bench_rollouts,
    bench_dupe
);
criterion_main!(benches);
