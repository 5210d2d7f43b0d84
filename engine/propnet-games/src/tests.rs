use std::sync::Arc;
use std::time::Duration;

use propnet_core::{
    create_network, is_registered, list_registered_networks, CombinedStateMachine,
    DepthChargeTest, JointMove, StateMachine, StateMachineInterface,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::*;

fn machine(network: Result<propnet_core::Network, propnet_core::NetworkError>) -> StateMachine {
    StateMachine::new(Arc::new(network.unwrap()))
}

fn play(sm: &mut StateMachine, choices: &[u32]) {
    let mut next = sm.new_base_state();
    sm.next_state(&JointMove::from_choices(choices.to_vec()), &mut next)
        .unwrap();
}

#[test]
fn test_register_all_games() {
    register_all_games();
    register_all_games();

    for name in [
        tictactoe::NAME,
        trivial::NAME,
        rock_paper_scissors::NAME,
        subtraction::NAME,
    ] {
        assert!(is_registered(name));
        assert!(create_network(name).is_ok());
    }
    let names = list_registered_networks();
    assert_eq!(names.iter().filter(|n| *n == "tictactoe").count(), 1);
}

// =============================================================================
// Tic-tac-toe
// =============================================================================

#[test]
fn test_tictactoe_initial_state() {
    let mut sm = machine(tictactoe::network());
    assert_eq!(sm.num_bases(), 19);
    assert!(sm.current().get(tictactoe::CONTROL));
    assert_eq!(sm.legal_state(0).unwrap().as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(sm.legal_state(1).unwrap().as_slice(), &[tictactoe::NOOP]);
    assert_eq!(sm.legal_to_move(0, 4).unwrap(), "(mark 2 2)");
    assert_eq!(sm.legal_to_move(1, 9).unwrap(), "noop");
    assert!(!sm.is_terminal());
}

#[test]
fn test_tictactoe_turns_alternate() {
    let mut sm = machine(tictactoe::network());
    play(&mut sm, &[4, tictactoe::NOOP]);
    assert!(sm.current().get(4));
    assert!(!sm.current().get(tictactoe::CONTROL));
    assert_eq!(sm.legal_state(0).unwrap().as_slice(), &[tictactoe::NOOP]);
    let o_moves = sm.legal_state(1).unwrap();
    assert_eq!(o_moves.count(), 8);
    assert!(!o_moves.contains(4));
}

#[test]
fn test_tictactoe_x_wins_top_row() {
    let mut sm = machine(tictactoe::network());
    let noop = tictactoe::NOOP;
    for joint in [[0, noop], [noop, 3], [1, noop], [noop, 4], [2, noop]] {
        assert!(!sm.is_terminal());
        play(&mut sm, &joint);
    }
    assert!(sm.is_terminal());
    assert_eq!(sm.goal_value(0).unwrap(), 100);
    assert_eq!(sm.goal_value(1).unwrap(), 0);
}

#[test]
fn test_tictactoe_draw() {
    // X O X / X O O / O X X
    let mut sm = machine(tictactoe::network());
    let noop = tictactoe::NOOP;
    let moves = [
        [0, noop],
        [noop, 1],
        [2, noop],
        [noop, 4],
        [3, noop],
        [noop, 5],
        [7, noop],
        [noop, 6],
        [8, noop],
    ];
    for joint in moves {
        play(&mut sm, &joint);
    }
    assert!(sm.is_terminal());
    assert_eq!(sm.goal_value(0).unwrap(), 50);
    assert_eq!(sm.goal_value(1).unwrap(), 50);
}

#[test]
fn test_tictactoe_goal_split_matches() {
    let (transitions, goals) = tictactoe::circuit().compile_split().unwrap();
    let mut combined = CombinedStateMachine::goalless(
        StateMachine::new(Arc::new(transitions)),
        StateMachine::new(Arc::new(goals)),
    )
    .unwrap();
    let mut single = machine(tictactoe::network());
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let mut next = single.new_base_state();

    for _ in 0..25 {
        single.reset();
        combined.reset();
        while !single.is_terminal() {
            let mut joint = single.joint_move();
            for role in 0..2 {
                let legal = single.legal_state(role).unwrap();
                joint.set(role, legal.get(rng.gen_range(0..legal.count())));
            }
            single.next_state(&joint, &mut next).unwrap();
            combined.next_state(&joint, &mut next).unwrap();
        }
        assert!(combined.is_terminal());
        for role in 0..2 {
            assert_eq!(
                combined.goal_value(role).unwrap(),
                single.goal_value(role).unwrap()
            );
        }
    }
}

// =============================================================================
// Trivial one-move game
// =============================================================================

#[test]
fn test_trivial_score_table() {
    let table = [
        ([0, 0], [100, 0]),
        ([1, 1], [100, 0]),
        ([0, 1], [25, 75]),
        ([1, 0], [25, 75]),
    ];
    for (joint, scores) in table {
        let mut sm = machine(trivial::network());
        play(&mut sm, &joint);
        assert!(sm.is_terminal());
        assert_eq!(sm.goal_value(0).unwrap(), scores[0]);
        assert_eq!(sm.goal_value(1).unwrap(), scores[1]);
    }
}

#[test]
fn test_trivial_rollout_counts() {
    let mut test = DepthChargeTest::with_seed(machine(trivial::network()), 5);
    test.do_rollouts(Duration::from_millis(50)).unwrap();

    let rollouts = test.rollouts();
    assert!(rollouts > 0);
    assert_eq!(test.transitions(), rollouts);
    let first = test.score_counts(0).unwrap();
    let second = test.score_counts(1).unwrap();
    assert_eq!(first.iter().sum::<u64>(), rollouts);
    assert_eq!(second.iter().sum::<u64>(), rollouts);
    assert_eq!(first[100] + first[25], rollouts);
    assert_eq!(first[100], second[0]);
    assert_eq!(first[25], second[75]);
}

// =============================================================================
// Rock-paper-scissors
// =============================================================================

#[test]
fn test_rock_paper_scissors_outcomes() {
    for left in 0..3u32 {
        for right in 0..3u32 {
            let mut sm = machine(rock_paper_scissors::network());
            assert_eq!(sm.legal_state(0).unwrap().count(), 3);
            play(&mut sm, &[left, right]);
            assert!(sm.is_terminal());

            let expected = if left == right {
                [50, 50]
            } else if left == (right + 1) % 3 {
                [100, 0]
            } else {
                [0, 100]
            };
            assert_eq!(
                [sm.goal_value(0).unwrap(), sm.goal_value(1).unwrap()],
                expected,
                "left {left} right {right}"
            );
        }
    }
}

// =============================================================================
// Subtraction game
// =============================================================================

#[test]
fn test_subtraction_legals() {
    let mut sm = machine(subtraction::network());
    assert_eq!(
        sm.legal_state(0).unwrap().as_slice(),
        &[subtraction::TAKE_ONE, subtraction::TAKE_TWO]
    );
    assert_eq!(sm.legal_state(1).unwrap().as_slice(), &[subtraction::NOOP]);
}

#[test]
fn test_subtraction_first_player_wins_with_optimal_play() {
    use subtraction::{NOOP, TAKE_ONE, TAKE_TWO};

    // 7 -> 6 -> 4 -> 3 -> 1 -> 0, first always leaves a multiple of three.
    let mut sm = machine(subtraction::network());
    for joint in [
        [TAKE_ONE, NOOP],
        [NOOP, TAKE_TWO],
        [TAKE_ONE, NOOP],
        [NOOP, TAKE_TWO],
        [TAKE_ONE, NOOP],
    ] {
        assert!(!sm.is_terminal());
        play(&mut sm, &joint);
    }
    assert!(sm.is_terminal());
    assert!(sm.current().get(0));
    assert_eq!(sm.goal_value(0).unwrap(), 100);
    assert_eq!(sm.goal_value(1).unwrap(), 0);
}

#[test]
fn test_subtraction_cannot_take_two_from_one() {
    use subtraction::{NOOP, TAKE_ONE, TAKE_TWO};

    let mut sm = machine(subtraction::network());
    for joint in [[TAKE_TWO, NOOP], [NOOP, TAKE_TWO], [TAKE_TWO, NOOP]] {
        play(&mut sm, &joint);
    }
    // Pile of one, second to move.
    assert!(sm.current().get(1));
    assert_eq!(sm.legal_state(1).unwrap().as_slice(), &[TAKE_ONE]);
}
