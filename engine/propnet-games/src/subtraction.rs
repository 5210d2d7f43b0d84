//! Subtraction game: players alternately take one or two stones from a
//! pile of seven; whoever takes the last stone wins.
//!
//! Facts 0-7 are the one-hot pile size, fact 8 is "first to move".
//! Choices per role: 0 = take one, 1 = take two, 2 = noop.

use propnet_core::{Circuit, Network, NetworkError, Signal};

pub const NAME: &str = "subtraction";

pub const PILE: usize = 7;

pub const TAKE_ONE: u32 = 0;
pub const TAKE_TWO: u32 = 1;
pub const NOOP: u32 = 2;

pub fn circuit() -> Circuit {
    let mut c = Circuit::new();
    let roles = [c.role("first"), c.role("second")];
    let pile: Vec<Signal> = (0..=PILE)
        .map(|size| c.base(format!("(pile {size})")))
        .collect();
    let first_to_move = c.base("(control first)");
    let second_to_move = c.not(first_to_move);
    let turns = [first_to_move, second_to_move];

    let at_least_one = c.or(&pile[1..]);
    let at_least_two = c.or(&pile[2..]);

    let mut take_one = Vec::with_capacity(2);
    let mut take_two = Vec::with_capacity(2);
    for (side, &role) in roles.iter().enumerate() {
        let can_one = c.and(&[turns[side], at_least_one]);
        let can_two = c.and(&[turns[side], at_least_two]);
        take_one.push(c.action(role, "(take 1)", can_one));
        take_two.push(c.action(role, "(take 2)", can_two));
        c.action(role, "noop", turns[1 - side]);
    }
    let took_one = c.or(&take_one);
    let took_two = c.or(&take_two);

    for size in 0..=PILE {
        let mut sources = Vec::with_capacity(2);
        if size < PILE {
            sources.push(c.and(&[pile[size + 1], took_one]));
        }
        if size + 1 < PILE {
            sources.push(c.and(&[pile[size + 2], took_two]));
        }
        let next = c.or(&sources);
        c.next(pile[size], next);
    }
    c.next(first_to_move, second_to_move);
    c.init(pile[PILE]);
    c.init(first_to_move);

    let empty = pile[0];
    let not_empty = c.not(empty);
    c.terminal(empty);
    for (side, &role) in roles.iter().enumerate() {
        // The role not to move took the last stone.
        let won = c.and(&[empty, turns[1 - side]]);
        let lost = c.or(&[not_empty, turns[side]]);
        c.goal(role, 100, won);
        c.goal(role, 0, lost);
    }
    c
}

pub fn network() -> Result<Network, NetworkError> {
    circuit().compile()
}
