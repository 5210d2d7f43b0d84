//! Tic-tac-toe as a propagation network.
//!
//! Roles `xplayer` and `oplayer` alternate. Choices 0-8 mark the cell
//! `row * 3 + col`; choice 9 is `noop`, legal only while the other role is
//! to move. Facts 0-8 are X marks, 9-17 O marks, 18 is "X to move".

use propnet_core::{Circuit, Network, NetworkError, Signal};

pub const NAME: &str = "tictactoe";

/// Choice index of `noop` for either role.
pub const NOOP: u32 = 9;

/// Fact index of the "X to move" control base.
pub const CONTROL: usize = 18;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub fn circuit() -> Circuit {
    let mut c = Circuit::new();
    let roles = [c.role("xplayer"), c.role("oplayer")];

    let marks: Vec<Vec<Signal>> = ["x", "o"]
        .iter()
        .map(|mark| {
            (0..9)
                .map(|cell| c.base(format!("(cell {} {} {mark})", cell / 3 + 1, cell % 3 + 1)))
                .collect()
        })
        .collect();
    let x_to_move = c.base("(control xplayer)");
    let o_to_move = c.not(x_to_move);
    let turns = [x_to_move, o_to_move];

    let blanks: Vec<Signal> = (0..9)
        .map(|cell| {
            let taken = c.or(&[marks[0][cell], marks[1][cell]]);
            c.not(taken)
        })
        .collect();

    for (side, &role) in roles.iter().enumerate() {
        let mut placed = Vec::with_capacity(9);
        for (cell, &blank) in blanks.iter().enumerate() {
            let legal = c.and(&[blank, turns[side]]);
            let text = format!("(mark {} {})", cell / 3 + 1, cell % 3 + 1);
            placed.push(c.action(role, text, legal));
        }
        c.action(role, "noop", turns[1 - side]);

        for (cell, &mark) in placed.iter().enumerate() {
            let kept = marks[side][cell];
            let next = c.or(&[kept, mark]);
            c.next(kept, next);
        }
    }
    c.next(x_to_move, o_to_move);
    c.init(x_to_move);

    let lines: Vec<Signal> = (0..2)
        .map(|side| {
            let rows: Vec<Signal> = LINES
                .iter()
                .map(|line| {
                    let cells: Vec<Signal> = line.iter().map(|&cell| marks[side][cell]).collect();
                    c.and(&cells)
                })
                .collect();
            c.or(&rows)
        })
        .collect();
    let open = c.or(&blanks);
    let full = c.not(open);
    let end = c.or(&[lines[0], lines[1], full]);
    c.terminal(end);

    let no_x = c.not(lines[0]);
    let no_o = c.not(lines[1]);
    let drawn = c.and(&[no_x, no_o]);
    for (side, &role) in roles.iter().enumerate() {
        c.goal(role, 100, lines[side]);
        c.goal(role, 0, lines[1 - side]);
        c.goal(role, 50, drawn);
    }
    c
}

pub fn network() -> Result<Network, NetworkError> {
    circuit().compile()
}
