//! Two roles, one simultaneous move each, scored from a fixed table.
//!
//! | first  | second | first score | second score |
//! |--------|--------|-------------|--------------|
//! | left   | left   | 100         | 0            |
//! | right  | right  | 100         | 0            |
//! | left   | right  | 25          | 75           |
//! | right  | left   | 25          | 75           |

use propnet_core::{Circuit, Network, NetworkError};

pub const NAME: &str = "trivial";

pub fn circuit() -> Circuit {
    let mut c = Circuit::new();
    let first = c.role("first");
    let second = c.role("second");
    let done = c.base("(done)");
    let first_left = c.base("(chose first left)");
    let second_left = c.base("(chose second left)");

    let open = c.not(done);
    let fl = c.action(first, "left", open);
    c.action(first, "right", open);
    let sl = c.action(second, "left", open);
    c.action(second, "right", open);

    let always = c.constant(true);
    c.next(done, always);
    c.next(first_left, fl);
    c.next(second_left, sl);

    let first_right = c.not(first_left);
    let second_right = c.not(second_left);
    let both_left = c.and(&[first_left, second_left]);
    let both_right = c.and(&[first_right, second_right]);
    let same = c.or(&[both_left, both_right]);
    let differ = c.not(same);
    let matched = c.and(&[done, same]);
    let mismatched = c.and(&[done, differ]);
    c.goal(first, 100, matched);
    c.goal(first, 25, mismatched);
    c.goal(first, 0, open);
    c.goal(second, 0, matched);
    c.goal(second, 75, mismatched);
    c.goal(second, 0, open);
    c.terminal(done);
    c
}

pub fn network() -> Result<Network, NetworkError> {
    circuit().compile()
}
