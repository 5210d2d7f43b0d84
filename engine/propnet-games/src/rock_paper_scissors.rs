//! One round of rock-paper-scissors: win 100, draw 50, loss 0.

use propnet_core::{Circuit, Network, NetworkError, Signal};

pub const NAME: &str = "rock_paper_scissors";

const THROWS: [&str; 3] = ["rock", "paper", "scissors"];

pub fn circuit() -> Circuit {
    let mut c = Circuit::new();
    let roles = [c.role("left"), c.role("right")];
    let done = c.base("(done)");
    let open = c.not(done);
    let always = c.constant(true);
    c.next(done, always);

    let mut thrown: Vec<Vec<Signal>> = Vec::with_capacity(2);
    for &role in &roles {
        let facts: Vec<Signal> = THROWS
            .iter()
            .map(|throw| {
                let name = format!("(threw {} {throw})", if role == 0 { "left" } else { "right" });
                c.base(name)
            })
            .collect();
        for (throw, &fact) in THROWS.iter().zip(&facts) {
            let input = c.action(role, *throw, open);
            c.next(fact, input);
        }
        thrown.push(facts);
    }

    // Throw i beats throw (i + 2) % 3.
    let beats = |c: &mut Circuit, winner: usize| -> Signal {
        let pairs: Vec<Signal> = (0..3)
            .map(|i| c.and(&[thrown[winner][i], thrown[1 - winner][(i + 2) % 3]]))
            .collect();
        c.or(&pairs)
    };
    let wins = [beats(&mut c, 0), beats(&mut c, 1)];
    let decided = c.or(&[wins[0], wins[1]]);
    let undecided = c.not(decided);
    let drawn = c.and(&[done, undecided]);

    for (side, &role) in roles.iter().enumerate() {
        c.goal(role, 100, wins[side]);
        c.goal(role, 50, drawn);
        c.goal(role, 0, wins[1 - side]);
        c.goal(role, 0, open);
    }
    c.terminal(done);
    c
}

pub fn network() -> Result<Network, NetworkError> {
    circuit().compile()
}
