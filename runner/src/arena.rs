//! `match` command: plays one game between local players.
//!
//! Every player owns its own evaluator; a separate referee evaluator checks
//! each choice against the legal set and decides when the game is over.

use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use mcts::{LegalPlayer, MctsConfig, MctsPlayer, Player, RandomPlayer};
use propnet_core::{create_network, StateMachine, StateMachineInterface};
use tracing::{debug, info};

use crate::config::{central, MatchArgs, PlayerKind};

/// Final goal values, one per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub goals: Vec<i32>,
    pub steps: u32,
}

fn make_player(
    kind: PlayerKind,
    sm: StateMachine,
    role: usize,
    seed: Option<u64>,
) -> Box<dyn Player> {
    match (kind, seed) {
        (PlayerKind::Mcts, Some(seed)) => Box::new(MctsPlayer::with_seed(
            sm,
            role,
            MctsConfig::from(&central().mcts),
            seed,
        )),
        (PlayerKind::Mcts, None) => {
            Box::new(MctsPlayer::new(sm, role, MctsConfig::from(&central().mcts)))
        }
        (PlayerKind::Random, Some(seed)) => Box::new(RandomPlayer::random_seeded(sm, role, seed)),
        (PlayerKind::Random, None) => Box::new(RandomPlayer::random(sm, role)),
        (PlayerKind::Legal, _) => Box::new(LegalPlayer::legal(sm, role)),
    }
}

/// Play `players` (one per role) against each other to a terminal position.
pub fn play(
    referee: &mut StateMachine,
    players: &mut [Box<dyn Player>],
    start_clock: Duration,
    move_time: Duration,
) -> Result<MatchOutcome> {
    if players.len() != referee.role_count() {
        bail!(
            "game has {} roles but {} players were given",
            referee.role_count(),
            players.len()
        );
    }

    let start = Instant::now() + start_clock;
    for player in players.iter_mut() {
        player
            .on_meta_gaming(start)
            .with_context(|| format!("{} player failed during meta-gaming", player.name()))?;
    }

    let mut next = referee.new_base_state();
    let mut steps = 0u32;
    while !referee.is_terminal() {
        let mut joint = referee.joint_move();
        let deadline = Instant::now() + move_time;
        for player in players.iter_mut() {
            let role = player.role();
            let choice = player
                .on_next_move(deadline)
                .with_context(|| format!("{} player failed to move", player.name()))?;
            if !referee.legal_state(role)?.contains(choice) {
                return Err(anyhow!(
                    "{} player chose illegal move {} for role {}",
                    player.name(),
                    choice,
                    role
                ));
            }
            let label = referee.legal_to_move(role, choice as usize)?;
            debug!(step = steps, role, player = player.name(), label, "Move");
            joint.set(role, choice);
        }

        referee.next_state(&joint, &mut next)?;
        for player in players.iter_mut() {
            player.on_apply_move(&joint)?;
        }
        steps += 1;
    }

    let goals = (0..referee.role_count())
        .map(|role| referee.goal_value(role))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MatchOutcome { goals, steps })
}

pub fn run(args: &MatchArgs) -> Result<()> {
    let network = create_network(&args.game)
        .with_context(|| format!("Failed to load game '{}'", args.game))?;
    let mut referee = StateMachine::new(network);

    let mut players: Vec<Box<dyn Player>> = args
        .players
        .iter()
        .enumerate()
        .map(|(role, kind)| {
            let seed = args.seed.map(|s| s.wrapping_add(role as u64));
            make_player(*kind, referee.dupe(), role, seed)
        })
        .collect();

    info!(game = %args.game, players = ?args.players, "Starting match");
    let outcome = play(
        &mut referee,
        &mut players,
        Duration::from_secs_f64(args.start_clock),
        Duration::from_secs_f64(args.move_time),
    )?;

    println!("game:  {}", args.game);
    println!("steps: {}", outcome.steps);
    for (role, goal) in outcome.goals.iter().enumerate() {
        let name = &referee.roles()[role].name;
        println!("{name:<12} {:<7} {goal}", players[role].name());
    }
    Ok(())
}
