//! `rollouts` command: depth-charge throughput benchmark.

use std::time::Duration;

use anyhow::{Context, Result};
use propnet_core::{create_network, DepthChargeTest, StateMachine};
use tracing::info;

use crate::config::{central, RolloutArgs};

pub fn run(args: &RolloutArgs) -> Result<()> {
    let network = create_network(&args.game)
        .with_context(|| format!("Failed to load game '{}'", args.game))?;
    let sm = StateMachine::new(network);
    let roles: Vec<String> = sm.roles().iter().map(|r| r.name.clone()).collect();

    let mut test = match args.seed.or(central().rollouts.seed) {
        Some(seed) => DepthChargeTest::with_seed(sm, seed),
        None => DepthChargeTest::new(sm),
    };
    info!(game = %args.game, seconds = args.seconds, "Starting rollouts");
    test.do_rollouts(Duration::from_secs_f64(args.seconds))
        .context("Rollout failed")?;

    println!("game:         {}", args.game);
    println!("elapsed:      {} ms", test.elapsed().as_millis());
    println!("rollouts:     {}", test.rollouts());
    println!("transitions:  {}", test.transitions());
    println!("rollouts/sec: {:.1}", test.rollouts_per_second());
    for (role, name) in roles.iter().enumerate() {
        let scores: Vec<String> = test
            .score_counts(role)
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(score, count)| format!("{score}:{count}"))
            .collect();
        println!("{name:<13} {}", scores.join(" "));
    }
    Ok(())
}
