//! Command-line configuration for the runner
//!
//! Defaults come from config.toml (with environment variable overrides);
//! CLI arguments take highest priority.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

pub fn central() -> &'static CentralConfig {
    &CENTRAL_CONFIG
}

fn default_game() -> String {
    CENTRAL_CONFIG.common.game.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_rollout_seconds() -> f64 {
    CENTRAL_CONFIG.rollouts.seconds
}

#[derive(Parser, Debug, Clone)]
#[command(name = "propnet")]
#[command(about = "Propagation-network game engine runner")]
#[command(
    long_about = "Runs depth-charge benchmarks and local matches over games compiled
into propagation networks.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Random rollouts to terminal for a fixed time, reporting throughput
    Rollouts(RolloutArgs),
    /// Play one game between the given players
    Match(MatchArgs),
    /// List the registered games
    Games,
}

#[derive(Args, Debug, Clone)]
pub struct RolloutArgs {
    /// Registered game name
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Benchmark duration in seconds
    #[arg(long, default_value_t = default_rollout_seconds())]
    pub seconds: f64,

    /// RNG seed (defaults to the config file, else entropy)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Kinds of player selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Mcts,
    Random,
    Legal,
}

#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Registered game name
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// One player per role, in role order
    #[arg(long, value_enum, value_delimiter = ',', default_value = "mcts,random")]
    pub players: Vec<PlayerKind>,

    /// Seconds each player gets per move
    #[arg(long, default_value_t = 1.0)]
    pub move_time: f64,

    /// Seconds each player gets before the first move
    #[arg(long, default_value_t = 0.0)]
    pub start_clock: f64,

    /// Base RNG seed; player `i` uses `seed + i`
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        match &self.command {
            Command::Rollouts(args) => {
                if args.game.is_empty() {
                    return Err(anyhow!("game cannot be empty"));
                }
                if !(args.seconds > 0.0 && args.seconds.is_finite()) {
                    return Err(anyhow!("seconds must be greater than 0"));
                }
            }
            Command::Match(args) => {
                if args.game.is_empty() {
                    return Err(anyhow!("game cannot be empty"));
                }
                if args.players.is_empty() {
                    return Err(anyhow!("players cannot be empty"));
                }
                if !(args.move_time > 0.0 && args.move_time.is_finite()) {
                    return Err(anyhow!("move_time must be greater than 0"));
                }
                if !(args.start_clock >= 0.0 && args.start_clock.is_finite()) {
                    return Err(anyhow!("start_clock cannot be negative"));
                }
            }
            Command::Games => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rollouts() {
        let cli = parse(&["propnet", "rollouts", "--game", "trivial", "--seconds", "2.5"]);
        let Command::Rollouts(args) = cli.command else {
            panic!("expected rollouts");
        };
        assert_eq!(args.game, "trivial");
        assert!((args.seconds - 2.5).abs() < f64::EPSILON);
        assert!(args.seed.is_none());
    }

    #[test]
    fn parses_match_players() {
        let cli = parse(&[
            "propnet",
            "match",
            "--game",
            "tictactoe",
            "--players",
            "random,legal",
            "--move-time",
            "0.5",
        ]);
        let Command::Match(args) = cli.command else {
            panic!("expected match");
        };
        assert_eq!(args.players, vec![PlayerKind::Random, PlayerKind::Legal]);
        assert!((args.move_time - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn match_defaults_to_mcts_against_random() {
        let cli = parse(&["propnet", "match"]);
        let Command::Match(args) = cli.command else {
            panic!("expected match");
        };
        assert_eq!(args.players, vec![PlayerKind::Mcts, PlayerKind::Random]);
    }

    #[test]
    fn rejects_unknown_player() {
        assert!(Cli::try_parse_from(["propnet", "match", "--players", "mcts,oracle"]).is_err());
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cli = parse(&["propnet", "--log-level", "debug", "match"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let cli = parse(&["propnet", "--log-level", "nope", "games"]);
        let err = cli.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn validate_rejects_zero_seconds() {
        let cli = parse(&["propnet", "rollouts", "--seconds", "0"]);
        let err = cli.validate().unwrap_err();
        assert!(err.to_string().contains("seconds"));
    }

    #[test]
    fn validate_rejects_zero_move_time() {
        let cli = parse(&["propnet", "match", "--move-time", "0"]);
        let err = cli.validate().unwrap_err();
        assert!(err.to_string().contains("move_time"));
    }
}
