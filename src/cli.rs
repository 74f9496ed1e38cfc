use crate::config::{PenaltyWeights, SolverConfig};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "University course timetabling with greedy construction and hill climbing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Solve a single instance file
    Solve {
        /// The .tim file describing the instance
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the solution; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Solve every .tim file in a directory
    Batch {
        #[arg(long, default_value = "Inputs")]
        input_dir: PathBuf,

        #[arg(long, default_value = "Outputs")]
        output_dir: PathBuf,

        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Serve the solver over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Base seed for shuffled restart orders
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Additional runs from shuffled event orders
    #[arg(long, default_value_t = 0)]
    pub restarts: usize,

    /// Maximum number of accepted moves per local search run
    #[arg(long, default_value_t = 100_000)]
    pub max_improvements: usize,

    #[arg(long, default_value_t = 5)]
    pub days: usize,

    #[arg(long, default_value_t = 9)]
    pub periods_per_day: usize,

    /// Weight of a day with a single event
    #[arg(long, default_value_t = 1.0)]
    pub w1: f64,

    /// Weight of three consecutive events
    #[arg(long, default_value_t = 1.0)]
    pub w2: f64,

    /// Weight of an event in the last period of a day
    #[arg(long, default_value_t = 1.0)]
    pub w3: f64,

    /// Weight of an unassigned event, see --penalize-unassigned
    #[arg(long, default_value_t = 1.0)]
    pub w4: f64,

    /// Count unassigned events in the score
    #[arg(long)]
    pub penalize_unassigned: bool,
}

impl From<SolverArgs> for SolverConfig {
    fn from(args: SolverArgs) -> Self {
        SolverConfig {
            days: args.days,
            periods_per_day: args.periods_per_day,
            weights: PenaltyWeights {
                single_event_day: args.w1,
                consecutive_run: args.w2,
                last_slot: args.w3,
                unassigned_event: args.w4,
            },
            penalize_unassigned: args.penalize_unassigned,
            max_improvements: args.max_improvements,
            restarts: args.restarts,
            seed: args.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::parse_from([APP_NAME, "solve", "--input", "small_1.tim"]);
        let Command::Solve { input, output, solver } = cli.command else {
            panic!("expected the solve command");
        };
        assert_eq!(input, PathBuf::from("small_1.tim"));
        assert_eq!(output, None);
        assert_eq!(SolverConfig::from(solver), SolverConfig::default());
    }

    #[test]
    fn test_batch_flags() {
        let cli = Cli::parse_from([
            APP_NAME,
            "batch",
            "--input-dir",
            "in",
            "--restarts",
            "3",
            "--w2",
            "2.5",
            "--penalize-unassigned",
        ]);
        let Command::Batch {
            input_dir,
            output_dir,
            solver,
        } = cli.command
        else {
            panic!("expected the batch command");
        };
        assert_eq!(input_dir, PathBuf::from("in"));
        assert_eq!(output_dir, PathBuf::from("Outputs"));
        let config = SolverConfig::from(solver);
        assert_eq!(config.restarts, 3);
        assert_eq!(config.weights.consecutive_run, 2.5);
        assert!(config.penalize_unassigned);
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
