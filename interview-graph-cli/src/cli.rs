//! Command-line arguments.

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::config::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "interview-graph")]
#[command(about = "Interview preparation pipeline: parse a job description, draft questions, review them")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// SQLite file for checkpoints (overrides DB_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<String>,

    /// Use canned offline replies instead of calling a model.
    #[arg(long, global = true)]
    pub mock: bool,

    /// Scores the offline reviewer returns, in order (implies --mock), e.g. 40,92.
    #[arg(long, global = true, value_delimiter = ',', value_name = "N,...")]
    pub scores: Option<Vec<u8>>,

    /// Review score needed to pass (overrides QUALITY_PASS_SCORE).
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub pass_score: Option<u8>,

    /// Drafting passes before approval is forced (overrides MAX_ITERATIONS).
    #[arg(long, global = true)]
    pub max_iterations: Option<u32>,

    /// Print the checkpoint as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Show debug logs (node enter/exit, checkpoints) on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            db_path: self.db.clone(),
            mock: self.mock,
            review_scores: self.scores.clone(),
            pass_score: self.pass_score,
            max_iterations: self.max_iterations,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start a run for a job description and follow it until it completes or pauses.
    Start {
        /// Requester id; with the text it determines the execution id.
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Read the job description from a file.
        #[arg(short, long, value_name = "PATH", conflicts_with = "jd")]
        file: Option<String>,

        /// Job description text.
        #[arg(trailing_var_arg = true)]
        jd: Vec<String>,
    },
    /// Resume a paused run with a reviewer decision.
    #[command(group(
        ArgGroup::new("decision")
            .required(true)
            .args(["approve", "retry", "overrides"])
    ))]
    Resume {
        execution_id: String,

        /// Accept the current draft.
        #[arg(long)]
        approve: bool,

        /// Draft again with this instruction.
        #[arg(long, value_name = "FEEDBACK")]
        retry: Option<String>,

        /// Apply field overrides given as JSON, e.g. '{"quality_score":90}'.
        #[arg(long = "override", value_name = "JSON")]
        overrides: Option<String>,
    },
    /// Show the latest checkpoint of a run.
    Show { execution_id: String },
    /// List stored runs, most recent first.
    List,
    /// Delete finished and abandoned checkpoints older than CHECKPOINT_TTL_SECS.
    Prune,
}
