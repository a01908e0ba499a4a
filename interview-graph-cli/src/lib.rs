//! interview-graph-cli library: command parsing and execution for the `interview-graph` binary.
//!
//! Builds an [`InterviewService`](interview_graph::InterviewService) from env / .env and flags,
//! starts or resumes runs, prints progress while they execute, and inspects stored checkpoints.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interview_graph_cli::{build_service, follow, RunConfig, RunOptions};
//! use interview_graph::StartRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), interview_graph_cli::Error> {
//! let mut config = RunConfig::from_env()?;
//! config.apply_options(&RunOptions { mock: true, ..Default::default() });
//! let service = build_service(&config)?;
//! let id = service.spawn_start(StartRequest::new("7", "Senior Go engineer at Acme"))?;
//! let checkpoint = follow(&service, &id, &mut std::io::stderr()).await?;
//! println!("{}", checkpoint.status);
//! # Ok(())
//! # }
//! ```

pub mod cli;
mod commands;
mod config;
mod run;

pub use commands::{execute, read_jd, resume_action};
pub use config::{Error, LlmChoice, RunConfig, RunOptions};
pub use run::{build_service, follow, render_checkpoint, render_summaries};

#[cfg(test)]
mod tests;
