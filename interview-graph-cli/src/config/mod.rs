//! Configuration for CLI runs.
//!
//! Re-exports [`RunConfig`], [`LlmChoice`], [`RunOptions`] and config [`Error`].

mod run_config;
mod run_options;

pub use run_config::{Error, LlmChoice, RunConfig};
pub use run_options::RunOptions;
