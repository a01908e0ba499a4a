//! Optional overrides for a run (CLI flags or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options). Callers build a
//! `RunOptions` and apply it to the env-based config.

/// Optional overrides: DB path, offline generation, quality gate thresholds, verbosity.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override SQLite database path for checkpoints.
    pub db_path: Option<String>,
    /// Use canned offline replies instead of a model.
    pub mock: bool,
    /// Review scores the offline reviewer returns, in order. Implies `mock`.
    pub review_scores: Option<Vec<u8>>,
    /// Override the review score needed to pass (0-100).
    pub pass_score: Option<u8>,
    /// Override the drafting passes after which approval is forced.
    pub max_iterations: Option<u32>,
    pub verbose: bool,
}
