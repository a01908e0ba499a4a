//! Run config: service settings plus which generation backend to use. Filled from env / .env.

use interview_graph::ServiceConfig;

/// Error type used across the CLI.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Generation backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmChoice {
    /// Canned replies; the reviewer returns `review_scores` in order, then 90.
    Offline { review_scores: Vec<u8> },
    /// OpenAI-compatible endpoint from `OPENAI_*` variables.
    OpenAi,
}

/// Everything a command needs to build an [`InterviewService`](interview_graph::InterviewService).
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub service: ServiceConfig,
    pub llm: LlmChoice,
    /// When true, library debug logs (node enter/exit, checkpoints) go to stderr.
    pub verbose: bool,
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

impl RunConfig {
    /// Fill config from env vars (and .env, once loaded by the caller).
    ///
    /// Service variables are those of [`ServiceConfig::from_env`]; `OFFLINE_LLM=1`
    /// selects canned replies. `OPENAI_API_KEY` is only checked when a model is
    /// actually built.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let offline = lookup("OFFLINE_LLM").map(|v| is_truthy(&v)).unwrap_or(false);
        Ok(Self {
            service: ServiceConfig::from_lookup(&lookup)?,
            llm: if offline {
                LlmChoice::Offline {
                    review_scores: Vec::new(),
                }
            } else {
                LlmChoice::OpenAi
            },
            verbose: false,
        })
    }

    /// Apply optional overrides from `RunOptions` to this config.
    ///
    /// Only set fields override; `review_scores` switches to offline replies even
    /// without `mock`.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(path) = &options.db_path {
            self.service.db_path = path.clone();
        }
        if let Some(scores) = &options.review_scores {
            self.llm = LlmChoice::Offline {
                review_scores: scores.clone(),
            };
        } else if options.mock {
            self.llm = LlmChoice::Offline {
                review_scores: Vec::new(),
            };
        }
        if let Some(score) = options.pass_score {
            self.service.pass_score = score;
        }
        if let Some(n) = options.max_iterations {
            self.service.max_iterations = n;
        }
        self.verbose = options.verbose;
    }

    /// Config for commands that only read or prune checkpoints and never generate.
    pub fn without_llm(mut self) -> Self {
        self.llm = LlmChoice::Offline {
            review_scores: Vec::new(),
        };
        self
    }
}
