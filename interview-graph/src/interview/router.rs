//! Quality gate and human gate: the two routers of the interview graph.

use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::state::InterviewState;

/// Outcome of the quality gate after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Score met the pass threshold.
    Approved,
    /// Too many drafting passes; approved regardless of score.
    ForceApproved,
    /// Score below threshold; pause for a human decision.
    HumanReviewNeeded,
}

impl Verdict {
    /// Route key used in the reviewing node's path map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::ForceApproved => "force_approved",
            Verdict::HumanReviewNeeded => "human_review_needed",
        }
    }
}

/// Route keys out of the human review point.
pub const HUMAN_APPROVED: &str = "approved";
pub const HUMAN_REVISE: &str = "revise";

/// Thresholds for the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGate {
    /// Approval is forced once `iteration_count` exceeds this.
    pub max_iterations: u32,
    /// Minimum review score for approval.
    pub pass_score: u8,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            pass_score: 85,
        }
    }
}

impl From<&ServiceConfig> for QualityGate {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            pass_score: config.pass_score,
        }
    }
}

impl QualityGate {
    /// Evaluates, in order: iteration bound, then score, else human review.
    pub fn evaluate(&self, state: &InterviewState) -> Verdict {
        if state.iteration_count > self.max_iterations {
            Verdict::ForceApproved
        } else if state.quality_score >= self.pass_score {
            Verdict::Approved
        } else {
            Verdict::HumanReviewNeeded
        }
    }

    /// Route after a resumed human review: a passing score (an approval
    /// override) finishes the run, anything else goes back to drafting.
    pub fn human_route(&self, state: &InterviewState) -> &'static str {
        if state.quality_score >= self.pass_score {
            HUMAN_APPROVED
        } else {
            HUMAN_REVISE
        }
    }
}
