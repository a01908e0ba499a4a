//! Interview preparation pipeline built on the graph engine.
//!
//! ```text
//! START -> parsing -+-> tech_drafting -> reviewing --(quality gate)--> END
//!                   |        ^                      \
//!                   |        |                       -> [pause] awaiting_human
//!                   |        +------------(revise)----------------/  |
//!                   +-> hr_drafting -> END                 (approved) -> END
//!                   +-> researching -> END
//! ```
//!
//! [`InterviewService`] is the entry point: it owns the compiled graph, the
//! checkpoint store and the progress hub, and exposes start / resume.

mod graph;
pub mod nodes;
mod offline;
mod router;
mod service;

pub use graph::build_interview_graph;
pub use offline::offline_llm;
pub use router::{QualityGate, Verdict, HUMAN_APPROVED, HUMAN_REVISE};
pub use service::{
    execution_id, Approval, InterviewService, Reclaimed, ResumeAction, RunOutcome, RunReport,
    ServiceError, StartRequest, APPROVED_FEEDBACK,
};

pub const PARSING: &str = "parsing";
pub const TECH_DRAFTING: &str = "tech_drafting";
pub const HR_DRAFTING: &str = "hr_drafting";
pub const RESEARCHING: &str = "researching";
pub const REVIEWING: &str = "reviewing";
pub const AWAITING_HUMAN: &str = "awaiting_human";

/// Task names passed as `LlmRequest::task`; `MockLlm` keys its replies by them.
pub mod tasks {
    pub const PARSE_JD: &str = "parse_jd";
    pub const DRAFT_TECH: &str = "draft_tech";
    pub const DRAFT_HR: &str = "draft_hr";
    pub const RESEARCH_COMPANY: &str = "research_company";
    pub const REVIEW: &str = "review";
}
