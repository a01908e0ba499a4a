use std::sync::Arc;

use crate::graph::{
    CompilationError, CompiledStateGraph, LoggingNodeMiddleware, StateGraph, END, START,
};
use crate::llm::LlmClient;
use crate::memory::Checkpointer;
use crate::state::InterviewState;

use super::nodes::{HrNode, HumanReviewNode, ParserNode, ResearcherNode, ReviewerNode, TechLeadNode};
use super::router::{QualityGate, Verdict, HUMAN_APPROVED, HUMAN_REVISE};
use super::{AWAITING_HUMAN, HR_DRAFTING, PARSING, RESEARCHING, REVIEWING, TECH_DRAFTING};

/// Builds the interview graph with `llm` behind every generation step and
/// `gate` deciding after each review.
pub fn build_interview_graph(
    llm: Arc<dyn LlmClient>,
    gate: QualityGate,
) -> StateGraph<InterviewState> {
    let mut graph = StateGraph::<InterviewState>::new();
    graph
        .add_node(PARSING, Arc::new(ParserNode::new(llm.clone())))
        .add_node(TECH_DRAFTING, Arc::new(TechLeadNode::new(llm.clone())))
        .add_node(HR_DRAFTING, Arc::new(HrNode::new(llm.clone())))
        .add_node(RESEARCHING, Arc::new(ResearcherNode::new(llm.clone())))
        .add_node(REVIEWING, Arc::new(ReviewerNode::new(llm)))
        .add_node(AWAITING_HUMAN, Arc::new(HumanReviewNode))
        .add_edge(START, PARSING)
        .add_edge(PARSING, TECH_DRAFTING)
        .add_edge(PARSING, HR_DRAFTING)
        .add_edge(PARSING, RESEARCHING)
        .add_edge(HR_DRAFTING, END)
        .add_edge(RESEARCHING, END)
        .add_edge(TECH_DRAFTING, REVIEWING)
        .add_conditional_edges(
            REVIEWING,
            Arc::new(move |s: &InterviewState| gate.evaluate(s).as_str().to_string()),
            [
                (Verdict::Approved.as_str(), END),
                (Verdict::ForceApproved.as_str(), END),
                (Verdict::HumanReviewNeeded.as_str(), AWAITING_HUMAN),
            ],
        )
        .add_conditional_edges(
            AWAITING_HUMAN,
            Arc::new(move |s: &InterviewState| gate.human_route(s).to_string()),
            [(HUMAN_APPROVED, END), (HUMAN_REVISE, TECH_DRAFTING)],
        )
        .interrupt_before([AWAITING_HUMAN]);
    graph
}

/// Compiles the interview graph with `checkpointer` and node logging.
pub(crate) fn compile_interview_graph(
    llm: Arc<dyn LlmClient>,
    gate: QualityGate,
    checkpointer: Arc<dyn Checkpointer<InterviewState>>,
) -> Result<CompiledStateGraph<InterviewState>, CompilationError> {
    build_interview_graph(llm, gate)
        .compile_with_checkpointer_and_middleware(checkpointer, Arc::new(LoggingNodeMiddleware))
}
