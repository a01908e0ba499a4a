//! Canned generation replies for offline runs (`--mock`, demos, tests).

use serde_json::json;

use crate::llm::MockLlm;

use super::tasks;

/// A `MockLlm` answering every interview task with fixed content.
///
/// Reviews return `review_scores` in order, the last one repeating; an empty
/// slice reviews every draft at 90.
pub fn offline_llm(review_scores: &[u8]) -> MockLlm {
    let mut llm = MockLlm::new()
        .with_reply(
            tasks::PARSE_JD,
            json!({
                "company_name": "Acme Cloud",
                "tech_stack": ["Go", "Kubernetes", "PostgreSQL"],
                "years_required": "5+",
                "soft_skills": ["ownership", "communication"],
                "core_responsibility": "Build and operate the billing platform"
            }),
        )
        .with_reply(
            tasks::DRAFT_TECH,
            json!({"questions": [
                {"category": "Technical", "question": "How does the Go scheduler multiplex goroutines onto threads?",
                 "reference_answer": "G/M/P model, work stealing, preemption"},
                {"category": "Technical", "question": "A pod is stuck in CrashLoopBackOff. How do you debug it?",
                 "reference_answer": "describe, logs --previous, liveness checks, resource limits"},
                {"category": "Technical", "question": "How would you make invoice generation idempotent?",
                 "reference_answer": "idempotency keys, unique constraints, transactional outbox"}
            ]}),
        )
        .with_reply(
            tasks::DRAFT_HR,
            json!({"questions": [
                {"category": "HR/Behavioral", "question": "Tell me about an incident you owned end to end.",
                 "reference_answer": "STAR; clear ownership and follow-up"},
                {"category": "HR/Behavioral", "question": "Describe a disagreement with a colleague and how it ended.",
                 "reference_answer": "STAR; listening, compromise, outcome"}
            ]}),
        )
        .with_reply(
            tasks::RESEARCH_COMPANY,
            json!({"summary": "Acme Cloud sells usage-based infrastructure to mid-size retailers."}),
        );
    if review_scores.is_empty() {
        return llm.with_reply(tasks::REVIEW, json!({"score": 90, "comment": "Solid coverage."}));
    }
    for score in review_scores {
        let comment = if *score >= 85 {
            "Solid coverage."
        } else {
            "Questions are too shallow for the seniority."
        };
        llm = llm.with_reply(tasks::REVIEW, json!({"score": score, "comment": comment}));
    }
    llm
}
