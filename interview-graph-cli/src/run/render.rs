//! Plain-text rendering of checkpoints for the terminal.

use std::fmt::Write;

use interview_graph::{Checkpoint, CheckpointStatus, CheckpointSummary, InterviewState, Question};

/// Full view of one execution: status, parsed profile, questions and the review loop.
pub fn render_checkpoint(checkpoint: &Checkpoint<InterviewState>) -> String {
    let s = &checkpoint.state;
    let mut out = String::new();
    let _ = writeln!(out, "execution: {}", checkpoint.thread_id);
    let _ = write!(out, "status:    {}", checkpoint.status);
    if checkpoint.status == CheckpointStatus::Paused {
        let _ = write!(out, " (before {})", checkpoint.pending.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "requester: {}", s.requester);
    if !s.company_name.is_empty() {
        let _ = writeln!(out, "company:   {}", s.company_name);
        let _ = writeln!(out, "stack:     {}", s.tech_stack.join(", "));
        let _ = writeln!(out, "years:     {}", s.years_required);
    }
    let _ = writeln!(
        out,
        "review:    score {} after {} draft(s)",
        s.quality_score, s.iteration_count
    );
    if !s.review_comment.is_empty() {
        let _ = writeln!(out, "comment:   {}", s.review_comment);
    }
    if let Some(feedback) = &s.human_feedback {
        let _ = writeln!(out, "feedback:  {}", feedback);
    }
    if !s.company_info.is_empty() {
        let _ = writeln!(out, "\nCompany research\n  {}", s.company_info);
    }
    render_questions(&mut out, "Technical questions", &s.tech_questions);
    render_questions(&mut out, "Behavioural questions", &s.hr_questions);
    out
}

fn render_questions(out: &mut String, title: &str, questions: &[Question]) {
    if questions.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title);
    for (i, q) in questions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, q.question);
        if !q.reference_answer.is_empty() {
            let _ = writeln!(out, "     answer: {}", q.reference_answer);
        }
    }
}

/// One line per execution, most recent first.
pub fn render_summaries(summaries: &[CheckpointSummary]) -> String {
    if summaries.is_empty() {
        return "no executions\n".to_string();
    }
    let mut out = String::new();
    for s in summaries {
        let _ = write!(out, "{:<40} {:<9} step {:>3}", s.thread_id, s.status.as_str(), s.step);
        if !s.pending.is_empty() {
            let _ = write!(out, "  pending: {}", s.pending.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}
