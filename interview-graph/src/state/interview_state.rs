//! The interview pipeline's state record.

use serde::{Deserialize, Serialize};

use super::{GraphState, Question, StateError, StateUpdate};

/// Shared state for one interview-preparation run.
///
/// Inputs (`jd_text`, `requester`) are set by [`InterviewState::new`] and have
/// no counterpart in [`StateUpdate`], so no step and no override can change
/// them. Every other field starts at its zero value; a field missing from a
/// serialized record deserializes to its zero value as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewState {
    // inputs
    pub jd_text: String,
    pub requester: String,

    // written by parsing
    pub company_name: String,
    pub tech_stack: Vec<String>,
    pub years_required: String,
    pub soft_skills: Vec<String>,
    pub core_responsibility: String,

    // branch outputs
    pub company_info: String,
    pub tech_questions: Vec<Question>,
    pub hr_questions: Vec<Question>,

    // quality loop
    /// Number of completed tech drafting passes.
    pub iteration_count: u32,
    /// 0..=100, written by the reviewer (or a human approval).
    pub quality_score: u8,
    pub review_comment: String,
    /// Reviewer instruction for the next drafting pass; cleared once consumed.
    pub human_feedback: Option<String>,
}

impl InterviewState {
    /// Creates a fresh record with inputs set and everything else at zero value.
    pub fn new(jd_text: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            jd_text: jd_text.into(),
            requester: requester.into(),
            ..Default::default()
        }
    }
}

impl GraphState for InterviewState {
    type Update = StateUpdate;

    fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            company_name,
            tech_stack,
            years_required,
            soft_skills,
            core_responsibility,
            company_info,
            tech_questions,
            hr_questions,
            iteration_count,
            quality_score,
            review_comment,
            human_feedback,
        } = update;

        if let Some(v) = company_name {
            self.company_name = v;
        }
        if let Some(v) = tech_stack {
            self.tech_stack = v;
        }
        if let Some(v) = years_required {
            self.years_required = v;
        }
        if let Some(v) = soft_skills {
            self.soft_skills = v;
        }
        if let Some(v) = core_responsibility {
            self.core_responsibility = v;
        }
        if let Some(v) = company_info {
            self.company_info = v;
        }
        if let Some(v) = tech_questions {
            self.tech_questions = v;
        }
        if let Some(v) = hr_questions {
            self.hr_questions = v;
        }
        if let Some(v) = iteration_count {
            self.iteration_count = v;
        }
        if let Some(v) = quality_score {
            self.quality_score = v;
        }
        if let Some(v) = review_comment {
            self.review_comment = v;
        }
        if let Some(v) = human_feedback {
            self.human_feedback = v;
        }
    }

    fn validate(update: &StateUpdate) -> Result<(), StateError> {
        if let Some(score) = update.quality_score {
            if score > 100 {
                return Err(StateError::OutOfRange {
                    field: "quality_score",
                    reason: format!("{} is above 100", score),
                });
            }
        }
        Ok(())
    }

    fn update_fields(update: &StateUpdate) -> Vec<&'static str> {
        update.fields()
    }
}
