use serde::{Deserialize, Serialize};

/// One generated interview question with its reference answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    /// e.g. "Technical" or "HR/Behavioral".
    pub category: String,
    pub question: String,
    /// Key points a good answer should cover.
    pub reference_answer: String,
}

impl Question {
    pub fn new(
        category: impl Into<String>,
        question: impl Into<String>,
        reference_answer: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            question: question.into(),
            reference_answer: reference_answer.into(),
        }
    }
}
