//! Typed partial update for [`InterviewState`](super::InterviewState).

use serde::{Deserialize, Deserializer, Serialize};

use super::{Question, StateError};

/// Partial update returned by a node or supplied as resume overrides.
///
/// Each `Some` field overwrites the matching state field wholesale; `None`
/// leaves it alone. `human_feedback` is tri-state: `None` = untouched,
/// `Some(None)` = clear, `Some(Some(text))` = set.
///
/// Input fields are deliberately absent, and unknown fields are rejected on
/// deserialization, so an override such as `{"jd_text": "..."}` fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_responsibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub human_feedback: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (clear) from an absent key (untouched).
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl StateUpdate {
    /// Decodes a dynamic override map, rejecting unknown and input fields.
    pub fn from_json(value: serde_json::Value) -> Result<Self, StateError> {
        serde_json::from_value(value).map_err(|e| StateError::InvalidOverride(e.to_string()))
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Names of the fields this update writes.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        macro_rules! mark {
            ($($field:ident),*) => {
                $(if self.$field.is_some() { out.push(stringify!($field)); })*
            };
        }
        mark!(
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
            human_feedback
        );
        out
    }
}
