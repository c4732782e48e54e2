use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{QuestionId, QuestionType};

/// Aggregate statistics for one survey, computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub survey_id: String,
    pub total_responses: u64,
    pub question_stats: Vec<QuestionStat>,
}

/// Per-question aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStat {
    pub question_id: QuestionId,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Answer label (or rating) to count.
    #[serde(default)]
    pub responses: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl QuestionStat {
    /// Sum of all counted answers.
    pub fn answered(&self) -> u64 {
        self.responses.values().sum()
    }
}
