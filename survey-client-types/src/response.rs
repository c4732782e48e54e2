use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Answer, AnswerValue, QuestionId};

/// The submission payload: one answer per question, in survey order.
///
/// Built once at submit time and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub survey_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_age: Option<u32>,
}

impl SurveyResponse {
    /// The answer value submitted for a question, if any.
    pub fn answer_for(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|a| &a.question_id == id)
            .and_then(|a| a.answer.as_ref())
    }
}

/// A response as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponseRecord {
    pub id: String,
    pub survey_id: String,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_age: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_skips_absent_respondent_fields() {
        let payload = SurveyResponse {
            survey_id: "s1".to_string(),
            user_id: None,
            answers: vec![Answer::new("q1", Some(AnswerValue::from("hi")))],
            respondent_name: Some("Ann".to_string()),
            respondent_email: None,
            respondent_age: None,
        };
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["surveyId"], "s1");
        assert_eq!(value["respondentName"], "Ann");
        assert!(value.get("respondentEmail").is_none());
        assert!(value.get("userId").is_none());
        assert_eq!(value["answers"][0]["answer"], "hi");
    }

    #[test]
    fn decodes_record() {
        let json = r#"{
            "id": "r1",
            "surveyId": "s1",
            "answers": [{"questionId": "q1", "answer": ["a", "b"]}, {"questionId": "q2", "answer": 3}],
            "submittedAt": "2024-05-01T08:30:00Z",
            "respondentAge": 41
        }"#;
        let record: SurveyResponseRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.answers.len(), 2);
        assert_eq!(record.answers[1].answer, Some(AnswerValue::Rating(3)));
        assert_eq!(record.respondent_age, Some(41));
    }
}
