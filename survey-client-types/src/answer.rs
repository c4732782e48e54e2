use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{QuestionId, QuestionKind};

/// The value of one answer. Its shape follows the question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free-text, single-select and yes/no answers.
    Text(String),

    /// Multi-select answers, in option order.
    Choices(Vec<String>),

    /// Rating answers.
    Rating(i64),
}

impl AnswerValue {
    /// Try to get this value as a string reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a list of chosen labels.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(choices) => Some(choices),
            _ => None,
        }
    }

    /// Try to get this value as a rating.
    pub fn as_rating(&self) -> Option<i64> {
        match self {
            Self::Rating(r) => Some(*r),
            _ => None,
        }
    }

    /// Whether this value has the shape `kind` expects.
    pub fn fits(&self, kind: &QuestionKind) -> bool {
        matches!(
            (self, kind),
            (
                Self::Text(_),
                QuestionKind::FreeText | QuestionKind::SingleSelect(_) | QuestionKind::YesNo
            ) | (Self::Choices(_), QuestionKind::MultiSelect(_))
                | (Self::Rating(_), QuestionKind::Rating(_))
        )
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choices(_) => "Choices",
            Self::Rating(_) => "Rating",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Choices(choices) => f.write_str(&choices.join(", ")),
            Self::Rating(r) => write!(f, "{r}"),
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for AnswerValue {
    fn from(r: i64) -> Self {
        Self::Rating(r)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(choices: Vec<String>) -> Self {
        Self::Choices(choices)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(choices: Vec<&str>) -> Self {
        Self::Choices(choices.into_iter().map(String::from).collect())
    }
}

/// One entry of a submission: the answer to a single question.
///
/// `answer` is `None` only for a rating that was never set; it is then left
/// out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerValue>,
}

impl Answer {
    /// Create an answer entry.
    pub fn new(question_id: impl Into<QuestionId>, answer: Option<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceQuestion, RatingQuestion};

    #[test]
    fn untagged_shapes() {
        let text: AnswerValue = serde_json::from_str("\"hello\"").unwrap();
        let choices: AnswerValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        let rating: AnswerValue = serde_json::from_str("4").unwrap();

        assert_eq!(text, AnswerValue::from("hello"));
        assert_eq!(choices, AnswerValue::from(vec!["a", "b"]));
        assert_eq!(rating, AnswerValue::Rating(4));
    }

    #[test]
    fn unset_rating_is_omitted() {
        let answer = Answer::new("q1", None);
        assert_eq!(
            serde_json::to_string(&answer).unwrap(),
            r#"{"questionId":"q1"}"#
        );
    }

    #[test]
    fn shape_must_fit_kind() {
        let multi = QuestionKind::MultiSelect(ChoiceQuestion::new(["a"]));
        let rating = QuestionKind::Rating(RatingQuestion::default());

        assert!(AnswerValue::from(vec!["a"]).fits(&multi));
        assert!(!AnswerValue::from("a").fits(&multi));
        assert!(AnswerValue::Rating(3).fits(&rating));
        assert!(AnswerValue::from("yes").fits(&QuestionKind::YesNo));
        assert!(!AnswerValue::Rating(1).fits(&QuestionKind::FreeText));
    }

    #[test]
    fn displays_as_entered() {
        assert_eq!(AnswerValue::from("Thai").to_string(), "Thai");
        assert_eq!(AnswerValue::from(vec!["red", "blue"]).to_string(), "red, blue");
        assert_eq!(AnswerValue::Rating(7).to_string(), "7");
    }
}
