use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DefinitionError, NewQuestion, Question, QuestionId};

/// A survey as published by the server.
///
/// Immutable once fetched; only the server creates or changes surveys.
/// Construction checks the invariants: non-empty title, at least one
/// question, unique question identifiers, and the per-question rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<String>,
    is_published: bool,
}

impl Survey {
    /// Create a survey, checking its invariants. Timestamps are set to now.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, DefinitionError> {
        let now = Utc::now();
        let survey = Self {
            id: id.into(),
            title: title.into(),
            description: None,
            questions,
            created_at: now,
            updated_at: now,
            author_id: None,
            author_name: None,
            is_published: true,
        };
        survey.check()?;
        Ok(survey)
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the author reference.
    pub fn with_author(mut self, id: impl Into<String>, name: Option<String>) -> Self {
        self.author_id = Some(id.into());
        self.author_name = name;
        self
    }

    fn check(&self) -> Result<(), DefinitionError> {
        if self.title.trim().is_empty() {
            return Err(DefinitionError::EmptyTitle);
        }
        if self.questions.is_empty() {
            return Err(DefinitionError::NoQuestions);
        }
        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id()) {
                return Err(DefinitionError::DuplicateQuestion(
                    question.id().to_string(),
                ));
            }
            question.check()?;
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The questions, in survey order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by identifier.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Get the number of questions. Never zero.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author_id.as_deref()
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }
}

impl<'de> Deserialize<'de> for Survey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSurvey::deserialize(deserializer)?;
        let survey = Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            questions: raw.questions,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            author_id: raw.author_id,
            author_name: raw.author_name,
            is_published: raw.is_published.unwrap_or(true),
        };
        survey.check().map_err(serde::de::Error::custom)?;
        Ok(survey)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSurvey {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, alias = "userId")]
    author_id: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    is_published: Option<bool>,
}

/// Input for authoring a new survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvey {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<NewQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

fn published_by_default() -> bool {
    true
}

impl NewSurvey {
    /// Create authoring input with the given title and questions.
    pub fn new(title: impl Into<String>, questions: Vec<NewQuestion>) -> Self {
        Self {
            title: title.into(),
            description: None,
            questions,
            user_id: None,
            is_published: true,
        }
    }

    /// Drop blank options and blank descriptions, then check what is left.
    pub fn normalized(self) -> Result<Self, DefinitionError> {
        if self.title.trim().is_empty() {
            return Err(DefinitionError::EmptyTitle);
        }
        if self.questions.is_empty() {
            return Err(DefinitionError::NoQuestions);
        }
        let questions: Vec<NewQuestion> =
            self.questions.into_iter().map(NewQuestion::normalized).collect();
        for (index, question) in questions.iter().enumerate() {
            let label = format!("#{}", index + 1);
            if question.prompt.trim().is_empty() {
                return Err(DefinitionError::EmptyPrompt(label));
            }
            question.kind.check(&label)?;
        }
        Ok(Self {
            description: self.description.filter(|d| !d.trim().is_empty()),
            questions,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceQuestion, QuestionKind};

    const SURVEY_JSON: &str = r#"{
        "id": "s1",
        "title": "Lunch",
        "questions": [
            {"id": "q1", "type": "text", "question": "Comments?"},
            {"id": "q2", "type": "yes-no", "question": "Hungry?", "required": true}
        ],
        "createdAt": "2024-03-01T12:00:00Z",
        "updatedAt": "2024-03-02T12:00:00Z",
        "userId": "u7"
    }"#;

    #[test]
    fn decodes_survey() {
        let survey: Survey = serde_json::from_str(SURVEY_JSON).unwrap();

        assert_eq!(survey.id(), "s1");
        assert_eq!(survey.len(), 2);
        assert_eq!(survey.author_id(), Some("u7"));
        assert!(survey.is_published());
        assert!(survey.question(&QuestionId::new("q2")).unwrap().is_required());
    }

    #[test]
    fn rejects_survey_without_questions() {
        assert_eq!(
            Survey::new("s1", "Empty", vec![]).unwrap_err(),
            DefinitionError::NoQuestions
        );
    }

    #[test]
    fn rejects_blank_title() {
        let questions = vec![Question::free_text("q1", "?")];
        assert_eq!(
            Survey::new("s1", "  ", questions).unwrap_err(),
            DefinitionError::EmptyTitle
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let questions = vec![Question::free_text("q1", "a"), Question::yes_no("q1", "b")];
        assert_eq!(
            Survey::new("s1", "Dupes", questions).unwrap_err(),
            DefinitionError::DuplicateQuestion("q1".to_string())
        );
    }

    #[test]
    fn new_survey_rejects_select_with_only_blank_options() {
        let input = NewSurvey::new(
            "Poll",
            vec![NewQuestion::new(
                "Pick one",
                QuestionKind::SingleSelect(ChoiceQuestion::new(["", "  "])),
            )],
        );
        assert_eq!(
            input.normalized().unwrap_err(),
            DefinitionError::NoOptions("#1".to_string())
        );
    }

    #[test]
    fn new_survey_decodes_with_defaults() {
        let json = r#"{"title":"Poll","questions":[{"type":"rating","question":"Rate"}]}"#;
        let input: NewSurvey = serde_json::from_str(json).unwrap();
        let input = input.normalized().unwrap();

        assert!(input.is_published);
        assert_eq!(
            input.questions[0].kind,
            QuestionKind::Rating(crate::RatingQuestion::new(1, 5))
        );
    }
}
