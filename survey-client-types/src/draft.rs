use std::collections::HashMap;

use crate::{AnswerValue, QuestionId};

/// In-progress answer values, keyed by question identifier.
///
/// A question with no entry has not been answered (or, for ratings, the
/// slider was never moved).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    values: HashMap<QuestionId, AnswerValue>,
}

impl Draft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert a value for the given question.
    pub fn insert(&mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Get the value for the given question.
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Get the number of drafted answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing has been drafted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every drafted value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// One of the three respondent fields shown on the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RespondentField {
    Name,
    Email,
    Age,
}

/// Raw respondent input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RespondentDraft {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl RespondentDraft {
    /// Get the raw text of a field.
    pub fn get(&self, field: RespondentField) -> &str {
        match field {
            RespondentField::Name => &self.name,
            RespondentField::Email => &self.email,
            RespondentField::Age => &self.age,
        }
    }

    /// Replace the raw text of a field.
    pub fn set(&mut self, field: RespondentField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RespondentField::Name => self.name = value,
            RespondentField::Email => self.email = value,
            RespondentField::Age => self.age = value,
        }
    }
}
