use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{DefinitionError, QuestionId};

/// Option label stored for an affirmative yes/no answer.
pub const YES: &str = "yes";

/// Option label stored for a negative yes/no answer.
pub const NO: &str = "no";

/// Lower rating bound used when the definition does not carry one.
pub const DEFAULT_MIN_RATING: i64 = 1;

/// Upper rating bound used when the definition does not carry one.
pub const DEFAULT_MAX_RATING: i64 = 5;

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Identifier, unique within the survey.
    id: QuestionId,

    /// The prompt text shown to the respondent.
    prompt: String,

    /// Whether an answer is mandatory at submit time.
    required: bool,

    /// The kind of question (determines input widget and answer shape).
    kind: QuestionKind,
}

impl Question {
    /// Create a new, optional question.
    pub fn new(id: impl Into<QuestionId>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            required: false,
            kind,
        }
    }

    /// Create a free-text question.
    pub fn free_text(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self::new(id, prompt, QuestionKind::FreeText)
    }

    /// Create a yes/no question.
    pub fn yes_no(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self::new(id, prompt, QuestionKind::YesNo)
    }

    /// Create a single-select question.
    pub fn single_select<I, S>(id: impl Into<QuestionId>, prompt: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, prompt, QuestionKind::SingleSelect(ChoiceQuestion::new(options)))
    }

    /// Create a multi-select question.
    pub fn multi_select<I, S>(id: impl Into<QuestionId>, prompt: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, prompt, QuestionKind::MultiSelect(ChoiceQuestion::new(options)))
    }

    /// Create a rating question with inclusive bounds.
    pub fn rating(id: impl Into<QuestionId>, prompt: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(id, prompt, QuestionKind::Rating(RatingQuestion::new(min, max)))
    }

    /// Mark this question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Get the identifier.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Whether the question must be answered.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Check the per-question invariants: select questions carry options,
    /// rating bounds are ordered.
    pub fn check(&self) -> Result<(), DefinitionError> {
        self.kind.check(self.id.as_str())
    }

    fn from_raw(raw: RawQuestion) -> Result<Self, DefinitionError> {
        let id = raw.id.ok_or(DefinitionError::MissingQuestionId)?;
        let kind = QuestionKind::from_wire(
            raw.question_type,
            raw.options,
            raw.min_rating,
            raw.max_rating,
        );
        let question = Self {
            id,
            prompt: raw.question,
            required: raw.required,
            kind,
        };
        question.check()?;
        Ok(question)
    }

    fn to_raw(&self) -> RawQuestion {
        let (question_type, options, min_rating, max_rating) = self.kind.to_wire();
        RawQuestion {
            id: Some(self.id.clone()),
            question_type,
            question: self.prompt.clone(),
            required: self.required,
            options,
            min_rating,
            max_rating,
        }
    }
}

impl Serialize for Question {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Question {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawQuestion::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

/// The kind of question, determining input widget and answer shape.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Multi-line free text. Answer: a string.
    FreeText,

    /// Any number of options. Answer: the chosen labels, in option order.
    MultiSelect(ChoiceQuestion),

    /// Exactly one option. Answer: the chosen label.
    SingleSelect(ChoiceQuestion),

    /// Bounded integer. Answer: the rating.
    Rating(RatingQuestion),

    /// Single choice between [`YES`] and [`NO`]. Answer: the chosen label.
    YesNo,
}

impl QuestionKind {
    /// The wire tag for this kind.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::FreeText => QuestionType::Text,
            Self::MultiSelect(_) => QuestionType::MultipleChoice,
            Self::SingleSelect(_) => QuestionType::SingleChoice,
            Self::Rating(_) => QuestionType::Rating,
            Self::YesNo => QuestionType::YesNo,
        }
    }

    /// The option labels of a select question. Yes/no questions have a fixed
    /// set, see [`QuestionKind::choice_labels`].
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::MultiSelect(choice) | Self::SingleSelect(choice) => Some(choice.options()),
            _ => None,
        }
    }

    /// The labels a respondent picks from, including the fixed yes/no pair.
    pub fn choice_labels(&self) -> Vec<&str> {
        match self {
            Self::MultiSelect(choice) | Self::SingleSelect(choice) => {
                choice.options().iter().map(String::as_str).collect()
            }
            Self::YesNo => vec![YES, NO],
            Self::FreeText | Self::Rating(_) => Vec::new(),
        }
    }

    /// Check the kind-specific invariants. `label` names the question in errors.
    pub fn check(&self, label: &str) -> Result<(), DefinitionError> {
        match self {
            Self::MultiSelect(choice) | Self::SingleSelect(choice) if choice.options.is_empty() => {
                Err(DefinitionError::NoOptions(label.to_string()))
            }
            Self::Rating(rating) if rating.max < rating.min => {
                Err(DefinitionError::InvertedRating {
                    question: label.to_string(),
                    min: rating.min,
                    max: rating.max,
                })
            }
            _ => Ok(()),
        }
    }

    fn from_wire(
        question_type: QuestionType,
        options: Option<Vec<String>>,
        min_rating: Option<i64>,
        max_rating: Option<i64>,
    ) -> Self {
        match question_type {
            QuestionType::Text => Self::FreeText,
            QuestionType::MultipleChoice => {
                Self::MultiSelect(ChoiceQuestion::new(options.unwrap_or_default()))
            }
            QuestionType::SingleChoice => {
                Self::SingleSelect(ChoiceQuestion::new(options.unwrap_or_default()))
            }
            QuestionType::Rating => Self::Rating(RatingQuestion::new(
                min_rating.unwrap_or(DEFAULT_MIN_RATING),
                max_rating.unwrap_or(DEFAULT_MAX_RATING),
            )),
            QuestionType::YesNo => Self::YesNo,
        }
    }

    fn to_wire(&self) -> (QuestionType, Option<Vec<String>>, Option<i64>, Option<i64>) {
        match self {
            Self::MultiSelect(choice) | Self::SingleSelect(choice) => {
                (self.question_type(), Some(choice.options.clone()), None, None)
            }
            Self::Rating(rating) => (
                QuestionType::Rating,
                None,
                Some(rating.min),
                Some(rating.max),
            ),
            Self::FreeText | Self::YesNo => (self.question_type(), None, None, None),
        }
    }
}

/// The `type` tag of a question on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Text,
    MultipleChoice,
    SingleChoice,
    Rating,
    YesNo,
}

impl QuestionType {
    /// The wire tag, e.g. `multiple-choice`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MultipleChoice => "multiple-choice",
            Self::SingleChoice => "single-choice",
            Self::Rating => "rating",
            Self::YesNo => "yes-no",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration shared by single- and multi-select questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceQuestion {
    /// The option labels, in display order.
    options: Vec<String>,
}

impl ChoiceQuestion {
    /// Create from option labels.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the option labels.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Position of a label in the option list.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o == label)
    }

    /// Drop options that are blank after trimming.
    pub fn without_blank_options(self) -> Self {
        Self {
            options: self
                .options
                .into_iter()
                .filter(|o| !o.trim().is_empty())
                .collect(),
        }
    }
}

/// Configuration for a rating question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingQuestion {
    /// Inclusive lower bound.
    pub min: i64,

    /// Inclusive upper bound.
    pub max: i64,
}

impl RatingQuestion {
    /// Create with bounds.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for RatingQuestion {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RATING, DEFAULT_MAX_RATING)
    }
}

/// A question being authored; the server assigns its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    /// The prompt text.
    pub prompt: String,

    /// Whether an answer is mandatory.
    pub required: bool,

    /// The kind of question.
    pub kind: QuestionKind,
}

impl NewQuestion {
    /// Create a new, optional question.
    pub fn new(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            prompt: prompt.into(),
            required: false,
            kind,
        }
    }

    /// Drop blank options from select questions.
    pub fn normalized(self) -> Self {
        let kind = match self.kind {
            QuestionKind::MultiSelect(choice) => {
                QuestionKind::MultiSelect(choice.without_blank_options())
            }
            QuestionKind::SingleSelect(choice) => {
                QuestionKind::SingleSelect(choice.without_blank_options())
            }
            other => other,
        };
        Self { kind, ..self }
    }

    fn to_raw(&self) -> RawQuestion {
        let (question_type, options, min_rating, max_rating) = self.kind.to_wire();
        RawQuestion {
            id: None,
            question_type,
            question: self.prompt.clone(),
            required: self.required,
            options,
            min_rating,
            max_rating,
        }
    }
}

impl Serialize for NewQuestion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NewQuestion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Authoring input is checked by `NewSurvey::normalized`, after blank
        // options have been dropped.
        let raw = RawQuestion::deserialize(deserializer)?;
        Ok(Self {
            prompt: raw.question,
            required: raw.required,
            kind: QuestionKind::from_wire(
                raw.question_type,
                raw.options,
                raw.min_rating,
                raw.max_rating,
            ),
        })
    }
}

/// Question layout on the wire.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<QuestionId>,

    #[serde(rename = "type")]
    question_type: QuestionType,

    question: String,

    #[serde(default)]
    required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_rating: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_rating: Option<i64>,
}
