//! Validation schema derived from a survey definition.
//!
//! The schema is a pure function of the survey: one field per question plus
//! the three fixed respondent fields. Only required questions carry a rule;
//! an optional question accepts anything of the right shape, including no
//! value at all.

use std::collections::HashMap;
use std::fmt;

use validator::ValidateEmail;

use crate::{
    AnswerValue, Draft, QuestionId, QuestionKind, RespondentDraft, RespondentField, Survey,
};

/// Identifies one validated field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Question(QuestionId),
    Respondent(RespondentField),
}

impl FieldKey {
    /// Key of a question field.
    pub fn question(id: impl Into<QuestionId>) -> Self {
        Self::Question(id.into())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "{id}"),
            Self::Respondent(RespondentField::Name) => write!(f, "respondentName"),
            Self::Respondent(RespondentField::Email) => write!(f, "respondentEmail"),
            Self::Respondent(RespondentField::Age) => write!(f, "respondentAge"),
        }
    }
}

/// The rule a required question must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Free text must not be empty.
    NonEmptyText,
    /// At least one option must be checked.
    AtLeastOneChoice,
    /// An option must be picked (single-select, yes/no).
    ChoiceMade,
    /// A rating of at least 1 must have been set.
    RatingSet,
}

impl Rule {
    /// The rule for a required question of this kind.
    pub fn for_kind(kind: &QuestionKind) -> Self {
        match kind {
            QuestionKind::FreeText => Self::NonEmptyText,
            QuestionKind::MultiSelect(_) => Self::AtLeastOneChoice,
            QuestionKind::SingleSelect(_) | QuestionKind::YesNo => Self::ChoiceMade,
            QuestionKind::Rating(_) => Self::RatingSet,
        }
    }

    /// Whether `value` satisfies the rule.
    pub fn accepts(&self, value: Option<&AnswerValue>) -> bool {
        match (self, value) {
            (Self::NonEmptyText | Self::ChoiceMade, Some(AnswerValue::Text(s))) => !s.is_empty(),
            (Self::AtLeastOneChoice, Some(AnswerValue::Choices(c))) => !c.is_empty(),
            (Self::RatingSet, Some(AnswerValue::Rating(r))) => *r >= 1,
            _ => false,
        }
    }

    /// The message shown when the rule rejects a value.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NonEmptyText => "This field is required",
            Self::AtLeastOneChoice => "Select at least one option",
            Self::ChoiceMade => "Select an option",
            Self::RatingSet => "Rate this question",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct QuestionField {
    id: QuestionId,
    kind: QuestionKind,
    rule: Option<Rule>,
}

impl QuestionField {
    fn check(&self, value: Option<&AnswerValue>) -> Result<(), String> {
        if let Some(value) = value
            && !value.fits(&self.kind)
        {
            return Err(format!(
                "Expected a {} answer, got {}",
                expected_shape(&self.kind),
                value.type_name()
            ));
        }
        match self.rule {
            Some(rule) if !rule.accepts(value) => Err(rule.message().to_string()),
            _ => Ok(()),
        }
    }
}

fn expected_shape(kind: &QuestionKind) -> &'static str {
    match kind {
        QuestionKind::FreeText | QuestionKind::SingleSelect(_) | QuestionKind::YesNo => "Text",
        QuestionKind::MultiSelect(_) => "Choices",
        QuestionKind::Rating(_) => "Rating",
    }
}

/// Respondent identity after validation and parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Respondent {
    pub name: String,
    pub email: Option<String>,
    pub age: Option<u32>,
}

/// Field-level validation failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: HashMap<FieldKey, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.errors.insert(key, message.into());
    }

    pub fn remove(&mut self, key: &FieldKey) -> Option<String> {
        self.errors.remove(key)
    }

    /// The message for a field, if it failed.
    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.errors.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.errors.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        entries.sort();
        write!(f, "{}", entries.join("; "))
    }
}

/// Per-field validation rules for one survey.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSchema {
    questions: Vec<QuestionField>,
}

/// Derive the schema for a survey.
///
/// With no survey loaded the schema has no question fields; callers must not
/// rely on it to reject anything before the definition arrives.
pub fn build_schema(survey: Option<&Survey>) -> ValidationSchema {
    let Some(survey) = survey else {
        return ValidationSchema::empty();
    };
    let questions = survey
        .questions()
        .iter()
        .map(|question| QuestionField {
            id: question.id().clone(),
            kind: question.kind().clone(),
            rule: question
                .is_required()
                .then(|| Rule::for_kind(question.kind())),
        })
        .collect();
    ValidationSchema { questions }
}

impl ValidationSchema {
    /// A schema without question fields.
    pub fn empty() -> Self {
        Self {
            questions: Vec::new(),
        }
    }

    /// Number of question fields.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The rule attached to a question, `None` if it is optional or unknown.
    pub fn rule(&self, id: &QuestionId) -> Option<Rule> {
        self.field(id).and_then(|f| f.rule)
    }

    /// Every field key: questions in survey order, then name, email, age.
    pub fn fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.questions
            .iter()
            .map(|f| FieldKey::Question(f.id.clone()))
            .chain(
                [
                    RespondentField::Name,
                    RespondentField::Email,
                    RespondentField::Age,
                ]
                .map(FieldKey::Respondent),
            )
    }

    fn field(&self, id: &QuestionId) -> Option<&QuestionField> {
        self.questions.iter().find(|f| &f.id == id)
    }

    /// Validate a single field. Unknown question keys pass.
    pub fn validate_field(
        &self,
        key: &FieldKey,
        draft: &Draft,
        respondent: &RespondentDraft,
    ) -> Result<(), String> {
        match key {
            FieldKey::Question(id) => match self.field(id) {
                Some(field) => field.check(draft.get(id)),
                None => Ok(()),
            },
            FieldKey::Respondent(RespondentField::Name) => {
                if respondent.name.trim().is_empty() {
                    Err("Enter your name".to_string())
                } else {
                    Ok(())
                }
            }
            FieldKey::Respondent(RespondentField::Email) => {
                let email = respondent.email.trim();
                if email.is_empty() || is_valid_email(email) {
                    Ok(())
                } else {
                    Err("Invalid email".to_string())
                }
            }
            // Unparsable ages are dropped, never rejected.
            FieldKey::Respondent(RespondentField::Age) => Ok(()),
        }
    }

    /// Validate every field at once.
    ///
    /// On success, returns the parsed respondent identity.
    pub fn validate(
        &self,
        draft: &Draft,
        respondent: &RespondentDraft,
    ) -> Result<Respondent, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for key in self.fields() {
            if let Err(message) = self.validate_field(&key, draft, respondent) {
                errors.insert(key, message);
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let email = respondent.email.trim();
        Ok(Respondent {
            name: respondent.name.trim().to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            age: parse_age(&respondent.age),
        })
    }
}

/// Syntactic email check.
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Parse free-text age input: leading digits after trimming, `None` when
/// blank or unparsable.
pub fn parse_age(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Question;

    fn survey() -> Survey {
        Survey::new(
            "s1",
            "Everything",
            vec![
                Question::free_text("text", "Say something").required(),
                Question::multi_select("multi", "Pick some", ["a", "b"]).required(),
                Question::single_select("single", "Pick one", ["x", "y"]).required(),
                Question::yes_no("yn", "Yes?").required(),
                Question::rating("rate", "Rate", 1, 5).required(),
                Question::free_text("optional", "Anything else?"),
            ],
        )
        .unwrap()
    }

    fn named() -> RespondentDraft {
        RespondentDraft {
            name: "Ann".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn no_survey_means_no_question_fields() {
        let schema = build_schema(None);
        assert_eq!(schema.question_count(), 0);
        assert_eq!(schema.fields().count(), 3);
    }

    #[test]
    fn rules_follow_question_kind() {
        let schema = build_schema(Some(&survey()));

        assert_eq!(schema.rule(&"text".into()), Some(Rule::NonEmptyText));
        assert_eq!(schema.rule(&"multi".into()), Some(Rule::AtLeastOneChoice));
        assert_eq!(schema.rule(&"single".into()), Some(Rule::ChoiceMade));
        assert_eq!(schema.rule(&"yn".into()), Some(Rule::ChoiceMade));
        assert_eq!(schema.rule(&"rate".into()), Some(Rule::RatingSet));
        assert_eq!(schema.rule(&"optional".into()), None);
    }

    #[test]
    fn empty_draft_fails_every_required_field() {
        let schema = build_schema(Some(&survey()));
        let errors = schema
            .validate(&Draft::new(), &RespondentDraft::default())
            .unwrap_err();

        assert_eq!(errors.len(), 6);
        assert_eq!(
            errors.get(&FieldKey::question("rate")),
            Some("Rate this question")
        );
        assert!(!errors.contains(&FieldKey::question("optional")));
        assert!(errors.contains(&FieldKey::Respondent(RespondentField::Name)));
    }

    #[test]
    fn complete_draft_passes() {
        let schema = build_schema(Some(&survey()));
        let mut draft = Draft::new();
        draft.insert("text", "hello");
        draft.insert("multi", vec!["b"]);
        draft.insert("single", "x");
        draft.insert("yn", "no");
        draft.insert("rate", AnswerValue::Rating(1));

        let respondent = schema.validate(&draft, &named()).unwrap();
        assert_eq!(respondent.name, "Ann");
        assert_eq!(respondent.email, None);
        assert_eq!(respondent.age, None);
    }

    #[test]
    fn empty_selections_fail_required_rules() {
        let schema = build_schema(Some(&survey()));
        let mut draft = Draft::new();
        draft.insert("multi", Vec::<String>::new());
        draft.insert("single", "");

        assert_eq!(
            schema.validate_field(&FieldKey::question("multi"), &draft, &named()),
            Err("Select at least one option".to_string())
        );
        assert_eq!(
            schema.validate_field(&FieldKey::question("single"), &draft, &named()),
            Err("Select an option".to_string())
        );
    }

    #[test]
    fn wrong_shape_is_rejected_even_when_optional() {
        let schema = build_schema(Some(&survey()));
        let mut draft = Draft::new();
        draft.insert("optional", AnswerValue::Rating(3));

        let result = schema.validate_field(&FieldKey::question("optional"), &draft, &named());
        assert!(result.unwrap_err().contains("Expected a Text answer"));
    }

    #[test]
    fn email_must_be_blank_or_valid() {
        let schema = build_schema(None);
        let mut respondent = named();
        let key = FieldKey::Respondent(RespondentField::Email);

        assert!(schema.validate_field(&key, &Draft::new(), &respondent).is_ok());

        respondent.email = "not-an-email".to_string();
        assert_eq!(
            schema.validate_field(&key, &Draft::new(), &respondent),
            Err("Invalid email".to_string())
        );

        respondent.email = " ann@example.com ".to_string();
        let parsed = schema.validate(&Draft::new(), &respondent).unwrap();
        assert_eq!(parsed.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let schema = build_schema(None);
        let respondent = RespondentDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(schema.validate(&Draft::new(), &respondent).is_err());
    }

    #[test]
    fn age_parsing() {
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("   "), None);
        assert_eq!(parse_age("abc"), None);
        assert_eq!(parse_age("-4"), None);
        assert_eq!(parse_age(" 42 "), Some(42));
        assert_eq!(parse_age("25 years"), Some(25));
    }

    #[test]
    fn field_keys_display_wire_names() {
        assert_eq!(FieldKey::question("q1").to_string(), "q1");
        assert_eq!(
            FieldKey::Respondent(RespondentField::Age).to_string(),
            "respondentAge"
        );
    }
}
