use crate::{
    Answer, AnswerValue, Draft, Question, QuestionKind, Respondent, Survey, SurveyResponse,
};

/// Assemble the submission payload from a validated draft.
///
/// One answer per question, in survey order. Questions without a draft value
/// get their kind's empty default, except ratings: an unset rating stays
/// unset so it cannot pass for a real answer.
pub fn assemble(
    survey: &Survey,
    draft: &Draft,
    respondent: &Respondent,
    user_id: Option<&str>,
) -> SurveyResponse {
    let answers = survey
        .questions()
        .iter()
        .map(|question| {
            let value = draft
                .get(question.id())
                .cloned()
                .or_else(|| empty_answer(question));
            Answer::new(question.id(), value)
        })
        .collect();

    SurveyResponse {
        survey_id: survey.id().to_string(),
        user_id: user_id.map(String::from),
        answers,
        respondent_name: non_blank(&respondent.name),
        respondent_email: respondent.email.as_deref().and_then(non_blank),
        respondent_age: respondent.age,
    }
}

fn empty_answer(question: &Question) -> Option<AnswerValue> {
    match question.kind() {
        QuestionKind::FreeText | QuestionKind::SingleSelect(_) | QuestionKind::YesNo => {
            Some(AnswerValue::Text(String::new()))
        }
        QuestionKind::MultiSelect(_) => Some(AnswerValue::Choices(Vec::new())),
        QuestionKind::Rating(_) => None,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
