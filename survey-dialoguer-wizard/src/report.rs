//! Plain-text rendering of survey statistics, stored responses and the
//! user dashboard.

use survey_client::{
    QuestionStat, QuestionType, Survey, SurveyResponseRecord, SurveyStats, UserStats,
};

const DATE_FORMAT: &str = "%-d %b %Y";

/// Render the statistics of a survey as text, one block per question.
///
/// Choice questions list each label with its count and share of all
/// responses; ratings show their average.
pub fn format_stats(title: &str, stats: &SurveyStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}\n"));
    out.push_str(&format!(
        "{} response{}\n",
        stats.total_responses,
        if stats.total_responses == 1 { "" } else { "s" }
    ));

    for (index, stat) in stats.question_stats.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!(
            "{}. {} ({})\n",
            index + 1,
            stat.question,
            stat.question_type
        ));
        out.push_str(&format_question(stat, stats.total_responses));
    }
    out
}

fn format_question(stat: &QuestionStat, total: u64) -> String {
    match stat.question_type {
        QuestionType::Text => format!("   {} answered\n", stat.answered()),
        QuestionType::Rating => match stat.average_rating {
            Some(average) => format!("   average {average:.1}\n"),
            None => "   no ratings yet\n".to_string(),
        },
        QuestionType::MultipleChoice | QuestionType::SingleChoice | QuestionType::YesNo => {
            if stat.responses.is_empty() {
                return "   no answers yet\n".to_string();
            }
            let width = stat
                .responses
                .keys()
                .map(|k| k.chars().count())
                .max()
                .unwrap_or(0);
            let mut rows: Vec<(&String, &u64)> = stat.responses.iter().collect();
            rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            rows.into_iter()
                .map(|(label, count)| {
                    format!(
                        "   {label:<width$}  {count:>4}  {:>5.1}%\n",
                        percent(*count, total)
                    )
                })
                .collect()
        }
    }
}

/// Render every stored response, numbered in the order given.
///
/// Answers are labelled with their question's prompt; answers to questions
/// the survey no longer has are left out.
pub fn format_responses(survey: &Survey, responses: &[SurveyResponseRecord]) -> String {
    let mut out = String::new();
    for (index, response) in responses.iter().enumerate() {
        out.push_str(&format!(
            "Response #{} ({})",
            index + 1,
            response.submitted_at.format("%-d %b %Y %H:%M")
        ));
        if let Some(name) = &response.respondent_name {
            out.push_str(&format!(" by {name}"));
        }
        out.push('\n');
        if let Some(email) = &response.respondent_email {
            out.push_str(&format!("   Email: {email}\n"));
        }
        if let Some(age) = response.respondent_age {
            out.push_str(&format!("   Age: {age}\n"));
        }
        for answer in &response.answers {
            let Some(question) = survey.question(&answer.question_id) else {
                continue;
            };
            let value = answer
                .answer
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            out.push_str(&format!("   {}: {value}\n", question.prompt()));
        }
    }
    out
}

/// Render a user's activity: totals, then created and answered surveys.
pub fn format_dashboard(name: &str, stats: &UserStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{name}\n"));
    out.push_str(&format!(
        "{} created, {} answered, {} in total\n",
        stats.total_surveys_created,
        stats.total_responses_submitted,
        stats.total_surveys_created + stats.total_responses_submitted
    ));

    out.push_str("\nMy surveys\n");
    if stats.surveys_created.is_empty() {
        out.push_str("   none yet\n");
    }
    for survey in &stats.surveys_created {
        out.push_str(&format!(
            "   {}  {}  {}  {} response{}\n",
            survey.id,
            survey.title,
            survey.created_at.format(DATE_FORMAT),
            survey.total_responses,
            if survey.total_responses == 1 { "" } else { "s" }
        ));
    }

    out.push_str("\nMy answers\n");
    if stats.surveys_answered.is_empty() {
        out.push_str("   none yet\n");
    }
    for answered in &stats.surveys_answered {
        out.push_str(&format!(
            "   {}  {}  answered {}\n",
            answered.survey_id,
            answered.survey_title,
            answered.responded_at.format(DATE_FORMAT)
        ));
    }
    out
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_client::{Answer, AnswerValue, Question};

    fn stats() -> SurveyStats {
        serde_json::from_str(
            r#"{
                "surveyId": "s1",
                "totalResponses": 4,
                "questionStats": [
                    {"questionId": "q1", "question": "Cuisine", "type": "single-choice",
                     "responses": {"Pizza": 1, "Thai": 3}},
                    {"questionId": "q2", "question": "Last lunch", "type": "rating",
                     "responses": {"7": 2, "8": 2}, "averageRating": 7.5},
                    {"questionId": "q3", "question": "Comments", "type": "text",
                     "responses": {"Great": 1, "Ok": 1}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn lists_choices_by_count() {
        let text = format_stats("Team lunch", &stats());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Team lunch");
        assert_eq!(lines[1], "4 responses");
        assert_eq!(lines[3], "1. Cuisine (single-choice)");
        assert_eq!(lines[4], "   Thai      3   75.0%");
        assert_eq!(lines[5], "   Pizza     1   25.0%");
    }

    #[test]
    fn shows_rating_average_and_text_count() {
        let text = format_stats("Team lunch", &stats());
        assert!(text.contains("2. Last lunch (rating)\n   average 7.5\n"));
        assert!(text.contains("3. Comments (text)\n   2 answered\n"));
    }

    #[test]
    fn empty_survey_has_no_division_by_zero() {
        let stats = SurveyStats {
            survey_id: "s1".into(),
            total_responses: 0,
            question_stats: vec![],
        };
        assert_eq!(format_stats("Quiet", &stats), "Quiet\n0 responses\n");
    }

    #[test]
    fn pads_non_ascii_labels_by_character() {
        let stats: SurveyStats = serde_json::from_str(
            r#"{
                "surveyId": "s1",
                "totalResponses": 2,
                "questionStats": [
                    {"questionId": "q1", "question": "Кухня", "type": "single-choice",
                     "responses": {"Пицца": 1, "Тайская": 1}}
                ]
            }"#,
        )
        .unwrap();
        let text = format_stats("Обед", &stats);
        let lines: Vec<&str> = text.lines().skip(4).collect();

        assert_eq!(lines[0], "   Пицца       1   50.0%");
        assert_eq!(lines[1], "   Тайская     1   50.0%");
    }

    #[test]
    fn lists_responses_with_prompts() {
        let survey = Survey::new(
            "s1",
            "Team lunch",
            vec![
                Question::multi_select("q1", "Colours", ["red", "green", "blue"]),
                Question::rating("q2", "Last lunch", 1, 10),
            ],
        )
        .unwrap();
        let responses: Vec<SurveyResponseRecord> = vec![SurveyResponseRecord {
            id: "r1".into(),
            survey_id: "s1".into(),
            answers: vec![
                Answer::new("q1", Some(AnswerValue::from(vec!["red", "blue"]))),
                Answer::new("q2", None),
                Answer::new("gone", Some(AnswerValue::from("x"))),
            ],
            submitted_at: "2024-04-02T09:05:00Z".parse().unwrap(),
            respondent_name: Some("Ann".into()),
            respondent_email: None,
            respondent_age: Some(41),
        }];

        assert_eq!(
            format_responses(&survey, &responses),
            "Response #1 (2 Apr 2024 09:05) by Ann\n   Age: 41\n   Colours: red, blue\n   Last lunch: -\n"
        );
    }

    #[test]
    fn dashboard_shows_totals_and_lists() {
        let stats: UserStats = serde_json::from_str(
            r#"{
                "userId": "u1",
                "totalSurveysCreated": 1,
                "totalResponsesSubmitted": 2,
                "surveysCreated": [
                    {"id": "s1", "title": "Team lunch", "createdAt": "2024-04-01T10:00:00Z", "totalResponses": 1}
                ],
                "surveysAnswered": []
            }"#,
        )
        .unwrap();

        assert_eq!(
            format_dashboard("Ann", &stats),
            "Ann\n1 created, 2 answered, 3 in total\n\nMy surveys\n   s1  Team lunch  1 Apr 2024  1 response\n\nMy answers\n   none yet\n"
        );
    }
}
