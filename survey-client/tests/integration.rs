//! Integration tests for survey-client

use survey_client::{
    AnswerValue, FieldKey, GatewayError, InputEvent, Question, RespondentField, SessionError,
    SessionState, Survey, SurveyGateway, SurveySession, TestGateway, Widget,
};

fn survey_from_json(json: &str) -> Survey {
    serde_json::from_str(json).unwrap()
}

async fn loaded(gateway: &TestGateway, id: &str) -> SurveySession {
    let mut session = SurveySession::new(id);
    session.load(gateway).await.unwrap();
    session
}

#[tokio::test]
async fn test_untouched_required_rating_fails_validation() {
    let survey = survey_from_json(
        r#"{
            "id": "s1",
            "title": "Rate us",
            "questions": [
                {"id": "q1", "type": "rating", "question": "How was it?",
                 "minRating": 1, "maxRating": 5, "required": true}
            ],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#,
    );
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;
    session
        .update_respondent(RespondentField::Name, "Ann")
        .unwrap();

    // The slider shows 1 but nothing was set.
    assert!(matches!(
        session.current_widget(),
        Some(Widget::Slider {
            value: 1,
            touched: false,
            ..
        })
    ));

    let err = session.submit(&gateway).await.unwrap_err();
    let SessionError::Validation(errors) = err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(&FieldKey::question("q1")), Some("Rate this question"));
    assert_eq!(session.state(), SessionState::Ready { index: 0 });
    assert_eq!(gateway.submission_count(), 0);

    // Moving the slider, even to the minimum, counts.
    session
        .update_answer(&"q1".into(), InputEvent::Slide(1))
        .unwrap();
    session.submit(&gateway).await.unwrap();
    assert_eq!(
        gateway.transmissions()[0].answer_for(&"q1".into()),
        Some(&AnswerValue::Rating(1))
    );
}

#[tokio::test]
async fn test_optional_blank_text_submits_empty_string() {
    let survey = Survey::new("s1", "Notes", vec![Question::free_text("q1", "Anything?")]).unwrap();
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;
    session
        .update_respondent(RespondentField::Name, "Ann")
        .unwrap();

    session.submit(&gateway).await.unwrap();

    let sent = gateway.transmissions();
    assert_eq!(sent[0].answers.len(), 1);
    assert_eq!(sent[0].answer_for(&"q1".into()), Some(&AnswerValue::from("")));
}

#[tokio::test]
async fn test_required_blank_text_blocks_submit() {
    let survey = Survey::new(
        "s1",
        "Notes",
        vec![
            Question::yes_no("q1", "Ok?"),
            Question::free_text("q2", "Why?").required(),
        ],
    )
    .unwrap();
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;
    session.next();
    session
        .update_respondent(RespondentField::Name, "Ann")
        .unwrap();

    let err = session.submit(&gateway).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(session.state(), SessionState::Ready { index: 1 });
    assert!(session.errors().contains(&FieldKey::question("q2")));
}

#[tokio::test]
async fn test_answers_follow_survey_order() {
    let survey = Survey::new(
        "s1",
        "Two",
        vec![
            Question::multi_select("q1", "Toppings", ["cheese", "ham", "olives"]).required(),
            Question::single_select("q2", "Size", ["S", "M", "L"]).required(),
        ],
    )
    .unwrap();
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;

    // Answer the second question first, then go back.
    assert!(session.next());
    session
        .update_answer(&"q2".into(), InputEvent::Choose("M".into()))
        .unwrap();
    assert!(session.previous());
    for topping in ["olives", "cheese"] {
        session
            .update_answer(&"q1".into(), InputEvent::Toggle(topping.into()))
            .unwrap();
    }
    assert!(session.next());
    session
        .update_respondent(RespondentField::Name, " Ann ")
        .unwrap();
    session
        .update_respondent(RespondentField::Age, "34 years")
        .unwrap();

    let record = session.submit(&gateway).await.unwrap();

    let ids: Vec<&str> = record.answers.iter().map(|a| a.question_id.as_str()).collect();
    assert_eq!(ids, vec!["q1", "q2"]);
    let sent = &gateway.transmissions()[0];
    assert_eq!(
        sent.answer_for(&"q1".into()),
        Some(&AnswerValue::from(vec!["cheese", "olives"]))
    );
    assert_eq!(sent.respondent_name.as_deref(), Some("Ann"));
    assert_eq!(sent.respondent_age, Some(34));
    assert_eq!(sent.respondent_email, None);
}

#[tokio::test]
async fn test_second_submit_while_pending_sends_once() {
    let survey = Survey::new("s1", "One", vec![Question::free_text("q1", "?")]).unwrap();
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;
    session
        .update_respondent(RespondentField::Name, "Ann")
        .unwrap();

    let pending = session.begin_submit().unwrap();
    assert!(matches!(
        session.submit(&gateway).await,
        Err(SessionError::SubmissionPending)
    ));

    let result = gateway.submit_response(pending.payload()).await;
    session.finish_submit(pending.ticket(), result).unwrap();

    assert_eq!(gateway.submission_count(), 1);
    assert_eq!(session.state(), SessionState::Submitted);
}

#[tokio::test]
async fn test_retry_after_transport_failure() {
    let survey = Survey::new("s1", "One", vec![Question::yes_no("q1", "?").required()]).unwrap();
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;
    session
        .update_answer(&"q1".into(), InputEvent::Choose("no".into()))
        .unwrap();
    session
        .update_respondent(RespondentField::Email, "ann@example.com")
        .unwrap();
    session
        .update_respondent(RespondentField::Name, "Ann")
        .unwrap();

    gateway.fail_next_submission(GatewayError::transport(anyhow::anyhow!("connection reset")));
    let err = session.submit(&gateway).await.unwrap_err();
    assert!(matches!(err, SessionError::SubmissionFailure(_)));
    assert!(session.notice().is_some());

    let record = session.submit(&gateway).await.unwrap();
    assert_eq!(record.respondent_email.as_deref(), Some("ann@example.com"));
    assert_eq!(gateway.submission_count(), 2);
    assert_eq!(gateway.transmissions()[0], gateway.transmissions()[1]);
}

#[tokio::test]
async fn test_missing_survey_is_a_load_failure() {
    let gateway = TestGateway::new();
    let mut session = SurveySession::new("nope");

    let err = session.load(&gateway).await.unwrap_err();
    let SessionError::LoadFailure(cause) = err else {
        panic!("expected a load failure");
    };
    assert!(cause.is_not_found());
    assert_eq!(session.state(), SessionState::LoadFailed);
    assert!(session.load(&gateway).await.is_err());
    assert_eq!(gateway.fetch_count(), 1);
}

#[tokio::test]
async fn test_abandoned_submission_result_is_ignored() {
    let survey = Survey::new("s1", "One", vec![Question::free_text("q1", "?")]).unwrap();
    let gateway = TestGateway::new().with_survey(survey);
    let mut session = loaded(&gateway, "s1").await;
    session
        .update_respondent(RespondentField::Name, "Ann")
        .unwrap();

    let pending = session.begin_submit().unwrap();
    session.abandon();
    let result = gateway.submit_response(pending.payload()).await;

    assert!(matches!(
        session.finish_submit(pending.ticket(), result),
        Err(SessionError::Abandoned)
    ));
    assert_eq!(session.state(), SessionState::Abandoned);
}

#[test]
fn test_invalid_email_is_reported_on_change() {
    let survey = Survey::new("s1", "One", vec![Question::free_text("q1", "?")]).unwrap();
    let mut session = SurveySession::new("s1");
    session.resolve_load(Ok(survey)).unwrap();

    session
        .update_respondent(RespondentField::Email, "not-an-email")
        .unwrap();
    assert_eq!(
        session.field_error(&FieldKey::Respondent(RespondentField::Email)),
        Some("Invalid email")
    );

    session
        .update_respondent(RespondentField::Email, "  ")
        .unwrap();
    assert!(session.errors().is_empty());
}
