//! Scripted gateway for testing sessions without a server.
//!
//! `TestGateway` serves surveys from memory, stores every transmitted payload,
//! and can be told to fail upcoming requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_client::{InputEvent, Question, Survey, SurveySession, TestGateway};
//!
//! let survey = Survey::new("s1", "Lunch", vec![Question::yes_no("q1", "Hungry?")])?;
//! let gateway = TestGateway::new().with_survey(survey);
//!
//! let mut session = SurveySession::new("s1");
//! session.load(&gateway).await?;
//! session.update_answer(&"q1".into(), InputEvent::Choose("yes".into()))?;
//! session.update_respondent(RespondentField::Name, "Ann")?;
//! session.submit(&gateway).await?;
//!
//! assert_eq!(gateway.submission_count(), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::{GatewayError, Survey, SurveyGateway, SurveyResponse, SurveyResponseRecord};

/// A gateway that answers from a script.
#[derive(Debug, Default)]
pub struct TestGateway {
    surveys: HashMap<String, Survey>,
    script: Mutex<Script>,
}

#[derive(Debug, Default)]
struct Script {
    fetch_failures: VecDeque<GatewayError>,
    submit_failures: VecDeque<GatewayError>,
    transmissions: Vec<SurveyResponse>,
    fetches: usize,
}

impl TestGateway {
    /// Create a gateway that knows no surveys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `survey` under its own id.
    pub fn with_survey(mut self, survey: Survey) -> Self {
        self.surveys.insert(survey.id().to_string(), survey);
        self
    }

    /// Make the next fetch fail with `error`. Failures queue up in order.
    pub fn fail_next_fetch(&self, error: GatewayError) {
        self.script().fetch_failures.push_back(error);
    }

    /// Make the next submission fail with `error`. Failures queue up in order.
    ///
    /// A failed submission is still recorded as transmitted.
    pub fn fail_next_submission(&self, error: GatewayError) {
        self.script().submit_failures.push_back(error);
    }

    /// Every payload received, oldest first.
    pub fn transmissions(&self) -> Vec<SurveyResponse> {
        self.script().transmissions.clone()
    }

    /// Number of payloads received.
    pub fn submission_count(&self) -> usize {
        self.script().transmissions.len()
    }

    /// Number of fetches attempted.
    pub fn fetch_count(&self) -> usize {
        self.script().fetches
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SurveyGateway for TestGateway {
    async fn fetch_survey(&self, survey_id: &str) -> Result<Survey, GatewayError> {
        let mut script = self.script();
        script.fetches += 1;
        if let Some(error) = script.fetch_failures.pop_front() {
            return Err(error);
        }
        self.surveys
            .get(survey_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("survey {survey_id}")))
    }

    async fn submit_response(
        &self,
        payload: &SurveyResponse,
    ) -> Result<SurveyResponseRecord, GatewayError> {
        let mut script = self.script();
        script.transmissions.push(payload.clone());
        if let Some(error) = script.submit_failures.pop_front() {
            return Err(error);
        }
        if !self.surveys.contains_key(&payload.survey_id) {
            return Err(GatewayError::NotFound(format!("survey {}", payload.survey_id)));
        }
        Ok(SurveyResponseRecord {
            id: format!("response-{}", script.transmissions.len()),
            survey_id: payload.survey_id.clone(),
            answers: payload.answers.clone(),
            submitted_at: Utc::now(),
            respondent_name: payload.respondent_name.clone(),
            respondent_email: payload.respondent_email.clone(),
            respondent_age: payload.respondent_age,
        })
    }
}
