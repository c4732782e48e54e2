//! Survey-taking session: one question at a time, then a single submission.
//!
//! ```text
//! Loading ──load ok──▶ Ready(0) ◀─next/previous─▶ Ready(i)
//!    │                                               │ submit on last (valid)
//!    └─load failed──▶ LoadFailed                     ▼
//!                         Ready(last) ◀──failure── Submitting ──success──▶ Submitted
//! ```
//!
//! Any state can move to `Abandoned`; completions arriving afterwards are
//! ignored. The session never talks to the network itself except through the
//! `load` and `submit` conveniences, which hand a single request to the
//! gateway and feed its result back through `resolve_load` / `finish_submit`.

use std::fmt;

use tracing::{debug, warn};

use crate::payload::assemble;
use crate::render::{self, InputError, InputEvent, Widget};
use crate::schema::{FieldKey, ValidationErrors, ValidationSchema, build_schema};
use crate::{
    Draft, GatewayError, Question, QuestionId, RespondentDraft, RespondentField, Survey,
    SurveyGateway, SurveyResponse, SurveyResponseRecord,
};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the survey definition.
    Loading,
    /// The survey could not be fetched. Terminal.
    LoadFailed,
    /// Showing the question at `index`.
    Ready { index: usize },
    /// A submission identified by `ticket` is in flight.
    Submitting { ticket: u64 },
    /// The response was stored. Terminal.
    Submitted,
    /// The host left the session. Terminal.
    Abandoned,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::LoadFailed => write!(f, "load failed"),
            Self::Ready { index } => write!(f, "ready at question {}", index + 1),
            Self::Submitting { .. } => write!(f, "submitting"),
            Self::Submitted => write!(f, "submitted"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The survey could not be fetched; the session is over.
    #[error("Failed to load survey: {0}")]
    LoadFailure(#[source] GatewayError),

    /// One or more fields failed validation; nothing changed.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Transmission failed; the draft is kept for a retry.
    #[error("Failed to submit response: {0}")]
    SubmissionFailure(#[source] GatewayError),

    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    SubmissionPending,

    /// The session was abandoned; late results are dropped.
    #[error("Session was abandoned")]
    Abandoned,

    /// A completion that does not belong to the current submission.
    #[error("Ignoring completion for stale submission {0}")]
    StaleSubmission(u64),

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    #[error("Survey has no question '{0}'")]
    UnknownQuestion(QuestionId),

    #[error(transparent)]
    Input(#[from] InputError),
}

impl SessionError {
    /// Check if this error is a field-level validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A submission handed out by [`SurveySession::begin_submit`].
///
/// Transmit `payload`, then report the result with
/// [`SurveySession::finish_submit`] using `ticket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    ticket: u64,
    payload: SurveyResponse,
}

impl PendingSubmission {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn payload(&self) -> &SurveyResponse {
        &self.payload
    }
}

/// Controller for taking one survey.
#[derive(Debug, Clone)]
pub struct SurveySession {
    survey_id: String,
    user_id: Option<String>,
    survey: Option<Survey>,
    schema: ValidationSchema,
    state: SessionState,
    draft: Draft,
    respondent: RespondentDraft,
    errors: ValidationErrors,
    notice: Option<String>,
    next_ticket: u64,
}

impl SurveySession {
    /// Start a session for `survey_id`, waiting for its definition.
    pub fn new(survey_id: impl Into<String>) -> Self {
        Self {
            survey_id: survey_id.into(),
            user_id: None,
            survey: None,
            schema: ValidationSchema::empty(),
            state: SessionState::Loading,
            draft: Draft::new(),
            respondent: RespondentDraft::default(),
            errors: ValidationErrors::new(),
            notice: None,
            next_ticket: 1,
        }
    }

    /// Attach the signed-in user's id to the submission.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn survey_id(&self) -> &str {
        &self.survey_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The survey, once loaded.
    pub fn survey(&self) -> Option<&Survey> {
        self.survey.as_ref()
    }

    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn respondent(&self) -> &RespondentDraft {
        &self.respondent
    }

    /// Current field-level errors.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The error for one field, if any.
    pub fn field_error(&self, key: &FieldKey) -> Option<&str> {
        self.errors.get(key)
    }

    /// Session-level notice left by a failed submission.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // === Loading ===

    /// Feed the result of fetching the survey definition.
    pub fn resolve_load(&mut self, result: Result<Survey, GatewayError>) -> Result<(), SessionError> {
        match self.state {
            SessionState::Loading => {}
            SessionState::Abandoned => return Err(SessionError::Abandoned),
            state => {
                return Err(SessionError::InvalidState {
                    action: "resolve a load",
                    state,
                });
            }
        }

        match result {
            Ok(survey) => {
                debug!(survey = %survey.id(), questions = survey.len(), "survey loaded");
                self.schema = build_schema(Some(&survey));
                self.survey = Some(survey);
                self.state = SessionState::Ready { index: 0 };
                Ok(())
            }
            Err(err) => {
                warn!(survey = %self.survey_id, error = %err, "failed to load survey");
                self.state = SessionState::LoadFailed;
                Err(SessionError::LoadFailure(err))
            }
        }
    }

    /// Fetch the survey through `gateway` and resolve the load.
    pub async fn load<G>(&mut self, gateway: &G) -> Result<(), SessionError>
    where
        G: SurveyGateway + ?Sized,
    {
        if self.state != SessionState::Loading {
            return Err(SessionError::InvalidState {
                action: "load",
                state: self.state,
            });
        }
        let result = gateway.fetch_survey(&self.survey_id).await;
        self.resolve_load(result)
    }

    // === Navigation ===

    /// Number of questions, zero before the survey arrives.
    pub fn question_count(&self) -> usize {
        self.survey.as_ref().map_or(0, Survey::len)
    }

    /// Index of the question on screen.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SessionState::Ready { index } => Some(index),
            SessionState::Submitting { .. } => self.last_index(),
            _ => None,
        }
    }

    /// `(current index, question count)` while a question is on screen.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_index().map(|i| (i, self.question_count()))
    }

    fn last_index(&self) -> Option<usize> {
        self.question_count().checked_sub(1)
    }

    /// Whether the question on screen is the last one.
    pub fn is_last_question(&self) -> bool {
        matches!(self.state, SessionState::Ready { index } if Some(index) == self.last_index())
    }

    /// The question on screen.
    pub fn current_question(&self) -> Option<&Question> {
        let index = self.current_index()?;
        self.survey.as_ref()?.questions().get(index)
    }

    /// Move to the next question. Returns `false` (and does nothing) on the
    /// last question or outside `Ready`.
    pub fn next(&mut self) -> bool {
        match self.state {
            SessionState::Ready { index } if Some(index) < self.last_index() => {
                self.state = SessionState::Ready { index: index + 1 };
                true
            }
            _ => false,
        }
    }

    /// Move to the previous question. Returns `false` (and does nothing) on
    /// the first question or outside `Ready`.
    pub fn previous(&mut self) -> bool {
        match self.state {
            SessionState::Ready { index } if index > 0 => {
                self.state = SessionState::Ready { index: index - 1 };
                true
            }
            _ => false,
        }
    }

    // === Input ===

    /// The widget for a question, showing its draft value.
    pub fn widget(&self, id: &QuestionId) -> Option<Widget> {
        let question = self.survey.as_ref()?.question(id)?;
        Some(render::render(question, self.draft.get(id)))
    }

    /// The widget for the question on screen.
    pub fn current_widget(&self) -> Option<Widget> {
        let question = self.current_question()?;
        Some(render::render(question, self.draft.get(question.id())))
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Ready { .. } => Ok(()),
            SessionState::Abandoned => Err(SessionError::Abandoned),
            state => Err(SessionError::InvalidState { action, state }),
        }
    }

    /// Apply an input event to a question's draft value and re-validate that
    /// field.
    pub fn update_answer(&mut self, id: &QuestionId, event: InputEvent) -> Result<(), SessionError> {
        self.ensure_editable("edit an answer")?;
        let question = self
            .survey
            .as_ref()
            .and_then(|s| s.question(id))
            .ok_or_else(|| SessionError::UnknownQuestion(id.clone()))?;

        let value = render::apply(question, self.draft.get(id), event)?;
        self.draft.insert(id, value);
        self.refresh_error(FieldKey::Question(id.clone()));
        Ok(())
    }

    /// Replace a respondent field and re-validate it.
    pub fn update_respondent(
        &mut self,
        field: RespondentField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_editable("edit respondent details")?;
        self.respondent.set(field, value);
        self.refresh_error(FieldKey::Respondent(field));
        Ok(())
    }

    fn refresh_error(&mut self, key: FieldKey) {
        match self
            .schema
            .validate_field(&key, &self.draft, &self.respondent)
        {
            Ok(()) => {
                self.errors.remove(&key);
            }
            Err(message) => self.errors.insert(key, message),
        }
    }

    // === Submission ===

    /// Validate the whole draft and, if it passes, enter `Submitting`.
    ///
    /// Only allowed on the last question. While a submission is in flight a
    /// second call returns `SubmissionPending` and hands out nothing.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SessionError> {
        match self.state {
            SessionState::Ready { .. } if self.is_last_question() => {}
            SessionState::Submitting { .. } => return Err(SessionError::SubmissionPending),
            SessionState::Abandoned => return Err(SessionError::Abandoned),
            state => {
                return Err(SessionError::InvalidState {
                    action: "submit",
                    state,
                });
            }
        }
        let Some(survey) = self.survey.as_ref() else {
            return Err(SessionError::InvalidState {
                action: "submit",
                state: self.state,
            });
        };

        let respondent = match self.schema.validate(&self.draft, &self.respondent) {
            Ok(respondent) => respondent,
            Err(errors) => {
                debug!(survey = %self.survey_id, failed = errors.len(), "submission blocked by validation");
                self.errors = errors.clone();
                return Err(SessionError::Validation(errors));
            }
        };

        let payload = assemble(survey, &self.draft, &respondent, self.user_id.as_deref());
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.errors.clear();
        self.notice = None;
        self.state = SessionState::Submitting { ticket };
        debug!(survey = %self.survey_id, ticket, answers = payload.answers.len(), "submitting response");

        Ok(PendingSubmission { ticket, payload })
    }

    /// Feed the result of transmitting the submission `ticket`.
    ///
    /// On success the session is `Submitted` and the draft is discarded. On
    /// failure it returns to the last question with the draft intact and a
    /// notice set.
    pub fn finish_submit(
        &mut self,
        ticket: u64,
        result: Result<SurveyResponseRecord, GatewayError>,
    ) -> Result<SurveyResponseRecord, SessionError> {
        match self.state {
            SessionState::Submitting { ticket: current } if current == ticket => {}
            SessionState::Abandoned => return Err(SessionError::Abandoned),
            _ => return Err(SessionError::StaleSubmission(ticket)),
        }

        match result {
            Ok(record) => {
                debug!(survey = %self.survey_id, response = %record.id, "response stored");
                self.state = SessionState::Submitted;
                self.draft.clear();
                self.respondent = RespondentDraft::default();
                self.errors.clear();
                Ok(record)
            }
            Err(err) => {
                warn!(survey = %self.survey_id, error = %err, "submission failed");
                self.state = SessionState::Ready {
                    index: self.last_index().unwrap_or_default(),
                };
                self.notice = Some(err.to_string());
                Err(SessionError::SubmissionFailure(err))
            }
        }
    }

    /// Validate, transmit through `gateway`, and record the outcome.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<SurveyResponseRecord, SessionError>
    where
        G: SurveyGateway + ?Sized,
    {
        let pending = self.begin_submit()?;
        let result = gateway.submit_response(pending.payload()).await;
        self.finish_submit(pending.ticket(), result)
    }

    /// Leave the session. Results that arrive later are ignored.
    pub fn abandon(&mut self) {
        debug!(survey = %self.survey_id, state = %self.state, "session abandoned");
        self.state = SessionState::Abandoned;
    }
}
