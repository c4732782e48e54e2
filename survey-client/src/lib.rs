//! # survey-client
//!
//! Take published surveys one question at a time. Transport-agnostic.
//!
//! This crate turns a fetched [`Survey`] into everything a front end needs to
//! collect a response: a validation schema, a widget per question, a wizard
//! that walks the questions and a submission payload.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use survey_client::{InputEvent, RespondentField, SurveySession};
//!
//! let mut session = SurveySession::new("survey-42");
//! session.load(&gateway).await?;
//!
//! while let Some(question) = session.current_question() {
//!     let id = question.id().clone();
//!     session.update_answer(&id, InputEvent::Text("Great".into()))?;
//!     if !session.next() {
//!         break;
//!     }
//! }
//!
//! session.update_respondent(RespondentField::Name, "Ann")?;
//! let record = session.submit(&gateway).await?;
//! ```
//!
//! ## Pieces
//!
//! - [`build_schema`] - One rule per question plus the respondent fields
//! - [`render`] / [`apply`] - Widget for a question and input events back into answers
//! - [`SurveySession`] - Loading, navigation, on-change validation and submission
//! - [`assemble`] - The submission payload from a validated draft
//! - [`AuthContext`] - The signed-in user, persisted through a [`CredentialStore`]
//!
//! ## Gateways
//!
//! Sessions reach the server through [`SurveyGateway`]:
//! - `survey-client-http` - REST over reqwest
//! - [`TestGateway`] - Scripted, for tests

// Re-export all types from survey-client-types
pub use survey_client_types::*;

mod schema;
pub use schema::{
    FieldKey, Respondent, Rule, ValidationErrors, ValidationSchema, build_schema, is_valid_email,
    parse_age,
};

mod render;
pub use render::{ChecklistItem, InputError, InputEvent, Widget, apply, render};

mod payload;
pub use payload::assemble;

mod session;
pub use session::{PendingSubmission, SessionError, SessionState, SurveySession};

mod auth;
pub use auth::{
    AuthContext, CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredAuth,
};

// Test gateway for exercising sessions without a server
mod test_gateway;
pub use test_gateway::TestGateway;
