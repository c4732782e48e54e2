//! # survey-dialoguer-wizard
//!
//! Dialoguer wizard for survey-client.
//!
//! This crate drives a [`SurveySession`](survey_client::SurveySession) from the
//! command line using the `dialoguer` library. Questions are presented one at a
//! time in a classic CLI wizard style, with Next / Previous / Submit after each
//! step and the respondent details on the last one.
//!
//! ## Example
//!
//! ```rust,ignore
//! use survey_client::SurveySession;
//! use survey_client_http::{ApiClient, ClientConfig};
//! use survey_dialoguer_wizard::DialoguerWizard;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new(&ClientConfig::from_env()?)?;
//!     let mut session = SurveySession::new("survey-42");
//!     let record = DialoguerWizard::new().run(&mut session, &client).await?;
//!     println!("Stored as {}", record.id);
//!     Ok(())
//! }
//! ```
//!
//! The `survey` binary in this crate wraps the wizard together with the rest
//! of the REST API (listing, results, authoring and sign-in).

mod backend;
pub use backend::{
    ChoicePrompt, DialoguerWizard, NO_ANSWER, StepAction, WizardError, checklist_events,
    choice_event, choice_prompt, step_actions,
};

mod report;
pub use report::{format_dashboard, format_responses, format_stats};
