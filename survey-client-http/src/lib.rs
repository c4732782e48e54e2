//! # survey-client-http
//!
//! REST gateway for `survey-client`.
//!
//! [`ApiClient`] wraps the survey API with typed requests and implements
//! [`SurveyGateway`](survey_client::SurveyGateway), so a
//! [`SurveySession`](survey_client::SurveySession) can load and submit
//! through it directly.
//!
//! ```rust,ignore
//! use survey_client::SurveySession;
//! use survey_client_http::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?)?;
//! let mut session = SurveySession::new("survey-42");
//! session.load(&client).await?;
//! ```

mod config;
pub use config::{ClientConfig, ConfigError, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

mod client;
pub use client::{ApiClient, classify_status};
