use async_trait::async_trait;

use crate::{GatewayError, Survey, SurveyResponse, SurveyResponseRecord};

/// The fetch/submit collaborator a survey session talks to.
///
/// Implementations decide how a survey is fetched and a response is
/// transmitted (REST, a scripted test double, ...). Each call resolves exactly
/// once and reports failure as a typed `GatewayError`. Timeouts are the
/// implementation's responsibility.
#[async_trait]
pub trait SurveyGateway: Send + Sync {
    /// Fetch a survey definition by identifier.
    ///
    /// # Returns
    /// * `Ok(survey)` on success
    /// * `Err(GatewayError::NotFound)` if no such survey exists
    /// * `Err(GatewayError::Transport)` on network or decoding failure
    async fn fetch_survey(&self, survey_id: &str) -> Result<Survey, GatewayError>;

    /// Transmit a completed response.
    ///
    /// # Returns
    /// * `Ok(record)` with the stored response
    /// * `Err(GatewayError::Validation)` if the server rejects the payload
    /// * `Err(GatewayError::Transport)` on network or decoding failure
    async fn submit_response(
        &self,
        payload: &SurveyResponse,
    ) -> Result<SurveyResponseRecord, GatewayError>;
}
