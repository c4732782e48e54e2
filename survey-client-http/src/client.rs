use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use survey_client::{
    AuthResponse, GatewayError, LoginRequest, NewSurvey, RegisterRequest, Survey, SurveyGateway,
    SurveyResponse, SurveyResponseRecord, SurveyStats, User, UserStats,
};

use crate::ClientConfig;

/// Client for the survey REST API.
///
/// Every non-success status is turned into a [`GatewayError`] by
/// [`classify_status`]; network failures, timeouts and undecodable bodies
/// become `GatewayError::Transport`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client with the configured base URL and timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: None,
        })
    }

    /// Send `token` as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `/surveys`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // === Surveys ===

    /// All surveys the server returns. Entries that fail to decode are
    /// skipped with a warning so one bad survey does not hide the rest.
    pub async fn list_surveys(&self) -> Result<Vec<Survey>, GatewayError> {
        let entries: Vec<Value> = self.fetch(self.request(Method::GET, "/surveys")).await?;
        Ok(decode_surveys(entries))
    }

    pub async fn get_survey(&self, id: &str) -> Result<Survey, GatewayError> {
        self.fetch(self.request(Method::GET, &format!("/surveys/{id}")))
            .await
    }

    pub async fn create_survey(&self, survey: &NewSurvey) -> Result<Survey, GatewayError> {
        self.fetch(self.request(Method::POST, "/surveys").json(survey))
            .await
    }

    pub async fn update_survey(&self, id: &str, survey: &NewSurvey) -> Result<Survey, GatewayError> {
        self.fetch(self.request(Method::PUT, &format!("/surveys/{id}")).json(survey))
            .await
    }

    pub async fn delete_survey(&self, id: &str) -> Result<(), GatewayError> {
        self.execute(self.request(Method::DELETE, &format!("/surveys/{id}")))
            .await
            .map(drop)
    }

    // === Responses ===

    pub async fn submit_survey_response(
        &self,
        payload: &SurveyResponse,
    ) -> Result<SurveyResponseRecord, GatewayError> {
        self.fetch(self.request(Method::POST, "/surveys/responses").json(payload))
            .await
    }

    pub async fn survey_responses(
        &self,
        survey_id: &str,
    ) -> Result<Vec<SurveyResponseRecord>, GatewayError> {
        self.fetch(self.request(Method::GET, &format!("/surveys/{survey_id}/responses")))
            .await
    }

    pub async fn survey_stats(&self, survey_id: &str) -> Result<SurveyStats, GatewayError> {
        self.fetch(self.request(Method::GET, &format!("/surveys/{survey_id}/stats")))
            .await
    }

    // === Users ===

    pub async fn get_user(&self, id: &str) -> Result<User, GatewayError> {
        self.fetch(self.request(Method::GET, &format!("/users/{id}")))
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, GatewayError> {
        self.post("/users/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        self.post("/users/login", request).await
    }

    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, GatewayError> {
        self.fetch(self.request(Method::GET, &format!("/users/{user_id}/stats")))
            .await
    }

    // === Plumbing ===

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(endpoint));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(Method::POST, endpoint).json(body))
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, GatewayError> {
        let body = self.execute(builder).await?;
        let value: T =
            serde_json::from_slice(&body).context("Failed to decode response body")?;
        Ok(value)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let request = builder.build().map_err(GatewayError::transport)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(GatewayError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(GatewayError::transport)?;
        debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            let err = classify_status(status.as_u16(), &body);
            warn!(%method, %url, error = %err, "request failed");
            return Err(err);
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl SurveyGateway for ApiClient {
    async fn fetch_survey(&self, survey_id: &str) -> Result<Survey, GatewayError> {
        self.get_survey(survey_id).await
    }

    async fn submit_response(
        &self,
        payload: &SurveyResponse,
    ) -> Result<SurveyResponseRecord, GatewayError> {
        self.submit_survey_response(payload).await
    }
}

fn decode_surveys(entries: Vec<Value>) -> Vec<Survey> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("<no id>")
                .to_string();
            match serde_json::from_value::<Survey>(entry) {
                Ok(survey) => Some(survey),
                Err(err) => {
                    warn!(survey = %id, error = %err, "skipping malformed survey");
                    None
                }
            }
        })
        .collect()
}

/// Turn a non-success status and its body into a typed error.
///
/// The message is the body's `message` field, else its `error` field, else
/// `HTTP error! status: N`.
pub fn classify_status(status: u16, body: &[u8]) -> GatewayError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP error! status: {status}"));
    match status {
        404 => GatewayError::NotFound(message),
        400 | 422 => GatewayError::Validation(message),
        401 | 403 => GatewayError::Unauthorized(message),
        _ => GatewayError::Server { status, message },
    }
}

fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .into_iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .map(String::from)
}
