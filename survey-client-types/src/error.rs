/// A survey definition (or authoring input) breaks a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Survey title must not be empty")]
    EmptyTitle,

    #[error("Survey must contain at least one question")]
    NoQuestions,

    #[error("Question is missing its identifier")]
    MissingQuestionId,

    #[error("Question '{0}' has an empty prompt")]
    EmptyPrompt(String),

    #[error("Question identifier '{0}' is used more than once")]
    DuplicateQuestion(String),

    #[error("Question '{0}' needs at least one option")]
    NoOptions(String),

    #[error("Question '{question}' has rating bounds {min}..{max} out of order")]
    InvertedRating { question: String, min: i64, max: i64 },
}

/// Error reported by the fetch/submit collaborator.
///
/// Every failure of a remote operation resolves to one of these; nothing is
/// thrown past the gateway boundary untyped.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request payload.
    #[error("Rejected by server: {0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Network, timeout, or decoding failure.
    #[error("Transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

impl GatewayError {
    /// Create a transport error from any error type.
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        Self::Transport(err.into())
    }

    /// Check if this error means the resource is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
