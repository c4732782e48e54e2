//! Core types for the survey client.
//!
//! This crate provides the presentation-agnostic data of a survey session:
//! - `Survey`, `Question` and `QuestionKind` - The survey definition as published by the server
//! - `Draft` and `AnswerValue` - In-progress answers keyed by `QuestionId`
//! - `SurveyResponse` - The submission payload, and `SurveyResponseRecord` as stored
//! - `SurveyStats`, `User` and friends - The remaining REST entities
//! - `SurveyGateway` trait - For implementing the fetch/submit collaborator

mod question_id;
pub use question_id::QuestionId;

mod answer;
pub use answer::{Answer, AnswerValue};

mod draft;
pub use draft::{Draft, RespondentDraft, RespondentField};

mod question;
pub use question::{
    ChoiceQuestion, DEFAULT_MAX_RATING, DEFAULT_MIN_RATING, NO, NewQuestion, Question,
    QuestionKind, QuestionType, RatingQuestion, YES,
};

mod survey;
pub use survey::{NewSurvey, Survey};

mod response;
pub use response::{SurveyResponse, SurveyResponseRecord};

mod stats;
pub use stats::{QuestionStat, SurveyStats};

mod user;
pub use user::{
    AnsweredSurvey, AuthResponse, CreatedSurvey, LoginRequest, RegisterRequest, User, UserStats,
};

mod error;
pub use error::{DefinitionError, GatewayError};

mod traits;
pub use traits::SurveyGateway;
