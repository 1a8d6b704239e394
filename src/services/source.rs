use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Candidate, SurveyAnswers};

/// Errors that can occur while loading data for a ranking call
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Supplies the pool of candidates a viewer is ranked against
///
/// Implementations decide eligibility: only complete profiles with a
/// survey response are returned, and the viewer is never in their own pool.
#[async_trait]
pub trait CandidatePoolSource: Send + Sync {
    async fn fetch(&self, viewer_id: &str) -> Result<Vec<Candidate>, FetchError>;
}

/// Supplies a user's stored survey answers
#[async_trait]
pub trait ViewerAnswersSource: Send + Sync {
    async fn fetch_answers(&self, user_id: &str) -> Result<SurveyAnswers, FetchError>;
}
