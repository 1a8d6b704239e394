use serde::{Deserialize, Serialize};

use crate::core::FieldContribution;
use crate::models::{MatchResult, MatchTier, RankOutcome, RejectedCandidate, SurveyField, Tag};

/// Response for the score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub tier: MatchTier,
    pub breakdown: Vec<FieldContribution>,
}

/// Response for the tags endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<Tag>,
}

/// Candidate left out of a ranking, as reported to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub position: usize,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub field: SurveyField,
    pub message: String,
}

impl From<RejectedCandidate> for RejectedEntry {
    fn from(rejected: RejectedCandidate) -> Self {
        Self {
            position: rejected.position,
            candidate_id: rejected.candidate_id,
            field: rejected.error.field(),
            message: rejected.error.to_string(),
        }
    }
}

/// Response for the rank and find endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub matches: Vec<MatchResult>,
    pub rejected: Vec<RejectedEntry>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

impl RankResponse {
    /// Build from a ranking outcome, keeping at most `limit` matches
    pub fn from_outcome(outcome: RankOutcome, limit: Option<usize>) -> Self {
        let mut matches = outcome.matches;
        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        Self {
            matches,
            rejected: outcome.rejected.into_iter().map(RejectedEntry::from).collect(),
            total_candidates: outcome.total_candidates,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
