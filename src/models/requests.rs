use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Candidate, SortKey, SurveyAnswers};

/// Request to score two survey responses against each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub viewer: SurveyAnswers,
    pub candidate: SurveyAnswers,
}

/// Request to derive tags for one survey response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsRequest {
    pub answers: SurveyAnswers,
}

/// Request to rank a caller-supplied candidate pool
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    pub viewer: SurveyAnswers,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: Option<SortKey>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to find matches for a stored user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: Option<SortKey>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}
