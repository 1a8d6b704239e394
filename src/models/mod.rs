// Model exports
pub mod answers;
pub mod domain;
pub mod requests;
pub mod responses;

pub use answers::{AnswerSet, AnswerValue, MalformedAnswerSet, SurveyAnswers, SurveyField, FIELD_COUNT, MAX_ANSWER, MIN_ANSWER};
pub use domain::{Candidate, MatchResult, MatchTier, RankOutcome, RejectedCandidate, SortKey, Tag};
pub use requests::{FindMatchesRequest, RankRequest, ScoreRequest, TagsRequest};
pub use responses::{ErrorResponse, HealthResponse, RankResponse, RejectedEntry, ScoreResponse, TagsResponse};
