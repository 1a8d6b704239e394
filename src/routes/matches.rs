use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{score_breakdown, tags_for, Ranker};
use crate::models::{
    AnswerSet, ErrorResponse, FindMatchesRequest, HealthResponse, MalformedAnswerSet, MatchTier,
    RankRequest, RankResponse, ScoreRequest, ScoreResponse, SortKey, SurveyAnswers, TagsRequest,
    TagsResponse,
};
use crate::services::{CandidatePoolSource, FetchError, ViewerAnswersSource};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool_source: Arc<dyn CandidatePoolSource>,
    pub answers_source: Arc<dyn ViewerAnswersSource>,
    pub ranker: Ranker,
    pub limits: ResultLimits,
}

/// Result-size policy for ranking endpoints
#[derive(Debug, Clone, Copy)]
pub struct ResultLimits {
    pub default_limit: u16,
    pub max_limit: u16,
    pub default_sort: SortKey,
}

impl ResultLimits {
    fn cap(&self, requested: Option<u16>, fallback: Option<u16>) -> Option<usize> {
        requested
            .or(fallback)
            .map(|limit| limit.min(self.max_limit) as usize)
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/compatibility/score", web::post().to(score_pair))
        .route("/tags", web::post().to(derive_tags))
        .route("/matches/rank", web::post().to(rank_candidates))
        .route("/matches/find", web::post().to(find_matches));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn malformed(who: &str, err: &MalformedAnswerSet) -> HttpResponse {
    bad_request("Malformed answer set", format!("{}: {}", who, err))
}

fn validate_answers(who: &str, answers: &SurveyAnswers) -> Result<AnswerSet, HttpResponse> {
    answers.validate().map_err(|e| {
        tracing::info!("Rejected {} answers: {}", who, e);
        malformed(who, &e)
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score endpoint
///
/// POST /api/v1/compatibility/score
///
/// Request body:
/// ```json
/// {
///   "viewer": { "cleanliness_level": 5, "...": 3 },
///   "candidate": { "cleanliness_level": 4, "...": 3 }
/// }
/// ```
async fn score_pair(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    let viewer = match validate_answers("viewer", &req.viewer) {
        Ok(answers) => answers,
        Err(response) => return response,
    };
    let candidate = match validate_answers("candidate", &req.candidate) {
        Ok(answers) => answers,
        Err(response) => return response,
    };

    let breakdown = score_breakdown(&viewer, &candidate, state.ranker.weights());

    HttpResponse::Ok().json(ScoreResponse {
        score: breakdown.score,
        tier: MatchTier::from_score(breakdown.score),
        breakdown: breakdown.fields,
    })
}

/// Tags endpoint
///
/// POST /api/v1/tags
async fn derive_tags(req: web::Json<TagsRequest>) -> impl Responder {
    match validate_answers("answers", &req.answers) {
        Ok(answers) => HttpResponse::Ok().json(TagsResponse {
            tags: tags_for(&answers),
        }),
        Err(response) => response,
    }
}

/// Rank endpoint for caller-supplied pools
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "viewer": { "cleanliness_level": 5, "...": 3 },
///   "candidates": [{ "id": "string", "fullName": "string", "age": 24, "city": "string", "answers": {} }],
///   "sortBy": "score|age|arrival",
///   "limit": 20
/// }
/// ```
async fn rank_candidates(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let viewer = match validate_answers("viewer", &req.viewer) {
        Ok(answers) => answers,
        Err(response) => return response,
    };

    let req = req.into_inner();
    let sort_key = req.sort_by.unwrap_or(state.limits.default_sort);
    let limit = state.limits.cap(req.limit, None);

    let outcome = state.ranker.rank(&viewer, req.candidates, sort_key);

    HttpResponse::Ok().json(RankResponse::from_outcome(outcome, limit))
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "sortBy": "score|age|arrival",
///   "limit": 20
/// }
/// ```
async fn find_matches(state: web::Data<AppState>, req: web::Json<FindMatchesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let user_id = &req.user_id;
    let sort_key = req.sort_by.unwrap_or(state.limits.default_sort);
    let limit = state.limits.cap(req.limit, Some(state.limits.default_limit));

    tracing::info!("Finding matches for user: {}, sort: {}, limit: {:?}", user_id, sort_key, limit);

    let raw_answers = match state.answers_source.fetch_answers(user_id).await {
        Ok(answers) => answers,
        Err(e) => return fetch_failed("Failed to fetch survey answers", user_id, e),
    };

    let viewer = match validate_answers("viewer", &raw_answers) {
        Ok(answers) => answers,
        Err(response) => return response,
    };

    let candidates = match state.pool_source.fetch(user_id).await {
        Ok(candidates) => candidates,
        Err(e) => return fetch_failed("Failed to fetch candidate pool", user_id, e),
    };

    tracing::debug!("Found {} candidates for {}", candidates.len(), user_id);

    let outcome = state.ranker.rank(&viewer, candidates, sort_key);
    let response = RankResponse::from_outcome(outcome, limit);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates, {} rejected)",
        response.matches.len(),
        user_id,
        response.total_candidates,
        response.rejected.len()
    );

    HttpResponse::Ok().json(response)
}

fn fetch_failed(what: &str, user_id: &str, err: FetchError) -> HttpResponse {
    match err {
        FetchError::NotFound(message) => {
            tracing::info!("{} for {}: {}", what, user_id, message);
            HttpResponse::NotFound().json(ErrorResponse {
                error: what.to_string(),
                message,
                status_code: 404,
            })
        }
        other => {
            tracing::error!("{} for {}: {}", what, user_id, other);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: what.to_string(),
                message: other.to_string(),
                status_code: 502,
            })
        }
    }
}
