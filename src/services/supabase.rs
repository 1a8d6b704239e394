use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::models::{Candidate, SurveyAnswers};
use crate::services::source::{CandidatePoolSource, FetchError, ViewerAnswersSource};

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub profiles: String,
    pub survey_answers: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            profiles: "profiles".to_string(),
            survey_answers: "survey_answers".to_string(),
        }
    }
}

/// Supabase (PostgREST) client
///
/// Handles all reads the matching service needs:
/// - Fetching a user's survey answers
/// - Loading the candidate pool with each profile's survey response embedded
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    schema: String,
    client: Client,
    tables: SupabaseTables,
}

/// Profile row with its survey response embedded by PostgREST
#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    age: Option<i64>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    college_workplace: Option<String>,
    #[serde(default)]
    profile_photo_url: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    survey_answers: Value,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        service_key: String,
        schema: String,
        tables: SupabaseTables,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            service_key,
            schema,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn get_rows(&self, url: &str, what: &str) -> Result<Vec<Value>, FetchError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Accept-Profile", &self.schema)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch {}: {} - {}", what, status, body);
            return Err(FetchError::ApiError(format!("Failed to fetch {}: {}", what, status)));
        }

        let json: Value = response.json().await?;
        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(FetchError::InvalidResponse(format!(
                "Expected an array of {} rows",
                what
            ))),
        }
    }
}

#[async_trait]
impl ViewerAnswersSource for SupabaseClient {
    /// Fetch the survey answers stored for a user
    async fn fetch_answers(&self, user_id: &str) -> Result<SurveyAnswers, FetchError> {
        let url = format!(
            "{}?select=*&user_id=eq.{}&limit=1",
            self.table_url(&self.tables.survey_answers),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching survey answers for user: {}", user_id);

        let rows = self.get_rows(&url, "survey answers").await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(format!("Survey answers not found for user {}", user_id)))?;

        serde_json::from_value(row)
            .map_err(|e| FetchError::InvalidResponse(format!("Failed to parse survey answers: {}", e)))
    }
}

#[async_trait]
impl CandidatePoolSource for SupabaseClient {
    /// Load every complete profile other than the viewer's
    async fn fetch(&self, viewer_id: &str) -> Result<Vec<Candidate>, FetchError> {
        let select = format!("*,{}(*)", self.tables.survey_answers);
        let url = format!(
            "{}?select={}&id=neq.{}&order=created_at.asc",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(&select),
            urlencoding::encode(viewer_id)
        );

        let rows = self.get_rows(&url, "profiles").await?;
        let total = rows.len();

        let candidates: Vec<Candidate> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<ProfileRow>(row) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::debug!("Skipping unparseable profile row: {}", e);
                    None
                }
            })
            .filter(|profile| profile.id != viewer_id)
            .filter_map(into_candidate)
            .collect();

        tracing::debug!(
            "Loaded {} eligible candidates for {} (from {} profiles)",
            candidates.len(),
            viewer_id,
            total
        );

        Ok(candidates)
    }
}

/// Keep only complete profiles that have exactly one survey response
fn into_candidate(profile: ProfileRow) -> Option<Candidate> {
    let answers = match profile.survey_answers {
        Value::Array(mut rows) if rows.len() == 1 => rows.pop()?,
        row @ Value::Object(_) => row,
        _ => return None,
    };
    let answers: SurveyAnswers = match serde_json::from_value(answers) {
        Ok(answers) => answers,
        Err(e) => {
            tracing::debug!("Skipping profile {} with unparseable survey row: {}", profile.id, e);
            return None;
        }
    };

    let full_name = profile.full_name.filter(|name| !name.trim().is_empty())?;
    let city = profile.city.filter(|city| !city.trim().is_empty())?;
    let age = u8::try_from(profile.age?).ok()?;

    Some(Candidate {
        id: profile.id,
        full_name,
        age,
        gender: profile.gender,
        city,
        college_workplace: profile.college_workplace,
        profile_photo_url: profile.profile_photo_url,
        bio: profile.bio,
        joined_at: profile.created_at,
        answers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerValue;
    use serde_json::json;

    fn row(value: Value) -> ProfileRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_supabase_client_creation() {
        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "test_key".to_string(),
            "public".to_string(),
            SupabaseTables::default(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.table_url("profiles"),
            "https://project.supabase.co/rest/v1/profiles"
        );
        assert_eq!(client.service_key, "test_key");
    }

    #[test]
    fn test_into_candidate_embedded_array() {
        let profile = row(json!({
            "id": "u1",
            "full_name": "Sarah Johnson",
            "age": 24,
            "city": "New York",
            "survey_answers": [{"cleanliness_level": 5, "guest_comfort": 2}]
        }));

        let candidate = into_candidate(profile).unwrap();
        assert_eq!(candidate.id, "u1");
        assert_eq!(candidate.age, 24);
        assert_eq!(candidate.answers.cleanliness_level, Some(AnswerValue::Integer(5)));
        assert_eq!(candidate.answers.study_habits, None);
    }

    #[test]
    fn test_into_candidate_embedded_object() {
        let profile = row(json!({
            "id": "u2",
            "full_name": "Emily Chen",
            "age": 23,
            "city": "New York",
            "survey_answers": {"sleep_schedule": 4}
        }));

        assert!(into_candidate(profile).is_some());
    }

    #[test]
    fn test_into_candidate_skips_incomplete() {
        let no_survey = row(json!({
            "id": "u3", "full_name": "A", "age": 22, "city": "NYC", "survey_answers": []
        }));
        assert!(into_candidate(no_survey).is_none());

        let no_city = row(json!({
            "id": "u4", "full_name": "B", "age": 22, "survey_answers": [{}]
        }));
        assert!(into_candidate(no_city).is_none());

        let bad_survey_row = row(json!({
            "id": "u6", "full_name": "D", "age": 22, "city": "NYC", "survey_answers": ["oops"]
        }));
        assert!(into_candidate(bad_survey_row).is_none());

        let bad_age = row(json!({
            "id": "u5", "full_name": "C", "age": 400, "city": "NYC", "survey_answers": [{}]
        }));
        assert!(into_candidate(bad_age).is_none());
    }

    #[test]
    fn test_into_candidate_passes_non_integer_answers_through() {
        let profile = row(json!({
            "id": "u7",
            "full_name": "Emily Chen",
            "age": 23,
            "city": "New York",
            "survey_answers": [{"study_habits": 3.5}]
        }));

        let candidate = into_candidate(profile).unwrap();
        assert_eq!(
            candidate.answers.study_habits,
            Some(AnswerValue::Other(json!(3.5)))
        );
    }
}
