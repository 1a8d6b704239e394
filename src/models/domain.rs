use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::answers::{MalformedAnswerSet, SurveyAnswers};

/// Prospective roommate with their survey answers
///
/// Profile fields are display metadata; only `age` and `answers` are read
/// by the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(rename = "fullName", alias = "full_name")]
    pub full_name: String,
    pub age: u8,
    #[serde(default)]
    pub gender: Option<String>,
    pub city: String,
    #[serde(rename = "collegeWorkplace", alias = "college_workplace", default)]
    pub college_workplace: Option<String>,
    #[serde(rename = "profilePhotoUrl", alias = "profile_photo_url", default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "joinedAt", alias = "created_at", default)]
    pub joined_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Absent answers deserialize as an empty set and fail validation per candidate
    #[serde(default)]
    pub answers: SurveyAnswers,
}

/// Short descriptor derived from a single survey answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Clean,
    Relaxed,
    #[serde(rename = "Early Bird")]
    EarlyBird,
    #[serde(rename = "Night Owl")]
    NightOwl,
    Social,
    Quiet,
    #[serde(rename = "Pet Lover")]
    PetLover,
    #[serde(rename = "No Pets")]
    NoPets,
    Studious,
    Welcoming,
    Homebody,
}

impl Tag {
    pub fn label(self) -> &'static str {
        match self {
            Tag::Clean => "Clean",
            Tag::Relaxed => "Relaxed",
            Tag::EarlyBird => "Early Bird",
            Tag::NightOwl => "Night Owl",
            Tag::Social => "Social",
            Tag::Quiet => "Quiet",
            Tag::PetLover => "Pet Lover",
            Tag::NoPets => "No Pets",
            Tag::Studious => "Studious",
            Tag::Welcoming => "Welcoming",
            Tag::Homebody => "Homebody",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation bucket for a compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Fair,
    Good,
    Great,
    Excellent,
}

impl MatchTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => MatchTier::Excellent,
            80..=89 => MatchTier::Great,
            70..=79 => MatchTier::Good,
            _ => MatchTier::Fair,
        }
    }
}

/// Ordering applied to ranked matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest score first
    #[default]
    Score,
    /// Youngest first
    Age,
    /// Order the candidates were supplied in
    #[serde(alias = "newest")]
    Arrival,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "score" => Ok(SortKey::Score),
            "age" => Ok(SortKey::Age),
            "arrival" | "newest" => Ok(SortKey::Arrival),
            other => Err(format!(
                "unknown sort key '{}', expected one of: score, age, arrival",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Score => "score",
            SortKey::Age => "age",
            SortKey::Arrival => "arrival",
        };
        f.write_str(name)
    }
}

/// Candidate enriched with its compatibility score and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(rename = "matchScore")]
    pub score: u8,
    pub tier: MatchTier,
    pub tags: Vec<Tag>,
}

/// Candidate excluded from a ranking because its answers are malformed
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedCandidate {
    /// Position in the input sequence
    pub position: usize,
    pub candidate_id: String,
    pub error: MalformedAnswerSet,
}

/// Output of a ranking call
#[derive(Debug, Clone, Default)]
pub struct RankOutcome {
    pub matches: Vec<MatchResult>,
    pub rejected: Vec<RejectedCandidate>,
    pub total_candidates: usize,
}
