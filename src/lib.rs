//! Nestmate Algo - compatibility scoring and ranking service for Nestmate
//!
//! This library provides the core roommate-matching engine: a weighted
//! per-field scorer over lifestyle-survey answers, a tag heuristic that
//! summarizes one person's answers, and a ranker that orders a candidate
//! pool for a viewer.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compatibility_score, derive_tags, score, score_breakdown, tags_for, FieldWeights, Ranker};
pub use crate::models::{AnswerSet, Candidate, MalformedAnswerSet, MatchResult, RankOutcome, SortKey, SurveyAnswers, SurveyField, Tag};
