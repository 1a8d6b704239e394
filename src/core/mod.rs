// Core algorithm exports
pub mod ranker;
pub mod scoring;
pub mod tags;
pub mod weights;

pub use ranker::{Ranker, DEFAULT_PARALLEL_THRESHOLD};
pub use scoring::{compatibility_score, score, score_breakdown, FieldContribution, ScoreBreakdown};
pub use tags::{derive_tags, tags_for, MAX_TAGS};
pub use weights::{FieldWeights, WeightConfigError, DEFAULT_WEIGHTS, WEIGHT_SUM_TOLERANCE};
