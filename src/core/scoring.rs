use serde::{Deserialize, Serialize};

use crate::core::weights::FieldWeights;
use crate::models::{AnswerSet, MalformedAnswerSet, SurveyAnswers, SurveyField, MAX_ANSWER, MIN_ANSWER};

/// Largest possible distance between two answers on one axis
const MAX_DISTANCE: u8 = MAX_ANSWER - MIN_ANSWER;

/// Grid the raw score is snapped to before rounding
const SNAP_SCALE: f64 = 1e6;

/// Calculate the compatibility score (0-100) between two survey responses
///
/// Both answer sets are validated first; a missing or out-of-range answer
/// is returned as an error rather than scored.
pub fn score(
    viewer: &SurveyAnswers,
    candidate: &SurveyAnswers,
    weights: &FieldWeights,
) -> Result<u8, MalformedAnswerSet> {
    let viewer = viewer.validate()?;
    let candidate = candidate.validate()?;
    Ok(compatibility_score(&viewer, &candidate, weights))
}

/// Calculate the compatibility score (0-100) between two validated answer sets
///
/// Scoring formula:
/// score = round(100 * sum(weight[f] * similarity(|a[f] - b[f]|)))
///
/// where similarity(d) = (5 - d) / 5, except that answers at opposite ends of
/// the scale (d = 4) have similarity 0. Rounding is half away from zero.
pub fn compatibility_score(viewer: &AnswerSet, candidate: &AnswerSet, weights: &FieldWeights) -> u8 {
    let raw: f64 = SurveyField::ALL
        .iter()
        .map(|&field| weights.get(field) * field_similarity(viewer.get(field), candidate.get(field)))
        .sum::<f64>()
        * 100.0;

    round_score(raw)
}

/// Explain a score field by field
pub fn score_breakdown(viewer: &AnswerSet, candidate: &AnswerSet, weights: &FieldWeights) -> ScoreBreakdown {
    let fields = SurveyField::ALL
        .iter()
        .map(|&field| {
            let a = viewer.get(field);
            let b = candidate.get(field);
            let similarity = field_similarity(a, b);
            let weight = weights.get(field);
            FieldContribution {
                field,
                viewer: a,
                candidate: b,
                distance: a.abs_diff(b),
                similarity,
                weight,
                points: weight * similarity * 100.0,
            }
        })
        .collect();

    ScoreBreakdown {
        score: compatibility_score(viewer, candidate, weights),
        fields,
    }
}

/// Similarity (0-1) between two answers on the same axis
#[inline]
fn field_similarity(a: u8, b: u8) -> f64 {
    let distance = a.abs_diff(b);
    if distance >= MAX_DISTANCE {
        return 0.0;
    }

    (MAX_ANSWER - distance) as f64 / MAX_ANSWER as f64
}

/// Round a raw 0-100 score half away from zero
///
/// Weights are decimal fractions, so a boundary like 92.5 can come out of the
/// weighted sum as 92.49999999999999; snapping first keeps it on the boundary.
#[inline]
fn round_score(raw: f64) -> u8 {
    let snapped = (raw * SNAP_SCALE).round() / SNAP_SCALE;
    snapped.round().clamp(0.0, 100.0) as u8
}

/// Per-field explanation of a compatibility score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub fields: Vec<FieldContribution>,
}

/// Contribution of one survey field to a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContribution {
    pub field: SurveyField,
    pub viewer: u8,
    pub candidate: u8,
    pub distance: u8,
    pub similarity: f64,
    pub weight: f64,
    /// Points out of 100 this field added to the score
    pub points: f64,
}
