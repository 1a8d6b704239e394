use crate::models::{SurveyField, FIELD_COUNT};
use thiserror::Error;

/// Allowed drift of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Default importance of each survey field, in canonical order
pub const DEFAULT_WEIGHTS: [f64; FIELD_COUNT] = [
    0.15, // cleanliness_level
    0.10, // introvert_extrovert
    0.10, // sleep_schedule
    0.10, // noise_tolerance
    0.10, // food_preference
    0.08, // smoking_habits
    0.10, // pets_preference
    0.07, // guest_comfort
    0.10, // study_habits
    0.10, // budget_flexibility
];

/// Rejected weight table. Fatal at start-up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightConfigError {
    #[error("unknown weight key: {0}")]
    UnknownField(String),

    #[error("weight for {0} is configured more than once")]
    DuplicateField(SurveyField),

    #[error("no weight configured for {0}")]
    MissingField(SurveyField),

    #[error("weight for {field} must be in (0, 1), got {value}")]
    OutOfRange { field: SurveyField, value: f64 },

    #[error("weights must sum to 1.0 (±{tolerance}), got {sum}")]
    InvalidSum { sum: f64, tolerance: f64 },
}

/// Per-field importance coefficients used by the scorer
///
/// Construction validates that every field has exactly one weight in (0, 1)
/// and that the weights sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    weights: [f64; FIELD_COUNT],
}

impl FieldWeights {
    /// Build from weights in canonical field order
    pub fn new(weights: [f64; FIELD_COUNT]) -> Result<Self, WeightConfigError> {
        for field in SurveyField::ALL {
            let value = weights[field.index()];
            if !(value > 0.0 && value < 1.0) {
                return Err(WeightConfigError::OutOfRange { field, value });
            }
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightConfigError::InvalidSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(Self { weights })
    }

    /// Build from `(key, weight)` pairs, e.g. a configuration table
    ///
    /// Keys may be column names (`guest_comfort`) or short aliases (`guests`).
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, WeightConfigError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut slots: [Option<f64>; FIELD_COUNT] = [None; FIELD_COUNT];

        for (key, value) in entries {
            let field = SurveyField::from_key(key)
                .ok_or_else(|| WeightConfigError::UnknownField(key.to_string()))?;
            let slot = &mut slots[field.index()];
            if slot.is_some() {
                return Err(WeightConfigError::DuplicateField(field));
            }
            *slot = Some(value);
        }

        let mut weights = [0.0; FIELD_COUNT];
        for field in SurveyField::ALL {
            weights[field.index()] =
                slots[field.index()].ok_or(WeightConfigError::MissingField(field))?;
        }

        Self::new(weights)
    }

    #[inline]
    pub fn get(&self, field: SurveyField) -> f64 {
        self.weights[field.index()]
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        let weights = FieldWeights::new(DEFAULT_WEIGHTS).unwrap();
        assert_eq!(weights, FieldWeights::default());
        assert_eq!(weights.get(SurveyField::Cleanliness), 0.15);
        assert_eq!(weights.get(SurveyField::Smoking), 0.08);
        assert_eq!(weights.get(SurveyField::Guests), 0.07);
    }

    #[test]
    fn test_sum_outside_tolerance() {
        let mut raw = DEFAULT_WEIGHTS;
        raw[0] = 0.16;
        match FieldWeights::new(raw) {
            Err(WeightConfigError::InvalidSum { sum, .. }) => assert!((sum - 1.01).abs() < 1e-9),
            other => panic!("expected InvalidSum, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_within_tolerance() {
        let mut raw = DEFAULT_WEIGHTS;
        raw[0] += 5e-7;
        assert!(FieldWeights::new(raw).is_ok());
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut raw = DEFAULT_WEIGHTS;
        raw[1] = 0.0;
        raw[2] = 0.20;
        assert!(matches!(
            FieldWeights::new(raw),
            Err(WeightConfigError::OutOfRange { field: SurveyField::Social, .. })
        ));
    }

    #[test]
    fn test_from_entries_with_aliases() {
        let entries = [
            ("cleanliness", 0.15),
            ("social", 0.10),
            ("sleep_schedule", 0.10),
            ("noise", 0.10),
            ("food", 0.10),
            ("smoking", 0.08),
            ("pets", 0.10),
            ("guests", 0.07),
            ("study", 0.10),
            ("budget_flexibility", 0.10),
        ];
        let weights = FieldWeights::from_entries(entries).unwrap();
        assert_eq!(weights, FieldWeights::default());
    }

    #[test]
    fn test_from_entries_duplicate_via_alias() {
        let entries = [("cleanliness_level", 0.15), ("cleanliness", 0.15)];
        assert_eq!(
            FieldWeights::from_entries(entries),
            Err(WeightConfigError::DuplicateField(SurveyField::Cleanliness))
        );
    }

    #[test]
    fn test_from_entries_missing_field() {
        let entries: Vec<(&str, f64)> = SurveyField::ALL
            .iter()
            .filter(|f| **f != SurveyField::Budget)
            .map(|f| (f.key(), 0.1))
            .collect();
        assert_eq!(
            FieldWeights::from_entries(entries),
            Err(WeightConfigError::MissingField(SurveyField::Budget))
        );
    }

    #[test]
    fn test_from_entries_unknown_key() {
        let entries = [("height", 0.5)];
        assert_eq!(
            FieldWeights::from_entries(entries),
            Err(WeightConfigError::UnknownField("height".to_string()))
        );
    }
}
