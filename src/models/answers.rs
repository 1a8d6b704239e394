use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest and highest answer on every survey axis
pub const MIN_ANSWER: u8 = 1;
pub const MAX_ANSWER: u8 = 5;

/// Number of survey axes
pub const FIELD_COUNT: usize = 10;

/// One axis of the lifestyle survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SurveyField {
    #[serde(rename = "cleanliness_level")]
    Cleanliness,
    #[serde(rename = "introvert_extrovert")]
    Social,
    #[serde(rename = "sleep_schedule")]
    Sleep,
    #[serde(rename = "noise_tolerance")]
    Noise,
    #[serde(rename = "food_preference")]
    Food,
    #[serde(rename = "smoking_habits")]
    Smoking,
    #[serde(rename = "pets_preference")]
    Pets,
    #[serde(rename = "guest_comfort")]
    Guests,
    #[serde(rename = "study_habits")]
    Study,
    #[serde(rename = "budget_flexibility")]
    Budget,
}

impl SurveyField {
    /// All fields in canonical order
    pub const ALL: [SurveyField; FIELD_COUNT] = [
        SurveyField::Cleanliness,
        SurveyField::Social,
        SurveyField::Sleep,
        SurveyField::Noise,
        SurveyField::Food,
        SurveyField::Smoking,
        SurveyField::Pets,
        SurveyField::Guests,
        SurveyField::Study,
        SurveyField::Budget,
    ];

    /// Position in the canonical order
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Persisted column / configuration key
    pub fn key(self) -> &'static str {
        match self {
            SurveyField::Cleanliness => "cleanliness_level",
            SurveyField::Social => "introvert_extrovert",
            SurveyField::Sleep => "sleep_schedule",
            SurveyField::Noise => "noise_tolerance",
            SurveyField::Food => "food_preference",
            SurveyField::Smoking => "smoking_habits",
            SurveyField::Pets => "pets_preference",
            SurveyField::Guests => "guest_comfort",
            SurveyField::Study => "study_habits",
            SurveyField::Budget => "budget_flexibility",
        }
    }

    /// Short alias accepted in configuration files
    pub fn alias(self) -> &'static str {
        match self {
            SurveyField::Cleanliness => "cleanliness",
            SurveyField::Social => "social",
            SurveyField::Sleep => "sleep",
            SurveyField::Noise => "noise",
            SurveyField::Food => "food",
            SurveyField::Smoking => "smoking",
            SurveyField::Pets => "pets",
            SurveyField::Guests => "guests",
            SurveyField::Study => "study",
            SurveyField::Budget => "budget",
        }
    }

    /// Resolve a column key or its short alias
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key) || field.alias().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An answer set that cannot be scored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedAnswerSet {
    #[error("missing answer for {0}")]
    MissingField(SurveyField),

    #[error("answer for {field} must be between 1 and 5, got {value}")]
    OutOfRange { field: SurveyField, value: i64 },

    #[error("answer for {field} must be a whole number, got {value}")]
    NotAnInteger { field: SurveyField, value: String },
}

impl MalformedAnswerSet {
    pub fn field(&self) -> SurveyField {
        match self {
            MalformedAnswerSet::MissingField(field) => *field,
            MalformedAnswerSet::OutOfRange { field, .. } => *field,
            MalformedAnswerSet::NotAnInteger { field, .. } => *field,
        }
    }
}

/// One answer as received, before range checks
///
/// Anything that is not a JSON integer is kept as-is so the answer set can
/// be rejected on its own instead of failing the surrounding payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Other(serde_json::Value),
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Integer(value)
    }
}

/// Survey answers as persisted in the `survey_answers` table
///
/// Nothing is checked here; a row may be missing answers or hold values
/// outside the 1-5 scale or that are not numbers at all. Convert to [`AnswerSet`] before scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAnswers {
    #[serde(default)]
    pub cleanliness_level: Option<AnswerValue>,
    #[serde(default)]
    pub introvert_extrovert: Option<AnswerValue>,
    #[serde(default)]
    pub sleep_schedule: Option<AnswerValue>,
    #[serde(default)]
    pub noise_tolerance: Option<AnswerValue>,
    #[serde(default)]
    pub food_preference: Option<AnswerValue>,
    #[serde(default)]
    pub smoking_habits: Option<AnswerValue>,
    #[serde(default)]
    pub pets_preference: Option<AnswerValue>,
    #[serde(default)]
    pub guest_comfort: Option<AnswerValue>,
    #[serde(default)]
    pub study_habits: Option<AnswerValue>,
    #[serde(default)]
    pub budget_flexibility: Option<AnswerValue>,
}

impl SurveyAnswers {
    pub fn get(&self, field: SurveyField) -> Option<&AnswerValue> {
        match field {
            SurveyField::Cleanliness => self.cleanliness_level.as_ref(),
            SurveyField::Social => self.introvert_extrovert.as_ref(),
            SurveyField::Sleep => self.sleep_schedule.as_ref(),
            SurveyField::Noise => self.noise_tolerance.as_ref(),
            SurveyField::Food => self.food_preference.as_ref(),
            SurveyField::Smoking => self.smoking_habits.as_ref(),
            SurveyField::Pets => self.pets_preference.as_ref(),
            SurveyField::Guests => self.guest_comfort.as_ref(),
            SurveyField::Study => self.study_habits.as_ref(),
            SurveyField::Budget => self.budget_flexibility.as_ref(),
        }
    }

    pub fn set(&mut self, field: SurveyField, value: Option<AnswerValue>) {
        let slot = match field {
            SurveyField::Cleanliness => &mut self.cleanliness_level,
            SurveyField::Social => &mut self.introvert_extrovert,
            SurveyField::Sleep => &mut self.sleep_schedule,
            SurveyField::Noise => &mut self.noise_tolerance,
            SurveyField::Food => &mut self.food_preference,
            SurveyField::Smoking => &mut self.smoking_habits,
            SurveyField::Pets => &mut self.pets_preference,
            SurveyField::Guests => &mut self.guest_comfort,
            SurveyField::Study => &mut self.study_habits,
            SurveyField::Budget => &mut self.budget_flexibility,
        };
        *slot = value;
    }

    /// Validate into a scoreable [`AnswerSet`]
    pub fn validate(&self) -> Result<AnswerSet, MalformedAnswerSet> {
        AnswerSet::try_from(self)
    }
}

/// A complete, in-range set of survey answers
///
/// Every value is guaranteed to lie in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerSet {
    values: [u8; FIELD_COUNT],
}

impl AnswerSet {
    /// Build from values in canonical field order
    pub fn new(values: [u8; FIELD_COUNT]) -> Result<Self, MalformedAnswerSet> {
        for field in SurveyField::ALL {
            check_range(field, values[field.index()] as i64)?;
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn get(&self, field: SurveyField) -> u8 {
        self.values[field.index()]
    }

    /// Copy with one answer replaced
    pub fn with(&self, field: SurveyField, value: u8) -> Result<Self, MalformedAnswerSet> {
        let mut values = self.values;
        values[field.index()] = value;
        Self::new(values)
    }
}

fn check_range(field: SurveyField, value: i64) -> Result<u8, MalformedAnswerSet> {
    if (MIN_ANSWER as i64..=MAX_ANSWER as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(MalformedAnswerSet::OutOfRange { field, value })
    }
}

impl TryFrom<&SurveyAnswers> for AnswerSet {
    type Error = MalformedAnswerSet;

    fn try_from(raw: &SurveyAnswers) -> Result<Self, Self::Error> {
        let mut values = [0u8; FIELD_COUNT];
        for field in SurveyField::ALL {
            let value = match raw.get(field) {
                Some(AnswerValue::Integer(value)) => *value,
                Some(AnswerValue::Other(other)) => {
                    return Err(MalformedAnswerSet::NotAnInteger {
                        field,
                        value: other.to_string(),
                    })
                }
                None => return Err(MalformedAnswerSet::MissingField(field)),
            };
            values[field.index()] = check_range(field, value)?;
        }
        Ok(Self { values })
    }
}

impl TryFrom<SurveyAnswers> for AnswerSet {
    type Error = MalformedAnswerSet;

    fn try_from(raw: SurveyAnswers) -> Result<Self, Self::Error> {
        AnswerSet::try_from(&raw)
    }
}

impl From<AnswerSet> for SurveyAnswers {
    fn from(answers: AnswerSet) -> Self {
        let mut raw = SurveyAnswers::default();
        for field in SurveyField::ALL {
            raw.set(field, Some(AnswerValue::Integer(answers.get(field) as i64)));
        }
        raw
    }
}
