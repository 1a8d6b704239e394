use crate::models::{AnswerSet, MalformedAnswerSet, SurveyAnswers, SurveyField, Tag};

/// Maximum number of tags attached to a match
pub const MAX_TAGS: usize = 3;

/// Threshold rules, one per field, in the order they are evaluated
const TAG_RULES: [(SurveyField, fn(u8) -> Option<Tag>); 6] = [
    (SurveyField::Cleanliness, cleanliness_tag),
    (SurveyField::Sleep, sleep_tag),
    (SurveyField::Social, social_tag),
    (SurveyField::Pets, pets_tag),
    (SurveyField::Study, study_tag),
    (SurveyField::Guests, guests_tag),
];

/// Summarize raw survey answers as up to three descriptive tags
pub fn derive_tags(answers: &SurveyAnswers) -> Result<Vec<Tag>, MalformedAnswerSet> {
    let answers = answers.validate()?;
    Ok(tags_for(&answers))
}

/// Summarize a validated answer set as up to three descriptive tags
///
/// Rules run in fixed field order and the first three tags produced are kept.
pub fn tags_for(answers: &AnswerSet) -> Vec<Tag> {
    TAG_RULES
        .iter()
        .filter_map(|(field, rule)| rule(answers.get(*field)))
        .take(MAX_TAGS)
        .collect()
}

fn cleanliness_tag(value: u8) -> Option<Tag> {
    match value {
        4..=5 => Some(Tag::Clean),
        1..=2 => Some(Tag::Relaxed),
        _ => None,
    }
}

fn sleep_tag(value: u8) -> Option<Tag> {
    match value {
        1..=2 => Some(Tag::EarlyBird),
        4..=5 => Some(Tag::NightOwl),
        _ => None,
    }
}

fn social_tag(value: u8) -> Option<Tag> {
    match value {
        4..=5 => Some(Tag::Social),
        1..=2 => Some(Tag::Quiet),
        _ => None,
    }
}

fn pets_tag(value: u8) -> Option<Tag> {
    match value {
        4..=5 => Some(Tag::PetLover),
        1 => Some(Tag::NoPets),
        _ => None,
    }
}

fn study_tag(value: u8) -> Option<Tag> {
    (value >= 4).then_some(Tag::Studious)
}

fn guests_tag(value: u8) -> Option<Tag> {
    match value {
        4..=5 => Some(Tag::Welcoming),
        1..=2 => Some(Tag::Homebody),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerValue;

    // cleanliness, social, sleep, noise, food, smoking, pets, guests, study, budget
    fn answers(values: [u8; 10]) -> AnswerSet {
        AnswerSet::new(values).unwrap()
    }

    #[test]
    fn test_truncates_in_field_order() {
        let tags = tags_for(&answers([5, 5, 1, 3, 3, 3, 5, 5, 5, 3]));
        assert_eq!(tags, vec![Tag::Clean, Tag::EarlyBird, Tag::Social]);
    }

    #[test]
    fn test_all_neutral_gives_no_tags() {
        assert!(tags_for(&answers([3; 10])).is_empty());
    }

    #[test]
    fn test_middle_values_skip_to_later_rules() {
        // Only pets, study and guests fire
        let tags = tags_for(&answers([3, 3, 3, 3, 3, 3, 1, 2, 4, 3]));
        assert_eq!(tags, vec![Tag::NoPets, Tag::Studious, Tag::Homebody]);
    }

    #[test]
    fn test_pets_two_is_neutral() {
        let tags = tags_for(&answers([3, 3, 3, 3, 3, 3, 2, 3, 3, 3]));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_low_end_tags() {
        let tags = tags_for(&answers([1, 1, 5, 3, 3, 3, 3, 3, 3, 3]));
        assert_eq!(tags, vec![Tag::Relaxed, Tag::NightOwl, Tag::Quiet]);
    }

    #[test]
    fn test_study_has_no_low_tag() {
        let tags = tags_for(&answers([3, 3, 3, 3, 3, 3, 3, 3, 1, 3]));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_non_tag_fields_ignored() {
        // noise, food, smoking and budget never produce tags
        let tags = tags_for(&answers([3, 3, 3, 5, 1, 5, 3, 3, 3, 1]));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_derive_tags_rejects_malformed() {
        let mut raw = SurveyAnswers::from(answers([3; 10]));
        raw.sleep_schedule = Some(AnswerValue::Integer(7));
        assert!(matches!(
            derive_tags(&raw),
            Err(MalformedAnswerSet::OutOfRange { field: SurveyField::Sleep, value: 7 })
        ));
    }
}
