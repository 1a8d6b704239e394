// Unit tests for Nestmate Algo

use nestmate_algo::core::{
    scoring::{compatibility_score, score, score_breakdown},
    tags::{derive_tags, tags_for},
    weights::FieldWeights,
};
use nestmate_algo::models::{AnswerSet, AnswerValue, MalformedAnswerSet, SurveyAnswers, SurveyField, Tag};

fn answers(values: [u8; 10]) -> AnswerSet {
    AnswerSet::new(values).unwrap()
}

fn reference_viewer() -> AnswerSet {
    // cleanliness:5, social:3, sleep:2, noise:3, food:4, smoking:1, pets:5, guests:3, study:4, budget:3
    answers([5, 3, 2, 3, 4, 1, 5, 3, 4, 3])
}

/// Deterministic spread of valid answer sets
fn sample_answer_sets() -> Vec<AnswerSet> {
    (0..60usize)
        .map(|seed| {
            let mut values = [1u8; 10];
            for (i, slot) in values.iter_mut().enumerate() {
                *slot = ((seed * 31 + i * 17 + seed / 5) % 5 + 1) as u8;
            }
            answers(values)
        })
        .collect()
}

#[test]
fn test_guest_comfort_example() {
    let viewer = reference_viewer();
    let candidate = answers([5, 3, 2, 3, 4, 1, 5, 2, 4, 3]);
    assert_eq!(compatibility_score(&viewer, &candidate, &FieldWeights::default()), 99);
}

#[test]
fn test_smoking_example() {
    let viewer = reference_viewer();
    let candidate = viewer.with(SurveyField::Smoking, 5).unwrap();
    assert_eq!(compatibility_score(&viewer, &candidate, &FieldWeights::default()), 92);
}

#[test]
fn test_self_score_is_100() {
    let weights = FieldWeights::default();
    for a in sample_answer_sets() {
        assert_eq!(compatibility_score(&a, &a, &weights), 100);
    }
}

#[test]
fn test_score_is_symmetric_and_bounded() {
    let weights = FieldWeights::default();
    let sets = sample_answer_sets();
    for a in &sets {
        for b in &sets {
            let ab = compatibility_score(a, b, &weights);
            let ba = compatibility_score(b, a, &weights);
            assert_eq!(ab, ba, "score not symmetric for {:?} / {:?}", a, b);
            assert!(ab <= 100);
        }
    }
}

#[test]
fn test_widening_one_field_never_raises_score() {
    let weights = FieldWeights::default();
    for base in sample_answer_sets().iter().take(10) {
        for field in SurveyField::ALL {
            let anchor = base.get(field);
            // Move the other side step by step away from the anchor
            let mut previous = 100u8;
            let mut others: Vec<u8> = (1..=5).collect();
            others.sort_by_key(|v| v.abs_diff(anchor));
            for value in others {
                let candidate = base.with(field, value).unwrap();
                let current = compatibility_score(base, &candidate, &weights);
                assert!(
                    current <= previous,
                    "{} at distance {} scored {} after {}",
                    field,
                    value.abs_diff(anchor),
                    current,
                    previous
                );
                previous = current;
            }
        }
    }
}

#[test]
fn test_rounding_half_away_from_zero() {
    // Power-of-two weights keep the raw score exactly on the .5 boundary
    let weights = FieldWeights::new([
        0.125, 0.125, 0.09375, 0.09375, 0.09375, 0.09375, 0.09375, 0.09375, 0.09375, 0.09375,
    ])
    .unwrap();

    let viewer = answers([4, 3, 3, 3, 3, 3, 3, 3, 3, 3]);
    let candidate = answers([1, 3, 3, 3, 3, 3, 3, 3, 3, 3]);

    // 100 - 0.125 * (3/5) * 100 = 92.5
    assert_eq!(compatibility_score(&viewer, &candidate, &weights), 93);
}

#[test]
fn test_score_surfaces_malformed_input() {
    let viewer = SurveyAnswers::from(reference_viewer());
    let mut candidate = viewer.clone();
    candidate.budget_flexibility = Some(AnswerValue::Integer(0));

    assert_eq!(
        score(&viewer, &candidate, &FieldWeights::default()),
        Err(MalformedAnswerSet::OutOfRange {
            field: SurveyField::Budget,
            value: 0
        })
    );

    let empty = SurveyAnswers::default();
    assert_eq!(
        score(&empty, &viewer, &FieldWeights::default()),
        Err(MalformedAnswerSet::MissingField(SurveyField::Cleanliness))
    );
}

#[test]
fn test_score_accepts_valid_raw_answers() {
    let viewer = SurveyAnswers::from(reference_viewer());
    assert_eq!(score(&viewer, &viewer, &FieldWeights::default()), Ok(100));
}

#[test]
fn test_breakdown_points_sum_to_score() {
    let weights = FieldWeights::default();
    let viewer = reference_viewer();
    let candidate = answers([2, 4, 4, 1, 5, 3, 2, 5, 1, 2]);

    let breakdown = score_breakdown(&viewer, &candidate, &weights);
    let points: f64 = breakdown.fields.iter().map(|f| f.points).sum();

    assert_eq!(breakdown.score, compatibility_score(&viewer, &candidate, &weights));
    assert!((points - breakdown.score as f64).abs() <= 0.5 + 1e-9);
    for contribution in &breakdown.fields {
        assert!(contribution.points <= contribution.weight * 100.0 + 1e-9);
    }
}

#[test]
fn test_tag_example() {
    // cleanliness:5, social:5, sleep:1, pets:5, guests:5, study:5
    let tags = tags_for(&answers([5, 5, 1, 3, 3, 3, 5, 5, 5, 3]));
    assert_eq!(tags, vec![Tag::Clean, Tag::EarlyBird, Tag::Social]);

    let labels: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    assert_eq!(labels, vec!["Clean", "Early Bird", "Social"]);
}

#[test]
fn test_tags_bounded_and_deterministic() {
    for a in sample_answer_sets() {
        let first = tags_for(&a);
        assert!(first.len() <= 3);
        assert_eq!(first, tags_for(&a));
    }
}

#[test]
fn test_derive_tags_on_raw_answers() {
    let raw = SurveyAnswers::from(answers([3, 3, 3, 3, 3, 3, 3, 4, 3, 3]));
    assert_eq!(derive_tags(&raw), Ok(vec![Tag::Welcoming]));

    let mut missing = raw.clone();
    missing.introvert_extrovert = None;
    assert_eq!(
        derive_tags(&missing),
        Err(MalformedAnswerSet::MissingField(SurveyField::Social))
    );
}
