// Criterion benchmarks for Nestmate Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nestmate_algo::core::{compatibility_score, tags_for, FieldWeights, Ranker};
use nestmate_algo::models::{AnswerSet, Candidate, SortKey, SurveyAnswers};

fn answers_for(id: usize) -> AnswerSet {
    let mut values = [1u8; 10];
    for (i, slot) in values.iter_mut().enumerate() {
        *slot = ((id * 7 + i * 3) % 5 + 1) as u8;
    }
    // Every value is in 1..=5
    AnswerSet::new(values).unwrap()
}

fn create_candidate(id: usize) -> Candidate {
    Candidate {
        id: id.to_string(),
        full_name: format!("User {}", id),
        age: 19 + (id % 12) as u8,
        gender: None,
        city: "New York".to_string(),
        college_workplace: None,
        profile_photo_url: None,
        bio: None,
        joined_at: None,
        answers: SurveyAnswers::from(answers_for(id)),
    }
}

fn bench_compatibility_score(c: &mut Criterion) {
    let weights = FieldWeights::default();
    let viewer = answers_for(0);
    let candidate = answers_for(3);

    c.bench_function("compatibility_score", |b| {
        b.iter(|| compatibility_score(black_box(&viewer), black_box(&candidate), black_box(&weights)));
    });
}

fn bench_tags(c: &mut Criterion) {
    let answers = answers_for(2);

    c.bench_function("tags_for", |b| {
        b.iter(|| tags_for(black_box(&answers)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = Ranker::with_default_weights();
    let viewer = answers_for(0);

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000, 5000].iter() {
        let candidates: Vec<Candidate> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_by_score", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| ranker.rank(black_box(&viewer), black_box(candidates.clone()), SortKey::Score));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compatibility_score, bench_tags, bench_ranking);

criterion_main!(benches);
