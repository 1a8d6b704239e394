use rayon::prelude::*;

use crate::core::{scoring::compatibility_score, tags::tags_for, weights::FieldWeights};
use crate::models::{
    AnswerSet, Candidate, MalformedAnswerSet, MatchResult, MatchTier, RankOutcome, RejectedCandidate,
    SortKey,
};

/// Pool size at which scoring moves onto the rayon thread pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Ranking orchestrator
///
/// # Pipeline Stages
/// 1. Validate each candidate's answers
/// 2. Score against the viewer and derive tags
/// 3. Stable sort by the requested key
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: FieldWeights,
    parallel_threshold: usize,
}

impl Ranker {
    pub fn new(weights: FieldWeights) -> Self {
        Self {
            weights,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(FieldWeights::default())
    }

    /// Score pools of at least `threshold` candidates in parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Rank candidates for a viewer
    ///
    /// # Arguments
    /// * `viewer` - The viewer's validated survey answers
    /// * `candidates` - Candidates in arrival order
    /// * `sort_key` - Ordering of the returned matches
    ///
    /// # Returns
    /// RankOutcome with every scoreable candidate as a match and every
    /// candidate with malformed answers listed as rejected
    pub fn rank(&self, viewer: &AnswerSet, candidates: Vec<Candidate>, sort_key: SortKey) -> RankOutcome {
        let total_candidates = candidates.len();

        // Indexed collect keeps input order, so sorting below stays stable
        // with respect to arrival.
        let evaluated: Vec<Result<MatchResult, RejectedCandidate>> =
            if total_candidates >= self.parallel_threshold {
                candidates
                    .into_par_iter()
                    .enumerate()
                    .map(|(position, candidate)| self.evaluate(viewer, position, candidate))
                    .collect()
            } else {
                candidates
                    .into_iter()
                    .enumerate()
                    .map(|(position, candidate)| self.evaluate(viewer, position, candidate))
                    .collect()
            };

        let mut matches = Vec::with_capacity(total_candidates);
        let mut rejected = Vec::new();
        for outcome in evaluated {
            match outcome {
                Ok(result) => matches.push(result),
                Err(reject) => {
                    tracing::warn!(
                        "Excluding candidate {} at position {}: {}",
                        reject.candidate_id,
                        reject.position,
                        reject.error
                    );
                    rejected.push(reject);
                }
            }
        }

        sort_matches(&mut matches, sort_key);

        tracing::debug!(
            "Ranked {} candidates by {}: {} matches, {} rejected",
            total_candidates,
            sort_key,
            matches.len(),
            rejected.len()
        );

        RankOutcome {
            matches,
            rejected,
            total_candidates,
        }
    }

    fn evaluate(
        &self,
        viewer: &AnswerSet,
        position: usize,
        candidate: Candidate,
    ) -> Result<MatchResult, RejectedCandidate> {
        let answers = match AnswerSet::try_from(&candidate.answers) {
            Ok(answers) => answers,
            Err(error) => return Err(reject(position, candidate, error)),
        };

        let score = compatibility_score(viewer, &answers, &self.weights);

        Ok(MatchResult {
            tier: MatchTier::from_score(score),
            tags: tags_for(&answers),
            score,
            candidate,
        })
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn reject(position: usize, candidate: Candidate, error: MalformedAnswerSet) -> RejectedCandidate {
    RejectedCandidate {
        position,
        candidate_id: candidate.id,
        error,
    }
}

/// Order matches in place; `sort_by_key` is stable, so ties keep input order
fn sort_matches(matches: &mut [MatchResult], sort_key: SortKey) {
    match sort_key {
        SortKey::Score => matches.sort_by_key(|m| std::cmp::Reverse(m.score)),
        SortKey::Age => matches.sort_by_key(|m| m.candidate.age),
        SortKey::Arrival => {}
    }
}
