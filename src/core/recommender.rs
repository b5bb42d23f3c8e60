use std::collections::HashMap;
use crate::core::{
    explain::{explain, TRENDING_EXPLANATION},
    scoring::calculate_experience_score,
    selector::{select_diverse, sort_by_score},
};
use crate::models::{
    Experience, PickSource, RankedExperience, ScoredExperience, ScoringWeights, SelectionLimits,
    UserPreferenceProfile,
};

/// Result of the ranking process
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    pub recommendations: Vec<ScoredExperience>,
    pub total_candidates: usize,
}

/// Ranking orchestrator - scores, selects and explains candidates
///
/// # Pipeline Stages
/// 1. Blended scoring (similarity + proximity + partner)
/// 2. Stable sort by score
/// 3. Diversity-capped selection with fallback fill
/// 4. Per-pick explanation
///
/// The recommender is pure: embeddings are produced beforehand and handed
/// in keyed by experience id.
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: ScoringWeights,
    limits: SelectionLimits,
}

impl Recommender {
    pub fn new(weights: ScoringWeights, limits: SelectionLimits) -> Self {
        Self { weights, limits }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default(), SelectionLimits::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn limits(&self) -> &SelectionLimits {
        &self.limits
    }

    /// Rank candidates for a guest
    ///
    /// # Arguments
    /// * `profile` - The guest's declared preferences, used for explanations
    /// * `user_embedding` - Embedding of the preference text; empty for a blank profile
    /// * `candidates` - Experiences left after skip filtering, in catalog order
    /// * `embeddings` - Experience embeddings keyed by experience id
    ///
    /// A candidate missing from `embeddings` scores with zero similarity.
    pub fn rank(
        &self,
        profile: &UserPreferenceProfile,
        user_embedding: &[f32],
        candidates: Vec<Experience>,
        embeddings: &HashMap<String, Vec<f32>>,
    ) -> RecommendationResult {
        let total_candidates = candidates.len();

        let mut ranked: Vec<RankedExperience> = candidates
            .into_iter()
            .map(|experience| {
                let experience_embedding = embeddings
                    .get(&experience.experience_id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);

                let breakdown = calculate_experience_score(
                    user_embedding,
                    experience_embedding,
                    &experience,
                    &self.weights,
                );

                tracing::trace!(
                    experience_id = %experience.experience_id,
                    similarity = breakdown.similarity,
                    proximity = breakdown.proximity,
                    partner = breakdown.partner,
                    "Scored experience"
                );

                RankedExperience {
                    score: breakdown.total(),
                    experience,
                }
            })
            .collect();

        sort_by_score(&mut ranked);

        let recommendations = select_diverse(&ranked, &self.limits)
            .into_iter()
            .map(|selection| {
                let why_this_for_you = match selection.source {
                    PickSource::Diversity => explain(&selection.ranked.experience, profile),
                    PickSource::Fallback => TRENDING_EXPLANATION.to_string(),
                };

                ScoredExperience {
                    experience: selection.ranked.experience,
                    why_this_for_you,
                    score: selection.ranked.score,
                    source: selection.source,
                }
            })
            .collect();

        RecommendationResult {
            recommendations,
            total_candidates,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_defaults()
    }
}
