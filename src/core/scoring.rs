use crate::core::similarity::cosine_similarity;
use crate::models::{Experience, ScoringWeights};

/// Per-factor contributions to an experience's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub proximity: f64,
    pub partner: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.similarity + self.proximity + self.partner
    }
}

/// Calculate the blended score of an experience for a guest
///
/// Scoring formula:
/// score = (
///     cosine(user, experience) +                             # semantic fit, [-1, 1]
///     max(0, (horizon - distance_km) / horizon) * proximity + # closer = higher
///     is_partner * partner                                    # brand affiliation
/// )
///
/// The result is ordinal only; it is not bounded above and not a probability.
pub fn calculate_experience_score(
    user_embedding: &[f32],
    experience_embedding: &[f32],
    experience: &Experience,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    ScoreBreakdown {
        similarity: cosine_similarity(user_embedding, experience_embedding),
        proximity: proximity_bonus(experience.distance_km, weights),
        partner: partner_bonus(experience.is_partner, weights),
    }
}

/// Linear bonus for experiences within the proximity horizon
///
/// Unknown distance earns nothing; anything at or past the horizon earns 0.
#[inline]
pub fn proximity_bonus(distance_km: Option<f64>, weights: &ScoringWeights) -> f64 {
    let horizon = weights.proximity_horizon_km;
    match distance_km {
        Some(distance) if horizon > 0.0 => {
            ((horizon - distance.max(0.0)) / horizon).max(0.0) * weights.proximity
        }
        _ => 0.0,
    }
}

#[inline]
pub fn partner_bonus(is_partner: bool, weights: &ScoringWeights) -> f64 {
    if is_partner {
        weights.partner
    } else {
        0.0
    }
}
