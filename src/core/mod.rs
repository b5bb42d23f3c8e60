// Core algorithm exports
pub mod distance;
pub mod explain;
pub mod filters;
pub mod recommender;
pub mod scoring;
pub mod selector;
pub mod similarity;

pub use distance::{haversine_distance, ReferencePoint};
pub use explain::{explain, matched_terms, POPULAR_EXPLANATION, TRENDING_EXPLANATION};
pub use filters::{exclude_skipped, skipped_ids};
pub use recommender::{Recommender, RecommendationResult};
pub use scoring::{calculate_experience_score, partner_bonus, proximity_bonus, ScoreBreakdown};
pub use selector::{select_diverse, sort_by_score, Selection};
pub use similarity::cosine_similarity;
