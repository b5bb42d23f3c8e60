//! Memora Recs - personalized experience recommendations for the Memora memory capsule
//!
//! This library ranks a read-only catalog of local experiences for a hotel
//! guest: semantic similarity between the guest's declared preferences and
//! each experience, blended with proximity and partner bonuses, then a
//! diversity-capped selection with a short explanation per pick.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{cosine_similarity, Recommender, RecommendationResult};
pub use models::{Experience, ScoredExperience, ScoringWeights, SelectionLimits, UserPreferenceProfile};
pub use services::{Catalog, EmbeddingProvider, RecommendationService};
