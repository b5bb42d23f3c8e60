// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Decision, Experience, PickSource, RankedExperience, ScoredExperience, ScoringWeights,
    SelectionLimits, UserPreferenceProfile, ViewedRecommendation,
};
pub use requests::{GenerateRecommendationsRequest, RecordDecisionRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendationsResponse, RecordDecisionResponse};
