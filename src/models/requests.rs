use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to generate recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRecommendationsRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    #[serde(default, alias = "userId")]
    pub user_id: String,
}

/// Request to record a liked/skipped decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordDecisionRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    #[serde(default, alias = "userId")]
    pub user_id: String,
    #[validate(length(min = 1, message = "experience_id is required"))]
    #[serde(default, alias = "experienceId", alias = "recommendation_id")]
    pub experience_id: String,
    #[serde(default)]
    pub decision: String,
}
