use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredExperience;

/// Response for the generate recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<ScoredExperience>,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record decision response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDecisionResponse {
    pub success: bool,
    pub event_id: String,
}
