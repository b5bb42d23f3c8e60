use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    ErrorResponse, GenerateRecommendationsRequest, HealthResponse, RecommendationsResponse,
    RecordDecisionRequest, RecordDecisionResponse,
};
use crate::services::RecommendationService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(generate_recommendations))
        .route("/recommendations/decision", web::post().to(record_decision));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_size = state.service.catalog().len();
    let status = if catalog_size > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size,
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Generate recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// { "user_id": "string" }
/// ```
async fn generate_recommendations(
    state: web::Data<AppState>,
    req: web::Json<GenerateRecommendationsRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendations request: {:?}", errors);
        return validation_failed(errors);
    }

    let user_id = &req.user_id;
    tracing::info!("Generating recommendations for user: {}", user_id);

    match state.service.generate(user_id).await {
        Ok(result) => {
            tracing::info!(
                "Generated {} recommendations for user {} (from {} candidates)",
                result.recommendations.len(),
                user_id,
                result.total_candidates
            );

            HttpResponse::Ok().json(RecommendationsResponse {
                recommendations: result.recommendations,
                total_candidates: result.total_candidates,
            })
        }
        Err(e) => {
            tracing::error!("Failed to generate recommendations for {}: {}", user_id, e);
            actix_web::ResponseError::error_response(&e)
        }
    }
}

/// Record decision endpoint
///
/// POST /api/v1/recommendations/decision
///
/// Request body:
/// ```json
/// {
///   "user_id": "string",
///   "experience_id": "string",
///   "decision": "liked|skipped"
/// }
/// ```
async fn record_decision(
    state: web::Data<AppState>,
    req: web::Json<RecordDecisionRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state
        .service
        .record_decision(&req.user_id, &req.experience_id, &req.decision)
        .await
    {
        Ok(event_id) => HttpResponse::Ok().json(RecordDecisionResponse {
            success: true,
            event_id,
        }),
        Err(e) => {
            tracing::warn!(
                "Failed to record {} for {} on {}: {}",
                req.decision,
                req.user_id,
                req.experience_id,
                e
            );
            actix_web::ResponseError::error_response(&e)
        }
    }
}
