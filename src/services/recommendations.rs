use crate::core::{exclude_skipped, RecommendationResult, Recommender};
use crate::models::{Decision, Experience, ErrorResponse, UserPreferenceProfile};
use crate::services::catalog::Catalog;
use crate::services::embeddings::{EmbeddingError, EmbeddingProvider};
use crate::services::store::{HistoryStore, PreferenceStore};
use crate::services::supabase::SupabaseError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use futures::{StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Request-level failures of the recommendation pipeline
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown experience: {0}")]
    UnknownExperience(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<SupabaseError> for RecommendationError {
    fn from(err: SupabaseError) -> Self {
        RecommendationError::UpstreamUnavailable(format!("persistence store: {}", err))
    }
}

impl From<EmbeddingError> for RecommendationError {
    fn from(err: EmbeddingError) -> Self {
        RecommendationError::UpstreamUnavailable(format!("embedding service: {}", err))
    }
}

impl ResponseError for RecommendationError {
    fn status_code(&self) -> StatusCode {
        match self {
            RecommendationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RecommendationError::UnknownExperience(_) => StatusCode::NOT_FOUND,
            RecommendationError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            RecommendationError::InvalidRequest(msg) => ("invalid_request", msg.clone()),
            RecommendationError::UnknownExperience(id) => {
                ("unknown_experience", format!("No experience with id {}", id))
            }
            RecommendationError::UpstreamUnavailable(msg) => ("upstream_unavailable", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            message,
            status_code: self.status_code().as_u16(),
        })
    }
}

/// Limits applied to outbound embedding calls
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingLimits {
    pub timeout: Duration,
    pub max_in_flight: usize,
}

impl Default for EmbeddingLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_in_flight: 16,
        }
    }
}

/// Per-request recommendation pipeline
///
/// Loads preferences and history, embeds the guest profile and every
/// remaining candidate, then hands everything to the [`Recommender`].
/// Holds no per-request state; the catalog is shared read-only.
pub struct RecommendationService {
    catalog: Arc<Catalog>,
    preferences: Arc<dyn PreferenceStore>,
    history: Arc<dyn HistoryStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    recommender: Recommender,
    limits: EmbeddingLimits,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<Catalog>,
        preferences: Arc<dyn PreferenceStore>,
        history: Arc<dyn HistoryStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        recommender: Recommender,
        limits: EmbeddingLimits,
    ) -> Self {
        Self {
            catalog,
            preferences,
            history,
            embeddings,
            recommender,
            limits,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate ranked recommendations for a guest
    ///
    /// All-or-nothing: any store or embedding failure fails the request.
    /// A guest who skipped everything gets an empty list.
    pub async fn generate(&self, user_id: &str) -> Result<RecommendationResult, RecommendationError> {
        let user_id = validate_id("user_id", user_id)?;

        let (preferences, history) = tokio::try_join!(
            self.preferences.get_preferences(user_id),
            self.history.get_viewed_history(user_id),
        )?;
        let profile = preferences.unwrap_or_default();

        let candidates = exclude_skipped(self.catalog.experiences(), &history);
        tracing::debug!(
            "User {} has {} candidates after excluding skipped ({} history rows)",
            user_id,
            candidates.len(),
            history.len()
        );

        if candidates.is_empty() {
            tracing::info!("No candidates left for user {}", user_id);
            return Ok(RecommendationResult {
                recommendations: Vec::new(),
                total_candidates: 0,
            });
        }

        let (user_embedding, embeddings) = if profile.is_empty() {
            tracing::info!("Empty preference profile for {}, ranking on bonuses only", user_id);
            (Vec::new(), HashMap::new())
        } else {
            self.embed_profile_and_candidates(&profile, &candidates).await?
        };

        Ok(self
            .recommender
            .rank(&profile, &user_embedding, candidates, &embeddings))
    }

    /// Record a liked/skipped decision for an experience in the catalog
    pub async fn record_decision(
        &self,
        user_id: &str,
        experience_id: &str,
        decision: &str,
    ) -> Result<String, RecommendationError> {
        let user_id = validate_id("user_id", user_id)?;
        let experience_id = validate_id("experience_id", experience_id)?;

        let decision = match decision.trim().to_lowercase().as_str() {
            "liked" => Decision::Liked,
            "skipped" => Decision::Skipped,
            _ => {
                return Err(RecommendationError::InvalidRequest(
                    "decision must be one of: liked, skipped".to_string(),
                ))
            }
        };

        let experience = self
            .catalog
            .get(experience_id)
            .ok_or_else(|| RecommendationError::UnknownExperience(experience_id.to_string()))?;

        Ok(self
            .history
            .record_decision(user_id, experience, decision)
            .await?)
    }

    /// Scatter/gather embedding of the profile text and every candidate
    ///
    /// The profile and candidate calls share one stream capped at
    /// `max_in_flight`. Candidate embeddings are keyed by experience id.
    /// The first failure drops every call still in flight.
    async fn embed_profile_and_candidates(
        &self,
        profile: &UserPreferenceProfile,
        candidates: &[Experience],
    ) -> Result<(Vec<f32>, HashMap<String, Vec<f32>>), RecommendationError> {
        let jobs = std::iter::once((None, profile.preference_text())).chain(
            candidates
                .iter()
                .map(|experience| (Some(experience.experience_id.clone()), experience.embedding_text())),
        );

        let results: Vec<(Option<String>, Vec<f32>)> = futures::stream::iter(jobs.map(|(id, text)| async move {
            let embedding = self.embed_with_timeout(&text).await?;
            Ok::<_, EmbeddingError>((id, embedding))
        }))
        .buffer_unordered(self.limits.max_in_flight.max(1))
        .try_collect()
        .await
        .map_err(|e| {
            tracing::error!("Embedding fan-out via {} failed: {}", self.embeddings.name(), e);
            e
        })?;

        let mut user_embedding = Vec::new();
        let mut embeddings = HashMap::with_capacity(candidates.len());
        for (id, embedding) in results {
            match id {
                Some(id) => {
                    embeddings.insert(id, embedding);
                }
                None => user_embedding = embedding,
            }
        }

        tracing::debug!(
            "Embedded profile ({} dims) and {} candidates",
            user_embedding.len(),
            embeddings.len()
        );

        Ok((user_embedding, embeddings))
    }

    async fn embed_with_timeout(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        tokio::time::timeout(self.limits.timeout, self.embeddings.embed(text))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.limits.timeout))?
    }
}

fn validate_id<'a>(field: &str, value: &'a str) -> Result<&'a str, RecommendationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecommendationError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(trimmed)
}
