// Shared stubs for integration tests
#![allow(dead_code)]

use memora_recs::models::{Decision, Experience, UserPreferenceProfile, ViewedRecommendation};
use memora_recs::services::{
    Catalog, EmbeddingError, EmbeddingLimits, EmbeddingProvider, HistoryStore, PreferenceStore,
    RecommendationService, SupabaseError,
};
use memora_recs::Recommender;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Embeds text by keyword: the first rule whose keyword appears wins
pub struct KeywordEmbeddings {
    pub rules: Vec<(&'static str, Vec<f32>)>,
    pub fallback: Vec<f32>,
    pub fail_on: Option<&'static str>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

/// Decrements the in-flight count even when the call is dropped mid-sleep
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl KeywordEmbeddings {
    /// Query "outdoor, nature" maps to [1, 0]; hiking and observatory texts
    /// sit at cosine 0.8, coffee at ~0.1, everything else at ~0.3
    pub fn outdoor_scenario() -> Self {
        Self {
            rules: vec![
                ("outdoor, nature", vec![1.0, 0.0]),
                ("hiking", vec![0.8, 0.6]),
                ("observatory", vec![0.8, 0.6]),
                ("coffee", vec![0.1, 0.99499]),
            ],
            fallback: vec![0.3, 0.95394],
            fail_on: None,
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let text = text.to_lowercase();

        // Failing texts fail immediately; only the others are delayed
        if let Some(trigger) = self.fail_on {
            if text.contains(trigger) {
                return Err(EmbeddingError::ApiError("Failed to create embedding: 500".into()));
            }
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .rules
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, vector)| vector.clone())
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn name(&self) -> &'static str {
        "keyword-stub"
    }
}

/// In-memory preference and history store
#[derive(Default)]
pub struct MemoryStore {
    pub preferences: Option<UserPreferenceProfile>,
    pub history: Vec<ViewedRecommendation>,
    pub fail_preferences: bool,
    pub fail_history: bool,
    pub recorded: Mutex<Vec<(String, String, Decision)>>,
}

impl MemoryStore {
    pub fn with_interests(interests: &[&str]) -> Self {
        Self {
            preferences: Some(UserPreferenceProfile {
                interests: interests.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn skipping(mut self, ids: &[&str]) -> Self {
        self.history = ids
            .iter()
            .map(|id| ViewedRecommendation {
                recommendation_id: id.to_string(),
                decision: Decision::Skipped,
            })
            .collect();
        self
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryStore {
    async fn get_preferences(
        &self,
        _user_id: &str,
    ) -> Result<Option<UserPreferenceProfile>, SupabaseError> {
        if self.fail_preferences {
            return Err(SupabaseError::ApiError("Failed to query user_preferences: 503".into()));
        }
        Ok(self.preferences.clone())
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryStore {
    async fn get_viewed_history(
        &self,
        _user_id: &str,
    ) -> Result<Vec<ViewedRecommendation>, SupabaseError> {
        if self.fail_history {
            return Err(SupabaseError::ApiError("Failed to query viewed_recommendations: 503".into()));
        }
        Ok(self.history.clone())
    }

    async fn record_decision(
        &self,
        user_id: &str,
        experience: &Experience,
        decision: Decision,
    ) -> Result<String, SupabaseError> {
        self.recorded
            .lock()
            .unwrap()
            .push((user_id.to_string(), experience.experience_id.clone(), decision));
        Ok("event-1".to_string())
    }
}

pub fn build_service(
    store: Arc<MemoryStore>,
    embeddings: Arc<KeywordEmbeddings>,
) -> RecommendationService {
    build_service_with(store, embeddings, Catalog::builtin(None).unwrap(), EmbeddingLimits::default())
}

pub fn build_service_with(
    store: Arc<MemoryStore>,
    embeddings: Arc<KeywordEmbeddings>,
    catalog: Catalog,
    limits: EmbeddingLimits,
) -> RecommendationService {
    RecommendationService::new(
        Arc::new(catalog),
        store.clone(),
        store,
        embeddings,
        Recommender::with_defaults(),
        limits,
    )
}
