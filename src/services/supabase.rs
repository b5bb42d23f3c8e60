use crate::models::{Decision, Experience, UserPreferenceProfile, ViewedRecommendation};
use crate::services::store::{HistoryStore, PreferenceStore};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub user_preferences: String,
    pub viewed_recommendations: String,
    pub liked_recommendations: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            user_preferences: "user_preferences".to_string(),
            viewed_recommendations: "viewed_recommendations".to_string(),
            liked_recommendations: "liked_recommendations".to_string(),
        }
    }
}

/// Supabase PostgREST client
///
/// Handles all communication with the Supabase backend including:
/// - Fetching guest preferences
/// - Fetching viewed-recommendation history
/// - Recording liked/skipped decisions and itinerary likes
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: SupabaseTables,
}

/// Map auth failures to `Unauthorized` and other non-2xx statuses to `ApiError`
async fn check_status(response: Response, action: &str) -> Result<Response, SupabaseError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        tracing::error!("Supabase rejected service key on {}: {}", action, status);
        return Err(SupabaseError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Failed to {}: {} - {}", action, status, body);
        return Err(SupabaseError::ApiError(format!("Failed to {}: {}", action, status)));
    }
    Ok(response)
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        service_key: String,
        tables: SupabaseTables,
        timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            service_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// POST a single row into `table` without asking for it back
    async fn insert(&self, table: &str, row: &Value) -> Result<(), SupabaseError> {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        check_status(response, &format!("insert into {}", table)).await?;
        Ok(())
    }

    /// GET rows of `table` owned by `user_id`
    async fn select_for_user(
        &self,
        table: &str,
        columns: &str,
        user_id: &str,
    ) -> Result<Vec<Value>, SupabaseError> {
        let url = format!(
            "{}?select={}&user_id=eq.{}",
            self.table_url(table),
            columns,
            urlencoding::encode(user_id)
        );

        tracing::debug!("Querying {} for user {}", table, user_id);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response, &format!("query {}", table)).await?;

        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(SupabaseError::InvalidResponse(format!(
                "Expected row array from {}",
                table
            ))),
        }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for SupabaseClient {
    async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferenceProfile>, SupabaseError> {
        let rows = self
            .select_for_user(
                &self.tables.user_preferences,
                "interests,activity_types,dining_preferences,travel_style",
                user_id,
            )
            .await?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse preferences: {}", e)))
    }
}

#[async_trait::async_trait]
impl HistoryStore for SupabaseClient {
    async fn get_viewed_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<ViewedRecommendation>, SupabaseError> {
        let rows = self
            .select_for_user(
                &self.tables.viewed_recommendations,
                "recommendation_id,decision",
                user_id,
            )
            .await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    SupabaseError::InvalidResponse(format!("Failed to parse history row: {}", e))
                })
            })
            .collect()
    }

    async fn record_decision(
        &self,
        user_id: &str,
        experience: &Experience,
        decision: Decision,
    ) -> Result<String, SupabaseError> {
        if decision == Decision::Liked {
            let liked = serde_json::json!({
                "user_id": user_id,
                "recommendation_id": experience.experience_id,
                "title": experience.title,
                "category": experience.tags.first().map(String::as_str).unwrap_or("Experience"),
                "description": experience.short_description,
                "location": experience.location,
                "image_url": experience.image_url,
                "duration": experience.available_time_window,
            });
            self.insert(&self.tables.liked_recommendations, &liked).await?;
        }

        let id = uuid::Uuid::new_v4().to_string();
        let viewed = serde_json::json!({
            "id": id,
            "user_id": user_id,
            "recommendation_id": experience.experience_id,
            "decision": decision,
        });
        self.insert(&self.tables.viewed_recommendations, &viewed).await?;

        tracing::debug!(
            "Recorded decision: {} -> {} ({})",
            user_id,
            experience.experience_id,
            decision.as_str()
        );

        Ok(id)
    }
}
