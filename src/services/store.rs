use crate::models::{Decision, Experience, UserPreferenceProfile, ViewedRecommendation};
use crate::services::supabase::SupabaseError;

/// Source of declared guest preferences
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// `Ok(None)` when the guest never filled in preferences
    async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferenceProfile>, SupabaseError>;
}

/// Liked/skipped history for shown recommendations
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    async fn get_viewed_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<ViewedRecommendation>, SupabaseError>;

    /// Persist a decision; returns the id of the stored history row.
    /// A like also adds the experience to the guest's itinerary.
    async fn record_decision(
        &self,
        user_id: &str,
        experience: &Experience,
        decision: Decision,
    ) -> Result<String, SupabaseError>;
}
