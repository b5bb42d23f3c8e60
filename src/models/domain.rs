use serde::{Deserialize, Deserializer, Serialize};

/// A catalog entry the guest can be recommended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub experience_id: String,
    pub title: String,
    pub short_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_time_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_partner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Experience {
    /// Category used for diversity bucketing (the first tag)
    pub fn primary_category(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("")
    }

    /// Text submitted to the embedding provider for this experience
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.short_description,
            self.tags.join(" ")
        )
    }
}

/// Declared guest preferences
///
/// Any of the lists may be `null` in the store, which reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferenceProfile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub activity_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dining_preferences: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub travel_style: Vec<String>,
}

impl UserPreferenceProfile {
    pub fn is_empty(&self) -> bool {
        self.all_terms().all(|term| term.trim().is_empty())
    }

    /// Comma-joined text of every declared preference, embedded as the query
    pub fn preference_text(&self) -> String {
        self.all_terms()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Terms eligible for the "why this for you" explanation.
    /// Travel style is never matched against experiences.
    pub fn explanation_terms(&self) -> impl Iterator<Item = &String> {
        self.interests
            .iter()
            .chain(self.activity_types.iter())
            .chain(self.dining_preferences.iter())
    }

    fn all_terms(&self) -> impl Iterator<Item = &String> {
        self.explanation_terms().chain(self.travel_style.iter())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Guest decision on a previously shown recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Liked,
    Skipped,
    /// Anything else the store may hold; ignored by ranking
    #[serde(other)]
    Unknown,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Liked => "liked",
            Decision::Skipped => "skipped",
            Decision::Unknown => "unknown",
        }
    }
}

/// One row of the guest's viewed-recommendation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedRecommendation {
    pub recommendation_id: String,
    pub decision: Decision,
}

/// How a pick made it into the final list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickSource {
    /// Admitted by the diversity-capped pass
    #[default]
    Diversity,
    /// Added to reach the minimum count, ignoring the category cap
    Fallback,
}

/// An experience with its blended score, before explanation
#[derive(Debug, Clone, PartialEq)]
pub struct RankedExperience {
    pub experience: Experience,
    pub score: f64,
}

/// Recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredExperience {
    #[serde(flatten)]
    pub experience: Experience,
    pub why_this_for_you: String,
    pub score: f64,
    #[serde(skip)]
    pub source: PickSource,
}

/// Score blending weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub proximity: f64,
    pub partner: f64,
    pub proximity_horizon_km: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            proximity: 0.2,
            partner: 0.1,
            proximity_horizon_km: 20.0,
        }
    }
}

/// Size and diversity limits for the selected list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub target_count: usize,
    pub max_per_category: usize,
    pub min_count: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            target_count: 10,
            max_per_category: 2,
            min_count: 5,
        }
    }
}
