use crate::core::distance::ReferencePoint;
use crate::models::Experience;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Los Angeles catalog compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");

/// Errors that can occur when loading the experience catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid catalog entry: {0}")]
    InvalidEntry(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    experiences: Vec<Experience>,
}

/// Read-only set of experiences that can be recommended
///
/// Loaded once at startup and shared across requests; never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    experiences: Vec<Experience>,
}

impl Catalog {
    /// Build a catalog from experiences, validating and normalizing them
    ///
    /// Tags are lowercased. When `reference` is given, entries with
    /// coordinates but no distance get one derived from it.
    pub fn new(
        experiences: Vec<Experience>,
        reference: Option<ReferencePoint>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(experiences.len());

        for mut experience in experiences {
            if experience.experience_id.trim().is_empty() {
                return Err(CatalogError::InvalidEntry(format!(
                    "experience '{}' has an empty id",
                    experience.title
                )));
            }

            if !seen.insert(experience.experience_id.clone()) {
                return Err(CatalogError::InvalidEntry(format!(
                    "duplicate experience id {}",
                    experience.experience_id
                )));
            }

            if let Some(distance) = experience.distance_km {
                if !distance.is_finite() || distance < 0.0 {
                    return Err(CatalogError::InvalidEntry(format!(
                        "experience {} has invalid distance {}",
                        experience.experience_id, distance
                    )));
                }
            }

            experience.tags = experience
                .tags
                .iter()
                .map(|tag| tag.trim().to_lowercase())
                .collect();

            if experience.distance_km.is_none() {
                if let (Some(point), Some(lat), Some(lon)) =
                    (reference, experience.latitude, experience.longitude)
                {
                    experience.distance_km = Some(point.distance_to(lat, lon));
                }
            }

            normalized.push(experience);
        }

        Ok(Self {
            experiences: normalized,
        })
    }

    /// The compiled-in Los Angeles catalog
    pub fn builtin(reference: Option<ReferencePoint>) -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG, reference)
    }

    pub fn from_toml_str(
        contents: &str,
        reference: Option<ReferencePoint>,
    ) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::new(file.experiences, reference)
    }

    /// Parse a JSON catalog, either `{"experiences": [...]}` or a bare array
    pub fn from_json_str(
        contents: &str,
        reference: Option<ReferencePoint>,
    ) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        let experiences: Vec<Experience> = match value {
            serde_json::Value::Array(_) => serde_json::from_value(value)?,
            other => serde_json::from_value::<CatalogFile>(other)?.experiences,
        };
        Self::new(experiences, reference)
    }

    /// Load a catalog file, picking the parser from its extension
    pub fn load_from<P: AsRef<Path>>(
        path: P,
        reference: Option<ReferencePoint>,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents, reference),
            Some("json") => Self::from_json_str(&contents, reference),
            other => Err(CatalogError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    pub fn get(&self, experience_id: &str) -> Option<&Experience> {
        self.experiences
            .iter()
            .find(|experience| experience.experience_id == experience_id)
    }

    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }
}
