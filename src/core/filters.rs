use std::collections::HashSet;
use crate::models::{Decision, Experience, ViewedRecommendation};

/// Ids the guest has explicitly skipped
pub fn skipped_ids(history: &[ViewedRecommendation]) -> HashSet<&str> {
    history
        .iter()
        .filter(|view| view.decision == Decision::Skipped)
        .map(|view| view.recommendation_id.as_str())
        .collect()
}

/// Remove skipped experiences from the candidate pool, keeping catalog order
///
/// Liked (or otherwise recorded) experiences stay eligible.
pub fn exclude_skipped(
    catalog: &[Experience],
    history: &[ViewedRecommendation],
) -> Vec<Experience> {
    let skipped = skipped_ids(history);

    catalog
        .iter()
        .filter(|experience| !skipped.contains(experience.experience_id.as_str()))
        .cloned()
        .collect()
}
