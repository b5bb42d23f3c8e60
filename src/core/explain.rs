use crate::models::{Experience, UserPreferenceProfile};

/// Explanation used when no declared preference appears in the experience
pub const POPULAR_EXPLANATION: &str =
    "This is a popular local spot that many travelers with similar preferences have enjoyed";

/// Explanation attached to picks added by the fallback fill
pub const TRENDING_EXPLANATION: &str =
    "This is a trending local spot that matches the style of experiences you prefer";

const MAX_NAMED_TERMS: usize = 2;

/// Preference terms that appear in the experience's tags, title or description
///
/// Matching is a case-insensitive substring test. Terms keep the order in
/// which they were declared (interests, then activities, then dining);
/// blank and repeated terms are dropped.
pub fn matched_terms<'a>(
    experience: &Experience,
    profile: &'a UserPreferenceProfile,
) -> Vec<&'a str> {
    let title = experience.title.to_lowercase();
    let description = experience.short_description.to_lowercase();
    let tags: Vec<String> = experience.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut seen: Vec<String> = Vec::new();
    let mut matched = Vec::new();

    for term in profile.explanation_terms() {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            continue;
        }

        let needle = trimmed.to_lowercase();
        if seen.contains(&needle) {
            continue;
        }

        let hit = tags.iter().any(|tag| tag.contains(&needle))
            || title.contains(&needle)
            || description.contains(&needle);

        if hit {
            matched.push(trimmed);
        }
        seen.push(needle);
    }

    matched
}

/// Build the "why this for you" text for a diversity pick
pub fn explain(experience: &Experience, profile: &UserPreferenceProfile) -> String {
    let matched = matched_terms(experience, profile);

    if matched.is_empty() {
        return POPULAR_EXPLANATION.to_string();
    }

    let named = matched
        .iter()
        .take(MAX_NAMED_TERMS)
        .copied()
        .collect::<Vec<_>>()
        .join(" and ");

    format!(
        "Because you enjoy {}, this experience matches your interests perfectly",
        named
    )
}
