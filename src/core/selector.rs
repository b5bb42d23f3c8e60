use std::collections::{HashMap, HashSet};
use crate::models::{PickSource, RankedExperience, SelectionLimits};

/// A ranked experience chosen for the final list
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub ranked: RankedExperience,
    pub source: PickSource,
}

/// Sort by score descending; equal scores keep their input order
pub fn sort_by_score(ranked: &mut [RankedExperience]) {
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Pick a diversity-constrained top list from score-sorted candidates
///
/// # Pipeline Stages
/// 1. Greedy pass admitting at most `max_per_category` picks per primary
///    category, stopping at `target_count`
/// 2. Fallback fill with the best remaining candidates (category cap
///    ignored) until `min_count` is reached
///
/// `ranked` must already be sorted with [`sort_by_score`].
pub fn select_diverse(ranked: &[RankedExperience], limits: &SelectionLimits) -> Vec<Selection> {
    let mut selections: Vec<Selection> = Vec::with_capacity(limits.target_count);
    let mut picked: HashSet<usize> = HashSet::new();
    let mut category_counts: HashMap<&str, usize> = HashMap::new();

    for (index, candidate) in ranked.iter().enumerate() {
        if selections.len() >= limits.target_count {
            break;
        }

        let category = candidate.experience.primary_category();
        let count = category_counts.entry(category).or_insert(0);
        if *count >= limits.max_per_category {
            continue;
        }

        *count += 1;
        picked.insert(index);
        selections.push(Selection {
            ranked: candidate.clone(),
            source: PickSource::Diversity,
        });
    }

    if selections.len() < limits.min_count {
        let missing = limits.min_count - selections.len();
        let fill = ranked
            .iter()
            .enumerate()
            .filter(|(index, _)| !picked.contains(index))
            .take(missing)
            .map(|(_, candidate)| Selection {
                ranked: candidate.clone(),
                source: PickSource::Fallback,
            })
            .collect::<Vec<_>>();

        if !fill.is_empty() {
            tracing::debug!("Diversity pass left {} picks, filling {}", selections.len(), fill.len());
        }
        selections.extend(fill);
    }

    selections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Experience;

    fn ranked(id: &str, category: &str, score: f64) -> RankedExperience {
        RankedExperience {
            experience: Experience {
                experience_id: id.to_string(),
                title: id.to_string(),
                short_description: String::new(),
                tags: vec![category.to_string()],
                distance_km: None,
                available_time_window: None,
                image_url: None,
                is_partner: false,
                capacity_remaining: None,
                location: None,
                latitude: None,
                longitude: None,
            },
            score,
        }
    }

    fn ids(selections: &[Selection]) -> Vec<&str> {
        selections
            .iter()
            .map(|s| s.ranked.experience.experience_id.as_str())
            .collect()
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut list = vec![
            ranked("a", "x", 0.5),
            ranked("b", "y", 0.9),
            ranked("c", "z", 0.5),
            ranked("d", "w", 0.5),
        ];
        sort_by_score(&mut list);

        let order: Vec<_> = list.iter().map(|r| r.experience.experience_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_category_cap() {
        let list = vec![
            ranked("a", "coffee", 0.9),
            ranked("b", "coffee", 0.8),
            ranked("c", "coffee", 0.7),
            ranked("d", "museum", 0.6),
            ranked("e", "beach", 0.5),
            ranked("f", "hiking", 0.4),
        ];

        let selections = select_diverse(&list, &SelectionLimits::default());

        assert_eq!(ids(&selections), vec!["a", "b", "d", "e", "f"]);
        assert!(selections.iter().all(|s| s.source == PickSource::Diversity));
    }

    #[test]
    fn test_target_count_caps_output() {
        let list: Vec<_> = (0..30)
            .map(|i| ranked(&format!("e{}", i), &format!("cat{}", i), 1.0 - i as f64 / 100.0))
            .collect();

        let selections = select_diverse(&list, &SelectionLimits::default());

        assert_eq!(selections.len(), 10);
        assert_eq!(selections[0].ranked.experience.experience_id, "e0");
        assert_eq!(selections[9].ranked.experience.experience_id, "e9");
    }

    #[test]
    fn test_fallback_fills_to_minimum() {
        let list = vec![
            ranked("a", "coffee", 0.9),
            ranked("b", "coffee", 0.8),
            ranked("c", "coffee", 0.7),
            ranked("d", "coffee", 0.6),
            ranked("e", "coffee", 0.5),
            ranked("f", "coffee", 0.4),
        ];

        let selections = select_diverse(&list, &SelectionLimits::default());

        assert_eq!(ids(&selections), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(selections[1].source, PickSource::Diversity);
        assert_eq!(selections[2].source, PickSource::Fallback);
        assert_eq!(selections[4].source, PickSource::Fallback);
    }

    #[test]
    fn test_fallback_skips_already_picked() {
        let list = vec![
            ranked("a", "coffee", 0.9),
            ranked("b", "museum", 0.8),
            ranked("c", "coffee", 0.7),
            ranked("d", "coffee", 0.6),
            ranked("e", "coffee", 0.5),
        ];

        let selections = select_diverse(&list, &SelectionLimits::default());

        // Diversity admits a, b, c; fallback adds d, e in score order
        assert_eq!(ids(&selections), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(selections[3].source, PickSource::Fallback);
    }

    #[test]
    fn test_fewer_candidates_than_minimum() {
        let list = vec![ranked("a", "coffee", 0.9), ranked("b", "coffee", 0.8), ranked("c", "coffee", 0.1)];

        let selections = select_diverse(&list, &SelectionLimits::default());

        assert_eq!(selections.len(), 3);
        assert_eq!(selections[2].source, PickSource::Fallback);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_diverse(&[], &SelectionLimits::default()).is_empty());
    }
}
