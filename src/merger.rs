use crate::classifier::classify;
use crate::model::{Category, Ingredient, ShoppingList, ShoppingSection, Source};
use crate::normalizer;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;

/// Which source wins when duplicates are equally informative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Keep the AI-generated entry (default)
    #[default]
    #[serde(alias = "ai")]
    PreferAi,
    /// Keep the video-derived entry
    #[serde(alias = "video")]
    PreferVideo,
}

impl MergePolicy {
    fn preferred_source(&self) -> Source {
        match self {
            MergePolicy::PreferAi => Source::Ai,
            MergePolicy::PreferVideo => Source::Video,
        }
    }
}

/// Merge AI and video ingredient lists with the default policy
pub fn merge(ai: &[Ingredient], video: &[Ingredient]) -> ShoppingList {
    merge_with_policy(ai, video, MergePolicy::default())
}

/// Merge AI and video ingredient lists into one categorized, deduplicated list.
///
/// Every entry is normalized and classified from its raw text. Entries that
/// collide on (category, name) are resolved in favour of the one carrying a
/// quantity, then the policy's preferred source, then the first seen. The
/// surviving entry keeps the position of the first one seen.
pub fn merge_with_policy(
    ai: &[Ingredient],
    video: &[Ingredient],
    policy: MergePolicy,
) -> ShoppingList {
    let mut groups: HashMap<Category, Vec<Ingredient>> = HashMap::new();
    let mut index: HashMap<(Category, String), usize> = HashMap::new();

    for item in ai.iter().chain(video.iter()) {
        let Some(candidate) = prepare(item) else {
            debug!("Dropping ingredient with empty name: {:?}", item.raw);
            continue;
        };

        let key = (candidate.category, candidate.name.clone());
        let group = groups.entry(candidate.category).or_default();

        match index.get(&key) {
            Some(&pos) => {
                if replaces(&candidate, &group[pos], policy) {
                    debug!(
                        "Replacing {:?} with {:?} for '{}'",
                        group[pos].raw, candidate.raw, candidate.name
                    );
                    group[pos] = candidate;
                }
            }
            None => {
                index.insert(key, group.len());
                group.push(candidate);
            }
        }
    }

    let sections = groups
        .into_iter()
        .map(|(category, items)| ShoppingSection { category, items })
        .collect();

    ShoppingList::from_sections(sections)
}

/// Normalize and classify one entry; `None` when its name is empty
fn prepare(item: &Ingredient) -> Option<Ingredient> {
    let parsed = normalizer::parse(&item.raw);
    if parsed.name.is_empty() {
        return None;
    }

    let quantity = if item.has_quantity() {
        item.quantity.clone()
    } else {
        parsed.quantity
    };

    Some(Ingredient {
        raw: item.raw.clone(),
        category: classify(&parsed.name),
        name: parsed.name,
        quantity,
        source: item.source,
    })
}

fn replaces(candidate: &Ingredient, existing: &Ingredient, policy: MergePolicy) -> bool {
    if candidate.has_quantity() != existing.has_quantity() {
        return candidate.has_quantity();
    }
    candidate.source != existing.source && candidate.source == policy.preferred_source()
}
