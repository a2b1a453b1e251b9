//! Citation reconciliation

use std::collections::HashSet;

use crate::model::Source;

/// Title of the synthetic source pointing at the analyzed video
pub const ORIGINAL_SOURCE_TITLE: &str = "Original video";

/// Anchor the original video first, then grounding sources in order, deduplicated
pub fn reconcile_sources(original_url: &str, grounding: Vec<Source>) -> Vec<Source> {
    let original = Source {
        title: Some(ORIGINAL_SOURCE_TITLE.to_string()),
        uri: original_url.to_string(),
    };

    dedup_sources(std::iter::once(original).chain(grounding))
}

/// Drop sources with an empty trimmed uri and later duplicates by trimmed uri
pub fn dedup_sources(sources: impl IntoIterator<Item = Source>) -> Vec<Source> {
    let mut seen = HashSet::new();

    sources
        .into_iter()
        .filter(|source| {
            let key = source.uri.trim();
            !key.is_empty() && seen.insert(key.to_string())
        })
        .collect()
}
