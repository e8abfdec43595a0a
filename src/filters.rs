use crate::entities::Url;
use std::collections::{HashMap, HashSet};

/// Final pass over one domain's raw discoveries. Re-canonicalizes every
/// candidate (anything malformed is dropped, never an error), merges
/// duplicate canonical forms keeping the confirmed flag if any strategy
/// confirmed the endpoint, and in precision mode discards candidates that
/// never answered with a strict GraphQL signature.
pub fn filter_urls(urls: HashSet<Url>, precision: bool) -> HashSet<Url> {
    let mut merged: HashMap<String, Url> = HashMap::new();

    for url in urls {
        let Some(reparsed) = Url::parse(url.as_str(), url.strategy) else {
            continue;
        };
        let candidate = if url.confirmed {
            reparsed.confirmed()
        } else {
            reparsed
        };

        merged
            .entry(candidate.as_str().to_string())
            .and_modify(|existing| existing.confirmed |= candidate.confirmed)
            .or_insert(candidate);
    }

    merged
        .into_values()
        .filter(|url| !precision || url.confirmed)
        .collect()
}
