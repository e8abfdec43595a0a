use crate::entities::Url;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// Final report: one entry per scanned domain, in scan order. An empty set
/// means "scanned, nothing found"; an absent key means the domain was never
/// scanned.
#[derive(Debug, Default)]
pub struct Results {
    entries: Vec<(String, HashSet<Url>)>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `domain`, preserving its original
    /// position when replacing.
    pub fn insert(&mut self, domain: String, urls: HashSet<Url>) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == domain) {
            entry.1 = urls;
        } else {
            self.entries.push((domain, urls));
        }
    }

    pub fn get(&self, domain: &str) -> Option<&HashSet<Url>> {
        self.entries
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, urls)| urls)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashSet<Url>)> {
        self.entries.iter().map(|(name, urls)| (name.as_str(), urls))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total endpoints across all domains.
    pub fn total_urls(&self) -> usize {
        self.entries.iter().map(|(_, urls)| urls.len()).sum()
    }
}

impl Serialize for Results {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (domain, urls) in &self.entries {
            let mut sorted: Vec<&Url> = urls.iter().collect();
            sorted.sort();
            map.serialize_entry(domain, &sorted)?;
        }
        map.end()
    }
}
