//! Merged catalog of curated and registry entries
//!
//! Curated definitions always take precedence: a registry server whose name
//! matches (case-insensitively) an already-present entry is dropped. Every
//! read returns a freshly sorted copy, so callers can't disturb later queries.

use std::collections::HashSet;

use super::entry::{CuratedService, Entry, EntrySource, RegistryServer};

/// An immutable set of catalog entries
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    /// Build a catalog from both sources, curated first
    pub fn merge(curated: Vec<CuratedService>, registry: Vec<RegistryServer>) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(curated.len() + registry.len());

        let candidates = curated
            .into_iter()
            .map(Entry::curated)
            .chain(registry.into_iter().map(Entry::registry));

        for entry in candidates {
            if seen.insert(entry.name().to_lowercase()) {
                entries.push(entry);
            } else {
                tracing::debug!(
                    "Dropping duplicate {} entry '{}'",
                    entry.source().as_str(),
                    entry.name()
                );
            }
        }

        Self { entries }
    }

    /// Build a catalog from pre-built entries, applying the same dedup rule
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.name().to_lowercase()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries sorted by name
    pub fn all(&self) -> Vec<Entry> {
        sorted(self.entries.iter().cloned().collect())
    }

    /// Entries from one source, sorted by name
    pub fn by_source(&self, source: EntrySource) -> Vec<Entry> {
        sorted(
            self.entries
                .iter()
                .filter(|e| e.source() == source)
                .cloned()
                .collect(),
        )
    }

    /// Case-insensitive substring search over name, display name and description
    ///
    /// An empty query returns everything. The query is matched as given, so
    /// whitespace counts. There is no ranking: results are ordered by name like
    /// [`Catalog::all`].
    pub fn search(&self, query: &str) -> Vec<Entry> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return self.all();
        }

        sorted(
            self.entries
                .iter()
                .filter(|e| {
                    e.name().to_lowercase().contains(&query)
                        || e.display_name().to_lowercase().contains(&query)
                        || e.description().to_lowercase().contains(&query)
                })
                .cloned()
                .collect(),
        )
    }

    /// Exact, case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<Entry> {
        let wanted = name.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name().to_lowercase() == wanted)
            .cloned()
    }
}

fn sorted(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by_cached_key(|e| e.name().to_lowercase());
    entries
}
