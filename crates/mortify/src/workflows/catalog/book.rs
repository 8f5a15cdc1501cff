use crate::workflows::viability::CategoryDefaults;

use super::normalizer::normalize_name;

/// In-memory category reference data with tolerant name matching.
///
/// Lookup order: exact normalized match first, then containment in either
/// direction, so "Lavadora Carga Frontal" still resolves against a book that
/// only lists "Lavadora". Row order is insertion order and the first match
/// wins, mirroring how the source spreadsheets are curated.
#[derive(Debug, Clone, Default)]
pub struct CategoryBook {
    entries: Vec<BookEntry>,
}

#[derive(Debug, Clone)]
struct BookEntry {
    normalized: String,
    defaults: CategoryDefaults,
}

impl CategoryBook {
    /// Builds a book, keeping the first row for a repeated category name.
    pub fn new(rows: Vec<CategoryDefaults>) -> Self {
        let mut entries: Vec<BookEntry> = Vec::with_capacity(rows.len());
        for defaults in rows {
            let normalized = normalize_name(&defaults.category);
            if normalized.is_empty() {
                continue;
            }
            if entries.iter().any(|entry| entry.normalized == normalized) {
                continue;
            }
            entries.push(BookEntry {
                normalized,
                defaults,
            });
        }
        Self { entries }
    }

    pub fn resolve(&self, category: &str) -> Option<&CategoryDefaults> {
        let needle = normalize_name(category);
        if needle.is_empty() {
            return None;
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.normalized == needle)
        {
            return Some(&entry.defaults);
        }

        self.entries
            .iter()
            .find(|entry| entry.normalized.contains(&needle) || needle.contains(&entry.normalized))
            .map(|entry| &entry.defaults)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryDefaults> {
        self.entries.iter().map(|entry| &entry.defaults)
    }
}
