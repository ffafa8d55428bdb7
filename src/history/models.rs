use serde::Serialize;

pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Recently searched city names, most recent first.
///
/// Entries are unique ignoring case and never exceed `max_items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<String>,
    #[serde(skip)]
    max_items: usize,
}

impl SearchHistory {
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_items,
        }
    }

    /// Rebuild from stored entries, restoring the uniqueness and size limits
    pub fn from_entries(entries: Vec<String>, max_items: usize) -> Self {
        let mut history = Self::new(max_items);
        // Oldest first so the stored order survives the push-front
        for city in entries.into_iter().rev() {
            history.push(&city);
        }
        history
    }

    /// Move `city` to the front, dropping any entry equal to it ignoring case.
    ///
    /// Returns false when the name is blank and nothing changed.
    pub fn push(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() {
            return false;
        }

        let lowered = city.to_lowercase();
        self.entries.retain(|entry| entry.to_lowercase() != lowered);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(self.max_items);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}
