use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::models::SearchHistory;

/// File-backed search history.
///
/// The file holds a JSON array of city names, most recent first. Every
/// mutation is written through before it returns.
pub struct HistoryStorage {
    file_path: PathBuf,
    history: SearchHistory,
    loaded: bool,
}

impl HistoryStorage {
    pub fn new(file_path: impl Into<PathBuf>, max_items: usize) -> Self {
        Self {
            file_path: file_path.into(),
            history: SearchHistory::new(max_items),
            loaded: false,
        }
    }

    /// Load the stored history. A missing or unreadable file yields an empty list.
    pub async fn load(&mut self) -> Vec<String> {
        let entries = match read_entries(&self.file_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.file_path.display(), "History file does not exist, starting fresh");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.file_path.display(),
                    error = %e,
                    "Ignoring unreadable search history"
                );
                Vec::new()
            }
        };

        self.history = SearchHistory::from_entries(entries, self.history.max_items());
        self.loaded = true;

        tracing::info!(count = self.history.len(), "Loaded search history");

        self.history.entries().to_vec()
    }

    /// Record a successful search and persist the updated list.
    ///
    /// The in-memory list keeps the update even when writing fails.
    pub async fn add(&mut self, city: &str) -> Result<(), std::io::Error> {
        if !self.history.push(city) {
            return Ok(());
        }
        self.save().await
    }

    pub fn entries(&self) -> &[String] {
        self.history.entries()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn save(&self) -> Result<(), std::io::Error> {
        let content = serde_json::to_string(&self.history)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

        // Create parent directory if needed
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.file_path, content).await?;

        tracing::debug!(count = self.history.len(), "Saved search history");

        Ok(())
    }
}

async fn read_entries(path: &Path) -> Result<Vec<String>, std::io::Error> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))
}
