// In-memory saved-search store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{FilterState, SortKey};

const DEFAULT_NAME: &str = "Neue Suche";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SavedSearchError {
    #[error("Saved search not found: {0}")]
    NotFound(String),
}

/// A filter snapshot together with the sort it was saved with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearchQuery {
    pub filters: FilterState,
    #[serde(default)]
    pub sort_key: SortKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    pub query: SavedSearchQuery,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SavedSearchCreate {
    pub name: String,
    pub query: SavedSearchQuery,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SavedSearchUpdate {
    pub name: Option<String>,
    pub query: Option<SavedSearchQuery>,
}

fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Default display name, e.g. `BMW · 3 Series · 2018-Any · 0-40000EUR`.
pub fn build_saved_search_name(filters: &FilterState) -> String {
    let make = filters.marke.first().map_or("Alle Marken", String::as_str);
    let model = filters.model.first().map_or("Alle Modelle", String::as_str);

    let year_range = if filters.year_from.is_some() || filters.year_to.is_some() {
        format!(
            "{}-{}",
            filters.year_from.as_deref().unwrap_or("Any"),
            filters.year_to.as_deref().unwrap_or("Any")
        )
    } else {
        "Alle Baujahre".to_string()
    };

    let min_price = filters.min_price.trim();
    let max_price = filters.max_price.trim();
    let price_range = if min_price.is_empty() && max_price.is_empty() {
        "Alle Preise".to_string()
    } else {
        format!(
            "{}-{}EUR",
            if min_price.is_empty() { "0" } else { min_price },
            if max_price.is_empty() { "Any" } else { max_price }
        )
    };

    format!("{} · {} · {} · {}", make, model, year_range, price_range)
}

/// Process-local store. Entries are returned by value so callers never alias storage.
#[derive(Debug, Default)]
pub struct SavedSearchStore {
    entries: RwLock<Vec<SavedSearch>>,
}

impl SavedSearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, input: SavedSearchCreate) -> SavedSearch {
        let now = Utc::now();
        let entry = SavedSearch {
            id: format!("saved-search-{}", Uuid::new_v4()),
            name: sanitize_name(&input.name),
            query: input.query,
            created_at: now,
            updated_at: now,
        };

        self.entries.write().await.insert(0, entry.clone());
        tracing::info!("Created saved search {}", entry.id);
        entry
    }

    pub async fn update(&self, id: &str, input: SavedSearchUpdate) -> Result<SavedSearch, SavedSearchError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| SavedSearchError::NotFound(id.to_string()))?;

        if let Some(name) = input.name {
            entry.name = sanitize_name(&name);
        }
        if let Some(query) = input.query {
            entry.query = query;
        }
        entry.updated_at = Utc::now();

        tracing::info!("Updated saved search {}", id);
        Ok(entry.clone())
    }

    /// Most recently updated first.
    pub async fn list(&self) -> Vec<SavedSearch> {
        let mut sorted = self.entries.read().await.clone();
        sorted.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        sorted
    }

    pub async fn get(&self, id: &str) -> Result<SavedSearch, SavedSearchError> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| SavedSearchError::NotFound(id.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<(), SavedSearchError> {
        let mut entries = self.entries.write().await;
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| SavedSearchError::NotFound(id.to_string()))?;

        entries.remove(position);
        tracing::info!("Deleted saved search {}", id);
        Ok(())
    }
}
