//! In-memory event store
//!
//! Serves a fixed list of records, typically from `[[event_store.records]]`
//! in the configuration file. Handy for local development and tests.

use std::sync::Arc;

use async_trait::async_trait;

use super::{EventRecord, EventStore, EventStoreError};

/// Event store backed by a fixed list of records
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    records: Arc<Vec<EventRecord>>,
}

impl InMemoryEventStore {
    /// Create a store serving `records` in the given order
    #[must_use]
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, EventStoreError> {
        tracing::debug!(count = self.records.len(), "Listing in-memory events");
        Ok(self.records.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_lists_records_in_order() {
        let store = InMemoryEventStore::new(vec![
            EventRecord::new("b", json!({ "name": "Second" })),
            EventRecord::new("a", json!({ "name": "First" })),
        ]);

        let records = store.list_events().await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryEventStore::default();
        assert!(store.is_empty());
        assert!(store.list_events().await.unwrap().is_empty());
    }
}
