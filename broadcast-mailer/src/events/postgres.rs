//! `PostgreSQL` event store
//!
//! Events live in a document table: one row per event with the document body
//! stored as `JSONB`.
//!
//! ```sql
//! CREATE TABLE events (
//!     id   TEXT PRIMARY KEY,
//!     data JSONB NOT NULL DEFAULT '{}'
//! );
//! ```

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{EventRecord, EventStore, EventStoreError};

/// Event store reading from a `PostgreSQL` document table
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
    collection: String,
}

impl PgEventStore {
    /// Create a store over an existing pool
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidCollection` if `collection` is not a
    /// plain SQL identifier
    pub fn new(pool: PgPool, collection: impl Into<String>) -> Result<Self, EventStoreError> {
        let collection = collection.into();
        if !is_identifier(&collection) {
            return Err(EventStoreError::InvalidCollection(collection));
        }
        Ok(Self { pool, collection })
    }

    /// Create a store with a lazily-connected pool
    ///
    /// No connection is attempted until the first query, so an unreachable
    /// database only fails event loading.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Database` if `database_url` cannot be parsed,
    /// or `EventStoreError::InvalidCollection` for a bad collection name
    pub fn connect_lazy(
        database_url: &str,
        collection: impl Into<String>,
    ) -> Result<Self, EventStoreError> {
        let pool = PgPool::connect_lazy(database_url)?;
        Self::new(pool, collection)
    }

    /// Table the events are read from
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, EventStoreError> {
        let sql = format!("SELECT id, data FROM {} ORDER BY id", self.collection);
        let rows: Vec<(String, Value)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        tracing::debug!(
            collection = %self.collection,
            count = rows.len(),
            "Fetched events"
        );

        Ok(rows
            .into_iter()
            .map(|(id, data)| EventRecord::new(id, data))
            .collect())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_identifier("events"));
        assert!(is_identifier("_events_2024"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2024_events"));
        assert!(!is_identifier("events; DROP TABLE users"));
        assert!(!is_identifier("public.events"));
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_bad_collection() {
        let result = PgEventStore::connect_lazy("postgres://localhost/app", "bad name");
        assert!(matches!(result, Err(EventStoreError::InvalidCollection(_))));
    }

    #[tokio::test]
    async fn test_connect_lazy_does_not_connect() {
        let store = PgEventStore::connect_lazy("postgres://localhost:1/app", "events").unwrap();
        assert_eq!(store.collection(), "events");
    }
}
