//! Event store access
//!
//! The composer only needs two things from an event: its identifier and a
//! display name. Records come back from the store as loosely-typed documents,
//! so the display name is resolved here with a two-key lookup (`Name`, then
//! `name`) and a literal fallback.
//!
//! # Examples
//!
//! ```rust
//! use broadcast_mailer::events::{EventRecord, EventSummary};
//! use serde_json::json;
//!
//! let record = EventRecord::new("0001", json!({ "Name": "Dance Competition" }));
//! let summary = EventSummary::from(&record);
//! assert_eq!(summary.name, "Dance Competition");
//!
//! let unnamed = EventRecord::new("0002", json!({ "venue": "Hall B" }));
//! assert_eq!(EventSummary::from(&unnamed).name, "Unnamed Event");
//! ```

use std::borrow::Cow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::InMemoryEventStore;
#[cfg(feature = "postgres")]
pub use postgres::PgEventStore;

/// Label shown for events whose record carries no usable name
pub const UNNAMED_EVENT: &str = "Unnamed Event";

/// Field names accepted for an event's display name, in lookup order
const NAME_FIELDS: [&str; 2] = ["Name", "name"];

/// Raw event document as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store-assigned identifier
    pub id: String,

    /// Remaining document fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    /// Build a record from an id and a JSON document
    ///
    /// Non-object documents produce a record with no fields.
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        let fields = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Display name from the first usable name field, if any
    ///
    /// A field is unusable when it is missing, `null`, `false`, zero or an
    /// empty string. Other non-string values are shown in their JSON form.
    #[must_use]
    pub fn display_name(&self) -> Option<Cow<'_, str>> {
        NAME_FIELDS
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find_map(|value| match value {
                Value::Null | Value::Bool(false) => None,
                Value::String(name) if name.is_empty() => None,
                Value::String(name) => Some(Cow::Borrowed(name.as_str())),
                Value::Number(n) if n.as_f64() == Some(0.0) => None,
                other => Some(Cow::Owned(other.to_string())),
            })
    }
}

/// Read-only view of an event used to populate the event selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Store-assigned identifier
    pub id: String,
    /// Display name, or [`UNNAMED_EVENT`]
    pub name: String,
}

impl From<&EventRecord> for EventSummary {
    fn from(record: &EventRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record
                .display_name()
                .map_or_else(|| UNNAMED_EVENT.to_string(), Cow::into_owned),
        }
    }
}

/// Errors raised while listing events
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Database query or connection failure
    #[error("event store database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configured collection name is not a plain identifier
    #[error("invalid event collection name: {0}")]
    InvalidCollection(String),

    /// Store cannot be reached or is not configured
    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of event records
///
/// Implemented by every event backend (`PostgreSQL`, in-memory).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// List every event record
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError` if the store cannot be queried
    async fn list_events(&self) -> Result<Vec<EventRecord>, EventStoreError>;
}
