//! Application state management
//!
//! Holds the configuration and the two collaborators every composer is built
//! from. Cloning is cheap; the collaborators are shared trait objects.

use std::sync::Arc;

use crate::composer::{BroadcastComposer, InFlight};
use crate::config::{DispatchBackend, EventStoreBackend, MailerConfig};
use crate::dispatch::{ConsoleDispatch, HttpMailDispatch, MailDispatch};
use crate::error::MailerError;
use crate::events::{EventStore, InMemoryEventStore};

#[cfg(feature = "postgres")]
use crate::events::PgEventStore;

/// Application state shared by every request
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use broadcast_mailer::dispatch::ConsoleDispatch;
/// use broadcast_mailer::events::InMemoryEventStore;
/// use broadcast_mailer::state::AppState;
///
/// let state = AppState::new(
///     Arc::new(InMemoryEventStore::default()),
///     Arc::new(ConsoleDispatch::new()),
/// );
/// let composer = state.composer();
/// assert!(!composer.in_flight());
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<MailerConfig>,

    /// Event store collaborator
    events: Arc<dyn EventStore>,

    /// Mail dispatch collaborator
    dispatch: Arc<dyn MailDispatch>,

    /// Set while any broadcast from this page is outstanding
    in_flight: InFlight,
}

impl AppState {
    /// Create state from explicit collaborators with default configuration
    #[must_use]
    pub fn new(events: Arc<dyn EventStore>, dispatch: Arc<dyn MailDispatch>) -> Self {
        Self {
            config: Arc::new(MailerConfig::default()),
            events,
            dispatch,
            in_flight: InFlight::new(),
        }
    }

    /// Create state with the backends selected in `config`
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Config` if the postgres backend is selected
    /// without a database URL (or without the `postgres` feature), and the
    /// backend's own error if it cannot be constructed
    pub fn from_config(config: MailerConfig) -> Result<Self, MailerError> {
        let events: Arc<dyn EventStore> = match config.event_store.backend {
            EventStoreBackend::Memory => Arc::new(InMemoryEventStore::new(
                config.event_store.records.clone(),
            )),
            EventStoreBackend::Postgres => postgres_store(&config)?,
        };

        let dispatch: Arc<dyn MailDispatch> = match config.dispatch.backend {
            DispatchBackend::Http => Arc::new(HttpMailDispatch::new(&config.dispatch.endpoint)?),
            DispatchBackend::Console if config.dispatch.verbose => {
                Arc::new(ConsoleDispatch::verbose())
            }
            DispatchBackend::Console => Arc::new(ConsoleDispatch::new()),
        };

        tracing::info!(
            event_store = ?config.event_store.backend,
            dispatch = ?config.dispatch.backend,
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            events,
            dispatch,
            in_flight: InFlight::new(),
        })
    }

    /// Application configuration
    #[must_use]
    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Fresh composer for one page activation or submission
    ///
    /// Form state is per composer; the in-flight flag is shared, so a second
    /// submission is rejected while another request is still sending.
    #[must_use]
    pub fn composer(&self) -> BroadcastComposer {
        BroadcastComposer::new(Arc::clone(&self.events), Arc::clone(&self.dispatch))
            .with_in_flight(self.in_flight.clone())
    }
}

#[cfg(feature = "postgres")]
fn postgres_store(config: &MailerConfig) -> Result<Arc<dyn EventStore>, MailerError> {
    let url = config.event_store.database_url.as_deref().ok_or_else(|| {
        MailerError::Config("event_store.database_url is required for the postgres backend".to_string())
    })?;
    let store = PgEventStore::connect_lazy(url, config.event_store.collection.clone())?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
fn postgres_store(_config: &MailerConfig) -> Result<Arc<dyn EventStore>, MailerError> {
    Err(MailerError::Config(
        "postgres event store requested but the `postgres` feature is disabled".to_string(),
    ))
}
