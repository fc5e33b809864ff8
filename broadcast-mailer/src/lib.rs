//! broadcast-mailer: admin page for broadcasting email
//!
//! An operator composes a subject and message body, picks an audience (every
//! registered user, or the participants of one event) and sends the
//! broadcast through a mail dispatch service.
//!
//! The crate is built around two collaborators:
//! - [`events::EventStore`]: lists the events the operator can target
//! - [`dispatch::MailDispatch`]: delivers one broadcast request and reports
//!   how many recipients were notified
//!
//! [`composer::BroadcastComposer`] owns the form state machine; the
//! [`handlers`] module serves it as an htmx page.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use broadcast_mailer::{config::MailerConfig, handlers, observability, state::AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MailerConfig::load(None)?;
//!     observability::init(&config.logging)?;
//!
//!     let addr = config.server.addr();
//!     let app = handlers::router(AppState::from_config(config)?);
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `postgres` - `PostgreSQL` event store (default)

pub mod composer;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod handlers;
pub mod observability;
pub mod state;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits

    pub use crate::composer::{
        Audience, BroadcastComposer, CompositionState, SubmitError, SubmitOutcome,
    };
    pub use crate::config::MailerConfig;
    pub use crate::dispatch::{BroadcastRequest, DispatchError, DispatchReply, MailDispatch};
    pub use crate::error::MailerError;
    pub use crate::events::{EventRecord, EventStore, EventStoreError, EventSummary};
    pub use crate::state::AppState;
}
