//! Broadcast composer
//!
//! Holds the form state for one page activation, loads the event list, and
//! runs a submission through the mail dispatch service.
//!
//! ```text
//! Idle --submit()--> Sending --success--> Idle (subject/body cleared)
//!                           \-failure---> Idle (fields preserved)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use broadcast_mailer::composer::{Audience, BroadcastComposer, SubmitOutcome};
//! use broadcast_mailer::dispatch::ConsoleDispatch;
//! use broadcast_mailer::events::InMemoryEventStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut composer = BroadcastComposer::new(
//!     Arc::new(InMemoryEventStore::default()),
//!     Arc::new(ConsoleDispatch::new()),
//! );
//! composer.load_events().await;
//!
//! composer.set_audience(Audience::All);
//! composer.set_subject("Schedule change");
//! composer.set_body("Doors open at 6pm.");
//!
//! let outcome = composer.submit().await?;
//! assert_eq!(outcome, SubmitOutcome::Sent { count: 0 });
//! assert!(composer.state().subject.is_empty());
//! # Ok(())
//! # }
//! ```

mod in_flight;
mod state;

use std::sync::Arc;

use thiserror::Error;
use validator::ValidationErrors;

use crate::dispatch::{BroadcastRequest, DispatchReply, MailDispatch};
use crate::events::{EventStore, EventSummary};

pub use in_flight::{InFlight, InFlightGuard};
pub use state::{Audience, CompositionState};

/// Notice shown when the dispatch service could not be reached or understood
pub const GENERIC_FAILURE_NOTICE: &str = "Something went wrong.";

/// Result of a submission that reached the dispatch stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Service accepted the broadcast
    Sent {
        /// Recipients notified
        count: u64,
    },
    /// Service refused the broadcast
    Declined {
        /// Reason given by the service
        message: String,
    },
    /// Transport or unexpected failure
    Failed,
}

impl SubmitOutcome {
    /// Text shown to the operator
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Sent { count } => format!("Success! Email sent to {count} users."),
            Self::Declined { message } => format!("Failed: {message}"),
            Self::Failed => GENERIC_FAILURE_NOTICE.to_string(),
        }
    }

    /// Whether the broadcast was accepted
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Submission rejected before any request was sent
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Form fields violate a precondition
    #[error("invalid broadcast: {0}")]
    Invalid(#[from] ValidationErrors),

    /// Another submission from this composer is still outstanding
    #[error("a broadcast is already being sent")]
    InFlight,
}

/// Form state machine for composing and sending one broadcast at a time
pub struct BroadcastComposer {
    events: Arc<dyn EventStore>,
    dispatch: Arc<dyn MailDispatch>,
    state: CompositionState,
    available_events: Vec<EventSummary>,
    in_flight: InFlight,
}

impl BroadcastComposer {
    /// Create a composer with default form state and no events loaded
    #[must_use]
    pub fn new(events: Arc<dyn EventStore>, dispatch: Arc<dyn MailDispatch>) -> Self {
        Self {
            events,
            dispatch,
            state: CompositionState::default(),
            available_events: Vec::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Replace the form state, e.g. with fields posted by the browser
    #[must_use]
    pub fn with_state(mut self, state: CompositionState) -> Self {
        self.state = state;
        self
    }

    /// Share an existing in-flight flag
    ///
    /// Composers built with clones of the same flag allow only one
    /// outstanding submission between them.
    #[must_use]
    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Current form state
    #[must_use]
    pub const fn state(&self) -> &CompositionState {
        &self.state
    }

    /// Events offered in the event selector
    #[must_use]
    pub fn available_events(&self) -> &[EventSummary] {
        &self.available_events
    }

    /// Whether a submission is outstanding
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Observable handle on the in-flight flag
    #[must_use]
    pub fn in_flight_handle(&self) -> InFlight {
        self.in_flight.clone()
    }

    /// Choose the recipient scope
    pub fn set_audience(&mut self, audience: Audience) {
        self.state.audience = audience;
    }

    /// Choose the event whose participants receive the broadcast
    pub fn select_event(&mut self, event_id: impl Into<String>) {
        self.state.selected_event_id = event_id.into();
    }

    /// Set the subject line
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.state.subject = subject.into();
    }

    /// Set the message body
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.state.body = body.into();
    }

    /// Check the submission preconditions on the form fields
    ///
    /// # Errors
    ///
    /// Returns field-keyed `ValidationErrors` for each violated precondition
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.state.check()
    }

    /// Whether `submit` would send a request right now
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.in_flight() && self.validate().is_ok()
    }

    /// Load the event list from the event store
    ///
    /// Failures are logged and leave the list empty; they never abort the
    /// composer.
    pub async fn load_events(&mut self) {
        match self.events.list_events().await {
            Ok(records) => {
                self.available_events = records.iter().map(EventSummary::from).collect();
                tracing::debug!(count = self.available_events.len(), "Loaded events");
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching events");
                self.available_events.clear();
            }
        }
    }

    /// Send the composed broadcast
    ///
    /// Sends exactly one request and waits for its response. Subject and
    /// body are cleared only when the service accepts the broadcast. The
    /// in-flight flag is cleared on every exit path.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` without sending anything if a precondition is
    /// violated or another submission is outstanding. Dispatch failures are
    /// not errors; they are reported as [`SubmitOutcome::Failed`].
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        self.validate()?;
        let Some(_guard) = self.in_flight.begin() else {
            return Err(SubmitError::InFlight);
        };

        let request = BroadcastRequest {
            audience: self.state.audience,
            event_id: self.state.selected_event_id.clone(),
            subject: self.state.subject.clone(),
            message: self.state.body.clone(),
        };

        let outcome = match self.dispatch.send(&request).await {
            Ok(DispatchReply::Sent { count }) => {
                tracing::info!(
                    audience = %request.audience,
                    event_id = %request.event_id,
                    count,
                    "Broadcast sent"
                );
                self.state.subject.clear();
                self.state.body.clear();
                SubmitOutcome::Sent { count }
            }
            Ok(DispatchReply::Declined { message }) => {
                tracing::warn!(
                    audience = %request.audience,
                    event_id = %request.event_id,
                    reason = %message,
                    "Broadcast declined"
                );
                SubmitOutcome::Declined { message }
            }
            Err(e) => {
                tracing::error!(error = %e, "Broadcast dispatch failed");
                SubmitOutcome::Failed
            }
        };

        Ok(outcome)
    }
}
