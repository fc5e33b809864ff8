//! Application error type

use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::events::EventStoreError;

/// Errors raised while assembling or running the application
///
/// Composer and page failures never surface here; they are recovered and
/// reported to the operator instead.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event store could not be set up
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// Mail dispatch backend could not be set up
    #[error("Mail dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subsystem() {
        let err = MailerError::from(EventStoreError::InvalidCollection("events;".to_string()));
        assert_eq!(
            err.to_string(),
            "Event store error: invalid event collection name: events;"
        );

        let err = MailerError::from(DispatchError::Status(502));
        assert!(err.to_string().starts_with("Mail dispatch error:"));
    }
}
