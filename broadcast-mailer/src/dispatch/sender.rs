//! Mail dispatch trait abstraction
//!
//! This module defines the `MailDispatch` trait that every dispatch backend implements.

use async_trait::async_trait;

use super::{BroadcastRequest, DispatchError, DispatchReply};

/// Trait for handing a broadcast to the mail dispatch service
///
/// Implemented by all dispatch backends (HTTP, console). Each call performs
/// exactly one exchange with the service; retrying is left to the operator.
///
/// # Examples
///
/// ```rust
/// use broadcast_mailer::composer::Audience;
/// use broadcast_mailer::dispatch::{BroadcastRequest, ConsoleDispatch, DispatchReply, MailDispatch};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatch = ConsoleDispatch::new();
///
/// let request = BroadcastRequest {
///     audience: Audience::All,
///     event_id: String::new(),
///     subject: "Hello!".to_string(),
///     message: "Hello, World!".to_string(),
/// };
///
/// assert_eq!(dispatch.send(&request).await?, DispatchReply::Sent { count: 0 });
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailDispatch: Send + Sync {
    /// Send one broadcast request and wait for its single response
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` on transport failure or an unreadable response
    async fn send(&self, request: &BroadcastRequest) -> Result<DispatchReply, DispatchError>;
}
