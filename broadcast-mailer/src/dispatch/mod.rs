//! Mail dispatch service client
//!
//! The mail dispatch service does the actual delivery. This module defines
//! the single request/response exchange the composer has with it:
//!
//! - request: `{"type", "eventId", "subject", "message"}`
//! - response: `{"success": true, "count": n}` or `{"success": false, "message": m}`
//!
//! Transport problems (network errors, non-2xx statuses, unparsable bodies)
//! are reported as [`DispatchError`], never as a [`DispatchReply`], so callers
//! can tell them apart from a logical refusal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use broadcast_mailer::composer::Audience;
//! use broadcast_mailer::dispatch::{BroadcastRequest, HttpMailDispatch, MailDispatch};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatch = HttpMailDispatch::new("http://127.0.0.1:3000/api/send-email")?;
//!
//! let request = BroadcastRequest {
//!     audience: Audience::All,
//!     event_id: String::new(),
//!     subject: "Schedule change".to_string(),
//!     message: "Doors open at 6pm.".to_string(),
//! };
//!
//! let reply = dispatch.send(&request).await?;
//! println!("{reply:?}");
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod sender;

use serde::{Deserialize, Serialize};

use crate::composer::Audience;

pub use backend::{console::ConsoleDispatch, http::HttpMailDispatch};
pub use error::DispatchError;
pub use sender::MailDispatch;

#[cfg(test)]
pub use sender::MockMailDispatch;

/// Body of a broadcast request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    /// Recipient scope
    #[serde(rename = "type")]
    pub audience: Audience,

    /// Selected event; ignored by the service when the audience is `all`
    pub event_id: String,

    /// Subject line
    pub subject: String,

    /// Message body
    pub message: String,
}

/// Logical answer from the mail dispatch service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReply {
    /// Broadcast accepted
    Sent {
        /// Recipients notified
        count: u64,
    },
    /// Broadcast refused by the service
    Declined {
        /// Human-readable reason
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct WireReply {
    success: bool,
    count: Option<u64>,
    message: Option<String>,
}

impl DispatchReply {
    /// Parse a response body
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Serialization` for invalid JSON and
    /// `DispatchError::MalformedResponse` when the field required by the
    /// `success` flag is missing
    pub fn from_json(body: &[u8]) -> Result<Self, DispatchError> {
        let wire: WireReply = serde_json::from_slice(body)?;
        match wire {
            WireReply {
                success: true,
                count: Some(count),
                ..
            } => Ok(Self::Sent { count }),
            WireReply {
                success: false,
                message: Some(message),
                ..
            } => Ok(Self::Declined { message }),
            WireReply { success: true, .. } => Err(DispatchError::MalformedResponse(
                "successful reply without a recipient count".to_string(),
            )),
            WireReply { success: false, .. } => Err(DispatchError::MalformedResponse(
                "failed reply without a message".to_string(),
            )),
        }
    }
}
