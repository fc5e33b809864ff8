//! Console backend for development
//!
//! Logs broadcasts instead of handing them to a mail service.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::dispatch::{BroadcastRequest, DispatchError, DispatchReply, MailDispatch};

/// Console dispatch backend for development
///
/// Logs each broadcast and replies as if it reached zero recipients. Useful
/// when no mail dispatch service is running locally.
#[derive(Debug, Clone, Default)]
pub struct ConsoleDispatch {
    /// Whether to log the message body
    verbose: bool,
}

impl ConsoleDispatch {
    /// Create a new console backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console backend that also logs the message body
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl MailDispatch for ConsoleDispatch {
    async fn send(&self, request: &BroadcastRequest) -> Result<DispatchReply, DispatchError> {
        info!(
            audience = %request.audience,
            event_id = %request.event_id,
            subject = %request.subject,
            "Console broadcast sent"
        );

        if self.verbose {
            debug!(message = %request.message, "Broadcast body");
        }

        println!("\n╭─────────────────────────────────────────────────────╮");
        println!("│ Console Broadcast                                   │");
        println!("├─────────────────────────────────────────────────────┤");
        println!("│ Audience: {:<42} │", fit(request.audience.as_str(), 42));
        if !request.event_id.is_empty() {
            println!("│ Event:    {:<42} │", fit(&request.event_id, 42));
        }
        println!("│ Subject:  {:<42} │", fit(&request.subject, 42));
        println!("├─────────────────────────────────────────────────────┤");
        for line in request.message.lines() {
            println!("│ {:<51} │", fit(line, 51));
        }
        println!("╰─────────────────────────────────────────────────────╯\n");

        Ok(DispatchReply::Sent { count: 0 })
    }
}

/// Shorten `text` to at most `width` characters, marking the cut with `...`
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
