//! Composition form state

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Recipient scope of a broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Every registered user
    #[default]
    All,
    /// Participants of one event
    Event,
}

impl Audience {
    /// Wire name (`"all"` or `"event"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Event => "event",
        }
    }

    /// Whether an event must be selected for this audience
    #[must_use]
    pub const fn is_event(self) -> bool {
        matches!(self, Self::Event)
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-editable fields of a broadcast
///
/// `selected_event_id` is only meaningful when `audience` is
/// [`Audience::Event`]; it is kept (not cleared) when switching back to
/// [`Audience::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CompositionState {
    /// Recipient scope
    pub audience: Audience,

    /// Event whose participants receive the broadcast
    pub selected_event_id: String,

    /// Subject line
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,

    /// Message body
    #[validate(length(min = 1, message = "Message body is required"))]
    pub body: String,
}

impl CompositionState {
    /// Check every submission precondition
    ///
    /// Errors are keyed by field name: `subject`, `body`,
    /// `selected_event_id`.
    ///
    /// # Errors
    ///
    /// Returns the collected `ValidationErrors` if any field is invalid
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();

        if self.audience.is_event() && self.selected_event_id.is_empty() {
            let mut error = ValidationError::new("required");
            error.message = Some(Cow::Borrowed("Select an event"));
            errors.add("selected_event_id", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
