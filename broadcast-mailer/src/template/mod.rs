//! Askama templates for the admin page
//!
//! The page comes in two shapes: the full document for ordinary browser
//! requests and the bare composer form for htmx swaps. Both render the same
//! [`ComposerView`].

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::composer::{BroadcastComposer, SubmitOutcome};
use crate::events::EventSummary;

/// Extension trait rendering Askama templates into axum responses
pub trait HxTemplate: Template {
    /// Render as an HTML response with the given status
    ///
    /// Rendering failures are logged and turned into a plain
    /// `500 Internal Server Error`.
    fn render_with_status(self, status: StatusCode) -> Response
    where
        Self: Sized,
    {
        match self.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!("Template rendering error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Template rendering failed",
                )
                    .into_response()
            }
        }
    }
}

impl<T: Template> HxTemplate for T {}

/// Everything the composer form needs to render
#[derive(Debug, Clone, Default)]
pub struct ComposerView {
    /// "All Registered Users" is selected
    pub audience_all: bool,
    /// "Specific Event Participants" is selected
    pub audience_event: bool,
    /// Currently selected event id
    pub selected_event_id: String,
    /// Events offered in the selector
    pub events: Vec<EventSummary>,
    /// Subject field value
    pub subject: String,
    /// Message body field value
    pub body: String,
    /// Submit control is disabled and shows "Sending..."
    pub in_flight: bool,
    /// Outcome notice; empty when there is none
    pub notice: String,
    /// Whether the notice reports success
    pub notice_success: bool,
    /// Event selector error; empty when valid
    pub event_error: String,
    /// Subject error; empty when valid
    pub subject_error: String,
    /// Message body error; empty when valid
    pub body_error: String,
}

impl ComposerView {
    /// Snapshot a composer's form state and event list
    #[must_use]
    pub fn from_composer(composer: &BroadcastComposer) -> Self {
        let state = composer.state();
        Self {
            audience_all: !state.audience.is_event(),
            audience_event: state.audience.is_event(),
            selected_event_id: state.selected_event_id.clone(),
            events: composer.available_events().to_vec(),
            subject: state.subject.clone(),
            body: state.body.clone(),
            in_flight: composer.in_flight(),
            ..Self::default()
        }
    }

    /// Attach the notice for a submission outcome
    #[must_use]
    pub fn with_outcome(mut self, outcome: &SubmitOutcome) -> Self {
        self.notice = outcome.notice();
        self.notice_success = outcome.is_success();
        self
    }

    /// Attach a free-form notice
    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self.notice_success = false;
        self
    }

    /// Attach field errors
    #[must_use]
    pub fn with_errors(mut self, errors: &ValidationErrors) -> Self {
        self.event_error = first_message(errors, "selected_event_id");
        self.subject_error = first_message(errors, "subject");
        self.body_error = first_message(errors, "body");
        self
    }
}

fn first_message(errors: &ValidationErrors, field: &str) -> String {
    errors
        .field_errors()
        .get(field)
        .and_then(|errors| errors.first())
        .map(|error| {
            error
                .message
                .as_ref()
                .map_or_else(|| error.code.to_string(), ToString::to_string)
        })
        .unwrap_or_default()
}

/// Full admin page
#[derive(Template)]
#[template(path = "send_mail.html")]
pub struct SendMailPage {
    /// Composer form contents
    pub view: ComposerView,
}

/// Composer form alone, swapped in by htmx
#[derive(Template)]
#[template(path = "_composer.html")]
pub struct ComposerFragment {
    /// Composer form contents
    pub view: ComposerView,
}

/// Render the fragment for htmx requests, the full page otherwise
#[must_use]
pub fn render_composer(view: ComposerView, is_htmx: bool, status: StatusCode) -> Response {
    if is_htmx {
        ComposerFragment { view }.render_with_status(status)
    } else {
        SendMailPage { view }.render_with_status(status)
    }
}
