//! Broadcast mailer page handlers
//!
//! One route, two verbs. `GET` renders the composer (and re-renders it when
//! the audience toggle changes), `POST` validates and sends the broadcast.
//! htmx requests receive only the composer fragment.
//!
//! # Example
//!
//! ```rust,ignore
//! use broadcast_mailer::handlers::send_mail::{send_broadcast, show_composer};
//! use axum::{Router, routing::get};
//!
//! let app = Router::new()
//!     .route("/admin/send-mail", get(show_composer).post(send_broadcast));
//! ```

use axum::{
    extract::{Query, State},
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::Response,
    Form,
};
use axum_htmx::HxRequest;
use serde::Deserialize;

use crate::composer::{Audience, CompositionState, SubmitError, SubmitOutcome};
use crate::state::AppState;
use crate::template::{render_composer, ComposerView};

/// Client-side event fired with every submission outcome
pub const OUTCOME_EVENT: &str = "broadcastOutcome";

/// Notice shown when a submission arrives while another is outstanding
pub const BUSY_NOTICE: &str = "A broadcast is already being sent.";

/// Composer fields as posted by the page
///
/// Missing fields default to empty so that a partial form (for example the
/// audience toggle before anything is typed) still renders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BroadcastForm {
    /// `all` or `event`
    pub audience: Audience,

    /// Selected event id
    pub event_id: String,

    /// Subject line
    pub subject: String,

    /// Message body
    pub message: String,
}

impl From<BroadcastForm> for CompositionState {
    fn from(form: BroadcastForm) -> Self {
        Self {
            audience: form.audience,
            selected_event_id: form.event_id,
            subject: form.subject,
            body: form.message,
        }
    }
}

/// GET /admin/send-mail - Display the composer
///
/// Field values passed as query parameters are carried into the form, which
/// is how the audience toggle re-renders without losing typed text.
pub async fn show_composer(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Query(form): Query<BroadcastForm>,
) -> Response {
    let mut composer = state.composer().with_state(form.into());
    composer.load_events().await;

    render_composer(ComposerView::from_composer(&composer), is_htmx, StatusCode::OK)
}

/// POST /admin/send-mail - Validate and send the broadcast
///
/// Invalid forms are re-rendered with `422 Unprocessable Entity` and nothing
/// is sent. A submission arriving while another broadcast is still sending
/// gets `409 Conflict` with its fields kept. Every dispatched submission
/// answers `200 OK` with the outcome notice in the form and an `HX-Trigger`
/// header carrying `{"broadcastOutcome": {"success": bool, "message": notice}}`.
pub async fn send_broadcast(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<BroadcastForm>,
) -> Response {
    let mut composer = state.composer().with_state(form.into());

    match composer.submit().await {
        Ok(outcome) => {
            composer.load_events().await;
            let view = ComposerView::from_composer(&composer).with_outcome(&outcome);
            let mut response = render_composer(view, is_htmx, StatusCode::OK);
            if let Some(trigger) = outcome_trigger(&outcome) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static("hx-trigger"), trigger);
            }
            response
        }
        Err(SubmitError::Invalid(errors)) => {
            tracing::debug!(?errors, "Broadcast form rejected");
            composer.load_events().await;
            let view = ComposerView::from_composer(&composer).with_errors(&errors);
            render_composer(view, is_htmx, StatusCode::UNPROCESSABLE_ENTITY)
        }
        Err(SubmitError::InFlight) => {
            composer.load_events().await;
            let view = ComposerView::from_composer(&composer).with_notice(BUSY_NOTICE);
            render_composer(view, is_htmx, StatusCode::CONFLICT)
        }
    }
}

fn outcome_trigger(outcome: &SubmitOutcome) -> Option<HeaderValue> {
    let payload = serde_json::json!({
        OUTCOME_EVENT: {
            "success": outcome.is_success(),
            "message": outcome.notice(),
        }
    });

    HeaderValue::from_str(&ascii_json(&payload.to_string()))
        .map_err(|e| tracing::warn!(error = %e, "Outcome notice is not a valid header value"))
        .ok()
}

/// Escape non-ASCII characters as JSON `\uXXXX` sequences
///
/// Header values are read as Latin-1 by browsers.
fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
