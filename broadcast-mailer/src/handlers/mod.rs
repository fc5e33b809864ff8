//! HTTP handlers and routing

pub mod send_mail;

use axum::{response::Redirect, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Path of the broadcast mailer page
pub const SEND_MAIL_PATH: &str = "/admin/send-mail";

/// Build the application router
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use broadcast_mailer::{handlers, state::AppState};
/// use broadcast_mailer::dispatch::ConsoleDispatch;
/// use broadcast_mailer::events::InMemoryEventStore;
///
/// let state = AppState::new(
///     Arc::new(InMemoryEventStore::default()),
///     Arc::new(ConsoleDispatch::new()),
/// );
/// let app: axum::Router = handlers::router(state);
/// ```
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(SEND_MAIL_PATH) }))
        .route(
            SEND_MAIL_PATH,
            get(send_mail::show_composer).post(send_mail::send_broadcast),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
