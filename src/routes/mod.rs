//! Router assembly: login, dashboard, quiz, health, and HTTP tracing.

use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - login at `/` (GET form, POST submit)
/// - `/dashboard`, `/quiz?area=...` (GET question, POST answer), `/logout`
/// - `/health` liveness check
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::login_form).post(http::login))
        .route("/dashboard", get(http::dashboard))
        .route("/quiz", get(http::quiz_question).post(http::quiz_answer))
        .route("/logout", get(http::logout))
        .route("/health", get(http::health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
