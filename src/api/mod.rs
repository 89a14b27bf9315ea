//! HTTP API: routing and per-resource request handlers.

mod answers;
mod generate;
mod join;
mod rooms;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth;
use crate::state::AppState;

/// Plain `{message}` envelope used by the start and join endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// All routes, ready to be layered and served.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rooms", post(rooms::create))
        .route("/api/rooms/{code}", get(rooms::summary))
        .route("/api/rooms/{code}/details", get(rooms::details))
        .route("/api/rooms/{code}/start", post(rooms::start))
        .route("/api/rooms/{code}/questions", get(rooms::questions))
        .route("/api/rooms/{code}/leaderboard", get(rooms::leaderboard))
        .route("/api/rooms/{code}/results", get(rooms::results))
        .route("/api/join", post(join::join))
        .route("/api/answers", post(answers::submit))
        .route("/api/generate-questions", post(generate::generate))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/me", get(auth::me))
}
