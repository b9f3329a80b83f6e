pub mod api;
pub mod chat;
pub mod session;
pub mod site;
pub mod users;

use axum::{
    Json, Router,
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{chat::ChatLog, site::Site, users::UserStore};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: UserStore,
    pub chat: ChatLog,
    pub site: Site,
}

impl AppState {
    pub fn new(site: Site) -> Self {
        AppState {
            users: UserStore::new(),
            chat: ChatLog::new(),
            site,
        }
    }
}

/// The whole application: the JSON API under `/api`, a redirect from `/`
/// to the landing page, and static file serving for everything else.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(site::index))
        .nest("/api", api::router())
        .fallback(get(site::static_file))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    MissingParam(&'static str),
    Unauthenticated(&'static str),
    Conflict(&'static str),
    NotFound(&'static str),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingParam(msg) => (StatusCode::BAD_REQUEST, msg.to_owned()),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.to_owned()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.to_owned()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_owned()),
            AppError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
