mod messages;
mod user;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/login", get(user::login))
        .route("/user/signup", get(user::signup))
        .route("/user", get(user::current_user))
        .route("/user/profile-picture", get(user::profile_picture))
        .route("/messages/send", get(messages::send))
        .route("/messages", get(messages::list))
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "API endpoint not found" })),
    )
}
