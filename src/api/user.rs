use anyhow::anyhow;
use axum::{
    Json, debug_handler,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppError, AppResult, session, session::SessionUser, users::UserStore};

#[derive(Deserialize)]
pub(crate) struct CredentialsQuery {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ProfilePictureQuery {
    pub(crate) url: Option<String>,
}

#[debug_handler]
pub(crate) async fn login(
    State(users): State<UserStore>,
    Query(CredentialsQuery { username, password }): Query<CredentialsQuery>,
) -> AppResult<Response> {
    let (username, password) = require_credentials(username, password)?;

    let Some(token) = users.authenticate(&username, &password) else {
        return Err(AppError::Unauthenticated("Invalid username or password"));
    };

    tracing::info!("user {username} logged in");
    Ok(session_response(&token, "Logged in"))
}

#[debug_handler]
pub(crate) async fn signup(
    State(users): State<UserStore>,
    Query(CredentialsQuery { username, password }): Query<CredentialsQuery>,
) -> AppResult<Response> {
    let (username, password) = require_credentials(username, password)?;

    if !users.register(&username, &password) {
        return Err(AppError::Conflict("Username already taken"));
    }

    // Freshly registered credentials always authenticate.
    let token = users
        .authenticate(&username, &password)
        .ok_or_else(|| anyhow!("could not open a session for new user {username}"))?;

    tracing::info!("user {username} signed up");
    Ok(session_response(&token, "Signed up"))
}

#[debug_handler]
pub(crate) async fn current_user(
    State(users): State<UserStore>,
    SessionUser(username): SessionUser,
) -> AppResult<Json<Value>> {
    let user = users
        .get_user(&username)
        .ok_or_else(|| anyhow!("session resolved to unknown user {username}"))?;

    Ok(Json(json!({
        "username": user.username,
        "profilePicture": user.profile_picture,
    })))
}

#[debug_handler]
pub(crate) async fn profile_picture(
    State(users): State<UserStore>,
    SessionUser(username): SessionUser,
    Query(ProfilePictureQuery { url }): Query<ProfilePictureQuery>,
) -> AppResult<Json<Value>> {
    let url = url.ok_or(AppError::MissingParam("Missing url"))?;

    if !users.set_profile_picture(&username, &url) {
        return Err(anyhow!("session resolved to unknown user {username}").into());
    }

    Ok(Json(json!({ "message": "Profile picture updated" })))
}

fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> AppResult<(String, String)> {
    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(AppError::MissingParam("Missing username or password")),
    }
}

fn session_response(token: &str, message: &str) -> Response {
    (
        [(header::SET_COOKIE, session::session_cookie(token))],
        Json(json!({ "message": message })),
    )
        .into_response()
}
