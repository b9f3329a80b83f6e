use axum::{
    Json, debug_handler,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppError, AppResult, chat::ChatLog, session::SessionUser, users::UserStore};

#[derive(Deserialize)]
pub(crate) struct SendMessageQuery {
    pub(crate) message: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn send(
    State(chat): State<ChatLog>,
    SessionUser(username): SessionUser,
    Query(SendMessageQuery { message }): Query<SendMessageQuery>,
) -> AppResult<Json<Value>> {
    let message = message.ok_or(AppError::MissingParam("Missing message"))?;

    chat.append(&username, &message);
    Ok(Json(json!({ "message": "Message sent" })))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn list(
    State(chat): State<ChatLog>,
    State(users): State<UserStore>,
    _user: SessionUser,
) -> AppResult<Json<Value>> {
    Ok(Json(json!({ "messages": chat.list_all(&users) })))
}
