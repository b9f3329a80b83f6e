use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{AppError, users::UserStore};

/// Name of the cookie issued on login and signup.
pub const SESSION_COOKIE: &str = "session";

/// The authenticated user of a request, resolved from the `session` cookie.
/// Rejects with 401 when the cookie is absent or maps to no live session.
pub struct SessionUser(pub String);

impl<S> FromRequestParts<S> for SessionUser
where
    UserStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let users = UserStore::from_ref(state);
        parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|cookies| cookie_value(cookies, SESSION_COOKIE))
            .and_then(|token| users.resolve_session(token))
            .map(SessionUser)
            .ok_or(AppError::Unauthenticated("Invalid session"))
    }
}

/// `Set-Cookie` value for a freshly issued session token.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}")
}

/// Pulls one cookie's value out of a raw `Cookie` header.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
