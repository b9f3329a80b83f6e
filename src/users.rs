use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::{Rng, distr::Alphanumeric};

/// 32 alphanumeric chars, ~190 bits of entropy from a CSPRNG.
const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password: String, // plaintext, demo only
    pub profile_picture: Option<String>,
}

/// Owns every user record and the session-token table. Handlers share one
/// instance through `AppState`; the mutex keeps writers serialized across
/// worker threads.
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    sessions: HashMap<String, String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a user record. Fails if the username is already taken.
    pub fn register(&self, username: &str, password: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.username == username) {
            return false;
        }

        inner.users.push(User {
            username: username.to_owned(),
            password: password.to_owned(),
            profile_picture: None,
        });
        true
    }

    /// Issues a fresh session token if the credentials match exactly.
    /// Sessions never expire.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        if !inner
            .users
            .iter()
            .any(|u| u.username == username && u.password == password)
        {
            return None;
        }

        let token = new_token();
        inner.sessions.insert(token.clone(), username.to_owned());
        Some(token)
    }

    pub fn resolve_session(&self, token: &str) -> Option<String> {
        self.inner.lock().unwrap().sessions.get(token).cloned()
    }

    pub fn get_user(&self, username: &str) -> Option<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Fails if the username is unknown.
    pub fn set_profile_picture(&self, username: &str, url: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.iter_mut().find(|u| u.username == username) {
            Some(user) => {
                user.profile_picture = Some(url.to_owned());
                true
            }
            None => false,
        }
    }
}

fn new_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
