//! In-memory admin sessions.
//!
//! A session is just a key (the username) that stays valid until logout or
//! process exit. There is no expiry. The cookie carries the key
//! base64url-encoded so any username survives the `Cookie` header.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str) {
        self.keys.lock().insert(key.to_owned());
    }

    /// Returns `true` if the key was present.
    pub fn remove(&self, key: &str) -> bool {
        self.keys.lock().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts and decodes the session key from a `Cookie` header value.
///
/// A value that is not valid base64url or UTF-8 counts as no session.
pub fn session_key_from_cookie(header: &str) -> Option<String> {
    let value = header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())?;
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    String::from_utf8(bytes).ok()
}

/// `Set-Cookie` value that starts a session.
pub fn session_cookie(key: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        URL_SAFE_NO_PAD.encode(key.as_bytes())
    )
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}
