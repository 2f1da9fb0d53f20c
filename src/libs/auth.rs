//! Credential checks for the admin login.

use crate::libs::config::AdminConfig;
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;

/// Decides whether a username/password pair may open a session.
pub trait Authenticator: Send + Sync {
    /// Returns `Unauthorized` when the pair is rejected.
    fn authenticate(&self, username: &str, password: &str) -> Result<()>;
}

/// Accepts the single admin account from configuration.
///
/// Passwords are compared as plain text. With no admin configured every
/// login is refused.
#[derive(Debug, Clone, Default)]
pub struct AdminAuthenticator {
    admin: Option<AdminConfig>,
}

impl AdminAuthenticator {
    pub fn new(admin: Option<AdminConfig>) -> Self {
        Self { admin }
    }
}

impl Authenticator for AdminAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<()> {
        let Some(admin) = &self.admin else {
            return Err(AppError::Unauthorized(Message::AdminNotConfigured));
        };
        if admin.username == username && admin.password == password {
            Ok(())
        } else {
            Err(AppError::Unauthorized(Message::InvalidCredentials))
        }
    }
}
