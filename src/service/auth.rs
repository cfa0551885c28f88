use crate::error::{AppError, AppResult};
use crate::model::User;
use crate::storage::UserStorage;

use super::password;

/// Stateless credential verification: every request re-authenticates against
/// the stored password hash. No sessions, tokens, lockout or rate limiting.
#[derive(Clone)]
pub struct AuthService {
    users: UserStorage,
}

impl AuthService {
    pub fn new(users: UserStorage) -> Self {
        Self { users }
    }

    /// Verify an email/password pair and return the matching user.
    ///
    /// An unknown email and a wrong password produce the same generic error,
    /// so the response never reveals whether the email exists.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::warn!(email, "authentication failed");
            return Err(invalid_credentials());
        };

        let verified = password::verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to verify password hash: {e}")))?;
        if !verified {
            tracing::warn!(email, "authentication failed");
            return Err(invalid_credentials());
        }

        tracing::debug!(email = %user.email, "user authenticated");
        Ok(user)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid email or password".to_string())
}
