use sqlx::{Row, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::model::{Role, User};

use super::db_err;

#[derive(Clone)]
pub struct UserStorage {
    db: SqlitePool,
}

impl UserStorage {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Look a user up by their unique email. `None` when no row matches.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r#"SELECT id, email, password_hash, role
               FROM users
               WHERE email = ?1"#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| db_err("failed to find user by email", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let role_str: String =
            row.try_get("role").map_err(|e| db_err("failed to decode user row", e))?;
        let role = Role::from_db(&role_str)
            .ok_or_else(|| AppError::Database(format!("unknown role '{}' in users table", role_str)))?;

        Ok(Some(User {
            id: row.try_get("id").map_err(|e| db_err("failed to decode user row", e))?,
            email: row.try_get("email").map_err(|e| db_err("failed to decode user row", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| db_err("failed to decode user row", e))?,
            role,
        }))
    }
}
