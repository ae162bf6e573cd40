//! # User Repository
//!
//! Accounts are created once on signup and only ever read afterwards.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::gateway::{self, SqlParam};
use stockroom_core::{User, UserId};

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user and returns the generated id.
    ///
    /// `password_hash` must already be hashed. A second account with the
    /// same email fails with `DbError::UniqueViolation`.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<UserId> {
        debug!(email = %email, "Creating user");

        let user_id: UserId = gateway::fetch_scalar(
            &self.pool,
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?) RETURNING user_id",
            &[
                SqlParam::from(username.trim()),
                SqlParam::from(email.trim()),
                SqlParam::from(password_hash),
            ],
        )
        .await?;

        debug!(user_id, "User created");
        Ok(user_id)
    }

    /// Looks a user up by email (for login).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        gateway::fetch_optional_as(
            &self.pool,
            "SELECT user_id, username, email, password_hash FROM users WHERE email = ?",
            &[email.trim().into()],
        )
        .await
    }

    /// Checks whether an account with this email exists.
    pub async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let found: Option<i64> = gateway::fetch_optional_scalar(
            &self.pool,
            "SELECT 1 FROM users WHERE email = ?",
            &[email.trim().into()],
        )
        .await?;

        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let user_id = users.create("ada", "ada@example.com", "$argon2id$hash").await.unwrap();
        assert!(user_id > 0);

        let user = users.get_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.username, "ada");
        assert_eq!(user.password_hash, "$argon2id$hash");

        assert!(users.exists_by_email("ada@example.com").await.unwrap());
        assert!(!users.exists_by_email("bob@example.com").await.unwrap());
        assert!(users.get_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_adds_no_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.create("ada", "ada@example.com", "h1").await.unwrap();
        let err = users.create("ada2", "ada@example.com", "h2").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        let kept = users.get_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(kept.username, "ada");
        assert_eq!(kept.password_hash, "h1");
    }
}
