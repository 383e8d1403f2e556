//! Contact message repository.

use sqlx::PgPool;

use super::RepositoryError;

/// Repository for contact form submissions.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO messages (name, email, message) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(email)
            .bind(message)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
