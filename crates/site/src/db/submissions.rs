//! Contact submission repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use portfolio_core::{Email, SubmissionId};

use super::RepositoryError;
use crate::models::{ContactSubmission, NewSubmission, SubmissionCounts};

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
    created_at: DateTime<Utc>,
    read: bool,
}

impl TryFrom<SubmissionRow> for ContactSubmission {
    type Error = RepositoryError;

    fn try_from(r: SubmissionRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: SubmissionId::new(r.id),
            name: r.name,
            email,
            phone: r.phone,
            subject: r.subject,
            message: r.message,
            created_at: r.created_at,
            read: r.read,
        })
    }
}

/// Repository for contact submissions.
pub struct SubmissionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepository<'a> {
    /// Create a new submission repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new submission as unread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewSubmission) -> Result<ContactSubmission, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r"
            INSERT INTO portfolio.contact_submission (name, email, phone, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, subject, message, created_at, read
            ",
        )
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(&new.phone)
        .bind(&new.subject)
        .bind(&new.message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(&self, unread_only: bool) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r"
            SELECT id, name, email, phone, subject, message, created_at, read
            FROM portfolio.contact_submission
            WHERE NOT ($1 AND read)
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(unread_only)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ContactSubmission::try_from).collect()
    }

    /// Total and unread counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<SubmissionCounts, RepositoryError> {
        let (total, unread): (i64, i64) = sqlx::query_as(
            r"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT read)
            FROM portfolio.contact_submission
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(SubmissionCounts { total, unread })
    }

    /// Mark a submission as read. Marking an already-read submission succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no submission has this id.
    pub async fn mark_read(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE portfolio.contact_submission SET read = TRUE WHERE id = $1")
                .bind(id.as_i32())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no submission has this id.
    pub async fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM portfolio.contact_submission WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
