//! Contact submission moderation from the command line.
//!
//! ```bash
//! portfolio-cli submissions list --unread
//! portfolio-cli submissions mark-read 12
//! portfolio-cli submissions delete 12
//! ```
//!
//! Open admin dashboards pick up these changes through the submission
//! table's `NOTIFY` trigger.

use portfolio_core::SubmissionId;
use tracing::info;

use portfolio_site::db::{self, SubmissionRepository};

use super::{CommandError, database_url};

async fn connect() -> Result<sqlx::PgPool, CommandError> {
    Ok(db::create_pool(&database_url()?).await?)
}

/// Log submissions, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(unread_only: bool) -> Result<(), CommandError> {
    let pool = connect().await?;
    let repo = SubmissionRepository::new(&pool);

    let counts = repo.counts().await?;
    info!("{} submissions ({} unread)", counts.total, counts.unread);

    for s in repo.list(unread_only).await? {
        info!(
            "#{} [{}] {} <{}> {}: {}",
            s.id,
            if s.read { "read" } else { "new" },
            s.name,
            s.email.as_str(),
            s.created_at.format("%Y-%m-%d %H:%M"),
            s.subject
        );
    }

    Ok(())
}

/// Mark one submission as read.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no submission has this id.
pub async fn mark_read(id: SubmissionId) -> Result<(), CommandError> {
    let pool = connect().await?;
    SubmissionRepository::new(&pool).mark_read(id).await?;
    info!(%id, "Submission marked read");
    Ok(())
}

/// Delete one submission.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no submission has this id.
pub async fn delete(id: SubmissionId) -> Result<(), CommandError> {
    let pool = connect().await?;
    SubmissionRepository::new(&pool).delete(id).await?;
    info!(%id, "Submission deleted");
    Ok(())
}
