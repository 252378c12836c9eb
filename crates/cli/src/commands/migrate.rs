//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! portfolio-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PORTFOLIO_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migrations live in `crates/site/migrations/` and create the `portfolio`
//! schema plus the `tower_sessions.session` table.

use portfolio_site::db;

use super::{CommandError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
