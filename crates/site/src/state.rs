//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::services::SubmissionFeed;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    content: ContentStore,
    submissions: SubmissionFeed,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool, content: ContentStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                submissions: SubmissionFeed::new(),
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the loaded content.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get the live submission feed.
    #[must_use]
    pub fn submissions(&self) -> &SubmissionFeed {
        &self.inner.submissions
    }

    /// Current time on the site's configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.inner.config.theme.utc_offset)
    }
}
