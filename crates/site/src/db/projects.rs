//! Project repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use portfolio_core::ProjectId;

use super::{RepositoryError, conflict_or_database};
use crate::models::Project;

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    slug: String,
    title: String,
    category: String,
    summary: String,
    description: String,
    technologies: Vec<String>,
    features: Vec<String>,
    image_url: Option<String>,
    repository_url: Option<String>,
    live_url: Option<String>,
    sort_order: i32,
    created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Self {
            id: Some(ProjectId::new(r.id)),
            slug: r.slug,
            title: r.title,
            category: r.category,
            summary: r.summary,
            description: r.description,
            technologies: r.technologies,
            features: r.features,
            image_url: r.image_url,
            repository_url: r.repository_url,
            live_url: r.live_url,
            sort_order: r.sort_order,
            created_at: Some(r.created_at),
        }
    }
}

const PROJECT_COLUMNS: &str = "id, slug, title, category, summary, description, technologies, \
     features, image_url, repository_url, live_url, sort_order, created_at";

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All projects in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM portfolio.project ORDER BY sort_order, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    /// Look up a project by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM portfolio.project WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Project::from))
    }

    /// Insert a project, or update the existing one with the same slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, project: &Project) -> Result<Project, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r"
            INSERT INTO portfolio.project
                (slug, title, category, summary, description, technologies, features,
                 image_url, repository_url, live_url, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                category = EXCLUDED.category,
                summary = EXCLUDED.summary,
                description = EXCLUDED.description,
                technologies = EXCLUDED.technologies,
                features = EXCLUDED.features,
                image_url = EXCLUDED.image_url,
                repository_url = EXCLUDED.repository_url,
                live_url = EXCLUDED.live_url,
                sort_order = EXCLUDED.sort_order
            RETURNING {PROJECT_COLUMNS}
            "
        ))
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.category)
        .bind(&project.summary)
        .bind(&project.description)
        .bind(&project.technologies)
        .bind(&project.features)
        .bind(&project.image_url)
        .bind(&project.repository_url)
        .bind(&project.live_url)
        .bind(project.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "project slug"))?;

        Ok(row.into())
    }

    /// Delete every project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM portfolio.project")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
