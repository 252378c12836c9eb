//! Seed the project table from a YAML file.
//!
//! The file has the same shape as `crates/site/content/projects.yaml`, so the
//! bundled fallback list can be loaded as-is:
//!
//! ```bash
//! portfolio-cli seed projects crates/site/content/projects.yaml --replace
//! ```

use std::path::Path;

use tracing::info;

use portfolio_site::db::{self, ProjectRepository};
use portfolio_site::models::ProjectFile;

use super::{CommandError, database_url};

/// Upsert every project in `file_path`, keyed by slug.
///
/// With `replace`, existing projects are deleted first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a database
/// operation fails.
pub async fn projects(file_path: &str, replace: bool) -> Result<(), CommandError> {
    let path = Path::new(file_path);

    // Parse before connecting so a bad file never touches the database
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_owned(),
            source,
        })?;
    let file: ProjectFile = serde_yaml::from_str(&content)?;
    info!(path = %file_path, projects = file.projects.len(), "Parsed project file");

    let pool = db::create_pool(&database_url()?).await?;
    let repo = ProjectRepository::new(&pool);

    if replace {
        let removed = repo.delete_all().await?;
        info!(removed, "Cleared existing projects");
    }

    for project in &file.projects {
        let saved = repo.upsert(project).await?;
        info!(slug = %saved.slug, sort_order = saved.sort_order, "Upserted project");
    }

    info!("Seeding complete! {} projects", file.projects.len());
    Ok(())
}
