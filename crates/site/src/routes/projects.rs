//! Project listing and detail handlers.
//!
//! Projects come from the database. When the table is empty or the query
//! fails, the bundled `projects.yaml` list is shown instead so the public
//! site keeps working while the database is down.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::db::ProjectRepository;
use crate::filters;
use crate::middleware::{PageContext, Visitor};
use crate::models::{Project, ProjectSource};
use crate::routes::pages::not_found_page;
use crate::state::AppState;

/// Project listing template.
#[derive(Template, WebTemplate)]
#[template(path = "projects/index.html")]
pub struct ProjectsIndexTemplate {
    pub ctx: PageContext,
    pub projects: Vec<Project>,
    pub source: ProjectSource,
}

/// Project detail template.
#[derive(Template, WebTemplate)]
#[template(path = "projects/show.html")]
pub struct ProjectShowTemplate {
    pub ctx: PageContext,
    pub project: Project,
}

/// Load projects from the database, falling back to the bundled list.
pub async fn load_projects(state: &AppState) -> (Vec<Project>, ProjectSource) {
    match ProjectRepository::new(state.pool()).list().await {
        Ok(projects) if !projects.is_empty() => (projects, ProjectSource::Database),
        Ok(_) => {
            tracing::debug!("No projects in database, using bundled list");
            fallback(state)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Project query failed, using bundled list");
            fallback(state)
        }
    }
}

fn fallback(state: &AppState) -> (Vec<Project>, ProjectSource) {
    (
        state.content().fallback_projects().to_vec(),
        ProjectSource::Fallback,
    )
}

/// Find one project by slug in the database, then in the bundled list.
pub async fn find_project(state: &AppState, slug: &str) -> Option<Project> {
    match ProjectRepository::new(state.pool()).get_by_slug(slug).await {
        Ok(Some(project)) => return Some(project),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, slug, "Project lookup failed, using bundled list"),
    }

    state
        .content()
        .fallback_projects()
        .iter()
        .find(|p| p.slug == slug)
        .cloned()
}

/// Display all projects.
///
/// GET /projects
#[instrument(skip(state, visitor))]
pub async fn index(State(state): State<AppState>, visitor: Visitor) -> ProjectsIndexTemplate {
    let (projects, source) = load_projects(&state).await;
    ProjectsIndexTemplate {
        ctx: visitor.page(&state),
        projects,
        source,
    }
}

/// Display a single project.
///
/// GET /projects/{slug}
#[instrument(skip(state, visitor))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(slug): Path<String>,
) -> Response {
    match find_project(&state, &slug).await {
        Some(project) => ProjectShowTemplate {
            ctx: visitor.page(&state),
            project,
        }
        .into_response(),
        None => not_found_page(&state, &visitor),
    }
}
