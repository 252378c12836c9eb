//! Content page handlers: about, skills and the 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::content::{Page, SkillCategory};
use crate::filters;
use crate::middleware::{PageContext, Visitor};
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub ctx: PageContext,
    pub page: Page,
}

/// Skills page template.
#[derive(Template, WebTemplate)]
#[template(path = "skills.html")]
pub struct SkillsTemplate {
    pub ctx: PageContext,
    pub categories: Vec<SkillCategory>,
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
}

/// Render the 404 page for this visitor.
#[must_use]
pub fn not_found_page(state: &AppState, visitor: &Visitor) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            ctx: visitor.page(state),
        },
    )
        .into_response()
}

/// Fallback for unknown paths.
pub async fn not_found(State(state): State<AppState>, visitor: Visitor) -> Response {
    not_found_page(&state, &visitor)
}

/// Display the About page.
///
/// GET /about
#[instrument(skip(state, visitor))]
pub async fn about(State(state): State<AppState>, visitor: Visitor) -> Response {
    match state.content().get_page("about") {
        Some(page) => AboutTemplate {
            ctx: visitor.page(&state),
            page: page.clone(),
        }
        .into_response(),
        None => not_found_page(&state, &visitor),
    }
}

/// Display skill categories.
///
/// GET /skills
#[instrument(skip(state, visitor))]
pub async fn skills(State(state): State<AppState>, visitor: Visitor) -> SkillsTemplate {
    SkillsTemplate {
        ctx: visitor.page(&state),
        categories: state.content().skills().to_vec(),
    }
}
