//! Admin login and submission moderation handlers.
//!
//! Login sets the session's `isAuthenticated` flag through
//! [`portfolio_core::SessionAuthGate`]; everything else requires that flag
//! via [`RequireAdmin`].

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Redirect, Response, Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::Stream;
use portfolio_core::SubmissionId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::SubmissionRepository;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, Visitor};
use crate::models::{ContactSubmission, SubmissionCounts};
use crate::state::AppState;

/// Message shown for any failed login.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub username: String,
    pub error: Option<&'static str>,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub ctx: PageContext,
    pub counts: SubmissionCounts,
    pub submissions: Vec<ContactSubmission>,
}

/// Submission list fragment, re-fetched by the dashboard on live updates.
#[derive(Template, WebTemplate)]
#[template(path = "admin/_submissions.html")]
pub struct SubmissionsFragment {
    pub counts: SubmissionCounts,
    pub submissions: Vec<ContactSubmission>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Submission list filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread: bool,
}

/// Display the login form.
///
/// GET /admin/login
#[instrument(skip(state, visitor))]
pub async fn login_page(State(state): State<AppState>, visitor: Visitor) -> Response {
    if visitor.is_admin(&state.config().admin) {
        return Redirect::to("/admin").into_response();
    }

    LoginTemplate {
        ctx: visitor.page(&state),
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Check the submitted credentials.
///
/// POST /admin/login
#[instrument(skip(state, visitor, form))]
pub async fn login(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = &state.config().admin;

    if !visitor.auth(credentials).login(&form.username, &form.password) {
        let page = LoginTemplate {
            ctx: visitor.page(&state),
            username: form.username,
            error: Some(LOGIN_FAILED_MESSAGE),
        };
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    }

    visitor.cycle_id().await?;
    visitor.save().await?;
    add_breadcrumb("auth", "Admin logged in", None);

    Ok(Redirect::to("/admin").into_response())
}

/// Clear the admin flag. Safe to call when already logged out.
///
/// POST /admin/logout
#[instrument(skip(state, visitor))]
pub async fn logout(State(state): State<AppState>, mut visitor: Visitor) -> Result<Redirect> {
    visitor.auth(&state.config().admin).logout();
    visitor.save().await?;
    add_breadcrumb("auth", "Admin logged out", None);

    Ok(Redirect::to("/"))
}

async fn load_list(
    state: &AppState,
    unread_only: bool,
) -> Result<(SubmissionCounts, Vec<ContactSubmission>)> {
    let repo = SubmissionRepository::new(state.pool());
    let counts = repo.counts().await?;
    let submissions = repo.list(unread_only).await?;
    Ok((counts, submissions))
}

/// Display the dashboard.
///
/// GET /admin
#[instrument(skip(state, visitor))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(visitor): RequireAdmin,
) -> Result<AdminTemplate> {
    let (counts, submissions) = load_list(&state, false).await?;
    Ok(AdminTemplate {
        ctx: visitor.page(&state),
        counts,
        submissions,
    })
}

/// Render the submission list fragment.
///
/// GET /admin/submissions?unread=true
#[instrument(skip(state, _admin))]
pub async fn submissions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<SubmissionsFragment> {
    let (counts, submissions) = load_list(&state, query.unread).await?;
    Ok(SubmissionsFragment {
        counts,
        submissions,
    })
}

/// Mark a submission as read.
///
/// POST /admin/submissions/{id}/read
#[instrument(skip(state, _admin))]
pub async fn mark_read(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<SubmissionId>,
) -> Result<Redirect> {
    SubmissionRepository::new(state.pool()).mark_read(id).await?;
    add_breadcrumb("moderation", "Marked submission read", Some(&[("id", &id.to_string())]));

    Ok(Redirect::to("/admin"))
}

/// Delete a submission.
///
/// POST /admin/submissions/{id}/delete
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<SubmissionId>,
) -> Result<Redirect> {
    SubmissionRepository::new(state.pool()).delete(id).await?;
    add_breadcrumb("moderation", "Deleted submission", Some(&[("id", &id.to_string())]));

    Ok(Redirect::to("/admin"))
}

/// Stream submission changes as Server-Sent Events.
///
/// GET /admin/submissions/events
///
/// Each event is named after its kind (`created`, `read`, `deleted`,
/// `resync`) and carries the JSON-encoded
/// [`SubmissionEvent`](crate::services::SubmissionEvent). The stream
/// ends when the client disconnects.
pub async fn events(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let mut receiver = state.submissions().subscribe();

    let stream = async_stream::stream! {
        while let Some(event) = receiver.next().await {
            let json = serde_json::to_string(&event)
                .unwrap_or_else(|_| r#"{"type":"resync"}"#.to_string());
            yield Ok(Event::default().event(event.name()).data(json));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
