//! Contact form route handlers.
//!
//! Submissions are validated, stored unread in `portfolio.contact_submission`
//! and announced on the live feed for the admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::SubmissionRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, Visitor};
use crate::models::{ContactForm, NewSubmission};
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub ctx: PageContext,
    pub form: ContactForm,
    pub error: Option<String>,
    pub sent: bool,
}

/// Query flags for the contact page.
#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    #[serde(default)]
    pub sent: bool,
}

/// Display the contact form.
///
/// GET /contact
#[instrument(skip(state, visitor))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(query): Query<ContactQuery>,
) -> ContactTemplate {
    ContactTemplate {
        ctx: visitor.page(&state),
        form: ContactForm::default(),
        error: None,
        sent: query.sent,
    }
}

/// Submit the contact form.
///
/// POST /contact
///
/// Invalid input re-renders the form with the visitor's values and a
/// message. Success redirects to `/contact?sent=true`.
#[instrument(skip(state, visitor, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let new = match NewSubmission::try_from(&form) {
        Ok(new) => new,
        Err(e) => {
            tracing::debug!(error = %e, "contact form rejected");
            let page = ContactTemplate {
                ctx: visitor.page(&state),
                form,
                error: Some(e.to_string()),
                sent: false,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let submission = SubmissionRepository::new(state.pool()).create(&new).await?;
    tracing::info!(id = %submission.id, "contact submission stored");

    Ok(Redirect::to("/contact?sent=true").into_response())
}
