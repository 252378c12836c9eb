//! Admin authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use super::visitor::{Visitor, request_path};
use crate::state::AppState;

/// Extractor that requires the admin session flag.
///
/// Page requests without it are sent to the home page; fragment, action and
/// event-stream requests get `401`.
pub struct RequireAdmin(pub Visitor);

/// Rejection for [`RequireAdmin`].
pub enum AuthRejection {
    /// Redirect to the home page (for the admin page itself).
    RedirectHome,
    /// Unauthorized response (for fragments and actions).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let visitor = Visitor::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::Unauthorized)?;

        if visitor.is_admin(&state.config().admin) {
            return Ok(Self(visitor));
        }

        let path = request_path(parts);
        let is_page = matches!(path, "/admin" | "/admin/");
        tracing::debug!(path, "admin access denied");
        Err(if is_page {
            AuthRejection::RedirectHome
        } else {
            AuthRejection::Unauthorized
        })
    }
}
