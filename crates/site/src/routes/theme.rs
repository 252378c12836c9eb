//! Theme route handlers.
//!
//! The theme is resolved on the server for every page. The browser only
//! polls `GET /api/theme` while automatic mode is on, so a page left open
//! across 06:00 or 18:00 switches without a reload.

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, header::ACCEPT},
    response::{IntoResponse, Redirect, Response},
};
use portfolio_core::{ThemeMode, ThemePreference};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::Visitor;
use crate::state::AppState;

/// Current theme state as seen by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeStatus {
    /// Mode to render now.
    pub mode: ThemeMode,
    /// Whether the mode follows the clock.
    pub auto_mode: bool,
    /// Pinned mode (used when `auto_mode` is false).
    pub manual_mode: ThemeMode,
    /// How often to re-check while automatic.
    pub refresh_seconds: u32,
}

impl ThemeStatus {
    fn new(state: &AppState, preference: ThemePreference) -> Self {
        Self {
            mode: preference.effective_mode(&state.now()),
            auto_mode: preference.auto_mode,
            manual_mode: preference.manual_mode,
            refresh_seconds: state.config().theme.refresh_seconds,
        }
    }
}

/// Where to send the browser after a theme change.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnTo {
    #[serde(default)]
    pub return_to: Option<String>,
}

impl ReturnTo {
    /// The requested path if it stays on this site, else `/`.
    #[must_use]
    pub fn target(&self) -> &str {
        self.return_to
            .as_deref()
            .filter(|p| is_local_path(p))
            .unwrap_or("/")
    }
}

/// Same-site path that can go in a `Location` header unchanged.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn respond(
    state: &AppState,
    visitor: &mut Visitor,
    headers: &HeaderMap,
    back: &ReturnTo,
) -> Response {
    if wants_json(headers) {
        let status = ThemeStatus::new(state, visitor.theme().preference());
        Json(status).into_response()
    } else {
        Redirect::to(back.target()).into_response()
    }
}

/// Report the visitor's theme.
///
/// GET /api/theme
#[instrument(skip(state, visitor))]
pub async fn current(State(state): State<AppState>, mut visitor: Visitor) -> Json<ThemeStatus> {
    Json(ThemeStatus::new(&state, visitor.theme().preference()))
}

/// Flip the displayed mode and pin it.
///
/// POST /theme/toggle
#[instrument(skip(state, visitor, headers))]
pub async fn toggle(
    State(state): State<AppState>,
    mut visitor: Visitor,
    headers: HeaderMap,
    Query(back): Query<ReturnTo>,
) -> Result<Response> {
    let mode = visitor.theme().toggle(&state.now());
    visitor.save().await?;
    tracing::debug!(%mode, "theme toggled");

    Ok(respond(&state, &mut visitor, &headers, &back))
}

/// Go back to following the clock.
///
/// POST /theme/auto
#[instrument(skip(state, visitor, headers))]
pub async fn auto(
    State(state): State<AppState>,
    mut visitor: Visitor,
    headers: HeaderMap,
    Query(back): Query<ReturnTo>,
) -> Result<Response> {
    visitor.theme().reset_to_automatic();
    visitor.save().await?;

    Ok(respond(&state, &mut visitor, &headers, &back))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn back(path: &str) -> ReturnTo {
        ReturnTo {
            return_to: Some(path.to_string()),
        }
    }

    #[test]
    fn test_return_to_stays_local() {
        assert_eq!(back("/projects").target(), "/projects");
        assert_eq!(back("/projects/peopleview").target(), "/projects/peopleview");
        assert_eq!(back("https://evil.example").target(), "/");
        assert_eq!(back("//evil.example").target(), "/");
        assert_eq!(back("/\\evil.example").target(), "/");
        assert_eq!(ReturnTo::default().target(), "/");
    }

    #[test]
    fn test_return_to_rejects_control_characters() {
        assert_eq!(back("/\nfoo").target(), "/");
        assert_eq!(back("/projects\r\nSet-Cookie: x=1").target(), "/");
        assert_eq!(back("/a\tb").target(), "/");
        assert_eq!(back("/\u{7f}").target(), "/");
        assert_eq!(back("/caf\u{e9}").target(), "/caf\u{e9}");
    }

    #[test]
    fn test_wants_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!wants_json(&headers));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        assert!(wants_json(&headers));
    }
}
