//! Per-request visitor state extractor.
//!
//! Loads the visitor's preference store from the session so handlers can run
//! the theme resolver and admin gate over it, then write it back.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
};
use portfolio_core::{AdminCredentials, MemoryStore, SessionAuthGate, ThemeMode, ThemeResolver};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{load_preferences, save_preferences};
use crate::state::AppState;

/// The current visitor's session and preference store.
///
/// # Example
///
/// ```rust,ignore
/// async fn toggle(State(state): State<AppState>, mut visitor: Visitor) -> Result<Redirect> {
///     visitor.theme().toggle(&state.now());
///     visitor.save().await?;
///     Ok(Redirect::to("/"))
/// }
/// ```
pub struct Visitor {
    session: Session,
    store: MemoryStore,
    path: String,
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;
        let store = load_preferences(&session).await;

        Ok(Self {
            session,
            store,
            path: request_path(parts).to_string(),
        })
    }
}

/// Full request path, also inside nested routers.
pub(crate) fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.path())
}

impl Visitor {
    /// Theme resolver over this visitor's preferences.
    pub fn theme(&mut self) -> ThemeResolver<&mut MemoryStore> {
        ThemeResolver::initialize(&mut self.store)
    }

    /// Admin gate over this visitor's preferences.
    pub fn auth<'a>(
        &'a mut self,
        credentials: &'a AdminCredentials,
    ) -> SessionAuthGate<'a, &'a mut MemoryStore> {
        SessionAuthGate::initialize(credentials, &mut self.store)
    }

    /// Whether the visitor is logged in as admin.
    #[must_use]
    pub fn is_admin(&self, credentials: &AdminCredentials) -> bool {
        SessionAuthGate::initialize(credentials, self.store.clone()).is_authenticated()
    }

    /// Layout data every page template needs.
    #[must_use]
    pub fn page(&self, state: &AppState) -> PageContext {
        let resolver = ThemeResolver::initialize(self.store.clone());
        PageContext {
            theme: resolver.effective_mode(&state.now()),
            auto_mode: resolver.is_automatic(),
            refresh_seconds: state.config().theme.refresh_seconds,
            is_admin: self.is_admin(&state.config().admin),
            path: self.path.clone(),
        }
    }

    /// Write the preference store back to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store rejects the write.
    pub async fn save(&self) -> Result<(), AppError> {
        save_preferences(&self.session, &self.store).await?;
        Ok(())
    }

    /// Start a fresh session id, keeping the data. Used on login.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session cannot be cycled.
    pub async fn cycle_id(&self) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        Ok(())
    }
}

/// Layout data shared by every page template.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Mode rendered on `<body>`.
    pub theme: ThemeMode,
    /// Whether the page should keep following the clock.
    pub auto_mode: bool,
    /// Client re-check interval while automatic.
    pub refresh_seconds: u32,
    /// Show admin navigation.
    pub is_admin: bool,
    /// Path of the current page, used to return after a theme change.
    pub path: String,
}

impl PageContext {
    /// The mode a toggle would switch to.
    #[must_use]
    pub const fn next_theme(&self) -> ThemeMode {
        self.theme.opposite()
    }
}
