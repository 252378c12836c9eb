//! Session-stored visitor state.
//!
//! Every visitor gets one [`MemoryStore`] kept under [`keys::PREFERENCES`].
//! It holds the theme keys (`autoMode`, `manualMode`) and the admin flag
//! (`isAuthenticated`), and is written back whole after each change.

use portfolio_core::MemoryStore;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the visitor's preference store.
    pub const PREFERENCES: &str = "preferences";
}

/// Read the visitor's preference store, starting empty for new sessions.
///
/// A value that no longer deserializes is dropped rather than failing the
/// request.
pub async fn load_preferences(session: &Session) -> MemoryStore {
    match session.get::<MemoryStore>(keys::PREFERENCES).await {
        Ok(store) => store.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable session preferences");
            MemoryStore::default()
        }
    }
}

/// Write the visitor's preference store back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_preferences(
    session: &Session,
    store: &MemoryStore,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PREFERENCES, store).await
}
