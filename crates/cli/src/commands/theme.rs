//! Offline theme resolution, for checking the day/night boundaries.
//!
//! ```bash
//! portfolio-cli theme resolve --at 17:59
//! portfolio-cli theme resolve --at 23:00 --manual light
//! ```

use chrono::{NaiveTime, Utc};
use portfolio_core::{ThemeMode, ThemePreference};

/// Mode a visitor would see at local time `at`.
///
/// Without `manual` the visitor follows the clock; with it the mode is pinned.
#[must_use]
pub fn resolve(at: NaiveTime, manual: Option<ThemeMode>) -> ThemeMode {
    let preference = manual.map_or_else(ThemePreference::default, |mode| ThemePreference {
        auto_mode: false,
        manual_mode: mode,
    });
    let now = Utc::now().date_naive().and_time(at).and_utc();
    preference.effective_mode(&now)
}

/// Log the resolved mode.
pub fn run(at: NaiveTime, manual: Option<ThemeMode>) {
    let mode = resolve(at, manual);
    tracing::info!(
        at = %at.format("%H:%M"),
        automatic = manual.is_none(),
        "Theme: {mode}"
    );
}
