//! Light/dark theme resolution.
//!
//! A visitor is either in *automatic* mode, where the mode follows the local
//! wall clock (light from 06:00 up to but excluding 18:00), or in *manual*
//! mode, pinned to an explicit [`ThemeMode`] until reset.
//!
//! The effective mode is a pure function of the stored preference and the
//! instant it is evaluated at. Nothing here owns a timer: callers that want
//! the display to follow the clock re-evaluate [`ThemeResolver::effective_mode`]
//! periodically while [`ThemeResolver::is_automatic`] holds.

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::store::{self, PreferenceStore};
use crate::types::ThemeMode;

/// First local hour rendered in light mode.
pub const DAY_START_HOUR: u32 = 6;
/// First local hour rendered in dark mode again.
pub const DAY_END_HOUR: u32 = 18;

/// Storage key for the automatic flag (`"true"` / `"false"`).
pub const AUTO_MODE_KEY: &str = "autoMode";
/// Storage key for the pinned mode (`"light"` / `"dark"`).
pub const MANUAL_MODE_KEY: &str = "manualMode";

/// Clock-derived mode for a local hour.
#[must_use]
pub fn mode_for_hour(hour: u32) -> ThemeMode {
    if (DAY_START_HOUR..DAY_END_HOUR).contains(&hour) {
        ThemeMode::Light
    } else {
        ThemeMode::Dark
    }
}

/// Clock-derived mode at `now`, using the local hour of `now`'s time zone.
#[must_use]
pub fn automatic_mode<Tz: TimeZone>(now: &DateTime<Tz>) -> ThemeMode {
    mode_for_hour(now.hour())
}

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    /// Follow the clock when true; use `manual_mode` when false.
    pub auto_mode: bool,
    /// Pinned mode, only consulted while `auto_mode` is false.
    pub manual_mode: ThemeMode,
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self {
            auto_mode: true,
            manual_mode: ThemeMode::Dark,
        }
    }
}

impl ThemePreference {
    /// Mode to render at `now`.
    #[must_use]
    pub fn effective_mode<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ThemeMode {
        if self.auto_mode {
            automatic_mode(now)
        } else {
            self.manual_mode
        }
    }
}

/// Theme state for one visitor, backed by a [`PreferenceStore`].
///
/// Storage failures never surface: reads fall back to defaults and writes are
/// logged, leaving the in-memory preference authoritative.
#[derive(Debug)]
pub struct ThemeResolver<S> {
    store: S,
    preference: ThemePreference,
}

impl<S: PreferenceStore> ThemeResolver<S> {
    /// Load the preference from `store`.
    ///
    /// Missing or unreadable entries default to automatic mode with a dark
    /// manual pin.
    pub fn initialize(store: S) -> Self {
        let defaults = ThemePreference::default();
        let preference = ThemePreference {
            auto_mode: store::load(&store, AUTO_MODE_KEY).unwrap_or(defaults.auto_mode),
            manual_mode: store::load(&store, MANUAL_MODE_KEY).unwrap_or(defaults.manual_mode),
        };

        Self { store, preference }
    }

    /// Mode to render at `now`.
    #[must_use]
    pub fn effective_mode<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ThemeMode {
        self.preference.effective_mode(now)
    }

    /// Flip the displayed mode and pin it.
    ///
    /// From automatic mode the pin is the opposite of what the clock yields at
    /// `now`; from manual mode the existing pin is flipped. Returns the new
    /// effective mode.
    pub fn toggle<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> ThemeMode {
        if self.preference.auto_mode {
            self.preference.auto_mode = false;
            self.preference.manual_mode = automatic_mode(now).opposite();
            store::persist(&mut self.store, AUTO_MODE_KEY, false);
        } else {
            self.preference.manual_mode = self.preference.manual_mode.opposite();
        }
        store::persist(
            &mut self.store,
            MANUAL_MODE_KEY,
            self.preference.manual_mode,
        );

        tracing::debug!(mode = %self.preference.manual_mode, "theme pinned");
        self.preference.manual_mode
    }

    /// Return to clock-driven mode. The manual pin is kept but ignored.
    pub fn reset_to_automatic(&mut self) {
        self.preference.auto_mode = true;
        store::persist(&mut self.store, AUTO_MODE_KEY, true);
    }

    /// Whether the mode currently follows the clock.
    #[must_use]
    pub const fn is_automatic(&self) -> bool {
        self.preference.auto_mode
    }

    /// Snapshot of the current preference.
    #[must_use]
    pub const fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Give back the underlying store, e.g. to write it to a session.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::store::MemoryStore;
    use crate::store::testing::BrokenStore;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_automatic_boundary_every_hour() {
        let resolver = ThemeResolver::initialize(MemoryStore::new());
        for hour in 0..24 {
            let expected = if (6..18).contains(&hour) {
                ThemeMode::Light
            } else {
                ThemeMode::Dark
            };
            assert_eq!(resolver.effective_mode(&at(hour, 0)), expected, "hour {hour}");
        }
    }

    #[test]
    fn test_boundaries_are_inclusive_at_six_exclusive_at_eighteen() {
        let resolver = ThemeResolver::initialize(MemoryStore::new());
        assert_eq!(resolver.effective_mode(&at(5, 59)), ThemeMode::Dark);
        assert_eq!(resolver.effective_mode(&at(6, 0)), ThemeMode::Light);
        assert_eq!(resolver.effective_mode(&at(17, 59)), ThemeMode::Light);
        assert_eq!(resolver.effective_mode(&at(18, 0)), ThemeMode::Dark);
    }

    #[test]
    fn test_uses_local_hour_of_time_zone() {
        let resolver = ThemeResolver::initialize(MemoryStore::new());
        // 12:00 UTC is 21:00 in UTC+9.
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = at(12, 0).with_timezone(&tokyo);
        assert_eq!(resolver.effective_mode(&now), ThemeMode::Dark);
    }

    #[test]
    fn test_fresh_store_defaults() {
        let resolver = ThemeResolver::initialize(MemoryStore::new());
        assert!(resolver.is_automatic());
        assert_eq!(resolver.preference(), ThemePreference::default());
        assert_eq!(resolver.preference().manual_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_first_toggle_pins_opposite_of_clock() {
        let mut resolver = ThemeResolver::initialize(MemoryStore::new());
        assert_eq!(resolver.toggle(&at(14, 0)), ThemeMode::Dark);

        let mut resolver = ThemeResolver::initialize(MemoryStore::new());
        assert_eq!(resolver.toggle(&at(3, 0)), ThemeMode::Light);
        assert!(!resolver.is_automatic());
    }

    #[test]
    fn test_manual_pin_ignores_clock() {
        let mut resolver = ThemeResolver::initialize(MemoryStore::new());
        resolver.toggle(&at(14, 0));
        for hour in 0..24 {
            assert_eq!(resolver.effective_mode(&at(hour, 30)), ThemeMode::Dark);
        }
    }

    #[test]
    fn test_double_toggle_in_manual_restores_pin() {
        let mut resolver = ThemeResolver::initialize(MemoryStore::new());
        resolver.toggle(&at(9, 0));
        let pinned = resolver.preference().manual_mode;

        resolver.toggle(&at(9, 0));
        assert_eq!(resolver.preference().manual_mode, pinned.opposite());
        resolver.toggle(&at(22, 0));
        assert_eq!(resolver.preference().manual_mode, pinned);
        assert!(!resolver.is_automatic());
    }

    #[test]
    fn test_reset_restores_clock_and_keeps_pin() {
        let mut resolver = ThemeResolver::initialize(MemoryStore::new());
        resolver.toggle(&at(14, 0));
        resolver.reset_to_automatic();

        assert!(resolver.is_automatic());
        assert_eq!(resolver.preference().manual_mode, ThemeMode::Dark);
        assert_eq!(resolver.effective_mode(&at(14, 0)), ThemeMode::Light);
        assert_eq!(resolver.effective_mode(&at(3, 0)), ThemeMode::Dark);
    }

    #[test]
    fn test_preference_survives_restart() {
        let mut store = MemoryStore::new();

        let mut resolver = ThemeResolver::initialize(&mut store);
        resolver.toggle(&at(14, 0));
        resolver.toggle(&at(14, 0));
        let before = resolver.preference();
        drop(resolver);

        let reloaded = ThemeResolver::initialize(&mut store);
        assert_eq!(reloaded.preference(), before);
        assert_eq!(store.get(AUTO_MODE_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get(MANUAL_MODE_KEY).unwrap().as_deref(), Some("light"));

        let mut resolver = ThemeResolver::initialize(&mut store);
        resolver.reset_to_automatic();
        let before = resolver.preference();
        let reloaded = ThemeResolver::initialize(resolver.into_store());
        assert_eq!(reloaded.preference(), before);
    }

    #[test]
    fn test_toggle_from_manual_only_rewrites_pin() {
        let mut store = MemoryStore::new();
        store.set(AUTO_MODE_KEY, "false").unwrap();
        store.set(MANUAL_MODE_KEY, "light").unwrap();

        let mut resolver = ThemeResolver::initialize(store);
        assert_eq!(resolver.toggle(&at(12, 0)), ThemeMode::Dark);
        let store = resolver.into_store();
        assert_eq!(store.get(AUTO_MODE_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get(MANUAL_MODE_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_broken_store_degrades_to_memory() {
        let mut resolver = ThemeResolver::initialize(BrokenStore);
        assert!(resolver.is_automatic());
        assert_eq!(resolver.toggle(&at(14, 0)), ThemeMode::Dark);
        assert_eq!(resolver.effective_mode(&at(3, 0)), ThemeMode::Dark);
        resolver.reset_to_automatic();
        assert_eq!(resolver.effective_mode(&at(14, 0)), ThemeMode::Light);
    }

    #[test]
    fn test_end_to_end_afternoon_scenario() {
        let mut resolver = ThemeResolver::initialize(MemoryStore::new());
        assert_eq!(resolver.effective_mode(&at(14, 0)), ThemeMode::Light);

        resolver.toggle(&at(14, 0));
        assert_eq!(resolver.preference().manual_mode, ThemeMode::Dark);
        assert!(!resolver.is_automatic());
        assert_eq!(resolver.effective_mode(&at(14, 1)), ThemeMode::Dark);
        assert_eq!(resolver.effective_mode(&at(3, 0)), ThemeMode::Dark);

        resolver.reset_to_automatic();
        assert_eq!(resolver.effective_mode(&at(3, 0)), ThemeMode::Dark);
        assert_eq!(resolver.effective_mode(&at(14, 0)), ThemeMode::Light);
    }
}
