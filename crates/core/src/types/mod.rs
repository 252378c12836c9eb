//! Core types for the portfolio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod theme_mode;

pub use email::{Email, EmailError};
pub use id::*;
pub use theme_mode::{ParseThemeModeError, ThemeMode};
