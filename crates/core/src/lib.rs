//! Portfolio Core - Shared domain library.
//!
//! This crate provides the logic and types shared by the portfolio components:
//! - `site` - Public portfolio site and admin moderation view
//! - `cli` - Command-line tools for migrations and content management
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no database
//! access, no HTTP. Persistence is abstracted behind [`PreferenceStore`] so the
//! resolver and the gate can be driven by a session snapshot, a file, or an
//! in-memory map in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, validated emails and the [`ThemeMode`] enum
//! - [`store`] - Key/value preference storage
//! - [`theme`] - Automatic/manual light-dark resolution
//! - [`auth`] - Single-admin credential check and session flag

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod store;
pub mod theme;
pub mod types;

pub use auth::{AdminCredentials, CredentialsError, SessionAuthGate};
pub use store::{MemoryStore, PreferenceStore, StoreError};
pub use theme::{ThemePreference, ThemeResolver};
pub use types::*;
