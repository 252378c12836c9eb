//! Domain models for the site.

pub mod project;
pub mod session;
pub mod submission;

pub use project::{Project, ProjectFile, ProjectSource};
pub use session::{keys as session_keys, load_preferences, save_preferences};
pub use submission::{
    ContactForm, ContactSubmission, NewSubmission, SubmissionCounts, SubmissionError,
};
