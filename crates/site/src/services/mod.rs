//! Services shared across route handlers.

pub mod submissions;

pub use submissions::{FeedReceiver, SubmissionEvent, SubmissionFeed, listen_for_changes};
