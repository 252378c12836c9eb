//! Live feed of contact submission changes.
//!
//! A trigger on `portfolio.contact_submission` sends a `NOTIFY` for every
//! insert, mark-read and delete, whoever made it (the site or the CLI).
//! [`listen_for_changes`] relays those notifications onto a broadcast
//! channel. The admin page listens through Server-Sent Events and re-fetches
//! its list when something changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;

use portfolio_core::SubmissionId;

/// Events buffered per receiver before it is considered lagged.
pub const FEED_CAPACITY: usize = 64;

/// Postgres channel the submission trigger notifies on.
pub const NOTIFY_CHANNEL: &str = "portfolio_submissions";

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// A change to the set of submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmissionEvent {
    Created { id: SubmissionId },
    Read { id: SubmissionId },
    Deleted { id: SubmissionId },
    /// The receiver missed events and should reload everything.
    Resync,
}

impl SubmissionEvent {
    /// SSE event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Read { .. } => "read",
            Self::Deleted { .. } => "deleted",
            Self::Resync => "resync",
        }
    }

    /// Decode a `NOTIFY` payload. Anything unrecognised becomes [`Self::Resync`].
    #[must_use]
    pub fn from_notification(payload: &str) -> Self {
        serde_json::from_str(payload).unwrap_or_else(|e| {
            tracing::warn!(error = %e, payload, "unrecognised submission notification");
            Self::Resync
        })
    }
}

/// Broadcast hub for [`SubmissionEvent`]s.
#[derive(Debug, Clone)]
pub struct SubmissionFeed {
    sender: broadcast::Sender<SubmissionEvent>,
}

impl Default for SubmissionFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionFeed {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Having no listeners is not an error.
    pub fn publish(&self, event: SubmissionEvent) {
        let listeners = self.sender.send(event).unwrap_or(0);
        tracing::debug!(event = event.name(), listeners, "submission event published");
    }

    /// Start listening for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> FeedReceiver {
        FeedReceiver {
            receiver: self.sender.subscribe(),
        }
    }
}

/// One listener on a [`SubmissionFeed`].
#[derive(Debug)]
pub struct FeedReceiver {
    receiver: broadcast::Receiver<SubmissionEvent>,
}

impl FeedReceiver {
    /// Wait for the next event.
    ///
    /// A lagged receiver gets [`SubmissionEvent::Resync`] instead of the
    /// dropped events. Returns `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<SubmissionEvent> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "submission feed receiver lagged");
                Some(SubmissionEvent::Resync)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Relay submission notifications from Postgres onto `feed`.
///
/// Runs for the life of the process, reconnecting after
/// [`RECONNECT_DELAY`]. Listeners are told to resync after a dropped
/// connection since notifications sent meanwhile are lost.
pub async fn listen_for_changes(pool: PgPool, feed: SubmissionFeed) {
    loop {
        match relay(&pool, &feed).await {
            Ok(()) => {
                tracing::warn!("submission listener connection lost");
                feed.publish(SubmissionEvent::Resync);
            }
            Err(e) => tracing::warn!(error = %e, "submission listener failed"),
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn relay(pool: &PgPool, feed: &SubmissionFeed) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(NOTIFY_CHANNEL).await?;
    tracing::info!(channel = NOTIFY_CHANNEL, "listening for submission changes");

    while let Some(notification) = listener.try_recv().await? {
        feed.publish(SubmissionEvent::from_notification(notification.payload()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let feed = SubmissionFeed::new();
        let mut rx = feed.subscribe();

        feed.publish(SubmissionEvent::Created {
            id: SubmissionId::new(7),
        });
        feed.publish(SubmissionEvent::Deleted {
            id: SubmissionId::new(7),
        });

        assert_eq!(
            rx.next().await,
            Some(SubmissionEvent::Created {
                id: SubmissionId::new(7)
            })
        );
        assert_eq!(
            rx.next().await,
            Some(SubmissionEvent::Deleted {
                id: SubmissionId::new(7)
            })
        );
    }

    #[tokio::test]
    async fn test_publish_without_listeners_is_fine() {
        let feed = SubmissionFeed::new();
        feed.publish(SubmissionEvent::Resync);
    }

    #[tokio::test]
    async fn test_lagged_receiver_is_told_to_resync() {
        let feed = SubmissionFeed::new();
        let mut rx = feed.subscribe();

        for i in 0..=i32::try_from(FEED_CAPACITY).unwrap() {
            feed.publish(SubmissionEvent::Read {
                id: SubmissionId::new(i),
            });
        }

        assert_eq!(rx.next().await, Some(SubmissionEvent::Resync));
        assert!(matches!(rx.next().await, Some(SubmissionEvent::Read { .. })));
    }

    #[tokio::test]
    async fn test_closed_feed_ends_stream() {
        let feed = SubmissionFeed::new();
        let mut rx = feed.subscribe();
        drop(feed);
        assert_eq!(rx.next().await, None);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&SubmissionEvent::Created {
            id: SubmissionId::new(3),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"created","id":3}"#);
        assert_eq!(
            serde_json::to_string(&SubmissionEvent::Resync).unwrap(),
            r#"{"type":"resync"}"#
        );
    }

    #[test]
    fn test_trigger_payloads_decode() {
        assert_eq!(
            SubmissionEvent::from_notification(r#"{"type":"created","id":12}"#),
            SubmissionEvent::Created {
                id: SubmissionId::new(12)
            }
        );
        assert_eq!(
            SubmissionEvent::from_notification(r#"{"type":"read","id":12}"#),
            SubmissionEvent::Read {
                id: SubmissionId::new(12)
            }
        );
        assert_eq!(
            SubmissionEvent::from_notification(r#"{"type":"deleted","id":12}"#),
            SubmissionEvent::Deleted {
                id: SubmissionId::new(12)
            }
        );
    }

    #[test]
    fn test_unrecognised_payload_asks_for_resync() {
        assert_eq!(
            SubmissionEvent::from_notification("not json"),
            SubmissionEvent::Resync
        );
        assert_eq!(
            SubmissionEvent::from_notification(r#"{"type":"archived","id":1}"#),
            SubmissionEvent::Resync
        );
        assert_eq!(
            SubmissionEvent::from_notification(r#"{"type":"created"}"#),
            SubmissionEvent::Resync
        );
    }
}
