//! Downstream publishing of the deal feed.
//!
//! Only a stub exists: it serialises the feed, logs it, and reports a status
//! line. A real integration would implement [`Publisher`] and POST the same
//! payload.

use hhfind_core::Deal;
use thiserror::Error;

pub const PUBLISH_OK_STATUS: &str = "Deal feed successfully created/updated with new happy hour deals.";
pub const PUBLISH_FAILED_STATUS: &str = "Deal feed publish failed: no deals to publish.";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialise deal feed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("publisher rejected the feed: {0}")]
    Rejected(String),
}

/// Receives the deal list once the workflow decides to publish.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    /// Returns a human-readable status line.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the feed cannot be delivered.
    async fn publish(&self, deals: &[Deal]) -> Result<String, PublishError>;
}

/// Side effect fired after a successful publish (e.g. a notification sound).
/// Must not block; failures are the implementor's to log.
pub trait Notifier {
    fn notify(&self);
}

#[derive(Default)]
pub struct PublishStub {
    notifier: Option<Box<dyn Notifier + Send + Sync>>,
}

impl PublishStub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + Send + Sync + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }
}

impl Publisher for PublishStub {
    async fn publish(&self, deals: &[Deal]) -> Result<String, PublishError> {
        if deals.is_empty() {
            tracing::warn!("publish requested with an empty deal list");
            return Ok(PUBLISH_FAILED_STATUS.to_string());
        }

        let payload = serde_json::to_string(deals)?;
        tracing::debug!(count = deals.len(), bytes = payload.len(), "publishing deal feed (stub)");

        if let Some(notifier) = &self.notifier {
            notifier.notify();
        }
        Ok(PUBLISH_OK_STATUS.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use hhfind_core::{Coordinate, ALERT_RADIUS_KM};

    use super::*;

    struct CountingNotifier(Arc<AtomicUsize>);

    impl Notifier for CountingNotifier {
        fn notify(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn deal() -> Deal {
        Deal {
            venue_name: "The Tap".to_string(),
            location: Coordinate {
                lat: 40.713,
                lng: -74.006,
            },
            offer_details: "Happy Hour".to_string(),
            validity_hours: 3.0,
            alert_radius_km: ALERT_RADIUS_KM,
            source_confirmed: false,
            venue_type: "Bar".to_string(),
        }
    }

    #[tokio::test]
    async fn non_empty_feed_succeeds_and_notifies() {
        let count = Arc::new(AtomicUsize::new(0));
        let stub = PublishStub::new().with_notifier(CountingNotifier(Arc::clone(&count)));

        let status = stub.publish(&[deal()]).await.unwrap();

        assert_eq!(status, PUBLISH_OK_STATUS);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_feed_reports_failure_status_without_notifying() {
        let count = Arc::new(AtomicUsize::new(0));
        let stub = PublishStub::new().with_notifier(CountingNotifier(Arc::clone(&count)));

        let status = stub.publish(&[]).await.unwrap();

        assert_eq!(status, PUBLISH_FAILED_STATUS);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stub_without_notifier_still_publishes() {
        let status = PublishStub::new().publish(&[deal()]).await.unwrap();
        assert_eq!(status, PUBLISH_OK_STATUS);
    }
}
