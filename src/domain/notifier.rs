//! Broadcast channel for user-facing notifications.
//!
//! [`Notifier`] wraps a [`tokio::sync::broadcast`] channel. Controllers
//! publish a [`Notification`] for every outcome the user should see, and
//! any number of UI consumers subscribe to render them.

use tokio::sync::broadcast;

use super::Notification;

/// Broadcast bus for [`Notification`]s.
///
/// When the ring buffer is full the oldest notifications are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Creates a new `Notifier` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a notification to all subscribers.
    ///
    /// Returns the number of receivers that got it. Without receivers the
    /// notification is only logged.
    pub fn publish(&self, notification: Notification) -> usize {
        tracing::debug!(
            severity = ?notification.severity,
            message = %notification.message,
            "notification"
        );
        self.sender.send(notification).unwrap_or(0)
    }

    /// Creates a receiver for all future notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(256)
    }
}
