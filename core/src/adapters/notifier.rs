//! User notifier adapters.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::ports::UserNotifier;

/// Emits alerts as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl UserNotifier for TracingNotifier {
    fn alert(&self, message: &str) {
        warn!(alert = message, "User alert");
    }
}

/// Queues alerts for a host UI that polls for them.
///
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct QueuedNotifier {
    pending: Arc<Mutex<Vec<String>>>,
}

impl QueuedNotifier {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get and clear pending alerts.
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Check if there are pending alerts.
    pub fn has_alerts(&self) -> bool {
        !self.pending.lock().is_empty()
    }
}

impl UserNotifier for QueuedNotifier {
    fn alert(&self, message: &str) {
        self.pending.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_alerts_are_shared_and_drained() {
        let notifier = QueuedNotifier::new();
        let handle = notifier.clone();

        notifier.alert("Camera access denied or not available");
        assert!(handle.has_alerts());

        let alerts = handle.take_alerts();
        assert_eq!(alerts, vec!["Camera access denied or not available"]);
        assert!(!notifier.has_alerts());
    }
}
