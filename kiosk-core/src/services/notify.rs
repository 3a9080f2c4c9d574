//! Notification sink (toasts)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(target: "notify", "{}", message),
            Severity::Warning => tracing::warn!(target: "notify", "{}", message),
            Severity::Info | Severity::Success => tracing::info!(target: "notify", "{}", message),
        }
    }
}

/// Keeps every notification in memory
///
/// Clones share the same buffer, so a test can hold one handle while the
/// kiosk owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries.lock().last().cloned()
    }

    /// Drain the buffer
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.entries.lock().push(Notification {
            message: message.to_string(),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_shares_buffer() {
        let notifier = MemoryNotifier::new();
        let handle = notifier.clone();
        notifier.notify("Please add items", Severity::Warning);
        notifier.notify("Added", Severity::Success);

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.count(Severity::Warning), 1);
        assert_eq!(handle.last().unwrap().message, "Added");

        let drained = handle.take();
        assert_eq!(drained.len(), 2);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_severity_serde() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    }
}
