//! User-facing status messages.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Danger,
}

/// A message for the host to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Severity::Danger, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// FIFO queue of pending notifications, drained by the host.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        log::debug!("notify {}", notification);
        self.queue.push_back(notification);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_order() {
        let mut notes = Notifications::default();
        notes.push(Notification::info("one"));
        notes.push(Notification::danger("two"));
        assert_eq!(notes.len(), 2);
        let drained = notes.drain();
        assert_eq!(drained[0].severity, Severity::Info);
        assert_eq!(drained[1].message, "two");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Notification::success("Saved").to_string(), "[success] Saved");
    }
}
