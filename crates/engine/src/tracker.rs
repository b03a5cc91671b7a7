//! Change tracker — suppresses repeat notifications of the same message.
//!
//! State is held in-memory and resets with the process, so the first message
//! after a restart is always announced.

/// Remembers the last message handed to the notifier.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last: String,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` and report whether it differs from the previous one.
    ///
    /// The stored value is replaced even when delivery later fails.
    pub fn has_changed(&mut self, message: &str) -> bool {
        let changed = self.last != message;
        if changed {
            self.last = message.to_string();
        }
        changed
    }

    /// The most recently recorded message (empty before the first call).
    pub fn last(&self) -> &str {
        &self.last
    }
}
