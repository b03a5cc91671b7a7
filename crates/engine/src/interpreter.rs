//! Status interpreter — turns the newest tracked item into the chat message.
//!
//! Only the first record of a response is considered. The API returns items
//! most-recent-first, and one cycle announces at most one status change; the
//! remaining records are ignored on purpose.

use std::collections::HashMap;

use serde_json::Value;

use herald_common::error::PipelineError;
use herald_common::types::{ReviewStatus, TrackedItem};

/// Message produced when the response carries no items.
pub const NO_NEW_STATUSES: &str = "no new statuses";

/// How many records from the head of the response one cycle looks at.
pub const RECORDS_PER_CYCLE: usize = 1;

/// Maps tracked items to human-readable verdict messages.
pub struct StatusInterpreter {
    verdicts: HashMap<ReviewStatus, String>,
}

impl StatusInterpreter {
    pub fn new() -> Self {
        Self {
            verdicts: ReviewStatus::ALL
                .into_iter()
                .map(|s| (s, s.verdict().to_string()))
                .collect(),
        }
    }

    /// Build an interpreter over a custom verdict table.
    pub fn with_verdicts(verdicts: HashMap<ReviewStatus, String>) -> Self {
        Self { verdicts }
    }

    /// Render the message for a validated item list.
    ///
    /// Records past the newest are never inspected, so a malformed older
    /// record cannot fail the cycle.
    pub fn render(&self, items: &[Value]) -> Result<String, PipelineError> {
        let Some(newest) = items.iter().take(RECORDS_PER_CYCLE).next() else {
            return Ok(NO_NEW_STATUSES.to_string());
        };

        if items.len() > RECORDS_PER_CYCLE {
            tracing::debug!(
                ignored = items.len() - RECORDS_PER_CYCLE,
                "Only the newest record is announced"
            );
        }

        self.render_item(&TrackedItem::from_value(newest))
    }

    fn render_item(&self, item: &TrackedItem) -> Result<String, PipelineError> {
        let name = item.name.as_deref().ok_or(PipelineError::MissingName)?;
        let raw_status = item.status.as_deref().unwrap_or_default();

        let verdict = ReviewStatus::parse(raw_status)
            .and_then(|status| self.verdicts.get(&status))
            .ok_or_else(|| PipelineError::UndocumentedStatus(raw_status.to_string()))?;

        if verdict.trim().is_empty() {
            return Err(PipelineError::EmptyStatus(raw_status.to_string()));
        }

        let message = format!("Changed review status for \"{name}\". {verdict}");
        ensure_contains_verdict(&message, verdict, raw_status)?;

        Ok(message)
    }
}

impl Default for StatusInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// The rendered message must carry the looked-up verdict verbatim.
fn ensure_contains_verdict(message: &str, verdict: &str, status: &str) -> Result<(), PipelineError> {
    if message.contains(verdict) {
        Ok(())
    } else {
        Err(PipelineError::RenderMismatch {
            status: status.to_string(),
        })
    }
}
