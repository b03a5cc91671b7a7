use std::time::Duration;

use herald_common::error::PipelineError;
use herald_engine::{ChangeTracker, ResponseValidator, StatusInterpreter};
use herald_notifier::Notifier;

use crate::client::StatusSource;

/// Lifecycle of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Polling,
    Sleeping,
    Stopped,
}

/// What a successful cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The message differed from the previous one and was handed to the notifier.
    Notified,
    /// Same message as last cycle; nothing was sent.
    Unchanged,
}

/// Polls the status source on a fixed period and announces changes.
///
/// Owns all mutable watcher state (poll cursor and last sent message), so
/// independent loops never share anything.
pub struct PollLoop<S, N> {
    source: S,
    notifier: N,
    interpreter: StatusInterpreter,
    tracker: ChangeTracker,
    cursor: i64,
    period: Duration,
    state: LoopState,
}

impl<S, N> PollLoop<S, N>
where
    S: StatusSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, period: Duration, start_cursor: i64) -> Self {
        Self {
            source,
            notifier,
            interpreter: StatusInterpreter::new(),
            tracker: ChangeTracker::new(),
            cursor: start_cursor,
            period,
            state: LoopState::Starting,
        }
    }

    /// Lower bound of the next poll window.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Last message recorded by the change tracker.
    pub fn last_message(&self) -> &str {
        self.tracker.last()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Mark the loop as stopped after an external interruption.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        tracing::info!(cursor = self.cursor, "Review watcher stopped");
    }

    /// Start the polling loop. Runs indefinitely until the future is dropped.
    pub async fn run(&mut self) {
        tracing::info!(
            cursor = self.cursor,
            period_secs = self.period.as_secs(),
            "Review watcher started"
        );

        loop {
            self.state = LoopState::Polling;
            // Failures are already logged inside the cycle
            let _ = self.run_cycle().await;

            self.state = LoopState::Sleeping;
            tokio::time::sleep(self.period).await;
        }
    }

    /// Run one cycle, logging any failure. State is left consistent either way.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, PipelineError> {
        let result = self.poll_once().await;
        if let Err(e) = &result {
            tracing::error!(
                error = %e,
                upstream = e.is_upstream(),
                cursor = self.cursor,
                "Poll cycle failed"
            );
        }
        result
    }

    /// Fetch, validate, advance the cursor, render, and notify on change.
    async fn poll_once(&mut self) -> Result<CycleOutcome, PipelineError> {
        let payload = self.source.fetch(self.cursor).await?;
        let response = ResponseValidator::validate(&payload)?;

        self.cursor = response.cursor;

        let message = self.interpreter.render(&response.items)?;
        tracing::debug!(message = %message, "Rendered status message");

        if !self.tracker.has_changed(&message) {
            tracing::debug!("Status unchanged, nothing to send");
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send(&message).await;
        Ok(CycleOutcome::Notified)
    }
}
