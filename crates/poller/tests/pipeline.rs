//! End-to-end poll cycle tests with in-memory status source and notifier.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use herald_common::error::{PipelineError, SchemaError};
use herald_engine::NO_NEW_STATUSES;
use herald_notifier::Notifier;
use herald_poller::client::StatusSource;
use herald_poller::poller::{CycleOutcome, LoopState, PollLoop};

const START_CURSOR: i64 = 500;
const PERIOD: Duration = Duration::from_secs(600);

// ============================================================
// Fakes
// ============================================================

/// Replays scripted responses and records the cursor of every fetch.
#[derive(Clone, Default)]
struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Result<Value, PipelineError>>>>,
    requested: Arc<Mutex<Vec<i64>>>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Value, PipelineError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            requested: Arc::default(),
        }
    }

    fn requested(&self) -> Vec<i64> {
        self.requested.lock().unwrap().clone()
    }
}

impl StatusSource for ScriptedSource {
    async fn fetch(&self, cursor: i64) -> Result<Value, PipelineError> {
        self.requested.lock().unwrap().push(cursor);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(PipelineError::Transport("script exhausted".into())))
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) {
        self.sent.lock().unwrap().push(message.to_string());
    }
}

fn response(items: Value, cursor: i64) -> Result<Value, PipelineError> {
    Ok(json!({ "homeworks": items, "current_date": cursor }))
}

fn setup(
    script: Vec<Result<Value, PipelineError>>,
) -> (
    PollLoop<ScriptedSource, RecordingNotifier>,
    ScriptedSource,
    RecordingNotifier,
) {
    let source = ScriptedSource::new(script);
    let notifier = RecordingNotifier::default();
    let poll_loop = PollLoop::new(source.clone(), notifier.clone(), PERIOD, START_CURSOR);
    (poll_loop, source, notifier)
}

const HW1_REVIEWING: &str =
    "Changed review status for \"HW1\". Work has been taken up for review.";

// ============================================================
// Single cycles
// ============================================================

#[tokio::test]
async fn test_first_status_is_sent_and_cursor_advances() {
    let (mut poll_loop, source, notifier) = setup(vec![response(
        json!([{"name": "HW1", "status": "reviewing"}]),
        1000,
    )]);
    assert_eq!(poll_loop.state(), LoopState::Starting);

    let outcome = poll_loop.run_cycle().await.unwrap();

    assert_eq!(outcome, CycleOutcome::Notified);
    assert_eq!(source.requested(), vec![START_CURSOR]);
    assert_eq!(poll_loop.cursor(), 1000);
    assert_eq!(notifier.sent(), vec![HW1_REVIEWING.to_string()]);
    assert_eq!(poll_loop.last_message(), HW1_REVIEWING);
}

#[tokio::test]
async fn test_repeated_status_not_resent() {
    let item = json!([{"homework_name": "HW1", "status": "reviewing"}]);
    let (mut poll_loop, source, notifier) =
        setup(vec![response(item.clone(), 1000), response(item, 1600)]);

    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Notified);
    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Unchanged);

    assert_eq!(source.requested(), vec![START_CURSOR, 1000]);
    assert_eq!(poll_loop.cursor(), 1600);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_keeps_cursor() {
    let (mut poll_loop, source, notifier) = setup(vec![
        Err(PipelineError::Transport("connection refused".into())),
        response(json!([{"name": "HW1", "status": "reviewing"}]), 1000),
    ]);

    let err = poll_loop.run_cycle().await.unwrap_err();
    assert!(matches!(err, PipelineError::Transport(_)));
    assert_eq!(poll_loop.cursor(), START_CURSOR);
    assert!(notifier.sent().is_empty());

    // Next cycle retries from the same cursor
    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Notified);
    assert_eq!(source.requested(), vec![START_CURSOR, START_CURSOR]);
    assert_eq!(poll_loop.cursor(), 1000);
}

#[tokio::test]
async fn test_schema_failure_keeps_cursor() {
    let (mut poll_loop, _, notifier) = setup(vec![Ok(json!({"homeworks": []}))]);

    let err = poll_loop.run_cycle().await.unwrap_err();
    assert_eq!(err, PipelineError::Schema(SchemaError::MissingCursor));
    assert_eq!(poll_loop.cursor(), START_CURSOR);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_domain_failure_after_cursor_read() {
    let (mut poll_loop, _, notifier) = setup(vec![response(
        json!([{"name": "HW1", "status": "lost"}]),
        1000,
    )]);

    let err = poll_loop.run_cycle().await.unwrap_err();
    assert_eq!(err, PipelineError::UndocumentedStatus("lost".into()));
    // Cursor was already read from a valid response
    assert_eq!(poll_loop.cursor(), 1000);
    assert!(notifier.sent().is_empty());
    assert_eq!(poll_loop.last_message(), "");
}

#[tokio::test]
async fn test_malformed_older_record_does_not_block_newest() {
    let (mut poll_loop, _, notifier) = setup(vec![response(
        json!([
            {"homework_name": "HW2", "status": "approved"},
            "garbage",
            {"homework_name": 3, "status": 9}
        ]),
        1000,
    )]);

    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Notified);
    assert_eq!(poll_loop.cursor(), 1000);
    assert_eq!(
        notifier.sent(),
        vec![
            "Changed review status for \"HW2\". Reviewed: the reviewer liked everything. Hooray!"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_non_string_status_is_undocumented() {
    let (mut poll_loop, _, notifier) = setup(vec![response(
        json!([{"homework_name": "HW1", "status": 5}]),
        1000,
    )]);

    let err = poll_loop.run_cycle().await.unwrap_err();
    assert_eq!(err, PipelineError::UndocumentedStatus("5".into()));
    assert_eq!(poll_loop.cursor(), 1000);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_no_new_statuses_sent_once() {
    let (mut poll_loop, _, notifier) = setup(vec![
        response(json!([]), 1000),
        response(json!([]), 1600),
        response(json!([{"name": "HW1", "status": "approved"}]), 2200),
    ]);

    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Notified);
    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Unchanged);
    assert_eq!(poll_loop.run_cycle().await.unwrap(), CycleOutcome::Notified);

    assert_eq!(
        notifier.sent(),
        vec![
            NO_NEW_STATUSES.to_string(),
            "Changed review status for \"HW1\". Reviewed: the reviewer liked everything. Hooray!"
                .to_string(),
        ]
    );
}

// ============================================================
// Full loop (paused clock)
// ============================================================

#[tokio::test(start_paused = true)]
async fn test_run_sleeps_fixed_period_between_cycles() {
    let item = json!([{"name": "HW1", "status": "reviewing"}]);
    let (mut poll_loop, source, notifier) = setup(vec![
        response(item.clone(), 1000),
        Err(PipelineError::HttpStatus { status: 502 }),
        response(item, 2000),
    ]);

    // Cycles at t=0, t=600 and t=1200; the timeout lands during the third sleep
    let result = tokio::time::timeout(Duration::from_secs(1500), poll_loop.run()).await;
    assert!(result.is_err(), "run() never returns on its own");

    assert_eq!(source.requested(), vec![START_CURSOR, 1000, 1000]);
    assert_eq!(notifier.sent(), vec![HW1_REVIEWING.to_string()]);
    assert_eq!(poll_loop.cursor(), 2000);
    assert_eq!(poll_loop.state(), LoopState::Sleeping);

    poll_loop.stop();
    assert_eq!(poll_loop.state(), LoopState::Stopped);
}
