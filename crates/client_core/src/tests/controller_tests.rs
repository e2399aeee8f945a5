use super::*;

use std::{
    collections::VecDeque,
    env, fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use axum::http::StatusCode;
use shared::domain::{HealthStatus, SeverityColor};

use crate::{
    error::GENERIC_FAILURE_MESSAGE,
    interpret::{interpret, GaugeScale},
    tests::{spawn_stub, MONITOR_BODY},
    upload::CsvUpload,
    PredictionClient,
};

struct ScriptedService {
    calls: AtomicUsize,
    outcomes: Mutex<VecDeque<Result<PredictionResult, ClientError>>>,
}

impl ScriptedService {
    fn new(outcomes: Vec<Result<PredictionResult, ClientError>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionService for ScriptedService {
    async fn predict(&self, _upload: CsvUpload) -> Result<PredictionResult, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted outcome".into())))
    }
}

fn sample_result(rul: f64) -> PredictionResult {
    PredictionResult {
        rul,
        status: HealthStatus::Healthy,
        color: SeverityColor::Green,
        cycles_analyzed: 30,
        rows_received: 192,
        last_cycle: Some(192),
    }
}

fn temp_csv(name: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("rul_client_controller_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(name);
    fs::write(&path, "unit,cycle,s2\n1,1,641.82\n1,2,642.15\n").expect("write csv");
    path
}

fn cleanup(path: &std::path::Path) {
    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

fn assert_consistent(state: &SubmissionState) {
    match state.phase() {
        Phase::Idle | Phase::Submitting => {
            assert!(state.result().is_none());
            assert!(state.error_message().is_none());
        }
        Phase::Succeeded(_) => {
            assert!(state.result().is_some());
            assert!(state.error_message().is_none());
        }
        Phase::Failed(_) => {
            assert!(state.result().is_none());
            assert!(state.error_message().is_some());
        }
    }
}

#[test]
fn fresh_state_is_idle_and_cannot_submit() {
    let mut state = SubmissionState::new();

    assert_eq!(state.phase(), &Phase::Idle);
    assert!(state.selected_file().is_none());
    assert!(!state.can_submit());
    assert!(state.begin_submit().is_none());
    assert_eq!(state.phase(), &Phase::Idle);
    assert_consistent(&state);
}

#[test]
fn selecting_a_file_enables_submit_without_side_effects() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/engine_3.csv"));

    assert_eq!(state.phase(), &Phase::Idle);
    assert_eq!(
        state.selected_file().map(SelectedFile::display_name),
        Some("engine_3.csv")
    );
    assert!(state.can_submit());
    assert!(!state.has_outstanding_call());
}

#[test]
fn second_submit_while_submitting_is_ignored() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/engine_3.csv"));

    let ticket = state.begin_submit().expect("first submit accepted");
    assert_eq!(state.phase(), &Phase::Submitting);
    assert!(!state.can_submit());

    assert!(state.begin_submit().is_none());
    assert_eq!(state.phase(), &Phase::Submitting);
    assert_consistent(&state);

    assert_eq!(state.complete(ticket, Ok(sample_result(150.0))), Completion::Applied);
    assert!(state.can_submit());
}

#[test]
fn success_then_failure_never_keeps_both() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/engine_3.csv"));

    let ticket = state.begin_submit().expect("accepted");
    state.complete(ticket, Ok(sample_result(150.0)));
    assert_eq!(state.result().map(|r| r.rul), Some(150.0));
    assert_consistent(&state);

    let ticket = state.begin_submit().expect("resubmit accepted");
    assert!(state.result().is_none());
    state.complete(
        ticket,
        Err(ClientError::Server {
            status: 422,
            detail: Some("Need at least 30 rows, got 12".into()),
        }),
    );
    assert_eq!(state.error_message(), Some("Need at least 30 rows, got 12"));
    assert!(state.result().is_none());
    assert_consistent(&state);
}

#[test]
fn reselect_after_success_resets_to_idle() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/a.csv"));
    let ticket = state.begin_submit().expect("accepted");
    state.complete(ticket, Ok(sample_result(80.0)));
    assert!(matches!(state.phase(), Phase::Succeeded(_)));

    state.select_file(SelectedFile::new("/tmp/b.csv"));

    assert_eq!(state.phase(), &Phase::Idle);
    assert!(state.result().is_none());
    assert!(state.error_message().is_none());
}

#[test]
fn reselect_after_failure_resets_to_idle() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/a.csv"));
    let ticket = state.begin_submit().expect("accepted");
    state.complete(ticket, Err(ClientError::Transport("connection refused".into())));
    assert_eq!(state.error_message(), Some(GENERIC_FAILURE_MESSAGE));

    state.select_file(SelectedFile::new("/tmp/a.csv"));

    assert_eq!(state.phase(), &Phase::Idle);
    assert_consistent(&state);
}

#[test]
fn completion_after_reselect_is_discarded() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/a.csv"));
    let ticket = state.begin_submit().expect("accepted");

    state.select_file(SelectedFile::new("/tmp/b.csv"));
    assert_eq!(state.phase(), &Phase::Idle);
    assert!(!state.can_submit(), "call for a.csv is still outstanding");
    assert!(state.begin_submit().is_none());

    assert_eq!(state.complete(ticket, Ok(sample_result(12.0))), Completion::Stale);
    assert_eq!(state.phase(), &Phase::Idle);
    assert!(state.result().is_none());
    assert!(state.can_submit());

    let ticket = state.begin_submit().expect("b.csv accepted");
    assert_eq!(ticket.file().display_name(), "b.csv");
}

#[test]
fn foreign_ticket_is_ignored() {
    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new("/tmp/a.csv"));
    let ticket = state.begin_submit().expect("accepted");

    let forged = SubmissionTicket {
        request_id: ticket.request_id() + 7,
        selection_epoch: 1,
        file: SelectedFile::new("/tmp/a.csv"),
    };
    assert_eq!(state.complete(forged, Ok(sample_result(1.0))), Completion::Unknown);
    assert_eq!(state.phase(), &Phase::Submitting);

    assert_eq!(state.complete(ticket, Ok(sample_result(1.0))), Completion::Applied);
}

#[tokio::test]
async fn controller_submit_without_file_issues_no_call() {
    let mut controller = SubmissionController::new(ScriptedService::new(Vec::new()));

    assert!(!controller.submit().await);
    assert_eq!(controller.service().calls(), 0);
    assert_eq!(controller.state().phase(), &Phase::Idle);
}

#[tokio::test]
async fn controller_issues_exactly_one_call_per_submit() {
    let path = temp_csv("unit_1.csv");
    let mut controller =
        SubmissionController::new(ScriptedService::new(vec![Ok(sample_result(130.0))]));
    controller.select_file(SelectedFile::new(&path));

    assert!(controller.submit().await);

    assert_eq!(controller.service().calls(), 1);
    assert_eq!(controller.state().result().map(|r| r.rul), Some(130.0));
    assert!(!controller.state().has_outstanding_call());
    cleanup(&path);
}

#[tokio::test]
async fn unreadable_file_fails_without_calling_service() {
    let mut controller = SubmissionController::new(ScriptedService::new(Vec::new()));
    controller.select_file(SelectedFile::new(
        env::temp_dir().join("rul_client_no_such_dir").join("gone.csv"),
    ));

    assert!(controller.submit().await);

    assert_eq!(controller.service().calls(), 0);
    let message = controller.state().error_message().expect("failed");
    assert!(message.starts_with("Could not read gone.csv:"), "{message}");
}

#[tokio::test]
async fn end_to_end_success_renders_monitor_verdict() {
    let (server_url, stub) = spawn_stub(StatusCode::OK, MONITOR_BODY)
        .await
        .expect("spawn stub");
    let path = temp_csv("engine_45.csv");
    let mut controller =
        SubmissionController::new(PredictionClient::new(&server_url).expect("client"));
    controller.select_file(SelectedFile::new(&path));

    assert!(controller.submit().await);

    let result = controller.state().result().expect("succeeded").clone();
    let display = interpret(&result, GaugeScale::default());
    assert_eq!(display.gauge_fraction, 0.225);
    assert_eq!(display.severity_color_hex, "#f59e0b");
    assert_eq!(result.cycles_analyzed, 120);
    assert_eq!(result.rows_received, 121);
    assert_eq!(result.last_cycle, Some(120));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    cleanup(&path);
}

#[tokio::test]
async fn end_to_end_past_end_of_life_is_a_critical_verdict() {
    let body = r#"{"rul":-3.2,"status":"critical","color":"red","cycles_analyzed":30,"rows_received":215,"last_cycle":215}"#;
    let (server_url, _stub) = spawn_stub(StatusCode::OK, body)
        .await
        .expect("spawn stub");
    let path = temp_csv("engine_71.csv");
    let mut controller =
        SubmissionController::new(PredictionClient::new(&server_url).expect("client"));
    controller.select_file(SelectedFile::new(&path));

    assert!(controller.submit().await);

    let result = match controller.state().phase() {
        Phase::Succeeded(result) => result.clone(),
        other => panic!("expected a verdict, got {other:?}"),
    };
    assert_eq!(result.rul, -3.2);
    let display = interpret(&result, GaugeScale::default());
    assert_eq!(display.gauge_fraction, 0.0);
    assert_eq!(display.status_label, "CRITICAL");
    assert_eq!(display.severity_color_hex, "#ef4444");
    cleanup(&path);
}

#[tokio::test]
async fn end_to_end_failure_drops_previous_result() {
    let (ok_url, _ok_stub) = spawn_stub(StatusCode::OK, MONITOR_BODY)
        .await
        .expect("spawn ok stub");
    let (bad_url, _bad_stub) =
        spawn_stub(StatusCode::BAD_REQUEST, r#"{"detail":"unsupported format"}"#)
            .await
            .expect("spawn failing stub");
    let ok_client = PredictionClient::new(&ok_url).expect("client");
    let bad_client = PredictionClient::new(&bad_url).expect("client");
    let path = temp_csv("engine_8.csv");

    let mut state = SubmissionState::new();
    state.select_file(SelectedFile::new(&path));

    let ticket = state.begin_submit().expect("accepted");
    let outcome = ticket.execute(&ok_client).await;
    state.complete(ticket, outcome);
    assert!(state.result().is_some());

    let ticket = state.begin_submit().expect("accepted again");
    let outcome = ticket.execute(&bad_client).await;
    state.complete(ticket, outcome);

    assert_eq!(
        state.phase(),
        &Phase::Failed("unsupported format".to_string())
    );
    assert!(state.result().is_none());
    cleanup(&path);
}
