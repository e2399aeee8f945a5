//! Submission lifecycle: `Idle -> Submitting -> {Succeeded | Failed}`, and any
//! phase back to `Idle` when a new file is selected.
//!
//! [`SubmissionState`] is a plain owned value with synchronous transitions so
//! front ends can keep it on their own thread and hand the outbound call to
//! whatever executor they have. [`SubmissionController`] drives the same
//! transitions end to end for callers that can simply await.

use shared::protocol::PredictionResult;
use tracing::{debug, info, warn};

use crate::{error::ClientError, upload::SelectedFile, PredictionService};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded(PredictionResult),
    Failed(String),
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Proof that a submission was accepted. Consumed by
/// [`SubmissionState::complete`], so each accepted submission completes once.
#[derive(Debug)]
pub struct SubmissionTicket {
    request_id: u64,
    selection_epoch: u64,
    file: SelectedFile,
}

impl SubmissionTicket {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    /// Reads the selected file and performs the single outbound call.
    pub async fn execute<S>(&self, service: &S) -> Result<PredictionResult, ClientError>
    where
        S: PredictionService + ?Sized,
    {
        let upload = self.file.read().await?;
        service.predict(upload).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The file was re-selected while the call was in flight.
    Stale,
    /// The ticket does not belong to the outstanding call.
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    selected_file: Option<SelectedFile>,
    phase: Phase,
    selection_epoch: u64,
    next_request_id: u64,
    outstanding: Option<u64>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn has_outstanding_call(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Whether a predict trigger should be enabled right now.
    pub fn can_submit(&self) -> bool {
        self.selected_file.is_some()
            && self.outstanding.is_none()
            && self.phase != Phase::Submitting
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        if self.outstanding.is_some() {
            debug!(file = file.display_name(), "file re-selected while a call is in flight");
        }
        self.selected_file = Some(file);
        self.selection_epoch = self.selection_epoch.wrapping_add(1);
        self.phase = Phase::Idle;
    }

    /// Moves to `Submitting` and returns the ticket for the outbound call, or
    /// `None` when no file is selected or a call is already outstanding.
    pub fn begin_submit(&mut self) -> Option<SubmissionTicket> {
        if !self.can_submit() {
            debug!(phase = self.phase.label(), "submit ignored");
            return None;
        }
        let file = self.selected_file.clone()?;

        self.next_request_id = self.next_request_id.wrapping_add(1);
        let request_id = self.next_request_id;
        self.outstanding = Some(request_id);
        self.phase = Phase::Submitting;
        info!(request_id, file = file.display_name(), "prediction submitted");

        Some(SubmissionTicket {
            request_id,
            selection_epoch: self.selection_epoch,
            file,
        })
    }

    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, ClientError>,
    ) -> Completion {
        if self.outstanding != Some(ticket.request_id) {
            warn!(request_id = ticket.request_id, "completion for unknown request ignored");
            return Completion::Unknown;
        }
        self.outstanding = None;

        if ticket.selection_epoch != self.selection_epoch {
            debug!(request_id = ticket.request_id, "discarding result for a replaced file");
            return Completion::Stale;
        }

        self.phase = match outcome {
            Ok(result) => {
                info!(
                    request_id = ticket.request_id,
                    rul = result.rul,
                    status = result.status.as_str(),
                    "prediction succeeded"
                );
                Phase::Succeeded(result)
            }
            Err(err) => {
                warn!(
                    request_id = ticket.request_id,
                    category = ?err.category(),
                    error = %err,
                    "prediction failed"
                );
                Phase::Failed(err.user_message())
            }
        };
        Completion::Applied
    }
}

pub struct SubmissionController<S> {
    service: S,
    state: SubmissionState,
}

impl<S: PredictionService> SubmissionController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: SubmissionState::new(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.state.select_file(file);
    }

    /// Runs one submission to completion. Returns `false` when the submit was
    /// not accepted (no file selected).
    pub async fn submit(&mut self) -> bool {
        let Some(ticket) = self.state.begin_submit() else {
            return false;
        };
        let outcome = ticket.execute(&self.service).await;
        self.state.complete(ticket, outcome);
        true
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
