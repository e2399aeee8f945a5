//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{ClientError, SubmissionState};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. A command that could not be queued is
/// handed back so the caller can unwind any state it already changed.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Option<BackendCommand> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            None
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "UI command queue is full; please retry".to_string();
            Some(cmd)
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status =
                "Backend worker disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            Some(cmd)
        }
    }
}

/// Handles the predict action: begins a submission and queues the single
/// outbound call. Returns `true` if a call was queued.
pub fn request_prediction(
    state: &mut SubmissionState,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) -> bool {
    let Some(ticket) = state.begin_submit() else {
        return false;
    };
    *status = format!("Analyzing {}...", ticket.file().display_name());

    match dispatch_backend_command(cmd_tx, BackendCommand::Predict { ticket }, status) {
        None => true,
        Some(BackendCommand::Predict { ticket }) => {
            state.complete(
                ticket,
                Err(ClientError::Transport("backend command queue unavailable".into())),
            );
            false
        }
        Some(BackendCommand::CheckHealth) => false,
    }
}
