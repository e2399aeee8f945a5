//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{ClientError, PredictionClient, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                // Commands still arriving must complete so the UI never stays in Submitting.
                drain_without_backend(&cmd_rx, &ui_tx);
                return;
            }
        };

        let client = PredictionClient::from_settings(&settings);
        match &client {
            Ok(client) => {
                tracing::info!(server_url = client.server_url(), "backend worker ready");
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Ready - predictions go to {}",
                    client.server_url()
                )));
            }
            Err(err) => {
                tracing::error!(error = %err, "prediction client unavailable");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::BackendStartup,
                    err,
                )));
            }
        }

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                let ui_tx = ui_tx.clone();
                let client = client.clone();
                match cmd {
                    BackendCommand::Predict { ticket } => {
                        tokio::spawn(async move {
                            let outcome = match &client {
                                Ok(client) => ticket.execute(client).await,
                                Err(err) => Err(err.clone()),
                            };
                            deliver(ui_tx, UiEvent::PredictionFinished { ticket, outcome });
                        });
                    }
                    BackendCommand::CheckHealth => {
                        tokio::spawn(async move {
                            let outcome = match &client {
                                Ok(client) => client.health().await.map(|health| health.status),
                                Err(err) => Err(err.clone()),
                            };
                            deliver(ui_tx, UiEvent::HealthChecked(outcome));
                        });
                    }
                }
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}

/// Hands an event to the UI without parking a runtime worker on a full queue.
fn deliver(ui_tx: Sender<UiEvent>, event: UiEvent) {
    tokio::task::spawn_blocking(move || {
        if ui_tx.send(event).is_err() {
            tracing::debug!("ui event channel closed; dropping backend event");
        }
    });
}

fn drain_without_backend(cmd_rx: &Receiver<BackendCommand>, ui_tx: &Sender<UiEvent>) {
    while let Ok(cmd) = cmd_rx.recv() {
        let unavailable = ClientError::Transport("backend worker is not running".to_string());
        let event = match cmd {
            BackendCommand::Predict { ticket } => UiEvent::PredictionFinished {
                ticket,
                outcome: Err(unavailable),
            },
            BackendCommand::CheckHealth => UiEvent::HealthChecked(Err(unavailable)),
        };
        let _ = ui_tx.send(event);
    }
}
