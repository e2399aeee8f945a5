//! Backend commands queued from UI to backend worker.

use client_core::SubmissionTicket;

pub enum BackendCommand {
    Predict { ticket: SubmissionTicket },
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Predict { .. } => "predict",
            Self::CheckHealth => "check_health",
        }
    }
}
