//! Bridge from the UI thread to the async prediction client.

pub mod commands;
pub mod runtime;
