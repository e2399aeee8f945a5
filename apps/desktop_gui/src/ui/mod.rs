//! UI layer for desktop GUI: app shell and theme colors.

pub mod app;
pub mod theme;

pub use app::PredictorApp;
