//! Plain-text rendering of a verdict for terminal output.

use client_core::DisplayAttributes;
use shared::protocol::PredictionResult;

const GAUGE_WIDTH: usize = 40;

pub fn render(result: &PredictionResult, display: &DisplayAttributes) -> String {
    let mut lines = vec![
        format!(
            "{} {}  ({})",
            display.status_icon.glyph(),
            display.status_label,
            display.severity_color_hex
        ),
        format!("{} cycles remaining", result.rul),
        format!(
            "{} {:>3}%",
            gauge_bar(display.gauge_fraction),
            (display.gauge_fraction * 100.0).round() as u32
        ),
        String::new(),
        format!("Cycles analyzed: {}", result.cycles_analyzed),
        format!("Total rows:      {}", result.rows_received),
    ];
    if let Some(last_cycle) = result.last_cycle {
        lines.push(format!("Last cycle:      {last_cycle}"));
    }
    lines.join("\n")
}

fn gauge_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}
