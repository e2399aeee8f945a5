//! Maps a prediction onto display attributes: severity colors, status icon
//! and label, gauge fill.

use shared::{
    domain::{HealthStatus, SeverityColor},
    protocol::PredictionResult,
};

pub const DEFAULT_GAUGE_CEILING: f64 = 200.0;

/// Normalization used for the RUL gauge. Purely visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeScale {
    ceiling: f64,
}

impl GaugeScale {
    /// Returns `None` unless `ceiling` is finite and positive.
    pub fn new(ceiling: f64) -> Option<Self> {
        (ceiling.is_finite() && ceiling > 0.0).then_some(Self { ceiling })
    }

    pub fn ceiling(self) -> f64 {
        self.ceiling
    }

    pub fn fraction(self, rul: f64) -> f64 {
        (rul / self.ceiling).clamp(0.0, 1.0)
    }
}

impl Default for GaugeScale {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_GAUGE_CEILING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    CheckCircle,
    AlertTriangle,
    AlertCircle,
}

impl StatusIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::CheckCircle => "✔",
            Self::AlertTriangle => "⚠",
            Self::AlertCircle => "⛔",
        }
    }

    pub fn tint_hex(self) -> &'static str {
        match self {
            Self::CheckCircle => severity_color_hex(SeverityColor::Green),
            Self::AlertTriangle => severity_color_hex(SeverityColor::Yellow),
            Self::AlertCircle => severity_color_hex(SeverityColor::Red),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayAttributes {
    pub severity_color_hex: &'static str,
    pub severity_background_hex: &'static str,
    pub status_icon: StatusIcon,
    pub status_label: &'static str,
    pub gauge_fraction: f64,
}

pub fn severity_color_hex(color: SeverityColor) -> &'static str {
    match color {
        SeverityColor::Green => "#10b981",
        SeverityColor::Yellow => "#f59e0b",
        SeverityColor::Red => "#ef4444",
    }
}

pub fn severity_background_hex(color: SeverityColor) -> &'static str {
    match color {
        SeverityColor::Green => "#d1fae5",
        SeverityColor::Yellow => "#fef3c7",
        SeverityColor::Red => "#fee2e2",
    }
}

pub fn status_icon(status: HealthStatus) -> StatusIcon {
    match status {
        HealthStatus::Healthy => StatusIcon::CheckCircle,
        HealthStatus::Monitor => StatusIcon::AlertTriangle,
        HealthStatus::Critical => StatusIcon::AlertCircle,
    }
}

pub fn status_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "HEALTHY",
        HealthStatus::Monitor => "MONITOR",
        HealthStatus::Critical => "CRITICAL",
    }
}

/// `status` and `color` are read independently; neither is derived from the
/// other.
pub fn interpret(result: &PredictionResult, scale: GaugeScale) -> DisplayAttributes {
    DisplayAttributes {
        severity_color_hex: severity_color_hex(result.color),
        severity_background_hex: severity_background_hex(result.color),
        status_icon: status_icon(result.status),
        status_label: status_label(result.status),
        gauge_fraction: scale.fraction(result.rul),
    }
}

/// Parses `#rrggbb`.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
