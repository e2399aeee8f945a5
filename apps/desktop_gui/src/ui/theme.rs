use client_core::interpret::hex_to_rgb;
use eframe::egui::Color32;

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0x1f, 0x29, 0x37);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);
pub const SURFACE: Color32 = Color32::from_rgb(0xf9, 0xfa, 0xfb);
pub const GAUGE_TRACK: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);
pub const ACCENT: Color32 = Color32::from_rgb(0x66, 0x7e, 0xea);
pub const ERROR_FILL: Color32 = Color32::from_rgb(0xfe, 0xe2, 0xe2);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(0x99, 0x1b, 0x1b);

/// Interpreter colors are fixed `#rrggbb` literals; gray only guards a typo.
pub fn color_from_hex(hex: &str) -> Color32 {
    hex_to_rgb(hex)
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
        .unwrap_or(Color32::GRAY)
}
