use std::time::Duration;

use client_core::{
    interpret, Completion, DisplayAttributes, GaugeScale, Phase, SelectedFile, Settings,
    SubmissionState,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::protocol::PredictionResult;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, request_prediction};
use crate::ui::theme;

pub struct PredictorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: SubmissionState,
    gauge_scale: GaugeScale,
    server_url: String,
    status: String,
    status_banner: Option<UiError>,
}

impl PredictorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &Settings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: SubmissionState::new(),
            gauge_scale: settings.gauge_scale(),
            server_url: settings.server_url.clone(),
            status: "Backend worker starting...".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status = err.message().to_string();
                    self.status_banner = Some(err);
                }
                UiEvent::PredictionFinished { ticket, outcome } => {
                    let completion = self.state.complete(ticket, outcome);
                    self.status = match (completion, self.state.phase()) {
                        (Completion::Applied, Phase::Succeeded(result)) => {
                            format!("Prediction complete: {} cycles remaining", result.rul)
                        }
                        (Completion::Applied, Phase::Failed(_)) => "Prediction failed".to_string(),
                        (Completion::Stale, _) => {
                            "Discarded a result for a file that was replaced".to_string()
                        }
                        _ => self.status.clone(),
                    };
                }
                UiEvent::HealthChecked(Ok(service_status)) => {
                    self.status = format!("Service at {} is {service_status}", self.server_url);
                    self.status_banner = None;
                }
                UiEvent::HealthChecked(Err(err)) => {
                    let err = UiError::from_client_error(UiErrorContext::HealthCheck, &err);
                    self.status = err.message().to_string();
                    self.status_banner = Some(err);
                }
            }
        }
    }

    fn select_file(&mut self, file: SelectedFile) {
        tracing::info!(file = file.display_name(), "sensor log selected");
        self.status = format!("Selected {}", file.display_name());
        self.state.select_file(file);
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV sensor log", &["csv"])
            .pick_file()
        {
            self.select_file(SelectedFile::new(path));
        }
    }

    fn predict(&mut self) {
        request_prediction(&mut self.state, &self.cmd_tx, &mut self.status);
    }

    /// A replaced file keeps the spinner until its stale reply lands.
    fn awaiting_prediction(&self) -> bool {
        self.state.has_outstanding_call()
    }

    fn check_health(&mut self) {
        self.status = format!("Checking {}...", self.server_url);
        dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckHealth, &mut self.status);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}: {}",
                            err_label(banner.category()),
                            banner.message()
                        ))
                        .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(12.0);
    }

    fn show_upload_section(&mut self, ui: &mut egui::Ui) {
        let file_label = self
            .state
            .selected_file()
            .map(|file| format!("📄 {}", file.display_name()))
            .unwrap_or_else(|| "📂 Choose CSV File".to_string());

        let picker = egui::Button::new(egui::RichText::new(file_label).size(16.0))
            .fill(theme::SURFACE)
            .min_size(egui::vec2(ui.available_width(), 56.0));
        if ui.add(picker).clicked() {
            self.pick_file();
        }
        ui.add_space(12.0);

        let submitting = self.awaiting_prediction();
        let label = if submitting { "Analyzing..." } else { "Predict RUL" };
        let button = egui::Button::new(
            egui::RichText::new(label)
                .size(16.0)
                .strong()
                .color(egui::Color32::WHITE),
        )
        .fill(theme::ACCENT)
        .min_size(egui::vec2(ui.available_width(), 44.0));

        if ui.add_enabled(self.state.can_submit(), button).clicked() {
            self.predict();
        }
        if submitting {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new("Waiting for the prediction service").color(theme::TEXT_MUTED));
            });
        }
        ui.add_space(24.0);
    }

    fn show_error_box(&self, ui: &mut egui::Ui) {
        let Some(message) = self.state.error_message() else {
            return;
        };
        egui::Frame::NONE
            .fill(theme::ERROR_FILL)
            .stroke(egui::Stroke::new(1.0, theme::ERROR_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(format!("⛔ {message}"))
                        .color(theme::ERROR_TEXT),
                );
            });
        ui.add_space(24.0);
    }

    fn show_card(&mut self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("Remaining Useful Life Predictor")
                .size(30.0)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            egui::RichText::new("Upload sensor data to estimate remaining operating cycles")
                .color(theme::TEXT_MUTED),
        );
        ui.add_space(24.0);

        self.show_status_banner(ui);
        self.show_upload_section(ui);
        self.show_error_box(ui);

        if let Some(result) = self.state.result() {
            let display = interpret(result, self.gauge_scale);
            render_result(ui, result, &display);
        }
    }
}

fn render_result(ui: &mut egui::Ui, result: &PredictionResult, display: &DisplayAttributes) {
    let severity = theme::color_from_hex(display.severity_color_hex);

    egui::Frame::NONE
        .fill(theme::color_from_hex(display.severity_background_hex))
        .stroke(egui::Stroke::new(3.0, severity))
        .corner_radius(12.0)
        .inner_margin(egui::Margin::same(24))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(display.status_icon.glyph())
                        .size(28.0)
                        .color(theme::color_from_hex(display.status_icon.tint_hex())),
                );
                ui.label(
                    egui::RichText::new(display.status_label)
                        .size(18.0)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                );
            });
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(result.rul.to_string())
                        .size(48.0)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                );
                ui.label(
                    egui::RichText::new("CYCLES REMAINING")
                        .size(14.0)
                        .color(theme::TEXT_MUTED),
                );
            });
            ui.add_space(12.0);
            ui.visuals_mut().extreme_bg_color = theme::GAUGE_TRACK;
            ui.add(
                egui::ProgressBar::new(display.gauge_fraction as f32)
                    .fill(severity)
                    .desired_width(ui.available_width()),
            );
        });
    ui.add_space(24.0);

    egui::Grid::new("prediction_info")
        .num_columns(3)
        .spacing([32.0, 6.0])
        .show(ui, |ui| {
            info_label(ui, "CYCLES ANALYZED");
            info_label(ui, "TOTAL ROWS");
            if result.last_cycle.is_some() {
                info_label(ui, "LAST CYCLE");
            }
            ui.end_row();

            info_value(ui, result.cycles_analyzed.to_string());
            info_value(ui, result.rows_received.to_string());
            if let Some(last_cycle) = result.last_cycle {
                info_value(ui, last_cycle.to_string());
            }
            ui.end_row();
        });
}

fn info_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(12.0).color(theme::TEXT_MUTED));
}

fn info_value(ui: &mut egui::Ui, text: String) {
    ui.label(
        egui::RichText::new(text)
            .size(24.0)
            .strong()
            .color(theme::TEXT_PRIMARY),
    );
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status).color(theme::TEXT_MUTED));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Check service").clicked() {
                        self.check_health();
                    }
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::WHITE).inner_margin(egui::Margin::same(40)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.set_max_width(600.0);
                    self.show_card(ui);
                });
            });

        if self.awaiting_prediction() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
