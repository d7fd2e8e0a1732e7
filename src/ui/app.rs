// Main Window
// Drop target + file picker. Analyses run synchronously on the UI thread.

use std::path::{Path, PathBuf};

use eframe::egui;
use egui::{Color32, RichText, Sense, Stroke};
use tracing::info;

use super::state::{StatusKind, ViewState};
use super::{ACCENT_GREEN, BACKGROUND, ERROR_RED, FOREGROUND, MUTED_GRAY, SUCCESS_GREEN};
use crate::models::{DocumentFormat, Verdict};
use crate::services::{analyze_file, Classifier};

pub const WINDOW_TITLE: &str = "AuthentiAI - Classificatore Testo";

pub struct AuthentiApp {
    classifier: Classifier,
    view: ViewState,
}

impl AuthentiApp {
    pub fn new(cc: &eframe::CreationContext<'_>, classifier: Classifier) -> Self {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = BACKGROUND;
        visuals.window_fill = BACKGROUND;
        visuals.override_text_color = Some(FOREGROUND);
        cc.egui_ctx.set_visuals(visuals);

        Self {
            classifier,
            view: ViewState::new(),
        }
    }

    fn analyze(&mut self, path: &Path) {
        info!(path = %path.display(), "analysis.requested");
        let outcome = analyze_file(path, &self.classifier);
        self.view.apply(path, outcome);
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("File di testo", &DocumentFormat::EXTENSIONS)
            .pick_file()
        {
            self.analyze(&path);
        }
    }

    /// First dropped path that is a regular file, if any.
    fn take_dropped_file(ctx: &egui::Context) -> Option<PathBuf> {
        ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .find(|p| p.is_file())
        })
    }

    fn draw_header(&mut self, ui: &mut egui::Ui, hovering: bool) {
        ui.add_space(20.0);
        ui.label(RichText::new("AuthentiAI").size(32.0).strong().color(FOREGROUND));
        ui.add_space(10.0);

        let hint = RichText::new(
            "Trascina qui un file (.txt, .docx, .pdf, .pages)\noppure seleziona manualmente",
        )
        .size(14.0);
        if hovering {
            egui::Frame::none()
                .stroke(Stroke::new(2.0, ACCENT_GREEN))
                .inner_margin(egui::Margin::same(8.0))
                .rounding(egui::Rounding::same(6.0))
                .show(ui, |ui| {
                    ui.label(hint);
                });
        } else {
            ui.label(hint);
        }
        ui.add_space(10.0);

        let button = egui::Button::new(RichText::new("📂 Apri file").size(14.0).color(Color32::WHITE))
            .fill(ACCENT_GREEN);
        if ui.add(button).clicked() {
            self.open_dialog();
        }
        ui.add_space(10.0);
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        let color = match self.view.status.kind {
            StatusKind::Idle => MUTED_GRAY,
            StatusKind::Loaded => SUCCESS_GREEN,
            StatusKind::Failed => ERROR_RED,
        };
        ui.label(RichText::new(&self.view.status.text).size(12.0).color(color));
    }

    fn draw_result(&self, ui: &mut egui::Ui) {
        let Some(result) = &self.view.result else {
            return;
        };
        let color = verdict_color(result.verdict);

        ui.add_space(30.0);
        ui.label(RichText::new(&result.human_line).size(16.0));
        ui.add_space(5.0);
        ui.label(RichText::new(&result.ai_line).size(16.0));
        ui.add_space(10.0);

        let (rect, _) = ui.allocate_exact_size(egui::vec2(40.0, 40.0), Sense::hover());
        ui.painter().circle_filled(rect.center(), 15.0, color);

        ui.add_space(10.0);
        ui.label(RichText::new(&result.conclusion_line).size(20.0).strong().color(color));
    }
}

fn verdict_color(verdict: Verdict) -> Color32 {
    let [r, g, b] = verdict.rgb();
    Color32::from_rgb(r, g, b)
}

impl eframe::App for AuthentiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = Self::take_dropped_file(ctx) {
            self.analyze(&path);
        }
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND).inner_margin(egui::Margin::same(10.0)))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    self.draw_header(ui, hovering);
                    self.draw_status(ui);
                    self.draw_result(ui);
                });
            });
    }
}
