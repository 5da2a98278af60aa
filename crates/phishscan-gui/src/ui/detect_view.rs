//! Main panel: URL entry, verdict, extracted features, batch progress and
//! session history.

use eframe::egui;

use phishscan_core::Outcome;

use crate::app::{DetectorApp, LoadState};
use crate::ui::theme;

pub fn draw_detect_view(ctx: &egui::Context, app: &mut DetectorApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(12.0);
        ui.heading("Phishing Website Detector");
        ui.add_space(8.0);

        draw_input(ui, app);
        ui.add_space(12.0);

        if let Some(outcome) = &app.outcome {
            draw_outcome(ui, outcome);
            ui.add_space(8.0);
        }

        if let Some(features) = &app.features {
            egui::CollapsingHeader::new(format!("Extracted features ({})", features.len()))
                .default_open(false)
                .show(ui, |ui| {
                    egui::Grid::new("features_grid")
                        .striped(true)
                        .spacing([24.0, 4.0])
                        .show(ui, |ui| {
                            for (name, value) in features.iter() {
                                ui.monospace(name);
                                ui.monospace(format!("{value}"));
                                ui.end_row();
                            }
                        });
                });
        }

        if app.batch.is_some() {
            ui.separator();
            draw_progress(ui, app);
        }

        if !app.history.is_empty() {
            ui.separator();
            draw_history(ui, app);
        }
    });
}

fn draw_input(ui: &mut egui::Ui, app: &mut DetectorApp) {
    let ready = app.load_state == LoadState::Ready;

    ui.label("Enter Website URL:");
    let mut submitted = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.url_input).hint_text("https://example.com/login"),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
        }
        if ui.add_enabled(ready, egui::Button::new("Detect")).clicked() {
            submitted = true;
        }
    });

    if !ready {
        ui.small("Load a model to enable detection.");
    }
    if submitted && ready {
        app.detect();
    }
}

fn draw_outcome(ui: &mut egui::Ui, outcome: &Outcome) {
    ui.label(
        egui::RichText::new(outcome.to_string())
            .color(theme::outcome_color(outcome))
            .size(20.0)
            .strong(),
    );
}

fn draw_progress(ui: &mut egui::Ui, app: &DetectorApp) {
    let Some((checked, total, phishing, errors)) = app.batch_counts() else {
        return;
    };
    let fraction = if total > 0 {
        checked as f32 / total as f32
    } else {
        0.0
    };

    ui.strong("Checking URL list");
    ui.add(
        egui::ProgressBar::new(fraction)
            .text(format!("{checked} / {total} URLs checked"))
            .animate(true),
    );
    ui.horizontal(|ui| {
        ui.colored_label(theme::COLOR_PHISHING, format!("Phishing: {phishing}"));
        ui.label(" | ");
        ui.colored_label(theme::COLOR_WARNING, format!("Errors: {errors}"));
    });
}

fn draw_history(ui: &mut egui::Ui, app: &mut DetectorApp) {
    ui.horizontal(|ui| {
        ui.strong("History");
        ui.label("Filter:");
        ui.text_edit_singleline(&mut app.filter_text);
        if ui.small_button("Clear").clicked() {
            app.clear_history();
        }
    });
    ui.add_space(4.0);

    let filter = app.filter_text.to_lowercase();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            egui::Grid::new("history_grid")
                .striped(true)
                .min_col_width(60.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.strong("URL");
                    ui.strong("Confidence");
                    ui.strong("Status");
                    ui.end_row();

                    for result in app.history.iter().rev() {
                        if !filter.is_empty() && !result.url.to_lowercase().contains(&filter) {
                            continue;
                        }

                        ui.monospace(&result.url);
                        match result.confidence {
                            Some(c) => ui.monospace(format!("{:.2}%", c * 100.0)),
                            None => ui.label("-"),
                        };
                        let (status, color) = theme::result_status(result);
                        let status = ui.colored_label(color, status);
                        if let Some(err) = &result.error {
                            status.on_hover_text(err);
                        }
                        ui.end_row();
                    }
                });
        });

    let phishing = app.history.iter().filter(|r| r.is_phishing()).count();
    let errors = app.history.iter().filter(|r| r.is_error()).count();
    let legit = app.history.len() - phishing - errors;
    ui.horizontal(|ui| {
        ui.label(format!("Total: {}", app.history.len()));
        ui.label(" | ");
        ui.colored_label(theme::COLOR_PHISHING, format!("Phishing: {phishing}"));
        ui.label(" | ");
        ui.colored_label(theme::COLOR_LEGIT, format!("Legitimate: {legit}"));
        ui.label(" | ");
        ui.colored_label(theme::COLOR_WARNING, format!("Errors: {errors}"));
        if let Some(dur) = app.batch_duration {
            ui.label(" | ");
            ui.label(format!("Last list: {dur:.1}s"));
        }
    });
}
