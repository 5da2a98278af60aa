//! Left panel: model/config file pickers, load button and URL list checks.

use eframe::egui;

use crate::app::{DetectorApp, LoadState};
use crate::ui::theme;

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| "?".into())
}

pub fn draw_sidebar(ctx: &egui::Context, app: &mut DetectorApp) {
    egui::SidePanel::left("sidebar")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.heading("PHISHSCAN");
                ui.label(concat!("v", env!("CARGO_PKG_VERSION")));
                ui.separator();

                let loading = app.load_state == LoadState::Loading;
                let batch_running = app.batch.is_some();

                ui.add_enabled_ui(!loading && !batch_running, |ui| {
                    ui.label("MODEL");
                    if ui.button("Select Model...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("ONNX Model", &["onnx"])
                            .pick_file()
                        {
                            app.model_path = path;
                        }
                    }
                    ui.small(file_label(&app.model_path))
                        .on_hover_text(app.model_path.display().to_string());
                    ui.add_space(4.0);

                    ui.label("CONFIG");
                    ui.horizontal(|ui| {
                        if ui.button("Select Config...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .pick_file()
                            {
                                app.config_path = Some(path);
                            }
                        }
                        if app.config_path.is_some() && ui.small_button("x").clicked() {
                            app.config_path = None;
                        }
                    });
                    match &app.config_path {
                        Some(p) => ui.small(file_label(p)),
                        None => ui.small("defaults"),
                    };
                });

                ui.add_space(8.0);

                let can_load = !loading && !batch_running && app.needs_load();
                ui.add_enabled_ui(can_load, |ui| {
                    if ui
                        .add_sized([ui.available_width(), 32.0], egui::Button::new("LOAD MODEL"))
                        .clicked()
                    {
                        app.start_load();
                    }
                });

                ui.add_space(4.0);
                match app.load_state {
                    LoadState::NotLoaded => {
                        ui.label("No model loaded");
                    }
                    LoadState::Loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading model...");
                        });
                    }
                    LoadState::Ready => {
                        let msg = match app.load_duration {
                            Some(dur) => format!("Model ready ({dur:.1}s)"),
                            None => "Model ready".to_string(),
                        };
                        ui.colored_label(theme::COLOR_LEGIT, msg);
                    }
                }

                ui.add_space(4.0);
                ui.separator();

                ui.label("URL LIST");
                let can_batch = app.load_state == LoadState::Ready && !batch_running;
                ui.add_enabled_ui(can_batch, |ui| {
                    if ui.button("Check URL List...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("URL list", &["txt", "lst"])
                            .pick_file()
                        {
                            app.start_batch(&path);
                        }
                    }
                });
                if batch_running
                    && ui
                        .add_sized([ui.available_width(), 28.0], egui::Button::new("CANCEL"))
                        .clicked()
                {
                    app.cancel_batch();
                }

                if let Some(err) = &app.error_message {
                    ui.add_space(4.0);
                    ui.colored_label(theme::COLOR_WARNING, err);
                }
            });
        });
}
