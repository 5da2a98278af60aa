//! Verdict colours and the dark look of the detector window.

use eframe::egui::{self, Color32, FontId, TextStyle, Visuals};

use phishscan_core::{CheckResult, Outcome};

pub const COLOR_PHISHING: Color32 = Color32::from_rgb(230, 70, 70);
pub const COLOR_LEGIT: Color32 = Color32::from_rgb(70, 200, 100);
pub const COLOR_WARNING: Color32 = Color32::from_rgb(230, 180, 50);

const TEXT: Color32 = Color32::from_rgb(215, 218, 222);
const PANEL: Color32 = Color32::from_rgb(24, 26, 30);

pub fn outcome_color(outcome: &Outcome) -> Color32 {
    match outcome {
        Outcome::Verdict(p) if p.is_phishing() => COLOR_PHISHING,
        Outcome::Verdict(_) => COLOR_LEGIT,
        Outcome::Warning(_) | Outcome::Error(_) => COLOR_WARNING,
    }
}

/// Status column text and colour for one history row.
pub fn result_status(result: &CheckResult) -> (&'static str, Color32) {
    if result.is_error() {
        ("ERROR", COLOR_WARNING)
    } else if result.is_phishing() {
        ("PHISHING", COLOR_PHISHING)
    } else {
        ("LEGITIMATE", COLOR_LEGIT)
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT);
    visuals.panel_fill = PANEL;
    visuals.selection.bg_fill = COLOR_LEGIT.gamma_multiply(0.35);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(10.0, 6.0);
        style.spacing.text_edit_width = 480.0;
        style
            .text_styles
            .insert(TextStyle::Heading, FontId::proportional(22.0));
    });
}
