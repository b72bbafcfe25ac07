use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PriceGapApp {
    pub state: AppState,
}

impl eframe::App for PriceGapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: mode / threshold ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: prices of the selected group ----
        egui::TopBottomPanel::bottom("plot_panel")
            .default_height(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::group_plot(ui, &self.state);
            });

        // ---- Central panel: flagged rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::results_table(ui, &mut self.state);
        });
    }
}
