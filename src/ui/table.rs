use eframe::egui::{self, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::EXPORT_HEADERS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Render the flagged rows. Clicking a row selects its group for the plot.
pub fn results_table(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open price lists to begin  (File → Open…)");
        });
        return;
    }
    if state.results.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No flagged rows. Adjust the difference and press Analyze.");
        });
        return;
    }

    let selected = state.selected_group.map(|e| e.to_string());
    let mut clicked: Option<i64> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .header(22.0, |mut header| {
            for title in EXPORT_HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, state.results.len(), |mut row| {
                let r = &state.results[row.index()];
                row.set_selected(selected.as_deref() == Some(r.ean.as_str()));

                row.col(|ui: &mut Ui| {
                    let color = state.group_colors.color_for(&r.ean);
                    ui.label(RichText::new(&r.ean).color(color).monospace());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&r.name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", r.price));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&r.tag);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&r.difference);
                });

                if row.response().clicked() {
                    clicked = r.ean.parse().ok();
                }
            });
        });

    if clicked.is_some() {
        state.selected_group = clicked;
    }
}
