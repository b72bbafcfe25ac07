use eframe::egui::{Color32, Ui};
use egui_plot::{HLine, Legend, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Group price plot (bottom panel)
// ---------------------------------------------------------------------------

/// Plot the selected group's prices in ascending order against its maximum
/// and the threshold of the last analysis, so flagged points match the table.
pub fn group_plot(ui: &mut Ui, state: &AppState) {
    let Some(group) = state.selected_group() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Select a row to see its group's prices.");
        });
        return;
    };
    let Some(max_price) = group.max_price() else {
        return;
    };
    let threshold = state.analyzed_with.threshold(max_price);
    let color = state.group_colors.color_for(&group.ean.to_string());

    let (below, above): (Vec<_>, Vec<_>) = group
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.price <= threshold, [i as f64, r.price]))
        .partition(|(hit, _)| *hit);

    ui.label(format!(
        "EAN {}  ·  {} offers  ·  max {max_price:.2}  ·  threshold {threshold:.2}",
        group.ean,
        group.rows.len()
    ));

    Plot::new("group_plot")
        .legend(Legend::default())
        .x_axis_label("Offer (by price)")
        .y_axis_label("Price")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let flagged: PlotPoints = below.into_iter().map(|(_, p)| p).collect();
            let rest: PlotPoints = above.into_iter().map(|(_, p)| p).collect();

            plot_ui.points(Points::new(flagged).name("flagged").color(color).radius(5.0));
            plot_ui.points(Points::new(rest).name("other").color(Color32::GRAY).radius(4.0));
            plot_ui.hline(HLine::new(max_price).name("max").color(Color32::LIGHT_BLUE));
            plot_ui.hline(HLine::new(threshold).name("threshold").color(Color32::RED));
        });
}
