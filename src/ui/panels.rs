use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::data::export::DEFAULT_FILE_NAME;
use crate::data::filter::DiffType;
use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – analysis settings
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    ui.strong("Mode");
    egui::ComboBox::from_id_salt("diff_type")
        .selected_text(state.config.diff_type.label())
        .show_ui(ui, |ui: &mut Ui| {
            for mode in [DiffType::Percent, DiffType::Absolute] {
                ui.selectable_value(&mut state.config.diff_type, mode, mode.label());
            }
        });

    ui.add_space(4.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Difference:");
        let speed = match state.config.diff_type {
            DiffType::Percent => 0.01,
            DiffType::Absolute => 0.5,
        };
        ui.add(DragValue::new(&mut state.config.diff).speed(speed));
    });

    if state.config.percent_out_of_range() {
        ui.label(
            RichText::new("Percent mode uses the value as a fraction (0.15 = 15%). Values above 1 match nothing.")
                .small()
                .color(Color32::YELLOW),
        );
    }

    if !state.groups.is_empty() && state.config != state.analyzed_with {
        ui.label(RichText::new("Settings changed; press Analyze to update results.").small());
    }

    ui.add_space(8.0);
    if ui.button("Analyze").clicked() {
        analyze_and_save(state);
    }

    ui.separator();
    ui.strong("Loaded files");

    let Some(dataset) = &state.dataset else {
        ui.label("No files loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for file in &dataset.files {
                let mut line = format!("{}  ({} rows", file.file_name, file.rows_read);
                if file.rows_skipped > 0 {
                    line.push_str(&format!(", {} skipped", file.rows_skipped));
                }
                line.push(')');
                ui.label(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            let can_export = !state.groups.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows from {} file(s), {} flagged",
                ds.len(),
                ds.files.len(),
                state.results.len()
            ));
        }

        ui.separator();

        match &state.status {
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open price lists")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_files();

    if let Some(paths) = files {
        state.load_paths(&paths);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save flagged rows")
        .set_file_name(DEFAULT_FILE_NAME)
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}

/// Run the analysis and, when there was data, ask where to save it.
fn analyze_and_save(state: &mut AppState) {
    if state.run_analysis() {
        save_file_dialog(state);
    }
}
