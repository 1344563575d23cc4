use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::InputSource;
use crate::data::outlier::FenceMode;
use crate::state::{AppState, ViewMode};

// ---------------------------------------------------------------------------
// Left side panel – load options, time window, view
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data");
    match &state.source {
        Some(source) => ui.label(source.label()),
        None => ui.label("No dataset loaded."),
    };
    ui.separator();

    let columns = state
        .preview
        .as_ref()
        .map(|raw| raw.columns.clone())
        .unwrap_or_default();

    egui::Grid::new("load_options")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Rows to skip:");
            ui.add(egui::DragValue::new(&mut state.options.parse.skip_rows).range(0..=100_000));
            ui.end_row();

            ui.label("Columns to skip:");
            ui.add(egui::DragValue::new(&mut state.options.parse.skip_cols).range(0..=1_000));
            ui.end_row();

            ui.label("Date column:");
            column_picker(ui, "date_column", &mut state.options.date_column, &columns);
            ui.end_row();

            ui.label("Time column:");
            column_picker(ui, "time_column", &mut state.options.time_column, &columns);
            ui.end_row();

            ui.label("Outlier fences:");
            egui::ComboBox::from_id_salt("fence_mode")
                .selected_text(state.options.fence_mode.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for mode in FenceMode::ALL {
                        ui.selectable_value(&mut state.options.fence_mode, mode, mode.label());
                    }
                });
            ui.end_row();
        });
    ui.checkbox(&mut state.options.parse.has_header, "My data has a header");

    ui.separator();

    ui.strong("Time window");
    let mut bounds_changed = false;
    ui.label("Start Date (MM/DD/YYYY)");
    bounds_changed |= ui.text_edit_singleline(&mut state.start_text).lost_focus();
    ui.label("End Date (MM/DD/YYYY)");
    bounds_changed |= ui.text_edit_singleline(&mut state.end_text).lost_focus();
    if bounds_changed {
        state.refresh_window();
    }

    ui.separator();

    ui.radio_value(&mut state.view, ViewMode::Table, "Table view");
    ui.radio_value(&mut state.view, ViewMode::Graph, "Graph view");

    state.reload_if_changed();
}

/// Combo box over the loaded column names; "auto" leaves the choice to the
/// loader.
fn column_picker(ui: &mut Ui, id: &str, selected: &mut Option<String>, columns: &[String]) {
    let text = selected.clone().unwrap_or_else(|| "(auto)".to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(selected, None, "(auto)");
            for col in columns {
                ui.selectable_value(selected, Some(col.clone()), col);
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
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load sample data").clicked() {
                state.load_sample();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} rows, {} channels, {} outlier rows removed",
                session.source_label,
                session.table.len(),
                session.table.channels().len(),
                session.removed_rows
            ));
            if let Some(window) = &state.window {
                ui.separator();
                ui.label(format!("{} in window", window.len()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open ground temperature data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match InputSource::upload_from_path(&path) {
            Ok(source) => state.load_upload(source),
            Err(e) => {
                log::error!("Failed to open file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
