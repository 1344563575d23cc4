use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::TimeSeriesTable;
use crate::data::raw::RawTable;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Table view (central panel)
// ---------------------------------------------------------------------------

/// Raw preview of the source cells above the filtered, typed table.
pub fn table_view(ui: &mut Ui, state: &AppState) {
    if state.preview.is_none() && state.session.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Please add a dataset.");
        });
        return;
    }

    if let Some(raw) = &state.preview {
        ui.strong(format!(
            "Source preview (first {} rows of {})",
            raw.head(state.config.preview_rows).len(),
            raw.len()
        ));
        ui.push_id("raw_preview", |ui: &mut Ui| {
            raw_table(ui, raw, state.config.preview_rows);
        });
        ui.separator();
    }

    if let Some(session) = &state.session {
        ui.strong(format!(
            "Filtered readings from {} ({} rows, {} removed as outliers)",
            session.source_label,
            session.table.len(),
            session.removed_rows
        ));
        ui.push_id("filtered_table", |ui: &mut Ui| {
            readings_table(ui, &session.table);
        });
    }
}

fn raw_table(ui: &mut Ui, raw: &RawTable, max_rows: usize) {
    let rows = raw.head(max_rows);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(220.0)
        .columns(Column::auto().at_least(60.0), raw.width())
        .header(20.0, |mut header| {
            for name in &raw.columns {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn readings_table(ui: &mut Ui, table: &TimeSeriesTable) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(80.0), table.channels().len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(&table.time_column);
            });
            for channel in table.channels() {
                header.col(|ui| {
                    ui.strong(&channel.name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.len(), |mut row| {
                let record = &table.records()[row.index()];
                row.col(|ui| {
                    ui.label(record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string());
                });
                for v in &record.values {
                    row.col(|ui| {
                        ui.label(format!("{v:.2}"));
                    });
                }
            });
        });
}
