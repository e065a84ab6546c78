use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Record, COLUMNS};
use crate::state::AppState;
use crate::ui::panels::save_file_dialog;

// ---------------------------------------------------------------------------
// Table tab
// ---------------------------------------------------------------------------

pub fn selection_table(ui: &mut Ui, state: &mut AppState) {
    let Some(views) = &state.views else {
        return;
    };
    ui.label(RichText::new(&views.titles.table).strong());
    let rows = &views.table_rows;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(420.0)
        .columns(Column::auto().at_least(60.0), COLUMNS.len())
        .header(20.0, |mut header| {
            for name in COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = &rows[row.index()];
                for cell in cells(record) {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });

    ui.add_space(6.0);
    if ui.button("⬇ Download as CSV").clicked() {
        save_file_dialog(state);
    }
}

fn cells(r: &Record) -> [String; 10] {
    [
        r.country.clone(),
        r.iso3.clone(),
        r.area_type.to_string(),
        r.indicator.clone(),
        r.sex.to_string(),
        r.age.clone(),
        r.year.to_string(),
        r.value.to_string(),
        r.upper.to_string(),
        r.lower.to_string(),
    ]
}
