use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – navigation and help
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("AIDS and the youth");
    ui.separator();

    ui.selectable_value(&mut state.page, Page::Introduction, "Project introduction");
    ui.selectable_value(&mut state.page, Page::Explorer, "Visualization tool");
    ui.separator();

    match state.page {
        Page::Introduction => {
            ui.label(
                "This is the introduction page of the project. To use the \
                 visualisation tool, use the navigation menu above.",
            );
        }
        Page::Explorer => {
            ui.label(
                "Select the indicator you want to visualize, then the parameters. \
                 Finally, pick how you want to see the data: chart, map or table.",
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.views.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export selection…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(views)) = (&state.dataset, &state.views) {
            ui.label(format!(
                "{} rows loaded, {} selected",
                ds.len(),
                views.table_rows.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open indicator table")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_dataset(&path) {
            state.fail(e.context("opening dataset"));
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export selection")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
