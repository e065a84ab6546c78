use eframe::egui::{self, ScrollArea, Slider, Ui};

use crate::data::catalog::format_value;
use crate::data::filter::AgeMode;
use crate::state::{AppState, Tab};
use crate::ui::{map, plot, table};

// ---------------------------------------------------------------------------
// Explorer page: indicator, parameters, views
// ---------------------------------------------------------------------------

pub fn explorer(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open dataset…)");
        });
        return;
    };
    let indicators = ds.indicators();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            indicator_picker(ui, state, &indicators);
            headline(ui, state);
            ui.separator();

            ui.heading("Parameters");
            if parameters(ui, state) {
                state.recompute();
            }
            ui.separator();

            if let Some(views) = &state.views {
                ui.label(format!("{} rows selected", views.table_rows.len()));
            }
            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(&mut state.tab, Tab::Chart, "📈 Chart");
                ui.selectable_value(&mut state.tab, Tab::Map, "🗺 Map");
                ui.selectable_value(&mut state.tab, Tab::Table, "📊 Table");
            });
            ui.separator();

            match state.tab {
                Tab::Chart => plot::indicator_chart(ui, state),
                Tab::Map => map::choropleth(ui, state),
                Tab::Table => table::selection_table(ui, state),
            }
        });
}

fn indicator_picker(ui: &mut Ui, state: &mut AppState, indicators: &[String]) {
    ui.label("Select the indicator you would like to explore:");
    let mut chosen = None;
    egui::ComboBox::from_id_salt("indicator")
        .selected_text(&state.inputs.indicator)
        .width(ui.available_width().min(640.0))
        .show_ui(ui, |ui: &mut Ui| {
            for name in indicators {
                if ui
                    .selectable_label(state.inputs.indicator == *name, name)
                    .clicked()
                {
                    chosen = Some(name.clone());
                }
            }
        });
    if let Some(name) = chosen {
        if name != state.inputs.indicator {
            state.select_indicator(name);
        }
    }

    ui.add_space(4.0);
    ui.heading(&state.inputs.indicator);
    ui.label(state.description());
}

fn headline(ui: &mut Ui, state: &AppState) {
    let Some(h) = &state.headline else {
        return;
    };
    let indicator = &state.inputs.indicator;

    ui.add_space(6.0);
    ui.columns(3, |cols| {
        cols[0].label(format!("Today in the world ({})", h.year));
        cols[0].heading(format_value(indicator, h.world));

        cols[1].label("Most affected country");
        match &h.most_affected {
            Some((country, value)) => {
                cols[1].heading(country);
                cols[1].label(format_value(indicator, *value));
            }
            None => {
                cols[1].label("–");
            }
        }

        cols[2].label("Gender split (Global)");
        let total: f64 = h.by_sex.iter().map(|(_, v)| v).sum();
        for (sex, value) in &h.by_sex {
            let share = if total > 0.0 { (value / total) as f32 } else { 0.0 };
            cols[2].add(
                egui::ProgressBar::new(share)
                    .text(format!("{sex}: {}", format_value(indicator, *value))),
            );
        }
    });
}

/// Parameter widgets. Returns whether any input changed.
fn parameters(ui: &mut Ui, state: &mut AppState) -> bool {
    let mut changed = false;
    let inputs = &mut state.inputs;
    let domains = &state.domains;

    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.label("Gender");
        changed |= ui.checkbox(&mut inputs.sex.male, "Male").changed();
        changed |= ui.checkbox(&mut inputs.sex.female, "Female").changed();

        let ui = &mut cols[1];
        ui.label("Age selection");
        ui.horizontal(|ui: &mut Ui| {
            changed |= ui.radio_value(&mut inputs.age_mode, AgeMode::Any, "Any").changed();
            changed |= ui
                .radio_value(&mut inputs.age_mode, AgeMode::Range, "Age group")
                .changed();
        });
        ui.small(
            "'Any' averages all age groups. It won't give precisely accurate values, \
             but helps to visualise.",
        );

        let enabled = inputs.age_mode == AgeMode::Range;
        ui.add_enabled_ui(enabled, |ui: &mut Ui| {
            changed |= range_slider(ui, "Age group(s)", &domains.age_steps, &mut inputs.age_idx);
        });
        if enabled {
            ui.small(format!(
                "Available age groups: {}",
                domains.age_groups.join(", ")
            ));
        }
    });

    changed |= range_slider(ui, "Year(s)", &domains.years, &mut inputs.year_idx);

    ui.label("Countries (this parameter does not affect the map)");
    let summary = if inputs.countries.is_empty() {
        "Global".to_string()
    } else {
        inputs.countries.join(", ")
    };
    egui::ComboBox::from_id_salt("countries")
        .selected_text(summary)
        .width(ui.available_width().min(640.0))
        .show_ui(ui, |ui: &mut Ui| {
            if ui.button("Clear").clicked() && !inputs.countries.is_empty() {
                inputs.countries.clear();
                changed = true;
            }
            for country in &domains.countries {
                let mut selected = inputs.countries.contains(country);
                if ui.checkbox(&mut selected, country).changed() {
                    if selected {
                        inputs.countries.push(country.clone());
                    } else {
                        inputs.countries.retain(|c| c != country);
                    }
                    changed = true;
                }
            }
        });

    changed
}

/// Two index sliders over `options`, kept ordered. A single-option domain
/// renders as a fixed slider.
fn range_slider<T: ToString>(
    ui: &mut Ui,
    label: &str,
    options: &[T],
    idx: &mut (usize, usize),
) -> bool {
    let last = options.len().saturating_sub(1);
    let name = |i: f64| {
        options
            .get(i as usize)
            .map(ToString::to_string)
            .unwrap_or_default()
    };

    let mut changed = false;
    ui.label(label);
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(Slider::new(&mut idx.0, 0..=last).custom_formatter(|v, _| name(v)))
            .changed();
        changed |= ui
            .add(Slider::new(&mut idx.1, 0..=last).custom_formatter(|v, _| name(v)))
            .changed();
    });
    if idx.0 > idx.1 {
        std::mem::swap(&mut idx.0, &mut idx.1);
    }
    changed
}
