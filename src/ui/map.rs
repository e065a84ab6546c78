use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoints, Polygon};

use crate::color::RedScale;
use crate::data::catalog::format_value;
use crate::geo::tooltip;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth (map tab)
// ---------------------------------------------------------------------------

/// Countries filled by their aggregate value, with a hover tooltip.
pub fn choropleth(ui: &mut Ui, state: &AppState) {
    let Some(views) = &state.views else {
        return;
    };
    ui.label(RichText::new(&views.titles.map).strong());

    if state.boundaries.is_empty() {
        ui.label(format!(
            "No country boundaries loaded ({}).",
            state.config.boundaries.display()
        ));
        return;
    }

    let indicator = &views.selection.indicator;
    let values = &views.map_values;
    let scale = RedScale::from_values(values.values());

    if let Some(scale) = &scale {
        let (lo, hi) = scale.range();
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format_value(indicator, lo));
            for step in 0..=8 {
                let t = lo + (hi - lo) * f64::from(step) / 8.0;
                ui.label(RichText::new("■").color(scale.color_for(Some(t))));
            }
            ui.label(format_value(indicator, hi));
            ui.label(RichText::new(indicator).small());
        });
    }

    let response = Plot::new("choropleth")
        .data_aspect(1.0)
        .height(480.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_scroll(false)
        .show(ui, move |plot_ui| {
            for shape in &state.boundaries.shapes {
                let fill = match &scale {
                    Some(scale) => scale.color_for(values.get(&shape.iso3).copied()),
                    None => crate::color::NO_DATA,
                };
                for triangle in &shape.fill {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(triangle.to_vec()))
                            .fill_color(fill)
                            .stroke(Stroke::new(0.0, fill)),
                    );
                }
                for polygon in &shape.polygons {
                    let Some(outer) = polygon.first() else {
                        continue;
                    };
                    let ring: PlotPoints = outer.iter().copied().collect();
                    plot_ui.line(Line::new(ring).color(Color32::from_gray(60)).width(0.5));
                }
            }
            plot_ui
                .pointer_coordinate()
                .and_then(|p| state.boundaries.shape_at([p.x, p.y]))
        });

    if let Some(shape) = response.inner {
        response
            .response
            .on_hover_text(tooltip(shape, values, indicator));
    }
}
