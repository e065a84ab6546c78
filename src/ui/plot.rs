use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::{bound_color, generate_palette};
use crate::data::aggregate::{ChartSeries, SeriesPoint};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Time-series chart
// ---------------------------------------------------------------------------

/// One line per (country, sex) series, optionally with its bounds.
pub fn indicator_chart(ui: &mut Ui, state: &mut AppState) {
    let Some(views) = &state.views else {
        return;
    };

    ui.label(RichText::new(&views.titles.chart).strong());
    ui.checkbox(&mut state.show_bounds, "Show Upper/lower values");
    let show_bounds = state.show_bounds;

    let palette = generate_palette(views.series.len());

    Plot::new("indicator_chart")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(views.selection.indicator.as_str())
        .height(420.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (series, &color) in views.series.iter().zip(palette.iter()) {
                let suffix = series.label_suffix();
                let line = |pick: fn(&SeriesPoint) -> f64| points(series, pick);

                plot_ui.line(
                    Line::new(line(|p| p.estimated))
                        .name(format!("Estimated Value{suffix}"))
                        .color(color)
                        .width(2.0),
                );
                if show_bounds {
                    plot_ui.line(
                        Line::new(line(|p| p.upper))
                            .name(format!("Upper Value{suffix}"))
                            .color(bound_color(color))
                            .width(1.0),
                    );
                    plot_ui.line(
                        Line::new(line(|p| p.lower))
                            .name(format!("Lower Value{suffix}"))
                            .color(bound_color(color))
                            .width(1.0),
                    );
                }
            }
        });
}

/// `(year, value)` pairs of `series`, skipping missing values.
fn points(series: &ChartSeries, pick: fn(&SeriesPoint) -> f64) -> PlotPoints {
    series
        .points
        .iter()
        .filter(|p| !pick(p).is_nan())
        .map(|p| [f64::from(p.year), pick(p)])
        .collect()
}
