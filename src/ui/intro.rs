use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Introduction page
// ---------------------------------------------------------------------------

pub fn introduction(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.heading("What about AIDS and the youth ?");
        ui.add_space(8.0);

        ui.label(
            "According to UNICEF, the HIV/AIDS pandemic is still a major public health \
             issue, especially among the youth.",
        );
        ui.label(
            "This tool visualises the UNICEF HIV/AIDS dataset to give a better \
             understanding of HIV and its most advanced stage, AIDS: how it evolves \
             across the world and how it affects children and adolescents.",
        );

        if let Some(o) = &state.overview {
            let years = o
                .years
                .map(|(a, b)| format!(", from {a} to {b}"))
                .unwrap_or_default();
            ui.add_space(6.0);
            ui.label(format!(
                "The dataset contains {} rows and {} columns, covering {} countries and \
                 regions, about men and women aged between 0 and 19 years old{years}.",
                o.rows, o.columns, o.areas
            ));
        }
        ui.hyperlink_to(
            "The dataset is available on the UNICEF website",
            "https://data.unicef.org/topic/hiv-aids/",
        );

        let image = &state.config.infographic;
        if image.exists() {
            ui.add_space(12.0);
            ui.strong("UNICEF infographic: gender, treatment and regional disparities");
            ui.add(
                egui::Image::new(format!("file://{}", image.display()))
                    .max_width(ui.available_width())
                    .corner_radius(4.0),
            );
            ui.small("UNICEF infographic from the Global Annual Results Report 2021");
        }
    });
}
