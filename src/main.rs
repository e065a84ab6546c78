mod app;
mod color;
mod config;
mod data;
mod error;
mod geo;
mod state;
mod ui;

use app::HivViewerApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("Falling back to default paths: {e:#}");
        AppConfig::default()
    });
    log::info!("Reading data from {}", config.dataset.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AIDS and the youth – Visualization Tool",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/gif from disk.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(HivViewerApp::new(config)))
        }),
    )
}
