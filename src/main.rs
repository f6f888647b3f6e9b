mod app;
mod color;
mod state;
mod ui;

use app::DeputyViewerApp;
use deputy_viewer::config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Análise de Deputados e Engajamento",
        options,
        Box::new(|cc| {
            // Image loaders (with http) fetch the deputy photos in the lookup tab.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DeputyViewerApp::new(config)))
        }),
    )
}
