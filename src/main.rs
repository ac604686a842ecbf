mod app;
mod color;
mod config;
mod state;
mod ui;

use app::BikeDashApp;
use bike_dash::data::loader;
use config::DataPaths;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let paths = DataPaths::from_process();
    let mut state = AppState::default();
    match loader::load_store(&paths.daily, &paths.hourly) {
        Ok(store) => state.set_store(store),
        Err(e) => {
            log::warn!("Starting without data: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(BikeDashApp::new(state)))),
    )
}
