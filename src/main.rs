mod app;
mod color;
mod data;
mod state;
mod ui;

use app::PriceGapApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Price Gap – EAN price analysis",
        options,
        Box::new(|_cc| Ok(Box::new(PriceGapApp::default()))),
    )
}
