use courtside::app::CourtsideApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Courtside – Basketball Statistics Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(CourtsideApp::default()))),
    )
}
