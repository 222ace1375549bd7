mod app;
mod catalog;
mod editor;
mod model;
mod persistence;
mod session;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Shelfplan")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Shelfplan",
        native_options,
        Box::new(|cc| Ok(Box::new(app::StorePlanApp::new(cc)))),
    )
}
