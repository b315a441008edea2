//! sonify-gui: text sonification front end

mod app;

use app::SonifyApp;
use eframe::NativeOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "sonify_gui=debug,sonify_services=debug,wgpu=warn,eframe=warn";

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    tracing::info!("Starting Sonify");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 540.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Text Sonification",
        options,
        Box::new(|cc| Ok(Box::new(SonifyApp::new(cc)))),
    )
}
