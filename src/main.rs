mod app;
mod audio;
mod catalog;
mod dispatch;
mod error;
mod form;
mod google;
mod render;
mod settings;
mod task;

use app::SpeechformApp;
use catalog::Catalog;
use google::GoogleTtsClient;
use settings::load_settings;

fn main() -> eframe::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings();
    let client = match GoogleTtsClient::from_env() {
        Ok(client) => {
            let client = client.with_endpoint(settings.endpoint.clone());
            log::debug!("Synthesis endpoint: {}", client.endpoint());
            Some(client)
        }
        Err(err) => {
            log::warn!("Synthesis client unavailable: {err}");
            None
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 420.0])
            .with_min_inner_size([380.0, 320.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Text-to-Speech Converter",
        native_options,
        Box::new(move |_cc| {
            Box::new(SpeechformApp::new(
                Catalog::builtin(),
                &settings,
                client.clone(),
            ))
        }),
    )
}
