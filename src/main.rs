mod app;

use app::ImageUploader;
use dotenvy::dotenv;
use eframe::CreationContext;
use image_uploader::config::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Config: endpoint={}, field={}, chunk={}B, timeout={:?}",
        config.endpoint, config.field_name, config.chunk_size, config.timeout
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let app = ImageUploader::new(&config, runtime)?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Image Uploader",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the window: {e}"))
}
