// Hide console window in release builds (Windows GUI app)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod app;
mod config;
mod state;
mod task;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::LocationClient;
use crate::config::Config;

/// Command-line options
#[derive(Debug, Parser)]
#[command(name = "gazetteer", version, about = "Native country/state/city picker")]
struct Args {
    /// Override the location service base URL from the config file
    #[arg(long, value_name = "URL")]
    service_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gazetteer=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gazetteer");

    let args = Args::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(url) = args.service_url {
        config.service.base_url = url;
    }

    let client = LocationClient::new(&config.service.base_url)?;

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([520.0, 360.0])
        .with_min_inner_size([420.0, 280.0])
        .with_title("Gazetteer - Location Picker");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        "Gazetteer",
        native_options,
        Box::new(|cc| Ok(Box::new(app::GazetteerApp::new(cc, config, client)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
