mod action;
mod app;
mod breeds;
mod carousel;
mod component;
mod components;
mod controller;
mod favorites;
mod navigation;
mod request;
mod session;
mod theme;
mod view;
mod view_toggle;
mod widgets;

use catvote_proto::client::HttpClient;
use catvote_proto::config::Config;

use crate::carousel::{CarouselAdapter, CarouselOptions, TerminalCarousel};
use crate::controller::Controller;
use crate::favorites::FavoritesStore;
use crate::view::Screen;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = catvote_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = catvote_proto::platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("catvote log: {}", log_path.display());

    tracing::info!("catvote starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {:#}, using defaults", e);
        Config::default()
    });
    tracing::info!(
        "backend {} (favorites: {:?})",
        config.backend.base_url,
        config.favorites.source
    );

    // ── Controller ───────────────────────────────────────────────────────────
    let api = HttpClient::new(&config.backend)?;
    let favorites = FavoritesStore::new(&config.favorites, config.ui.tile_width);
    let carousel = CarouselAdapter::new(
        TerminalCarousel::new(),
        CarouselOptions::from_config(&config.carousel),
    );
    let controller = Controller::new(api, Screen::new(), favorites, carousel);

    // First positional argument is the start location, e.g. `catvote '#breeds'`.
    let start_location = std::env::args().nth(1).unwrap_or_default();

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(controller, start_location, log_path);
    app.run().await?;

    tracing::info!("catvote exiting");
    Ok(())
}
