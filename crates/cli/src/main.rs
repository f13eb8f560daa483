mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brigade_core::{
    create_notifier, load_config, validate_config, Config, Menu, OrderJournal, OrderManager,
    Station,
};

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("BRIGADE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("brigade.toml"));

    // Load configuration, falling back to defaults when no file exists
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        warn!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };
    validate_config(&config).context("Configuration validation failed")?;

    // Wire up the kitchen
    let mut manager = OrderManager::new();
    for station in &config.stations {
        manager.register_station(Station::new(station.id.clone(), station.capacity));
    }
    info!("Registered {} station(s)", config.stations.len());

    let menu = Menu::load(&config.menu.path);
    if menu.is_empty() {
        warn!("Menu is empty; orders can still use ad-hoc items");
    } else {
        info!("Loaded {} menu item(s)", menu.items().len());
    }

    let notifier = create_notifier(&config.notifier);
    info!("Notifier mode: {}", notifier.mode_name());

    let journal = config
        .journal
        .enabled
        .then(|| OrderJournal::new(config.journal.path.clone()));
    if let Some(journal) = &journal {
        info!("Journaling orders to {:?}", journal.path());
    }

    commands::run_loop(manager, menu, notifier, journal)
}
