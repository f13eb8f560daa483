use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_stations")]
    pub stations: Vec<StationConfig>,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations: default_stations(),
            menu: MenuConfig::default(),
            journal: JournalConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

fn default_stations() -> Vec<StationConfig> {
    vec![StationConfig {
        id: "A".to_string(),
        capacity: 2,
    }]
}

/// A preparation station to register at startup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    pub id: String,
    /// Maximum orders held across queue and in-progress (>= 1)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    1
}

/// Menu catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuConfig {
    #[serde(default = "default_menu_path")]
    pub path: PathBuf,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            path: default_menu_path(),
        }
    }
}

fn default_menu_path() -> PathBuf {
    PathBuf::from("menu.json")
}

/// Order journal configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_journal_path")]
    pub path: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_journal_path(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_journal_path() -> PathBuf {
    PathBuf::from("orders.json")
}

/// Notifier configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub mode: NotifierMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierMode {
    #[default]
    Console,
    Silent,
    // Future: Email, Webhook
}
