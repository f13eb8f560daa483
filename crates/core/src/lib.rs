pub mod config;
pub mod journal;
pub mod manager;
pub mod menu;
pub mod notify;
pub mod order;
pub mod station;
pub mod timing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, JournalConfig,
    MenuConfig, NotifierConfig, NotifierMode, StationConfig,
};
pub use journal::{JournalError, OrderJournal};
pub use manager::OrderManager;
pub use menu::{Menu, MenuItem};
pub use notify::{
    create_notifier, render_ticket, ConsoleNotifier, Notifier, OrderEvent, SilentNotifier,
};
pub use order::{CustomerInfo, ItemSpec, LineItem, Order, OrderError, OrderRecord, OrderState};
pub use station::Station;
pub use timing::{estimate_minutes, format_duration, EstimateError};
