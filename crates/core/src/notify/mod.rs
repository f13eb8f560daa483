//! Notification of order lifecycle events.
//!
//! The core never notifies on its own; the orchestrating caller invokes a
//! [`Notifier`] after each transition. Notification is fire-and-forget: a
//! failed send never rolls back or blocks the state machine.

mod console;
mod silent;
mod traits;
mod types;

pub use console::ConsoleNotifier;
pub use silent::SilentNotifier;
pub use traits::Notifier;
pub use types::{render_ticket, OrderEvent};

use crate::config::{NotifierConfig, NotifierMode};

/// Build a notifier from configuration.
pub fn create_notifier(config: &NotifierConfig) -> Box<dyn Notifier> {
    match config.mode {
        NotifierMode::Console => Box::new(ConsoleNotifier::new()),
        NotifierMode::Silent => Box::new(SilentNotifier::new()),
    }
}
