use tracing::debug;

use crate::order::OrderRecord;

use super::{render_ticket, Notifier, OrderEvent};

/// Notifier that prints a ticket to stdout.
///
/// This is the designated console collaborator; nothing else in the core
/// writes to the terminal.
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, record: &OrderRecord, event: OrderEvent) -> bool {
        debug!(order_id = %record.id, event = %event, "console notification");
        print!("{}", render_ticket(record, event));
        true
    }

    fn mode_name(&self) -> &'static str {
        "console"
    }
}
