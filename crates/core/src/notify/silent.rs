use crate::order::OrderRecord;

use super::{Notifier, OrderEvent};

/// Notifier that accepts every event and does nothing with it.
pub struct SilentNotifier;

impl SilentNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SilentNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for SilentNotifier {
    fn notify(&self, _record: &OrderRecord, _event: OrderEvent) -> bool {
        true
    }

    fn mode_name(&self) -> &'static str {
        "silent"
    }
}
