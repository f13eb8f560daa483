use crate::order::OrderRecord;

use super::OrderEvent;

/// Sink for order lifecycle events.
///
/// Implementations must not assume the order still exists or will stay in the
/// reported state; they receive an immutable snapshot. Returning false means
/// the notification was not delivered, which callers log and otherwise
/// ignore.
pub trait Notifier: Send + Sync {
    /// Deliver (or simulate delivering) a notification.
    fn notify(&self, record: &OrderRecord, event: OrderEvent) -> bool;

    /// Name of this notification mode.
    fn mode_name(&self) -> &'static str;
}
