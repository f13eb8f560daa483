//! Event names and ticket rendering.

use std::fmt;

use crate::order::OrderRecord;
use crate::timing::format_duration;

/// Lifecycle event reported to a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Created,
    Queued,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderEvent::Created => "created",
            OrderEvent::Queued => "queued",
            OrderEvent::Preparing => "preparing",
            OrderEvent::Ready => "ready",
            OrderEvent::Delivered => "delivered",
            OrderEvent::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an order snapshot as a console ticket.
///
/// One line per item (`name xqty @ unit_price = subtotal`), then the total,
/// then the estimate when one is set.
pub fn render_ticket(record: &OrderRecord, event: OrderEvent) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{}] order {}\n", event, record.id));
    for item in &record.items {
        out.push_str(&format!(
            "  {} x{} @ {:.2} = {:.2}\n",
            item.name,
            item.quantity,
            item.unit_price,
            item.subtotal()
        ));
    }
    out.push_str(&format!("  TOTAL {:.2}\n", record.total_price));
    if let Some(minutes) = record.estimated_minutes {
        out.push_str(&format!("  estimated: {}\n", format_duration(minutes)));
    }
    if let Some(station_id) = &record.station_id {
        out.push_str(&format!("  station: {}\n", station_id));
    }
    out
}
