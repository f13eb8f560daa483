//! Core order data types.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default preparation time applied when an item spec omits it (minutes).
const DEFAULT_PREP_TIME_MINUTES: u32 = 5;

/// Errors for order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed input to construction or item mutation.
    #[error("invalid order data: {0}")]
    Validation(String),

    /// Transition not allowed by the lifecycle table.
    #[error("invalid transition: cannot go from {from} to {to}")]
    InvalidTransition { from: OrderState, to: OrderState },

    /// A state name that is not part of the lifecycle.
    #[error("unknown order state: {0}")]
    UnknownState(String),
}

/// Lifecycle state of an order.
///
/// State machine flow:
/// ```text
/// Pending -> Queued -> Preparing -> Ready -> Delivered
///    |          |          |
///    |          v          v
///    +----> Cancelled  Cancelled
///
/// Pending may also jump straight to Preparing.
/// Delivered and Cancelled are terminal.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Order created, not yet handed to a station.
    Pending,
    /// Waiting in a station queue.
    Queued,
    /// Being prepared at a station.
    Preparing,
    /// Preparation finished, waiting for pickup.
    Ready,
    /// Handed to the customer (terminal).
    Delivered,
    /// Cancelled before delivery (terminal).
    Cancelled,
}

impl OrderState {
    /// States reachable from this one.
    pub fn successors(&self) -> &'static [OrderState] {
        match self {
            OrderState::Pending => &[
                OrderState::Queued,
                OrderState::Preparing,
                OrderState::Cancelled,
            ],
            OrderState::Queued => &[OrderState::Preparing, OrderState::Cancelled],
            OrderState::Preparing => &[OrderState::Ready, OrderState::Cancelled],
            OrderState::Ready => &[OrderState::Delivered],
            OrderState::Delivered => &[],
            OrderState::Cancelled => &[],
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Delivered | OrderState::Cancelled)
    }

    /// Returns true if the order can still be cancelled from this state.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderState::Pending | OrderState::Queued | OrderState::Preparing
        )
    }

    /// State name as used in records and filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Pending => "pending",
            OrderState::Queued => "queued",
            OrderState::Preparing => "preparing",
            OrderState::Ready => "ready",
            OrderState::Delivered => "delivered",
            OrderState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderState::Pending),
            "queued" => Ok(OrderState::Queued),
            "preparing" => Ok(OrderState::Preparing),
            "ready" => Ok(OrderState::Ready),
            "delivered" => Ok(OrderState::Delivered),
            "cancelled" => Ok(OrderState::Cancelled),
            other => Err(OrderError::UnknownState(other.to_string())),
        }
    }
}

/// A normalized order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name (unique within an order, see merge semantics of `add_item`).
    pub name: String,
    /// Units ordered (always > 0).
    pub quantity: u32,
    /// Preparation time per unit, in minutes.
    pub prep_time_minutes: u32,
    /// Price per unit.
    pub unit_price: f64,
}

impl LineItem {
    /// Line subtotal (quantity x unit price), rounded to 2 decimals.
    pub fn subtotal(&self) -> f64 {
        round2(self.quantity as f64 * self.unit_price)
    }
}

/// Loose input shape for an order line.
///
/// Optional fields are defaulted during normalization: 5 minutes prep time,
/// 0.0 unit price. Anything not conforming is rejected at the order
/// construction boundary, never later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl ItemSpec {
    /// Create a spec with just name and quantity.
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            prep_time_minutes: None,
            unit_price: None,
        }
    }

    /// Set per-unit preparation time.
    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time_minutes = Some(minutes);
        self
    }

    /// Set per-unit price.
    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    /// Validate and convert into the canonical line shape.
    fn normalize(self) -> Result<LineItem, OrderError> {
        if self.name.trim().is_empty() {
            return Err(OrderError::Validation("item name cannot be empty".into()));
        }
        if self.quantity == 0 {
            return Err(OrderError::Validation(format!(
                "item '{}' must have quantity > 0",
                self.name
            )));
        }
        let unit_price = self.unit_price.unwrap_or(0.0);
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(OrderError::Validation(format!(
                "item '{}' has invalid unit price",
                self.name
            )));
        }
        Ok(LineItem {
            name: self.name,
            quantity: self.quantity,
            prep_time_minutes: self.prep_time_minutes.unwrap_or(DEFAULT_PREP_TIME_MINUTES),
            unit_price: round2(unit_price),
        })
    }
}

/// Customer contact details, immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A customer order moving through the kitchen lifecycle.
#[derive(Debug, Clone)]
pub struct Order {
    id: String,
    items: Vec<LineItem>,
    state: OrderState,
    /// Estimated total preparation minutes, set by the estimator only.
    pub estimated_minutes: Option<u32>,
    created_at: DateTime<Utc>,
    state_history: HashMap<OrderState, DateTime<Utc>>,
    /// Station currently holding this order, if any. Reference only, the
    /// manager's map is the sole owner of the order itself.
    pub station_id: Option<String>,
    customer_info: Option<CustomerInfo>,
}

impl Order {
    /// Create an order in `Pending` state.
    ///
    /// Items are validated and normalized; specs sharing a name are merged by
    /// summing quantities. Fails on an empty item list or any malformed spec.
    pub fn new(
        id: impl Into<String>,
        items: Vec<ItemSpec>,
        customer_info: Option<CustomerInfo>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".into(),
            ));
        }

        let mut normalized: Vec<LineItem> = Vec::with_capacity(items.len());
        for spec in items {
            let line = spec.normalize()?;
            merge_line(&mut normalized, line)?;
        }

        let created_at = Utc::now();
        let mut state_history = HashMap::new();
        state_history.insert(OrderState::Pending, created_at);

        Ok(Self {
            id: id.into(),
            items: normalized,
            state: OrderState::Pending,
            estimated_minutes: None,
            created_at,
            state_history,
            station_id: None,
            customer_info,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When each state was entered. Re-entering a state overwrites its entry.
    pub fn state_history(&self) -> &HashMap<OrderState, DateTime<Utc>> {
        &self.state_history
    }

    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        self.customer_info.as_ref()
    }

    /// Move to `target` if the lifecycle table allows it.
    ///
    /// Records the entry timestamp for the new state. No side effects beyond
    /// the order itself; notifying is the caller's job.
    pub fn transition(&mut self, target: OrderState) -> Result<(), OrderError> {
        if !self.state.successors().contains(&target) {
            return Err(OrderError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        self.state_history.insert(target, Utc::now());
        Ok(())
    }

    /// Set the state directly, bypassing the lifecycle table.
    ///
    /// Only for call sites that have already established the precondition by
    /// construction (e.g. an order popped from a station queue). The history
    /// timestamp is still recorded.
    pub(crate) fn force_state(&mut self, target: OrderState) {
        self.state = target;
        self.state_history.insert(target, Utc::now());
    }

    /// Add an item, merging into an existing line with the same name.
    pub fn add_item(&mut self, item: ItemSpec) -> Result<(), OrderError> {
        let line = item.normalize()?;
        merge_line(&mut self.items, line)
    }

    /// Remove the line with the given name. Returns false if there is none.
    pub fn remove_item(&mut self, name: &str) -> bool {
        match self.items.iter().position(|item| item.name == name) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Total price across all lines, rounded to 2 decimals.
    pub fn total_price(&self) -> f64 {
        let total = self
            .items
            .iter()
            .map(|item| item.quantity as f64 * item.unit_price)
            .sum();
        round2(total)
    }

    /// Serializable snapshot, the contract consumed by the journal and the
    /// notifier.
    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id.clone(),
            items: self.items.clone(),
            state: self.state,
            estimated_minutes: self.estimated_minutes,
            created_at: self.created_at,
            station_id: self.station_id.clone(),
            customer_info: self.customer_info.clone(),
            total_price: self.total_price(),
        }
    }
}

/// Serializable order snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub items: Vec<LineItem>,
    pub state: OrderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
    pub total_price: f64,
}

fn merge_line(items: &mut Vec<LineItem>, line: LineItem) -> Result<(), OrderError> {
    match items.iter_mut().find(|existing| existing.name == line.name) {
        Some(existing) => {
            existing.quantity = existing
                .quantity
                .checked_add(line.quantity)
                .ok_or_else(|| {
                    OrderError::Validation(format!(
                        "item '{}' merged quantity overflows",
                        line.name
                    ))
                })?;
        }
        None => items.push(line),
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza_order() -> Order {
        Order::new(
            "ORD-0001",
            vec![ItemSpec::new("Pizza", 1)
                .with_prep_time(12)
                .with_unit_price(50.0)],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_new_order_starts_pending() {
        let order = pizza_order();
        assert_eq!(order.state(), OrderState::Pending);
        assert!(order.state_history().contains_key(&OrderState::Pending));
        assert_eq!(order.estimated_minutes, None);
        assert_eq!(order.station_id, None);
    }

    #[test]
    fn test_new_order_rejects_empty_items() {
        let result = Order::new("ORD-0001", vec![], None);
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_new_order_rejects_zero_quantity() {
        let result = Order::new("ORD-0001", vec![ItemSpec::new("Pizza", 0)], None);
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_new_order_rejects_blank_name() {
        let result = Order::new("ORD-0001", vec![ItemSpec::new("  ", 1)], None);
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_new_order_rejects_negative_price() {
        let result = Order::new(
            "ORD-0001",
            vec![ItemSpec::new("Pizza", 1).with_unit_price(-1.0)],
            None,
        );
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_normalization_defaults() {
        let order = Order::new("ORD-0001", vec![ItemSpec::new("Water", 2)], None).unwrap();
        let item = &order.items()[0];
        assert_eq!(item.prep_time_minutes, 5);
        assert_eq!(item.unit_price, 0.0);
    }

    #[test]
    fn test_duplicate_specs_merge_at_construction() {
        let order = Order::new(
            "ORD-0001",
            vec![ItemSpec::new("Taco", 2), ItemSpec::new("Taco", 3)],
            None,
        )
        .unwrap();
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity, 5);
    }

    #[test]
    fn test_add_item_merges_by_name() {
        let mut order = pizza_order();
        order.add_item(ItemSpec::new("Pizza", 2)).unwrap();
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity, 3);

        order.add_item(ItemSpec::new("Fries", 1)).unwrap();
        assert_eq!(order.items().len(), 2);
    }

    #[test]
    fn test_add_item_rejects_invalid() {
        let mut order = pizza_order();
        assert!(order.add_item(ItemSpec::new("", 1)).is_err());
        assert!(order.add_item(ItemSpec::new("Fries", 0)).is_err());
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn test_merge_rejects_quantity_overflow() {
        let mut order =
            Order::new("ORD-0001", vec![ItemSpec::new("Pizza", u32::MAX)], None).unwrap();
        let err = order.add_item(ItemSpec::new("Pizza", 2)).unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        assert_eq!(order.items()[0].quantity, u32::MAX);

        let result = Order::new(
            "ORD-0002",
            vec![ItemSpec::new("Taco", u32::MAX), ItemSpec::new("Taco", 1)],
            None,
        );
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_remove_item() {
        let mut order = pizza_order();
        assert!(order.remove_item("Pizza"));
        assert!(!order.remove_item("Pizza"));
        assert!(order.items().is_empty());
    }

    #[test]
    fn test_total_price_rounds_to_cents() {
        let order = Order::new(
            "ORD-0001",
            vec![
                ItemSpec::new("Coffee", 3).with_unit_price(1.333),
                ItemSpec::new("Cake", 1).with_unit_price(2.5),
            ],
            None,
        )
        .unwrap();
        // 3 x 1.33 + 2.50
        assert_eq!(order.total_price(), 6.49);
    }

    #[test]
    fn test_total_price_invariant_under_item_order() {
        let a = Order::new(
            "ORD-0001",
            vec![
                ItemSpec::new("Pizza", 1).with_unit_price(50.0),
                ItemSpec::new("Coke", 2).with_unit_price(2.25),
            ],
            None,
        )
        .unwrap();
        let b = Order::new(
            "ORD-0002",
            vec![
                ItemSpec::new("Coke", 2).with_unit_price(2.25),
                ItemSpec::new("Pizza", 1).with_unit_price(50.0),
            ],
            None,
        )
        .unwrap();
        assert_eq!(a.total_price(), b.total_price());
        assert_eq!(a.total_price(), 54.5);
    }

    #[test]
    fn test_transition_along_happy_path() {
        let mut order = pizza_order();
        order.transition(OrderState::Queued).unwrap();
        order.transition(OrderState::Preparing).unwrap();
        order.transition(OrderState::Ready).unwrap();
        order.transition(OrderState::Delivered).unwrap();
        assert_eq!(order.state(), OrderState::Delivered);
        assert!(order.state_history().contains_key(&OrderState::Delivered));
    }

    #[test]
    fn test_pending_straight_to_preparing_is_allowed() {
        let mut order = pizza_order();
        order.transition(OrderState::Preparing).unwrap();
        assert_eq!(order.state(), OrderState::Preparing);
    }

    #[test]
    fn test_pending_to_ready_is_rejected() {
        let mut order = pizza_order();
        let err = order.transition(OrderState::Ready).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderState::Pending,
                to: OrderState::Ready,
            }
        ));
        assert_eq!(order.state(), OrderState::Pending);
    }

    #[test]
    fn test_delivered_is_terminal() {
        let mut order = pizza_order();
        order.transition(OrderState::Preparing).unwrap();
        order.transition(OrderState::Ready).unwrap();
        order.transition(OrderState::Delivered).unwrap();

        for target in [
            OrderState::Pending,
            OrderState::Queued,
            OrderState::Preparing,
            OrderState::Ready,
            OrderState::Cancelled,
        ] {
            assert!(order.transition(target).is_err());
        }
        assert!(order.state().is_terminal());
    }

    #[test]
    fn test_history_overwritten_on_reentry() {
        // Pending is the only state seeded at construction; force_state lets
        // the test re-enter it to observe the overwrite.
        let mut order = pizza_order();
        let first = order.state_history()[&OrderState::Pending];
        order.force_state(OrderState::Pending);
        let second = order.state_history()[&OrderState::Pending];
        assert!(second >= first);
        assert_eq!(order.state_history().len(), 1);
    }

    #[test]
    fn test_state_parse_round_trip() {
        for state in [
            OrderState::Pending,
            OrderState::Queued,
            OrderState::Preparing,
            OrderState::Ready,
            OrderState::Delivered,
            OrderState::Cancelled,
        ] {
            assert_eq!(state.as_str().parse::<OrderState>().unwrap(), state);
        }
        assert!(matches!(
            "burnt".parse::<OrderState>(),
            Err(OrderError::UnknownState(_))
        ));
    }

    #[test]
    fn test_record_snapshot() {
        let mut order = pizza_order();
        order.estimated_minutes = Some(12);
        order.station_id = Some("grill".to_string());
        let record = order.to_record();

        assert_eq!(record.id, "ORD-0001");
        assert_eq!(record.state, OrderState::Pending);
        assert_eq!(record.total_price, 50.0);
        assert_eq!(record.estimated_minutes, Some(12));
        assert_eq!(record.station_id.as_deref(), Some("grill"));

        let json = serde_json::to_string(&record).unwrap();
        let parsed: OrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        // created_at serializes as ISO-8601
        assert!(json.contains("created_at"));
    }
}
