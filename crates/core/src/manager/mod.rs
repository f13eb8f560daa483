//! Order manager: owns all orders and stations and orchestrates their
//! lifecycle.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::order::{CustomerInfo, ItemSpec, Order, OrderError, OrderState};
use crate::station::Station;
use crate::timing;

/// Owns the id -> order and id -> station maps and drives the workflow:
/// create, assign, advance, cancel, query.
///
/// Orders are created only here and never deleted; terminal orders stay
/// around for history. Single-threaded by design: a concurrent port must make
/// id allocation and each station's check-then-append atomic.
#[derive(Debug, Default)]
pub struct OrderManager {
    orders: HashMap<String, Order>,
    stations: HashMap<String, Station>,
    /// Creation order of ids, for stable listing.
    order_ids: Vec<String>,
    next_seq: u64,
}

impl OrderManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station. Replaces any station with the same id.
    pub fn register_station(&mut self, station: Station) {
        debug!(
            station_id = station.id(),
            capacity = station.capacity(),
            "registering station"
        );
        self.stations.insert(station.id().to_string(), station);
    }

    pub fn get_station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Registered stations, in no particular order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Create and store a new order.
    ///
    /// Ids are dense and sequential (`ORD-0001`, `ORD-0002`, ...) and are
    /// never reused, not even after cancellation. The estimator runs here;
    /// its failure leaves the estimate unset without failing the creation.
    pub fn create_order(
        &mut self,
        items: Vec<ItemSpec>,
        customer_info: Option<CustomerInfo>,
    ) -> Result<Order, OrderError> {
        let id = format!("ORD-{:04}", self.next_seq + 1);
        let mut order = Order::new(id.clone(), items, customer_info)?;
        self.next_seq += 1;

        refresh_estimate(&mut order);

        info!(
            order_id = %id,
            total = order.total_price(),
            "order created"
        );
        self.orders.insert(id.clone(), order.clone());
        self.order_ids.push(id);
        Ok(order)
    }

    /// Cancel an order that is still Pending, Queued or Preparing.
    ///
    /// Returns false for unknown ids and for orders already Ready, Delivered
    /// or Cancelled.
    pub fn cancel_order(&mut self, id: &str) -> bool {
        let Some(order) = self.orders.get_mut(id) else {
            return false;
        };
        if !order.state().can_cancel() {
            return false;
        }
        let cancelled = order.transition(OrderState::Cancelled).is_ok();
        if cancelled {
            info!(order_id = %id, "order cancelled");
        }
        cancelled
    }

    /// Hand an order to a station if both exist and the station has room.
    ///
    /// Capacity is checked here and again inside `Station::assign`; in this
    /// single-threaded model the two checks always agree.
    pub fn assign_to_station(&mut self, order_id: &str, station_id: &str) -> bool {
        let Some(station) = self.stations.get_mut(station_id) else {
            return false;
        };
        let Some(order) = self.orders.get_mut(order_id) else {
            return false;
        };
        if !station.can_accept() {
            return false;
        }
        let assigned = station.assign(order);
        if assigned {
            info!(order_id = %order_id, station_id = %station_id, "order assigned");
        }
        assigned
    }

    /// Advance a station's queue into preparation.
    ///
    /// Returns snapshots of the orders moved, in the order they were moved.
    /// An unknown station id moves nothing.
    pub fn start_preparation(&mut self, station_id: &str) -> Vec<Order> {
        let Some(station) = self.stations.get_mut(station_id) else {
            return Vec::new();
        };
        let moved = station.start_preparation(&mut self.orders);
        moved
            .iter()
            .filter_map(|id| self.orders.get(id).cloned())
            .collect()
    }

    /// Mark an order at a station as ready.
    pub fn finish_order(&mut self, station_id: &str, order_id: &str) -> bool {
        let Some(station) = self.stations.get_mut(station_id) else {
            return false;
        };
        station.finish_order(order_id, &mut self.orders)
    }

    /// Hand a ready order to the customer.
    pub fn deliver_order(&mut self, id: &str) -> bool {
        let Some(order) = self.orders.get_mut(id) else {
            return false;
        };
        let delivered = order.transition(OrderState::Delivered).is_ok();
        if delivered {
            info!(order_id = %id, "order delivered");
        }
        delivered
    }

    /// Add an item to an existing order and refresh its estimate.
    pub fn add_item(&mut self, order_id: &str, item: ItemSpec) -> Result<(), OrderError> {
        let Some(order) = self.orders.get_mut(order_id) else {
            return Err(OrderError::Validation(format!(
                "unknown order {}",
                order_id
            )));
        };
        order.add_item(item)?;
        refresh_estimate(order);
        Ok(())
    }

    /// Remove an item from an existing order. Returns false when either the
    /// order or the item is missing.
    pub fn remove_item(&mut self, order_id: &str, name: &str) -> bool {
        let Some(order) = self.orders.get_mut(order_id) else {
            return false;
        };
        let removed = order.remove_item(name);
        if removed {
            refresh_estimate(order);
        }
        removed
    }

    pub fn get_order(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    /// All orders in creation order, optionally filtered by state.
    pub fn list_orders(&self, state: Option<OrderState>) -> Vec<&Order> {
        self.order_ids
            .iter()
            .filter_map(|id| self.orders.get(id))
            .filter(|order| state.is_none_or(|s| order.state() == s))
            .collect()
    }
}

/// Run the estimator, leaving any previous estimate in place on failure.
fn refresh_estimate(order: &mut Order) {
    match timing::estimate_minutes(order, None) {
        Ok(minutes) => order.estimated_minutes = Some(minutes),
        Err(e) => warn!(order_id = order.id(), "estimate unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> Vec<ItemSpec> {
        vec![ItemSpec::new("Pizza", 1)
            .with_prep_time(12)
            .with_unit_price(50.0)]
    }

    fn manager_with_station(capacity: usize) -> OrderManager {
        let mut manager = OrderManager::new();
        manager.register_station(Station::new("A", capacity));
        manager
    }

    #[test]
    fn test_create_order_ids_are_dense_and_zero_padded() {
        let mut manager = OrderManager::new();
        let ids: Vec<String> = (0..10)
            .map(|_| manager.create_order(pizza(), None).unwrap().id().to_string())
            .collect();
        assert_eq!(ids.first().unwrap(), "ORD-0001");
        assert_eq!(ids.last().unwrap(), "ORD-0010");
        let mut unique = ids.clone();
        unique.dedup();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_create_order_failure_does_not_burn_an_id() {
        let mut manager = OrderManager::new();
        assert!(manager.create_order(vec![], None).is_err());
        let order = manager.create_order(pizza(), None).unwrap();
        assert_eq!(order.id(), "ORD-0001");
    }

    #[test]
    fn test_create_order_sets_estimate() {
        let mut manager = OrderManager::new();
        let order = manager.create_order(pizza(), None).unwrap();
        assert_eq!(order.estimated_minutes, Some(12));
    }

    #[test]
    fn test_create_order_keeps_customer_info() {
        let mut manager = OrderManager::new();
        let info = CustomerInfo {
            name: Some("Ana".to_string()),
            phone: Some("600111222".to_string()),
        };
        let order = manager.create_order(pizza(), Some(info.clone())).unwrap();
        assert_eq!(order.customer_info(), Some(&info));
    }

    #[test]
    fn test_assign_to_station_happy_path() {
        let mut manager = manager_with_station(2);
        let order = manager.create_order(pizza(), None).unwrap();

        assert!(manager.assign_to_station(order.id(), "A"));
        assert_eq!(manager.get_station("A").unwrap().current_load(), 1);
        assert_eq!(
            manager.get_order(order.id()).unwrap().state(),
            OrderState::Queued
        );
    }

    #[test]
    fn test_assign_to_station_unknown_ids() {
        let mut manager = manager_with_station(2);
        let order = manager.create_order(pizza(), None).unwrap();

        assert!(!manager.assign_to_station("ORD-9999", "A"));
        assert!(!manager.assign_to_station(order.id(), "Z"));
    }

    #[test]
    fn test_assign_to_station_full() {
        let mut manager = manager_with_station(1);
        let first = manager.create_order(pizza(), None).unwrap();
        let second = manager.create_order(pizza(), None).unwrap();

        assert!(manager.assign_to_station(first.id(), "A"));
        assert!(!manager.assign_to_station(second.id(), "A"));
        // Manager-level rejection happens before the best-effort state change.
        assert_eq!(
            manager.get_order(second.id()).unwrap().state(),
            OrderState::Pending
        );
    }

    #[test]
    fn test_cancel_order_lifecycle() {
        let mut manager = manager_with_station(1);
        let order = manager.create_order(pizza(), None).unwrap();
        manager.assign_to_station(order.id(), "A");
        manager.start_preparation("A");

        assert_eq!(
            manager.get_order(order.id()).unwrap().state(),
            OrderState::Preparing
        );
        assert!(manager.cancel_order(order.id()));
        assert_eq!(
            manager.get_order(order.id()).unwrap().state(),
            OrderState::Cancelled
        );
        // Second attempt and unknown id both report false.
        assert!(!manager.cancel_order(order.id()));
        assert!(!manager.cancel_order("ORD-9999"));
    }

    #[test]
    fn test_cancel_rejected_for_ready_order() {
        let mut manager = manager_with_station(1);
        let order = manager.create_order(pizza(), None).unwrap();
        manager.assign_to_station(order.id(), "A");
        manager.start_preparation("A");
        manager.finish_order("A", order.id());

        assert!(!manager.cancel_order(order.id()));
        assert_eq!(
            manager.get_order(order.id()).unwrap().state(),
            OrderState::Ready
        );
    }

    #[test]
    fn test_deliver_requires_ready() {
        let mut manager = manager_with_station(1);
        let order = manager.create_order(pizza(), None).unwrap();

        assert!(!manager.deliver_order(order.id()));
        manager.assign_to_station(order.id(), "A");
        manager.start_preparation("A");
        manager.finish_order("A", order.id());
        assert!(manager.deliver_order(order.id()));
        assert!(!manager.deliver_order(order.id()));
    }

    #[test]
    fn test_list_orders_preserves_creation_order_and_filters() {
        let mut manager = manager_with_station(2);
        let first = manager.create_order(pizza(), None).unwrap();
        let second = manager.create_order(pizza(), None).unwrap();
        let third = manager.create_order(pizza(), None).unwrap();
        manager.cancel_order(second.id());

        let all = manager.list_orders(None);
        let ids: Vec<&str> = all.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id(), third.id()]);

        let cancelled = manager.list_orders(Some(OrderState::Cancelled));
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id(), second.id());

        let pending = manager.list_orders(Some(OrderState::Pending));
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_cancelled_orders_are_retained() {
        let mut manager = manager_with_station(1);
        let order = manager.create_order(pizza(), None).unwrap();
        manager.cancel_order(order.id());
        assert!(manager.get_order(order.id()).is_some());
    }

    #[test]
    fn test_add_and_remove_items_refresh_estimate() {
        let mut manager = OrderManager::new();
        let order = manager.create_order(pizza(), None).unwrap();
        assert_eq!(order.estimated_minutes, Some(12));

        manager
            .add_item(order.id(), ItemSpec::new("Salad", 2).with_prep_time(4))
            .unwrap();
        assert_eq!(
            manager.get_order(order.id()).unwrap().estimated_minutes,
            Some(20)
        );

        assert!(manager.remove_item(order.id(), "Salad"));
        assert_eq!(
            manager.get_order(order.id()).unwrap().estimated_minutes,
            Some(12)
        );

        assert!(manager.add_item("ORD-9999", ItemSpec::new("Salad", 1)).is_err());
        assert!(!manager.remove_item("ORD-9999", "Salad"));
        assert!(!manager.remove_item(order.id(), "Sushi"));
    }

    #[test]
    fn test_start_preparation_unknown_station() {
        let mut manager = manager_with_station(1);
        assert!(manager.start_preparation("Z").is_empty());
        assert!(!manager.finish_order("Z", "ORD-0001"));
    }
}
