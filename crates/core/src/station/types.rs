//! Station type and its queue operations.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::order::{Order, OrderState};

/// A preparation station holding orders waiting for and undergoing
/// preparation.
///
/// The station tracks order ids only; the `OrderManager`'s map is the single
/// owner of the orders themselves, so every operation that advances an order's
/// state borrows that map. Invariant: `queue.len() + in_progress.len()` never
/// exceeds `capacity`, and an id appears in at most one of the two.
#[derive(Debug, Clone)]
pub struct Station {
    id: String,
    capacity: usize,
    queue: VecDeque<String>,
    in_progress: Vec<String>,
}

impl Station {
    /// Create an empty station. Capacity must be >= 1; configuration
    /// validation enforces this before a station reaches the manager.
    pub fn new(id: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            capacity,
            queue: VecDeque::new(),
            in_progress: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids waiting to start preparation, front first.
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Ids currently being prepared.
    pub fn in_progress(&self) -> &[String] {
        &self.in_progress
    }

    /// Orders held across queue and in-progress.
    pub fn current_load(&self) -> usize {
        self.queue.len() + self.in_progress.len()
    }

    /// True if one more order fits. Pure predicate, no mutation.
    pub fn can_accept(&self) -> bool {
        self.current_load() < self.capacity
    }

    /// Try to take an order into the waiting queue.
    ///
    /// The move toward `Queued` is best-effort: an order already past that
    /// state keeps its current state and may still be enqueued if capacity
    /// allows. Returns false without touching the queue when the station is
    /// full (the state change attempt may already have happened).
    pub fn assign(&mut self, order: &mut Order) -> bool {
        if let Err(e) = order.transition(OrderState::Queued) {
            debug!(order_id = order.id(), "assign keeps current state: {}", e);
        }
        if !self.can_accept() {
            return false;
        }
        self.queue.push_back(order.id().to_string());
        order.station_id = Some(self.id.clone());
        true
    }

    /// Move queued orders into preparation, front first, until capacity is
    /// reached or the queue is empty.
    ///
    /// Returns the ids moved, in the order they were moved. Queued orders
    /// normally transition to `Preparing`; if the transition is rejected (the
    /// order was cancelled or re-assigned while waiting) the state is forced,
    /// matching how the queue membership was established.
    pub fn start_preparation(&mut self, orders: &mut HashMap<String, Order>) -> Vec<String> {
        let mut moved = Vec::new();
        while self.in_progress.len() < self.capacity {
            let Some(order_id) = self.queue.pop_front() else {
                break;
            };
            match orders.get_mut(&order_id) {
                Some(order) => {
                    if let Err(e) = order.transition(OrderState::Preparing) {
                        warn!(order_id = %order_id, "forcing preparing state: {}", e);
                        order.force_state(OrderState::Preparing);
                    }
                }
                None => {
                    // The manager never deletes orders, so a dangling id means
                    // the station was driven with the wrong map.
                    warn!(order_id = %order_id, "queued order missing from order map");
                }
            }
            self.in_progress.push(order_id.clone());
            moved.push(order_id);
        }
        moved
    }

    /// Mark an in-progress order as ready and release its slot.
    ///
    /// Returns false if the id is not in preparation here. A freed slot is
    /// not refilled from the queue; that happens on the next
    /// `start_preparation` call.
    pub fn finish_order(&mut self, order_id: &str, orders: &mut HashMap<String, Order>) -> bool {
        let Some(pos) = self.in_progress.iter().position(|id| id == order_id) else {
            return false;
        };
        match orders.get_mut(order_id) {
            Some(order) => {
                if let Err(e) = order.transition(OrderState::Ready) {
                    warn!(order_id = %order_id, "forcing ready state: {}", e);
                    order.force_state(OrderState::Ready);
                }
            }
            None => {
                warn!(order_id = %order_id, "in-progress order missing from order map");
            }
        }
        self.in_progress.remove(pos);
        true
    }
}
