//! Kitchen stations: capacity-bounded queues of orders.

mod types;

pub use types::Station;
