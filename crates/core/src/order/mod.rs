//! Order entity and its lifecycle state machine.

mod types;

pub use types::{
    CustomerInfo, ItemSpec, LineItem, Order, OrderError, OrderRecord, OrderState,
};
