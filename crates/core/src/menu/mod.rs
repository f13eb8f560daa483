//! Menu catalog: a read-only lookup table of purchasable items.
//!
//! The catalog is peripheral configuration injected into the workflow, not
//! state owned by the core. It loads from a JSON file that may be either a
//! flat array of items or an object grouping arrays by category.

mod types;

pub use types::{Menu, MenuItem};
