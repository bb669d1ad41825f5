//! Domain layer: catalog, carts, orders and their lifecycle events.

pub mod aggregates;
pub mod events;
pub mod value_objects;
