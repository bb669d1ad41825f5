//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;

pub use cart::CartLine;
pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use product::{Product, Size};
