//! `storefront-orders` — order domain.
//!
//! The order lifecycle (pending → processing → completed/cancelled), draft
//! validation and the persistence port. The cross-service verification that
//! gates order creation lives in the order service, not here.

pub mod order;
pub mod store;

pub use order::{Order, OrderDraft, OrderLineItem, OrderStatus};
pub use store::{InMemoryOrderStore, OrderStore};
