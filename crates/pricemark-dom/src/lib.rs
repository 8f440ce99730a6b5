#![forbid(unsafe_code)]

//! Self-observing price guard (headless).
//!
//! Keeps the price slots of a product surface (main, compare, cart) in canonical
//! "number + trailing symbol" form while other code keeps rewriting them, without ever reacting
//! to its own writes in a loop.
//!
//! - [`PriceHost`] is the seam to whatever owns the element tree; [`Document`] is the in-memory
//!   implementation.
//! - [`PriceGuard`] watches slots and corrects external mutations.
//! - [`ProductInfo`] wires slots, guard, subscription options and the delivery estimate.
//! - [`format_price_html`] applies the initial pass to static markup.

pub mod delivery;
pub mod dom;
pub mod error;
pub mod guard;
pub mod host;
pub mod html;
pub mod product_info;
pub mod slot;
pub mod subscription;

pub use dom::{Document, NodeId, ObserverId};
pub use error::{Error, Result};
pub use guard::{DEFAULT_MAX_ROUNDS, GuardReport, PriceGuard};
pub use host::{MutationKind, MutationRecord, PriceHost};
pub use html::format_price_html;
pub use product_info::{ActivateOptions, ProductInfo};
pub use slot::{SlotPhase, SlotRole, WatchedSlot};
pub use subscription::SubscriptionChanged;

#[cfg(test)]
mod tests;
