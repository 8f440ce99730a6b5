#![forbid(unsafe_code)]

//! `pricemark` renders prices in one canonical shape, `<number><symbol>` (`35,00€`), and keeps
//! them that way while other scripts keep rewriting the page.
//!
//! # Features
//!
//! - `dom` (default): element-tree host, mutation guard, product component and the static HTML
//!   pass (`pricemark::dom`)
//!
//! ```
//! assert_eq!(pricemark::normalize("€35,00", true), "35,00€");
//! assert_eq!(pricemark::normalize("EUR 35,00", false), "35€");
//! ```

pub use pricemark_core::*;

#[cfg(feature = "dom")]
pub mod dom {
    pub use pricemark_dom::*;
}
