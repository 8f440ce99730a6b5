#![forbid(unsafe_code)]

//! Price text normalizer (headless).
//!
//! Rewrites heterogeneous price strings (`€35,00`, `EUR 35,00`, `&euro;35,00`, `35,00 USD`) into
//! the canonical "number + trailing symbol" form (`35,00€`, `35,00$`).
//!
//! Design goals:
//! - never fail on price text: unrecognized input defaults to the Euro symbol
//! - deterministic scanning driven by an ordered [`CurrencyTable`] (first match wins)
//! - already-canonical input is returned borrowed, so "no change" is cheap to detect

pub mod config;
pub mod currency;
pub mod entities;
pub mod error;
pub mod marker;
pub mod normalize;

pub use config::PriceConfig;
pub use currency::{CurrencyCode, CurrencyTable, DEFAULT_SYMBOL};
pub use error::{Error, Result};
pub use marker::Marker;
pub use normalize::{ParsedPrice, SymbolSource, normalize, normalize_with, parse_price};
