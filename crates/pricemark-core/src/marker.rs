use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Identifies a price-bearing element: either by attribute presence or by class name.
///
/// Markers are written in their CSS spelling (`[data-product-price]`, `.price-compare`) so the
/// same value works as a streaming-rewriter selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    Attribute(String),
    Class(String),
}

impl Marker {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = || Error::InvalidMarker {
            marker: raw.to_string(),
        };

        let marker = if let Some(inner) = raw.strip_prefix('[') {
            let name = inner.strip_suffix(']').ok_or_else(invalid)?;
            Self::Attribute(name.trim().to_string())
        } else if let Some(name) = raw.strip_prefix('.') {
            Self::Class(name.to_string())
        } else {
            return Err(invalid());
        };

        let name = marker.name();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(invalid());
        }
        Ok(marker)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(name) | Self::Class(name) => name,
        }
    }
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(name) => write!(f, "[{name}]"),
            Self::Class(name) => write!(f, ".{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_spellings() {
        assert_eq!(
            Marker::parse("[data-product-price]").unwrap(),
            Marker::attribute("data-product-price")
        );
        assert_eq!(
            Marker::parse(" .price-compare ").unwrap(),
            Marker::class("price-compare")
        );
        assert_eq!(Marker::class("btn-price").to_string(), ".btn-price");
    }

    #[test]
    fn rejects_compound_or_empty_selectors() {
        for raw in ["", "[]", ".", "div", "[data-x", ".a.b", "[data-x=1]", "#id"] {
            assert!(Marker::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
