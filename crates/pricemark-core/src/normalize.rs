//! Price text normalization.
//!
//! Every price is rewritten into the canonical form `<number><symbol>`: the amount first, then
//! exactly one currency glyph, with no whitespace in between. Input that is already canonical is
//! returned as-is (borrowed) so callers can cheaply detect "nothing to do".

use crate::currency::{CurrencyTable, DEFAULT_SYMBOL};
use crate::entities::{contains_euro_token, strip_euro_tokens};
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::OnceLock;

fn decimal_group_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,.][0-9]+$").expect("valid regex"))
}

/// Where the currency marker of a price was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolSource {
    LeadingGlyph,
    TrailingGlyph,
    Code,
    EuroEntity,
    Default,
}

/// Intermediate result of splitting a price into amount and symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPrice {
    pub number_part: String,
    pub symbol: String,
    pub source: SymbolSource,
}

impl ParsedPrice {
    pub fn symbol_was_already_trailing(&self) -> bool {
        self.source == SymbolSource::TrailingGlyph
    }
}

/// Splits already-trimmed price text into amount and currency symbol.
///
/// Never fails: text without any recognizable marker is treated as an amount in the table's
/// default currency.
pub fn parse_price(table: &CurrencyTable, trimmed: &str) -> ParsedPrice {
    if let Some(glyph) = table.leading_glyph(trimmed) {
        return ParsedPrice {
            number_part: trimmed[glyph.len()..].trim().to_string(),
            symbol: glyph.to_string(),
            source: SymbolSource::LeadingGlyph,
        };
    }

    if let Some(glyph) = table.trailing_glyph(trimmed) {
        return ParsedPrice {
            number_part: trimmed[..trimmed.len() - glyph.len()].trim().to_string(),
            symbol: glyph.to_string(),
            source: SymbolSource::TrailingGlyph,
        };
    }

    if let Some((code, rest)) = table.match_code(trimmed) {
        return ParsedPrice {
            number_part: rest,
            symbol: code.symbol().to_string(),
            source: SymbolSource::Code,
        };
    }

    if contains_euro_token(trimmed) {
        return ParsedPrice {
            number_part: strip_euro_tokens(trimmed).trim().to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            source: SymbolSource::EuroEntity,
        };
    }

    tracing::trace!(text = trimmed, "no currency marker recognized; using default symbol");
    ParsedPrice {
        number_part: trimmed.to_string(),
        symbol: table.default_symbol().to_string(),
        source: SymbolSource::Default,
    }
}

/// Normalizes `text` with the built-in [`CurrencyTable`].
///
/// `keep_decimals = false` drops one trailing decimal group (`35,00€` -> `35€`).
pub fn normalize(text: &str, keep_decimals: bool) -> Cow<'_, str> {
    normalize_with(CurrencyTable::standard(), text, keep_decimals)
}

/// Normalizes `text` into `<number><symbol>` form using `table`.
///
/// Returns the input unchanged (borrowed) when it is empty, or when its symbol already trails
/// and there is no decimal group to drop. This keeps well-formed text byte-identical, including
/// any surrounding whitespace.
pub fn normalize_with<'a>(
    table: &CurrencyTable,
    text: &'a str,
    keep_decimals: bool,
) -> Cow<'a, str> {
    if text.is_empty() {
        return Cow::Borrowed(text);
    }

    let trimmed = text.trim();
    let parsed = parse_price(table, trimmed);

    let mut number_part: String = parsed
        .number_part
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let had_decimals = decimal_group_regex().is_match(&number_part);
    if !keep_decimals && had_decimals {
        number_part = decimal_group_regex().replace(&number_part, "").into_owned();
    }

    if parsed.symbol_was_already_trailing() && (keep_decimals || !had_decimals) {
        return Cow::Borrowed(text);
    }

    if number_part.is_empty() {
        return Cow::Borrowed(trimmed);
    }

    Cow::Owned(format!("{number_part}{}", parsed.symbol))
}
