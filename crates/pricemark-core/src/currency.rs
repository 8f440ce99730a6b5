use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Symbol used when a price carries no recognizable currency marker at all.
pub const DEFAULT_SYMBOL: &str = "€";

/// Standalone glyphs recognized at either end of a price, in scan order.
pub const STANDARD_GLYPHS: &[&str] = &[
    "€", "$", "£", "¥", "₹", "₽", "₩", "₪", "₨", "₦", "₡", "₵", "₫", "₭", "₮", "₯", "₰", "₱", "₲",
    "₳", "₴", "₶", "₷", "₸", "₺", "₻", "₼", "₾", "₿",
];

/// ISO codes accepted as `CODE amount` / `amount CODE`, in scan order.
pub const STANDARD_CODES: &[(&str, &str)] = &[
    ("EUR", "€"),
    ("USD", "$"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CNY", "¥"),
];

/// A currency code together with its glyph and the two anchored patterns used to find it.
#[derive(Debug, Clone)]
pub struct CurrencyCode {
    code: String,
    symbol: String,
    leading: Regex,
    trailing: Regex,
}

impl CurrencyCode {
    pub fn new(code: &str, symbol: &str) -> Result<Self> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidConfig {
                key: "currency.codes".to_string(),
                message: format!("currency code {code:?} must be non-empty ASCII alphanumerics"),
            });
        }
        if symbol.is_empty() {
            return Err(Error::InvalidConfig {
                key: "currency.codes".to_string(),
                message: format!("currency code {code} maps to an empty symbol"),
            });
        }

        let escaped = regex::escape(code);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| Error::InvalidConfig {
                key: "currency.codes".to_string(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            leading: compile(format!(r"(?i)^{escaped}\s+(.+)"))?,
            trailing: compile(format!(r"(?i)^(.+)\s+{escaped}$"))?,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Removes the code from `text` when it appears as `CODE amount` or `amount CODE`.
    ///
    /// The code must be separated from the amount by whitespace and sit at a string boundary, so
    /// codes embedded in words (`EURO35`) never match.
    pub fn strip(&self, text: &str) -> Option<String> {
        for re in [&self.leading, &self.trailing] {
            if re.is_match(text) {
                return Some(re.replace(text, "$1").trim().to_string());
            }
        }
        None
    }
}

/// Ordered, read-only lookup table driving price parsing.
///
/// Lookup order is the declared order and the first match wins; this is what resolves ambiguous
/// input such as `¥` (shared by `JPY` and `CNY`).
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    glyphs: Vec<String>,
    codes: Vec<CurrencyCode>,
    default_symbol: String,
}

impl CurrencyTable {
    pub fn new<G, C, S>(
        glyphs: impl IntoIterator<Item = G>,
        codes: impl IntoIterator<Item = (C, S)>,
        default_symbol: &str,
    ) -> Result<Self>
    where
        G: AsRef<str>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for glyph in glyphs {
            let glyph = glyph.as_ref();
            if glyph.is_empty() || glyph.chars().any(char::is_whitespace) {
                return Err(Error::InvalidConfig {
                    key: "currency.glyphs".to_string(),
                    message: format!("glyph {glyph:?} must be non-empty and contain no whitespace"),
                });
            }
            // Later duplicates could never win a scan; keep the first occurrence only.
            if !deduped.iter().any(|g| g == glyph) {
                deduped.push(glyph.to_string());
            }
        }

        let codes = codes
            .into_iter()
            .map(|(code, symbol)| CurrencyCode::new(code.as_ref(), symbol.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if default_symbol.is_empty() {
            return Err(Error::InvalidConfig {
                key: "currency.default".to_string(),
                message: "default symbol must not be empty".to_string(),
            });
        }

        Ok(Self {
            glyphs: deduped,
            codes,
            default_symbol: default_symbol.to_string(),
        })
    }

    /// The built-in table (`€ $ £ ¥ ₹ …`, `EUR USD GBP JPY CNY`, Euro default).
    pub fn standard() -> &'static CurrencyTable {
        static TABLE: OnceLock<CurrencyTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            CurrencyTable::new(
                STANDARD_GLYPHS.iter().copied(),
                STANDARD_CODES.iter().copied(),
                DEFAULT_SYMBOL,
            )
            .expect("standard currency table is valid")
        })
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &str> {
        self.glyphs.iter().map(String::as_str)
    }

    pub fn codes(&self) -> &[CurrencyCode] {
        &self.codes
    }

    pub fn default_symbol(&self) -> &str {
        &self.default_symbol
    }

    /// First glyph (in scan order) that `text` starts with.
    pub fn leading_glyph(&self, text: &str) -> Option<&str> {
        self.glyphs().find(|g| text.starts_with(g))
    }

    /// First glyph (in scan order) that `text` ends with.
    pub fn trailing_glyph(&self, text: &str) -> Option<&str> {
        self.glyphs().find(|g| text.ends_with(g))
    }

    /// First code pattern that matches, with the amount left after removing the code.
    pub fn match_code(&self, text: &str) -> Option<(&CurrencyCode, String)> {
        self.codes
            .iter()
            .find_map(|code| code.strip(text).map(|rest| (code, rest)))
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}
