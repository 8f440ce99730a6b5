use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn euro_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)€|&euro;|&#0*8364;|&#x0*20ac;").expect("valid regex"))
}

/// Returns `true` when `text` contains the Euro glyph or one of its HTML entity spellings.
pub fn contains_euro_token(text: &str) -> bool {
    euro_token_regex().is_match(text)
}

/// Removes every Euro glyph and Euro entity spelling (`&euro;`, `&#8364;`, `&#x20AC;`).
///
/// Only whole tokens are removed; digits such as the `8`, `3`, `6`, `4` of an amount are left
/// alone.
pub fn strip_euro_tokens(text: &str) -> Cow<'_, str> {
    euro_token_regex().replace_all(text, "")
}

/// Decodes HTML entities (`&euro;`, `&nbsp;`, `&#36;`, ...) in raw markup text into Unicode.
///
/// Used where price text comes straight from HTML source (e.g. a streaming rewriter) rather than
/// from a DOM that has already decoded it.
pub fn decode_price_entities(input: &str) -> Cow<'_, str> {
    // Fast path: nothing to decode.
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(htmlize::unescape(input).into_owned())
}
