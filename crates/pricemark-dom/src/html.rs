//! Static variant of the initial price pass, for server-rendered markup.
//!
//! Streams an HTML string through `lol_html`. Each slot element's whole text (its `textContent`)
//! is normalized as one value, exactly like the DOM pass, and the cart slot's `data-base-price` is
//! kept canonical. When the text changes, the element's content is replaced by a single text node;
//! otherwise its markup is re-emitted as written. Markup outside slot elements is passed through
//! untouched.

use crate::Result;
use crate::slot::SlotRole;
use crate::subscription::BASE_PRICE_ATTR;
use lol_html::html_content::{ContentType, Element, EndTag};
use lol_html::{HandlerResult, RewriteStrSettings, comments, element, rewrite_str, text};
use pricemark_core::entities::decode_price_entities;
use pricemark_core::{CurrencyTable, PriceConfig, normalize_with};
use std::cell::RefCell;
use std::rc::Rc;

/// Normalizes the price slots found in `html` using `config`'s markers and currency table.
pub fn format_price_html(html: &str, config: &PriceConfig) -> Result<String> {
    let table = config.currency_table()?;
    let mut selectors = Vec::new();
    for role in SlotRole::ALL {
        selectors.push((role, config.marker(role.config_key())?.to_string()));
    }
    format_price_html_with(html, &table, &selectors)
}

/// Content held back while a slot element is being streamed.
#[derive(Debug, Default)]
struct SlotContent {
    open: bool,
    /// Raw (still entity-encoded) text of every descendant text node.
    text: String,
    /// Everything between the slot's tags, to re-emit when the text is left alone.
    markup: String,
}

/// Canonical form of raw slot text, or `None` when it should be left as written.
fn rewrite_slot_text(table: &CurrencyTable, raw: &str, keep_decimals: bool) -> Option<String> {
    let decoded = decode_price_entities(raw);
    if decoded.trim().is_empty() {
        return None;
    }
    let canonical = normalize_with(table, &decoded, keep_decimals);
    if canonical == decoded {
        None
    } else {
        Some(canonical.into_owned())
    }
}

fn start_tag_markup(el: &Element<'_, '_>) -> String {
    let mut out = format!("<{}", el.tag_name_preserve_case());
    for attr in el.attributes() {
        out.push(' ');
        out.push_str(&attr.name_preserve_case());
        out.push_str("=\"");
        out.push_str(&attr.value().replace('"', "&quot;"));
        out.push('"');
    }
    if el.is_self_closing() {
        out.push_str(" /");
    }
    out.push('>');
    out
}

fn sync_base_price(table: &CurrencyTable, el: &mut Element<'_, '_>) -> HandlerResult {
    let Some(base) = el.get_attribute(BASE_PRICE_ATTR) else {
        return Ok(());
    };
    let decoded = decode_price_entities(&base);
    if decoded.is_empty() {
        return Ok(());
    }
    let canonical = normalize_with(table, &decoded, false);
    if canonical != decoded {
        el.set_attribute(BASE_PRICE_ATTR, &canonical)?;
    }
    Ok(())
}

fn format_price_html_with(
    html: &str,
    table: &CurrencyTable,
    selectors: &[(SlotRole, String)],
) -> Result<String> {
    if html.is_empty() {
        return Ok(String::new());
    }

    // End-tag handlers must be 'static.
    let table = Rc::new(table.clone());
    let mut handlers = Vec::new();
    for (role, selector) in selectors {
        let keep_decimals = role.keeps_decimals();
        let is_cart = *role == SlotRole::Cart;
        let content = Rc::new(RefCell::new(SlotContent::default()));

        let (state, table) = (Rc::clone(&content), Rc::clone(&table));
        handlers.push(element!(
            selector.as_str(),
            move |el: &mut Element<'_, '_>| {
                if is_cart {
                    sync_base_price(&table, el)?;
                }
                // A slot nested in a slot of the same role is plain content of the outer one.
                if !el.can_have_content() || state.borrow().open {
                    return Ok(());
                }
                *state.borrow_mut() = SlotContent {
                    open: true,
                    ..SlotContent::default()
                };

                let (state, table) = (Rc::clone(&state), Rc::clone(&table));
                el.on_end_tag(Box::new(move |end: &mut EndTag<'_>| {
                    let SlotContent { text, markup, .. } = std::mem::take(&mut *state.borrow_mut());
                    match rewrite_slot_text(&table, &text, keep_decimals) {
                        Some(canonical) => end.before(&canonical, ContentType::Text),
                        None => end.before(&markup, ContentType::Html),
                    }
                    Ok(())
                }))
            }
        ));

        let state = Rc::clone(&content);
        let nested = format!("{selector} *");
        handlers.push(element!(
            nested.as_str(),
            move |el: &mut Element<'_, '_>| {
                if !state.borrow().open {
                    return Ok(());
                }
                state.borrow_mut().markup.push_str(&start_tag_markup(el));
                el.remove_and_keep_content();
                if el.can_have_content() {
                    let (state, name) = (Rc::clone(&state), el.tag_name_preserve_case());
                    el.on_end_tag(Box::new(move |end: &mut EndTag<'_>| {
                        state.borrow_mut().markup.push_str(&format!("</{name}>"));
                        end.remove();
                        Ok(())
                    }))?;
                }
                Ok(())
            }
        ));

        let state = Rc::clone(&content);
        handlers.push(text!(selector.as_str(), move |chunk| {
            let mut slot = state.borrow_mut();
            if slot.open {
                slot.text.push_str(chunk.as_str());
                slot.markup.push_str(chunk.as_str());
                chunk.remove();
            }
            Ok(())
        }));

        let state = content;
        handlers.push(comments!(selector.as_str(), move |comment| {
            let mut slot = state.borrow_mut();
            if slot.open {
                slot.markup.push_str(&format!("<!--{}-->", comment.text()));
                comment.remove();
            }
            Ok(())
        }));
    }

    let out = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(out)
}
