use crate::dom::{Document, NodeId};
use pricemark_core::{CurrencyTable, normalize_with};
use serde::Serialize;

pub const SELECTED_CLASS: &str = "selected";
pub const BASE_PRICE_ATTR: &str = "data-base-price";

/// Emitted when the shopper picks a subscription option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionChanged {
    pub subscription_type: Option<String>,
}

/// Gives the options radio semantics and selects the first one.
pub(crate) fn init_options(doc: &mut Document, options: &[NodeId]) {
    for &option in options {
        doc.set_attribute(option, "tabindex", "0");
        doc.set_attribute(option, "role", "radio");
        doc.set_attribute(option, "aria-checked", "false");
    }
    if let Some(&first) = options.first() {
        doc.add_class(first, SELECTED_CLASS);
        doc.set_attribute(first, "aria-checked", "true");
    }
}

pub(crate) fn select_option(
    doc: &mut Document,
    options: &[NodeId],
    index: usize,
) -> Option<NodeId> {
    let &chosen = options.get(index)?;
    for &option in options {
        doc.remove_class(option, SELECTED_CLASS);
        doc.set_attribute(option, "aria-checked", "false");
    }
    doc.add_class(chosen, SELECTED_CLASS);
    doc.set_attribute(chosen, "aria-checked", "true");
    Some(chosen)
}

/// Rewrites the cart price from its `data-base-price` (or current text), decimals stripped.
///
/// Subscription discounts are not applied here; the base price is only re-rendered canonically.
pub fn update_cart_price(doc: &mut Document, table: &CurrencyTable, cart: NodeId) {
    let base = doc
        .attribute(cart, BASE_PRICE_ATTR)
        .filter(|base| !base.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| doc.text_content(cart));
    let canonical = normalize_with(table, &base, false).into_owned();
    doc.set_text_content(cart, &canonical);
}
