mod guard;
mod product_info;

use crate::{Document, NodeId};

/// `<div><span data-product-price>main</span><s class="price-compare">compare</s>
/// <span class="btn-price" data-cart-price data-base-price=base>cart</span></div>`
pub(crate) struct Surface {
    pub doc: Document,
    pub root: NodeId,
    pub main: NodeId,
    pub compare: NodeId,
    pub cart: NodeId,
}

pub(crate) fn surface(main: &str, compare: &str, cart: &str, base: Option<&str>) -> Surface {
    let mut doc = Document::new();
    let top = doc.root();
    let root = doc
        .create_element(top, "product-info", &[("class", "product")])
        .unwrap();
    let main_el = doc
        .create_element(root, "span", &[("data-product-price", "")])
        .unwrap();
    doc.append_text(main_el, main).unwrap();
    let compare_el = doc
        .create_element(root, "s", &[("class", "price-compare")])
        .unwrap();
    doc.append_text(compare_el, compare).unwrap();
    let mut cart_attrs = vec![("class", "btn-price"), ("data-cart-price", "")];
    if let Some(base) = base {
        cart_attrs.push(("data-base-price", base));
    }
    let cart_el = doc.create_element(root, "span", &cart_attrs).unwrap();
    doc.append_text(cart_el, cart).unwrap();

    Surface {
        doc,
        root,
        main: main_el,
        compare: compare_el,
        cart: cart_el,
    }
}
