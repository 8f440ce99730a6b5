use super::surface;
use crate::*;
use chrono::NaiveDate;
use pricemark_core::PriceConfig;

fn options() -> ActivateOptions {
    ActivateOptions::default().with_fixed_today(NaiveDate::from_ymd_opt(2024, 3, 20))
}

#[test]
fn activation_normalizes_all_slots_without_queueing_records() {
    let mut s = surface("€35,00", "EUR 49,90", "€35,00", Some("€ 35,00"));
    let mut info = ProductInfo::activate(&mut s.doc, s.root, &options()).unwrap();

    assert_eq!(s.doc.text_content(s.main), "35,00€");
    assert_eq!(s.doc.text_content(s.compare), "49,90€");
    assert_eq!(s.doc.text_content(s.cart), "35€");
    assert_eq!(s.doc.attribute(s.cart, "data-base-price"), Some("35€"));

    // The initial pass ran before the guard was installed.
    assert!(!s.doc.has_pending_records());
    assert_eq!(info.settle(&mut s.doc).records, 0);
}

#[test]
fn guard_corrects_later_rewrites_by_other_scripts() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut info = ProductInfo::activate(&mut s.doc, s.root, &options()).unwrap();

    // e.g. a variant picker writing a formatted money string
    s.doc.set_text_content(s.main, "€42,50");
    s.doc.set_text_content(s.cart, "€42,50");
    let report = info.settle(&mut s.doc);

    assert_eq!(s.doc.text_content(s.main), "42,50€");
    assert_eq!(s.doc.text_content(s.cart), "42€");
    assert_eq!(report.rewrites, 2);
    assert!(report.converged);
}

#[test]
fn missing_slots_are_skipped() {
    let mut doc = Document::new();
    let top = doc.root();
    let root = doc.create_element(top, "product-info", &[]).unwrap();
    let main = doc
        .create_element(root, "span", &[("data-product-price", "")])
        .unwrap();
    doc.append_text(main, "$9.99").unwrap();

    let info = ProductInfo::activate(&mut doc, root, &options()).unwrap();
    assert_eq!(info.slot(SlotRole::Main), Some(main));
    assert_eq!(info.slot(SlotRole::Compare), None);
    assert_eq!(info.guard().slots().count(), 1);
    assert_eq!(doc.text_content(main), "9.99$");
}

#[test]
fn subscription_selection_rerenders_cart_from_base_price() {
    let mut s = surface("35,00€", "49,90€", "35€", Some("€35,00"));
    let once = s
        .doc
        .create_element(
            s.root,
            "div",
            &[("class", "subscription-option"), ("data-subscription", "once")],
        )
        .unwrap();
    let monthly = s
        .doc
        .create_element(
            s.root,
            "div",
            &[
                ("class", "subscription-option"),
                ("data-subscription", "monthly"),
            ],
        )
        .unwrap();

    let mut info = ProductInfo::activate(&mut s.doc, s.root, &options()).unwrap();
    assert_eq!(info.subscription_options(), &[once, monthly]);
    assert!(s.doc.has_class(once, "selected"));
    assert_eq!(s.doc.attribute(once, "aria-checked"), Some("true"));
    assert_eq!(s.doc.attribute(monthly, "role"), Some("radio"));
    assert_eq!(s.doc.attribute(monthly, "tabindex"), Some("0"));

    // Something else garbles the cart price; picking an option restores it from the base.
    s.doc.set_text_content(s.cart, "loading");
    info.settle(&mut s.doc);

    let event = info.select_subscription(&mut s.doc, 1).unwrap();
    assert_eq!(event.subscription_type.as_deref(), Some("monthly"));
    assert_eq!(s.doc.text_content(s.cart), "35€");
    assert!(!s.doc.has_class(once, "selected"));
    assert_eq!(s.doc.attribute(once, "aria-checked"), Some("false"));
    assert!(s.doc.has_class(monthly, "selected"));

    // The collaborator's write is already canonical: observed, but not rewritten.
    let report = info.settle(&mut s.doc);
    assert_eq!(report.rewrites, 0);

    assert!(info.select_subscription(&mut s.doc, 5).is_none());
}

#[test]
fn subscription_without_base_price_uses_current_text() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    s.doc
        .create_element(s.root, "div", &[("class", "subscription-option")])
        .unwrap();
    let mut info = ProductInfo::activate(&mut s.doc, s.root, &options()).unwrap();

    s.doc.set_text_content(s.cart, "GBP 12.99");
    let event = info.select_subscription(&mut s.doc, 0).unwrap();
    assert_eq!(event.subscription_type, None);
    assert_eq!(s.doc.text_content(s.cart), "12£");
}

#[test]
fn delivery_estimate_is_written_in_french() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let block = s
        .doc
        .create_element(
            s.root,
            "p",
            &[
                ("class", "product-availability"),
                ("data-delivery-days", "14"),
            ],
        )
        .unwrap();
    s.doc.append_text(block, "Livraison le").unwrap();
    let target = s
        .doc
        .create_element(block, "span", &[("class", "delivery-date")])
        .unwrap();

    ProductInfo::activate(&mut s.doc, s.root, &options()).unwrap();
    assert_eq!(s.doc.text_content(target), " 3 avril");
    assert_eq!(s.doc.text_content(block), "Livraison le 3 avril");
}

#[test]
fn delivery_estimate_needs_days_and_the_container_class() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let disabled = s
        .doc
        .create_element(
            s.root,
            "p",
            &[
                ("class", "product-availability"),
                ("data-delivery-days", "0"),
            ],
        )
        .unwrap();
    let disabled_target = s
        .doc
        .create_element(disabled, "span", &[("class", "delivery-date")])
        .unwrap();
    let unclassed = s
        .doc
        .create_element(s.root, "p", &[("data-delivery-days", "2")])
        .unwrap();
    let unclassed_target = s
        .doc
        .create_element(unclassed, "span", &[("class", "delivery-date")])
        .unwrap();

    ProductInfo::activate(&mut s.doc, s.root, &options()).unwrap();
    assert_eq!(s.doc.text_content(disabled_target), "");
    assert_eq!(s.doc.text_content(unclassed_target), "");
}

#[test]
fn configured_markers_and_currency_are_used() {
    let mut doc = Document::new();
    let top = doc.root();
    let root = doc.create_element(top, "section", &[]).unwrap();
    let cart = doc
        .create_element(root, "span", &[("class", "btn-price")])
        .unwrap();
    doc.append_text(cart, "CHF 19.90").unwrap();

    let config = PriceConfig::from_json_str(
        r#"{ "slots": { "cart": ".btn-price" }, "currency": { "codes": { "CHF": "₣" } } }"#,
    )
    .unwrap();
    let mut info =
        ProductInfo::activate(&mut doc, root, &options().with_config(config)).unwrap();
    assert_eq!(doc.text_content(cart), "19₣");

    doc.set_text_content(cart, "CHF 5.50");
    info.settle(&mut doc);
    assert_eq!(doc.text_content(cart), "5₣");
}

#[test]
fn invalid_marker_config_fails_activation() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let config = PriceConfig::from_json_str(r#"{ "slots": { "main": "span" } }"#).unwrap();
    let err = ProductInfo::activate(&mut s.doc, s.root, &options().with_config(config));
    assert!(matches!(
        err,
        Err(Error::Core(pricemark_core::Error::InvalidMarker { .. }))
    ));
}
