use super::{Surface, surface};
use crate::*;
use pricemark_core::{CurrencyTable, Marker};
use std::sync::Arc;

fn guarded(s: &mut Surface) -> PriceGuard<Document> {
    let mut guard = PriceGuard::new(Arc::new(CurrencyTable::standard().clone()));
    guard.observe(
        &mut s.doc,
        WatchedSlot::new(
            SlotRole::Main,
            s.main,
            Marker::attribute("data-product-price"),
        ),
    );
    guard.observe(
        &mut s.doc,
        WatchedSlot::new(SlotRole::Compare, s.compare, Marker::class("price-compare")),
    );
    guard.observe(
        &mut s.doc,
        WatchedSlot::new(SlotRole::Cart, s.cart, Marker::attribute("data-cart-price")),
    );
    guard
}

#[test]
fn external_change_is_corrected_exactly_once() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    s.doc.set_text_content(s.main, "€ 39,00");
    let report = guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);

    assert_eq!(s.doc.text_content(s.main), "39,00€");
    assert_eq!(report.rewrites, 1);
    // The corrective write comes back as a record and is suppressed.
    assert_eq!(report.suppressed, 1);
    assert_eq!(report.rounds, 2);
    assert!(report.converged);
    assert_eq!(guard.last_written(SlotRole::Main), Some("39,00€"));

    let again = guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);
    assert_eq!(again.records, 0);
    assert_eq!(again.rewrites, 0);
    assert!(!s.doc.has_pending_records());
}

#[test]
fn canonical_external_change_causes_no_write() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    s.doc.set_text_content(s.compare, "59,90€");
    let report = guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);

    assert_eq!(report.records, 1);
    assert_eq!(report.rewrites, 0);
    assert_eq!(report.suppressed, 1);
    assert_eq!(report.rounds, 1);
    assert_eq!(guard.last_written(SlotRole::Compare), None);
}

#[test]
fn text_node_changes_resolve_to_the_parent_slot() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    let text = s.doc.children(s.main)[0];
    s.doc.set_text_content(text, "EUR 12,00");
    let report = guard.flush(&mut s.doc);

    assert_eq!(report.rewrites, 1);
    assert_eq!(s.doc.text_content(s.main), "12,00€");
}

#[test]
fn every_record_in_a_batch_is_processed() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    s.doc.set_text_content(s.main, "€1,00");
    s.doc.set_text_content(s.main, "€2,00");
    let report = guard.flush(&mut s.doc);

    // The first record sees the latest text and fixes it; the second finds it canonical.
    assert_eq!(report.records, 2);
    assert_eq!(report.rewrites, 1);
    assert_eq!(report.suppressed, 1);
    assert_eq!(s.doc.text_content(s.main), "2,00€");
    assert_eq!(guard.slot(SlotRole::Main).unwrap().phase(), SlotPhase::Idle);
}

#[test]
fn attribute_and_unrelated_records_are_dropped() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let inner = s.doc.create_element(s.compare, "b", &[]).unwrap();
    let deep = s.doc.append_text(inner, "x").unwrap();
    let mut guard = guarded(&mut s);

    s.doc.set_attribute(s.main, "data-variant", "2");
    s.doc.set_text_content(deep, "€5");
    let report = guard.flush(&mut s.doc);

    assert_eq!(report.records, 2);
    assert_eq!(report.dropped, 2);
    assert_eq!(report.rewrites, 0);
    assert_eq!(s.doc.text_content(deep), "€5");
}

#[test]
fn repeat_of_last_guard_write_is_not_rewritten() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    s.doc.set_text_content(s.main, "€35,00");
    guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);
    assert_eq!(s.doc.text_content(s.main), "35,00€");

    // Normalizes to the cached value, which is treated as the guard's own echo.
    s.doc.set_text_content(s.main, "€35,00");
    let report = guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);
    assert_eq!(report.rewrites, 0);
    assert_eq!(report.suppressed, 1);
    assert_eq!(s.doc.text_content(s.main), "€35,00");
}

#[test]
fn cart_slot_strips_decimals_and_stays_bounded() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    // Two decimal-looking groups need two passes; each pass is a separate observed write.
    s.doc.set_text_content(s.cart, "€35,00,50");
    let report = guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);

    assert_eq!(s.doc.text_content(s.cart), "35€");
    assert_eq!(report.rewrites, 2);
    assert_eq!(report.rounds, 3);
    assert!(report.converged);
}

#[test]
fn round_cap_reports_non_convergence() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    s.doc.set_text_content(s.main, "$5.00");
    let report = guard.settle(&mut s.doc, 1);

    assert_eq!(report.rounds, 1);
    assert_eq!(report.rewrites, 1);
    assert!(!report.converged);
    assert!(s.doc.has_pending_records());
}

#[test]
fn slots_are_tracked_independently() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);

    s.doc.set_text_content(s.main, "USD 10.00");
    s.doc.set_text_content(s.compare, "GBP 20.00");
    s.doc.set_text_content(s.cart, "10.00 USD");
    let report = guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS);

    assert_eq!(report.rewrites, 3);
    assert_eq!(s.doc.text_content(s.main), "10.00$");
    assert_eq!(s.doc.text_content(s.compare), "20.00£");
    assert_eq!(s.doc.text_content(s.cart), "10$");
    assert_eq!(guard.last_written(SlotRole::Main), Some("10.00$"));
    assert_eq!(guard.last_written(SlotRole::Compare), Some("20.00£"));
    assert_eq!(guard.last_written(SlotRole::Cart), Some("10$"));
}

#[test]
fn repeated_corrections_do_not_grow_the_document() {
    let mut s = surface("35,00€", "49,90€", "35€", None);
    let mut guard = guarded(&mut s);
    let nodes = s.doc.node_count();

    for price in ["€1,00", "USD 2.00", "€ 3,00", "4,00 EUR"] {
        s.doc.set_text_content(s.main, price);
        s.doc.set_text_content(s.cart, price);
        assert!(guard.settle(&mut s.doc, DEFAULT_MAX_ROUNDS).converged);
    }

    assert_eq!(s.doc.text_content(s.main), "4,00€");
    assert_eq!(s.doc.text_content(s.cart), "4€");
    assert_eq!(s.doc.node_count(), nodes);
}
