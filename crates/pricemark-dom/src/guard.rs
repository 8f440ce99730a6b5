//! The mutation guard.
//!
//! Each watched slot runs `Idle -> ChangeDetected -> Classifying -> (Suppressed | Rewriting) ->
//! Idle` once per delivered batch. A rewrite records the canonical value in the slot's cache
//! before touching the element, so the record produced by that write is recognized and
//! suppressed when it comes back.

use crate::host::PriceHost;
use crate::slot::{Decision, SlotPhase, SlotRole, WatchedSlot};
use pricemark_core::{CurrencyTable, normalize_with};
use serde::Serialize;
use std::sync::Arc;

/// Flush rounds [`PriceGuard::settle`] runs before giving up on convergence.
pub const DEFAULT_MAX_ROUNDS: usize = 16;

/// What the guard did while draining records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardReport {
    pub records: usize,
    pub rewrites: usize,
    pub suppressed: usize,
    pub dropped: usize,
    pub rounds: usize,
    pub converged: bool,
}

impl GuardReport {
    fn absorb(&mut self, other: &GuardReport) {
        self.records += other.records;
        self.rewrites += other.rewrites;
        self.suppressed += other.suppressed;
        self.dropped += other.dropped;
    }
}

struct Watched<H: PriceHost> {
    slot: WatchedSlot<H::Node>,
    observer: H::Observer,
}

pub struct PriceGuard<H: PriceHost> {
    table: Arc<CurrencyTable>,
    watched: Vec<Watched<H>>,
}

impl<H: PriceHost> PriceGuard<H> {
    pub fn new(table: Arc<CurrencyTable>) -> Self {
        Self {
            table,
            watched: Vec::new(),
        }
    }

    /// Starts watching `slot.element()`'s subtree. Only changes made after this call are seen.
    pub fn observe(&mut self, host: &mut H, slot: WatchedSlot<H::Node>) {
        let observer = host.observe(slot.element());
        tracing::debug!(role = ?slot.role(), element = ?slot.element(), "price guard installed");
        self.watched.push(Watched { slot, observer });
    }

    pub fn slots(&self) -> impl Iterator<Item = &WatchedSlot<H::Node>> {
        self.watched.iter().map(|w| &w.slot)
    }

    pub fn slot(&self, role: SlotRole) -> Option<&WatchedSlot<H::Node>> {
        self.slots().find(|slot| slot.role() == role)
    }

    /// Drains and processes one batch per slot.
    pub fn flush(&mut self, host: &mut H) -> GuardReport {
        let mut report = GuardReport::default();
        for watched in &mut self.watched {
            let records = host.take_records(watched.observer);
            if records.is_empty() {
                continue;
            }
            let batch = process_batch(&self.table, &mut watched.slot, host, &records);
            report.absorb(&batch);
        }
        report.rounds = 1;
        report.converged = report.rewrites == 0;
        report
    }

    /// Flushes until a round produces no rewrites, or `max_rounds` is reached.
    ///
    /// A rewrite is itself observed, so a converging guard always ends with one extra round that
    /// only suppresses.
    pub fn settle(&mut self, host: &mut H, max_rounds: usize) -> GuardReport {
        let mut total = GuardReport::default();
        while total.rounds < max_rounds {
            let round = self.flush(host);
            total.absorb(&round);
            total.rounds += 1;
            if round.rewrites == 0 {
                total.converged = true;
                return total;
            }
        }
        tracing::warn!(
            rounds = total.rounds,
            rewrites = total.rewrites,
            "price guard did not converge"
        );
        total
    }
}

fn process_batch<H: PriceHost>(
    table: &CurrencyTable,
    slot: &mut WatchedSlot<H::Node>,
    host: &mut H,
    records: &[crate::host::MutationRecord<H::Node>],
) -> GuardReport {
    let mut report = GuardReport {
        records: records.len(),
        ..GuardReport::default()
    };
    slot.set_phase(SlotPhase::ChangeDetected);

    for record in records {
        slot.set_phase(SlotPhase::Classifying);
        if !record.kind.is_content() {
            report.dropped += 1;
            continue;
        }
        let Some(element) = slot.classify(&*host, record) else {
            tracing::trace!(
                role = ?slot.role(),
                node = ?record.target,
                "unclassified record dropped"
            );
            report.dropped += 1;
            continue;
        };

        let current = host.text_content(element);
        let canonical = normalize_with(table, &current, slot.keep_decimals());
        match slot.decide(&current, &canonical) {
            Decision::Unchanged | Decision::SelfWritten => {
                slot.set_phase(SlotPhase::Suppressed);
                report.suppressed += 1;
                tracing::trace!(role = ?slot.role(), text = %current, "price write suppressed");
            }
            Decision::Rewrite => {
                slot.set_phase(SlotPhase::Rewriting);
                let canonical = canonical.into_owned();
                slot.remember_write(&canonical);
                host.set_text_content(element, &canonical);
                report.rewrites += 1;
                tracing::debug!(
                    role = ?slot.role(),
                    from = %current,
                    to = %canonical,
                    "price rewritten"
                );
            }
        }
    }

    slot.set_phase(SlotPhase::Idle);
    report
}

#[cfg(test)]
impl<H: PriceHost> PriceGuard<H> {
    pub(crate) fn last_written(&self, role: SlotRole) -> Option<&str> {
        self.slot(role).and_then(|slot| slot.last_written())
    }
}
