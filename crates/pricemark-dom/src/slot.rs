use crate::host::{MutationRecord, PriceHost};
use pricemark_core::Marker;
use serde::Serialize;

/// The three price-bearing positions of a product surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    /// The product price; decimals kept.
    Main,
    /// The struck-through "compare at" price; decimals kept.
    Compare,
    /// The price shown on the add-to-cart button; decimals stripped.
    Cart,
}

impl SlotRole {
    pub const ALL: [SlotRole; 3] = [SlotRole::Main, SlotRole::Compare, SlotRole::Cart];

    pub fn keeps_decimals(self) -> bool {
        !matches!(self, Self::Cart)
    }

    /// Config key holding this role's marker.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Main => "slots.main",
            Self::Compare => "slots.compare",
            Self::Cart => "slots.cart",
        }
    }
}

/// Where a slot is in its observe/correct cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotPhase {
    #[default]
    Idle,
    ChangeDetected,
    Classifying,
    Suppressed,
    Rewriting,
}

/// A price element under guard, with the last value the guard itself wrote into it.
///
/// The element's text stays the source of truth; `last_written` only exists to recognize the
/// guard's own writes when they come back as mutation records.
#[derive(Debug, Clone)]
pub struct WatchedSlot<N> {
    role: SlotRole,
    element: N,
    marker: Marker,
    last_written: Option<String>,
    phase: SlotPhase,
}

/// Outcome of checking a freshly normalized value against a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Already canonical.
    Unchanged,
    /// Equal to what the guard wrote last; writing again could loop.
    SelfWritten,
    Rewrite,
}

impl<N: Copy + Eq> WatchedSlot<N> {
    pub fn new(role: SlotRole, element: N, marker: Marker) -> Self {
        Self {
            role,
            element,
            marker,
            last_written: None,
            phase: SlotPhase::Idle,
        }
    }

    pub fn role(&self) -> SlotRole {
        self.role
    }

    pub fn element(&self) -> N {
        self.element
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn keep_decimals(&self) -> bool {
        self.role.keeps_decimals()
    }

    pub fn phase(&self) -> SlotPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: SlotPhase) {
        self.phase = phase;
    }

    #[cfg(test)]
    pub(crate) fn last_written(&self) -> Option<&str> {
        self.last_written.as_deref()
    }

    /// Resolves the element a record belongs to: the target itself when it carries the marker,
    /// else its direct parent when that does. Anything else is not ours.
    pub(crate) fn classify<H>(&self, host: &H, record: &MutationRecord<N>) -> Option<N>
    where
        H: PriceHost<Node = N>,
    {
        if host.matches(record.target, &self.marker) {
            return Some(record.target);
        }
        host.parent(record.target)
            .filter(|parent| host.matches(*parent, &self.marker))
    }

    pub(crate) fn decide(&self, current: &str, canonical: &str) -> Decision {
        if canonical == current {
            Decision::Unchanged
        } else if self.last_written.as_deref() == Some(canonical) {
            Decision::SelfWritten
        } else {
            Decision::Rewrite
        }
    }

    /// Remembers `value` as the guard's own write. Must happen before the write itself.
    pub(crate) fn remember_write(&mut self, value: &str) {
        self.last_written = Some(value.to_string());
    }
}
