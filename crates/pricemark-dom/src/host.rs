use pricemark_core::Marker;
use std::fmt::Debug;

/// What changed in an observed subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Children were added or removed (e.g. an element's text content was replaced).
    ChildList,
    /// A text node's data changed in place.
    CharacterData,
    /// An attribute was set or removed.
    Attributes,
}

impl MutationKind {
    /// Content changes are the only ones that can alter a displayed price.
    pub fn is_content(self) -> bool {
        matches!(self, Self::ChildList | Self::CharacterData)
    }
}

/// A single raw change notification, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord<N> {
    pub kind: MutationKind,
    pub target: N,
    pub attribute_name: Option<String>,
}

impl<N> MutationRecord<N> {
    pub fn child_list(target: N) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            attribute_name: None,
        }
    }

    pub fn character_data(target: N) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            attribute_name: None,
        }
    }

    pub fn attributes(target: N, name: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            attribute_name: Some(name.into()),
        }
    }
}

/// The element tree the price guard runs against.
///
/// Hosts deliver change notifications per observer, in the order the mutations happened. How
/// they are produced (native events, diffing, polling) does not matter to the guard.
pub trait PriceHost {
    type Node: Copy + Eq + Debug;
    type Observer: Copy + Eq + Debug;

    fn text_content(&self, node: Self::Node) -> String;

    fn set_text_content(&mut self, node: Self::Node, text: &str);

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn matches(&self, node: Self::Node, marker: &Marker) -> bool;

    /// Starts queueing records for every content or attribute change inside `node`'s subtree.
    fn observe(&mut self, node: Self::Node) -> Self::Observer;

    /// Drains the records queued for `observer` since the previous call.
    fn take_records(&mut self, observer: Self::Observer) -> Vec<MutationRecord<Self::Node>>;
}
