//! Change-notification protocol.
//!
//! Every mutation follows the same discipline: snapshot the prior state,
//! apply the change, then publish a [`ChangeContext`] synchronously to the
//! mutated node's observers in subscription order, on the caller's thread.

use crate::property::Property;

/// What a mutation did to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A scalar node's held value was replaced.
    ValueChanged,
    /// A child was inserted into a container.
    ChildAdded,
    /// A child was detached from a container.
    ChildRemoved,
    /// A container slot now holds a different child.
    ChildReplaced,
    /// A stream's encoded buffer was rewritten (`Length` updated with it).
    BufferChanged,
}

/// The container slot a child mutation touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildKey {
    Index(usize),
    Name(String),
}

/// Context published to observers after a mutation.
///
/// `before` is a detached deep snapshot of the prior state — the old
/// scalar value, the old child, or for buffer mutations the whole prior
/// stream node — sufficient to undo the exact operation. It shares no
/// structure with the live node.
pub struct ChangeContext {
    pub kind: ChangeKind,
    pub key: Option<ChildKey>,
    pub before: Option<Property>,
}

impl ChangeContext {
    pub(crate) fn value_changed(before: Property) -> Self {
        Self {
            kind: ChangeKind::ValueChanged,
            key: None,
            before: Some(before),
        }
    }

    pub(crate) fn child_added(key: ChildKey) -> Self {
        Self {
            kind: ChangeKind::ChildAdded,
            key: Some(key),
            before: None,
        }
    }

    pub(crate) fn child_removed(key: ChildKey, before: Property) -> Self {
        Self {
            kind: ChangeKind::ChildRemoved,
            key: Some(key),
            before: Some(before),
        }
    }

    pub(crate) fn child_replaced(key: ChildKey, before: Property) -> Self {
        Self {
            kind: ChangeKind::ChildReplaced,
            key: Some(key),
            before: Some(before),
        }
    }

    pub(crate) fn buffer_changed(before: Property) -> Self {
        Self {
            kind: ChangeKind::BufferChanged,
            key: None,
            before: Some(before),
        }
    }
}

/// Observer of node mutations.
///
/// Callbacks run synchronously while the mutated node is quiescent:
/// reading it from inside the callback is fine, but mutating it again is
/// rejected with `InvalidOperation` until the notification round ends.
pub trait ChangeObserver {
    fn property_changed(&self, context: &ChangeContext);
}
