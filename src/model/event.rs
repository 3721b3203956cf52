//! Change notifications and observers.
//!
//! Every property owns a notification channel. Mutations emit a
//! [`PropertyEvent`] on the relevant channel and the tree invokes each
//! subscriber synchronously, in subscription order, before the mutating call
//! returns. Observers receive the tree mutably and may mutate it further;
//! nested dispatch runs to completion inside the outer one.
//!
//! Channels used for each event:
//!
//! | Event | Channel |
//! |---|---|
//! | `ValueChanged` | the changed property (groups re-emit on their own) |
//! | `PropertyInserted` / `PropertyRemoved` | the parent |
//! | `PropertyRemoved` with no parent | the destroyed root itself |
//! | everything else | the property named in the payload |

use crate::model::id::PropertyId;
use crate::model::tree::PropertyTree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyEvent {
    /// The value of `property` actually changed.
    ValueChanged { property: PropertyId },
    /// `child` was appended under `parent`.
    PropertyInserted { child: PropertyId, parent: PropertyId },
    /// `child` was detached from `parent`, or destroyed as a root.
    PropertyRemoved {
        child: PropertyId,
        parent: Option<PropertyId>,
    },
    /// Name, title, visibility or background color changed.
    PropertyChanged { property: PropertyId },
    /// `set_attribute` was called, whether or not the value differs.
    AttributeChanged { property: PropertyId, name: String },
    /// A context menu was requested for a menu-enabled property.
    PopupMenuRequested { property: PropertyId },
    /// A dynamic-list item asked to swap with its predecessor.
    MoveUpRequested { item: PropertyId },
    /// A dynamic-list item asked to swap with its successor.
    MoveDownRequested { item: PropertyId },
    /// A dynamic-list item asked to be deleted.
    DeleteRequested { item: PropertyId },
}

impl PropertyEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyEvent::ValueChanged { .. } => "value-changed",
            PropertyEvent::PropertyInserted { .. } => "property-inserted",
            PropertyEvent::PropertyRemoved { .. } => "property-removed",
            PropertyEvent::PropertyChanged { .. } => "property-changed",
            PropertyEvent::AttributeChanged { .. } => "attribute-changed",
            PropertyEvent::PopupMenuRequested { .. } => "popup-menu-requested",
            PropertyEvent::MoveUpRequested { .. } => "move-up-requested",
            PropertyEvent::MoveDownRequested { .. } => "move-down-requested",
            PropertyEvent::DeleteRequested { .. } => "delete-requested",
        }
    }

    /// The property the payload is about.
    pub fn subject(&self) -> PropertyId {
        match self {
            PropertyEvent::ValueChanged { property }
            | PropertyEvent::PropertyChanged { property }
            | PropertyEvent::AttributeChanged { property, .. }
            | PropertyEvent::PopupMenuRequested { property } => *property,
            PropertyEvent::PropertyInserted { child, .. }
            | PropertyEvent::PropertyRemoved { child, .. } => *child,
            PropertyEvent::MoveUpRequested { item }
            | PropertyEvent::MoveDownRequested { item }
            | PropertyEvent::DeleteRequested { item } => *item,
        }
    }
}

/// Receiver of property notifications.
///
/// `channel` is the property whose channel carried the event, which differs
/// from the payload for structural events and group re-emissions.
pub trait PropertyObserver {
    fn on_event(&self, tree: &mut PropertyTree, channel: PropertyId, event: &PropertyEvent);
}

/// Adapter turning a closure into an observer.
pub struct FnObserver<F>(pub F);

impl<F> PropertyObserver for FnObserver<F>
where
    F: Fn(&mut PropertyTree, PropertyId, &PropertyEvent),
{
    fn on_event(&self, tree: &mut PropertyTree, channel: PropertyId, event: &PropertyEvent) {
        (self.0)(tree, channel, event)
    }
}
