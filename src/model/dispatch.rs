//! Subscription bookkeeping and synchronous event dispatch.
//!
//! Each property keeps an ordered list of [`Listener`]s. Internal links wire
//! containers to their children; external observers are registered once with
//! the tree and then subscribed to any number of properties.
//!
//! Dispatch walks a snapshot of the channel's listener list. Before each
//! delivery it re-checks that the channel still exists and the listener is
//! still subscribed, so observers may subscribe, unsubscribe or destroy
//! properties while an event is in flight.

use crate::model::event::{FnObserver, PropertyEvent, PropertyObserver};
use crate::model::id::{ObserverId, PropertyId};
use crate::model::tree::PropertyTree;
use std::rc::Rc;

/// One entry in a property's subscriber list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Listener {
    /// List, Dict or Group watching a child.
    Container(PropertyId),
    /// Dynamic list watching one of its items.
    DynamicListItem(PropertyId),
    /// Dynamic list watching its `length` child.
    DynamicListLength(PropertyId),
    /// Dynamic item watching its implementation.
    DynamicItemImpl(PropertyId),
    Observer(ObserverId),
}

impl PropertyTree {
    /// Register an observer; it receives nothing until subscribed.
    pub fn register_observer(&mut self, observer: Rc<dyn PropertyObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, observer);
        id
    }

    /// Drop an observer and remove it from every subscriber list.
    pub fn unregister_observer(&mut self, observer: ObserverId) -> bool {
        if self.observers.remove(&observer).is_none() {
            return false;
        }
        for node in self.nodes.values_mut() {
            node.listeners.retain(|l| *l != Listener::Observer(observer));
        }
        true
    }

    /// Subscribe a registered observer to `property`'s channel. Subscribing
    /// twice is a no-op.
    pub fn subscribe(&mut self, property: PropertyId, observer: ObserverId) -> bool {
        if !self.observers.contains_key(&observer) {
            tracing::warn!("Cannot subscribe unknown observer {:?}", observer);
            return false;
        }
        self.link(property, Listener::Observer(observer))
    }

    pub fn unsubscribe(&mut self, property: PropertyId, observer: ObserverId) -> bool {
        self.unlink(property, Listener::Observer(observer))
    }

    pub fn is_subscribed(&self, property: PropertyId, observer: ObserverId) -> bool {
        self.has_listener(property, Listener::Observer(observer))
    }

    /// Register `f` as an observer and subscribe it to `property`.
    pub fn observe<F>(&mut self, property: PropertyId, f: F) -> ObserverId
    where
        F: Fn(&mut PropertyTree, PropertyId, &PropertyEvent) + 'static,
    {
        let id = self.register_observer(Rc::new(FnObserver(f)));
        self.subscribe(property, id);
        id
    }

    pub(crate) fn link(&mut self, property: PropertyId, listener: Listener) -> bool {
        match self.get_mut(property) {
            Some(node) => {
                if !node.listeners.contains(&listener) {
                    node.listeners.push(listener);
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn unlink(&mut self, property: PropertyId, listener: Listener) -> bool {
        match self.get_mut(property) {
            Some(node) => {
                let before = node.listeners.len();
                node.listeners.retain(|l| *l != listener);
                node.listeners.len() != before
            }
            None => false,
        }
    }

    fn has_listener(&self, property: PropertyId, listener: Listener) -> bool {
        self.get(property)
            .is_some_and(|node| node.listeners.contains(&listener))
    }

    /// Deliver `event` to every listener on `channel`, in subscription order.
    pub(crate) fn emit(&mut self, channel: PropertyId, event: PropertyEvent) {
        let Some(node) = self.get(channel) else {
            return;
        };
        let snapshot = node.listeners.clone();
        tracing::trace!(
            "{} on {:?} -> {} listeners",
            event.name(),
            channel,
            snapshot.len()
        );

        for listener in snapshot {
            if !self.has_listener(channel, listener) {
                continue;
            }
            self.deliver(channel, listener, &event);
        }
    }

    fn deliver(&mut self, channel: PropertyId, listener: Listener, event: &PropertyEvent) {
        match listener {
            Listener::Observer(id) => {
                let Some(observer) = self.observers.get(&id).cloned() else {
                    return;
                };
                observer.on_event(self, channel, event);
            }
            Listener::Container(container) => self.on_container_child_event(container, channel, event),
            Listener::DynamicListItem(list) => self.on_dynamic_list_item_event(list, channel, event),
            Listener::DynamicListLength(list) => self.on_dynamic_list_length_event(list, channel, event),
            Listener::DynamicItemImpl(item) => self.on_dynamic_item_impl_event(item, event),
        }
    }
}
