//! Dynamic lists and dynamic items.
//!
//! A dynamic list owns an integer `length` child followed by `length` items.
//! Every item is a dynamic item: a slot whose type and value are delegated
//! to an implementation property created from the list's `valueType`
//! attribute. The implementation is owned by the item but is not one of its
//! children.
//!
//! ```text
//! files            (dynamic_list, valueType = "file")
//! +-- length       (int, 2)
//! +-- 1            (dynamic_item -> file impl)
//! +-- 2            (dynamic_item -> file impl)
//! ```
//!
//! Items ask the list to reorder or delete them by emitting
//! `MoveUpRequested` / `MoveDownRequested` / `DeleteRequested` on their own
//! channel; editing the `length` child resizes the list.

use crate::model::attributes::names;
use crate::model::dispatch::Listener;
use crate::model::error::{PropertyError, PropertyResult};
use crate::model::event::PropertyEvent;
use crate::model::id::PropertyId;
use crate::model::node::PropertyKind;
use crate::model::property_type;
use crate::model::tree::PropertyTree;
use crate::model::value::PropertyValue;

impl PropertyTree {
    pub(crate) fn insert_dynamic_list(&mut self, tag: &str) -> PropertyId {
        let list = self.insert_node(
            tag,
            PropertyKind::DynamicList {
                length: PropertyId::invalid(),
                items: Vec::new(),
            },
        );

        let length = self.create(property_type::INT, "length");
        self.set_title(length, "Length");
        self.set_attribute(length, names::MIN_VALUE, 0);
        self.set_value(length, 0);
        if let Some(PropertyKind::DynamicList { length: slot, .. }) =
            self.get_mut(list).map(|n| &mut n.kind)
        {
            *slot = length;
        }
        self.add_child(list, length);
        self.link(length, Listener::DynamicListLength(list));
        list
    }

    /// Items of a dynamic list, in order. Empty for anything else.
    pub fn dynamic_items(&self, list: PropertyId) -> &[PropertyId] {
        match self.get(list).map(|n| &n.kind) {
            Some(PropertyKind::DynamicList { items, .. }) => items,
            _ => &[],
        }
    }

    /// The `length` child of a dynamic list.
    pub fn length_property(&self, list: PropertyId) -> Option<PropertyId> {
        match self.get(list)?.kind {
            PropertyKind::DynamicList { length, .. } if length.is_valid() => Some(length),
            _ => None,
        }
    }

    pub(crate) fn dynamic_list_value_of(&self, list: PropertyId) -> PropertyValue {
        PropertyValue::List(
            self.dynamic_items(list)
                .iter()
                .map(|item| self.value(*item).cloned().unwrap_or_default())
                .collect(),
        )
    }

    fn ensure_dynamic_list(&self, list: PropertyId) -> PropertyResult<()> {
        match self.get(list).map(|n| &n.kind) {
            Some(PropertyKind::DynamicList { .. }) => Ok(()),
            Some(_) => Err(PropertyError::NotADynamicList(list)),
            None => Err(PropertyError::InvalidId(list)),
        }
    }

    /// Resize to `length` (clamped at zero), appending default-initialized
    /// items or destroying trailing ones, then sync the `length` child.
    pub fn set_length(&mut self, list: PropertyId, length: i64) {
        if let Err(e) = self.ensure_dynamic_list(list) {
            tracing::warn!("set_length: {}", e);
            return;
        }
        let target = length.max(0) as usize;

        while self.dynamic_items(list).len() < target {
            self.append_item(list);
        }
        while self.dynamic_items(list).len() > target {
            self.pop_item(list);
        }

        if let Some(length) = self.length_property(list) {
            self.set_value(length, target as i64);
        }
        self.refresh_container_value(list);
    }

    fn append_item(&mut self, list: PropertyId) -> PropertyId {
        let Some(node) = self.get(list) else {
            return PropertyId::invalid();
        };
        let value_type = node
            .attributes
            .str(names::VALUE_TYPE)
            .unwrap_or(property_type::STRING)
            .to_string();
        let default = node
            .attributes
            .get(names::VALUE_DEFAULT)
            .cloned()
            .unwrap_or_default();
        let item_attributes: Vec<(String, PropertyValue)> = node
            .attributes
            .get(names::VALUE_ATTRIBUTES)
            .and_then(PropertyValue::as_map)
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let item = self
            .try_create_property(property_type::DYNAMIC_ITEM)
            .unwrap_or_else(|e| panic!("append_item: {}", e));
        self.set_value_type(item, &value_type);
        self.set_value(item, default);
        if let Some(implementation) = self.implementation(item) {
            for (name, value) in item_attributes {
                self.set_attribute(implementation, &name, value);
            }
        }
        self.link(item, Listener::DynamicListItem(list));

        let position = match self.get_mut(list).map(|n| &mut n.kind) {
            Some(PropertyKind::DynamicList { items, .. }) => {
                items.push(item);
                items.len()
            }
            _ => 0,
        };
        self.set_name(item, &position.to_string());
        self.add_child(list, item);
        item
    }

    fn pop_item(&mut self, list: PropertyId) {
        let item = match self.get_mut(list).map(|n| &mut n.kind) {
            Some(PropertyKind::DynamicList { items, .. }) => items.pop(),
            _ => None,
        };
        let Some(item) = item else {
            return;
        };
        self.unlink(item, Listener::DynamicListItem(list));
        self.remove_child(list, item);
        self.destroy(item);
    }

    /// Drop an item that left its list through `remove_child` or `destroy`,
    /// then renumber the rest and sync `length`.
    pub(crate) fn forget_dynamic_item(&mut self, parent: PropertyId, child: PropertyId) {
        let removed = match self.get_mut(parent).map(|n| &mut n.kind) {
            Some(PropertyKind::DynamicList { items, .. }) => {
                let before = items.len();
                items.retain(|i| *i != child);
                items.len() != before
            }
            _ => false,
        };
        if !removed {
            return;
        }
        self.unlink(child, Listener::DynamicListItem(parent));
        tracing::debug!("Item {:?} left dynamic list {:?}", child, parent);

        let items = self.dynamic_items(parent).to_vec();
        for (position, item) in items.iter().enumerate() {
            self.set_name(*item, &(position + 1).to_string());
        }
        if let Some(length) = self.length_property(parent) {
            self.set_value(length, items.len() as i64);
        }
    }

    /// Length from an array's size, then positional assignment.
    pub(crate) fn set_dynamic_list_value(&mut self, list: PropertyId, value: PropertyValue) {
        let values = match value {
            PropertyValue::List(values) => values,
            PropertyValue::None => Vec::new(),
            other => {
                tracing::warn!("Dynamic list {:?} rejected a {} value", list, other.kind_name());
                return;
            }
        };
        if self
            .value(list)
            .and_then(PropertyValue::as_list)
            .is_some_and(|current| PropertyValue::same_items(current, &values))
        {
            return;
        }

        self.set_length(list, values.len() as i64);
        let items = self.dynamic_items(list).to_vec();
        for (item, value) in items.into_iter().zip(values) {
            self.set_value(item, value);
        }
        self.refresh_container_value(list);
    }

    fn item_position(&self, list: PropertyId, item: PropertyId) -> Option<usize> {
        self.dynamic_items(list).iter().position(|i| *i == item)
    }

    fn swap_item_values(&mut self, a: PropertyId, b: PropertyId) {
        let value_a = self.value(a).cloned().unwrap_or_default();
        let value_b = self.value(b).cloned().unwrap_or_default();
        self.set_value(a, value_b);
        self.set_value(b, value_a);
    }

    /// Exchange an item's value with its predecessor's; no-op for the first.
    pub fn move_item_up(&mut self, list: PropertyId, item: PropertyId) {
        let Some(i) = self.item_position(list, item) else {
            return;
        };
        if i == 0 {
            return;
        }
        let prev = self.dynamic_items(list)[i - 1];
        self.swap_item_values(prev, item);
    }

    /// Exchange an item's value with its successor's; no-op for the last.
    pub fn move_item_down(&mut self, list: PropertyId, item: PropertyId) {
        let Some(i) = self.item_position(list, item) else {
            return;
        };
        let Some(&next) = self.dynamic_items(list).get(i + 1) else {
            return;
        };
        self.swap_item_values(next, item);
    }

    /// Shift the values after `item` one slot left, then drop the last item.
    pub fn delete_item(&mut self, list: PropertyId, item: PropertyId) {
        let Some(start) = self.item_position(list, item) else {
            return;
        };
        let items = self.dynamic_items(list).to_vec();
        for pair in items[start..].windows(2) {
            let next = self.value(pair[1]).cloned().unwrap_or_default();
            self.set_value(pair[0], next);
        }
        self.set_length(list, items.len() as i64 - 1);
    }

    pub fn request_move_up(&mut self, item: PropertyId) {
        if self.contains(item) {
            self.emit(item, PropertyEvent::MoveUpRequested { item });
        }
    }

    pub fn request_move_down(&mut self, item: PropertyId) {
        if self.contains(item) {
            self.emit(item, PropertyEvent::MoveDownRequested { item });
        }
    }

    pub fn request_delete(&mut self, item: PropertyId) {
        if self.contains(item) {
            self.emit(item, PropertyEvent::DeleteRequested { item });
        }
    }

    pub(crate) fn on_dynamic_list_item_event(
        &mut self,
        list: PropertyId,
        item: PropertyId,
        event: &PropertyEvent,
    ) {
        match event {
            PropertyEvent::ValueChanged { .. } => self.refresh_container_value(list),
            PropertyEvent::MoveUpRequested { .. } => self.move_item_up(list, item),
            PropertyEvent::MoveDownRequested { .. } => self.move_item_down(list, item),
            PropertyEvent::DeleteRequested { .. } => self.delete_item(list, item),
            _ => {}
        }
    }

    pub(crate) fn on_dynamic_list_length_event(
        &mut self,
        list: PropertyId,
        length: PropertyId,
        event: &PropertyEvent,
    ) {
        if let PropertyEvent::ValueChanged { .. } = event {
            let requested = self.value(length).and_then(PropertyValue::as_int).unwrap_or(0);
            self.set_length(list, requested);
        }
    }

    // ==================== Dynamic item ====================

    /// The implementation property behind a dynamic item.
    pub fn implementation(&self, item: PropertyId) -> Option<PropertyId> {
        match self.get(item)?.kind {
            PropertyKind::DynamicItem { implementation } => implementation,
            _ => None,
        }
    }

    /// Type tag of a dynamic item's implementation.
    pub fn value_type(&self, item: PropertyId) -> Option<&str> {
        self.type_tag(self.implementation(item)?)
    }

    /// Swap a dynamic item's implementation for a new one of type `tag`.
    ///
    /// # Panics
    ///
    /// If `tag` is not registered or `item` is not a dynamic item.
    pub fn set_value_type(&mut self, item: PropertyId, tag: &str) {
        if let Err(e) = self.try_set_value_type(item, tag) {
            panic!("set_value_type: {}", e);
        }
    }

    pub fn try_set_value_type(&mut self, item: PropertyId, tag: &str) -> PropertyResult<()> {
        let node = self.get(item).ok_or(PropertyError::InvalidId(item))?;
        let PropertyKind::DynamicItem { implementation } = node.kind else {
            return Err(PropertyError::NotADynamicItem(item));
        };
        if let Some(current) = implementation {
            if self.type_tag(current) == Some(tag) {
                return Ok(());
            }
        }

        // Create first so an unknown tag leaves the old implementation intact
        let replacement = self.try_create_property(tag)?;
        if let Some(PropertyKind::DynamicItem { implementation }) =
            self.get_mut(item).map(|n| &mut n.kind)
        {
            *implementation = Some(replacement);
        }
        if let Some(previous) = implementation {
            self.unlink(previous, Listener::DynamicItemImpl(item));
            self.destroy(previous);
        }
        self.link(replacement, Listener::DynamicItemImpl(item));
        tracing::debug!("Dynamic item {:?} now holds a {:?}", item, tag);

        let value = self.value(replacement).cloned().unwrap_or_default();
        self.store_value(item, value);
        Ok(())
    }

    pub(crate) fn on_dynamic_item_impl_event(&mut self, item: PropertyId, event: &PropertyEvent) {
        if let PropertyEvent::ValueChanged { .. } = event {
            let Some(implementation) = self.implementation(item) else {
                return;
            };
            let value = self.value(implementation).cloned().unwrap_or_default();
            self.store_value(item, value);
        }
    }
}
