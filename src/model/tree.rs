//! The property tree: slot storage, creation and the base node contract.
//!
//! Properties live in a [`SlotMap`] keyed by [`PropertyId`]. The tree owns
//! every property; structure is expressed through child lists and non-owning
//! parent links. Freed slots are reused under a new generation, so stale ids
//! resolve to `None`.
//!
//! ```text
//! root            (group, self-hidden)
//! +-- information (group)
//! |   +-- name    (string)
//! |   +-- age     (int)
//! +-- geometry    (list)
//!     +-- x       (float)
//!     +-- y       (float)
//! ```
//!
//! Container and dynamic-list behavior lives in `container.rs` and
//! `dynamic.rs`; dispatch in `dispatch.rs`.

use crate::config::DisplaySettings;
use crate::model::error::{PropertyError, PropertyResult};
use crate::model::event::{PropertyEvent, PropertyObserver};
use crate::model::factory::PropertyFactory;
use crate::model::id::{ObserverId, PropertyId};
use crate::model::node::{KindClass, PropertyKind, PropertyNode};
use crate::model::value::{Color, PropertyValue, ValueIcon};
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub struct PropertyTree {
    pub(crate) nodes: SlotMap<PropertyId, PropertyNode>,
    factory: Rc<PropertyFactory>,
    settings: DisplaySettings,
    pub(crate) observers: BTreeMap<ObserverId, Rc<dyn PropertyObserver>>,
    pub(crate) next_observer: u32,
}

impl fmt::Debug for PropertyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTree")
            .field("live", &self.nodes.len())
            .field("capacity", &self.nodes.capacity())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for PropertyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTree {
    /// Tree backed by a factory with the built-in types.
    pub fn new() -> Self {
        Self::with_factory(PropertyFactory::new())
    }

    pub fn with_factory(factory: PropertyFactory) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            factory: Rc::new(factory),
            settings: DisplaySettings::default(),
            observers: BTreeMap::new(),
            next_observer: 0,
        }
    }

    pub fn with_settings(mut self, settings: DisplaySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Replace the display settings. Values are not re-emitted.
    pub fn set_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
    }

    pub fn factory(&self) -> &PropertyFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut PropertyFactory {
        Rc::make_mut(&mut self.factory)
    }

    /// Number of live properties.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: PropertyId) -> Option<&mut PropertyNode> {
        self.nodes.get_mut(id)
    }

    /// Ids of all live properties, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.nodes.keys()
    }

    // ==================== Creation ====================

    /// Create a property through the factory; `None` for an unregistered tag.
    pub fn create_property(&mut self, tag: &str) -> Option<PropertyId> {
        match self.try_create_property(tag) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    pub fn try_create_property(&mut self, tag: &str) -> PropertyResult<PropertyId> {
        let factory = Rc::clone(&self.factory);
        let (creator, registered) = factory
            .resolve(tag)
            .ok_or_else(|| PropertyError::UnknownType(tag.to_string()))?;
        let id = creator(self, registered);
        if let Some(node) = self.get_mut(id) {
            node.type_tag = tag.to_string();
        }
        tracing::debug!("Created {:?} property {:?}", tag, id);
        Ok(id)
    }

    /// Create a named property.
    ///
    /// # Panics
    ///
    /// If `tag` is not registered.
    pub fn create(&mut self, tag: &str, name: &str) -> PropertyId {
        let id = self
            .try_create_property(tag)
            .unwrap_or_else(|e| panic!("{}", e));
        self.set_name(id, name);
        id
    }

    /// Allocate a property of the given kind. Used by factory creators.
    pub fn insert_node(&mut self, tag: &str, kind: PropertyKind) -> PropertyId {
        self.nodes
            .insert_with_key(|id| PropertyNode::new(id, tag.to_string(), kind))
    }

    // ==================== Value ====================

    pub fn value(&self, id: PropertyId) -> Option<&PropertyValue> {
        self.get(id).map(|n| &n.value)
    }

    /// Set a value. Equal values are ignored; leaves drop values they cannot
    /// coerce; groups ignore every value.
    pub fn set_value(&mut self, id: PropertyId, value: impl Into<PropertyValue>) {
        let value = value.into();
        let Some(node) = self.get(id) else {
            tracing::warn!("set_value on missing property {:?}", id);
            return;
        };
        match node.kind.class() {
            KindClass::Leaf => self.set_leaf_value(id, value),
            KindClass::List => self.set_list_value(id, value),
            KindClass::Dict => self.set_dict_value(id, value),
            KindClass::Group => {}
            KindClass::DynamicList => self.set_dynamic_list_value(id, value),
            KindClass::DynamicItem => {
                if let Some(implementation) = self.implementation(id) {
                    self.set_value(implementation, value);
                }
            }
        }
    }

    fn set_leaf_value(&mut self, id: PropertyId, value: PropertyValue) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let PropertyKind::Leaf(leaf) = &node.kind else {
            return;
        };
        let kind_name = value.kind_name();
        let Some(value) = leaf.coerce(value) else {
            tracing::warn!(
                "{} property {:?} rejected a {} value",
                node.type_tag,
                id,
                kind_name
            );
            return;
        };
        if node.value.same_as(&value) {
            return;
        }
        node.value = value;
        self.emit(id, PropertyEvent::ValueChanged { property: id });
    }

    /// Store a container's own value and emit if it changed.
    pub(crate) fn store_value(&mut self, id: PropertyId, value: PropertyValue) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.value.same_as(&value) {
            return false;
        }
        node.value = value;
        self.emit(id, PropertyEvent::ValueChanged { property: id });
        true
    }

    /// Canonical display text of a property's value.
    pub fn value_string(&self, id: PropertyId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.kind {
            PropertyKind::Leaf(leaf) => leaf.display(&node.value, &node.attributes, &self.settings),
            PropertyKind::Group => String::new(),
            PropertyKind::List => self.bracketed(&node.children),
            PropertyKind::DynamicList { items, .. } => self.bracketed(items),
            PropertyKind::Dict => {
                let entries: Vec<String> = node
                    .children
                    .iter()
                    .filter_map(|c| self.get(*c))
                    .map(|c| format!("{}: {}", c.name, self.value_string(c.id)))
                    .collect();
                format!("{{{}}}", entries.join(&self.settings.list_separator))
            }
            PropertyKind::DynamicItem { implementation } => implementation
                .map(|imp| self.value_string(imp))
                .unwrap_or_default(),
        }
    }

    /// `[` + each child's text followed by the separator + `]`.
    fn bracketed(&self, children: &[PropertyId]) -> String {
        let mut text = String::from("[");
        for child in children {
            text.push_str(&self.value_string(*child));
            text.push_str(&self.settings.list_separator);
        }
        text.push(']');
        text
    }

    pub fn value_icon(&self, id: PropertyId) -> ValueIcon {
        let Some(node) = self.get(id) else {
            return ValueIcon::None;
        };
        match &node.kind {
            PropertyKind::Leaf(leaf) => leaf.icon(&node.value),
            PropertyKind::DynamicItem {
                implementation: Some(imp),
            } => self.value_icon(*imp),
            _ => ValueIcon::None,
        }
    }

    pub fn has_value(&self, id: PropertyId) -> bool {
        self.get(id).is_some_and(PropertyNode::has_value)
    }

    /// Editors may override this notion; the model itself never tracks it.
    pub fn is_modified(&self, _id: PropertyId) -> bool {
        false
    }

    // ==================== Metadata ====================

    pub fn type_tag(&self, id: PropertyId) -> Option<&str> {
        self.get(id).map(PropertyNode::type_tag)
    }

    pub fn name(&self, id: PropertyId) -> Option<&str> {
        self.get(id).map(PropertyNode::name)
    }

    pub fn title(&self, id: PropertyId) -> Option<&str> {
        self.get(id).map(PropertyNode::title)
    }

    pub fn set_name(&mut self, id: PropertyId, name: &str) {
        self.update_meta(id, |node| {
            if node.name == name {
                return false;
            }
            node.name = name.to_string();
            true
        });
    }

    pub fn set_title(&mut self, id: PropertyId, title: &str) {
        self.update_meta(id, |node| {
            if node.title == title {
                return false;
            }
            node.title = title.to_string();
            true
        });
    }

    pub fn set_visible(&mut self, id: PropertyId, visible: bool) {
        self.update_meta(id, |node| {
            let changed = node.visible != visible;
            node.visible = visible;
            changed
        });
    }

    pub fn set_background_color(&mut self, id: PropertyId, color: Option<Color>) {
        self.update_meta(id, |node| {
            let changed = node.background_color != color;
            node.background_color = color;
            changed
        });
    }

    pub fn set_tooltip(&mut self, id: PropertyId, tooltip: &str) {
        if let Some(node) = self.get_mut(id) {
            node.tooltip = tooltip.to_string();
        }
    }

    pub fn set_self_visible(&mut self, id: PropertyId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.self_visible = visible;
        }
    }

    pub fn set_menu_visible(&mut self, id: PropertyId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.menu_visible = visible;
        }
    }

    fn update_meta(&mut self, id: PropertyId, apply: impl FnOnce(&mut PropertyNode) -> bool) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if apply(node) {
            self.emit(id, PropertyEvent::PropertyChanged { property: id });
        }
    }

    /// Forward a context-menu request; ignored unless the menu is enabled.
    pub fn request_popup_menu(&mut self, id: PropertyId) {
        if self.get(id).is_some_and(|n| n.menu_visible) {
            self.emit(id, PropertyEvent::PopupMenuRequested { property: id });
        }
    }

    // ==================== Attributes ====================

    pub fn attribute(&self, id: PropertyId, name: &str) -> Option<&PropertyValue> {
        self.get(id)?.attributes.get(name)
    }

    pub fn has_attribute(&self, id: PropertyId, name: &str) -> bool {
        self.get(id).is_some_and(|n| n.attributes.contains(name))
    }

    /// Store an attribute. Always notifies, even when the value is unchanged.
    pub fn set_attribute(&mut self, id: PropertyId, name: &str, value: impl Into<PropertyValue>) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.attributes.insert(name, value.into());
        self.emit(
            id,
            PropertyEvent::AttributeChanged {
                property: id,
                name: name.to_string(),
            },
        );
    }

    // ==================== Structure ====================

    pub fn parent(&self, id: PropertyId) -> Option<PropertyId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: PropertyId) -> &[PropertyId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn index_of_child(&self, parent: PropertyId, child: PropertyId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    fn is_ancestor_or_self(&self, candidate: PropertyId, of: PropertyId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append `child` under `parent`.
    ///
    /// # Panics
    ///
    /// If `child` already has a parent, either id is stale, or the insertion
    /// would create a cycle.
    pub fn add_child(&mut self, parent: PropertyId, child: PropertyId) {
        if let Err(e) = self.try_add_child(parent, child) {
            panic!("add_child: {}", e);
        }
    }

    pub fn try_add_child(&mut self, parent: PropertyId, child: PropertyId) -> PropertyResult<()> {
        if !self.contains(parent) {
            return Err(PropertyError::InvalidId(parent));
        }
        let child_node = self.get(child).ok_or(PropertyError::InvalidId(child))?;
        if let Some(current) = child_node.parent {
            return Err(PropertyError::AlreadyParented {
                child,
                parent: current,
            });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(PropertyError::CycleDetected { child, parent });
        }

        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        self.on_child_added(parent, child);
        tracing::debug!("Added {:?} under {:?}", child, parent);

        self.emit(parent, PropertyEvent::PropertyInserted { child, parent });
        self.refresh_container_value(parent);
        Ok(())
    }

    /// Detach `child` from `parent` without destroying it.
    ///
    /// # Panics
    ///
    /// If `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: PropertyId, child: PropertyId) {
        if let Err(e) = self.try_remove_child(parent, child) {
            panic!("remove_child: {}", e);
        }
    }

    pub fn try_remove_child(&mut self, parent: PropertyId, child: PropertyId) -> PropertyResult<()> {
        if !self.contains(parent) {
            return Err(PropertyError::InvalidId(parent));
        }
        if self.parent(child) != Some(parent) {
            return Err(PropertyError::NotAChild { child, parent });
        }
        if self.length_property(parent) == Some(child) {
            return Err(PropertyError::LengthChild { child, parent });
        }

        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        self.on_child_removed(parent, child);
        tracing::debug!("Removed {:?} from {:?}", child, parent);

        self.emit(
            parent,
            PropertyEvent::PropertyRemoved {
                child,
                parent: Some(parent),
            },
        );
        self.refresh_container_value(parent);
        Ok(())
    }

    /// Detach from the current parent, if any. A dynamic list keeps its
    /// `length` child.
    pub fn remove_from_parent(&mut self, id: PropertyId) {
        if let Some(parent) = self.parent(id) {
            if let Err(e) = self.try_remove_child(parent, id) {
                tracing::warn!("remove_from_parent: {}", e);
            }
        }
    }

    /// Detach every child, destroying each one when `destroy` is set. A
    /// dynamic list keeps its `length` child.
    pub fn remove_all_children(&mut self, id: PropertyId, destroy: bool) {
        let children = self.children(id).to_vec();
        let length = self.length_property(id);
        for child in children {
            if self.parent(child) != Some(id) || Some(child) == length {
                continue;
            }
            if destroy {
                self.destroy(child);
            } else {
                self.remove_child(id, child);
            }
        }
    }

    /// Destroy a property and its whole subtree.
    ///
    /// A parented property is first detached, which notifies the parent's
    /// channel; a root announces its own removal on its channel. Children are
    /// then destroyed depth-first. The `length` child of a dynamic list is
    /// only destroyed together with its list.
    pub fn destroy(&mut self, id: PropertyId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let parent = node.parent;
        if let Some(parent) = parent.filter(|p| self.length_property(*p) == Some(id)) {
            tracing::warn!("Cannot destroy length property {:?} of {:?}", id, parent);
            return;
        }
        match parent {
            Some(parent) => self.remove_child(parent, id),
            None => self.emit(
                id,
                PropertyEvent::PropertyRemoved {
                    child: id,
                    parent: None,
                },
            ),
        }
        // An observer may have destroyed it already
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        let implementation = match &mut node.kind {
            PropertyKind::DynamicItem { implementation } => *implementation,
            PropertyKind::DynamicList { items, .. } => {
                items.clear();
                None
            }
            _ => None,
        };

        for child in children {
            if let Some(child_node) = self.get_mut(child) {
                child_node.parent = None;
            }
            self.on_child_removed(id, child);
            self.destroy(child);
        }
        if let Some(implementation) = implementation {
            self.destroy(implementation);
        }

        if self.nodes.remove(id).is_some() {
            tracing::debug!("Destroyed property {:?}", id);
        }
    }
}
