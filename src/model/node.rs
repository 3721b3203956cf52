//! Property node storage.
//!
//! A [`PropertyNode`] holds everything the tree knows about one property:
//! identity, display metadata, value, attributes, structure links and its
//! subscriber list. Nodes are only mutated through
//! [`PropertyTree`](super::PropertyTree) so that every change goes through
//! the notification protocol.

use crate::model::attributes::AttributeStore;
use crate::model::dispatch::Listener;
use crate::model::id::PropertyId;
use crate::model::leaf::Leaf;
use crate::model::value::{Color, PropertyValue};

/// Behavioral variant of a property.
#[derive(Debug)]
pub enum PropertyKind {
    Leaf(Leaf),
    /// Value is the ordered array of child values.
    List,
    /// Value maps each child's name to its value.
    Dict,
    /// Valueless grouping; re-emits child value changes.
    Group,
    /// Resizable homogeneous list backed by a `length` child.
    DynamicList {
        length: PropertyId,
        items: Vec<PropertyId>,
    },
    /// Slot delegating to an owned implementation property.
    DynamicItem { implementation: Option<PropertyId> },
}

/// Payload-free discriminator of [`PropertyKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindClass {
    Leaf,
    List,
    Dict,
    Group,
    DynamicList,
    DynamicItem,
}

impl PropertyKind {
    pub fn class(&self) -> KindClass {
        match self {
            PropertyKind::Leaf(_) => KindClass::Leaf,
            PropertyKind::List => KindClass::List,
            PropertyKind::Dict => KindClass::Dict,
            PropertyKind::Group => KindClass::Group,
            PropertyKind::DynamicList { .. } => KindClass::DynamicList,
            PropertyKind::DynamicItem { .. } => KindClass::DynamicItem,
        }
    }

    /// Value a freshly created property of this kind starts with.
    pub(crate) fn initial_value(&self) -> PropertyValue {
        match self {
            PropertyKind::List | PropertyKind::DynamicList { .. } => PropertyValue::List(Vec::new()),
            PropertyKind::Dict => PropertyValue::Map(Default::default()),
            _ => PropertyValue::None,
        }
    }
}

/// A single property in the tree.
#[derive(Debug)]
pub struct PropertyNode {
    pub(crate) id: PropertyId,
    pub(crate) type_tag: String,
    pub(crate) name: String,
    /// Explicit title; empty means "use the name".
    pub(crate) title: String,
    pub(crate) tooltip: String,
    pub(crate) background_color: Option<Color>,
    pub(crate) value: PropertyValue,
    pub(crate) attributes: AttributeStore,
    pub(crate) visible: bool,
    pub(crate) self_visible: bool,
    pub(crate) menu_visible: bool,
    pub(crate) children: Vec<PropertyId>,
    pub(crate) parent: Option<PropertyId>,
    pub(crate) kind: PropertyKind,
    pub(crate) listeners: Vec<Listener>,
}

impl PropertyNode {
    pub(crate) fn new(id: PropertyId, type_tag: String, kind: PropertyKind) -> Self {
        Self {
            id,
            type_tag,
            name: String::new(),
            title: String::new(),
            tooltip: String::new(),
            background_color: None,
            value: kind.initial_value(),
            attributes: AttributeStore::new(),
            visible: true,
            self_visible: true,
            menu_visible: false,
            children: Vec::new(),
            parent: None,
            kind,
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display title, falling back to the name when none was set.
    pub fn title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the property gets its own row; children of a hidden-self
    /// property are shown in its place.
    pub fn is_self_visible(&self) -> bool {
        self.self_visible
    }

    pub fn is_menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn children(&self) -> &[PropertyId] {
        &self.children
    }

    pub fn parent(&self) -> Option<PropertyId> {
        self.parent
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Every variant except Group carries a value.
    pub fn has_value(&self) -> bool {
        self.kind.class() != KindClass::Group
    }
}
