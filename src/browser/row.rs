//! One displayed row of the tree browser.

use crate::model::{Color, PropertyId, PropertyTree, ValueIcon};

/// Snapshot of what a tree view shows for one self-visible property
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserRow {
    pub property: PropertyId,
    /// First column
    pub title: String,
    /// Second column, empty when the row spans both columns
    pub value: String,
    pub icon: ValueIcon,
    pub tooltip: String,
    pub background: Option<Color>,
    /// Hidden rows keep their place but are not rendered
    pub hidden: bool,
    /// The property has no value, so its title spans both columns
    pub spans_columns: bool,
    /// Rows shown beneath this one, in property order
    pub children: Vec<PropertyId>,
}

impl BrowserRow {
    pub(crate) fn from_tree(tree: &PropertyTree, id: PropertyId) -> Option<Self> {
        let node = tree.get(id)?;
        let mut row = Self {
            property: id,
            title: String::new(),
            value: String::new(),
            icon: ValueIcon::None,
            tooltip: String::new(),
            background: None,
            hidden: false,
            spans_columns: !node.has_value(),
            children: Vec::new(),
        };
        row.refresh_header(tree);
        row.refresh_value(tree);
        Some(row)
    }

    /// Re-read title, tooltip, visibility and background.
    pub(crate) fn refresh_header(&mut self, tree: &PropertyTree) {
        let Some(node) = tree.get(self.property) else {
            return;
        };
        self.title = node.title().to_string();
        self.tooltip = node.tooltip().to_string();
        self.hidden = !node.is_visible();
        self.background = node.background_color();
    }

    /// Re-read the value column.
    pub(crate) fn refresh_value(&mut self, tree: &PropertyTree) {
        if self.spans_columns {
            return;
        }
        self.value = tree.value_string(self.property);
        self.icon = tree.value_icon(self.property);
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
