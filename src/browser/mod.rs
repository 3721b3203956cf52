//! Headless tree browser
//!
//! [`TreeBrowser`] keeps the row model a two-column tree view would show for
//! a property tree, without any UI toolkit. Every self-visible property gets
//! a row; a property that is not self-visible is transparent and its
//! children's rows attach to the nearest visible ancestor row instead.
//!
//! The browser subscribes to every property under its root and follows the
//! tree from then on:
//! - `property-inserted` / `property-removed` add and drop rows
//! - `value-changed` and `attribute-changed` refresh the value column
//! - `property-changed` refreshes title, tooltip and hidden state
//!
//! # Example
//!
//! ```ignore
//! let browser = TreeBrowser::new(&mut tree);
//! browser.attach(&mut tree, root);
//! browser.expand_all();
//! println!("{}", browser.render_text());
//! ```

mod row;

pub use row::BrowserRow;

use crate::model::{ObserverId, PropertyEvent, PropertyId, PropertyObserver, PropertyTree};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::rc::Rc;

/// Structural children as last seen by the browser.
#[derive(Debug, Default, Clone)]
struct Tracked {
    parent: Option<PropertyId>,
    children: Vec<PropertyId>,
}

#[derive(Debug, Default)]
struct BrowserState {
    root: Option<PropertyId>,
    tracked: BTreeMap<PropertyId, Tracked>,
    rows: BTreeMap<PropertyId, BrowserRow>,
    /// Rows with no row above them
    top: Vec<PropertyId>,
    expanded: BTreeSet<PropertyId>,
}

impl BrowserState {
    fn add_subtree(
        &mut self,
        tree: &mut PropertyTree,
        observer: ObserverId,
        id: PropertyId,
        parent: Option<PropertyId>,
    ) {
        if self.tracked.contains_key(&id) {
            return;
        }
        let Some(node) = tree.get(id) else {
            return;
        };
        let children = node.children().to_vec();
        if node.is_self_visible() {
            if let Some(row) = BrowserRow::from_tree(tree, id) {
                self.rows.insert(id, row);
            }
        }
        self.tracked.insert(
            id,
            Tracked {
                parent,
                children: children.clone(),
            },
        );
        tree.subscribe(id, observer);

        for child in children {
            self.add_subtree(tree, observer, child, Some(id));
        }
        self.relink(id);
    }

    fn remove_subtree(&mut self, tree: &mut PropertyTree, observer: ObserverId, id: PropertyId) {
        let Some(tracked) = self.tracked.remove(&id) else {
            return;
        };
        tree.unsubscribe(id, observer);
        self.rows.remove(&id);
        self.expanded.remove(&id);
        for child in tracked.children {
            self.remove_subtree(tree, observer, child);
        }
    }

    /// Row ids shown directly beneath `id`, looking through transparent
    /// properties.
    fn row_children(&self, id: PropertyId) -> Vec<PropertyId> {
        let mut rows = Vec::new();
        if let Some(tracked) = self.tracked.get(&id) {
            for child in &tracked.children {
                if self.rows.contains_key(child) {
                    rows.push(*child);
                } else {
                    rows.extend(self.row_children(*child));
                }
            }
        }
        rows
    }

    /// Rebuild the child list of the row that owns `id`'s children.
    fn relink(&mut self, id: PropertyId) {
        let mut anchor = Some(id);
        while let Some(current) = anchor {
            if self.rows.contains_key(&current) {
                let children = self.row_children(current);
                if let Some(row) = self.rows.get_mut(&current) {
                    row.children = children;
                }
                return;
            }
            anchor = self.tracked.get(&current).and_then(|t| t.parent);
        }

        self.top = match self.root {
            Some(root) if self.rows.contains_key(&root) => vec![root],
            Some(root) => self.row_children(root),
            None => Vec::new(),
        };
    }

    fn clear(&mut self, tree: &mut PropertyTree, observer: ObserverId) {
        for id in self.tracked.keys() {
            tree.unsubscribe(*id, observer);
        }
        self.tracked.clear();
        self.rows.clear();
        self.top.clear();
        self.expanded.clear();
        self.root = None;
    }

    fn handle(
        &mut self,
        tree: &mut PropertyTree,
        observer: ObserverId,
        channel: PropertyId,
        event: &PropertyEvent,
    ) {
        match event {
            PropertyEvent::PropertyInserted { child, parent } => {
                if !self.tracked.contains_key(parent) {
                    return;
                }
                let children = tree.children(*parent).to_vec();
                if let Some(tracked) = self.tracked.get_mut(parent) {
                    tracked.children = children;
                }
                self.add_subtree(tree, observer, *child, Some(*parent));
                self.relink(*parent);
            }
            PropertyEvent::PropertyRemoved {
                child,
                parent: Some(parent),
            } => {
                self.remove_subtree(tree, observer, *child);
                if let Some(tracked) = self.tracked.get_mut(parent) {
                    tracked.children.retain(|c| c != child);
                }
                self.relink(*parent);
            }
            PropertyEvent::PropertyRemoved {
                child,
                parent: None,
            } => {
                if self.root == Some(*child) {
                    tracing::debug!("Browser root {:?} destroyed", child);
                    self.clear(tree, observer);
                }
            }
            PropertyEvent::ValueChanged { property }
            | PropertyEvent::AttributeChanged { property, .. } => {
                for id in [channel, *property] {
                    if let Some(row) = self.rows.get_mut(&id) {
                        row.refresh_value(tree);
                    }
                }
            }
            PropertyEvent::PropertyChanged { property } => {
                if let Some(row) = self.rows.get_mut(property) {
                    row.refresh_header(tree);
                }
            }
            _ => {}
        }
    }

    fn visit(&self, id: PropertyId, depth: usize, only_shown: bool, out: &mut Vec<(usize, BrowserRow)>) {
        let Some(row) = self.rows.get(&id) else {
            return;
        };
        if only_shown && row.hidden {
            return;
        }
        out.push((depth, row.clone()));
        if only_shown && !self.expanded.contains(&id) {
            return;
        }
        for child in &row.children {
            self.visit(*child, depth + 1, only_shown, out);
        }
    }
}

struct BrowserObserver {
    state: Rc<RefCell<BrowserState>>,
    id: RefCell<ObserverId>,
}

impl PropertyObserver for BrowserObserver {
    fn on_event(&self, tree: &mut PropertyTree, channel: PropertyId, event: &PropertyEvent) {
        let observer = *self.id.borrow();
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.handle(tree, observer, channel, event),
            Err(_) => tracing::warn!("Browser busy, dropped {} on {:?}", event.name(), channel),
        }
    }
}

/// Row model of a property tree view
pub struct TreeBrowser {
    state: Rc<RefCell<BrowserState>>,
    observer: ObserverId,
}

impl TreeBrowser {
    /// Create a browser and register its observer with `tree`.
    pub fn new(tree: &mut PropertyTree) -> Self {
        let state = Rc::new(RefCell::new(BrowserState::default()));
        let observer = Rc::new(BrowserObserver {
            state: Rc::clone(&state),
            id: RefCell::new(ObserverId::INVALID),
        });
        let id = tree.register_observer(observer.clone());
        *observer.id.borrow_mut() = id;
        Self {
            state,
            observer: id,
        }
    }

    pub fn observer_id(&self) -> ObserverId {
        self.observer
    }

    /// Show the tree under `root`, replacing anything shown before.
    pub fn attach(&self, tree: &mut PropertyTree, root: PropertyId) {
        let mut state = self.state.borrow_mut();
        state.clear(tree, self.observer);
        if !tree.contains(root) {
            tracing::warn!("Cannot attach browser to missing property {:?}", root);
            return;
        }
        state.root = Some(root);
        state.add_subtree(tree, self.observer, root, None);
        state.relink(root);
        tracing::debug!("Browser attached to {:?} with {} rows", root, state.rows.len());
    }

    /// Drop every row and unsubscribe from the tree.
    pub fn detach(&self, tree: &mut PropertyTree) {
        self.state.borrow_mut().clear(tree, self.observer);
    }

    /// Detach and unregister the browser's observer.
    pub fn close(self, tree: &mut PropertyTree) {
        self.detach(tree);
        tree.unregister_observer(self.observer);
    }

    pub fn root(&self) -> Option<PropertyId> {
        self.state.borrow().root
    }

    pub fn row(&self, id: PropertyId) -> Option<BrowserRow> {
        self.state.borrow().rows.get(&id).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.state.borrow().rows.len()
    }

    pub fn top_level(&self) -> Vec<PropertyId> {
        self.state.borrow().top.clone()
    }

    /// Every row in pre-order with its depth, ignoring hidden and collapsed
    /// state.
    pub fn rows(&self) -> Vec<(usize, BrowserRow)> {
        self.collect(false)
    }

    /// Rows a view would draw: hidden rows and the children of collapsed
    /// rows are skipped.
    pub fn shown_rows(&self) -> Vec<(usize, BrowserRow)> {
        self.collect(true)
    }

    fn collect(&self, only_shown: bool) -> Vec<(usize, BrowserRow)> {
        let state = self.state.borrow();
        let mut out = Vec::with_capacity(state.rows.len());
        for id in &state.top {
            state.visit(*id, 0, only_shown, &mut out);
        }
        out
    }

    pub fn is_expanded(&self, id: PropertyId) -> bool {
        self.state.borrow().expanded.contains(&id)
    }

    /// Ignored for properties without a row.
    pub fn set_expanded(&self, id: PropertyId, expanded: bool) {
        let mut state = self.state.borrow_mut();
        if !state.rows.contains_key(&id) {
            return;
        }
        if expanded {
            state.expanded.insert(id);
        } else {
            state.expanded.remove(&id);
        }
    }

    pub fn toggle_expanded(&self, id: PropertyId) {
        let expanded = self.is_expanded(id);
        self.set_expanded(id, !expanded);
    }

    pub fn expand_all(&self) {
        let mut state = self.state.borrow_mut();
        let ids: Vec<PropertyId> = state
            .rows
            .values()
            .filter(|row| row.has_children())
            .map(|row| row.property)
            .collect();
        state.expanded.extend(ids);
    }

    /// Plain-text dump of the shown rows, one per line.
    pub fn render_text(&self) -> String {
        let mut text = String::new();
        for (depth, row) in self.shown_rows() {
            let marker = match (row.has_children(), self.is_expanded(row.property)) {
                (false, _) => "  ",
                (true, true) => "v ",
                (true, false) => "> ",
            };
            let indent = "  ".repeat(depth);
            if row.spans_columns {
                let _ = writeln!(text, "{}{}{}", indent, marker, row.title);
            } else {
                let _ = writeln!(text, "{}{}{}: {}", indent, marker, row.title, row.value);
            }
        }
        text
    }
}

impl std::fmt::Debug for TreeBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TreeBrowser")
            .field("observer", &self.observer)
            .field("root", &state.root)
            .field("rows", &state.rows.len())
            .finish()
    }
}
