//! List, Dict and Group behavior.
//!
//! A container links itself to each child when the child is added. The
//! stored value of a List or Dict is recomputed from the children whenever a
//! child is added, removed, renamed or changes value, and the container
//! emits only when the recomputed value differs. Groups hold no value and
//! forward each child value change unchanged, so the payload is always the
//! leaf that actually changed.

use crate::model::dispatch::Listener;
use crate::model::event::PropertyEvent;
use crate::model::id::PropertyId;
use crate::model::node::KindClass;
use crate::model::tree::PropertyTree;
use crate::model::value::PropertyValue;
use std::collections::BTreeMap;

impl PropertyTree {
    pub(crate) fn class_of(&self, id: PropertyId) -> Option<KindClass> {
        self.get(id).map(|n| n.kind.class())
    }

    pub(crate) fn on_child_added(&mut self, parent: PropertyId, child: PropertyId) {
        if matches!(
            self.class_of(parent),
            Some(KindClass::List | KindClass::Dict | KindClass::Group)
        ) {
            self.link(child, Listener::Container(parent));
        }
    }

    pub(crate) fn on_child_removed(&mut self, parent: PropertyId, child: PropertyId) {
        self.unlink(child, Listener::Container(parent));
        self.forget_dynamic_item(parent, child);
    }

    /// Recompute a List, Dict or Dynamic List value from its children.
    pub(crate) fn refresh_container_value(&mut self, id: PropertyId) {
        let value = match self.class_of(id) {
            Some(KindClass::List) => PropertyValue::List(
                self.children(id)
                    .iter()
                    .map(|c| self.value(*c).cloned().unwrap_or_default())
                    .collect(),
            ),
            Some(KindClass::Dict) => {
                let mut map = BTreeMap::new();
                for child in self.children(id) {
                    if let Some(node) = self.get(*child) {
                        map.insert(node.name.clone(), node.value.clone());
                    }
                }
                PropertyValue::Map(map)
            }
            Some(KindClass::DynamicList) => self.dynamic_list_value_of(id),
            _ => return,
        };
        self.store_value(id, value);
    }

    pub(crate) fn on_container_child_event(
        &mut self,
        container: PropertyId,
        _channel: PropertyId,
        event: &PropertyEvent,
    ) {
        match (self.class_of(container), event) {
            (Some(KindClass::Group), PropertyEvent::ValueChanged { property }) => {
                self.emit(container, PropertyEvent::ValueChanged { property: *property });
            }
            (Some(KindClass::List | KindClass::Dict), PropertyEvent::ValueChanged { .. }) => {
                self.refresh_container_value(container);
            }
            // Dict keys follow child names
            (Some(KindClass::Dict), PropertyEvent::PropertyChanged { .. }) => {
                self.refresh_container_value(container);
            }
            _ => {}
        }
    }

    /// Positional assignment. Missing entries clear the child, extra entries
    /// are ignored.
    pub(crate) fn set_list_value(&mut self, id: PropertyId, value: PropertyValue) {
        let items = match value {
            PropertyValue::List(items) => items,
            PropertyValue::None => Vec::new(),
            other => {
                tracing::warn!("List {:?} rejected a {} value", id, other.kind_name());
                return;
            }
        };
        if self
            .value(id)
            .and_then(PropertyValue::as_list)
            .is_some_and(|current| PropertyValue::same_items(current, &items))
        {
            return;
        }

        let children = self.children(id).to_vec();
        for (i, child) in children.into_iter().enumerate() {
            self.set_value(child, items.get(i).cloned().unwrap_or_default());
        }
        self.refresh_container_value(id);
    }

    /// Assignment by child name. Children whose name is absent are cleared.
    pub(crate) fn set_dict_value(&mut self, id: PropertyId, value: PropertyValue) {
        let map = match value {
            PropertyValue::Map(map) => map,
            PropertyValue::None => BTreeMap::new(),
            other => {
                tracing::warn!("Dict {:?} rejected a {} value", id, other.kind_name());
                return;
            }
        };
        if self
            .value(id)
            .and_then(PropertyValue::as_map)
            .is_some_and(|current| PropertyValue::same_entries(current, &map))
        {
            return;
        }

        let children = self.children(id).to_vec();
        for child in children {
            let Some(name) = self.name(child) else {
                continue;
            };
            let entry = map.get(name).cloned().unwrap_or_default();
            self.set_value(child, entry);
        }
        self.refresh_container_value(id);
    }

    /// Find a child by name.
    ///
    /// Groups search depth-first: each child is matched by name first, and
    /// a non-matching child that is itself a Group is searched recursively.
    /// Other properties only match direct children.
    pub fn find_child(&self, id: PropertyId, name: &str) -> Option<PropertyId> {
        let node = self.get(id)?;
        if node.kind.class() != KindClass::Group {
            return node
                .children
                .iter()
                .copied()
                .find(|c| self.name(*c) == Some(name));
        }

        for child in &node.children {
            let Some(child_node) = self.get(*child) else {
                continue;
            };
            if child_node.name == name {
                return Some(*child);
            }
            if child_node.kind.class() == KindClass::Group {
                if let Some(found) = self.find_child(*child, name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// `set_value` on the child `find_child` resolves; no-op when absent.
    pub fn set_child_value(&mut self, id: PropertyId, name: &str, value: impl Into<PropertyValue>) {
        match self.find_child(id, name) {
            Some(child) => self.set_value(child, value),
            None => tracing::trace!("No child {:?} under {:?}", name, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::event::PropertyEvent;
    use crate::model::id::PropertyId;
    use crate::model::property_type;
    use crate::model::tree::PropertyTree;
    use crate::model::value::PropertyValue;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn value_events(tree: &mut PropertyTree, id: PropertyId) -> Rc<RefCell<Vec<PropertyId>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        tree.observe(id, move |_, _, event| {
            if let PropertyEvent::ValueChanged { property } = event {
                sink.borrow_mut().push(*property);
            }
        });
        events
    }

    fn geometry(tree: &mut PropertyTree) -> (PropertyId, Vec<PropertyId>) {
        let list = tree.create(property_type::LIST, "geometry");
        let children: Vec<_> = ["x", "y", "width", "height"]
            .iter()
            .map(|name| {
                let child = tree.create(property_type::FLOAT, name);
                tree.add_child(list, child);
                child
            })
            .collect();
        (list, children)
    }

    #[test]
    fn test_list_set_value_assigns_positionally() {
        let mut tree = PropertyTree::new();
        let (list, children) = geometry(&mut tree);

        tree.set_value(list, vec![8, 9, 200, 100]);
        assert_eq!(tree.value(children[2]), Some(&PropertyValue::Float(200.0)));
        assert_eq!(
            tree.value(list),
            Some(&PropertyValue::from(vec![8.0, 9.0, 200.0, 100.0]))
        );
        assert_eq!(tree.value_string(list), "[8.00, 9.00, 200.00, 100.00, ]");
    }

    #[test]
    fn test_list_short_value_clears_remaining_children() {
        let mut tree = PropertyTree::new();
        let (list, children) = geometry(&mut tree);
        tree.set_value(list, vec![1.0, 2.0, 3.0, 4.0]);

        tree.set_value(list, vec![5.0]);
        assert_eq!(tree.value(children[0]), Some(&PropertyValue::Float(5.0)));
        assert!(tree.value(children[3]).unwrap().is_none());
    }

    #[test]
    fn test_list_follows_child_changes() {
        let mut tree = PropertyTree::new();
        let (list, children) = geometry(&mut tree);
        let events = value_events(&mut tree, list);

        tree.set_value(children[1], 4.5);
        tree.set_value(children[1], 4.5);
        assert_eq!(*events.borrow(), vec![list]);

        let expected = PropertyValue::List(vec![
            PropertyValue::None,
            PropertyValue::Float(4.5),
            PropertyValue::None,
            PropertyValue::None,
        ]);
        assert_eq!(tree.value(list), Some(&expected));
    }

    #[test]
    fn test_list_set_equal_value_is_silent() {
        let mut tree = PropertyTree::new();
        let (list, _) = geometry(&mut tree);
        tree.set_value(list, vec![1.0, 2.0, 3.0, 4.0]);
        let events = value_events(&mut tree, list);

        tree.set_value(list, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_list_tracks_structure() {
        let mut tree = PropertyTree::new();
        let (list, children) = geometry(&mut tree);
        tree.set_value(list, vec![1.0, 2.0, 3.0, 4.0]);

        tree.remove_child(list, children[0]);
        assert_eq!(tree.value(list), Some(&PropertyValue::from(vec![2.0, 3.0, 4.0])));

        // Detached children no longer drive the list
        tree.set_value(children[0], 10.0);
        assert_eq!(tree.value(list).and_then(|v| v.as_list()).map(|l| l.len()), Some(3));
    }

    #[test]
    fn test_dict_updates_by_name() {
        let mut tree = PropertyTree::new();
        let dict = tree.create(property_type::DICT, "person");
        let name = tree.create(property_type::STRING, "name");
        let age = tree.create(property_type::INT, "age");
        tree.add_child(dict, name);
        tree.add_child(dict, age);

        let mut map = BTreeMap::new();
        map.insert("name".to_string(), PropertyValue::from("Jack"));
        map.insert("age".to_string(), PropertyValue::Int(30));
        tree.set_value(dict, map);
        assert_eq!(tree.value(age), Some(&PropertyValue::Int(30)));

        tree.set_value(age, 31);
        let value = tree.value(dict).and_then(|v| v.as_map()).unwrap();
        assert_eq!(value["age"], PropertyValue::Int(31));
        assert_eq!(value["name"], PropertyValue::from("Jack"));
    }

    #[test]
    fn test_dict_rekeys_on_rename() {
        let mut tree = PropertyTree::new();
        let dict = tree.create(property_type::DICT, "person");
        let age = tree.create(property_type::INT, "age");
        tree.add_child(dict, age);
        tree.set_value(age, 3);

        tree.set_name(age, "years");
        let value = tree.value(dict).and_then(|v| v.as_map()).unwrap();
        assert!(!value.contains_key("age"));
        assert_eq!(value["years"], PropertyValue::Int(3));
        assert_eq!(tree.value_string(dict), "{years: 3}");
    }

    #[test]
    fn test_group_forwards_leaf_payload() {
        let mut tree = PropertyTree::new();
        let outer = tree.create(property_type::GROUP, "outer");
        let inner = tree.create(property_type::GROUP, "inner");
        let leaf = tree.create(property_type::INT, "age");
        tree.add_child(outer, inner);
        tree.add_child(inner, leaf);
        let outer_events = value_events(&mut tree, outer);
        let inner_events = value_events(&mut tree, inner);

        tree.set_value(leaf, 10);
        tree.set_value(outer, 99);

        assert_eq!(*outer_events.borrow(), vec![leaf]);
        assert_eq!(*inner_events.borrow(), vec![leaf]);
        assert!(!tree.has_value(outer));
        assert!(tree.value(outer).unwrap().is_none());
    }

    #[test]
    fn test_group_find_child_recurses_into_groups_only() {
        let mut tree = PropertyTree::new();
        let root = tree.create(property_type::GROUP, "root");
        let name = tree.create(property_type::STRING, "name");
        let info = tree.create(property_type::GROUP, "info");
        let age = tree.create(property_type::INT, "age");
        let list = tree.create(property_type::LIST, "list");
        let hidden = tree.create(property_type::INT, "hidden");
        tree.add_child(root, name);
        tree.add_child(root, info);
        tree.add_child(info, age);
        tree.add_child(root, list);
        tree.add_child(list, hidden);

        assert_eq!(tree.find_child(root, "age"), Some(age));
        assert_eq!(tree.find_child(root, "name"), Some(name));
        assert_eq!(tree.find_child(root, "hidden"), None);
        assert_eq!(tree.find_child(list, "hidden"), Some(hidden));
        assert_eq!(tree.find_child(root, "missing"), None);

        tree.set_child_value(root, "age", 10);
        assert_eq!(tree.value(age), Some(&PropertyValue::Int(10)));
        tree.set_child_value(root, "missing", 1);
    }

    #[test]
    fn test_first_match_wins() {
        let mut tree = PropertyTree::new();
        let list = tree.create(property_type::LIST, "list");
        let first = tree.create(property_type::INT, "dup");
        let second = tree.create(property_type::INT, "dup");
        tree.add_child(list, first);
        tree.add_child(list, second);
        assert_eq!(tree.find_child(list, "dup"), Some(first));
    }

    proptest! {
        #[test]
        fn prop_list_value_matches_children(
            writes in prop::collection::vec((0usize..4, -1000i64..1000), 0..40)
        ) {
            let mut tree = PropertyTree::new();
            let list = tree.create(property_type::LIST, "list");
            let children: Vec<_> = (0..4)
                .map(|i| {
                    let child = tree.create(property_type::INT, &i.to_string());
                    tree.add_child(list, child);
                    child
                })
                .collect();

            for (index, value) in writes {
                tree.set_value(children[index], value);
            }

            let expected: Vec<PropertyValue> = children
                .iter()
                .map(|c| tree.value(*c).cloned().unwrap_or_default())
                .collect();
            prop_assert_eq!(tree.value(list), Some(&PropertyValue::List(expected)));
        }
    }
}
