//! Integration tests for dynamic lists
//!
//! These tests validate the user-facing workflows of a dynamic list:
//! - Resizing through the value or the `length` child
//! - Item requests (move up, move down, delete) routed to the list
//! - Changing the item type of a single entry

mod common;

use common::builders::PropertyBuilder;
use common::recorder::EventRecorder;
use propsheet_rs::model::{names, property_type, PropertyId, PropertyTree, PropertyValue};

fn string_list(tree: &mut PropertyTree, values: Vec<&str>) -> PropertyId {
    PropertyBuilder::new(property_type::DYNAMIC_LIST, "names")
        .attribute(names::VALUE_TYPE, property_type::STRING)
        .attribute(names::VALUE_DEFAULT, "")
        .value(values)
        .build(tree)
}

fn strings(tree: &PropertyTree, list: PropertyId) -> Vec<String> {
    tree.value(list)
        .and_then(PropertyValue::as_string_list)
        .unwrap_or_default()
}

fn length(tree: &PropertyTree, list: PropertyId) -> i64 {
    let length = tree.length_property(list).unwrap();
    tree.value(length).and_then(PropertyValue::as_int).unwrap()
}

#[test]
fn test_delete_request_from_item() {
    let mut tree = PropertyTree::new();
    let list = string_list(&mut tree, vec!["p", "q", "r"]);

    let second = tree.dynamic_items(list)[1];
    tree.request_delete(second);

    assert_eq!(strings(&tree, list), vec!["p", "r"]);
    assert_eq!(length(&tree, list), 2);
    assert_eq!(tree.dynamic_items(list).len(), 2);
}

#[test]
fn test_move_requests_from_items() {
    let mut tree = PropertyTree::new();
    let list = string_list(&mut tree, vec!["a", "b", "c"]);
    let items = tree.dynamic_items(list).to_vec();

    tree.request_move_up(items[2]);
    assert_eq!(strings(&tree, list), vec!["a", "c", "b"]);

    tree.request_move_down(items[0]);
    assert_eq!(strings(&tree, list), vec!["c", "a", "b"]);

    // Boundaries are no-ops
    tree.request_move_up(items[0]);
    tree.request_move_down(items[2]);
    assert_eq!(strings(&tree, list), vec!["c", "a", "b"]);
}

#[test]
fn test_editing_length_child_resizes() {
    let mut tree = PropertyTree::new();
    let list = string_list(&mut tree, vec!["a"]);
    let length_child = tree.length_property(list).unwrap();

    tree.set_value(length_child, 3);
    assert_eq!(tree.dynamic_items(list).len(), 3);
    assert_eq!(strings(&tree, list), vec!["a", "", ""]);

    tree.set_value(length_child, -4);
    assert!(tree.dynamic_items(list).is_empty());
    assert_eq!(length(&tree, list), 0);
}

#[test]
fn test_list_value_notifies_once_per_change() {
    let mut tree = PropertyTree::new();
    let list = string_list(&mut tree, vec!["a", "b"]);
    let recorder = EventRecorder::on(&mut tree, list);

    tree.set_value(list, vec!["a", "b"]);
    assert_eq!(recorder.count("value-changed"), 0);

    tree.set_value(list, vec!["a", "b", "c"]);
    assert!(recorder.count("value-changed") >= 1);
    assert_eq!(recorder.count("property-inserted"), 1);
    assert_eq!(strings(&tree, list), vec!["a", "b", "c"]);
}

#[test]
fn test_item_template_and_attributes() {
    let mut tree = PropertyTree::new();
    let mut template = std::collections::BTreeMap::new();
    template.insert(names::DECIMALS.to_string(), PropertyValue::Int(1));
    let list = PropertyBuilder::new(property_type::DYNAMIC_LIST, "weights")
        .attribute(names::VALUE_TYPE, property_type::FLOAT)
        .attribute(names::VALUE_DEFAULT, 1.5)
        .attribute(names::VALUE_ATTRIBUTES, template)
        .build(&mut tree);

    tree.set_length(list, 2);
    assert_eq!(tree.value_string(list), "[1.5, 1.5, ]");

    let first = tree.dynamic_items(list)[0];
    assert_eq!(tree.value_type(first), Some(property_type::FLOAT));
    assert_eq!(tree.name(first), Some("1"));
}

#[test]
fn test_changing_item_type_keeps_list_consistent() {
    let mut tree = PropertyTree::new();
    let list = string_list(&mut tree, vec!["a", "b"]);
    let first = tree.dynamic_items(list)[0];

    tree.set_value_type(first, property_type::INT);
    assert_eq!(tree.value_type(first), Some(property_type::INT));

    tree.set_value(first, 7);
    assert_eq!(
        tree.value(list).and_then(PropertyValue::as_list).map(|l| l.to_vec()),
        Some(vec![PropertyValue::Int(7), PropertyValue::from("b")])
    );
}

#[test]
fn test_destroying_list_frees_everything() {
    let mut tree = PropertyTree::new();
    let list = string_list(&mut tree, vec!["a", "b", "c"]);
    assert!(tree.len() > 1);

    tree.destroy(list);
    assert!(tree.is_empty());
}
