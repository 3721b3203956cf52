//! Integration tests for the notification protocol
//!
//! These tests validate which channel each event travels on and when it is
//! emitted:
//! - Structural events on the parent's channel
//! - Group re-emission of child value changes
//! - Change-only property notifications, unconditional attribute ones
//! - Reentrant observers

mod common;

use common::builders::PropertyBuilder;
use common::recorder::EventRecorder;
use propsheet_rs::model::{
    names, property_type, Color, PropertyEvent, PropertyId, PropertyTree, PropertyValue,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

#[test]
fn test_insert_and_remove_travel_on_parent_channel() {
    let mut tree = PropertyTree::new();
    let group = tree.create(property_type::GROUP, "group");
    let leaf = tree.create(property_type::INT, "leaf");
    let on_group = EventRecorder::on(&mut tree, group);
    let on_leaf = EventRecorder::on(&mut tree, leaf);

    tree.add_child(group, leaf);
    tree.remove_child(group, leaf);

    assert_eq!(
        on_group.events(),
        vec![
            (group, PropertyEvent::PropertyInserted { child: leaf, parent: group }),
            (
                group,
                PropertyEvent::PropertyRemoved {
                    child: leaf,
                    parent: Some(group)
                }
            ),
        ]
    );
    assert!(on_leaf.is_empty());
}

#[test]
fn test_group_reemits_child_value_with_child_payload() {
    let mut tree = PropertyTree::new();
    let root = tree.create(property_type::GROUP, "root");
    let inner = PropertyBuilder::new(property_type::GROUP, "inner").build_under(&mut tree, root);
    let age = PropertyBuilder::new(property_type::INT, "age").build_under(&mut tree, inner);
    let recorder = EventRecorder::on(&mut tree, root);

    tree.set_value(age, 18);

    assert_eq!(
        recorder.events(),
        vec![(root, PropertyEvent::ValueChanged { property: age })]
    );
}

#[test]
fn test_equal_value_is_silent() {
    let mut tree = PropertyTree::new();
    let name = PropertyBuilder::new(property_type::STRING, "name")
        .value("Tom")
        .build(&mut tree);
    let recorder = EventRecorder::on(&mut tree, name);

    tree.set_value(name, "Tom");
    assert!(recorder.is_empty());

    tree.set_value(name, "Jack");
    assert_eq!(recorder.count("value-changed"), 1);
}

/// Property of type `tag` ready to take `value`, with any children the
/// container needs.
fn build_for(tree: &mut PropertyTree, tag: &str) -> PropertyId {
    let id = tree.create(tag, tag);
    match tag {
        property_type::LIST | property_type::DICT => {
            for name in ["a", "b"] {
                PropertyBuilder::new(property_type::DOUBLE, name).build_under(tree, id);
            }
        }
        property_type::DYNAMIC_LIST => {
            tree.set_attribute(id, names::VALUE_TYPE, property_type::DOUBLE);
        }
        property_type::DYNAMIC_ITEM => tree.set_value_type(id, property_type::DOUBLE),
        _ => {}
    }
    id
}

#[test]
fn test_every_type_ignores_equal_value() {
    let mut entries = BTreeMap::new();
    entries.insert("a".to_string(), PropertyValue::Float(1.5));
    entries.insert("b".to_string(), PropertyValue::Float(f64::NAN));

    let cases: Vec<(&str, PropertyValue)> = vec![
        (property_type::BOOL, true.into()),
        (property_type::INT, 42.into()),
        (property_type::FLOAT, 0.25.into()),
        (property_type::DOUBLE, f64::NAN.into()),
        (property_type::STRING, "Tom".into()),
        (property_type::COLOR, Color::rgb(255, 0, 0).into()),
        (property_type::FILE, PathBuf::from("icons/head.png").into()),
        (property_type::ENUM, 2.into()),
        (property_type::ENUM_PAIR, "China".into()),
        (property_type::FLAG, 5.into()),
        (property_type::FLOAT_LIST, vec![1.0, f64::NAN].into()),
        (property_type::LIST, vec![1.0, 2.0].into()),
        (property_type::DICT, entries.into()),
        (property_type::DYNAMIC_LIST, vec![3.0, 4.0].into()),
        (property_type::DYNAMIC_ITEM, 7.5.into()),
    ];

    for (tag, value) in cases {
        let mut tree = PropertyTree::new();
        let id = build_for(&mut tree, tag);
        let recorder = EventRecorder::on(&mut tree, id);

        // Positional List assignment may notify once per child here
        tree.set_value(id, value.clone());
        assert!(recorder.count("value-changed") >= 1, "{} did not notify", tag);

        recorder.clear();
        tree.set_value(id, value);
        assert!(recorder.is_empty(), "{} notified for an equal value", tag);
    }
}

#[test]
fn test_property_changed_only_on_difference() {
    let mut tree = PropertyTree::new();
    let leaf = tree.create(property_type::BOOL, "flag");
    let recorder = EventRecorder::on(&mut tree, leaf);

    tree.set_name(leaf, "flag");
    tree.set_visible(leaf, true);
    assert!(recorder.is_empty());

    tree.set_title(leaf, "Flag");
    tree.set_visible(leaf, false);
    tree.set_tooltip(leaf, "no notification");
    assert_eq!(recorder.names(), vec!["property-changed", "property-changed"]);
}

#[test]
fn test_attribute_change_always_notifies() {
    let mut tree = PropertyTree::new();
    let leaf = tree.create(property_type::INT, "age");
    let recorder = EventRecorder::on(&mut tree, leaf);

    tree.set_attribute(leaf, names::MIN_VALUE, 0);
    tree.set_attribute(leaf, names::MIN_VALUE, 0);

    assert_eq!(recorder.count("attribute-changed"), 2);
    assert_eq!(
        recorder.events()[0].1,
        PropertyEvent::AttributeChanged {
            property: leaf,
            name: names::MIN_VALUE.to_string()
        }
    );
}

#[test]
fn test_list_value_change_reaches_list_channel() {
    let mut tree = PropertyTree::new();
    let list = tree.create(property_type::LIST, "geometry");
    let x = PropertyBuilder::new(property_type::FLOAT, "x").build_under(&mut tree, list);
    let recorder = EventRecorder::on(&mut tree, list);

    tree.set_value(x, 8.0);

    assert_eq!(
        recorder.events(),
        vec![(list, PropertyEvent::ValueChanged { property: list })]
    );
}

#[test]
fn test_destroying_a_root_announces_itself() {
    let mut tree = PropertyTree::new();
    let root = tree.create(property_type::GROUP, "root");
    let child = PropertyBuilder::new(property_type::STRING, "child").build_under(&mut tree, root);
    let recorder = EventRecorder::on(&mut tree, root);

    tree.destroy(root);

    assert_eq!(
        recorder.events(),
        vec![(
            root,
            PropertyEvent::PropertyRemoved {
                child: root,
                parent: None
            }
        )]
    );
    assert!(!tree.contains(child));
    assert!(tree.is_empty());
}

#[test]
fn test_observers_run_in_subscription_order() {
    let mut tree = PropertyTree::new();
    let leaf = tree.create(property_type::INT, "n");
    let order = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = Rc::clone(&order);
        tree.observe(leaf, move |_, _, _| order.borrow_mut().push(label));
    }
    tree.set_value(leaf, 1);

    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_observer_may_edit_the_tree() {
    let mut tree = PropertyTree::new();
    let root = tree.create(property_type::GROUP, "root");
    let show = PropertyBuilder::new(property_type::BOOL, "show")
        .value(true)
        .build_under(&mut tree, root);
    let target = PropertyBuilder::new(property_type::INT, "target").build_under(&mut tree, root);

    tree.observe(root, |tree: &mut PropertyTree, _: PropertyId, event: &PropertyEvent| {
        let PropertyEvent::ValueChanged { property } = event else {
            return;
        };
        if tree.name(*property) == Some("show") {
            let shown = tree.value(*property).and_then(|v| v.as_bool()).unwrap_or(true);
            if let Some(target) = tree.find_child(tree.parent(*property).unwrap(), "target") {
                tree.set_visible(target, shown);
            }
        }
    });

    tree.set_value(show, false);
    assert!(!tree.get(target).unwrap().is_visible());
    tree.set_value(show, true);
    assert!(tree.get(target).unwrap().is_visible());
}

#[test]
fn test_unsubscribed_observer_stops_receiving() {
    let mut tree = PropertyTree::new();
    let leaf = tree.create(property_type::INT, "n");
    let recorder = EventRecorder::on(&mut tree, leaf);

    tree.set_value(leaf, 1);
    tree.unsubscribe(leaf, recorder.observer());
    tree.set_value(leaf, 2);

    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_popup_menu_requires_menu_visible() {
    let mut tree = PropertyTree::new();
    let group = tree.create(property_type::GROUP, "information");
    let recorder = EventRecorder::on(&mut tree, group);

    tree.request_popup_menu(group);
    assert!(recorder.is_empty());

    tree.set_menu_visible(group, true);
    tree.request_popup_menu(group);
    assert_eq!(recorder.names(), vec!["popup-menu-requested"]);
}
