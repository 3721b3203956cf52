//! propsheet-rs demo - Main Entry Point
//!
//! Builds a sample property sheet, applies a few edits through the model and
//! prints the rows a tree browser would show.

use anyhow::Context;
use propsheet_rs::{
    model::{names, property_type, Color, PropertyEvent, PropertyId, PropertyTree},
    ModelConfig, TreeBrowser,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,propsheet_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting propsheet demo");

    let config = ModelConfig::load_or_default();
    let mut tree = config.build_tree()?;

    let root = create_properties(&mut tree)?;

    let browser = TreeBrowser::new(&mut tree);
    browser.attach(&mut tree, root);
    browser.expand_all();
    println!("{}", browser.render_text());

    // 1. set child value by name
    tree.set_child_value(root, "name", "Jack");

    // 2. find the property, then set its value directly
    if let Some(age) = tree.find_child(root, "age") {
        tree.set_value(age, 18);
    }

    // 3. set a list value
    tree.set_child_value(root, "geometry", vec![8.0, 9.0, 200.0, 100.0]);

    // Hiding the geometry goes through the root observer
    tree.set_child_value(root, "show geometry", false);

    if let Some(info) = tree.find_child(root, "information") {
        tree.request_popup_menu(info);
    }

    println!();
    print!("{}", browser.render_text());

    browser.close(&mut tree);
    tree.destroy(root);
    tracing::info!("Demo finished, {} properties left", tree.len());
    Ok(())
}

fn create_properties(tree: &mut PropertyTree) -> anyhow::Result<PropertyId> {
    let root = tree.create(property_type::GROUP, "root");
    tree.set_self_visible(root, false);

    {
        let group = tree.create(property_type::GROUP, "information");
        tree.set_background_color(group, Some(Color::DARK_GRAY));
        tree.set_menu_visible(group, true);
        tree.observe(group, |_, _, event| {
            if let PropertyEvent::PopupMenuRequested { property } = event {
                println!("popup menu requested for {:?}", property);
            }
        });

        let name = tree.create(property_type::STRING, "name");
        tree.set_value(name, "no name");
        tree.add_child(group, name);

        let age = tree.create(property_type::INT, "age");
        tree.add_child(group, age);

        let weight = tree.create(property_type::FLOAT, "weight");
        tree.set_value(weight, 60.5);
        tree.add_child(group, weight);

        let country = tree.create(property_type::ENUM, "country");
        tree.set_attribute(country, names::ENUM_NAMES, vec!["China", "America", "England"]);
        tree.add_child(group, country);

        let married = tree.create(property_type::BOOL, "married");
        tree.set_value(married, true);
        tree.add_child(group, married);

        let color = tree.create(property_type::COLOR, "color");
        tree.set_value(color, Color::rgb(255, 0, 0));
        tree.add_child(group, color);

        let hobby = tree.create(property_type::FLAG, "hobby");
        tree.set_value(hobby, 1);
        tree.set_attribute(hobby, names::FLAG_NAMES, vec!["running", "walking", "swimming"]);
        tree.add_child(group, hobby);

        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let icon = tree.create(property_type::FILE, "head icon");
        tree.set_value(icon, "no-image");
        tree.set_attribute(icon, names::FILE_DIALOG_FILTER, "Images(*.png *.jpg)");
        tree.set_attribute(icon, names::FILE_RELATIVE_PATH, cwd.to_string_lossy().into_owned());
        tree.add_child(group, icon);

        let sex = tree.create(property_type::ENUM_PAIR, "sex");
        let titles = vec!["unknown", "man", "woman"];
        tree.set_attribute(sex, names::ENUM_NAMES, titles.clone());
        tree.set_attribute(sex, names::ENUM_VALUES, titles);
        tree.set_value(sex, "unknown");
        tree.add_child(group, sex);

        let position = tree.create(property_type::FLOAT_LIST, "position");
        tree.set_attribute(position, names::SIZE, 3);
        tree.set_attribute(position, names::MIN_VALUE, -1000.0);
        tree.set_attribute(position, names::MAX_VALUE, 1000.0);
        tree.add_child(group, position);

        tree.add_child(root, group);
    }
    {
        let show = tree.create(property_type::BOOL, "show geometry");
        tree.set_value(show, true);
        tree.add_child(root, show);

        let rect = tree.create(property_type::LIST, "geometry");
        for axis in ["x", "y", "width", "height"] {
            let child = tree.create(property_type::FLOAT, axis);
            tree.add_child(rect, child);
        }
        tree.add_child(root, rect);
    }
    {
        let files = tree.create(property_type::DYNAMIC_LIST, "dynamic list");
        tree.set_attribute(files, names::VALUE_TYPE, property_type::FILE);
        tree.set_value(files, vec!["name", "age"]);
        tree.add_child(root, files);
    }

    tree.observe(root, on_value_changed);
    Ok(root)
}

fn on_value_changed(tree: &mut PropertyTree, _channel: PropertyId, event: &PropertyEvent) {
    let PropertyEvent::ValueChanged { property } = event else {
        return;
    };
    let name = tree.name(*property).unwrap_or_default().to_string();
    println!("property change: {} = {}", name, tree.value_string(*property));

    if name == "show geometry" {
        let shown = tree
            .value(*property)
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let root = tree.parent(*property);
        if let Some(geometry) = root.and_then(|root| tree.find_child(root, "geometry")) {
            tree.set_visible(geometry, shown);
        }
    }
}
