//! Test data builders for creating property trees

use propsheet_rs::model::{names, property_type, Color, PropertyId, PropertyTree, PropertyValue};

/// Builder for creating a single test property
pub struct PropertyBuilder {
    tag: String,
    name: String,
    title: Option<String>,
    value: Option<PropertyValue>,
    attributes: Vec<(String, PropertyValue)>,
}

impl PropertyBuilder {
    pub fn new(tag: &str, name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            title: None,
            value: None,
            attributes: Vec::new(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn value(mut self, value: impl Into<PropertyValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn attribute(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    /// Attributes are applied before the value.
    pub fn build(self, tree: &mut PropertyTree) -> PropertyId {
        let id = tree.create(&self.tag, &self.name);
        if let Some(title) = &self.title {
            tree.set_title(id, title);
        }
        for (name, value) in self.attributes {
            tree.set_attribute(id, &name, value);
        }
        if let Some(value) = self.value {
            tree.set_value(id, value);
        }
        id
    }

    pub fn build_under(self, tree: &mut PropertyTree, parent: PropertyId) -> PropertyId {
        let id = self.build(tree);
        tree.add_child(parent, id);
        id
    }
}

/// Ids of the sample sheet
pub struct SampleSheet {
    pub root: PropertyId,
    pub information: PropertyId,
    pub name: PropertyId,
    pub age: PropertyId,
    pub weight: PropertyId,
    pub country: PropertyId,
    pub married: PropertyId,
    pub color: PropertyId,
    pub hobby: PropertyId,
    pub sex: PropertyId,
    pub position: PropertyId,
    pub show_geometry: PropertyId,
    pub geometry: PropertyId,
    pub files: PropertyId,
}

/// Build the personal-information sheet used across the integration tests.
pub fn sample_sheet(tree: &mut PropertyTree) -> SampleSheet {
    let root = tree.create(property_type::GROUP, "root");
    tree.set_self_visible(root, false);

    let information = tree.create(property_type::GROUP, "information");
    tree.set_background_color(information, Some(Color::DARK_GRAY));
    tree.set_menu_visible(information, true);

    let name = PropertyBuilder::new(property_type::STRING, "name")
        .value("no name")
        .build_under(tree, information);
    let age = PropertyBuilder::new(property_type::INT, "age").build_under(tree, information);
    let weight = PropertyBuilder::new(property_type::FLOAT, "weight")
        .value(60.5)
        .build_under(tree, information);
    let country = PropertyBuilder::new(property_type::ENUM, "country")
        .attribute(names::ENUM_NAMES, vec!["China", "America", "England"])
        .build_under(tree, information);
    let married = PropertyBuilder::new(property_type::BOOL, "married")
        .value(true)
        .build_under(tree, information);
    let color = PropertyBuilder::new(property_type::COLOR, "color")
        .value(Color::rgb(255, 0, 0))
        .build_under(tree, information);
    let hobby = PropertyBuilder::new(property_type::FLAG, "hobby")
        .attribute(names::FLAG_NAMES, vec!["running", "walking", "swimming"])
        .value(1)
        .build_under(tree, information);
    let sex = PropertyBuilder::new(property_type::ENUM_PAIR, "sex")
        .attribute(names::ENUM_NAMES, vec!["unknown", "man", "woman"])
        .attribute(names::ENUM_VALUES, vec!["unknown", "man", "woman"])
        .value("unknown")
        .build_under(tree, information);
    let position = PropertyBuilder::new(property_type::FLOAT_LIST, "position")
        .attribute(names::SIZE, 3)
        .build_under(tree, information);
    tree.add_child(root, information);

    let show_geometry = PropertyBuilder::new(property_type::BOOL, "show geometry")
        .value(true)
        .build_under(tree, root);

    let geometry = tree.create(property_type::LIST, "geometry");
    for axis in ["x", "y", "width", "height"] {
        PropertyBuilder::new(property_type::FLOAT, axis).build_under(tree, geometry);
    }
    tree.add_child(root, geometry);

    let files = PropertyBuilder::new(property_type::DYNAMIC_LIST, "dynamic list")
        .attribute(names::VALUE_TYPE, property_type::FILE)
        .value(vec!["name", "age"])
        .build_under(tree, root);

    SampleSheet {
        root,
        information,
        name,
        age,
        weight,
        country,
        married,
        color,
        hobby,
        sex,
        position,
        show_geometry,
        geometry,
        files,
    }
}
