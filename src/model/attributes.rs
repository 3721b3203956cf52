//! Per-property attribute store.
//!
//! Attributes are editor metadata (bounds, option names, formatting hints)
//! keyed by name. Reads are soft: an attribute that is missing or has the
//! wrong shape yields the caller's default instead of an error.

use crate::model::value::PropertyValue;
use std::collections::BTreeMap;

/// Recognized attribute names.
pub mod names {
    pub const MIN_VALUE: &str = "minValue";
    pub const MAX_VALUE: &str = "maxValue";
    pub const DECIMALS: &str = "decimals";
    pub const READ_ONLY: &str = "readOnly";
    pub const ENUM_NAMES: &str = "enumNames";
    pub const ENUM_VALUES: &str = "enumValues";
    pub const FLAG_NAMES: &str = "flagNames";
    pub const SIZE: &str = "size";
    pub const FILE_DIALOG_TYPE: &str = "fileDialogType";
    pub const FILE_DIALOG_FILTER: &str = "fileDialogFilter";
    pub const FILE_RELATIVE_PATH: &str = "fileRelativePath";

    // Dynamic list item template
    pub const VALUE_TYPE: &str = "valueType";
    pub const VALUE_DEFAULT: &str = "valueDefault";
    pub const VALUE_ATTRIBUTES: &str = "valueAttributes";

    pub fn all() -> &'static [&'static str] {
        &[
            MIN_VALUE,
            MAX_VALUE,
            DECIMALS,
            READ_ONLY,
            ENUM_NAMES,
            ENUM_VALUES,
            FLAG_NAMES,
            SIZE,
            FILE_DIALOG_TYPE,
            FILE_DIALOG_FILTER,
            FILE_RELATIVE_PATH,
            VALUE_TYPE,
            VALUE_DEFAULT,
            VALUE_ATTRIBUTES,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    values: BTreeMap<String, PropertyValue>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// True when the attribute is present and not empty.
    pub fn contains(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_none())
    }

    /// Store a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.values.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.soft(name, "int", PropertyValue::as_int).unwrap_or(default)
    }

    /// Integers are accepted where a float is expected.
    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.soft(name, "number", PropertyValue::as_float)
            .unwrap_or(default)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.soft(name, "bool", PropertyValue::as_bool)
            .unwrap_or(default)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.soft(name, "string", PropertyValue::as_str)
    }

    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.soft(name, "string list", PropertyValue::as_string_list)
            .unwrap_or_default()
    }

    pub fn list(&self, name: &str) -> &[PropertyValue] {
        self.soft(name, "list", PropertyValue::as_list)
            .unwrap_or(&[])
    }

    fn soft<'a, T>(
        &'a self,
        name: &str,
        expected: &str,
        read: impl FnOnce(&'a PropertyValue) -> Option<T>,
    ) -> Option<T> {
        let value = self.values.get(name)?;
        if value.is_none() {
            return None;
        }
        let typed = read(value);
        if typed.is_none() {
            tracing::trace!(
                "Attribute {} is a {}, expected {}; using default",
                name,
                value.kind_name(),
                expected
            );
        }
        typed
    }
}
