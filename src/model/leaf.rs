//! Typed leaf properties.
//!
//! Leaves come in two layers, like the rest of the model's extension points:
//!
//! 1. [`LeafKind`] - closed enum of the built-in leaf variants.
//! 2. [`LeafPlugin`] - trait for custom leaves registered through the factory.
//!
//! [`Leaf`] unifies both. Each leaf decides which incoming values it accepts
//! (coercion), how the stored value renders as text, and which icon hint goes
//! with it. An empty value is always accepted and clears the leaf.

use crate::config::DisplaySettings;
use crate::model::attributes::{names, AttributeStore};
use crate::model::value::{Color, PropertyValue, ValueIcon};
use std::fmt;

/// Significant digits shown per float list element
const FLOAT_LIST_DIGITS: usize = 6;

/// Built-in leaf variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Bool,
    Int,
    Double,
    String,
    Color,
    File,
    /// Index into `enumNames`.
    Enum,
    /// Element of `enumValues`, displayed through `enumNames`.
    EnumPair,
    /// Bitmask over `flagNames`.
    Flag,
    /// Fixed-length float vector sized by the `size` attribute.
    FloatList,
}

impl LeafKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            LeafKind::Bool => "Bool",
            LeafKind::Int => "Integer",
            LeafKind::Double => "Float",
            LeafKind::String => "String",
            LeafKind::Color => "Color",
            LeafKind::File => "File",
            LeafKind::Enum => "Enum",
            LeafKind::EnumPair => "Enum Pair",
            LeafKind::Flag => "Flag",
            LeafKind::FloatList => "Float List",
        }
    }

    /// Narrow `value` to what this leaf stores, or `None` to reject it.
    pub fn coerce(self, value: PropertyValue) -> Option<PropertyValue> {
        if value.is_none() {
            return Some(value);
        }
        match self {
            LeafKind::Bool => value.as_bool().map(PropertyValue::Bool),
            LeafKind::Int | LeafKind::Enum | LeafKind::Flag => match value {
                PropertyValue::Int(v) => Some(PropertyValue::Int(v)),
                PropertyValue::Float(v) if v.is_finite() => Some(PropertyValue::Int(v.trunc() as i64)),
                _ => None,
            },
            LeafKind::Double => value.as_float().map(PropertyValue::Float),
            LeafKind::String => match value {
                PropertyValue::String(s) => Some(PropertyValue::String(s)),
                PropertyValue::Path(p) => Some(PropertyValue::String(p.display().to_string())),
                _ => None,
            },
            LeafKind::File => match value {
                PropertyValue::Path(p) => Some(PropertyValue::Path(p)),
                PropertyValue::String(s) => Some(PropertyValue::Path(s.into())),
                _ => None,
            },
            LeafKind::Color => coerce_color(&value).map(PropertyValue::Color),
            LeafKind::EnumPair => match value {
                PropertyValue::List(_) | PropertyValue::Map(_) => None,
                scalar => Some(scalar),
            },
            LeafKind::FloatList => {
                let items = value.as_list()?;
                items
                    .iter()
                    .map(|v| v.as_float().map(PropertyValue::Float))
                    .collect::<Option<Vec<_>>>()
                    .map(PropertyValue::List)
            }
        }
    }

    /// Canonical text for `value`. An empty value reads as the variant's zero.
    pub fn display(
        self,
        value: &PropertyValue,
        attributes: &AttributeStore,
        settings: &DisplaySettings,
    ) -> String {
        match self {
            LeafKind::Bool => settings
                .bool_label(value.as_bool().unwrap_or(false))
                .to_string(),
            LeafKind::Int => value.to_string(),
            LeafKind::Double => {
                let decimals = attributes.int_or(names::DECIMALS, settings.default_decimals as i64);
                let decimals = usize::try_from(decimals).unwrap_or(settings.default_decimals as usize);
                settings
                    .number_format
                    .format_fixed(value.as_float().unwrap_or(0.0), decimals)
            }
            LeafKind::String | LeafKind::File => value.to_string(),
            LeafKind::Color => value.as_color().map(|c| c.to_string()).unwrap_or_default(),
            LeafKind::Enum => {
                let index = value.as_int().unwrap_or(0);
                usize::try_from(index)
                    .ok()
                    .and_then(|i| attributes.string_list(names::ENUM_NAMES).into_iter().nth(i))
                    .unwrap_or_default()
            }
            LeafKind::EnumPair => {
                let position = attributes
                    .list(names::ENUM_VALUES)
                    .iter()
                    .position(|v| v == value);
                position
                    .and_then(|i| attributes.string_list(names::ENUM_NAMES).into_iter().nth(i))
                    .unwrap_or_default()
            }
            LeafKind::Flag => {
                let bits = value.as_int().unwrap_or(0);
                attributes
                    .string_list(names::FLAG_NAMES)
                    .into_iter()
                    .take(64)
                    .enumerate()
                    .filter(|(i, _)| bits & (1i64 << i) != 0)
                    .map(|(_, name)| name)
                    .collect::<Vec<_>>()
                    .join(&settings.flag_separator)
            }
            LeafKind::FloatList => {
                let size = attributes.int_or(names::SIZE, 0).max(0) as usize;
                let items = value.as_list().unwrap_or(&[]);
                let numbers: Vec<String> = (0..size)
                    .map(|i| {
                        let v = items.get(i).and_then(PropertyValue::as_float).unwrap_or(0.0);
                        settings.number_format.format_significant(v, FLOAT_LIST_DIGITS)
                    })
                    .collect();
                format!("[{}]", numbers.join(&settings.list_separator))
            }
        }
    }

    pub fn icon(self, value: &PropertyValue) -> ValueIcon {
        match self {
            LeafKind::Bool => ValueIcon::CheckBox(value.as_bool().unwrap_or(false)),
            LeafKind::Color => value.as_color().map(ValueIcon::Swatch).unwrap_or_default(),
            _ => ValueIcon::None,
        }
    }
}

fn coerce_color(value: &PropertyValue) -> Option<Color> {
    match value {
        PropertyValue::Color(c) => Some(*c),
        PropertyValue::String(s) => Color::from_hex(s),
        PropertyValue::List(items) if items.len() == 3 || items.len() == 4 => {
            let channels = items
                .iter()
                .map(|v| v.as_int().and_then(|c| u8::try_from(c).ok()))
                .collect::<Option<Vec<u8>>>()?;
            Some(Color::rgba(
                channels[0],
                channels[1],
                channels[2],
                channels.get(3).copied().unwrap_or(255),
            ))
        }
        _ => None,
    }
}

/// Trait for custom leaf properties.
///
/// Only `type_name` is required; the defaults accept any value and render it
/// untyped.
pub trait LeafPlugin: fmt::Debug {
    /// Human-readable name of this leaf variant.
    fn type_name(&self) -> &str;

    /// Narrow an incoming value, or return `None` to reject it.
    fn coerce(&self, value: PropertyValue) -> Option<PropertyValue> {
        Some(value)
    }

    fn display(
        &self,
        value: &PropertyValue,
        _attributes: &AttributeStore,
        _settings: &DisplaySettings,
    ) -> String {
        value.to_string()
    }

    fn icon(&self, _value: &PropertyValue) -> ValueIcon {
        ValueIcon::None
    }
}

/// Built-in or plugin leaf.
#[derive(Debug)]
pub enum Leaf {
    Builtin(LeafKind),
    Plugin(Box<dyn LeafPlugin>),
}

impl Leaf {
    pub fn type_name(&self) -> &str {
        match self {
            Leaf::Builtin(kind) => kind.display_name(),
            Leaf::Plugin(p) => p.type_name(),
        }
    }

    pub fn coerce(&self, value: PropertyValue) -> Option<PropertyValue> {
        if value.is_none() {
            return Some(value);
        }
        match self {
            Leaf::Builtin(kind) => kind.coerce(value),
            Leaf::Plugin(p) => p.coerce(value),
        }
    }

    pub fn display(
        &self,
        value: &PropertyValue,
        attributes: &AttributeStore,
        settings: &DisplaySettings,
    ) -> String {
        match self {
            Leaf::Builtin(kind) => kind.display(value, attributes, settings),
            Leaf::Plugin(p) => p.display(value, attributes, settings),
        }
    }

    pub fn icon(&self, value: &PropertyValue) -> ValueIcon {
        match self {
            Leaf::Builtin(kind) => kind.icon(value),
            Leaf::Plugin(p) => p.icon(value),
        }
    }

    pub fn builtin_kind(&self) -> Option<LeafKind> {
        match self {
            Leaf::Builtin(kind) => Some(*kind),
            Leaf::Plugin(_) => None,
        }
    }
}
