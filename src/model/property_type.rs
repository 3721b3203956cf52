//! Built-in property types and their string tags.
//!
//! Type tags are an open namespace: the factory accepts any string, and these
//! are only the tags registered out of the box.

use crate::model::leaf::LeafKind;
use serde::{Deserialize, Serialize};

pub const BOOL: &str = "bool";
pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const DOUBLE: &str = "double";
pub const STRING: &str = "string";
pub const COLOR: &str = "color";
pub const FILE: &str = "file";
pub const ENUM: &str = "enum";
pub const ENUM_PAIR: &str = "enum_pair";
pub const FLAG: &str = "flag";
pub const FLOAT_LIST: &str = "float_list";
pub const LIST: &str = "list";
pub const DICT: &str = "dict";
pub const GROUP: &str = "group";
pub const DYNAMIC_LIST: &str = "dynamic_list";
pub const DYNAMIC_ITEM: &str = "dynamic_item";

/// Built-in property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    // Leaves
    Bool,
    Int,
    Float,
    /// Same leaf as `Float`, kept as a distinct tag.
    Double,
    String,
    Color,
    File,
    Enum,
    EnumPair,
    Flag,
    FloatList,

    // Containers
    List,
    Dict,
    Group,
    DynamicList,
    DynamicItem,
}

impl PropertyType {
    pub fn tag(&self) -> &'static str {
        match self {
            PropertyType::Bool => BOOL,
            PropertyType::Int => INT,
            PropertyType::Float => FLOAT,
            PropertyType::Double => DOUBLE,
            PropertyType::String => STRING,
            PropertyType::Color => COLOR,
            PropertyType::File => FILE,
            PropertyType::Enum => ENUM,
            PropertyType::EnumPair => ENUM_PAIR,
            PropertyType::Flag => FLAG,
            PropertyType::FloatList => FLOAT_LIST,
            PropertyType::List => LIST,
            PropertyType::Dict => DICT,
            PropertyType::Group => GROUP,
            PropertyType::DynamicList => DYNAMIC_LIST,
            PropertyType::DynamicItem => DYNAMIC_ITEM,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.tag() == tag)
    }

    pub fn display_name(&self) -> &'static str {
        match self.leaf_kind() {
            Some(kind) => kind.display_name(),
            None => match self {
                PropertyType::List => "List",
                PropertyType::Dict => "Dictionary",
                PropertyType::Group => "Group",
                PropertyType::DynamicList => "Dynamic List",
                _ => "Dynamic Item",
            },
        }
    }

    pub fn all() -> &'static [PropertyType] {
        &[
            PropertyType::Bool,
            PropertyType::Int,
            PropertyType::Float,
            PropertyType::Double,
            PropertyType::String,
            PropertyType::Color,
            PropertyType::File,
            PropertyType::Enum,
            PropertyType::EnumPair,
            PropertyType::Flag,
            PropertyType::FloatList,
            PropertyType::List,
            PropertyType::Dict,
            PropertyType::Group,
            PropertyType::DynamicList,
            PropertyType::DynamicItem,
        ]
    }

    /// Leaf variant backing this type, if it is a leaf.
    pub fn leaf_kind(&self) -> Option<LeafKind> {
        Some(match self {
            PropertyType::Bool => LeafKind::Bool,
            PropertyType::Int => LeafKind::Int,
            PropertyType::Float | PropertyType::Double => LeafKind::Double,
            PropertyType::String => LeafKind::String,
            PropertyType::Color => LeafKind::Color,
            PropertyType::File => LeafKind::File,
            PropertyType::Enum => LeafKind::Enum,
            PropertyType::EnumPair => LeafKind::EnumPair,
            PropertyType::Flag => LeafKind::Flag,
            PropertyType::FloatList => LeafKind::FloatList,
            _ => return None,
        })
    }

    pub fn is_container(&self) -> bool {
        self.leaf_kind().is_none()
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
