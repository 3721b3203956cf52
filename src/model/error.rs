//! Property-model error types.

use crate::model::id::PropertyId;
use thiserror::Error;

/// Errors raised by structural operations on a property tree.
///
/// The contract-level operations (`add_child`, `remove_child`,
/// `set_value_type`) treat these as configuration errors and panic with the
/// message; the `try_*` variants hand them back instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Unknown property type: {0:?}")]
    UnknownType(String),

    #[error("Property {0:?} does not exist")]
    InvalidId(PropertyId),

    #[error("Property {child:?} already has parent {parent:?}")]
    AlreadyParented {
        child: PropertyId,
        parent: PropertyId,
    },

    #[error("Property {child:?} is not a child of {parent:?}")]
    NotAChild {
        child: PropertyId,
        parent: PropertyId,
    },

    #[error("Adding {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        child: PropertyId,
        parent: PropertyId,
    },

    #[error("Property {0:?} is not a dynamic list")]
    NotADynamicList(PropertyId),

    #[error("Length property {child:?} cannot leave dynamic list {parent:?}")]
    LengthChild {
        child: PropertyId,
        parent: PropertyId,
    },

    #[error("Property {0:?} is not a dynamic item")]
    NotADynamicItem(PropertyId),

    #[error("Type alias {alias:?} points to unregistered type {target:?}")]
    DanglingAlias { alias: String, target: String },
}

pub type PropertyResult<T> = std::result::Result<T, PropertyError>;
