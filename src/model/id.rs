//! Identity types for the property model.
//!
//! A `PropertyId` is a generational key into the slot storage of
//! [`PropertyTree`](super::PropertyTree). Slots of destroyed properties are
//! reused, but the generation changes, so an id held after its property was
//! destroyed simply resolves to nothing.

use slotmap::{new_key_type, Key};
use std::fmt;

new_key_type! {
    /// Key into `PropertyTree::nodes`. The default key is null.
    pub struct PropertyId;
}

impl PropertyId {
    /// Null key that never resolves.
    #[inline]
    pub fn invalid() -> Self {
        Self::null()
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        !self.is_null()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Handle for an observer registered with a tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u32);

impl ObserverId {
    pub const INVALID: ObserverId = ObserverId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "ObserverId(INVALID)")
        } else {
            write!(f, "ObserverId({})", self.0)
        }
    }
}
