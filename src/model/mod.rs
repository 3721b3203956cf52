//! Property graph engine.
//!
//! The model is a tree of typed, named, observable properties:
//!
//! - `id` - Newtype ids for properties and observers
//! - `value` - [`PropertyValue`] carrier, [`Color`] and [`ValueIcon`]
//! - `attributes` - Per-property attribute store and attribute names
//! - `leaf` - Built-in leaf kinds and the [`LeafPlugin`] extension trait
//! - `node` - Node storage and the [`PropertyKind`] discriminator
//! - `factory` - Type tag registry
//! - `event` - Notifications and the [`PropertyObserver`] trait
//! - `tree` - [`PropertyTree`]: storage, creation and the base contract
//! - `container` / `dynamic` - List, Dict, Group, Dynamic List and Item
//!
//! All mutation is synchronous and single-threaded: a call returns only
//! after every observer it triggered has run.

pub mod attributes;
mod container;
mod dispatch;
mod dynamic;
pub mod error;
pub mod event;
pub mod factory;
pub mod id;
pub mod leaf;
pub mod node;
pub mod property_type;
pub mod tree;
pub mod value;

pub use attributes::{names, AttributeStore};
pub use error::{PropertyError, PropertyResult};
pub use event::{FnObserver, PropertyEvent, PropertyObserver};
pub use factory::{PropertyCreator, PropertyFactory};
pub use id::{ObserverId, PropertyId};
pub use leaf::{Leaf, LeafKind, LeafPlugin};
pub use node::{KindClass, PropertyKind, PropertyNode};
pub use property_type::PropertyType;
pub use tree::PropertyTree;
pub use value::{Color, PropertyValue, ValueIcon};
