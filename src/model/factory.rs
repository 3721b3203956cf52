//! Property factory: the registry from type tag to creation function.
//!
//! All properties are created through a factory so containers that build
//! their own children (dynamic lists, dynamic items) use the same registry as
//! the application. Tags are an open namespace; besides the built-in tags in
//! [`property_type`](super::property_type), callers may register their own
//! creators or aliases of existing tags.

use crate::model::error::{PropertyError, PropertyResult};
use crate::model::id::PropertyId;
use crate::model::leaf::{Leaf, LeafKind};
use crate::model::node::PropertyKind;
use crate::model::property_type::PropertyType;
use crate::model::tree::PropertyTree;
use std::collections::BTreeMap;

/// Creation function. Receives the tree to allocate in and the tag it was
/// registered under (the alias target when created through an alias).
pub type PropertyCreator = fn(&mut PropertyTree, &str) -> PropertyId;

/// Upper bound on alias chains, guarding against alias loops.
const MAX_ALIAS_DEPTH: usize = 16;

#[derive(Debug, Clone)]
enum Registration {
    Creator(PropertyCreator),
    Alias(String),
}

#[derive(Debug, Clone)]
pub struct PropertyFactory {
    registry: BTreeMap<String, Registration>,
}

impl Default for PropertyFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyFactory {
    /// Factory with every built-in type registered.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        for ty in PropertyType::all() {
            factory.register(ty.tag(), create_builtin);
        }
        factory
    }

    /// Factory with nothing registered.
    pub fn empty() -> Self {
        Self {
            registry: BTreeMap::new(),
        }
    }

    /// Register (or replace) the creator for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, creator: PropertyCreator) {
        let tag = tag.into();
        if self
            .registry
            .insert(tag.clone(), Registration::Creator(creator))
            .is_some()
        {
            tracing::debug!("Replaced creator for property type {:?}", tag);
        }
    }

    /// Register `alias` as another name for the already-registered `target`.
    pub fn register_alias(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
    ) -> PropertyResult<()> {
        let alias = alias.into();
        let target = target.into();
        if alias == target || self.resolve(&target).is_none() {
            return Err(PropertyError::DanglingAlias { alias, target });
        }
        tracing::debug!("Registered property type alias {:?} -> {:?}", alias, target);
        self.registry.insert(alias, Registration::Alias(target));
        Ok(())
    }

    pub fn unregister(&mut self, tag: &str) -> bool {
        self.registry.remove(tag).is_some()
    }

    /// True when `tag` resolves to a creator.
    pub fn contains(&self, tag: &str) -> bool {
        self.resolve(tag).is_some()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// Follow aliases to a creator, returning it with the tag it is
    /// registered under.
    pub fn resolve<'a>(&'a self, tag: &'a str) -> Option<(PropertyCreator, &'a str)> {
        let mut current = tag;
        for _ in 0..MAX_ALIAS_DEPTH {
            match self.registry.get(current)? {
                Registration::Creator(creator) => return Some((*creator, current)),
                Registration::Alias(target) => current = target.as_str(),
            }
        }
        tracing::warn!("Alias chain for property type {:?} is too deep", tag);
        None
    }

    /// Fail on the first tag that does not resolve. Meant for startup checks
    /// so a bad tag surfaces before any tree is built.
    pub fn ensure_registered<'a>(
        &self,
        tags: impl IntoIterator<Item = &'a str>,
    ) -> PropertyResult<()> {
        for tag in tags {
            if !self.contains(tag) {
                return Err(PropertyError::UnknownType(tag.to_string()));
            }
        }
        Ok(())
    }

    /// Check that every registered alias still resolves.
    pub fn validate(&self) -> PropertyResult<()> {
        for (tag, registration) in &self.registry {
            if let Registration::Alias(target) = registration {
                if self.resolve(tag).is_none() {
                    return Err(PropertyError::DanglingAlias {
                        alias: tag.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn create_builtin(tree: &mut PropertyTree, tag: &str) -> PropertyId {
    let ty = PropertyType::from_tag(tag).unwrap_or_else(|| {
        tracing::warn!("Built-in creator used for foreign tag {:?}; creating a string", tag);
        PropertyType::String
    });
    match ty {
        PropertyType::List => tree.insert_node(tag, PropertyKind::List),
        PropertyType::Dict => tree.insert_node(tag, PropertyKind::Dict),
        PropertyType::Group => tree.insert_node(tag, PropertyKind::Group),
        PropertyType::DynamicList => tree.insert_dynamic_list(tag),
        PropertyType::DynamicItem => tree.insert_node(
            tag,
            PropertyKind::DynamicItem {
                implementation: None,
            },
        ),
        leaf => {
            let kind = leaf.leaf_kind().unwrap_or(LeafKind::String);
            tree.insert_node(tag, PropertyKind::Leaf(Leaf::Builtin(kind)))
        }
    }
}
