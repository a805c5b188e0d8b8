//! Store sections.

use std::collections::HashSet;

use optstore_core::AnyKey;

use crate::error::{DefinitionError, DefinitionResult};

/// An ordered, optionally named group of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSection {
    name: Option<String>,
    keys: Vec<AnyKey>,
}

impl StoreSection {
    /// Creates a section.
    pub fn new(name: Option<String>, keys: Vec<AnyKey>) -> Self {
        Self { name, keys }
    }

    /// Creates a named section.
    pub fn named(name: impl Into<String>, keys: Vec<AnyKey>) -> Self {
        Self::new(Some(name.into()), keys)
    }

    /// Creates an unnamed section.
    pub fn unnamed(keys: Vec<AnyKey>) -> Self {
        Self::new(None, keys)
    }

    /// Section name; `None` for implicit sections.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Copy of the keys in order.
    pub fn keys(&self) -> Vec<AnyKey> {
        self.keys.clone()
    }

    /// Iterates the keys without copying.
    pub fn iter(&self) -> impl Iterator<Item = &AnyKey> {
        self.keys.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the section has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Flattens the keys of `sections`, keeping order.
    pub fn all_keys(sections: &[StoreSection]) -> Vec<AnyKey> {
        sections
            .iter()
            .flat_map(|section| section.keys.iter().cloned())
            .collect()
    }
}

/// Builds a [`StoreSection`], refusing keys whose name is already in it.
#[derive(Debug, Clone, Default)]
pub struct StoreSectionBuilder {
    name: Option<String>,
    keys: Vec<AnyKey>,
    names: HashSet<String>,
}

impl StoreSectionBuilder {
    /// Builder for an unnamed section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a named section.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Appends a key.
    ///
    /// Fails if a key with the same name was already added, including the same key twice.
    pub fn add(&mut self, key: impl Into<AnyKey>) -> DefinitionResult<&mut Self> {
        let key = key.into();
        if !self.names.insert(key.name().to_string()) {
            return Err(DefinitionError::KeyClash {
                name: key.name().to_string(),
            });
        }
        self.keys.push(key);
        Ok(self)
    }

    /// Number of keys added so far.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no key was added.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Snapshot of the section built so far.
    pub fn build(&self) -> StoreSection {
        StoreSection::new(self.name.clone(), self.keys.clone())
    }
}
