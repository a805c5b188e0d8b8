//! Key to slot index tables.

use std::collections::HashMap;

use optstore_core::{AnyKey, KeyName};

use crate::definition::StoreDefinition;
use crate::error::{DefinitionError, DefinitionResult};

/// Maps each key of a definition to its position in the flattened key list.
///
/// Used to back array storage. Lookups accept a key handle or a plain name.
/// If two keys share a name, the later one's position wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDefinitionIndexes {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl StoreDefinitionIndexes {
    /// Index table for a definition.
    pub fn new<D: StoreDefinition + ?Sized>(definition: &D) -> Self {
        Self::from_keys(&definition.keys())
    }

    /// Index table for a key list.
    pub fn from_keys(keys: &[AnyKey]) -> Self {
        let names: Vec<String> = keys.iter().map(|key| key.name().to_string()).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        Self { names, positions }
    }

    /// Position of a key.
    pub fn get_index<K: KeyName + ?Sized>(&self, key: &K) -> DefinitionResult<usize> {
        let name = key.key_name();
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| DefinitionError::IndexNotFound {
                name: name.to_string(),
                available: self.names.clone(),
            })
    }

    /// Returns true if the key has a position.
    pub fn has_index<K: KeyName + ?Sized>(&self, key: &K) -> bool {
        self.positions.contains_key(key.key_name())
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Key names in slot order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
