//! Process-wide cache of definitions built from key sets.
//!
//! # Design
//!
//! - Definitions are keyed by the `TypeId` of the [`KeySet`]
//! - The cache lives for the whole process and is never evicted
//! - Each type gets its own `OnceCell`; the map's shard lock is only held while
//!   that cell is looked up or inserted
//! - The cell runs the build at most once at a time; racing callers wait for it
//!   and receive the same instance
//!
//! A key set's initialisers may look up other key sets: those live in other
//! cells, and no map lock is held while building. A key set that looks itself up
//! during initialisation blocks forever.

use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, trace};

use optstore_core::KeySet;

use crate::definition::{GenericStoreDefinition, StoreDefinition};
use crate::error::{DefinitionError, DefinitionResult};

static DEFINITIONS: Lazy<DefinitionCache> = Lazy::new(DefinitionCache::new);

type Slot = Arc<OnceCell<Arc<GenericStoreDefinition>>>;

/// Memoizing map from key-set type to definition.
#[derive(Debug, Default)]
pub struct DefinitionCache {
    entries: DashMap<TypeId, Slot>,
    calls: AtomicU64,
    hits: AtomicU64,
}

impl DefinitionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the definition for `K`, building it on first request.
    ///
    /// A failed build is not cached; the next call tries again.
    pub fn get_or_build<K: KeySet>(&self) -> DefinitionResult<Arc<GenericStoreDefinition>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let slot = self.slot(TypeId::of::<K>());

        if let Some(cached) = slot.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(set = %K::set_name(), "definition cache hit");
            return Ok(Arc::clone(cached));
        }

        let definition = slot.get_or_try_init(|| {
            let built = GenericStoreDefinition::from_key_set::<K>()?;
            debug!(
                set = %K::set_name(),
                keys = built.keys().len(),
                "built definition from key set"
            );
            Ok::<_, DefinitionError>(Arc::new(built))
        })?;
        Ok(Arc::clone(definition))
    }

    fn slot(&self, type_id: TypeId) -> Slot {
        if let Some(slot) = self.entries.get(&type_id) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.entries.entry(type_id).or_default().value())
    }

    /// Number of cached definitions.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `get_or_build` calls.
    pub fn total_calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Number of calls answered from the cache without waiting.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns true if the definition for `K` is cached.
    pub fn contains<K: KeySet>(&self) -> bool {
        self.entries
            .get(&TypeId::of::<K>())
            .is_some_and(|slot| slot.value().get().is_some())
    }
}

/// Entry point for definitions declared by [`KeySet`] types.
pub struct StoreDefinitions;

impl StoreDefinitions {
    /// Definition holding the keys of `K` in one implicit section, named after `K`.
    ///
    /// Repeated calls return the same `Arc`.
    pub fn from_key_set<K: KeySet>() -> DefinitionResult<Arc<GenericStoreDefinition>> {
        DEFINITIONS.get_or_build::<K>()
    }

    /// The process-wide cache.
    pub fn cache() -> &'static DefinitionCache {
        &DEFINITIONS
    }
}
