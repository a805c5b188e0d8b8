//! Data stores.
//!
//! A [`DataStore`] holds values for keys. It comes in two flavours:
//!
//! - **open**: values keyed by name. Optionally bound to a definition, in
//!   which case keys outside it are refused.
//! - **closed**: values in a vector addressed through the definition's
//!   [`StoreDefinitionIndexes`].
//!
//! Reading a key without a stored value falls back to the key's default,
//! unless the store is strict.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use optstore_core::{AnyKey, DataKey, KeyError, KeyName, KeyValue, RawValue};

use crate::definition::StoreDefinition;
use crate::error::{display_name, StoreError, StoreResult};
use crate::indexes::StoreDefinitionIndexes;

/// Stored state of one key.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Value(RawValue),
    /// Present without a value; see [`StoreDefinition::default_values`].
    Undefined,
}

#[derive(Clone)]
enum Values {
    Keyed(HashMap<String, Slot>),
    Indexed {
        indexes: Arc<StoreDefinitionIndexes>,
        slots: Vec<Option<Slot>>,
    },
}

/// Values for a set of keys.
#[derive(Clone)]
pub struct DataStore {
    name: Option<String>,
    definition: Option<Arc<dyn StoreDefinition>>,
    values: Values,
    strict: bool,
}

impl DataStore {
    /// Open store with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_name(Some(name.into()))
    }

    /// Open store without a name.
    pub fn unnamed() -> Self {
        Self::with_name(None)
    }

    pub(crate) fn with_name(name: Option<String>) -> Self {
        Self {
            name,
            definition: None,
            values: Values::Keyed(HashMap::new()),
            strict: false,
        }
    }

    /// Open store that only accepts the keys of `definition`.
    pub fn for_definition(definition: Arc<dyn StoreDefinition>) -> Self {
        Self {
            name: definition.name().map(str::to_string),
            definition: Some(definition),
            values: Values::Keyed(HashMap::new()),
            strict: false,
        }
    }

    /// Array-backed store over the keys of `definition`.
    pub fn closed(definition: Arc<dyn StoreDefinition>) -> Self {
        let indexes = definition.indexes();
        let slots = vec![None; indexes.len()];
        Self {
            name: definition.name().map(str::to_string),
            definition: Some(definition),
            values: Values::Indexed { indexes, slots },
            strict: false,
        }
    }

    /// Store name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Definition the store is bound to, if any.
    pub fn definition(&self) -> Option<&Arc<dyn StoreDefinition>> {
        self.definition.as_ref()
    }

    /// Returns true for array-backed stores.
    pub fn is_closed(&self) -> bool {
        matches!(self.values, Values::Indexed { .. })
    }

    /// Returns true if missing values are errors instead of falling back to defaults.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Turns default fallback off (`true`) or on (`false`).
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    // ==================== Writes ====================

    /// Stores a value.
    pub fn set<T: KeyValue>(&mut self, key: &DataKey<T>, value: T) -> StoreResult<&mut Self> {
        self.put(key.name(), Slot::Value(RawValue::new(value)))?;
        Ok(self)
    }

    /// Stores a value whose type is checked against the key.
    pub fn set_raw(&mut self, key: &AnyKey, value: RawValue) -> StoreResult<&mut Self> {
        if !key.accepts(&value) {
            return Err(KeyError::type_mismatch(key.name(), key.type_name(), value.type_name()).into());
        }
        self.put(key.name(), Slot::Value(value))?;
        Ok(self)
    }

    /// Parses `text` with the key's codec and stores the result.
    pub fn set_string(&mut self, key: &AnyKey, text: &str) -> StoreResult<&mut Self> {
        let value = key.decode_raw(text)?;
        self.set_raw(key, value)
    }

    /// Stores a value only if the key has none. Returns true if it was stored.
    pub fn set_if_absent<T: KeyValue>(&mut self, key: &DataKey<T>, value: T) -> StoreResult<bool> {
        if self.has_value(key) {
            return Ok(false);
        }
        self.set(key, value)?;
        Ok(true)
    }

    /// Stores a value, failing if the key already has one.
    pub fn add<T: KeyValue>(&mut self, key: &DataKey<T>, value: T) -> StoreResult<&mut Self> {
        if self.has_value(key) {
            return Err(StoreError::AlreadyPresent {
                key: key.name().to_string(),
            });
        }
        self.set(key, value)
    }

    /// Overwrites a value, failing if the key has none.
    pub fn replace<T: KeyValue>(&mut self, key: &DataKey<T>, value: T) -> StoreResult<&mut Self> {
        if !self.has_value(key) {
            return Err(StoreError::NotPresent {
                key: key.name().to_string(),
            });
        }
        self.set(key, value)
    }

    /// Drops the value of a key. Returns true if there was one.
    pub fn remove<K: KeyName + ?Sized>(&mut self, key: &K) -> bool {
        let name = key.key_name();
        match &mut self.values {
            Values::Keyed(map) => map.remove(name).is_some(),
            Values::Indexed { indexes, slots } => match indexes.get_index(name) {
                Ok(index) => slots.get_mut(index).and_then(Option::take).is_some(),
                Err(_) => false,
            },
        }
    }

    /// Copies every value of `other` into this store.
    ///
    /// A store bound to a definition skips keys the definition lacks. Nothing is
    /// written unless every copied value fits its key.
    pub fn set_all(&mut self, other: &DataStore) -> StoreResult<&mut Self> {
        let mut accepted = Vec::new();
        for (name, slot) in other.entries() {
            if let Some(definition) = &self.definition {
                if !definition.has_key(name) {
                    debug!(
                        key = name,
                        store = %display_name(self.name()),
                        "skipping key outside the store definition"
                    );
                    continue;
                }
            }
            self.check_value(name, slot)?;
            accepted.push((name, slot));
        }
        for (name, slot) in accepted {
            self.put(name, slot.clone())?;
        }
        Ok(self)
    }

    pub(crate) fn seed_default(&mut self, key: &AnyKey) {
        let slot = key.default_raw().map_or(Slot::Undefined, Slot::Value);
        match &mut self.values {
            Values::Keyed(map) => {
                map.insert(key.name().to_string(), slot);
            }
            Values::Indexed { indexes, slots } => {
                if let Some(entry) = indexes
                    .get_index(key.name())
                    .ok()
                    .and_then(|index| slots.get_mut(index))
                {
                    *entry = Some(slot);
                }
            }
        }
    }

    fn put(&mut self, name: &str, slot: Slot) -> StoreResult<()> {
        self.check_key(name)?;
        self.check_value(name, &slot)?;
        match &mut self.values {
            Values::Keyed(map) => {
                map.insert(name.to_string(), slot);
            }
            Values::Indexed { indexes, slots } => {
                let index = indexes.get_index(name)?;
                if let Some(entry) = slots.get_mut(index) {
                    *entry = Some(slot);
                }
            }
        }
        Ok(())
    }

    // ==================== Reads ====================

    /// Value of a key.
    ///
    /// A stored value wins. Without one, a strict store fails and any other
    /// store returns the key's default.
    pub fn get<T: KeyValue>(&self, key: &DataKey<T>) -> StoreResult<T> {
        self.check_key(key.name())?;
        match self.slot(key.name()) {
            Some(Slot::Value(raw)) => raw.downcast_ref::<T>().cloned().ok_or_else(|| {
                StoreError::from(KeyError::type_mismatch(
                    key.name(),
                    key.type_name(),
                    raw.type_name(),
                ))
            }),
            Some(Slot::Undefined) => Err(StoreError::UndefinedValue {
                key: key.name().to_string(),
                store: display_name(self.name()),
            }),
            None if self.strict => Err(StoreError::NoValue {
                key: key.name().to_string(),
                store: display_name(self.name()),
            }),
            None => key.default_value().ok_or_else(|| StoreError::NoDefault {
                key: key.name().to_string(),
            }),
        }
    }

    /// Like [`Self::get`], discarding the error.
    pub fn try_get<T: KeyValue>(&self, key: &DataKey<T>) -> Option<T> {
        self.get(key).ok()
    }

    /// Stored value of a key, ignoring defaults.
    pub fn get_raw<K: KeyName + ?Sized>(&self, key: &K) -> Option<RawValue> {
        match self.slot(key.key_name()) {
            Some(Slot::Value(raw)) => Some(raw.clone()),
            _ => None,
        }
    }

    /// Returns true if the key is present, with a value or undefined.
    pub fn has_value<K: KeyName + ?Sized>(&self, key: &K) -> bool {
        self.slot(key.key_name()).is_some()
    }

    /// Names of keys that are present. Definition order when bound, otherwise sorted.
    pub fn keys_with_values(&self) -> Vec<String> {
        match &self.definition {
            Some(definition) => definition
                .keys()
                .iter()
                .map(AnyKey::name)
                .filter(|name| self.has_value(*name))
                .map(str::to_string)
                .collect(),
            None => self.entries().into_keys().map(str::to_string).collect(),
        }
    }

    /// Number of keys present.
    pub fn len(&self) -> usize {
        match &self.values {
            Values::Keyed(map) => map.len(),
            Values::Indexed { slots, .. } => slots.iter().filter(|slot| slot.is_some()).count(),
        }
    }

    /// Returns true if no key is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_key(&self, name: &str) -> StoreResult<()> {
        match &self.definition {
            Some(definition) if !definition.has_key(name) => Err(StoreError::KeyNotInDefinition {
                key: name.to_string(),
                definition: display_name(definition.name()),
            }),
            _ => Ok(()),
        }
    }

    /// A bound store only holds values of the definition key's type.
    fn check_value(&self, name: &str, slot: &Slot) -> StoreResult<()> {
        let (Some(definition), Slot::Value(value)) = (&self.definition, slot) else {
            return Ok(());
        };
        let key = definition.get_key(name)?;
        if key.accepts(value) {
            Ok(())
        } else {
            Err(KeyError::type_mismatch(name, key.type_name(), value.type_name()).into())
        }
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        match &self.values {
            Values::Keyed(map) => map.get(name),
            Values::Indexed { indexes, slots } => indexes
                .get_index(name)
                .ok()
                .and_then(|index| slots.get(index))
                .and_then(Option::as_ref),
        }
    }

    fn entries(&self) -> BTreeMap<&str, &Slot> {
        match &self.values {
            Values::Keyed(map) => map.iter().map(|(name, slot)| (name.as_str(), slot)).collect(),
            Values::Indexed { indexes, slots } => indexes
                .names()
                .iter()
                .zip(slots)
                .filter_map(|(name, slot)| slot.as_ref().map(|slot| (name.as_str(), slot)))
                .collect(),
        }
    }
}

impl PartialEq for DataStore {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.entries() == other.entries()
    }
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .field("strict", &self.strict)
            .field("values", &self.entries())
            .finish()
    }
}

impl fmt::Display for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name.as_deref().unwrap_or("DataStore"))?;
        for (i, name) in self.keys_with_values().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.slot(name) {
                Some(Slot::Value(value)) => write!(f, "{name}: {value:?}")?,
                _ => write!(f, "{name}: undefined")?,
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::GenericStoreDefinition;
    use optstore_core::KeyFactory;

    fn threads() -> DataKey<i32> {
        KeyFactory::integer_with("threads", 4)
    }

    fn output() -> DataKey<String> {
        KeyFactory::string("output")
    }

    fn definition() -> Arc<dyn StoreDefinition> {
        Arc::new(GenericStoreDefinition::new("Run", vec![threads().erased(), output().erased()]).unwrap())
    }

    #[test]
    fn test_open_store_set_and_get() {
        let mut store = DataStore::new("Test");
        assert_eq!(store.get(&threads()).unwrap(), 4);
        store.set(&threads(), 8).unwrap().set(&output(), "out".into()).unwrap();
        assert_eq!(store.get(&threads()).unwrap(), 8);
        assert_eq!(store.get(&output()).unwrap(), "out");
        assert_eq!(store.keys_with_values(), vec!["output", "threads"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_missing_value_without_default() {
        let store = DataStore::unnamed();
        let key = DataKey::<u8>::new("raw");
        assert_eq!(
            store.get(&key),
            Err(StoreError::NoDefault { key: "raw".into() })
        );
        assert_eq!(store.try_get(&key), None);
    }

    #[test]
    fn test_strict_store() {
        let mut store = DataStore::new("Strict");
        store.set_strict(true);
        assert!(matches!(store.get(&threads()), Err(StoreError::NoValue { .. })));
        store.set(&threads(), 1).unwrap();
        assert_eq!(store.get(&threads()).unwrap(), 1);
    }

    #[test]
    fn test_add_and_replace() {
        let mut store = DataStore::new("S");
        assert!(matches!(store.replace(&threads(), 2), Err(StoreError::NotPresent { .. })));
        store.add(&threads(), 2).unwrap();
        assert!(matches!(store.add(&threads(), 3), Err(StoreError::AlreadyPresent { .. })));
        store.replace(&threads(), 3).unwrap();
        assert_eq!(store.get(&threads()).unwrap(), 3);
    }

    #[test]
    fn test_set_if_absent_and_remove() {
        let mut store = DataStore::new("S");
        assert!(store.set_if_absent(&threads(), 2).unwrap());
        assert!(!store.set_if_absent(&threads(), 9).unwrap());
        assert_eq!(store.get(&threads()).unwrap(), 2);
        assert!(store.remove(&threads()));
        assert!(!store.remove("threads"));
        assert_eq!(store.get(&threads()).unwrap(), 4);
    }

    #[test]
    fn test_set_raw_checks_type() {
        let mut store = DataStore::new("S");
        let key = threads().erased();
        store.set_raw(&key, RawValue::new(5_i32)).unwrap();
        let err = store.set_raw(&key, RawValue::new("5".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::Key(KeyError::TypeMismatch { .. })));
        assert_eq!(store.get_raw("threads"), Some(RawValue::new(5_i32)));
    }

    #[test]
    fn test_set_string_uses_codec() {
        let mut store = DataStore::new("S");
        store.set_string(&threads().erased(), "12").unwrap();
        assert_eq!(store.get(&threads()).unwrap(), 12);

        let err = store.set_string(&threads().erased(), "twelve").unwrap_err();
        assert!(matches!(err, StoreError::Key(KeyError::Decode { .. })));

        let plain = DataKey::<i32>::new("plain").erased();
        assert!(matches!(
            store.set_string(&plain, "1"),
            Err(StoreError::Key(KeyError::NoCodec { .. }))
        ));
    }

    #[test]
    fn test_bound_store_rejects_unknown_keys() {
        let mut store = DataStore::for_definition(definition());
        assert_eq!(store.name(), Some("Run"));
        let stranger = KeyFactory::bool("stranger");
        let err = store.set(&stranger, true).unwrap_err();
        assert_eq!(
            err,
            StoreError::KeyNotInDefinition {
                key: "stranger".into(),
                definition: "Run".into()
            }
        );
        assert!(store.get(&stranger).is_err());
        store.set(&threads(), 6).unwrap();
        assert_eq!(store.keys_with_values(), vec!["threads"]);
    }

    #[test]
    fn test_closed_store() {
        let mut store = DataStore::closed(definition());
        assert!(store.is_closed());
        assert!(store.is_empty());
        store.set(&output(), "x".into()).unwrap();
        assert_eq!(store.get(&output()).unwrap(), "x");
        assert_eq!(store.get(&threads()).unwrap(), 4);
        assert!(store.set(&KeyFactory::bool("other"), true).is_err());
        assert!(store.remove(&output()));
        assert!(!store.has_value(&output()));
    }

    #[test]
    fn test_closed_and_open_compare_by_values() {
        let mut closed = DataStore::closed(definition());
        let mut open = DataStore::new("Run");
        closed.set(&threads(), 2).unwrap();
        open.set(&threads(), 2).unwrap();
        assert_eq!(closed, open);
        open.set(&output(), "o".into()).unwrap();
        assert_ne!(closed, open);
    }

    #[test]
    fn test_set_all_skips_unknown_keys_when_bound() {
        let mut source = DataStore::new("Source");
        source.set(&threads(), 3).unwrap();
        source.set(&KeyFactory::bool("extra"), true).unwrap();

        let mut closed = DataStore::closed(definition());
        closed.set_all(&source).unwrap();
        assert_eq!(closed.get(&threads()).unwrap(), 3);
        assert_eq!(closed.keys_with_values(), vec!["threads"]);

        let mut open = DataStore::new("Copy");
        open.set_all(&source).unwrap();
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn test_bound_store_rejects_same_name_of_other_type() {
        let impostor = DataKey::<String>::new("threads");
        for mut store in [DataStore::closed(definition()), DataStore::for_definition(definition())] {
            let err = store.set(&impostor, "eight".into()).unwrap_err();
            assert_eq!(
                err,
                StoreError::Key(KeyError::TypeMismatch {
                    key: "threads".into(),
                    expected: "i32".into(),
                    actual: "String".into(),
                })
            );
            assert!(store.add(&impostor, "eight".into()).is_err());
            assert!(store.set_if_absent(&impostor, "eight".into()).is_err());
            assert!(!store.has_value(&threads()));

            store.set(&threads(), 8).unwrap();
            assert!(matches!(
                store.replace(&impostor, "nine".into()),
                Err(StoreError::Key(KeyError::TypeMismatch { .. }))
            ));
            assert_eq!(store.get(&threads()).unwrap(), 8);
        }
    }

    #[test]
    fn test_set_all_writes_nothing_on_type_mismatch() {
        let mut source = DataStore::new("Source");
        source.set(&output(), "o".into()).unwrap();
        source.set(&DataKey::<String>::new("threads"), "eight".into()).unwrap();

        let mut closed = DataStore::closed(definition());
        let err = closed.set_all(&source).unwrap_err();
        assert!(matches!(err, StoreError::Key(KeyError::TypeMismatch { .. })));
        assert!(closed.is_empty());

        let mut open = DataStore::new("Copy");
        open.set_all(&source).unwrap();
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn test_seed_default_fills_both_layouts() {
        let blank = DataKey::<u8>::new("blank").erased();
        let mut keyed = DataStore::new("Run");
        let mut closed = DataStore::closed(definition());
        for store in [&mut keyed, &mut closed] {
            store.seed_default(&threads().erased());
            store.seed_default(&output().erased());
            assert_eq!(store.get_raw(&threads()), Some(RawValue::new(4_i32)));
            assert_eq!(store.get(&output()).unwrap(), "");
        }
        assert_eq!(keyed, closed);

        closed.seed_default(&blank);
        assert!(!closed.has_value(&blank));
        keyed.seed_default(&blank);
        assert!(matches!(
            keyed.get(&DataKey::<u8>::new("blank")),
            Err(StoreError::UndefinedValue { .. })
        ));
    }

    #[test]
    fn test_display() {
        let mut store = DataStore::for_definition(definition());
        store.set(&threads(), 2).unwrap();
        store.set(&output(), "a.txt".into()).unwrap();
        assert_eq!(store.to_string(), "Run [threads: 2, output: \"a.txt\"]");
        assert_eq!(DataStore::unnamed().to_string(), "DataStore []");
    }
}
