//! Store definitions.
//!
//! A definition is the schema of a store: named sections of keys, a flattened
//! key list, a name lookup and the default values. Key names are unique across
//! the whole definition; every constructor checks this before returning.
//!
//! Custom definitions embed a [`StoreDefinitionBase`] and implement
//! [`StoreDefinition::base`]; everything else is provided.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use optstore_core::{AnyKey, DataKey, KeyEnum, KeySet, KeyValue};

use crate::describe::DefinitionDescriptor;
use crate::error::{display_name, DefinitionError, DefinitionResult};
use crate::indexes::StoreDefinitionIndexes;
use crate::section::StoreSection;
use crate::store::DataStore;

/// Schema of a store.
pub trait StoreDefinition: fmt::Debug + Send + Sync {
    /// Shared state backing the provided methods.
    fn base(&self) -> &StoreDefinitionBase;

    /// Definition name, if any.
    fn name(&self) -> Option<&str> {
        self.base().name()
    }

    /// All keys across sections, in order.
    fn keys(&self) -> Vec<AnyKey> {
        self.base().keys().to_vec()
    }

    /// Name to key lookup. Built on first use.
    fn key_map(&self) -> &HashMap<String, AnyKey> {
        self.base().key_map()
    }

    /// Key with the given name.
    fn get_key(&self, name: &str) -> DefinitionResult<AnyKey> {
        self.key_map()
            .get(name)
            .cloned()
            .ok_or_else(|| DefinitionError::KeyNotFound {
                name: name.to_string(),
                definition: display_name(self.name()),
            })
    }

    /// Returns true if a key with the given name exists.
    fn has_key(&self, name: &str) -> bool {
        self.key_map().contains_key(name)
    }

    /// Copy of the sections.
    fn sections(&self) -> Vec<StoreSection> {
        self.base().sections().to_vec()
    }

    /// A new store holding the default values.
    fn default_values(&self) -> DataStore {
        self.base().default_values()
    }

    /// Index table for array storage. Built on first use.
    fn indexes(&self) -> Arc<StoreDefinitionIndexes> {
        self.base().indexes()
    }

    /// Serializable description of the definition.
    fn describe(&self) -> DefinitionDescriptor {
        DefinitionDescriptor::from_definition(self)
    }
}

/// Typed lookups on any [`StoreDefinition`].
pub trait StoreDefinitionExt: StoreDefinition {
    /// Key with the given name and value type `T`.
    fn get_typed_key<T: KeyValue>(&self, name: &str) -> DefinitionResult<DataKey<T>> {
        let key = self.get_key(name)?;
        key.downcast::<T>()
            .ok_or_else(|| DefinitionError::KeyTypeMismatch {
                name: name.to_string(),
                expected: optstore_core::short_type_name(std::any::type_name::<T>()),
                actual: key.type_name(),
            })
    }
}

impl<D: StoreDefinition + ?Sized> StoreDefinitionExt for D {}

/// State shared by all definitions.
#[derive(Clone)]
pub struct StoreDefinitionBase {
    name: Option<String>,
    sections: Vec<StoreSection>,
    keys: Vec<AnyKey>,
    default_data: Option<DataStore>,
    key_map: OnceCell<HashMap<String, AnyKey>>,
    indexes: OnceCell<Arc<StoreDefinitionIndexes>>,
}

impl StoreDefinitionBase {
    /// Validates and stores the sections.
    ///
    /// `default_data`, when given, is returned by [`Self::default_values`]
    /// instead of defaults computed from the keys.
    pub fn new(
        name: Option<String>,
        sections: Vec<StoreSection>,
        default_data: Option<DataStore>,
    ) -> DefinitionResult<Self> {
        let keys = StoreSection::all_keys(&sections);
        check_unique_names(&keys)?;
        Ok(Self {
            name,
            sections,
            keys,
            default_data,
            key_map: OnceCell::new(),
            indexes: OnceCell::new(),
        })
    }

    /// Single implicit section holding `keys`.
    pub fn from_keys(name: Option<String>, keys: Vec<AnyKey>) -> DefinitionResult<Self> {
        Self::new(name, vec![StoreSection::unnamed(keys)], None)
    }

    /// Definition name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Flattened keys.
    pub fn keys(&self) -> &[AnyKey] {
        &self.keys
    }

    /// Sections.
    pub fn sections(&self) -> &[StoreSection] {
        &self.sections
    }

    /// Name to key lookup.
    pub fn key_map(&self) -> &HashMap<String, AnyKey> {
        self.key_map.get_or_init(|| {
            self.keys
                .iter()
                .map(|key| (key.name().to_string(), key.clone()))
                .collect()
        })
    }

    /// Index table.
    pub fn indexes(&self) -> Arc<StoreDefinitionIndexes> {
        Arc::clone(
            self.indexes
                .get_or_init(|| Arc::new(StoreDefinitionIndexes::from_keys(&self.keys))),
        )
    }

    /// A new store with the default values.
    ///
    /// Keys with a default supplier get that value. Keys without one are
    /// recorded as present with an undefined value.
    pub fn default_values(&self) -> DataStore {
        if let Some(data) = &self.default_data {
            return data.clone();
        }
        let mut store = DataStore::with_name(self.name.clone());
        for key in &self.keys {
            store.seed_default(key);
        }
        store
    }
}

impl fmt::Debug for StoreDefinitionBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreDefinitionBase")
            .field("name", &self.name)
            .field("sections", &self.sections)
            .field("has_default_data", &self.default_data.is_some())
            .finish()
    }
}

fn check_unique_names(keys: &[AnyKey]) -> DefinitionResult<()> {
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key.name()) {
            return Err(DefinitionError::DuplicateKey {
                name: key.name().to_string(),
            });
        }
    }
    Ok(())
}

/// The default [`StoreDefinition`].
#[derive(Debug, Clone)]
pub struct GenericStoreDefinition {
    base: StoreDefinitionBase,
}

impl GenericStoreDefinition {
    /// Named definition with one implicit section.
    pub fn new(name: impl Into<String>, keys: Vec<AnyKey>) -> DefinitionResult<Self> {
        Self::from_base(StoreDefinitionBase::from_keys(Some(name.into()), keys))
    }

    /// Unnamed definition with one implicit section.
    pub fn unnamed(keys: Vec<AnyKey>) -> DefinitionResult<Self> {
        Self::from_base(StoreDefinitionBase::from_keys(None, keys))
    }

    /// Definition from prebuilt sections and optional default data.
    pub fn with_sections(
        name: Option<String>,
        sections: Vec<StoreSection>,
        default_data: Option<DataStore>,
    ) -> DefinitionResult<Self> {
        Self::from_base(StoreDefinitionBase::new(name, sections, default_data))
    }

    /// One key per enum variant, named after the enum.
    pub fn from_enum<E: KeyEnum>() -> DefinitionResult<Self> {
        Self::new(E::enum_name(), E::keys())
    }

    /// The keys of a [`KeySet`], named after the set. Not cached; see
    /// [`StoreDefinitions`](crate::StoreDefinitions).
    pub fn from_key_set<K: KeySet>() -> DefinitionResult<Self> {
        Self::new(K::set_name(), K::keys())
    }

    fn from_base(base: DefinitionResult<StoreDefinitionBase>) -> DefinitionResult<Self> {
        base.map(|base| Self { base })
    }
}

impl StoreDefinition for GenericStoreDefinition {
    fn base(&self) -> &StoreDefinitionBase {
        &self.base
    }
}

impl fmt::Display for GenericStoreDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.base.keys.iter().map(AnyKey::name).collect();
        write!(
            f,
            "{} -> [{}]",
            display_name(self.base.name()),
            names.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optstore_core::{DataKeyProvider, KeyFactory};

    fn string_key() -> DataKey<String> {
        KeyFactory::string_with("testString", "default")
    }

    fn int_key() -> DataKey<i32> {
        KeyFactory::integer_with("testInt", 42)
    }

    #[test]
    fn test_keys_and_key_map() {
        let definition =
            GenericStoreDefinition::new("TestStore", vec![string_key().erased(), int_key().erased()])
                .unwrap();
        assert_eq!(definition.name(), Some("TestStore"));
        assert_eq!(definition.keys().len(), 2);
        assert_eq!(definition.key_map().len(), 2);
        assert_eq!(definition.get_key("testInt").unwrap(), int_key().erased());
        assert!(definition.has_key("testString"));
        assert!(!definition.has_key("teststring"));
        assert!(!definition.has_key(""));
    }

    #[test]
    fn test_key_map_is_cached() {
        let definition = GenericStoreDefinition::new("S", vec![int_key().erased()]).unwrap();
        assert!(std::ptr::eq(definition.key_map(), definition.key_map()));
        assert!(Arc::ptr_eq(&definition.indexes(), &definition.indexes()));
    }

    #[test]
    fn test_get_missing_key() {
        let definition = GenericStoreDefinition::new("S", vec![int_key().erased()]).unwrap();
        let err = definition.get_key("nope").unwrap_err();
        assert_eq!(
            err,
            DefinitionError::KeyNotFound {
                name: "nope".into(),
                definition: "S".into()
            }
        );
    }

    #[test]
    fn test_typed_key() {
        let definition = GenericStoreDefinition::new("S", vec![int_key().erased()]).unwrap();
        let key: DataKey<i32> = definition.get_typed_key("testInt").unwrap();
        assert_eq!(key.default_value(), Some(42));
        let err = definition.get_typed_key::<String>("testInt").unwrap_err();
        assert!(matches!(err, DefinitionError::KeyTypeMismatch { ref actual, .. } if actual == "i32"));
    }

    #[test]
    fn test_duplicate_same_instance() {
        let key = string_key();
        let err = GenericStoreDefinition::new("S", vec![key.erased(), key.erased()]).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate key name: 'testString'");
    }

    #[test]
    fn test_duplicate_across_sections() {
        let sections = vec![
            StoreSection::named("one", vec![string_key().erased()]),
            StoreSection::named("two", vec![int_key().erased(), DataKey::<bool>::new("testString").erased()]),
        ];
        let err = GenericStoreDefinition::with_sections(Some("S".into()), sections, None).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateKey {
                name: "testString".into()
            }
        );
    }

    #[test]
    fn test_sections_are_copies() {
        let definition = GenericStoreDefinition::with_sections(
            Some("S".into()),
            vec![
                StoreSection::named("a", vec![string_key().erased()]),
                StoreSection::unnamed(vec![int_key().erased()]),
            ],
            None,
        )
        .unwrap();
        let mut sections = definition.sections();
        sections.clear();
        assert_eq!(definition.sections().len(), 2);
        assert_eq!(definition.sections()[0].name(), Some("a"));
        assert_eq!(definition.sections()[1].name(), None);
    }

    #[test]
    fn test_default_values_are_fresh() {
        let definition =
            GenericStoreDefinition::new("S", vec![string_key().erased(), int_key().erased()]).unwrap();
        let mut first = definition.default_values();
        let second = definition.default_values();
        assert_eq!(first, second);
        assert_eq!(first.name(), Some("S"));
        assert_eq!(first.get(&int_key()).unwrap(), 42);

        first.set(&int_key(), 7).unwrap();
        assert_eq!(definition.default_values().get(&int_key()).unwrap(), 42);
        assert_ne!(first, second);
    }

    #[test]
    fn test_key_without_default_still_has_value() {
        let no_default = DataKey::<i32>::new("noDefault");
        let definition = GenericStoreDefinition::new("S", vec![no_default.erased()]).unwrap();
        let defaults = definition.default_values();
        assert!(defaults.has_value(&no_default));
        assert!(defaults.get(&no_default).is_err());
    }

    #[test]
    fn test_supplied_default_data_is_used() {
        let mut data = DataStore::new("Custom");
        data.set(&int_key(), 5).unwrap();
        let definition = GenericStoreDefinition::with_sections(
            Some("S".into()),
            vec![StoreSection::unnamed(vec![int_key().erased()])],
            Some(data.clone()),
        )
        .unwrap();
        assert_eq!(definition.default_values(), data);
        assert_eq!(definition.default_values().get(&int_key()).unwrap(), 5);
    }

    #[test]
    fn test_empty_and_unnamed() {
        let definition = GenericStoreDefinition::new("EmptyStore", Vec::new()).unwrap();
        assert!(definition.keys().is_empty());
        assert!(definition.default_values().keys_with_values().is_empty());
        assert_eq!(definition.to_string(), "EmptyStore -> []");

        let unnamed = GenericStoreDefinition::unnamed(vec![int_key().erased()]).unwrap();
        assert_eq!(unnamed.name(), None);
        assert!(unnamed.to_string().starts_with("null -> ["));

        let empty_name = GenericStoreDefinition::new("", vec![int_key().erased()]).unwrap();
        assert!(empty_name.to_string().starts_with(" -> ["));
    }

    #[test]
    fn test_display() {
        let definition =
            GenericStoreDefinition::new("TestStore", vec![string_key().erased(), int_key().erased()])
                .unwrap();
        assert_eq!(definition.to_string(), "TestStore -> [testString, testInt]");
    }

    #[derive(Debug, Clone, Copy)]
    enum Colors {
        Foreground,
        Background,
    }

    impl DataKeyProvider for Colors {
        fn data_key(&self) -> AnyKey {
            match self {
                Colors::Foreground => KeyFactory::string_with("fg", "black").erased(),
                Colors::Background => KeyFactory::string_with("bg", "white").erased(),
            }
        }
    }

    impl KeyEnum for Colors {
        fn variants() -> &'static [Self] {
            &[Colors::Foreground, Colors::Background]
        }
    }

    #[test]
    fn test_from_enum() {
        let definition = GenericStoreDefinition::from_enum::<Colors>().unwrap();
        assert_eq!(definition.name(), Some("Colors"));
        assert_eq!(definition.to_string(), "Colors -> [fg, bg]");
    }

    #[derive(Debug)]
    struct Custom {
        base: StoreDefinitionBase,
    }

    impl StoreDefinition for Custom {
        fn base(&self) -> &StoreDefinitionBase {
            &self.base
        }
    }

    #[test]
    fn test_custom_definition_gets_provided_behaviour() {
        let custom = Custom {
            base: StoreDefinitionBase::from_keys(Some("Custom".into()), vec![int_key().erased()])
                .unwrap(),
        };
        let as_dyn: &dyn StoreDefinition = &custom;
        assert_eq!(as_dyn.name(), Some("Custom"));
        assert!(as_dyn.has_key("testInt"));
        assert_eq!(as_dyn.indexes().get_index("testInt").unwrap(), 0);
        assert_eq!(as_dyn.get_typed_key::<i32>("testInt").unwrap().name(), "testInt");
    }
}
