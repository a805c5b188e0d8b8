//! Incremental construction of store definitions.

use optstore_core::{short_type_name, AnyKey};

use crate::definition::{GenericStoreDefinition, StoreDefinition};
use crate::error::DefinitionResult;
use crate::section::StoreSection;
use crate::store::DataStore;

#[derive(Debug, Clone)]
struct PendingSection {
    name: Option<String>,
    keys: Vec<AnyKey>,
}

/// Builds a [`GenericStoreDefinition`] step by step.
///
/// Keys added before any section is started go to an implicit unnamed section,
/// which comes first in the result. [`build`](Self::build) takes a snapshot and
/// leaves the builder usable.
///
/// ```rust
/// use optstore_core::KeyFactory;
/// use optstore_definition::prelude::*;
///
/// let definition = StoreDefinitionBuilder::new("App")
///     .add_key(KeyFactory::bool("a"))
///     .start_section(Some("Cfg"))
///     .add_key(KeyFactory::integer("b"))
///     .build()
///     .unwrap();
///
/// assert_eq!(definition.sections().len(), 2);
/// assert_eq!(definition.to_string(), "App -> [a, b]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreDefinitionBuilder {
    name: Option<String>,
    implicit: Vec<AnyKey>,
    sections: Vec<PendingSection>,
    current: Option<usize>,
    default_data: Option<DataStore>,
}

impl StoreDefinitionBuilder {
    /// Builder for a named definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builder for an unnamed definition.
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Builder for a definition named after the type `T`.
    pub fn named_after<T: ?Sized>() -> Self {
        Self::new(short_type_name(std::any::type_name::<T>()))
    }

    /// Adds a key to the current section.
    pub fn add_key(mut self, key: impl Into<AnyKey>) -> Self {
        let key = key.into();
        match self.current {
            Some(index) if index < self.sections.len() => self.sections[index].keys.push(key),
            _ => self.implicit.push(key),
        }
        self
    }

    /// Adds several keys to the current section.
    pub fn add_keys<I>(self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AnyKey>,
    {
        keys.into_iter().fold(self, |builder, key| builder.add_key(key))
    }

    /// Starts a new section; later keys go to it.
    pub fn start_section(mut self, name: Option<&str>) -> Self {
        self.sections.push(PendingSection {
            name: name.map(str::to_string),
            keys: Vec::new(),
        });
        self.current = Some(self.sections.len() - 1);
        self
    }

    /// Uses `store` as the default values instead of computing them from the keys.
    pub fn set_default_values(mut self, store: DataStore) -> Self {
        self.default_data = Some(store);
        self
    }

    /// Imports the keys of `definition` as a new unnamed section.
    pub fn add_definition<D: StoreDefinition + ?Sized>(self, definition: &D) -> Self {
        self.import(None, definition)
    }

    /// Imports the keys of `definition` as a section named after it.
    pub fn add_named_definition<D: StoreDefinition + ?Sized>(self, definition: &D) -> Self {
        let name = definition.name().map(str::to_string);
        self.import(name, definition)
    }

    /// Imports the keys of `definition` as a section called `name`.
    pub fn add_named_definition_as<D: StoreDefinition + ?Sized>(
        self,
        name: impl Into<String>,
        definition: &D,
    ) -> Self {
        self.import(Some(name.into()), definition)
    }

    // The current section does not change, so keys added afterwards still go
    // to the last started section.
    fn import<D: StoreDefinition + ?Sized>(mut self, name: Option<String>, definition: &D) -> Self {
        self.sections.push(PendingSection {
            name,
            keys: definition.keys(),
        });
        self
    }

    /// Builds the definition.
    ///
    /// Fails if two keys share a name anywhere in the definition.
    pub fn build(&self) -> DefinitionResult<GenericStoreDefinition> {
        let mut sections = Vec::with_capacity(self.sections.len() + 1);
        if !self.implicit.is_empty() {
            sections.push(StoreSection::unnamed(self.implicit.clone()));
        }
        sections.extend(
            self.sections
                .iter()
                .map(|pending| StoreSection::new(pending.name.clone(), pending.keys.clone())),
        );
        GenericStoreDefinition::with_sections(self.name.clone(), sections, self.default_data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DefinitionError;
    use optstore_core::{DataKey, KeyFactory};

    fn names(definition: &GenericStoreDefinition) -> Vec<String> {
        definition.keys().iter().map(|key| key.name().to_string()).collect()
    }

    #[test]
    fn test_implicit_then_named_section() {
        let a = KeyFactory::string("a");
        let b = KeyFactory::integer("b");
        let definition = StoreDefinitionBuilder::new("App")
            .add_key(&a)
            .start_section(Some("Cfg"))
            .add_key(&b)
            .build()
            .unwrap();

        let sections = definition.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name(), None);
        assert_eq!(sections[0].keys(), vec![a.erased()]);
        assert_eq!(sections[1].name(), Some("Cfg"));
        assert_eq!(sections[1].keys(), vec![b.erased()]);
        assert_eq!(names(&definition), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_builder() {
        let definition = StoreDefinitionBuilder::new("Empty").build().unwrap();
        assert!(definition.sections().is_empty());
        assert!(definition.keys().is_empty());
    }

    #[test]
    fn test_empty_started_sections_are_kept() {
        let definition = StoreDefinitionBuilder::new("S")
            .start_section(Some("first"))
            .start_section(None)
            .build()
            .unwrap();
        let sections = definition.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name(), Some("first"));
        assert_eq!(sections[1].name(), None);
    }

    #[test]
    fn test_add_keys() {
        let definition = StoreDefinitionBuilder::unnamed()
            .add_keys([KeyFactory::bool("x"), KeyFactory::bool("y")])
            .add_keys(vec![KeyFactory::integer("z").erased()])
            .build()
            .unwrap();
        assert_eq!(definition.name(), None);
        assert_eq!(names(&definition), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_duplicates_fail_on_build() {
        let key = KeyFactory::string("dup");
        let err = StoreDefinitionBuilder::new("S")
            .add_key(&key)
            .start_section(Some("other"))
            .add_key(DataKey::<i32>::new("dup"))
            .build()
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateKey { name: "dup".into() });
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = StoreDefinitionBuilder::new("S").add_key(KeyFactory::bool("a"));
        let first = builder.build().unwrap();
        let builder = builder.add_key(KeyFactory::bool("b"));
        let second = builder.build().unwrap();
        assert_eq!(first.keys().len(), 1);
        assert_eq!(second.keys().len(), 2);
    }

    #[test]
    fn test_import_definitions() {
        let imported = GenericStoreDefinition::new(
            "MockStore",
            vec![KeyFactory::string("s").erased(), KeyFactory::integer("i").erased()],
        )
        .unwrap();

        let unnamed = StoreDefinitionBuilder::new("App").add_definition(&imported).build().unwrap();
        assert_eq!(unnamed.sections().len(), 1);
        assert_eq!(unnamed.sections()[0].name(), None);
        assert_eq!(names(&unnamed), vec!["s", "i"]);

        let named = StoreDefinitionBuilder::new("App")
            .add_named_definition(&imported)
            .build()
            .unwrap();
        assert_eq!(named.sections()[0].name(), Some("MockStore"));

        let custom = StoreDefinitionBuilder::new("App")
            .add_named_definition_as("CustomSection", &imported)
            .build()
            .unwrap();
        assert_eq!(custom.sections()[0].name(), Some("CustomSection"));
    }

    #[test]
    fn test_keys_after_import_stay_in_current_section() {
        let imported = GenericStoreDefinition::new("Other", vec![KeyFactory::bool("o").erased()]).unwrap();
        let definition = StoreDefinitionBuilder::new("App")
            .start_section(Some("Main"))
            .add_definition(&imported)
            .add_key(KeyFactory::bool("m"))
            .build()
            .unwrap();
        let sections = definition.sections();
        assert_eq!(sections[0].name(), Some("Main"));
        assert_eq!(sections[0].len(), 1);
        assert_eq!(sections[1].len(), 1);
        assert_eq!(names(&definition), vec!["m", "o"]);
    }

    #[test]
    fn test_set_default_values_overrides() {
        let threads = KeyFactory::integer_with("threads", 4);
        let mut defaults = DataStore::new("Preset");
        defaults.set(&threads, 16).unwrap();

        let definition = StoreDefinitionBuilder::new("App")
            .add_key(&threads)
            .set_default_values(defaults)
            .build()
            .unwrap();
        let values = definition.default_values();
        assert_eq!(values.name(), Some("Preset"));
        assert_eq!(values.get(&threads).unwrap(), 16);
    }

    #[test]
    fn test_named_after_type() {
        struct ServerOptions;
        let definition = StoreDefinitionBuilder::named_after::<ServerOptions>().build().unwrap();
        assert_eq!(definition.name(), Some("ServerOptions"));
    }
}
