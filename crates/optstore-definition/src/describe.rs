//! Serializable description of a definition, for GUI and tooling consumers.

use serde::{Deserialize, Serialize};

use optstore_core::AnyKey;

use crate::definition::StoreDefinition;
use crate::section::StoreSection;

/// One key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Key name.
    pub name: String,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Short value type name.
    pub value_type: String,
    /// Whether the key has a default supplier.
    pub has_default: bool,
    /// Default rendered with the key's codec, or its debug form without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Whether the key can be set from text.
    pub parsable: bool,
}

impl KeyDescriptor {
    /// Describes a key.
    pub fn from_key(key: &AnyKey) -> Self {
        let default = key.default_raw().map(|value| {
            key.encode_raw(&value)
                .unwrap_or_else(|_| format!("{value:?}"))
        });
        Self {
            name: key.name().to_string(),
            label: key.label().map(str::to_string),
            value_type: key.type_name(),
            has_default: key.has_default(),
            default,
            parsable: key.has_codec(),
        }
    }
}

/// One section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// Section name; absent for implicit sections.
    #[serde(default)]
    pub name: Option<String>,
    /// Keys in order.
    pub keys: Vec<KeyDescriptor>,
}

impl SectionDescriptor {
    /// Describes a section.
    pub fn from_section(section: &StoreSection) -> Self {
        Self {
            name: section.name().map(str::to_string),
            keys: section.iter().map(KeyDescriptor::from_key).collect(),
        }
    }
}

/// A whole definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionDescriptor {
    /// Definition name.
    #[serde(default)]
    pub name: Option<String>,
    /// Sections in order.
    pub sections: Vec<SectionDescriptor>,
}

impl DefinitionDescriptor {
    /// Describes a definition.
    pub fn from_definition<D: StoreDefinition + ?Sized>(definition: &D) -> Self {
        Self {
            name: definition.name().map(str::to_string),
            sections: definition
                .sections()
                .iter()
                .map(SectionDescriptor::from_section)
                .collect(),
        }
    }

    /// Total number of keys.
    pub fn key_count(&self) -> usize {
        self.sections.iter().map(|section| section.keys.len()).sum()
    }

    /// Looks up a key by name.
    pub fn key(&self, name: &str) -> Option<&KeyDescriptor> {
        self.sections
            .iter()
            .flat_map(|section| section.keys.iter())
            .find(|key| key.name == name)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses JSON produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
