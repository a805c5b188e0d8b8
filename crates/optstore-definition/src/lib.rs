//! # Optstore Definition
//!
//! Schemas for typed option stores.
//!
//! This crate builds on the keys of `optstore-core`:
//!
//! - **Sections**: ordered, optionally named groups of keys
//! - **Definitions**: the full schema, with unique key names and default values
//! - **Builders**: incremental composition of definitions, including from other definitions
//! - **Indexes**: key to slot positions for array-backed stores
//! - **Key sets**: definitions declared on a type, cached for the whole process
//! - **Stores**: open and closed [`DataStore`]s validated against a definition
//!
//! ## Example
//!
//! ```rust
//! use optstore_core::prelude::*;
//! use optstore_definition::prelude::*;
//!
//! key_set! {
//!     pub struct Server {
//!         pub HOST: String = KeyFactory::string_with("host", "localhost");
//!         pub PORT: i32 = KeyFactory::integer_with("port", 8080);
//!     }
//! }
//!
//! let definition = StoreDefinitions::from_key_set::<Server>().unwrap();
//! assert_eq!(definition.to_string(), "Server -> [host, port]");
//!
//! let mut store = DataStore::closed(definition.clone());
//! CommandLineArgs::new(&*definition)
//!     .apply(&mut store, ["port=9000"])
//!     .unwrap();
//! assert_eq!(store.get(Server::PORT()).unwrap(), 9000);
//! assert_eq!(store.get(Server::HOST()).unwrap(), "localhost");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_pass_by_value)]

pub mod args;
pub mod builder;
pub mod definition;
pub mod describe;
pub mod error;
pub mod indexes;
pub mod registry;
pub mod section;
pub mod store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::args::CommandLineArgs;
    pub use crate::builder::StoreDefinitionBuilder;
    pub use crate::definition::{
        GenericStoreDefinition, StoreDefinition, StoreDefinitionBase, StoreDefinitionExt,
    };
    pub use crate::describe::{DefinitionDescriptor, KeyDescriptor, SectionDescriptor};
    pub use crate::error::{DefinitionError, DefinitionResult, StoreError, StoreResult};
    pub use crate::indexes::StoreDefinitionIndexes;
    pub use crate::registry::{DefinitionCache, StoreDefinitions};
    pub use crate::section::{StoreSection, StoreSectionBuilder};
    pub use crate::store::DataStore;
}

// Re-export commonly used types at crate root
pub use args::CommandLineArgs;
pub use builder::StoreDefinitionBuilder;
pub use definition::{GenericStoreDefinition, StoreDefinition, StoreDefinitionBase, StoreDefinitionExt};
pub use describe::DefinitionDescriptor;
pub use error::{DefinitionError, DefinitionResult, StoreError, StoreResult};
pub use indexes::StoreDefinitionIndexes;
pub use registry::{DefinitionCache, StoreDefinitions};
pub use section::{StoreSection, StoreSectionBuilder};
pub use store::DataStore;

pub use optstore_core;
