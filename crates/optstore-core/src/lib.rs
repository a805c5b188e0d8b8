//! # Optstore Core
//!
//! Typed keys for the optstore configuration library.
//!
//! This crate provides the building blocks the definition layer is made of:
//!
//! - **Keys**: [`DataKey<T>`] names one typed value; [`AnyKey`] erases the type
//! - **Values**: [`RawValue`] holds a value of any [`KeyValue`] type
//! - **Codecs**: [`StringCodec<T>`] parses values from text and renders them back
//! - **Providers**: [`KeyEnum`] and [`KeySet`] declare fixed key lists on a type
//!
//! ## Design Philosophy
//!
//! - **Name Identity**: keys with equal names address the same slot
//! - **Immutable Sharing**: keys are configured once, then cloned cheaply
//! - **Explicit Registration**: types list their keys; nothing is discovered at runtime
//!
//! ## Example
//!
//! ```rust
//! use optstore_core::prelude::*;
//!
//! let threads = KeyFactory::integer_with("threads", 4).with_label("Worker threads");
//! assert_eq!(threads.default_value(), Some(4));
//! assert_eq!(threads.decode("8").unwrap(), 8);
//! assert_eq!(threads.to_string(), "threads (i32 = 4)");
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

#[macro_use]
mod macros;

pub mod codec;
pub mod error;
pub mod factory;
pub mod key;
pub mod provider;
pub mod value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codec::StringCodec;
    pub use crate::error::{KeyError, KeyResult};
    pub use crate::factory::KeyFactory;
    pub use crate::key::{AnyKey, DataKey, KeyName};
    pub use crate::key_set;
    pub use crate::provider::{DataKeyProvider, KeyEnum, KeySet};
    pub use crate::value::{KeyValue, RawValue};
}

// Re-export commonly used types at crate root
pub use codec::StringCodec;
pub use error::{KeyError, KeyResult};
pub use factory::KeyFactory;
pub use key::{AnyKey, DataKey, KeyName};
pub use provider::{DataKeyProvider, KeyEnum, KeySet};
pub use value::{short_type_name, KeyValue, RawValue};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
