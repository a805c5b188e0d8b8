//! Types that supply keys.
//!
//! There are two ways to declare a fixed set of keys on a type:
//!
//! - [`KeyEnum`]: an enum whose variants each provide one key.
//! - [`KeySet`]: a marker type listing its keys, usually declared with
//!   [`key_set!`](crate::key_set).

use std::any::type_name;

use crate::key::{AnyKey, DataKey};
use crate::value::{short_type_name, KeyValue};

/// Something that provides one key.
pub trait DataKeyProvider {
    /// The provided key.
    fn data_key(&self) -> AnyKey;
}

impl DataKeyProvider for AnyKey {
    fn data_key(&self) -> AnyKey {
        self.clone()
    }
}

impl<T: KeyValue> DataKeyProvider for DataKey<T> {
    fn data_key(&self) -> AnyKey {
        self.erased()
    }
}

/// An enum whose variants each provide a key.
pub trait KeyEnum: DataKeyProvider + Sized + 'static {
    /// All variants in declaration order.
    fn variants() -> &'static [Self];

    /// Name used for definitions built from the enum. Defaults to the type name.
    fn enum_name() -> String {
        short_type_name(type_name::<Self>())
    }

    /// Keys of all variants, in declaration order.
    fn keys() -> Vec<AnyKey> {
        Self::variants().iter().map(DataKeyProvider::data_key).collect()
    }
}

/// A type that declares a fixed list of keys.
pub trait KeySet: 'static {
    /// Name used for definitions built from the set. Defaults to the type name.
    fn set_name() -> String {
        short_type_name(type_name::<Self>())
    }

    /// Declared keys, in declaration order.
    fn keys() -> Vec<AnyKey>;
}
