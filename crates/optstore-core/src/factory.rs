//! Ready-made keys for common value types.

use crate::codec::StringCodec;
use crate::key::DataKey;
use crate::value::KeyValue;

/// Separator used by string-list keys.
pub const LIST_SEPARATOR: char = ';';

/// Factory for common key types.
///
/// Primitive keys come with a codec, so they can be set from the command line,
/// and with the natural zero value as default.
pub struct KeyFactory;

impl KeyFactory {
    /// Boolean key, default `false`.
    pub fn bool(name: impl Into<String>) -> DataKey<bool> {
        DataKey::new(name)
            .with_default(false)
            .with_codec(StringCodec::boolean())
    }

    /// String key, default empty.
    pub fn string(name: impl Into<String>) -> DataKey<String> {
        Self::string_with(name, "")
    }

    /// String key with the given default.
    pub fn string_with(name: impl Into<String>, default: impl Into<String>) -> DataKey<String> {
        DataKey::new(name)
            .with_default(default.into())
            .with_codec(StringCodec::string())
    }

    /// 32-bit integer key, default `0`.
    pub fn integer(name: impl Into<String>) -> DataKey<i32> {
        Self::integer_with(name, 0)
    }

    /// 32-bit integer key with the given default.
    pub fn integer_with(name: impl Into<String>, default: i32) -> DataKey<i32> {
        DataKey::new(name)
            .with_default(default)
            .with_codec(StringCodec::parsed())
    }

    /// 64-bit integer key, default `0`.
    pub fn long(name: impl Into<String>) -> DataKey<i64> {
        Self::long_with(name, 0)
    }

    /// 64-bit integer key with the given default.
    pub fn long_with(name: impl Into<String>, default: i64) -> DataKey<i64> {
        DataKey::new(name)
            .with_default(default)
            .with_codec(StringCodec::parsed())
    }

    /// Floating point key, default `0.0`.
    pub fn double(name: impl Into<String>) -> DataKey<f64> {
        Self::double_with(name, 0.0)
    }

    /// Floating point key with the given default.
    pub fn double_with(name: impl Into<String>, default: f64) -> DataKey<f64> {
        DataKey::new(name)
            .with_default(default)
            .with_codec(StringCodec::parsed())
    }

    /// List of strings, written as `a;b;c`. Default empty.
    pub fn string_list(name: impl Into<String>) -> DataKey<Vec<String>> {
        Self::string_list_with(name, Vec::new())
    }

    /// List of strings with the given default.
    pub fn string_list_with(name: impl Into<String>, default: Vec<String>) -> DataKey<Vec<String>> {
        DataKey::new(name)
            .with_default(default)
            .with_codec(StringCodec::string_list(LIST_SEPARATOR))
    }

    /// Key for an arbitrary value type, without default or codec.
    pub fn object<T: KeyValue>(name: impl Into<String>) -> DataKey<T> {
        DataKey::new(name)
    }

    /// Key for an arbitrary value type with a default and no codec.
    pub fn generic<T: KeyValue>(name: impl Into<String>, default: T) -> DataKey<T> {
        DataKey::new(name).with_default(default)
    }
}
