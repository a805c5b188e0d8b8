//! Data keys.
//!
//! A [`DataKey<T>`] names one configuration value of type `T` and may carry a
//! default supplier, a human readable label and a [`StringCodec`]. Keys are
//! configured once with the `with_*` methods and then shared; clones point at
//! the same allocation.
//!
//! Equality and hashing use the name only. Two keys with the same name address
//! the same slot, whatever their identity. [`AnyKey::same_instance`] tells
//! instances apart when that matters.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use crate::codec::{ErasedCodec, StringCodec};
use crate::error::{KeyError, KeyResult};
use crate::value::{short_type_name, KeyValue, RawValue};

type DefaultFn = dyn Fn() -> RawValue + Send + Sync;

#[derive(Clone)]
struct KeyInner {
    name: String,
    label: Option<String>,
    value_type: TypeId,
    type_name: &'static str,
    default: Option<Arc<DefaultFn>>,
    codec: Option<Arc<dyn ErasedCodec>>,
}

impl KeyInner {
    fn default_raw(&self) -> Option<RawValue> {
        self.default.as_ref().map(|supplier| supplier())
    }

    fn short_type(&self) -> String {
        short_type_name(self.type_name)
    }

    fn decode_raw(&self, input: &str) -> KeyResult<RawValue> {
        let codec = self.codec.as_ref().ok_or_else(|| KeyError::NoCodec {
            key: self.name.clone(),
        })?;
        codec.decode_raw(input).map_err(|reason| {
            debug!("key '{}' rejected {:?}: {}", self.name, input, reason);
            KeyError::Decode {
                key: self.name.clone(),
                input: input.to_string(),
                reason,
            }
        })
    }

    fn encode_raw(&self, value: &RawValue) -> KeyResult<String> {
        let codec = self.codec.as_ref().ok_or_else(|| KeyError::NoCodec {
            key: self.name.clone(),
        })?;
        codec
            .encode_raw(value)
            .ok_or_else(|| KeyError::type_mismatch(&self.name, self.short_type(), value.type_name()))
    }

    fn fmt_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = self.short_type();
        match self.default_raw() {
            None => write!(f, "{} ({})", self.name, type_name),
            Some(value) => {
                let rendered = format!("{value:?}");
                if rendered.contains('\n') {
                    write!(
                        f,
                        "{} ({} - has default value, but spans several lines)",
                        self.name, type_name
                    )
                } else {
                    write!(f, "{} ({} = {})", self.name, type_name, rendered)
                }
            }
        }
    }
}

/// A named, typed configuration key.
pub struct DataKey<T> {
    inner: Arc<KeyInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: KeyValue> DataKey<T> {
    /// Creates a key with no default, label or codec.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(KeyInner {
                name: name.into(),
                label: None,
                value_type: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                default: None,
                codec: None,
            }),
            _marker: PhantomData,
        }
    }

    /// Sets a constant default value.
    pub fn with_default(self, value: T) -> Self {
        self.with_default_fn(move || value.clone())
    }

    /// Sets a default supplier, called each time a default is needed.
    pub fn with_default_fn<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.inner).default = Some(Arc::new(move || RawValue::new(supplier())));
        self
    }

    /// Sets the codec used to parse and render values.
    pub fn with_codec(mut self, codec: StringCodec<T>) -> Self {
        Arc::make_mut(&mut self.inner).codec = Some(Arc::new(codec));
        self
    }

    /// Sets a label for display.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.inner).label = Some(label.into());
        self
    }

    /// Name of the key.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Label, if one was set.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Label, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label().unwrap_or(self.name())
    }

    /// Short name of the value type.
    pub fn type_name(&self) -> String {
        self.inner.short_type()
    }

    /// Returns true if the key has a default supplier.
    pub fn has_default(&self) -> bool {
        self.inner.default.is_some()
    }

    /// Computes the default value.
    pub fn default_value(&self) -> Option<T> {
        self.inner
            .default_raw()
            .and_then(|raw| raw.downcast_ref::<T>().cloned())
    }

    /// Returns true if the key can be parsed from text.
    pub fn has_codec(&self) -> bool {
        self.inner.codec.is_some()
    }

    /// The codec, if one was set.
    pub fn codec(&self) -> Option<StringCodec<T>> {
        self.inner
            .codec
            .as_ref()
            .and_then(|codec| codec.as_any().downcast_ref::<StringCodec<T>>())
            .cloned()
    }

    /// Parses a value from text.
    pub fn decode(&self, input: &str) -> KeyResult<T> {
        let raw = self.inner.decode_raw(input)?;
        raw.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| KeyError::type_mismatch(self.name(), self.type_name(), raw.type_name()))
    }

    /// Renders a value as text.
    pub fn encode(&self, value: &T) -> KeyResult<String> {
        match self.codec() {
            Some(codec) => Ok(codec.encode(value)),
            None => Err(KeyError::NoCodec {
                key: self.name().to_string(),
            }),
        }
    }

    /// Type-erased handle to this key.
    pub fn erased(&self) -> AnyKey {
        AnyKey {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Clone for DataKey<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for DataKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl<T> Eq for DataKey<T> {}

impl<T> Hash for DataKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl<T> fmt::Debug for DataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("name", &self.inner.name)
            .field("type", &self.inner.short_type())
            .field("has_default", &self.inner.default.is_some())
            .finish()
    }
}

impl<T> fmt::Display for DataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt_display(f)
    }
}

/// A [`DataKey`] with its value type erased.
#[derive(Clone)]
pub struct AnyKey {
    inner: Arc<KeyInner>,
}

impl AnyKey {
    /// Name of the key.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Label, if one was set.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Label, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label().unwrap_or(self.name())
    }

    /// Short name of the value type.
    pub fn type_name(&self) -> String {
        self.inner.short_type()
    }

    /// `TypeId` of the value type.
    pub fn value_type(&self) -> TypeId {
        self.inner.value_type
    }

    /// Returns true if the key holds values of type `T`.
    pub fn is<T: KeyValue>(&self) -> bool {
        self.inner.value_type == TypeId::of::<T>()
    }

    /// Returns true if `value` has the key's value type.
    pub fn accepts(&self, value: &RawValue) -> bool {
        value.value_type() == self.inner.value_type
    }

    /// Returns true if the key has a default supplier.
    pub fn has_default(&self) -> bool {
        self.inner.default.is_some()
    }

    /// Computes the default value.
    pub fn default_raw(&self) -> Option<RawValue> {
        self.inner.default_raw()
    }

    /// Returns true if the key can be parsed from text.
    pub fn has_codec(&self) -> bool {
        self.inner.codec.is_some()
    }

    /// Parses a value from text.
    pub fn decode_raw(&self, input: &str) -> KeyResult<RawValue> {
        self.inner.decode_raw(input)
    }

    /// Renders a value as text.
    pub fn encode_raw(&self, value: &RawValue) -> KeyResult<String> {
        self.inner.encode_raw(value)
    }

    /// Recovers the typed key.
    pub fn downcast<T: KeyValue>(&self) -> Option<DataKey<T>> {
        self.is::<T>().then(|| DataKey {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        })
    }

    /// Returns true if both handles come from the same key declaration.
    pub fn same_instance(&self, other: &AnyKey) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> From<DataKey<T>> for AnyKey {
    fn from(key: DataKey<T>) -> Self {
        Self { inner: key.inner }
    }
}

impl<T> From<&DataKey<T>> for AnyKey {
    fn from(key: &DataKey<T>) -> Self {
        Self {
            inner: Arc::clone(&key.inner),
        }
    }
}

impl PartialEq for AnyKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for AnyKey {}

impl Hash for AnyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl fmt::Debug for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyKey")
            .field("name", &self.inner.name)
            .field("type", &self.inner.short_type())
            .field("has_default", &self.inner.default.is_some())
            .finish()
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt_display(f)
    }
}

/// Anything that names a key: a string or a key handle.
pub trait KeyName {
    /// The key name.
    fn key_name(&self) -> &str;
}

impl KeyName for str {
    fn key_name(&self) -> &str {
        self
    }
}

impl KeyName for String {
    fn key_name(&self) -> &str {
        self
    }
}

impl KeyName for AnyKey {
    fn key_name(&self) -> &str {
        self.name()
    }
}

impl<T> KeyName for DataKey<T> {
    fn key_name(&self) -> &str {
        &self.inner.name
    }
}

impl<K: KeyName + ?Sized> KeyName for &K {
    fn key_name(&self) -> &str {
        (**self).key_name()
    }
}
