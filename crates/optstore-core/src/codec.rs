//! String codecs attached to keys.
//!
//! A codec turns command-line text into a typed value and back. Keys without a
//! codec can still hold values but cannot be set from text.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::value::{KeyValue, RawValue};

type DecodeFn<T> = dyn Fn(&str) -> Result<T, String> + Send + Sync;
type EncodeFn<T> = dyn Fn(&T) -> String + Send + Sync;

/// Two-way conversion between a value and its text form.
pub struct StringCodec<T> {
    decode: Arc<DecodeFn<T>>,
    encode: Arc<EncodeFn<T>>,
}

impl<T> Clone for StringCodec<T> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
            encode: Arc::clone(&self.encode),
        }
    }
}

impl<T> fmt::Debug for StringCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringCodec")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: KeyValue> StringCodec<T> {
    /// Creates a codec from a decoder and an encoder.
    pub fn new<D, E>(decode: D, encode: E) -> Self
    where
        D: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
        E: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            encode: Arc::new(encode),
        }
    }

    /// Parses text into a value.
    pub fn decode(&self, input: &str) -> Result<T, String> {
        (self.decode)(input)
    }

    /// Renders a value as text.
    pub fn encode(&self, value: &T) -> String {
        (self.encode)(value)
    }
}

impl<T> StringCodec<T>
where
    T: KeyValue + FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    /// Codec backed by `FromStr` and `Display`. Surrounding whitespace is ignored.
    pub fn parsed() -> Self {
        Self::new(
            |s| s.trim().parse::<T>().map_err(|e| e.to_string()),
            ToString::to_string,
        )
    }
}

impl StringCodec<bool> {
    /// Accepts `true`/`false` in any case, plus `1`/`0`.
    pub fn boolean() -> Self {
        Self::new(
            |s| match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(format!("'{other}' is not a boolean")),
            },
            ToString::to_string,
        )
    }
}

impl StringCodec<String> {
    /// Identity codec. Whitespace is preserved.
    pub fn string() -> Self {
        Self::new(|s| Ok(s.to_string()), Clone::clone)
    }
}

impl StringCodec<Vec<String>> {
    /// Splits on `separator`; empty items are dropped.
    pub fn string_list(separator: char) -> Self {
        Self::new(
            move |s| {
                Ok(s.split(separator)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect())
            },
            move |items| items.join(separator.to_string().as_str()),
        )
    }
}

/// A codec whose value type has been erased.
pub(crate) trait ErasedCodec: Send + Sync {
    fn decode_raw(&self, input: &str) -> Result<RawValue, String>;

    /// `None` when `value` is not of the codec's type.
    fn encode_raw(&self, value: &RawValue) -> Option<String>;

    fn as_any(&self) -> &dyn Any;
}

impl<T: KeyValue> ErasedCodec for StringCodec<T> {
    fn decode_raw(&self, input: &str) -> Result<RawValue, String> {
        self.decode(input).map(RawValue::new)
    }

    fn encode_raw(&self, value: &RawValue) -> Option<String> {
        value.downcast_ref::<T>().map(|v| self.encode(v))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
