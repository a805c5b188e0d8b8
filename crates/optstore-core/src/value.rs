//! Type-erased option values.
//!
//! Keys of different value types live side by side in sections, definitions and
//! stores. [`RawValue`] carries a value whose concrete type is only known to the
//! key that produced it; typed access goes back through a downcast.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Bound shared by every type that can be stored under a key.
pub trait KeyValue: Any + Clone + fmt::Debug + PartialEq + Send + Sync {}

impl<T> KeyValue for T where T: Any + Clone + fmt::Debug + PartialEq + Send + Sync {}

/// Object-safe view of a [`KeyValue`].
pub trait ErasedValue: Any + fmt::Debug + Send + Sync {
    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Value equality across the erasure boundary. Values of different types are never equal.
    fn eq_value(&self, other: &dyn ErasedValue) -> bool;

    /// `TypeId` of the concrete value.
    fn value_type(&self) -> TypeId;

    /// Full type name of the concrete value.
    fn type_name(&self) -> &'static str;
}

impl<T: KeyValue> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_value(&self, other: &dyn ErasedValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An immutable, shareable value of some [`KeyValue`] type.
#[derive(Clone)]
pub struct RawValue(Arc<dyn ErasedValue>);

impl RawValue {
    /// Wraps a typed value.
    pub fn new<T: KeyValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    fn inner(&self) -> &dyn ErasedValue {
        &*self.0
    }

    /// Borrows the value as `T`, if that is its type.
    pub fn downcast_ref<T: KeyValue>(&self) -> Option<&T> {
        self.inner().as_any().downcast_ref::<T>()
    }

    /// Returns true if the value is a `T`.
    pub fn is<T: KeyValue>(&self) -> bool {
        self.value_type() == TypeId::of::<T>()
    }

    /// `TypeId` of the wrapped value.
    pub fn value_type(&self) -> TypeId {
        self.inner().value_type()
    }

    /// Type name of the wrapped value with module paths removed.
    pub fn type_name(&self) -> String {
        short_type_name(self.inner().type_name())
    }

    /// Returns true if both handles share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner().eq_value(other.inner())
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.inner(), f)
    }
}

/// Strips module paths from a type name, so `alloc::vec::Vec<alloc::string::String>`
/// becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';') {
            out.push_str(last_segment(&full[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    out.push_str(last_segment(&full[start..]));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast() {
        let value = RawValue::new(42_i32);
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert_eq!(value.downcast_ref::<i64>(), None);
        assert!(value.is::<i32>());
        assert!(!value.is::<String>());
    }

    #[test]
    fn test_equality_by_value() {
        assert_eq!(RawValue::new("a".to_string()), RawValue::new("a".to_string()));
        assert_ne!(RawValue::new("a".to_string()), RawValue::new("b".to_string()));
        // Same bits, different type.
        assert_ne!(RawValue::new(1_i32), RawValue::new(1_i64));
    }

    #[test]
    fn test_ptr_eq() {
        let a = RawValue::new(1.5_f64);
        let b = a.clone();
        let c = RawValue::new(1.5_f64);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a, c);
    }

    #[test]
    fn test_debug_is_transparent() {
        assert_eq!(format!("{:?}", RawValue::new(vec![1, 2])), "[1, 2]");
        assert_eq!(format!("{:?}", RawValue::new("x".to_string())), "\"x\"");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("i32"), "i32");
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<alloc::string::String, i64>"),
            "HashMap<String, i64>"
        );
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(RawValue::new(String::new()).type_name(), "String");
    }
}
