//! Declarative key sets.

/// Declares a marker type carrying a set of keys.
///
/// Each entry becomes an associated function returning a `&'static DataKey<T>`
/// that is built on first use. The type implements [`KeySet`](crate::KeySet)
/// and lists its keys in declaration order, after the keys of any parent sets
/// named after the colon. Items declared in other `impl` blocks are not part of
/// the set.
///
/// ```rust
/// use optstore_core::prelude::*;
///
/// key_set! {
///     /// Output settings.
///     pub struct Output {
///         pub PATH: String = KeyFactory::string_with("path", "out.txt");
///         pub VERBOSE: bool = KeyFactory::bool("verbose");
///     }
/// }
///
/// key_set! {
///     pub struct Report: Output {
///         pub TITLE: String = KeyFactory::string("title");
///     }
/// }
///
/// assert_eq!(Output::PATH().name(), "path");
/// assert_eq!(Report::set_name(), "Report");
/// assert_eq!(Report::keys().len(), 3);
/// ```
#[macro_export]
macro_rules! key_set {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $($parent:ty),+)? {
            $(
                $(#[$key_meta:meta])*
                $key_vis:vis $key:ident : $ty:ty = $init:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        #[allow(non_snake_case)]
        impl $name {
            $(
                $(#[$key_meta])*
                $key_vis fn $key() -> &'static $crate::DataKey<$ty> {
                    static KEY: $crate::__private::Lazy<$crate::DataKey<$ty>> =
                        $crate::__private::Lazy::new(|| $init);
                    &KEY
                }
            )*
        }

        impl $crate::KeySet for $name {
            fn set_name() -> ::std::string::String {
                ::std::string::String::from(stringify!($name))
            }

            fn keys() -> ::std::vec::Vec<$crate::AnyKey> {
                #[allow(unused_mut)]
                let mut keys = ::std::vec::Vec::new();
                $($(
                    keys.extend(<$parent as $crate::KeySet>::keys());
                )+)?
                $(
                    keys.push($crate::AnyKey::from($name::$key()));
                )*
                keys
            }
        }
    };
}
