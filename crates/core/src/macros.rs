// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared across the sweeper crates.
//!
//! - [`simple_display!`]: `Display` impl mapping enum variants to string literals
//! - [`params!`]: build a [`ParamMap`](crate::ParamMap) from `key => value` pairs

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// ```ignore
/// crate::simple_display! {
///     QueueState {
///         Pending => "pending",
///         Running => "running",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $str, )+
                })
            }
        }
    };
}

/// Build a [`ParamMap`](crate::ParamMap) from `key => value` pairs.
///
/// Values go through `Value::from`, so integers, floats, strings, bools and
/// vectors of those can be written inline.
///
/// ```ignore
/// let input = sw_core::params! { "value_1" => 1, "label" => "a" };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::ParamMap::new()
    };
    ($( $key:expr => $value:expr ),+ $(,)?) => {{
        let mut map = $crate::ParamMap::new();
        $( map.insert(String::from($key), $crate::Value::from($value)); )+
        map
    }};
}
