//! Common serde helpers for PATCH payloads
//!
//! Distinguishes "field absent" from "field explicitly null" so settings
//! updates can clear a nullable column.

use serde::{Deserialize, Deserializer};

/// Deserialize into `Option<Option<T>>`.
///
/// Combined with `#[serde(default)]` on the field:
///   - absent  -> `None` (leave unchanged)
///   - null    -> `Some(None)` (clear)
///   - value   -> `Some(Some(v))` (set)
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}
