pub mod auth;
pub mod school;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent key from an explicit null: absent stays `None`,
/// `null` becomes `Some(None)`. Pair with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
