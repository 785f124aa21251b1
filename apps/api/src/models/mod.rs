//! Input records supplied by the sourcing collaborator.
//!
//! Both records are lenient on the way in: absent or `null` fields fall back
//! to defaults instead of failing deserialization, and scoring degrades them
//! to neutral sub-scores.

pub mod candidate;
pub mod job;

use serde::{Deserialize, Deserializer};

/// Deserializes `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
