//! Serde helpers for ordered `id → value` JSON objects.
//!
//! The persisted cart stores vendors and items as JSON objects keyed by id,
//! but iteration order matters for rendering. Values are kept in a `Vec` in
//! document order and written back as an object in the same order.

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// A value that carries its own map key.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

pub(crate) fn serialize<S, T>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + Keyed,
{
    let mut map = serializer.serialize_map(Some(values.len()))?;
    for value in values {
        map.serialize_entry(value.key(), value)?;
    }
    map.end()
}

/// Reads an object into a `Vec`, rejecting duplicate keys and entries whose
/// embedded id disagrees with their key.
pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Keyed,
{
    deserializer.deserialize_map(KeyedVisitor(PhantomData))
}

struct KeyedVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for KeyedVisitor<T>
where
    T: Deserialize<'de> + Keyed,
{
    type Value = Vec<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by id")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Vec<T>, A::Error> {
        let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        let mut seen = HashSet::new();

        while let Some((key, value)) = access.next_entry::<String, T>()? {
            if value.key() != key {
                return Err(de::Error::custom(format!(
                    "entry '{}' carries mismatched id '{}'",
                    key,
                    value.key()
                )));
            }
            if !seen.insert(key.clone()) {
                return Err(de::Error::custom(format!("duplicate entry '{}'", key)));
            }
            values.push(value);
        }

        Ok(values)
    }
}
