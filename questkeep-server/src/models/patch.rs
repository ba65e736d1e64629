//! Serde helpers for partial updates
//!
//! Nullable columns need three states in a patch: absent (keep), `null`
//! (clear) and a value (set). They are decoded as `Option<Option<T>>` with
//! `#[serde(default, deserialize_with = "nullable")]`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serializer};

/// Decode a present field as `Some(inner)`, so `null` becomes `Some(None)`.
pub fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Replace `slot` when the patch carries a value.
pub(crate) fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Base64 (standard alphabet) encoding for optional binary payloads.
pub mod base64_bytes {
    use super::*;

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => ser.serialize_some(&STANDARD.encode(bytes)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de)?
            .map(|encoded| decode(&encoded))
            .transpose()
    }

    /// Patch variant: absent keeps, `null` clears, a string replaces.
    pub fn deserialize_nullable<'de, D>(de: D) -> Result<Option<Option<Vec<u8>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(de).map(Some)
    }

    fn decode<E: serde::de::Error>(encoded: &str) -> Result<Vec<u8>, E> {
        STANDARD
            .decode(encoded)
            .map_err(|e| E::custom(format!("image_data is not valid base64: {}", e)))
    }
}
