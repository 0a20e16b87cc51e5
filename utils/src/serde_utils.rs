//! Serde support for `arkworks-rs` objects which only implement `CanonicalSerialize`/`CanonicalDeserialize`.
//! Objects are (de)serialized as their compressed canonical bytes.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// Use with `#[serde_as(as = "ArkObjectBytes")]` on fields of arkworks types
pub struct ArkObjectBytes;

impl ArkObjectBytes {
    pub fn serialize<S, T>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let bytes = to_compressed_bytes(x).map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

impl<T> SerializeAs<T> for ArkObjectBytes
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Self::serialize(x, serializer)
    }
}

impl<'de, T> DeserializeAs<'de, T> for ArkObjectBytes
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::deserialize(deserializer)
    }
}

/// Compressed canonical encoding of `x`
pub fn to_compressed_bytes<T: CanonicalSerialize>(
    x: &T,
) -> Result<Vec<u8>, ark_serialize::SerializationError> {
    let mut bytes = Vec::with_capacity(x.compressed_size());
    x.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}
