//! Encoding of messages and field elements and the (de)serialization helpers shared by the other modules

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    rand::RngCore,
    vec::Vec,
    UniformRand,
};
use blake2::Blake2b512;
use credential_utils::hashing_utils::field_elem_from_try_and_incr;
use proof_system::prelude::Proof;

use crate::{error::ApiError, Bls12_381, Fr, FIELD_ELEMENT_LENGTH};

/// Map an arbitrary length message to a field element by hashing it
pub fn encode_message_for_signing(message: &[u8]) -> Result<Vec<u8>, ApiError> {
    fr_to_bytes(&encode_message(message))
}

/// Encode the messages at the given indices and return them in increasing order of index
pub fn encode_messages_for_signing(
    messages: &[Vec<u8>],
    indices_to_encode: &BTreeSet<usize>,
) -> Result<Vec<Vec<u8>>, ApiError> {
    indices_to_encode
        .iter()
        .map(|i| {
            let m = messages.get(*i).ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "index {} is out of range for {} messages",
                    i,
                    messages.len()
                ))
            })?;
            encode_message_for_signing(m)
        })
        .collect()
}

/// Field element for the given integer
pub fn generate_field_element_from_number(number: u64) -> Result<Vec<u8>, ApiError> {
    fr_to_bytes(&Fr::from(number))
}

/// Random field element. When `seed` is given, the element is derived from it deterministically
pub fn generate_random_field_element<R: RngCore>(
    rng: &mut R,
    seed: Option<&[u8]>,
) -> Result<Vec<u8>, ApiError> {
    let elem = match seed {
        Some(seed) => field_elem_from_try_and_incr::<Fr, Blake2b512>(seed),
        None => Fr::rand(rng),
    };
    fr_to_bytes(&elem)
}

/// Hash the bytes, generally the concatenated challenge contributions, to a challenge
pub fn generate_challenge_from_bytes(bytes: &[u8]) -> Result<Vec<u8>, ApiError> {
    fr_to_bytes(&Proof::<Bls12_381>::generate_challenge_from_bytes::<Blake2b512>(bytes))
}

pub(crate) fn encode_message(message: &[u8]) -> Fr {
    field_elem_from_try_and_incr::<Fr, Blake2b512>(message)
}

pub(crate) fn obj_to_bytes<T: CanonicalSerialize>(obj: &T) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::with_capacity(obj.compressed_size());
    obj.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

pub(crate) fn obj_to_uncompressed_bytes<T: CanonicalSerialize>(
    obj: &T,
) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::with_capacity(obj.uncompressed_size());
    obj.serialize_uncompressed(&mut bytes)?;
    Ok(bytes)
}

/// Decode from the compressed encoding. All bytes must be consumed.
pub(crate) fn obj_from_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, ApiError> {
    let mut reader = bytes;
    let obj = T::deserialize_compressed(&mut reader)?;
    expect_consumed(reader)?;
    Ok(obj)
}

pub(crate) fn obj_from_uncompressed_bytes<T: CanonicalDeserialize>(
    bytes: &[u8],
) -> Result<T, ApiError> {
    let mut reader = bytes;
    let obj = T::deserialize_uncompressed(&mut reader)?;
    expect_consumed(reader)?;
    Ok(obj)
}

/// Decode an object of a fixed size. The length is checked before decoding is attempted.
pub(crate) fn obj_from_bytes_of_length<T: CanonicalDeserialize>(
    bytes: &[u8],
    expected_length: usize,
    name: &str,
) -> Result<T, ApiError> {
    if bytes.len() != expected_length {
        return Err(ApiError::InvalidInput(format!(
            "{} must be {} bytes but was {}",
            name,
            expected_length,
            bytes.len()
        )));
    }
    obj_from_bytes(bytes)
}

fn expect_consumed(remaining: &[u8]) -> Result<(), ApiError> {
    if remaining.is_empty() {
        Ok(())
    } else {
        Err(ApiError::DecodingError(format!(
            "{} bytes left after decoding",
            remaining.len()
        )))
    }
}

pub(crate) fn fr_to_bytes(elem: &Fr) -> Result<Vec<u8>, ApiError> {
    obj_to_bytes(elem)
}

pub(crate) fn fr_from_bytes(bytes: &[u8]) -> Result<Fr, ApiError> {
    obj_from_bytes_of_length(bytes, FIELD_ELEMENT_LENGTH, "field element")
}

pub(crate) fn fr_vec_from_bytes(elems: &[Vec<u8>]) -> Result<Vec<Fr>, ApiError> {
    elems.iter().map(|e| fr_from_bytes(e)).collect()
}

pub(crate) fn fr_vec_to_bytes(elems: &[Fr]) -> Result<Vec<Vec<u8>>, ApiError> {
    elems.iter().map(fr_to_bytes).collect()
}

pub(crate) fn fr_map_from_bytes(
    elems: &BTreeMap<usize, Vec<u8>>,
) -> Result<BTreeMap<usize, Fr>, ApiError> {
    elems
        .iter()
        .map(|(i, e)| Ok((*i, fr_from_bytes(e)?)))
        .collect()
}

/// Messages as field elements. When `encode` is false, each message must already be a field element.
pub(crate) fn decode_messages(messages: &[Vec<u8>], encode: bool) -> Result<Vec<Fr>, ApiError> {
    messages.iter().map(|m| decode_message(m, encode)).collect()
}

pub(crate) fn decode_message_map(
    messages: &BTreeMap<usize, Vec<u8>>,
    encode: bool,
) -> Result<BTreeMap<usize, Fr>, ApiError> {
    messages
        .iter()
        .map(|(i, m)| Ok((*i, decode_message(m, encode)?)))
        .collect()
}

fn decode_message(message: &[u8], encode: bool) -> Result<Fr, ApiError> {
    if encode {
        Ok(encode_message(message))
    } else {
        fr_from_bytes(message)
    }
}
