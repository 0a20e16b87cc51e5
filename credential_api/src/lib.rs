//! Byte level API over the signature, accumulator and composite proof crates, fixed to the curve BLS12-381.
//!
//! Every function takes and returns byte buffers holding the compressed canonical encoding of the objects
//! (field elements, group elements, keys, signatures, proofs, ...) so that callers don't need to know
//! the arkworks types. Fixed size inputs have their length checked before any decoding is attempted.
//! Failures are reported as [`ApiError`] whose variants are the error kinds of this API. Verification
//! functions never fail and return a [`VerifyResponse`] instead.
//!
//! - [`bbs_plus`]: parameters, keys, signing, blind signing and the proof of knowledge of a signature
//! - [`accumulator`]: positive and universal accumulators, witnesses, witness updates and proofs of (non)membership
//! - [`proof_system`]: statements, witnesses, setup params, proof specs and composite proofs
//! - [`util`]: encoding messages and helpers for field elements and challenges

#[macro_use]
mod macros;

pub mod accumulator;
pub mod bbs_plus;
pub mod error;
pub mod proof_system;
pub mod util;

pub use error::{ApiError, VerifyResponse};

pub type Fr = ark_bls12_381::Fr;
pub type G1Affine = ark_bls12_381::G1Affine;
pub type G2Affine = ark_bls12_381::G2Affine;
pub type Bls12_381 = ark_bls12_381::Bls12_381;

/// Size of a BBS+ signature in group G1, i.e. a G1 element and 2 field elements
pub const BBS_SIGNATURE_LENGTH: usize = 112;
/// Size of a BBS+ signature in group G2, i.e. a G2 element and 2 field elements
pub const BBS_SIGNATURE_G2_LENGTH: usize = 160;
pub const BLS12381_PRIVATE_KEY_LENGTH: usize = 32;
pub const BLS12381_G1_PUBLIC_KEY_LENGTH: usize = 48;
pub const BLS12381_G2_PUBLIC_KEY_LENGTH: usize = 96;
/// Size of a field element
pub const FIELD_ELEMENT_LENGTH: usize = 32;

/// Label used to generate parameters and proving keys deterministically when the caller doesn't give one
pub const DEFAULT_LABEL: &[u8] = b"credential-crypto-default-label";

/// Secret key and public key, both encoded
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, zeroize::Zeroize)]
pub struct KeypairBytes {
    pub secret_key: Vec<u8>,
    pub public_key: Vec<u8>,
}
