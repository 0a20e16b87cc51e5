#![allow(non_snake_case)]

//! Hashing arbitrary bytes to field and group elements. The try-and-increment functions are
//! variable time and are only used with public inputs like labels, encoded messages and challenges.

use ark_ec::AffineRepr;
use ark_ff::{PrimeField, Zero};
use ark_std::{vec, vec::Vec};
use digest::Digest;
use hkdf::Hkdf;
use sha2::Sha256;

const ZERO_AS_OCTET: [u8; 1] = [0u8];
const ATTEMPT: &[u8] = b"-attempt-";

/// Deterministically generate a non-zero field element from the given seed following the key generation
/// procedure of <https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature-05#section-2.3>.
/// `ikm` is the seed and `salt` is used for domain separation. `key_info` is always empty.
pub fn field_elem_from_seed<F: PrimeField>(ikm: &[u8], salt: &[u8]) -> F {
    // IKM || I2OSP(0, 1)
    let ikm_appended = concat_slices!(ikm, ZERO_AS_OCTET);

    // L = ceil((3 * ceil(log2(r))) / 16)
    let L = (3 * F::MODULUS_BIT_SIZE as usize + 15) / 16;
    // key_info || I2OSP(L, 2)
    let info = (L as u16).to_be_bytes();

    let mut salt = salt.to_vec();
    loop {
        salt = Sha256::digest(&salt).to_vec();
        let hk = Hkdf::<Sha256>::new(Some(salt.as_slice()), &ikm_appended);
        let mut okm = vec![0u8; L];
        if hk.expand(&info, &mut okm).is_ok() {
            let f = F::from_be_bytes_mod_order(&okm);
            if !f.is_zero() {
                return f;
            }
        }
    }
}

/// Hash bytes to a point on the curve and return it in projective form.
pub fn projective_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(
    bytes: &[u8],
) -> G::Group {
    let mut hash = D::digest(bytes);
    let mut j = 1u64;
    loop {
        if let Some(g) = G::from_random_bytes(&hash) {
            let g = g.mul_by_cofactor_to_group();
            if !g.is_zero() {
                return g;
            }
        }
        hash = D::digest(&concat_slices!(bytes, ATTEMPT, j.to_le_bytes()));
        j += 1;
    }
}

/// Hash bytes to a point on the curve and return it in affine form.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    use ark_ec::CurveGroup;
    projective_group_elem_from_try_and_incr::<G, D>(bytes).into_affine()
}

/// Hash bytes to a field element
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let mut j = 1u64;
    loop {
        if let Some(f) = F::from_random_bytes(&hash) {
            return f;
        }
        hash = D::digest(&concat_slices!(bytes, ATTEMPT, j.to_le_bytes()));
        j += 1;
    }
}

/// Hash each of the given byte strings to a field element
pub fn field_elems_from_try_and_incr<F: PrimeField, D: Digest>(
    byte_strings: &[impl AsRef<[u8]>],
) -> Vec<F> {
    byte_strings
        .iter()
        .map(|b| field_elem_from_try_and_incr::<F, D>(b.as_ref()))
        .collect()
}
