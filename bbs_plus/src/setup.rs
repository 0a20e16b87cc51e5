#![allow(non_snake_case)]

//! Keys and setup parameters
//! # Examples
//!
//! Creating signature parameters and keypair:
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use blake2::Blake2b512;
//! use bbs_plus::setup::{SignatureParamsG1, SignatureParamsG2, KeypairG1, KeypairG2};
//! use ark_std::rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(0u64);
//! let params_g1 = SignatureParamsG1::<Bls12_381>::generate_using_rng(&mut rng, 5);
//! let params_g2 = SignatureParamsG2::<Bls12_381>::generate_using_rng(&mut rng, 5);
//! let params_g1_1 = SignatureParamsG1::<Bls12_381>::new::<Blake2b512>(&[1, 2, 3, 4], 5);
//! let params_g2_1 = SignatureParamsG2::<Bls12_381>::new::<Blake2b512>(&[1, 2, 3, 4], 5);
//!
//! // Params for 8 messages where the generators for the first 5 are same as `params_g1_1`
//! let params_g1_2 = params_g1_1.extend_for_message_count::<Blake2b512>(&[1, 2, 3, 4], 8).unwrap();
//!
//! let keypair_g2 = KeypairG2::<Bls12_381>::generate_using_rng(&mut rng, &params_g1);
//! let keypair_g1 = KeypairG1::<Bls12_381>::generate_using_rng(&mut rng, &params_g2);
//! let keypair_g2_1 = KeypairG2::<Bls12_381>::generate_using_seed(&[0; 32], &params_g1);
//! ```

use crate::error::BBSPlusError;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    cfg_into_iter, cfg_iter,
    collections::{BTreeMap, BTreeSet},
    rand::RngCore,
    vec::Vec,
    UniformRand,
};
use credential_utils::{
    concat_slices,
    hashing_utils::{field_elem_from_seed, projective_group_elem_from_try_and_incr},
    serde_utils::{to_compressed_bytes, ArkObjectBytes},
    signature::MultiMessageSignatureParams,
};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Salt used when deriving a secret key from a seed
pub const SECRET_KEY_SALT: &[u8] = b"BBS-SIG-KEYGEN-SALT-";

/// Secret key used by the signer to sign messages
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct SecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

impl<F: PrimeField> SecretKey<F> {
    /// Derive the secret key deterministically from `seed`. The same seed always gives the same key.
    pub fn generate_using_seed(seed: &[u8]) -> Self {
        Self(field_elem_from_seed::<F>(seed, SECRET_KEY_SALT))
    }

    pub fn generate_using_rng<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }
}

/// Hashes `label` with the suffix identifying the generator. `h_0` has index 0 and the generator
/// of the `i`-th message (0-based) has index `i + 1`
fn message_generator_bytes(label: &[u8], index: u64) -> Vec<u8> {
    concat_slices!(label, b" : h_", index.to_le_bytes())
}

/// True if no two of the given group elements have the same encoding
fn all_distinct<G: AffineRepr>(elems: impl Iterator<Item = G>) -> bool {
    let mut seen = BTreeSet::new();
    for g in elems {
        match to_compressed_bytes(&g) {
            Ok(b) => {
                if !seen.insert(b) {
                    return false;
                }
            }
            Err(_) => return false,
        }
    }
    true
}

macro_rules! impl_sig_params {
    ( $name:ident, $group_affine:ident, $group_projective:ident, $other_group_affine:ident, $other_group_projective:ident ) => {
        /// Signature params used while signing and verifying. Also used when proving knowledge of signature.
        /// Every signer _can_ create his own params but several signers _can_ share the same parameters if
        /// signing messages of the same size and still have their own public keys.
        /// Size of parameters is proportional to the number of messages
        #[serde_as]
        #[derive(
            Clone,
            PartialEq,
            Eq,
            Debug,
            CanonicalSerialize,
            CanonicalDeserialize,
            Serialize,
            Deserialize,
        )]
        pub struct $name<E: Pairing> {
            #[serde_as(as = "ArkObjectBytes")]
            pub g1: E::$group_affine,
            #[serde_as(as = "ArkObjectBytes")]
            pub g2: E::$other_group_affine,
            #[serde_as(as = "ArkObjectBytes")]
            pub h_0: E::$group_affine,
            /// Vector of size same as the size of multi-message that needs to be signed.
            #[serde_as(as = "Vec<ArkObjectBytes>")]
            pub h: Vec<E::$group_affine>,
        }

        impl<E: Pairing> $name<E> {
            /// Generate params by hashing a known string. The hash function is vulnerable to timing
            /// attack but since all this is public knowledge, it is fine.
            /// This is useful if people need to be convinced that the discrete log of group elements wrt each other is not known.
            pub fn new<D: Digest>(label: &[u8], n: usize) -> Self {
                // g1, h_0 and h[i] for i in 1 to n
                let mut sig_group_elems = Vec::with_capacity(n + 2);
                sig_group_elems.push(projective_group_elem_from_try_and_incr::<
                    E::$group_affine,
                    D,
                >(&concat_slices!(label, b" : g1")));
                let h = cfg_into_iter!(0..=n)
                    .map(|i| {
                        projective_group_elem_from_try_and_incr::<E::$group_affine, D>(
                            &message_generator_bytes(label, i as u64),
                        )
                    })
                    .collect::<Vec<E::$group_projective>>();
                sig_group_elems.extend(h);
                let mut sig_group_elems = E::$group_projective::normalize_batch(&sig_group_elems);
                let g1 = sig_group_elems.remove(0);
                let h_0 = sig_group_elems.remove(0);

                let g2 = projective_group_elem_from_try_and_incr::<E::$other_group_affine, D>(
                    &concat_slices!(label, b" : g2"),
                )
                .into_affine();
                Self {
                    g1,
                    g2,
                    h_0,
                    h: sig_group_elems,
                }
            }

            /// Generate params using a random number generator
            pub fn generate_using_rng<R: RngCore>(rng: &mut R, n: usize) -> Self {
                let h = (0..n)
                    .map(|_| E::$group_projective::rand(rng))
                    .collect::<Vec<E::$group_projective>>();
                Self {
                    g1: E::$group_projective::rand(rng).into_affine(),
                    g2: E::$other_group_projective::rand(rng).into_affine(),
                    h_0: E::$group_projective::rand(rng).into_affine(),
                    h: E::$group_projective::normalize_batch(&h),
                }
            }

            /// Params supporting `new_count` messages. The existing generators are kept and the ones
            /// for the additional messages are derived from `label` the same way `Self::new` does so
            /// params created with `Self::new` and extended with the same label equal params created
            /// for `new_count` directly. Proofs over the existing messages remain valid.
            pub fn extend_for_message_count<D: Digest>(
                &self,
                label: &[u8],
                new_count: usize,
            ) -> Result<Self, BBSPlusError> {
                let current = self.supported_message_count();
                if new_count < current {
                    return Err(BBSPlusError::CannotReduceMessageCount(current, new_count));
                }
                let new_h = cfg_into_iter!((current + 1)..=new_count)
                    .map(|i| {
                        projective_group_elem_from_try_and_incr::<E::$group_affine, D>(
                            &message_generator_bytes(label, i as u64),
                        )
                    })
                    .collect::<Vec<E::$group_projective>>();
                let mut extended = self.clone();
                extended
                    .h
                    .extend(E::$group_projective::normalize_batch(&new_h));
                Ok(extended)
            }

            /// Check that no group element is zero and no two generators are the same
            pub fn is_valid(&self) -> bool {
                let non_zero = !(self.g1.is_zero()
                    || self.g2.is_zero()
                    || self.h_0.is_zero()
                    || cfg_iter!(self.h).any(|v| v.is_zero()));
                non_zero
                    && all_distinct(
                        [self.g1, self.h_0]
                            .into_iter()
                            .chain(self.h.iter().copied()),
                    )
            }

            /// Bases used to commit to the messages at the given indices. The first base is `h_0`, used
            /// for the blinding, followed by the generator of each message in increasing order of index.
            pub fn bases_for_commitment(
                &self,
                indices: &BTreeSet<usize>,
            ) -> Result<Vec<E::$group_affine>, BBSPlusError> {
                let mut bases = Vec::with_capacity(1 + indices.len());
                bases.push(self.h_0);
                for i in indices {
                    bases.push(*self.h.get(*i).ok_or(BBSPlusError::InvalidMessageIdx(*i))?);
                }
                Ok(bases)
            }

            /// Commit to given messages using the parameters and the given blinding as a Pedersen commitment.
            /// Eg. if given messages `m_i`, `m_j`, and `m_k` in the map, the commitment is
            /// `params.h_0 * blinding + params.h_i * m_i + params.h_j * m_j + params.h_k * m_k`
            /// Computes using multi-scalar multiplication
            pub fn commit_to_messages(
                &self,
                messages: BTreeMap<usize, &E::ScalarField>,
                blinding: &E::ScalarField,
            ) -> Result<E::$group_affine, BBSPlusError> {
                Ok(self
                    .commit_to_messages_iter(messages, blinding)?
                    .into_affine())
            }

            /// Compute `b` from the paper. Commits to the given messages and adds `self.g1` to it,
            /// `b = g_1 + h_0 * s + sum(h_i * m_i)` for all indices `i` in the map.
            pub fn b<'a>(
                &self,
                messages: impl IntoIterator<Item = (usize, &'a E::ScalarField)>,
                s: &E::ScalarField,
            ) -> Result<E::$group_projective, BBSPlusError> {
                Ok(self.commit_to_messages_iter(messages, s)? + self.g1)
            }

            fn commit_to_messages_iter<'a>(
                &self,
                messages: impl IntoIterator<Item = (usize, &'a E::ScalarField)>,
                blinding: &E::ScalarField,
            ) -> Result<E::$group_projective, BBSPlusError> {
                let mut bases = vec![self.h_0];
                let mut scalars = vec![*blinding];
                for (i, msg) in messages {
                    bases.push(*self.h.get(i).ok_or(BBSPlusError::InvalidMessageIdx(i))?);
                    scalars.push(*msg);
                }
                Ok(E::$group_projective::msm_unchecked(&bases, &scalars))
            }
        }

        impl<E: Pairing> MultiMessageSignatureParams for $name<E> {
            fn supported_message_count(&self) -> usize {
                self.h.len()
            }
        }

        impl<E: Pairing> MultiMessageSignatureParams for &$name<E> {
            fn supported_message_count(&self) -> usize {
                self.h.len()
            }
        }
    };
}

macro_rules! impl_public_key {
    ( $name:ident, $group:ident, $params:ident ) => {
        /// Public key of the signer. The signer can use the same public key with different
        /// signature parameters provided all parameters use same `g2` to sign different sized
        /// multi-messages. This helps the signer minimize his secret key storage.
        #[serde_as]
        #[derive(
            Clone,
            PartialEq,
            Eq,
            Debug,
            CanonicalSerialize,
            CanonicalDeserialize,
            Serialize,
            Deserialize,
        )]
        pub struct $name<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub <E as Pairing>::$group);

        impl<E: Pairing> $name<E> {
            /// Generate public key from given secret key and signature parameters
            pub fn generate_using_secret_key(
                secret_key: &SecretKey<E::ScalarField>,
                params: &$params<E>,
            ) -> Self {
                Self(params.g2.mul_bigint(secret_key.0.into_bigint()).into_affine())
            }

            /// Public key shouldn't be 0
            pub fn is_valid(&self) -> bool {
                !self.0.is_zero()
            }
        }
    };
}

macro_rules! impl_keypair {
    ( $name:ident, $pk: ident, $params:ident ) => {
        #[derive(
            Clone,
            PartialEq,
            Eq,
            Debug,
            CanonicalSerialize,
            CanonicalDeserialize,
            Serialize,
            Deserialize,
            Zeroize,
            ZeroizeOnDrop,
        )]
        #[serde(bound = "")]
        pub struct $name<E: Pairing> {
            pub secret_key: SecretKey<E::ScalarField>,
            #[zeroize(skip)]
            pub public_key: $pk<E>,
        }

        /// Create a secret key and corresponding public key
        impl<E: Pairing> $name<E> {
            pub fn generate_using_seed(seed: &[u8], params: &$params<E>) -> Self {
                Self::from_secret_key(SecretKey::generate_using_seed(seed), params)
            }

            pub fn generate_using_rng<R: RngCore>(rng: &mut R, params: &$params<E>) -> Self {
                Self::from_secret_key(SecretKey::generate_using_rng(rng), params)
            }

            pub fn from_secret_key(secret_key: SecretKey<E::ScalarField>, params: &$params<E>) -> Self {
                let public_key = $pk::generate_using_secret_key(&secret_key, params);
                Self {
                    secret_key,
                    public_key,
                }
            }
        }
    };
}

impl_sig_params!(SignatureParamsG1, G1Affine, G1, G2Affine, G2);
impl_sig_params!(SignatureParamsG2, G2Affine, G2, G1Affine, G1);
impl_public_key!(PublicKeyG2, G2Affine, SignatureParamsG1);
impl_public_key!(PublicKeyG1, G1Affine, SignatureParamsG2);
impl_keypair!(KeypairG2, PublicKeyG2, SignatureParamsG1);
impl_keypair!(KeypairG1, PublicKeyG1, SignatureParamsG2);

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use crate::test_serialization;

    type Fr = <Bls12_381 as Pairing>::ScalarField;

    macro_rules! test_serz_des {
        ($keypair:ident, $public_key:ident, $params:ident, $rng:ident, $message_count: ident) => {
            let params = $params::<Bls12_381>::generate_using_rng(&mut $rng, $message_count);
            test_serialization!($params<Bls12_381>, params);

            let keypair = $keypair::<Bls12_381>::generate_using_rng(&mut $rng, &params);
            test_serialization!($keypair<Bls12_381>, keypair);
            let pk = keypair.public_key.clone();
            test_serialization!($public_key<Bls12_381>, pk);
            let sk = keypair.secret_key.clone();
            test_serialization!(SecretKey<Fr>, sk);
        };
    }

    macro_rules! test_params {
        ($params:ident, $message_count: ident) => {
            let label_1 = "test1".as_bytes();
            let params_1 = $params::<Bls12_381>::new::<Blake2b512>(&label_1, $message_count);
            assert!(params_1.is_valid());
            assert_eq!(params_1.h.len(), $message_count);
            assert_eq!(params_1.supported_message_count(), $message_count);

            // Same label should generate same params
            let params_1_again = $params::<Bls12_381>::new::<Blake2b512>(&label_1, $message_count);
            assert_eq!(params_1_again, params_1);

            // Different label should generate different params
            let label_2 = "test2".as_bytes();
            let params_2 = $params::<Bls12_381>::new::<Blake2b512>(&label_2, $message_count);
            assert_ne!(params_1, params_2);

            // Extending keeps existing generators and matches params created for the larger count
            let extended = params_1
                .extend_for_message_count::<Blake2b512>(&label_1, $message_count + 3)
                .unwrap();
            assert!(extended.is_valid());
            assert_eq!(extended.supported_message_count(), $message_count + 3);
            assert_eq!(extended.h[..$message_count], params_1.h[..]);
            assert_eq!(extended.h_0, params_1.h_0);
            assert_eq!(
                extended,
                $params::<Bls12_381>::new::<Blake2b512>(&label_1, $message_count + 3)
            );
            assert_eq!(
                params_1
                    .extend_for_message_count::<Blake2b512>(&label_1, $message_count)
                    .unwrap(),
                params_1
            );
            assert!(params_1
                .extend_for_message_count::<Blake2b512>(&label_1, $message_count - 1)
                .is_err());

            // Repeated generator makes params invalid
            let mut invalid = params_1.clone();
            invalid.h[1] = invalid.h[0];
            assert!(!invalid.is_valid());
            let mut invalid = params_1.clone();
            invalid.h_0 = invalid.g1;
            assert!(!invalid.is_valid());
            let mut invalid = params_1.clone();
            invalid.h[2] = AffineRepr::zero();
            assert!(!invalid.is_valid());

            let bases = params_1
                .bases_for_commitment(&BTreeSet::from([3, 1]))
                .unwrap();
            assert_eq!(bases, vec![params_1.h_0, params_1.h[1], params_1.h[3]]);
            assert!(params_1
                .bases_for_commitment(&BTreeSet::from([$message_count]))
                .is_err());
        };
    }

    #[test]
    fn serz_deserz() {
        // Test serialization of keypair, secret key, public key and signature params
        let mut rng = StdRng::seed_from_u64(0u64);
        let message_count = 10;
        test_serz_des!(
            KeypairG2,
            PublicKeyG2,
            SignatureParamsG1,
            rng,
            message_count
        );
        test_serz_des!(
            KeypairG1,
            PublicKeyG1,
            SignatureParamsG2,
            rng,
            message_count
        );
    }

    #[test]
    fn params_deterministically() {
        let message_count = 10;
        test_params!(SignatureParamsG1, message_count);
        test_params!(SignatureParamsG2, message_count);
    }

    #[test]
    fn keys_from_seed() {
        let params = SignatureParamsG1::<Bls12_381>::new::<Blake2b512>(b"test", 2);
        let seed = [7u8; 32];
        let keypair_1 = KeypairG2::<Bls12_381>::generate_using_seed(&seed, &params);
        let keypair_2 = KeypairG2::<Bls12_381>::generate_using_seed(&seed, &params);
        assert_eq!(keypair_1, keypair_2);
        assert!(keypair_1.public_key.is_valid());
        let keypair_3 = KeypairG2::<Bls12_381>::generate_using_seed(&[8u8; 32], &params);
        assert_ne!(keypair_1.public_key, keypair_3.public_key);

        let mut sk_bytes = vec![];
        keypair_1
            .secret_key
            .serialize_compressed(&mut sk_bytes)
            .unwrap();
        assert_eq!(sk_bytes.len(), 32);
        let mut pk_bytes = vec![];
        keypair_1
            .public_key
            .serialize_compressed(&mut pk_bytes)
            .unwrap();
        assert_eq!(pk_bytes.len(), 96);

        let params_g2 = SignatureParamsG2::<Bls12_381>::new::<Blake2b512>(b"test", 2);
        let keypair_g1 = KeypairG1::<Bls12_381>::generate_using_seed(&seed, &params_g2);
        let mut pk_bytes = vec![];
        keypair_g1
            .public_key
            .serialize_compressed(&mut pk_bytes)
            .unwrap();
        assert_eq!(pk_bytes.len(), 48);
    }
}
