#![allow(non_snake_case)]

//! BBS+ signatures `(A, e, s)` over a vector of field elements.
//!
//! A signature in G1 pairs with a public key in G2 and the other way round. A holder who wants
//! some messages hidden from the signer sends a Pedersen commitment to them (see
//! [`SignatureParamsG1::commit_to_messages`]), gets a blind signature over the commitment and the
//! remaining messages and calls [`SignatureG1::unblind`] with the commitment's blinding.

use crate::{
    error::BBSPlusError,
    setup::{PublicKeyG1, PublicKeyG2, SecretKey, SignatureParamsG1, SignatureParamsG2},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, Group};
use ark_ff::{fields::Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    collections::BTreeMap, end_timer, ops::Mul, rand::RngCore, start_timer, vec::Vec, UniformRand,
    Zero,
};
use credential_utils::{expect_equality, serde_utils::*, signature::MultiMessageSignatureParams};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

macro_rules! impl_signature_struct {
    ( $name:ident, $group:ident ) => {
        /// Signature `(A, e, s)` with `A` in the given group
        #[serde_as]
        #[derive(
            Clone,
            Debug,
            PartialEq,
            Eq,
            CanonicalSerialize,
            CanonicalDeserialize,
            Serialize,
            Deserialize,
            Zeroize,
            ZeroizeOnDrop,
        )]
        pub struct $name<E: Pairing> {
            #[serde_as(as = "ArkObjectBytes")]
            pub A: E::$group,
            #[serde_as(as = "ArkObjectBytes")]
            pub e: E::ScalarField,
            #[serde_as(as = "ArkObjectBytes")]
            pub s: E::ScalarField,
        }
    };
}

impl_signature_struct!(SignatureG1, G1Affine);
impl_signature_struct!(SignatureG2, G2Affine);

macro_rules! impl_signature_alg {
    ( $name:ident, $params:ident, $sig_group_proj:ident, $sig_group_affine:ident ) => {
        impl<E: Pairing> $name<E> {
            /// Sign `messages`, whose count must equal what `params` support.
            pub fn new<R: RngCore>(
                rng: &mut R,
                messages: &[E::ScalarField],
                sk: &SecretKey<E::ScalarField>,
                params: &$params<E>,
            ) -> Result<Self, BBSPlusError> {
                Self::check_message_count(messages, params)?;
                Self::new_with_committed_messages(
                    rng,
                    &E::$sig_group_affine::zero(),
                    messages.iter().enumerate().collect(),
                    sk,
                    params,
                )
            }

            /// Sign the messages the signer knows, keyed by their index, together with whatever
            /// is hidden in `commitment`. An identity `commitment` means nothing is hidden. The
            /// signer is expected to have checked a proof of knowledge of the committed messages.
            pub fn new_with_committed_messages<R: RngCore>(
                rng: &mut R,
                commitment: &E::$sig_group_affine,
                uncommitted_messages: BTreeMap<usize, &E::ScalarField>,
                sk: &SecretKey<E::ScalarField>,
                params: &$params<E>,
            ) -> Result<Self, BBSPlusError> {
                let known = uncommitted_messages.len();
                if known == 0 && commitment.is_zero() {
                    return Err(BBSPlusError::NoMessageToSign);
                }
                if known > params.supported_message_count() {
                    return Err(BBSPlusError::MessageCountIncompatibleWithSigParams(
                        known,
                        params.supported_message_count(),
                    ));
                }

                let timer = start_timer!(|| "BBS+ sign");
                let s = E::ScalarField::rand(rng);
                let e = loop {
                    let e = E::ScalarField::rand(rng);
                    if !(e + sk.0).is_zero() {
                        break e;
                    }
                };
                let exponent = (e + sk.0).inverse().ok_or(BBSPlusError::CannotInvert0)?;
                // A = (g1 + h_0*s + sum(h_i*m_i) + commitment) * 1/(e+x)
                let base = params.b(uncommitted_messages, &s)? + commitment;
                let A = base.mul_bigint(exponent.into_bigint()).into_affine();
                end_timer!(timer);
                Ok(Self { A, e, s })
            }

            /// `true` when `A` is not the identity
            pub fn is_non_zero(&self) -> bool {
                !self.A.is_zero()
            }

            /// Turn a blind signature into a regular one using the blinding of the holder's
            /// commitment.
            pub fn unblind(self, blinding: &E::ScalarField) -> Self {
                Self {
                    A: self.A,
                    e: self.e,
                    s: self.s + blinding,
                }
            }

            /// Checks that can be done without a pairing. Returns `b = g1 + h_0*s + sum(h_i*m_i)`.
            pub fn pre_verify(
                &self,
                messages: &[E::ScalarField],
                params: &$params<E>,
            ) -> Result<E::$sig_group_proj, BBSPlusError> {
                Self::check_message_count(messages, params)?;
                if !self.is_non_zero() {
                    return Err(BBSPlusError::ZeroSignature);
                }
                params.b(messages.iter().enumerate(), &self.s)
            }

            fn check_message_count(
                messages: &[E::ScalarField],
                params: &$params<E>,
            ) -> Result<(), BBSPlusError> {
                if messages.is_empty() {
                    return Err(BBSPlusError::NoMessageToSign);
                }
                expect_equality!(
                    messages.len(),
                    params.supported_message_count(),
                    BBSPlusError::MessageCountIncompatibleWithSigParams
                );
                Ok(())
            }
        }
    };
}

impl_signature_alg!(SignatureG1, SignatureParamsG1, G1, G1Affine);
impl_signature_alg!(SignatureG2, SignatureParamsG2, G2, G2Affine);

impl<E: Pairing> SignatureG1<E> {
    /// Verify against a public key in G2. The key and params are assumed to be validated.
    pub fn verify(
        &self,
        messages: &[E::ScalarField],
        pk: &PublicKeyG2<E>,
        params: &SignatureParamsG1<E>,
    ) -> Result<(), BBSPlusError> {
        let b = self.pre_verify(messages, params)?;
        let timer = start_timer!(|| "BBS+ verify in G1");
        // e(A, pk + g2*e) == e(b, g2)  <=>  e(A, pk) * e(A*e - b, g2) == 1
        let rhs = (self.A.mul(self.e) - b).into_affine();
        let product = E::multi_pairing(
            [E::G1Prepared::from(self.A), E::G1Prepared::from(rhs)],
            [E::G2Prepared::from(pk.0), E::G2Prepared::from(params.g2)],
        );
        end_timer!(timer);
        if product.is_zero() {
            Ok(())
        } else {
            Err(BBSPlusError::InvalidSignature)
        }
    }
}

impl<E: Pairing> SignatureG2<E> {
    /// Verify against a public key in G1. The key and params are assumed to be validated.
    pub fn verify(
        &self,
        messages: &[E::ScalarField],
        pk: &PublicKeyG1<E>,
        params: &SignatureParamsG2<E>,
    ) -> Result<(), BBSPlusError> {
        let b = self.pre_verify(messages, params)?;
        // e(pk + g*e, A) * e(-g, b) == 1, `g` being the params generator in G1
        let lhs = (params.g2.mul_bigint(self.e.into_bigint()) + pk.0).into_affine();
        let neg_g = (-params.g2.into_group()).into_affine();
        let product = E::multi_pairing(
            [E::G1Prepared::from(lhs), E::G1Prepared::from(neg_g)],
            [E::G2Prepared::from(self.A), E::G2Prepared::from(b)],
        );
        if product.is_zero() {
            Ok(())
        } else {
            Err(BBSPlusError::InvalidSignature)
        }
    }
}
