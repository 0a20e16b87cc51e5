use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{collections::BTreeMap, vec::Vec};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Same};
use zeroize::{Zeroize, ZeroizeOnDrop};

use bbs_plus::signature::SignatureG1 as BBSSignatureG1;
use credential_utils::serde_utils::ArkObjectBytes;
use vb_accumulator::witness::{MembershipWitness, NonMembershipWitness};

/// Secret data known only to the prover and whose knowledge is to proven
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Witness<E: Pairing> {
    PoKBBSSignatureG1(PoKBBSSignatureG1<E>),
    AccumulatorMembership(Membership<E>),
    AccumulatorNonMembership(NonMembership<E>),
    /// Scalars committed in a Pedersen commitment in group G1
    PedersenCommitment(#[serde_as(as = "Vec<ArkObjectBytes>")] Vec<E::ScalarField>),
    /// Scalars committed in a Pedersen commitment in group G2
    PedersenCommitmentG2(#[serde_as(as = "Vec<ArkObjectBytes>")] Vec<E::ScalarField>),
}

#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Witnesses<E: Pairing>(pub Vec<Witness<E>>);

/// Secret data corresponding when proving knowledge of BBS+ sig
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PoKBBSSignatureG1<E: Pairing> {
    pub signature: BBSSignatureG1<E>,
    #[serde_as(as = "BTreeMap<Same, ArkObjectBytes>")]
    pub unrevealed_messages: BTreeMap<usize, E::ScalarField>,
}

/// Secret data corresponding when proving accumulator membership
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(bound = "")]
pub struct Membership<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub element: E::ScalarField,
    #[zeroize(skip)]
    pub witness: MembershipWitness<E::G1Affine>,
}

/// Secret data corresponding when proving accumulator non-membership
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(bound = "")]
pub struct NonMembership<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub element: E::ScalarField,
    #[zeroize(skip)]
    pub witness: NonMembershipWitness<E::G1Affine>,
}

impl<E: Pairing> Witness<E> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PoKBBSSignatureG1(_) => "PoKBBSSignatureG1",
            Self::AccumulatorMembership(_) => "AccumulatorMembership",
            Self::AccumulatorNonMembership(_) => "AccumulatorNonMembership",
            Self::PedersenCommitment(_) => "PedersenCommitment",
            Self::PedersenCommitmentG2(_) => "PedersenCommitmentG2",
        }
    }

    /// The secret scalar at the given witness index, if any. For a BBS+ signature the index is the
    /// message index and revealed messages have no value here.
    pub fn value_at(&self, w_idx: usize) -> Option<&E::ScalarField> {
        match self {
            Self::PoKBBSSignatureG1(w) => w.unrevealed_messages.get(&w_idx),
            Self::AccumulatorMembership(w) => (w_idx == 0).then_some(&w.element),
            Self::AccumulatorNonMembership(w) => (w_idx == 0).then_some(&w.element),
            Self::PedersenCommitment(w) | Self::PedersenCommitmentG2(w) => w.get(w_idx),
        }
    }
}

impl<E: Pairing> Witnesses<E> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(&mut self, item: Witness<E>) -> usize {
        self.0.push(item);
        self.0.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<E: Pairing> Default for Witnesses<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Pairing> Zeroize for PoKBBSSignatureG1<E> {
    fn zeroize(&mut self) {
        self.signature.zeroize();
        self.unrevealed_messages
            .values_mut()
            .for_each(|v| v.zeroize());
    }
}

impl<E: Pairing> Drop for PoKBBSSignatureG1<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Create a `Witness` variant for proving knowledge of BBS+ signature
impl<E: Pairing> PoKBBSSignatureG1<E> {
    pub fn new_as_witness(
        signature: BBSSignatureG1<E>,
        unrevealed_messages: BTreeMap<usize, E::ScalarField>,
    ) -> Witness<E> {
        Witness::PoKBBSSignatureG1(PoKBBSSignatureG1 {
            signature,
            unrevealed_messages,
        })
    }
}

/// Create a `Witness` variant for proving membership in accumulator
impl<E: Pairing> Membership<E> {
    pub fn new_as_witness(
        element: E::ScalarField,
        witness: MembershipWitness<E::G1Affine>,
    ) -> Witness<E> {
        Witness::AccumulatorMembership(Membership { element, witness })
    }
}

/// Create a `Witness` variant for proving non-membership in accumulator
impl<E: Pairing> NonMembership<E> {
    pub fn new_as_witness(
        element: E::ScalarField,
        witness: NonMembershipWitness<E::G1Affine>,
    ) -> Witness<E> {
        Witness::AccumulatorNonMembership(NonMembership { element, witness })
    }
}

impl_tagged_serialization!(Witness<E: Pairing> {
    PoKBBSSignatureG1 = 0u8,
    AccumulatorMembership = 1u8,
    AccumulatorNonMembership = 2u8,
    PedersenCommitment = 3u8,
    PedersenCommitmentG2 = 4u8,
});
