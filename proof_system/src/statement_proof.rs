use ark_ec::{pairing::Pairing, AffineRepr};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use bbs_plus::prelude::PoKOfSignatureG1Proof;
use credential_utils::serde_utils::ArkObjectBytes;
use schnorr_pok::SchnorrResponse;
use vb_accumulator::prelude::{MembershipProof, NonMembershipProof};

/// Proof corresponding to one `Statement`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum StatementProof<E: Pairing> {
    PoKBBSSignatureG1(PoKOfSignatureG1Proof<E>),
    AccumulatorMembership(MembershipProof<E>),
    AccumulatorNonMembership(NonMembershipProof<E>),
    PedersenCommitment(PedersenCommitmentProof<E::G1Affine>),
    PedersenCommitmentG2(PedersenCommitmentProof<E::G2Affine>),
}

impl<E: Pairing> StatementProof<E> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PoKBBSSignatureG1(_) => "PoKBBSSignatureG1",
            Self::AccumulatorMembership(_) => "AccumulatorMembership",
            Self::AccumulatorNonMembership(_) => "AccumulatorNonMembership",
            Self::PedersenCommitment(_) => "PedersenCommitment",
            Self::PedersenCommitmentG2(_) => "PedersenCommitmentG2",
        }
    }
}

/// Schnorr proof of knowledge of the opening of a Pedersen commitment. `t` is the commitment to randomness
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PedersenCommitmentProof<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub t: G,
    pub response: SchnorrResponse<G>,
}

impl<G: AffineRepr> PedersenCommitmentProof<G> {
    pub fn new(t: G, response: SchnorrResponse<G>) -> Self {
        Self { t, response }
    }
}

impl_tagged_serialization!(StatementProof<E: Pairing> {
    PoKBBSSignatureG1 = 0u8,
    AccumulatorMembership = 1u8,
    AccumulatorNonMembership = 2u8,
    PedersenCommitment = 3u8,
    PedersenCommitmentG2 = 4u8,
});
