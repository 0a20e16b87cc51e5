//! Accumulator membership and non-membership as sub-protocols. The two only differ in the protocol run
//! from `vb_accumulator`, which is abstracted by [`AccumulatorProtocol`], so one sub-protocol type serves both.

use ark_ec::pairing::Pairing;
use ark_std::{fmt::Debug, io::Write, rand::RngCore};
use vb_accumulator::prelude::{
    MembershipProof, MembershipProofProtocol, MembershipProvingKey, NonMembershipProof,
    NonMembershipProofProtocol, NonMembershipProvingKey, PublicKey, SetupParams as AccumParams,
    VBAccumulatorError,
};

use crate::{
    error::ProofSystemError,
    statement_proof::StatementProof,
    witness::{Membership, NonMembership},
};

/// Values of an accumulator statement used by both the prover and the verifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccumulatorPublic<'a, E: Pairing, K> {
    pub params: &'a AccumParams<E>,
    pub public_key: &'a PublicKey<E>,
    pub proving_key: &'a K,
    pub accumulator_value: E::G1Affine,
}

pub trait AccumulatorProtocol<E: Pairing>: Sized + Clone + Debug + PartialEq + Eq {
    type ProvingKey: Clone + Debug + PartialEq + Eq;
    type Witness;
    type Proof;

    /// `blinding` is used for the (non-)member so that it can be proven equal to witnesses of other statements
    fn init<R: RngCore>(
        rng: &mut R,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        witness: &Self::Witness,
        blinding: Option<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError>;

    fn challenge_contribution<W: Write>(
        &self,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        writer: W,
    ) -> Result<(), VBAccumulatorError>;

    fn into_statement_proof(self, challenge: &E::ScalarField) -> StatementProof<E>;

    fn proof_challenge_contribution<W: Write>(
        proof: &Self::Proof,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        writer: W,
    ) -> Result<(), VBAccumulatorError>;

    fn verify_proof(
        proof: &Self::Proof,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        challenge: &E::ScalarField,
    ) -> Result<(), VBAccumulatorError>;
}

impl<E: Pairing> AccumulatorProtocol<E> for MembershipProofProtocol<E> {
    type ProvingKey = MembershipProvingKey<E::G1Affine>;
    type Witness = Membership<E>;
    type Proof = MembershipProof<E>;

    fn init<R: RngCore>(
        rng: &mut R,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        witness: &Self::Witness,
        blinding: Option<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        Ok(MembershipProofProtocol::init(
            rng,
            &witness.element,
            blinding,
            &witness.witness,
            public.public_key,
            public.params,
            public.proving_key,
        ))
    }

    fn challenge_contribution<W: Write>(
        &self,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        writer: W,
    ) -> Result<(), VBAccumulatorError> {
        MembershipProofProtocol::challenge_contribution(
            self,
            &public.accumulator_value,
            public.public_key,
            public.params,
            public.proving_key,
            writer,
        )
    }

    fn into_statement_proof(self, challenge: &E::ScalarField) -> StatementProof<E> {
        StatementProof::AccumulatorMembership(self.gen_proof(challenge))
    }

    fn proof_challenge_contribution<W: Write>(
        proof: &Self::Proof,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        writer: W,
    ) -> Result<(), VBAccumulatorError> {
        proof.challenge_contribution(
            &public.accumulator_value,
            public.public_key,
            public.params,
            public.proving_key,
            writer,
        )
    }

    fn verify_proof(
        proof: &Self::Proof,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        challenge: &E::ScalarField,
    ) -> Result<(), VBAccumulatorError> {
        proof.verify(
            &public.accumulator_value,
            challenge,
            public.public_key,
            public.params,
            public.proving_key,
        )
    }
}

impl<E: Pairing> AccumulatorProtocol<E> for NonMembershipProofProtocol<E> {
    type ProvingKey = NonMembershipProvingKey<E::G1Affine>;
    type Witness = NonMembership<E>;
    type Proof = NonMembershipProof<E>;

    fn init<R: RngCore>(
        rng: &mut R,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        witness: &Self::Witness,
        blinding: Option<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        NonMembershipProofProtocol::init(
            rng,
            &witness.element,
            blinding,
            &witness.witness,
            public.public_key,
            public.params,
            public.proving_key,
        )
    }

    fn challenge_contribution<W: Write>(
        &self,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        writer: W,
    ) -> Result<(), VBAccumulatorError> {
        NonMembershipProofProtocol::challenge_contribution(
            self,
            &public.accumulator_value,
            public.public_key,
            public.params,
            public.proving_key,
            writer,
        )
    }

    fn into_statement_proof(self, challenge: &E::ScalarField) -> StatementProof<E> {
        StatementProof::AccumulatorNonMembership(self.gen_proof(challenge))
    }

    fn proof_challenge_contribution<W: Write>(
        proof: &Self::Proof,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        writer: W,
    ) -> Result<(), VBAccumulatorError> {
        proof.challenge_contribution(
            &public.accumulator_value,
            public.public_key,
            public.params,
            public.proving_key,
            writer,
        )
    }

    fn verify_proof(
        proof: &Self::Proof,
        public: &AccumulatorPublic<'_, E, Self::ProvingKey>,
        challenge: &E::ScalarField,
    ) -> Result<(), VBAccumulatorError> {
        proof.verify(
            &public.accumulator_value,
            challenge,
            public.public_key,
            public.params,
            public.proving_key,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccumulatorSubProtocol<'a, E: Pairing, P: AccumulatorProtocol<E>> {
    pub id: usize,
    pub public: AccumulatorPublic<'a, E, P::ProvingKey>,
    pub protocol: Option<P>,
}

pub type AccumulatorMembershipSubProtocol<'a, E> =
    AccumulatorSubProtocol<'a, E, MembershipProofProtocol<E>>;

pub type AccumulatorNonMembershipSubProtocol<'a, E> =
    AccumulatorSubProtocol<'a, E, NonMembershipProofProtocol<E>>;

impl<'a, E: Pairing, P: AccumulatorProtocol<E>> AccumulatorSubProtocol<'a, E, P> {
    pub fn new(
        id: usize,
        params: &'a AccumParams<E>,
        public_key: &'a PublicKey<E>,
        proving_key: &'a P::ProvingKey,
        accumulator_value: E::G1Affine,
    ) -> Self {
        Self {
            id,
            public: AccumulatorPublic {
                params,
                public_key,
                proving_key,
                accumulator_value,
            },
            protocol: None,
        }
    }

    pub fn init<R: RngCore>(
        &mut self,
        rng: &mut R,
        blinding: Option<E::ScalarField>,
        witness: &P::Witness,
    ) -> Result<(), ProofSystemError> {
        if self.protocol.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(self.id));
        }
        let protocol = P::init(rng, &self.public, witness, blinding).map_err(|e| self.failed(e))?;
        self.protocol = Some(protocol);
        Ok(())
    }

    pub fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), ProofSystemError> {
        self.protocol
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(self.id))?
            .challenge_contribution(&self.public, writer)
            .map_err(|e| self.failed(e))
    }

    pub fn gen_proof_contribution(
        &mut self,
        challenge: &E::ScalarField,
    ) -> Result<StatementProof<E>, ProofSystemError> {
        let protocol = self
            .protocol
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(self.id))?;
        Ok(protocol.into_statement_proof(challenge))
    }

    pub fn verify_proof_contribution(
        &self,
        challenge: &E::ScalarField,
        proof: &P::Proof,
    ) -> Result<(), ProofSystemError> {
        P::verify_proof(proof, &self.public, challenge).map_err(|e| self.failed(e))
    }

    /// The verifier's counterpart of `challenge_contribution`
    pub fn challenge_contribution_from_proof<W: Write>(
        &self,
        proof: &P::Proof,
        writer: W,
    ) -> Result<(), ProofSystemError> {
        P::proof_challenge_contribution(proof, &self.public, writer).map_err(|e| self.failed(e))
    }

    fn failed(&self, e: VBAccumulatorError) -> ProofSystemError {
        ProofSystemError::VBAccumProofContributionFailed(self.id, e)
    }
}
