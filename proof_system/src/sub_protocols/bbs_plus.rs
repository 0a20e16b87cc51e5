use ark_ec::pairing::Pairing;
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
    rand::RngCore,
    vec::Vec,
};
use bbs_plus::prelude::{
    PoKOfSignatureG1Proof, PoKOfSignatureG1Protocol, PublicKeyG2, SignatureParamsG1,
};
use credential_utils::signature::MultiMessageSignatureParams;

use crate::{error::ProofSystemError, statement_proof::StatementProof, witness::PoKBBSSignatureG1};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoKBBSSigG1SubProtocol<'a, E: Pairing> {
    pub id: usize,
    pub revealed_messages: &'a BTreeMap<usize, E::ScalarField>,
    pub signature_params: &'a SignatureParamsG1<E>,
    pub public_key: &'a PublicKeyG2<E>,
    pub protocol: Option<PoKOfSignatureG1Protocol<E>>,
}

impl<'a, E: Pairing> PoKBBSSigG1SubProtocol<'a, E> {
    pub fn new(
        id: usize,
        revealed_messages: &'a BTreeMap<usize, E::ScalarField>,
        signature_params: &'a SignatureParamsG1<E>,
        public_key: &'a PublicKeyG2<E>,
    ) -> Self {
        Self {
            id,
            revealed_messages,
            signature_params,
            public_key,
            protocol: None,
        }
    }

    /// The full message list is assembled from the revealed messages of the statement and the unrevealed
    /// ones of the witness. Each message index must be in exactly one of them.
    pub fn init<R: RngCore>(
        &mut self,
        rng: &mut R,
        blindings: BTreeMap<usize, E::ScalarField>,
        witness: &PoKBBSSignatureG1<E>,
    ) -> Result<(), ProofSystemError> {
        if self.protocol.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(self.id));
        }
        let msg_count = self.signature_params.supported_message_count();
        let mut messages = Vec::with_capacity(msg_count);
        let mut revealed_indices = BTreeSet::new();
        for i in 0..msg_count {
            match (witness.unrevealed_messages.get(&i), self.revealed_messages.get(&i)) {
                (Some(m), None) => messages.push(*m),
                (None, Some(m)) => {
                    revealed_indices.insert(i);
                    messages.push(*m);
                }
                (Some(_), Some(_)) => {
                    return Err(ProofSystemError::BBSPlusMessageRevealedAndHidden(self.id, i))
                }
                (None, None) => {
                    return Err(ProofSystemError::BBSPlusProtocolMessageAbsent(self.id, i))
                }
            }
        }
        let protocol = PoKOfSignatureG1Protocol::init(
            rng,
            &witness.signature,
            self.signature_params,
            &messages,
            blindings,
            &revealed_indices,
        )
        .map_err(|e| ProofSystemError::BBSPlusProofContributionFailed(self.id, e))?;
        self.protocol = Some(protocol);
        Ok(())
    }

    pub fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), ProofSystemError> {
        self.protocol
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(self.id))?
            .challenge_contribution(self.revealed_messages, self.signature_params, writer)
            .map_err(|e| ProofSystemError::BBSPlusProofContributionFailed(self.id, e))
    }

    pub fn gen_proof_contribution(
        &mut self,
        challenge: &E::ScalarField,
    ) -> Result<StatementProof<E>, ProofSystemError> {
        let protocol = self
            .protocol
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(self.id))?;
        let proof = protocol
            .gen_proof(challenge)
            .map_err(|e| ProofSystemError::BBSPlusProofContributionFailed(self.id, e))?;
        Ok(StatementProof::PoKBBSSignatureG1(proof))
    }

    pub fn verify_proof_contribution(
        &self,
        challenge: &E::ScalarField,
        proof: &PoKOfSignatureG1Proof<E>,
    ) -> Result<(), ProofSystemError> {
        proof
            .verify(
                self.revealed_messages,
                challenge,
                self.public_key,
                self.signature_params,
            )
            .map_err(|e| ProofSystemError::BBSPlusProofContributionFailed(self.id, e))
    }

    pub fn challenge_contribution_from_proof<W: Write>(
        &self,
        proof: &PoKOfSignatureG1Proof<E>,
        writer: W,
    ) -> Result<(), ProofSystemError> {
        proof
            .challenge_contribution(self.revealed_messages, self.signature_params, writer)
            .map_err(|e| ProofSystemError::BBSPlusProofContributionFailed(self.id, e))
    }
}
