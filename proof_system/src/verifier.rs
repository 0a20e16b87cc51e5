//! Code for the verifier to verify a `Proof`

use ark_ec::pairing::Pairing;
use ark_std::{
    collections::BTreeSet,
    end_timer, start_timer,
    vec::Vec,
};
use credential_utils::expect_equality;
use digest::Digest;

use crate::{
    error::ProofSystemError,
    meta_statement::WitnessRef,
    proof::Proof,
    proof_spec::ProofSpec,
    statement::Statement,
    statement_proof::StatementProof,
    sub_protocols::{
        accumulator::{AccumulatorMembershipSubProtocol, AccumulatorNonMembershipSubProtocol},
        bbs_plus::PoKBBSSigG1SubProtocol,
        schnorr::SchnorrProtocol,
        SubProtocol,
    },
};

impl<E: Pairing> Proof<E> {
    /// Verify the `Proof` given the `ProofSpec` and `nonce`. The challenge is recomputed from `nonce`,
    /// the context of the `ProofSpec` and the contribution of each statement proof, in that order.
    pub fn verify<D: Digest>(
        &self,
        proof_spec: &ProofSpec<E>,
        nonce: Option<Vec<u8>>,
    ) -> Result<(), ProofSystemError> {
        let verify_time = start_timer!(|| "Composite proof verification");
        proof_spec.validate()?;

        expect_equality!(
            proof_spec.statements.len(),
            self.statement_proofs.len(),
            ProofSystemError::UnequalProofAndStatementCount
        );

        let mut challenge_bytes = Vec::new();
        if let Some(n) = nonce.as_ref() {
            challenge_bytes.extend_from_slice(n);
        }
        if let Some(ctx) = &proof_spec.context {
            challenge_bytes.extend_from_slice(ctx);
        }

        macro_rules! accum_verifier {
            ($s: ident, $s_idx: ident, $p: ident, $protocol: ident, $protocol_variant: ident) => {{
                let params = $s.get_params(&proof_spec.setup_params)?;
                let pk = $s.get_public_key(&proof_spec.setup_params)?;
                let prk = $s.get_proving_key(&proof_spec.setup_params)?;
                let sp = $protocol::new($s_idx, params, pk, prk, $s.accumulator_value);
                sp.challenge_contribution_from_proof($p, &mut challenge_bytes)?;
                SubProtocol::$protocol_variant(sp)
            }};
        }

        macro_rules! ped_comm_verifier {
            ($s: ident, $s_idx: ident, $p: ident, $cm_key_func: ident, $protocol_variant: ident) => {{
                let comm_key = $s.$cm_key_func(&proof_spec.setup_params)?;
                SchnorrProtocol::compute_challenge_contribution(
                    comm_key,
                    &$s.commitment,
                    &$p.t,
                    &mut challenge_bytes,
                )?;
                SubProtocol::$protocol_variant(SchnorrProtocol::new($s_idx, comm_key, $s.commitment))
            }};
        }

        // Build a verifier for each statement and get its contribution to the challenge
        let mut verifiers = Vec::<SubProtocol<E>>::with_capacity(self.statement_proofs.len());
        for (s_idx, (statement, proof)) in proof_spec
            .statements
            .0
            .iter()
            .zip(self.statement_proofs.iter())
            .enumerate()
        {
            let sp = match (statement, proof) {
                (Statement::PoKBBSSignatureG1(s), StatementProof::PoKBBSSignatureG1(p)) => {
                    let sig_params = s.get_sig_params(&proof_spec.setup_params)?;
                    let pk = s.get_public_key(&proof_spec.setup_params)?;
                    let sp =
                        PoKBBSSigG1SubProtocol::new(s_idx, &s.revealed_messages, sig_params, pk);
                    sp.challenge_contribution_from_proof(p, &mut challenge_bytes)?;
                    SubProtocol::PoKBBSSignatureG1(sp)
                }
                (Statement::AccumulatorMembership(s), StatementProof::AccumulatorMembership(p)) => {
                    accum_verifier!(
                        s,
                        s_idx,
                        p,
                        AccumulatorMembershipSubProtocol,
                        AccumulatorMembership
                    )
                }
                (
                    Statement::AccumulatorNonMembership(s),
                    StatementProof::AccumulatorNonMembership(p),
                ) => accum_verifier!(
                    s,
                    s_idx,
                    p,
                    AccumulatorNonMembershipSubProtocol,
                    AccumulatorNonMembership
                ),
                (Statement::PedersenCommitment(s), StatementProof::PedersenCommitment(p)) => {
                    ped_comm_verifier!(s, s_idx, p, get_commitment_key, PoKDiscreteLogs)
                }
                (Statement::PedersenCommitmentG2(s), StatementProof::PedersenCommitmentG2(p)) => {
                    ped_comm_verifier!(s, s_idx, p, get_commitment_key_g2, PoKDiscreteLogsG2)
                }
                _ => {
                    return Err(ProofSystemError::ProofIncompatibleWithStatement(
                        s_idx,
                        statement.kind().into(),
                        proof.kind().into(),
                    ))
                }
            };
            verifiers.push(sp);
        }

        // Responses of witnesses required to be equal must be equal as well
        for eq_wits in proof_spec.witness_equalities() {
            let mut first: Option<(WitnessRef, &E::ScalarField)> = None;
            for wr in eq_wits.0.iter().copied() {
                let resp = self.witness_response(proof_spec, &wr)?;
                match first {
                    None => first = Some((wr, resp)),
                    Some((first_ref, first_resp)) => {
                        if first_resp != resp {
                            return Err(ProofSystemError::WitnessResponseNotEqual(first_ref, wr));
                        }
                    }
                }
            }
        }

        // Verifier independently generates challenge
        let challenge = Self::generate_challenge_from_bytes::<D>(&challenge_bytes);

        for (s_idx, (sp, proof)) in verifiers
            .iter()
            .zip(self.statement_proofs.iter())
            .enumerate()
        {
            match (sp, proof) {
                (SubProtocol::PoKBBSSignatureG1(sp), StatementProof::PoKBBSSignatureG1(p)) => {
                    sp.verify_proof_contribution(&challenge, p)?
                }
                (
                    SubProtocol::AccumulatorMembership(sp),
                    StatementProof::AccumulatorMembership(p),
                ) => sp.verify_proof_contribution(&challenge, p)?,
                (
                    SubProtocol::AccumulatorNonMembership(sp),
                    StatementProof::AccumulatorNonMembership(p),
                ) => sp.verify_proof_contribution(&challenge, p)?,
                (SubProtocol::PoKDiscreteLogs(sp), StatementProof::PedersenCommitment(p)) => sp
                    .verify_proof_contribution(&challenge, p)
                    .map_err(|e| ProofSystemError::SchnorrProofContributionFailed(s_idx, e))?,
                (SubProtocol::PoKDiscreteLogsG2(sp), StatementProof::PedersenCommitmentG2(p)) => {
                    sp.verify_proof_contribution(&challenge, p)
                        .map_err(|e| ProofSystemError::SchnorrProofContributionFailed(s_idx, e))?
                }
                _ => return Err(ProofSystemError::InvalidStatement),
            }
        }
        end_timer!(verify_time);
        Ok(())
    }

    /// Response from the Schnorr protocol for the witness at the given reference. Equal witnesses have
    /// equal responses as they were blinded with the same randomness.
    fn witness_response<'a>(
        &'a self,
        proof_spec: &ProofSpec<E>,
        wit_ref: &WitnessRef,
    ) -> Result<&'a E::ScalarField, ProofSystemError> {
        let (s_idx, w_idx) = *wit_ref;
        let statement = proof_spec
            .statements
            .0
            .get(s_idx)
            .ok_or(ProofSystemError::InvalidWitnessRef(s_idx, w_idx))?;
        match (statement, self.statement_proof(s_idx)?) {
            (Statement::PoKBBSSignatureG1(s), StatementProof::PoKBBSSignatureG1(p)) => {
                let revealed_msg_ids = s.revealed_messages.keys().copied().collect::<BTreeSet<_>>();
                p.get_resp_for_message(w_idx, &revealed_msg_ids)
                    .map_err(|e| ProofSystemError::BBSPlusProofContributionFailed(s_idx, e))
            }
            (Statement::AccumulatorMembership(_), StatementProof::AccumulatorMembership(p)) => {
                Ok(p.get_schnorr_response_for_element())
            }
            (
                Statement::AccumulatorNonMembership(_),
                StatementProof::AccumulatorNonMembership(p),
            ) => Ok(p.get_schnorr_response_for_element()),
            (Statement::PedersenCommitment(_), StatementProof::PedersenCommitment(p)) => p
                .response
                .get_response(w_idx)
                .map_err(|e| ProofSystemError::SchnorrProofContributionFailed(s_idx, e)),
            (Statement::PedersenCommitmentG2(_), StatementProof::PedersenCommitmentG2(p)) => p
                .response
                .get_response(w_idx)
                .map_err(|e| ProofSystemError::SchnorrProofContributionFailed(s_idx, e)),
            (s, p) => Err(ProofSystemError::ProofIncompatibleWithStatement(
                s_idx,
                s.kind().into(),
                p.kind().into(),
            )),
        }
    }
}

