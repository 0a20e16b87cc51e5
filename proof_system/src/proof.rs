use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{collections::BTreeMap, vec::Vec};
use digest::Digest;
use serde::{Deserialize, Serialize};

use credential_utils::hashing_utils::field_elem_from_try_and_incr;

use crate::{error::ProofSystemError, meta_statement::WitnessRef, statement_proof::StatementProof};

/// Created by the prover and verified by the verifier. Contains one `StatementProof` per `Statement`
/// in the same order as the statements of the `ProofSpec`. The challenge is not stored, the verifier
/// recomputes it from the statement proofs.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Proof<E: Pairing> {
    pub statement_proofs: Vec<StatementProof<E>>,
}

/// Passed to the prover during proof creation
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProverConfig<E: Pairing> {
    /// Blindings to use for specific witnesses instead of fresh randomness. Useful when the same
    /// blinding was committed to elsewhere, like in a Pedersen commitment sent to a signer. When a witness
    /// is part of an equality, its blinding is used for the whole equality.
    pub blindings: BTreeMap<WitnessRef, E::ScalarField>,
}

impl<E: Pairing> Default for ProverConfig<E> {
    fn default() -> Self {
        Self {
            blindings: BTreeMap::new(),
        }
    }
}

impl<E: Pairing> ProverConfig<E> {
    pub fn with_blindings(blindings: BTreeMap<WitnessRef, E::ScalarField>) -> Self {
        Self { blindings }
    }
}

impl<E: Pairing> Proof<E> {
    pub fn statement_proof(&self, index: usize) -> Result<&StatementProof<E>, ProofSystemError> {
        self.statement_proofs
            .get(index)
            .ok_or(ProofSystemError::InvalidStatement)
    }

    pub fn statement_proofs(&self) -> &[StatementProof<E>] {
        &self.statement_proofs
    }

    /// Hash bytes to a field element. This is vulnerable to timing attack and is only used when input
    /// is public anyway like when generating setup parameters or challenge
    pub fn generate_challenge_from_bytes<D: Digest>(bytes: &[u8]) -> E::ScalarField {
        field_elem_from_try_and_incr::<E::ScalarField, D>(bytes)
    }
}
