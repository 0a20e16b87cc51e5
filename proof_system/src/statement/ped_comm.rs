use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    error::ProofSystemError,
    setup_params::{ParamSource, SetupParams},
    statement::Statement,
};
use credential_utils::serde_utils::ArkObjectBytes;
use schnorr_pok::error::SchnorrError;

/// Knowledge of the opening `s_0, s_1, ..., s_{n-1}` of `commitment = key_0 * s_0 + ... + key_{n-1} * s_{n-1}`.
/// The same struct serves commitments in G1 and in G2, the `Statement` variant tells them apart. Witness
/// `i` is `s_i`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PedersenCommitment<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub commitment: G,
    pub key: ParamSource<Vec<G>>,
}

impl<G: AffineRepr> PedersenCommitment<G> {
    pub fn new(key: ParamSource<Vec<G>>, commitment: G) -> Self {
        Self { commitment, key }
    }

    pub fn new_statement_from_params<E: Pairing<G1Affine = G>>(
        key: Vec<G>,
        commitment: G,
    ) -> Statement<E> {
        Statement::PedersenCommitment(Self::new(ParamSource::Inline(key), commitment))
    }

    pub fn new_statement_from_params_ref<E: Pairing<G1Affine = G>>(
        key_ref: usize,
        commitment: G,
    ) -> Statement<E> {
        Statement::PedersenCommitment(Self::new(ParamSource::Ref(key_ref), commitment))
    }

    pub fn new_statement_from_params_g2<E: Pairing<G2Affine = G>>(
        key: Vec<G>,
        commitment: G,
    ) -> Statement<E> {
        Statement::PedersenCommitmentG2(Self::new(ParamSource::Inline(key), commitment))
    }

    pub fn new_statement_from_params_ref_g2<E: Pairing<G2Affine = G>>(
        key_ref: usize,
        commitment: G,
    ) -> Statement<E> {
        Statement::PedersenCommitmentG2(Self::new(ParamSource::Ref(key_ref), commitment))
    }

    /// A referenced key must be a `PedersenCommitmentKey`
    pub fn get_commitment_key<'a, E: Pairing<G1Affine = G>>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a Vec<G>, ProofSystemError> {
        self.key.resolve(
            setup_params,
            setup_param_of!(PedersenCommitmentKey),
            ProofSystemError::IncompatiblePedCommSetupParamAtIndex,
        )
    }

    /// A referenced key must be a `PedersenCommitmentKeyG2`
    pub fn get_commitment_key_g2<'a, E: Pairing<G2Affine = G>>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a Vec<G>, ProofSystemError> {
        self.key.resolve(
            setup_params,
            setup_param_of!(PedersenCommitmentKeyG2),
            ProofSystemError::IncompatiblePedCommSetupParamAtIndex,
        )
    }

    /// The commitment to `scalars` under `bases`. Both must have the same length.
    pub fn commit(bases: &[G], scalars: &[G::ScalarField]) -> Result<G, ProofSystemError> {
        if bases.len() != scalars.len() {
            return Err(SchnorrError::ExpectedSameSizeSequences(bases.len(), scalars.len()).into());
        }
        Ok(G::Group::msm_unchecked(bases, scalars).into_affine())
    }
}
