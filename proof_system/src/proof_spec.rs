use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::{
    error::ProofSystemError,
    meta_statement::{EqualWitnesses, MetaStatement, MetaStatements, WitnessRef},
    setup_params::SetupParams,
    statement::{Statement, Statements},
};
use credential_utils::signature::MultiMessageSignatureParams;

/// Describes the relations that need to proven. This is known to the prover and verifier and must
/// be agreed upon before creating a `Proof`. Represented as collection of `Statement`s and `MetaStatement`s.
/// Also contains any setup params referenced by the statements.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct ProofSpec<E: Pairing> {
    pub statements: Statements<E>,
    pub meta_statements: MetaStatements,
    pub setup_params: Vec<SetupParams<E>>,
    /// `context` is any arbitrary data that needs to be hashed into the proof and it must be kept
    /// same while creating and verifying the proof. Eg of `context` are the purpose of
    /// the proof or the verifier's identity or some verifier-specific identity of the holder
    /// or all of the above combined.
    pub context: Option<Vec<u8>>,
}

impl<E: Pairing> ProofSpec<E> {
    /// Create a new `ProofSpec`. Does not validate, call `validate` for that
    pub fn new(
        statements: Statements<E>,
        meta_statements: MetaStatements,
        setup_params: Vec<SetupParams<E>>,
        context: Option<Vec<u8>>,
    ) -> Self {
        Self {
            statements,
            meta_statements,
            setup_params,
            context,
        }
    }

    /// Checks that every statement can get its setup params and that all meta statements are valid
    pub fn validate(&self) -> Result<(), ProofSystemError> {
        self.validate_setup_params_refs()?;
        self.validate_meta_statements()
    }

    /// Checks that each statement can get all its setup params, either inline or from `setup_params`
    pub fn validate_setup_params_refs(&self) -> Result<(), ProofSystemError> {
        for statement in self.statements.0.iter() {
            match statement {
                Statement::PoKBBSSignatureG1(s) => {
                    s.get_sig_params(&self.setup_params)?;
                    s.get_public_key(&self.setup_params)?;
                }
                Statement::AccumulatorMembership(s) => {
                    s.get_params(&self.setup_params)?;
                    s.get_public_key(&self.setup_params)?;
                    s.get_proving_key(&self.setup_params)?;
                }
                Statement::AccumulatorNonMembership(s) => {
                    s.get_params(&self.setup_params)?;
                    s.get_public_key(&self.setup_params)?;
                    s.get_proving_key(&self.setup_params)?;
                }
                Statement::PedersenCommitment(s) => {
                    s.get_commitment_key(&self.setup_params)?;
                }
                Statement::PedersenCommitmentG2(s) => {
                    s.get_commitment_key_g2(&self.setup_params)?;
                }
            }
        }
        Ok(())
    }

    /// Checks that every witness equality has at least 2 witnesses and each of them refers to an existing
    /// statement and a witness that exists in that statement. No witness can be part of 2 equalities. Only
    /// statements referenced by some meta statement need their setup params here.
    pub fn validate_meta_statements(&self) -> Result<(), ProofSystemError> {
        if let Some((wit_ref, first, second)) = self.meta_statements.shared_witness_ref() {
            return Err(ProofSystemError::WitnessRefInMultipleEqualities(
                wit_ref, first, second,
            ));
        }
        for (i, m) in self.meta_statements.0.iter().enumerate() {
            match m {
                MetaStatement::WitnessEquality(eq) => {
                    if !eq.is_valid() {
                        return Err(ProofSystemError::WitnessEqualityWithFewerThanTwoWitnesses(i));
                    }
                    for wit_ref in eq.0.iter() {
                        self.validate_witness_ref(wit_ref)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn witness_equalities(&self) -> impl Iterator<Item = &EqualWitnesses> {
        self.meta_statements.witness_equalities()
    }

    pub fn add_statement(&mut self, statement: Statement<E>) -> usize {
        self.statements.add(statement)
    }

    pub fn add_meta_statement(&mut self, meta_statement: MetaStatement) -> usize {
        self.meta_statements.add(meta_statement)
    }

    fn validate_witness_ref(&self, wit_ref: &WitnessRef) -> Result<(), ProofSystemError> {
        let (s_idx, w_idx) = *wit_ref;
        let invalid = || ProofSystemError::InvalidWitnessRef(s_idx, w_idx);
        let statement = self.statements.0.get(s_idx).ok_or_else(invalid)?;
        let exists = match statement {
            Statement::PoKBBSSignatureG1(s) => {
                let params = s.get_sig_params(&self.setup_params)?;
                // Revealed messages are not witnesses
                w_idx < params.supported_message_count()
                    && !s.revealed_messages.contains_key(&w_idx)
            }
            Statement::AccumulatorMembership(_) | Statement::AccumulatorNonMembership(_) => {
                w_idx == 0
            }
            Statement::PedersenCommitment(s) => {
                w_idx < s.get_commitment_key(&self.setup_params)?.len()
            }
            Statement::PedersenCommitmentG2(s) => {
                w_idx < s.get_commitment_key_g2(&self.setup_params)?.len()
            }
        };
        if exists {
            Ok(())
        } else {
            Err(invalid())
        }
    }
}

impl<E: Pairing> Default for ProofSpec<E> {
    fn default() -> Self {
        Self {
            statements: Statements::new(),
            meta_statements: MetaStatements::new(),
            setup_params: Vec::new(),
            context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        meta_statement::EqualWitnesses,
        setup_params::ParamSource,
        statement::{bbs_plus::PoKBBSSignatureG1, ped_comm::PedersenCommitment},
        test_serialization,
    };
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use ark_std::{
        collections::BTreeMap,
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use bbs_plus::prelude::{KeypairG2, SignatureParamsG1};
    use blake2::Blake2b512;

    fn equality(refs: &[WitnessRef]) -> MetaStatement {
        MetaStatement::WitnessEquality(EqualWitnesses(refs.iter().cloned().collect()))
    }

    #[test]
    fn validate_witness_references() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let sig_params = SignatureParamsG1::<Bls12_381>::new::<Blake2b512>(b"test", 5);
        let keypair = KeypairG2::<Bls12_381>::generate_using_rng(&mut rng, &sig_params);
        let mut revealed = BTreeMap::new();
        revealed.insert(2, Fr::rand(&mut rng));

        let setup_params = vec![
            SetupParams::BBSPlusSignatureParams(sig_params),
            SetupParams::BBSPlusPublicKey(keypair.public_key.clone()),
        ];
        let mut statements = Statements::new();
        statements.add(PoKBBSSignatureG1::new_statement_from_params_ref(
            0, 1, revealed,
        ));
        statements.add(PedersenCommitment::new_statement_from_params(
            vec![G1Affine::rand(&mut rng), G1Affine::rand(&mut rng)],
            G1Affine::rand(&mut rng),
        ));

        let spec_with = |meta: Vec<MetaStatement>| {
            ProofSpec::new(
                statements.clone(),
                MetaStatements(meta),
                setup_params.clone(),
                None,
            )
        };

        let spec = spec_with(vec![equality(&[(0, 1), (1, 1)])]);
        spec.validate().unwrap();
        test_serialization!(ProofSpec<Bls12_381>, spec);

        // Revealed message
        assert!(matches!(
            spec_with(vec![equality(&[(0, 2), (1, 1)])]).validate(),
            Err(ProofSystemError::InvalidWitnessRef(0, 2))
        ));
        // Message index beyond the params
        assert!(matches!(
            spec_with(vec![equality(&[(0, 5), (1, 1)])]).validate(),
            Err(ProofSystemError::InvalidWitnessRef(0, 5))
        ));
        // Beyond the commitment key
        assert!(matches!(
            spec_with(vec![equality(&[(0, 0), (1, 2)])]).validate(),
            Err(ProofSystemError::InvalidWitnessRef(1, 2))
        ));
        // Non-existent statement
        assert!(matches!(
            spec_with(vec![equality(&[(0, 0), (2, 0)])]).validate(),
            Err(ProofSystemError::InvalidWitnessRef(2, 0))
        ));
        // Single witness
        assert!(matches!(
            spec_with(vec![equality(&[(0, 0)])]).validate(),
            Err(ProofSystemError::WitnessEqualityWithFewerThanTwoWitnesses(0))
        ));
        // A witness in 2 equalities
        let overlapping = spec_with(vec![
            equality(&[(0, 0), (1, 0)]),
            equality(&[(0, 1), (1, 1)]),
            equality(&[(1, 0), (0, 3)]),
        ]);
        assert!(matches!(
            overlapping.validate(),
            Err(ProofSystemError::WitnessRefInMultipleEqualities((1, 0), 0, 2))
        ));
        assert!(matches!(
            overlapping.validate_meta_statements(),
            Err(ProofSystemError::WitnessRefInMultipleEqualities((1, 0), 0, 2))
        ));
        // Combined into one equality it is fine
        spec_with(vec![
            equality(&[(0, 0), (1, 0), (0, 3)]),
            equality(&[(0, 1), (1, 1)]),
        ])
        .validate()
        .unwrap();

        // Reference to missing setup param
        let mut spec = spec_with(vec![]);
        spec.add_statement(PoKBBSSignatureG1::new_statement_from_params_ref(
            0,
            5,
            BTreeMap::new(),
        ));
        spec.validate_meta_statements().unwrap();
        assert!(matches!(
            spec.validate(),
            Err(ProofSystemError::InvalidSetupParamsIndex(5))
        ));

        // Inline params with a referenced key
        let mut spec = spec_with(vec![]);
        let sig_params = match &setup_params[0] {
            SetupParams::BBSPlusSignatureParams(p) => p.clone(),
            _ => unreachable!(),
        };
        spec.add_statement(PoKBBSSignatureG1::new_statement(
            ParamSource::Inline(sig_params.clone()),
            ParamSource::Ref(1),
            BTreeMap::new(),
        ));
        spec.validate().unwrap();
        spec.add_statement(PoKBBSSignatureG1::new_statement(
            ParamSource::Inline(sig_params),
            ParamSource::Ref(0),
            BTreeMap::new(),
        ));
        assert!(matches!(
            spec.validate(),
            Err(ProofSystemError::IncompatibleBBSPlusSetupParamAtIndex(0))
        ));

        // Reference to setup param of another kind
        let mut spec = spec_with(vec![]);
        spec.add_statement(PoKBBSSignatureG1::new_statement_from_params_ref(
            1,
            1,
            BTreeMap::new(),
        ));
        assert!(matches!(
            spec.validate(),
            Err(ProofSystemError::IncompatibleBBSPlusSetupParamAtIndex(1))
        ));
    }
}
