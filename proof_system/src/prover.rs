//! Code for the prover to generate a `Proof`

use ark_ec::pairing::Pairing;
use ark_std::{
    collections::BTreeMap, end_timer, rand::RngCore, start_timer, vec::Vec, UniformRand,
};
use credential_utils::expect_equality;
use digest::Digest;

use crate::{
    error::ProofSystemError,
    meta_statement::WitnessRef,
    proof::{Proof, ProverConfig},
    proof_spec::ProofSpec,
    statement::Statement,
    sub_protocols::{
        accumulator::{AccumulatorMembershipSubProtocol, AccumulatorNonMembershipSubProtocol},
        bbs_plus::PoKBBSSigG1SubProtocol,
        schnorr::SchnorrProtocol,
        SubProtocol,
    },
    witness::{Witness, Witnesses},
};

macro_rules! err_incompat_witness {
    ($s_idx:ident, $s: ident, $witness: ident) => {
        return Err(ProofSystemError::WitnessIncompatibleWithStatement(
            $s_idx,
            $s.kind().into(),
            $witness.kind().into(),
        ))
    };
}

impl<E: Pairing> Proof<E> {
    /// Create a new proof. `nonce` is random data that needs to be hashed into the proof and
    /// it must be kept same while creating and verifying the proof. One use of `nonce` is for replay
    /// protection, here the prover might have chosen its nonce to prevent the verifier from reusing
    /// the proof as its own or the verifier might want to require the user to create fresh proof.
    ///
    /// Witnesses that the `ProofSpec` requires to be equal are checked for equality before anything is
    /// committed to, so a prover with inconsistent witnesses gets an error instead of an invalid proof.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        proof_spec: &ProofSpec<E>,
        witnesses: Witnesses<E>,
        nonce: Option<Vec<u8>>,
        config: ProverConfig<E>,
    ) -> Result<Self, ProofSystemError> {
        let proof_time = start_timer!(|| "Composite proof generation");
        proof_spec.validate()?;

        // There should be a witness for each statement
        expect_equality!(
            proof_spec.statements.len(),
            witnesses.len(),
            ProofSystemError::UnequalWitnessAndStatementCount
        );

        // Keep blinding for each witness reference. Any 2 witnesses that are equal get the same
        // blinding so that their responses are equal as well.
        let mut blindings = config.blindings;
        for eq_wits in proof_spec.witness_equalities() {
            let mut refs = eq_wits.0.iter();
            let first = refs.next().ok_or(ProofSystemError::InvalidStatement)?;
            let value = Self::witness_value(&witnesses, first)?;
            for wr in refs {
                if Self::witness_value(&witnesses, wr)? != value {
                    return Err(ProofSystemError::UnequalWitnessesInEquality(*first, *wr));
                }
            }
            let blinding = eq_wits
                .0
                .iter()
                .find_map(|wr| blindings.get(wr).copied())
                .unwrap_or_else(|| E::ScalarField::rand(rng));
            for wr in eq_wits.0.iter() {
                blindings.insert(*wr, blinding);
            }
        }

        fn build_blindings_map<E: Pairing>(
            blindings: &mut BTreeMap<WitnessRef, E::ScalarField>,
            s_idx: usize,
            wit_idx: impl Iterator<Item = usize>,
        ) -> BTreeMap<usize, E::ScalarField> {
            wit_idx
                .filter_map(|k| blindings.remove(&(s_idx, k)).map(|b| (k, b)))
                .collect()
        }

        let mut sub_protocols =
            Vec::<SubProtocol<E>>::with_capacity(proof_spec.statements.0.len());

        // Challenge contributions from nonce and context come before those of the statements
        let mut challenge_bytes = Vec::new();
        if let Some(n) = nonce.as_ref() {
            challenge_bytes.extend_from_slice(n);
        }
        if let Some(ctx) = &proof_spec.context {
            challenge_bytes.extend_from_slice(ctx);
        }

        macro_rules! accum_protocol_init {
            ($s: ident, $s_idx: ident, $w: ident, $protocol: ident, $protocol_variant: ident) => {{
                let blinding = blindings.remove(&($s_idx, 0));
                let params = $s.get_params(&proof_spec.setup_params)?;
                let pk = $s.get_public_key(&proof_spec.setup_params)?;
                let prk = $s.get_proving_key(&proof_spec.setup_params)?;
                let mut sp = $protocol::new($s_idx, params, pk, prk, $s.accumulator_value);
                sp.init(rng, blinding, &$w)?;
                sp.challenge_contribution(&mut challenge_bytes)?;
                sub_protocols.push(SubProtocol::$protocol_variant(sp));
            }};
        }

        macro_rules! ped_comm_protocol_init {
            ($s: ident, $s_idx: ident, $w: ident, $cm_key_func: ident, $protocol_variant: ident) => {{
                let blindings_map = build_blindings_map::<E>(&mut blindings, $s_idx, 0..$w.len());
                let comm_key = $s.$cm_key_func(&proof_spec.setup_params)?;
                let mut sp = SchnorrProtocol::new($s_idx, comm_key, $s.commitment);
                sp.init(rng, blindings_map, $w)?;
                sp.challenge_contribution(&mut challenge_bytes)?;
                sub_protocols.push(SubProtocol::$protocol_variant(sp));
            }};
        }

        // Initialize sub-protocols for each statement
        for (s_idx, (statement, witness)) in proof_spec
            .statements
            .0
            .iter()
            .zip(witnesses.0.into_iter())
            .enumerate()
        {
            match statement {
                Statement::PoKBBSSignatureG1(s) => match witness {
                    Witness::PoKBBSSignatureG1(w) => {
                        let blindings_map = build_blindings_map::<E>(
                            &mut blindings,
                            s_idx,
                            w.unrevealed_messages.keys().cloned(),
                        );
                        let sig_params = s.get_sig_params(&proof_spec.setup_params)?;
                        let pk = s.get_public_key(&proof_spec.setup_params)?;
                        let mut sp = PoKBBSSigG1SubProtocol::new(
                            s_idx,
                            &s.revealed_messages,
                            sig_params,
                            pk,
                        );
                        sp.init(rng, blindings_map, &w)?;
                        sp.challenge_contribution(&mut challenge_bytes)?;
                        sub_protocols.push(SubProtocol::PoKBBSSignatureG1(sp));
                    }
                    _ => err_incompat_witness!(s_idx, statement, witness),
                },
                Statement::AccumulatorMembership(s) => match witness {
                    Witness::AccumulatorMembership(w) => {
                        accum_protocol_init!(
                            s,
                            s_idx,
                            w,
                            AccumulatorMembershipSubProtocol,
                            AccumulatorMembership
                        )
                    }
                    _ => err_incompat_witness!(s_idx, statement, witness),
                },
                Statement::AccumulatorNonMembership(s) => match witness {
                    Witness::AccumulatorNonMembership(w) => {
                        accum_protocol_init!(
                            s,
                            s_idx,
                            w,
                            AccumulatorNonMembershipSubProtocol,
                            AccumulatorNonMembership
                        )
                    }
                    _ => err_incompat_witness!(s_idx, statement, witness),
                },
                Statement::PedersenCommitment(s) => match witness {
                    Witness::PedersenCommitment(w) => {
                        ped_comm_protocol_init!(s, s_idx, w, get_commitment_key, PoKDiscreteLogs)
                    }
                    _ => err_incompat_witness!(s_idx, statement, witness),
                },
                Statement::PedersenCommitmentG2(s) => match witness {
                    Witness::PedersenCommitmentG2(w) => {
                        ped_comm_protocol_init!(
                            s,
                            s_idx,
                            w,
                            get_commitment_key_g2,
                            PoKDiscreteLogsG2
                        )
                    }
                    _ => err_incompat_witness!(s_idx, statement, witness),
                },
            }
        }

        let challenge = Self::generate_challenge_from_bytes::<D>(&challenge_bytes);

        let statement_proofs = sub_protocols
            .iter_mut()
            .map(|p| p.gen_proof_contribution(&challenge))
            .collect::<Result<Vec<_>, _>>()?;
        end_timer!(proof_time);
        Ok(Self { statement_proofs })
    }

    fn witness_value<'a>(
        witnesses: &'a Witnesses<E>,
        wit_ref: &WitnessRef,
    ) -> Result<&'a E::ScalarField, ProofSystemError> {
        witnesses
            .0
            .get(wit_ref.0)
            .and_then(|w| w.value_at(wit_ref.1))
            .ok_or(ProofSystemError::InvalidWitnessRef(wit_ref.0, wit_ref.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        meta_statement::{EqualWitnesses, MetaStatement, MetaStatements},
        setup_params::SetupParams,
        statement::{ped_comm::PedersenCommitment as PedersenCommitmentStmt, Statements},
    };
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    #[test]
    fn witness_equality_enforced_by_prover() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let bases = (0..3).map(|_| G1Affine::rand(&mut rng)).collect::<Vec<_>>();
        let wits_1 = (0..3).map(|_| Fr::rand(&mut rng)).collect::<Vec<_>>();
        let mut wits_2 = (0..3).map(|_| Fr::rand(&mut rng)).collect::<Vec<_>>();
        wits_2[2] = wits_1[0];

        let comm_1 = PedersenCommitmentStmt::commit(&bases, &wits_1).unwrap();
        let comm_2 = PedersenCommitmentStmt::commit(&bases, &wits_2).unwrap();

        let mut statements = Statements::<Bls12_381>::new();
        statements.add(PedersenCommitmentStmt::new_statement_from_params_ref(
            0, comm_1,
        ));
        statements.add(PedersenCommitmentStmt::new_statement_from_params_ref(
            0, comm_2,
        ));
        let setup_params = vec![SetupParams::PedersenCommitmentKey(bases)];

        let mut meta_statements = MetaStatements::new();
        meta_statements.add(MetaStatement::WitnessEquality(EqualWitnesses(
            [(0, 0), (1, 2)].into_iter().collect(),
        )));
        let spec = ProofSpec::new(statements.clone(), meta_statements, setup_params.clone(), None);

        let mut witnesses = Witnesses::new();
        witnesses.add(Witness::PedersenCommitment(wits_1.clone()));
        witnesses.add(Witness::PedersenCommitment(wits_2.clone()));
        let proof = Proof::new::<_, Blake2b512>(
            &mut rng,
            &spec,
            witnesses.clone(),
            None,
            ProverConfig::default(),
        )
        .unwrap();
        proof.verify::<Blake2b512>(&spec, None).unwrap();

        // Witnesses not equal as required
        let mut meta_statements = MetaStatements::new();
        meta_statements.add(MetaStatement::WitnessEquality(EqualWitnesses(
            [(0, 1), (1, 2)].into_iter().collect(),
        )));
        let spec = ProofSpec::new(statements, meta_statements, setup_params, None);
        assert!(matches!(
            Proof::new::<_, Blake2b512>(
                &mut rng,
                &spec,
                witnesses.clone(),
                None,
                ProverConfig::default()
            ),
            Err(ProofSystemError::UnequalWitnessesInEquality((0, 1), (1, 2)))
        ));

        // Fewer witnesses than statements
        let mut fewer = witnesses.clone();
        fewer.0.pop();
        assert!(matches!(
            Proof::new::<_, Blake2b512>(&mut rng, &spec, fewer, None, ProverConfig::default()),
            Err(ProofSystemError::UnequalWitnessAndStatementCount(2, 1))
        ));

        // Witness of a different kind
        let mut wrong_kind = witnesses;
        wrong_kind.0[1] = Witness::PedersenCommitmentG2(wits_2);
        assert!(matches!(
            Proof::new::<_, Blake2b512>(
                &mut rng,
                &ProofSpec::new(
                    spec.statements.clone(),
                    MetaStatements::new(),
                    spec.setup_params.clone(),
                    None
                ),
                wrong_kind,
                None,
                ProverConfig::default()
            ),
            Err(ProofSystemError::WitnessIncompatibleWithStatement(1, _, _))
        ));
    }
}
