//! Composite proofs over byte buffers.
//!
//! A proof is built from encoded [`Statement`]s, meta statements, setup params and a context which together
//! form the proof spec. The prover additionally gives one witness per statement. Statements can carry their
//! params inline or refer to an entry of the setup params by index, which avoids repeating the same params in
//! several statements. Setup params are encoded uncompressed as they are decoded far more often than created.
//!
//! Building a proof spec checks that every witness equality refers to an existing witness, failing with
//! [`ApiError::InvalidWireReference`] otherwise. References to setup params are checked when the proof is
//! created, failing with [`ApiError::InvalidSetupParamRef`].

use ark_std::{
    collections::{BTreeMap, BTreeSet},
    rand::RngCore,
    vec::Vec,
};
use bbs_plus::prelude::SignatureParamsG1;
use blake2::Blake2b512;
use proof_system::prelude::{
    AccumulatorMembershipStmt, AccumulatorNonMembershipStmt, EqualWitnesses, MetaStatement,
    MetaStatements, PedersenCommitmentStmt, PoKBBSSignatureG1Stmt, Proof, ProofSpec,
    ProverConfig, SetupParams, Statement, Statements, Witness, WitnessRef, Witnesses,
};
use proof_system::witness::{
    Membership as MembershipWit, NonMembership as NonMembershipWit,
    PoKBBSSignatureG1 as PoKBBSSignatureG1Wit,
};
use vb_accumulator::prelude::{
    MembershipProvingKey, MembershipWitness, NonMembershipProvingKey, NonMembershipWitness,
    PublicKey as AccumPublicKey, SetupParams as AccumParams,
};

use crate::{
    accumulator::{ACCUMULATED_LENGTH, MEMBERSHIP_WITNESS_LENGTH, NON_MEMBERSHIP_WITNESS_LENGTH},
    bbs_plus::{public_key_g2_from_bytes, signature_g1_from_bytes},
    error::{ApiError, VerifyResponse},
    util::{
        decode_message_map, fr_from_bytes, fr_vec_from_bytes, obj_from_bytes,
        obj_from_bytes_of_length, obj_from_uncompressed_bytes, obj_to_bytes,
        obj_to_uncompressed_bytes,
    },
    Bls12_381, G1Affine, G2Affine, BLS12381_G1_PUBLIC_KEY_LENGTH,
    BLS12381_G2_PUBLIC_KEY_LENGTH,
};

fn g1_vec_from_bytes(bytes: &[Vec<u8>]) -> Result<Vec<G1Affine>, ApiError> {
    bytes
        .iter()
        .map(|b| obj_from_bytes_of_length(b, BLS12381_G1_PUBLIC_KEY_LENGTH, "G1 element"))
        .collect()
}

fn g2_vec_from_bytes(bytes: &[Vec<u8>]) -> Result<Vec<G2Affine>, ApiError> {
    bytes
        .iter()
        .map(|b| obj_from_bytes_of_length(b, BLS12381_G2_PUBLIC_KEY_LENGTH, "G2 element"))
        .collect()
}

fn accumulated_from_bytes(bytes: &[u8]) -> Result<G1Affine, ApiError> {
    obj_from_bytes_of_length(bytes, ACCUMULATED_LENGTH, "accumulated value")
}

fn accumulator_public_key_from_bytes(bytes: &[u8]) -> Result<AccumPublicKey<Bls12_381>, ApiError> {
    obj_from_bytes_of_length(bytes, BLS12381_G2_PUBLIC_KEY_LENGTH, "public key")
}

fn statement_to_bytes(statement: Statement<Bls12_381>) -> Result<Vec<u8>, ApiError> {
    obj_to_bytes(&statement)
}

fn witness_to_bytes(witness: Witness<Bls12_381>) -> Result<Vec<u8>, ApiError> {
    obj_to_bytes(&witness)
}

/// Statement for proving knowledge of a BBS+ signature in G1 with the given messages revealed
pub fn generate_pok_bbs_sig_statement(
    params: &[u8],
    public_key: &[u8],
    revealed_messages: &BTreeMap<usize, Vec<u8>>,
    encode_messages: bool,
) -> Result<Vec<u8>, ApiError> {
    let params: SignatureParamsG1<Bls12_381> = obj_from_bytes(params)?;
    let pk = public_key_g2_from_bytes(public_key)?;
    let revealed = decode_message_map(revealed_messages, encode_messages)?;
    statement_to_bytes(PoKBBSSignatureG1Stmt::new_statement_from_params(
        params, pk, revealed,
    ))
}

/// Same as [`generate_pok_bbs_sig_statement`] but the params and public key are indices into the
/// setup params
pub fn generate_pok_bbs_sig_statement_from_param_refs(
    params_ref: usize,
    public_key_ref: usize,
    revealed_messages: &BTreeMap<usize, Vec<u8>>,
    encode_messages: bool,
) -> Result<Vec<u8>, ApiError> {
    let revealed = decode_message_map(revealed_messages, encode_messages)?;
    statement_to_bytes(PoKBBSSignatureG1Stmt::new_statement_from_params_ref(
        params_ref,
        public_key_ref,
        revealed,
    ))
}

macro_rules! impl_accumulator_statement_api {
    ($stmt: ident, $prk: ident, $from_params: ident, $from_refs: ident) => {
        pub fn $from_params(
            params: &[u8],
            public_key: &[u8],
            proving_key: &[u8],
            accumulated: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let params: AccumParams<Bls12_381> = obj_from_bytes(params)?;
            let pk = accumulator_public_key_from_bytes(public_key)?;
            let prk: $prk<G1Affine> = obj_from_bytes(proving_key)?;
            let accumulated = accumulated_from_bytes(accumulated)?;
            statement_to_bytes($stmt::new_statement_from_params(params, pk, prk, accumulated))
        }

        pub fn $from_refs(
            params_ref: usize,
            public_key_ref: usize,
            proving_key_ref: usize,
            accumulated: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let accumulated = accumulated_from_bytes(accumulated)?;
            statement_to_bytes($stmt::new_statement_from_params_ref(
                params_ref,
                public_key_ref,
                proving_key_ref,
                accumulated,
            ))
        }
    };
}

impl_accumulator_statement_api!(
    AccumulatorMembershipStmt,
    MembershipProvingKey,
    generate_accumulator_membership_statement,
    generate_accumulator_membership_statement_from_param_refs
);

impl_accumulator_statement_api!(
    AccumulatorNonMembershipStmt,
    NonMembershipProvingKey,
    generate_accumulator_non_membership_statement,
    generate_accumulator_non_membership_statement_from_param_refs
);

/// Statement for proving knowledge of the opening of `commitment` in G1 with the given bases
pub fn generate_pedersen_commitment_g1_statement(
    bases: &[Vec<u8>],
    commitment: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let bases = g1_vec_from_bytes(bases)?;
    let commitment: G1Affine = obj_from_bytes(commitment)?;
    statement_to_bytes(
        PedersenCommitmentStmt::<G1Affine>::new_statement_from_params::<Bls12_381>(
            bases, commitment,
        ),
    )
}

pub fn generate_pedersen_commitment_g1_statement_from_param_refs(
    bases_ref: usize,
    commitment: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let commitment: G1Affine = obj_from_bytes(commitment)?;
    statement_to_bytes(
        PedersenCommitmentStmt::<G1Affine>::new_statement_from_params_ref::<Bls12_381>(
            bases_ref, commitment,
        ),
    )
}

pub fn generate_pedersen_commitment_g2_statement(
    bases: &[Vec<u8>],
    commitment: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let bases = g2_vec_from_bytes(bases)?;
    let commitment: G2Affine = obj_from_bytes(commitment)?;
    statement_to_bytes(
        PedersenCommitmentStmt::<G2Affine>::new_statement_from_params_g2::<Bls12_381>(
            bases, commitment,
        ),
    )
}

pub fn generate_pedersen_commitment_g2_statement_from_param_refs(
    bases_ref: usize,
    commitment: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let commitment: G2Affine = obj_from_bytes(commitment)?;
    statement_to_bytes(
        PedersenCommitmentStmt::<G2Affine>::new_statement_from_params_ref_g2::<Bls12_381>(
            bases_ref, commitment,
        ),
    )
}

/// Commit to `scalars` with `bases` in G1. Both must have the same length
pub fn generate_pedersen_commitment_g1(
    bases: &[Vec<u8>],
    scalars: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    let bases = g1_vec_from_bytes(bases)?;
    let scalars = fr_vec_from_bytes(scalars)?;
    obj_to_bytes(&PedersenCommitmentStmt::<G1Affine>::commit(&bases, &scalars)?)
}

pub fn generate_pedersen_commitment_g2(
    bases: &[Vec<u8>],
    scalars: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    let bases = g2_vec_from_bytes(bases)?;
    let scalars = fr_vec_from_bytes(scalars)?;
    obj_to_bytes(&PedersenCommitmentStmt::<G2Affine>::commit(&bases, &scalars)?)
}

fn setup_param_to_bytes(param: SetupParams<Bls12_381>) -> Result<Vec<u8>, ApiError> {
    obj_to_uncompressed_bytes(&param)
}

pub fn generate_setup_param_for_bbs_signature_params_g1(
    params: &[u8],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::BBSPlusSignatureParams(obj_from_bytes(params)?))
}

pub fn generate_setup_param_for_bbs_public_key_g2(public_key: &[u8]) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::BBSPlusPublicKey(public_key_g2_from_bytes(
        public_key,
    )?))
}

pub fn generate_setup_param_for_accumulator_params(params: &[u8]) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::VbAccumulatorParams(obj_from_bytes(params)?))
}

pub fn generate_setup_param_for_accumulator_public_key(
    public_key: &[u8],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::VbAccumulatorPublicKey(
        accumulator_public_key_from_bytes(public_key)?,
    ))
}

pub fn generate_setup_param_for_membership_proving_key(
    proving_key: &[u8],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::VbAccumulatorMemProvingKey(obj_from_bytes(
        proving_key,
    )?))
}

pub fn generate_setup_param_for_non_membership_proving_key(
    proving_key: &[u8],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::VbAccumulatorNonMemProvingKey(obj_from_bytes(
        proving_key,
    )?))
}

pub fn generate_setup_param_for_pedersen_commitment_key_g1(
    bases: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::PedersenCommitmentKey(g1_vec_from_bytes(bases)?))
}

pub fn generate_setup_param_for_pedersen_commitment_key_g2(
    bases: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::PedersenCommitmentKeyG2(g2_vec_from_bytes(
        bases,
    )?))
}

/// Arbitrary bytes as a setup param. No current statement uses them.
pub fn generate_setup_param_for_bytes(bytes: Vec<u8>) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::Bytes(bytes))
}

pub fn generate_setup_param_for_field_elem_vec(
    elements: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    setup_param_to_bytes(SetupParams::FieldElemVec(fr_vec_from_bytes(elements)?))
}

/// Meta statement that the referenced witnesses are equal. Each reference is a pair of statement index and
/// witness index in that statement. Needs at least 2 references.
pub fn generate_witness_equality_meta_statement(
    equality: BTreeSet<WitnessRef>,
) -> Result<Vec<u8>, ApiError> {
    if equality.len() < 2 {
        return Err(ApiError::InvalidInput(
            "witness equality needs at least 2 witnesses".to_string(),
        ));
    }
    obj_to_bytes(&MetaStatement::WitnessEquality(EqualWitnesses(equality)))
}

/// Witness for a BBS+ signature in G1. `unrevealed_messages` maps message index to message and must contain
/// every message not revealed in the corresponding statement.
pub fn generate_pok_bbs_sig_witness(
    signature: &[u8],
    unrevealed_messages: &BTreeMap<usize, Vec<u8>>,
    encode_messages: bool,
) -> Result<Vec<u8>, ApiError> {
    let sig = signature_g1_from_bytes(signature)?;
    let unrevealed = decode_message_map(unrevealed_messages, encode_messages)?;
    witness_to_bytes(PoKBBSSignatureG1Wit::new_as_witness(sig, unrevealed))
}

pub fn generate_accumulator_membership_witness(
    element: &[u8],
    witness: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let element = fr_from_bytes(element)?;
    let witness: MembershipWitness<G1Affine> =
        obj_from_bytes_of_length(witness, MEMBERSHIP_WITNESS_LENGTH, "membership witness")?;
    witness_to_bytes(MembershipWit::new_as_witness(element, witness))
}

pub fn generate_accumulator_non_membership_witness(
    element: &[u8],
    witness: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let element = fr_from_bytes(element)?;
    let witness: NonMembershipWitness<G1Affine> = obj_from_bytes_of_length(
        witness,
        NON_MEMBERSHIP_WITNESS_LENGTH,
        "non-membership witness",
    )?;
    witness_to_bytes(NonMembershipWit::new_as_witness(element, witness))
}

pub fn generate_pedersen_commitment_g1_witness(elements: &[Vec<u8>]) -> Result<Vec<u8>, ApiError> {
    witness_to_bytes(Witness::PedersenCommitment(fr_vec_from_bytes(elements)?))
}

pub fn generate_pedersen_commitment_g2_witness(elements: &[Vec<u8>]) -> Result<Vec<u8>, ApiError> {
    witness_to_bytes(Witness::PedersenCommitmentG2(fr_vec_from_bytes(elements)?))
}

/// Build the proof spec. Fails if a witness equality refers to a statement or witness that doesn't exist.
pub fn generate_proof_spec(
    statements: &[Vec<u8>],
    meta_statements: &[Vec<u8>],
    setup_params: &[Vec<u8>],
    context: Option<Vec<u8>>,
) -> Result<Vec<u8>, ApiError> {
    let statements = Statements(
        statements
            .iter()
            .map(|s| obj_from_bytes::<Statement<Bls12_381>>(s))
            .collect::<Result<Vec<_>, _>>()?,
    );
    let meta_statements = MetaStatements(
        meta_statements
            .iter()
            .map(|m| obj_from_bytes::<MetaStatement>(m))
            .collect::<Result<Vec<_>, _>>()?,
    );
    let setup_params = setup_params
        .iter()
        .map(|p| obj_from_uncompressed_bytes::<SetupParams<Bls12_381>>(p))
        .collect::<Result<Vec<_>, _>>()?;
    let spec = ProofSpec::new(statements, meta_statements, setup_params, context);
    spec.validate_meta_statements()?;
    obj_to_bytes(&spec)
}

fn decode_proof_spec(proof_spec: &[u8]) -> Result<ProofSpec<Bls12_381>, ApiError> {
    obj_from_bytes(proof_spec)
}

fn decode_witnesses(witnesses: &[Vec<u8>]) -> Result<Witnesses<Bls12_381>, ApiError> {
    Ok(Witnesses(
        witnesses
            .iter()
            .map(|w| obj_from_bytes::<Witness<Bls12_381>>(w))
            .collect::<Result<Vec<_>, _>>()?,
    ))
}

/// Create a proof for the proof spec with one witness per statement, in the order of statements.
/// `nonce` must be given to the verifier as well.
pub fn generate_composite_proof<R: RngCore>(
    rng: &mut R,
    proof_spec: &[u8],
    witnesses: &[Vec<u8>],
    nonce: Option<Vec<u8>>,
) -> Result<Vec<u8>, ApiError> {
    generate_composite_proof_with_blindings(rng, proof_spec, witnesses, &BTreeMap::new(), nonce)
}

/// Same as [`generate_composite_proof`] but uses the given blinding for the referenced witnesses. Used when
/// the prover has already committed to a witness with that blinding, like when requesting a blind signature.
pub fn generate_composite_proof_with_blindings<R: RngCore>(
    rng: &mut R,
    proof_spec: &[u8],
    witnesses: &[Vec<u8>],
    blindings: &BTreeMap<WitnessRef, Vec<u8>>,
    nonce: Option<Vec<u8>>,
) -> Result<Vec<u8>, ApiError> {
    let spec = decode_proof_spec(proof_spec)?;
    let witnesses = decode_witnesses(witnesses)?;
    let blindings = blindings
        .iter()
        .map(|(r, b)| Ok((*r, fr_from_bytes(b)?)))
        .collect::<Result<BTreeMap<_, _>, ApiError>>()?;
    let proof = Proof::new::<R, Blake2b512>(
        rng,
        &spec,
        witnesses,
        nonce,
        ProverConfig::with_blindings(blindings),
    )?;
    obj_to_bytes(&proof)
}

/// Never fails. Any malformed input or invalid proof spec gives `verified = false`.
pub fn verify_composite_proof(
    proof: &[u8],
    proof_spec: &[u8],
    nonce: Option<Vec<u8>>,
) -> VerifyResponse {
    let proof: Proof<Bls12_381> = try_or_fail!(obj_from_bytes(proof));
    let spec = try_or_fail!(decode_proof_spec(proof_spec));
    proof.verify::<Blake2b512>(&spec, nonce).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbs_plus::{generate_keypair_g2, generate_signature_params_g1, sign_g1};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn setup_param_kinds() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = generate_signature_params_g1(&mut rng, 3, None).unwrap();
        let keypair = generate_keypair_g2(&mut rng, &params, None).unwrap();

        let sp = generate_setup_param_for_bbs_signature_params_g1(&params).unwrap();
        let decoded: SetupParams<Bls12_381> = obj_from_uncompressed_bytes(&sp).unwrap();
        assert_eq!(decoded.kind(), "BBSPlusSignatureParams");
        let sp = generate_setup_param_for_bbs_public_key_g2(&keypair.public_key).unwrap();
        let decoded: SetupParams<Bls12_381> = obj_from_uncompressed_bytes(&sp).unwrap();
        assert_eq!(decoded.kind(), "BBSPlusPublicKey");
        let sp = generate_setup_param_for_bytes(vec![1, 2, 3]).unwrap();
        let decoded: SetupParams<Bls12_381> = obj_from_uncompressed_bytes(&sp).unwrap();
        assert_eq!(decoded, SetupParams::Bytes(vec![1, 2, 3]));

        assert!(matches!(
            generate_setup_param_for_bbs_public_key_g2(&keypair.public_key[..90]),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_witness_equality_meta_statement([(0, 1)].into_iter().collect()),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn single_bbs_statement() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = generate_signature_params_g1(&mut rng, 4, None).unwrap();
        let keypair = generate_keypair_g2(&mut rng, &params, None).unwrap();
        let messages = vec![
            b"name".to_vec(),
            b"city".to_vec(),
            b"age".to_vec(),
            b"id".to_vec(),
        ];
        let sig = sign_g1(&mut rng, &messages, &keypair.secret_key, &params, true).unwrap();

        let mut revealed = BTreeMap::new();
        revealed.insert(1, messages[1].clone());
        let mut unrevealed = BTreeMap::new();
        for i in [0, 2, 3] {
            unrevealed.insert(i, messages[i].clone());
        }
        let statement =
            generate_pok_bbs_sig_statement(&params, &keypair.public_key, &revealed, true).unwrap();
        let witness = generate_pok_bbs_sig_witness(&sig, &unrevealed, true).unwrap();
        let spec = generate_proof_spec(&[statement], &[], &[], Some(b"ctx".to_vec())).unwrap();

        let nonce = Some(b"nonce".to_vec());
        let proof = generate_composite_proof(&mut rng, &spec, &[witness], nonce.clone()).unwrap();
        assert!(verify_composite_proof(&proof, &spec, nonce).verified);
        assert!(!verify_composite_proof(&proof, &spec, Some(b"other".to_vec())).verified);
        assert!(!verify_composite_proof(&proof, &spec, None).verified);

        let resp = verify_composite_proof(&proof[1..], &spec, None);
        assert!(!resp.verified);
        assert!(resp.error.is_some());
    }
}
