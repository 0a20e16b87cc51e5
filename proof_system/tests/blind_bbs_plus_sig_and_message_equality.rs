use ark_bls12_381::{Bls12_381, Fr};
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use bbs_plus::prelude::SignatureG1;
use blake2::Blake2b512;
use proof_system::prelude::{
    EqualWitnesses, MetaStatements, PedersenCommitmentStmt, PoKBBSSignatureG1 as PoKSignatureBBSG1Wit,
    PoKBBSSignatureG1Stmt, Proof, ProofSpec, ProofSystemError, ProverConfig, Statements, Witness,
    WitnessRef, Witnesses,
};
use test_utils::{bbs_plus::sig_setup, test_serialization};

#[test]
fn requesting_partially_blind_bbs_plus_sig_with_equality() {
    // A holder has a credential from issuer 1 and requests a credential from issuer 2 where one of the
    // messages, hidden from issuer 2, is the same as a message in the first credential. The request proves
    // knowledge of the committed messages and also that the committed message equals the one signed by
    // issuer 1.
    let mut rng = StdRng::seed_from_u64(0u64);
    let msg_count = 5;
    let (msgs_1, sig_params_1, keypair_1, sig_1) = sig_setup(&mut rng, msg_count);
    let (mut msgs_2, sig_params_2, keypair_2, _) = sig_setup(&mut rng, msg_count);
    msgs_2[2] = msgs_1[4];

    // Message indices hidden from issuer 2
    let committed_indices = [0, 2].into_iter().collect::<BTreeSet<usize>>();
    let blinding = Fr::rand(&mut rng);
    let committed_messages = committed_indices
        .iter()
        .map(|i| (*i, &msgs_2[*i]))
        .collect::<BTreeMap<_, _>>();
    let commitment = sig_params_2
        .commit_to_messages(committed_messages, &blinding)
        .unwrap();

    // Commitment bases are `h_0` for the blinding followed by `h_i` of the committed messages
    let mut bases = vec![sig_params_2.h_0];
    let mut committed = vec![blinding];
    for i in committed_indices.iter() {
        bases.push(sig_params_2.h[*i]);
        committed.push(msgs_2[*i]);
    }

    let revealed_1 = BTreeMap::from([(0, msgs_1[0])]);
    let mut statements = Statements::<Bls12_381>::new();
    statements.add(PoKBBSSignatureG1Stmt::new_statement_from_params(
        sig_params_1.clone(),
        keypair_1.public_key.clone(),
        revealed_1,
    ));
    statements.add(PedersenCommitmentStmt::new_statement_from_params(
        bases, commitment,
    ));

    // Message 4 of the first credential is at position 2 in the commitment, after the blinding and message 0
    let mut meta_statements = MetaStatements::new();
    meta_statements.add_witness_equality(EqualWitnesses(
        vec![(0, 4), (1, 2)].into_iter().collect::<BTreeSet<WitnessRef>>(),
    ));

    let context = Some(b"blind issuance request".to_vec());
    let proof_spec = ProofSpec::new(statements, meta_statements, vec![], context);
    proof_spec.validate().unwrap();

    let mut witnesses = Witnesses::new();
    witnesses.add(PoKSignatureBBSG1Wit::new_as_witness(
        sig_1,
        (1..msg_count).map(|i| (i, msgs_1[i])).collect(),
    ));
    witnesses.add(Witness::PedersenCommitment(committed));
    test_serialization!(Witnesses<Bls12_381>, witnesses);

    let nonce = Some(b"issuer nonce".to_vec());
    let proof = Proof::new::<StdRng, Blake2b512>(
        &mut rng,
        &proof_spec,
        witnesses,
        nonce.clone(),
        ProverConfig::default(),
    )
    .unwrap();
    test_serialization!(Proof<Bls12_381>, proof);
    proof.verify::<Blake2b512>(&proof_spec, nonce).unwrap();

    // Issuer 2 signs over the commitment and the messages it knows
    let uncommitted_messages = (0..msg_count)
        .filter(|i| !committed_indices.contains(i))
        .map(|i| (i, &msgs_2[i]))
        .collect::<BTreeMap<_, _>>();
    let blinded_sig = SignatureG1::<Bls12_381>::new_with_committed_messages(
        &mut rng,
        &commitment,
        uncommitted_messages,
        &keypair_2.secret_key,
        &sig_params_2,
    )
    .unwrap();
    // Blinded signature does not verify before unblinding
    assert!(blinded_sig
        .verify(&msgs_2, &keypair_2.public_key, &sig_params_2)
        .is_err());
    let sig_2 = blinded_sig.unblind(&blinding);
    sig_2
        .verify(&msgs_2, &keypair_2.public_key, &sig_params_2)
        .unwrap();
}

#[test]
fn blind_bbs_plus_sig_and_message_equality() {
    // Two issuers sign credentials with one message blinded by the holder. The holder unblinds both and
    // proves knowledge of both signatures and equality of the blinded messages. When the blinded
    // messages differ, the prover refuses to create the proof.
    blind_bbs_plus_sig_and_message_equality_aux(true).unwrap();
    assert!(matches!(
        blind_bbs_plus_sig_and_message_equality_aux(false),
        Err(ProofSystemError::UnequalWitnessesInEquality((0, 1), (1, 1)))
    ));
}

#[cfg_attr(rustfmt, rustfmt_skip)]
fn blind_bbs_plus_sig_and_message_equality_aux(eq: bool) -> Result<(), ProofSystemError> {
    let mut rng = StdRng::seed_from_u64(0u64);
    let total_msg_count = 4;
    let (    msgs_1, sig_params_1, sig_keypair_1, _) = sig_setup(&mut rng, total_msg_count);
    let (mut msgs_2, sig_params_2, sig_keypair_2, _) = sig_setup(&mut rng, total_msg_count);

    let blinding_1 = Fr::rand(&mut rng);
    let committed_messages_1   = BTreeMap::from([                (1, &msgs_1[1])]);
    let uncommitted_messages_1 = BTreeMap::from([(0, &msgs_1[0]),                  (2, &msgs_1[2]), (3, &msgs_1[3])]);
    let commitment_1 = sig_params_1.commit_to_messages(committed_messages_1.clone(), &blinding_1).unwrap();

    if eq {
        msgs_2[1] = msgs_1[1];
    }
    let blinding_2 = Fr::rand(&mut rng);
    let committed_messages_2   = BTreeMap::from([                (1, &msgs_2[1])]);
    let uncommitted_messages_2 = BTreeMap::from([(0, &msgs_2[0]),                  (2, &msgs_2[2]), (3, &msgs_2[3])]);
    let commitment_2 = sig_params_2.commit_to_messages(committed_messages_2.clone(), &blinding_2).unwrap();

    let blinded_sig_1 = SignatureG1::<Bls12_381>::new_with_committed_messages(
        &mut rng, &commitment_1, uncommitted_messages_1.clone(), &sig_keypair_1.secret_key, &sig_params_1,
    ).unwrap();
    let blinded_sig_2 = SignatureG1::<Bls12_381>::new_with_committed_messages(
        &mut rng, &commitment_2, uncommitted_messages_2.clone(), &sig_keypair_2.secret_key, &sig_params_2,
    ).unwrap();

    let sig_1 = blinded_sig_1.unblind(&blinding_1);
    sig_1.verify(&msgs_1, &sig_keypair_1.public_key, &sig_params_1).unwrap();
    let sig_2 = blinded_sig_2.unblind(&blinding_2);
    sig_2.verify(&msgs_2, &sig_keypair_2.public_key, &sig_params_2).unwrap();

    let revealed_messages_1 = uncommitted_messages_1.into_iter().map(|(i, m)| (i, *m)).collect::<BTreeMap<_, _>>();
    let revealed_messages_2 = uncommitted_messages_2.into_iter().map(|(i, m)| (i, *m)).collect::<BTreeMap<_, _>>();

    let mut statements = Statements::<Bls12_381>::new();
    statements.add(PoKBBSSignatureG1Stmt::new_statement_from_params(
        sig_params_1, sig_keypair_1.public_key.clone(), revealed_messages_1));
    statements.add(PoKBBSSignatureG1Stmt::new_statement_from_params(
        sig_params_2, sig_keypair_2.public_key.clone(), revealed_messages_2));

    let mut meta_statements = MetaStatements::new();
    // 0th statement's 1st witness is equal to 1st statement's 1st witness
    meta_statements.add_witness_equality(EqualWitnesses(
        vec![(0, 1), (1, 1)].into_iter().collect::<BTreeSet<WitnessRef>>(),
    ));

    let context = Some(b"test_context".to_vec());
    let proof_spec = ProofSpec::new(statements, meta_statements, vec![], context);
    proof_spec.validate()?;

    let mut witnesses = Witnesses::new();
    let unrevealed_messages_1 = committed_messages_1.into_iter().map(|(i, m)| (i, *m)).collect::<BTreeMap<_, _>>();
    witnesses.add(PoKSignatureBBSG1Wit::new_as_witness(sig_1, unrevealed_messages_1));
    let unrevealed_messages_2 = committed_messages_2.into_iter().map(|(i, m)| (i, *m)).collect::<BTreeMap<_, _>>();
    witnesses.add(PoKSignatureBBSG1Wit::new_as_witness(sig_2, unrevealed_messages_2));

    let nonce = Some(b"test nonce".to_vec());
    let proof = Proof::new::<StdRng, Blake2b512>(
        &mut rng, &proof_spec, witnesses, nonce.clone(), ProverConfig::default(),
    )?;
    proof.verify::<Blake2b512>(&proof_spec, nonce)
}
