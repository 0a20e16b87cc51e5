//! BBS+ signatures over byte buffers. Functions come in pairs, the `g1` functions use signature params
//! in G1 with public keys in G2 and the `g2` functions use signature params in G2 with public keys in G1.
//! The proof of knowledge of a signature is available for signatures in G1 only.
//!
//! Messages are passed as arbitrary bytes and hashed to field elements when `encode` is true, otherwise
//! each message must already be a field element of [`FIELD_ELEMENT_LENGTH`](crate::FIELD_ELEMENT_LENGTH) bytes.

use ark_std::{
    collections::{BTreeMap, BTreeSet},
    rand::RngCore,
    vec,
    vec::Vec,
};
use bbs_plus::prelude::{
    KeypairG1, KeypairG2, PoKOfSignatureG1Proof, PoKOfSignatureG1Protocol, PublicKeyG1,
    PublicKeyG2, SecretKey, SignatureG1, SignatureG2, SignatureParamsG1, SignatureParamsG2,
};
use blake2::Blake2b512;
use credential_utils::signature::MultiMessageSignatureParams;

use crate::{
    error::{ApiError, VerifyResponse},
    util::{
        decode_message_map, decode_messages, fr_from_bytes, fr_map_from_bytes, fr_to_bytes,
        obj_from_bytes, obj_from_bytes_of_length, obj_to_bytes,
    },
    Bls12_381, Fr, G1Affine, G2Affine, KeypairBytes, BBS_SIGNATURE_G2_LENGTH,
    BBS_SIGNATURE_LENGTH, BLS12381_G1_PUBLIC_KEY_LENGTH, BLS12381_G2_PUBLIC_KEY_LENGTH,
    BLS12381_PRIVATE_KEY_LENGTH,
};

/// Generate a signing key, from `seed` when given and from randomness otherwise. The same key works
/// with params in G1 and in G2.
pub fn generate_signing_key<R: RngCore>(
    rng: &mut R,
    seed: Option<&[u8]>,
) -> Result<Vec<u8>, ApiError> {
    let sk = match seed {
        Some(seed) => SecretKey::<Fr>::generate_using_seed(seed),
        None => SecretKey::<Fr>::generate_using_rng(rng),
    };
    obj_to_bytes(&sk)
}

pub(crate) fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey<Fr>, ApiError> {
    obj_from_bytes_of_length(bytes, BLS12381_PRIVATE_KEY_LENGTH, "secret key")
}

fn check_message_count(count: usize) -> Result<(), ApiError> {
    if count == 0 {
        return Err(ApiError::InvalidInput(
            "params must support at least 1 message".to_string(),
        ));
    }
    Ok(())
}

macro_rules! impl_bbs_plus_api {
    (
        $params: ident, $pk: ident, $keypair: ident, $sig: ident, $sig_group: ident,
        $pk_len: expr, $sig_len: expr, $comm_len: expr,
        $gen_params: ident, $params_valid: ident, $max_msgs: ident, $extend_params: ident,
        $gen_pk: ident, $pk_valid: ident, $gen_keypair: ident, $bases: ident,
        $sign: ident, $verify: ident, $commit: ident, $blind_sign: ident, $unblind: ident
    ) => {
        /// Generate params for `message_count` messages. With a label, the params are derived from it
        /// deterministically, otherwise they are random.
        pub fn $gen_params<R: RngCore>(
            rng: &mut R,
            message_count: usize,
            label: Option<&[u8]>,
        ) -> Result<Vec<u8>, ApiError> {
            check_message_count(message_count)?;
            let params = match label {
                Some(label) => $params::<Bls12_381>::new::<Blake2b512>(label, message_count),
                None => $params::<Bls12_381>::generate_using_rng(rng, message_count),
            };
            obj_to_bytes(&params)
        }

        pub fn $params_valid(params: &[u8]) -> Result<bool, ApiError> {
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            Ok(params.is_valid())
        }

        /// Number of messages the params can sign
        pub fn $max_msgs(params: &[u8]) -> Result<usize, ApiError> {
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            Ok(params.supported_message_count())
        }

        /// Extend the params to support `new_count` messages. The new generators are derived from `label`
        /// and the existing ones are unchanged.
        pub fn $extend_params(
            params: &[u8],
            label: &[u8],
            new_count: usize,
        ) -> Result<Vec<u8>, ApiError> {
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            obj_to_bytes(&params.extend_for_message_count::<Blake2b512>(label, new_count)?)
        }

        pub fn $gen_pk(secret_key: &[u8], params: &[u8]) -> Result<Vec<u8>, ApiError> {
            let sk = secret_key_from_bytes(secret_key)?;
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            obj_to_bytes(&$pk::generate_using_secret_key(&sk, &params))
        }

        pub fn $pk_valid(public_key: &[u8]) -> Result<bool, ApiError> {
            let pk: $pk<Bls12_381> = obj_from_bytes_of_length(public_key, $pk_len, "public key")?;
            Ok(pk.is_valid())
        }

        pub fn $gen_keypair<R: RngCore>(
            rng: &mut R,
            params: &[u8],
            seed: Option<&[u8]>,
        ) -> Result<KeypairBytes, ApiError> {
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            let keypair = match seed {
                Some(seed) => $keypair::generate_using_seed(seed, &params),
                None => $keypair::generate_using_rng(rng, &params),
            };
            Ok(KeypairBytes {
                secret_key: obj_to_bytes(&keypair.secret_key)?,
                public_key: obj_to_bytes(&keypair.public_key)?,
            })
        }

        /// Bases to commit to the messages at `indices` before requesting a blind signature. The first base
        /// is for the blinding followed by one per index in increasing order.
        pub fn $bases(params: &[u8], indices: &BTreeSet<usize>) -> Result<Vec<Vec<u8>>, ApiError> {
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            params
                .bases_for_commitment(indices)?
                .iter()
                .map(obj_to_bytes)
                .collect()
        }

        pub fn $sign<R: RngCore>(
            rng: &mut R,
            messages: &[Vec<u8>],
            secret_key: &[u8],
            params: &[u8],
            encode: bool,
        ) -> Result<Vec<u8>, ApiError> {
            let sk = secret_key_from_bytes(secret_key)?;
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            let messages = decode_messages(messages, encode)?;
            obj_to_bytes(&$sig::<Bls12_381>::new(rng, &messages, &sk, &params)?)
        }

        pub fn $verify(
            messages: &[Vec<u8>],
            signature: &[u8],
            public_key: &[u8],
            params: &[u8],
            encode: bool,
        ) -> VerifyResponse {
            let sig: $sig<Bls12_381> =
                try_or_fail!(obj_from_bytes_of_length(signature, $sig_len, "signature"));
            let pk: $pk<Bls12_381> =
                try_or_fail!(obj_from_bytes_of_length(public_key, $pk_len, "public key"));
            let params: $params<Bls12_381> = try_or_fail!(obj_from_bytes(params));
            let messages = try_or_fail!(decode_messages(messages, encode));
            sig.verify(&messages, &pk, &params).into()
        }

        /// Commitment to the given messages, as `h_0 * blinding + sum(h_i * m_i)`
        pub fn $commit(
            messages: &BTreeMap<usize, Vec<u8>>,
            blinding: &[u8],
            params: &[u8],
            encode: bool,
        ) -> Result<Vec<u8>, ApiError> {
            let messages = decode_message_map(messages, encode)?;
            let blinding = fr_from_bytes(blinding)?;
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            let commitment =
                params.commit_to_messages(messages.iter().map(|(i, m)| (*i, m)).collect(), &blinding)?;
            obj_to_bytes(&commitment)
        }

        /// Sign the uncommitted messages and the commitment. The result must be unblinded by the requester.
        pub fn $blind_sign<R: RngCore>(
            rng: &mut R,
            commitment: &[u8],
            uncommitted_messages: &BTreeMap<usize, Vec<u8>>,
            secret_key: &[u8],
            params: &[u8],
            encode: bool,
        ) -> Result<Vec<u8>, ApiError> {
            let commitment: $sig_group =
                obj_from_bytes_of_length(commitment, $comm_len, "commitment")?;
            let messages = decode_message_map(uncommitted_messages, encode)?;
            let sk = secret_key_from_bytes(secret_key)?;
            let params: $params<Bls12_381> = obj_from_bytes(params)?;
            let sig = $sig::<Bls12_381>::new_with_committed_messages(
                rng,
                &commitment,
                messages.iter().map(|(i, m)| (*i, m)).collect(),
                &sk,
                &params,
            )?;
            obj_to_bytes(&sig)
        }

        pub fn $unblind(blind_signature: &[u8], blinding: &[u8]) -> Result<Vec<u8>, ApiError> {
            let sig: $sig<Bls12_381> =
                obj_from_bytes_of_length(blind_signature, $sig_len, "signature")?;
            let blinding = fr_from_bytes(blinding)?;
            obj_to_bytes(&sig.unblind(&blinding))
        }
    };
}

impl_bbs_plus_api!(
    SignatureParamsG1,
    PublicKeyG2,
    KeypairG2,
    SignatureG1,
    G1Affine,
    BLS12381_G2_PUBLIC_KEY_LENGTH,
    BBS_SIGNATURE_LENGTH,
    BLS12381_G1_PUBLIC_KEY_LENGTH,
    generate_signature_params_g1,
    is_signature_params_g1_valid,
    signature_params_g1_max_supported_msgs,
    extend_signature_params_g1,
    generate_public_key_g2,
    is_public_key_g2_valid,
    generate_keypair_g2,
    get_bases_for_commitment_g1,
    sign_g1,
    verify_g1,
    commit_messages_in_g1,
    blind_sign_g1,
    unblind_signature_g1
);

impl_bbs_plus_api!(
    SignatureParamsG2,
    PublicKeyG1,
    KeypairG1,
    SignatureG2,
    G2Affine,
    BLS12381_G1_PUBLIC_KEY_LENGTH,
    BBS_SIGNATURE_G2_LENGTH,
    BLS12381_G2_PUBLIC_KEY_LENGTH,
    generate_signature_params_g2,
    is_signature_params_g2_valid,
    signature_params_g2_max_supported_msgs,
    extend_signature_params_g2,
    generate_public_key_g1,
    is_public_key_g1_valid,
    generate_keypair_g1,
    get_bases_for_commitment_g2,
    sign_g2,
    verify_g2,
    commit_messages_in_g2,
    blind_sign_g2,
    unblind_signature_g2
);

pub(crate) fn signature_g1_from_bytes(bytes: &[u8]) -> Result<SignatureG1<Bls12_381>, ApiError> {
    obj_from_bytes_of_length(bytes, BBS_SIGNATURE_LENGTH, "signature")
}

pub(crate) fn public_key_g2_from_bytes(bytes: &[u8]) -> Result<PublicKeyG2<Bls12_381>, ApiError> {
    obj_from_bytes_of_length(bytes, BLS12381_G2_PUBLIC_KEY_LENGTH, "public key")
}

/// Start the proof of knowledge of a signature in G1. `blindings` are field elements to use as randomness
/// for the given unrevealed messages, random ones are used for the rest. Returns the protocol state which
/// must be kept by the prover until [`gen_proof_of_knowledge_of_signature`].
pub fn initialize_proof_of_knowledge_of_signature<R: RngCore>(
    rng: &mut R,
    signature: &[u8],
    params: &[u8],
    messages: &[Vec<u8>],
    blindings: &BTreeMap<usize, Vec<u8>>,
    revealed_indices: &BTreeSet<usize>,
    encode: bool,
) -> Result<Vec<u8>, ApiError> {
    let sig = signature_g1_from_bytes(signature)?;
    let params: SignatureParamsG1<Bls12_381> = obj_from_bytes(params)?;
    let messages = decode_messages(messages, encode)?;
    let blindings = fr_map_from_bytes(blindings)?;
    let protocol = PoKOfSignatureG1Protocol::init(
        rng,
        &sig,
        &params,
        &messages,
        blindings,
        revealed_indices,
    )?;
    obj_to_bytes(&protocol)
}

pub fn challenge_contribution_from_protocol(
    protocol: &[u8],
    revealed_messages: &BTreeMap<usize, Vec<u8>>,
    params: &[u8],
    encode: bool,
) -> Result<Vec<u8>, ApiError> {
    let protocol: PoKOfSignatureG1Protocol<Bls12_381> = obj_from_bytes(protocol)?;
    let revealed = decode_message_map(revealed_messages, encode)?;
    let params: SignatureParamsG1<Bls12_381> = obj_from_bytes(params)?;
    let mut bytes = vec![];
    protocol.challenge_contribution(&revealed, &params, &mut bytes)?;
    Ok(bytes)
}

pub fn gen_proof_of_knowledge_of_signature(
    protocol: &[u8],
    challenge: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let protocol: PoKOfSignatureG1Protocol<Bls12_381> = obj_from_bytes(protocol)?;
    let challenge = fr_from_bytes(challenge)?;
    obj_to_bytes(&protocol.gen_proof(&challenge)?)
}

pub fn challenge_contribution_from_proof(
    proof: &[u8],
    revealed_messages: &BTreeMap<usize, Vec<u8>>,
    params: &[u8],
    encode: bool,
) -> Result<Vec<u8>, ApiError> {
    let proof: PoKOfSignatureG1Proof<Bls12_381> = obj_from_bytes(proof)?;
    let revealed = decode_message_map(revealed_messages, encode)?;
    let params: SignatureParamsG1<Bls12_381> = obj_from_bytes(params)?;
    let mut bytes = vec![];
    proof.challenge_contribution(&revealed, &params, &mut bytes)?;
    Ok(bytes)
}

pub fn verify_proof_of_knowledge_of_signature(
    proof: &[u8],
    revealed_messages: &BTreeMap<usize, Vec<u8>>,
    challenge: &[u8],
    public_key: &[u8],
    params: &[u8],
    encode: bool,
) -> VerifyResponse {
    let proof: PoKOfSignatureG1Proof<Bls12_381> = try_or_fail!(obj_from_bytes(proof));
    let revealed = try_or_fail!(decode_message_map(revealed_messages, encode));
    let challenge = try_or_fail!(fr_from_bytes(challenge));
    let pk = try_or_fail!(public_key_g2_from_bytes(public_key));
    let params: SignatureParamsG1<Bls12_381> = try_or_fail!(obj_from_bytes(params));
    proof.verify(&revealed, &challenge, &pk, &params).into()
}

/// Response of the proof for the unrevealed message at `index`. Equal for messages proven equal
/// across proofs sharing the challenge and blindings.
pub fn get_response_for_message(
    proof: &[u8],
    index: usize,
    revealed_indices: &BTreeSet<usize>,
) -> Result<Vec<u8>, ApiError> {
    let proof: PoKOfSignatureG1Proof<Bls12_381> = obj_from_bytes(proof)?;
    fr_to_bytes(proof.get_resp_for_message(index, revealed_indices)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{generate_challenge_from_bytes, generate_random_field_element};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn keys_and_params() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let sk = generate_signing_key(&mut rng, Some(b"seed")).unwrap();
        assert_eq!(sk.len(), BLS12381_PRIVATE_KEY_LENGTH);
        assert_eq!(sk, generate_signing_key(&mut rng, Some(b"seed")).unwrap());

        let params_g1 = generate_signature_params_g1(&mut rng, 4, Some(b"label")).unwrap();
        assert_eq!(
            params_g1,
            generate_signature_params_g1(&mut rng, 4, Some(b"label")).unwrap()
        );
        assert!(is_signature_params_g1_valid(&params_g1).unwrap());
        assert_eq!(signature_params_g1_max_supported_msgs(&params_g1).unwrap(), 4);
        assert!(matches!(
            generate_signature_params_g1(&mut rng, 0, None),
            Err(ApiError::InvalidInput(_))
        ));

        let pk_g2 = generate_public_key_g2(&sk, &params_g1).unwrap();
        assert_eq!(pk_g2.len(), BLS12381_G2_PUBLIC_KEY_LENGTH);
        assert!(is_public_key_g2_valid(&pk_g2).unwrap());
        let keypair = generate_keypair_g2(&mut rng, &params_g1, Some(b"seed")).unwrap();
        assert_eq!(keypair.secret_key, sk);
        assert_eq!(keypair.public_key, pk_g2);

        let params_g2 = generate_signature_params_g2(&mut rng, 4, None).unwrap();
        assert!(is_signature_params_g2_valid(&params_g2).unwrap());
        let pk_g1 = generate_public_key_g1(&sk, &params_g2).unwrap();
        assert_eq!(pk_g1.len(), BLS12381_G1_PUBLIC_KEY_LENGTH);
        assert!(is_public_key_g1_valid(&pk_g1).unwrap());

        assert!(matches!(
            generate_public_key_g2(&sk[1..], &params_g1),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            is_public_key_g2_valid(&pk_g1),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            signature_params_g1_max_supported_msgs(&params_g1[1..]),
            Err(ApiError::DecodingError(_))
        ));
    }

    #[test]
    fn sign_and_verify_in_g2() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = generate_signature_params_g2(&mut rng, 3, Some(b"label")).unwrap();
        let keypair = generate_keypair_g1(&mut rng, &params, None).unwrap();
        let messages = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        let sig = sign_g2(&mut rng, &messages, &keypair.secret_key, &params, true).unwrap();
        assert_eq!(sig.len(), BBS_SIGNATURE_G2_LENGTH);
        assert!(verify_g2(&messages, &sig, &keypair.public_key, &params, true).verified);

        let mut other = messages.clone();
        other[1] = b"x".to_vec();
        let resp = verify_g2(&other, &sig, &keypair.public_key, &params, true);
        assert!(!resp.verified);
        assert!(resp.error.is_some());
    }

    #[test]
    fn proof_of_knowledge_of_signature() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = generate_signature_params_g1(&mut rng, 5, None).unwrap();
        let keypair = generate_keypair_g2(&mut rng, &params, None).unwrap();
        let messages = (0..5)
            .map(|i| format!("message {}", i).into_bytes())
            .collect::<Vec<_>>();
        let sig = sign_g1(&mut rng, &messages, &keypair.secret_key, &params, true).unwrap();

        let revealed_indices = [1, 3].into_iter().collect::<BTreeSet<usize>>();
        let revealed = revealed_indices
            .iter()
            .map(|i| (*i, messages[*i].clone()))
            .collect::<BTreeMap<_, _>>();
        let blinding = generate_random_field_element(&mut rng, None).unwrap();
        let blindings = BTreeMap::from([(0, blinding)]);

        let protocol = initialize_proof_of_knowledge_of_signature(
            &mut rng,
            &sig,
            &params,
            &messages,
            &blindings,
            &revealed_indices,
            true,
        )
        .unwrap();
        let contribution =
            challenge_contribution_from_protocol(&protocol, &revealed, &params, true).unwrap();
        let challenge = generate_challenge_from_bytes(&contribution).unwrap();
        let proof = gen_proof_of_knowledge_of_signature(&protocol, &challenge).unwrap();

        let contribution_v =
            challenge_contribution_from_proof(&proof, &revealed, &params, true).unwrap();
        assert_eq!(contribution, contribution_v);
        assert!(
            verify_proof_of_knowledge_of_signature(
                &proof,
                &revealed,
                &challenge,
                &keypair.public_key,
                &params,
                true
            )
            .verified
        );

        let mut wrong = revealed.clone();
        wrong.insert(3, b"wrong".to_vec());
        assert!(
            !verify_proof_of_knowledge_of_signature(
                &proof,
                &wrong,
                &challenge,
                &keypair.public_key,
                &params,
                true
            )
            .verified
        );

        assert!(get_response_for_message(&proof, 0, &revealed_indices).is_ok());
        assert!(get_response_for_message(&proof, 1, &revealed_indices).is_err());

        // Blinding for a revealed message
        let blindings = BTreeMap::from([(1, generate_random_field_element(&mut rng, None).unwrap())]);
        assert!(initialize_proof_of_knowledge_of_signature(
            &mut rng,
            &sig,
            &params,
            &messages,
            &blindings,
            &revealed_indices,
            true,
        )
        .is_err());
    }
}
