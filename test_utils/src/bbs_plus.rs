use ark_bls12_381::Bls12_381;
use ark_std::{rand::RngCore, UniformRand};
use bbs_plus::prelude::{KeypairG2, SignatureG1, SignatureParamsG1};

use crate::Fr;

/// Random messages with params, keypair and a verified signature over them
pub fn sig_setup<R: RngCore>(
    rng: &mut R,
    message_count: usize,
) -> (
    Vec<Fr>,
    SignatureParamsG1<Bls12_381>,
    KeypairG2<Bls12_381>,
    SignatureG1<Bls12_381>,
) {
    let messages = (0..message_count)
        .map(|_| Fr::rand(rng))
        .collect::<Vec<_>>();
    let (params, keypair, sig) = sig_setup_given_messages(rng, &messages);
    (messages, params, keypair, sig)
}

pub fn sig_setup_given_messages<R: RngCore>(
    rng: &mut R,
    messages: &[Fr],
) -> (
    SignatureParamsG1<Bls12_381>,
    KeypairG2<Bls12_381>,
    SignatureG1<Bls12_381>,
) {
    let params = SignatureParamsG1::<Bls12_381>::generate_using_rng(rng, messages.len());
    let keypair = KeypairG2::<Bls12_381>::generate_using_rng(rng, &params);
    let sig = SignatureG1::<Bls12_381>::new(rng, messages, &keypair.secret_key, &params).unwrap();
    sig.verify(messages, &keypair.public_key, &params).unwrap();
    (params, keypair, sig)
}
