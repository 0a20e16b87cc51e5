//! Proof of knowledge of the signature and corresponding messages as per section 4.5 of the paper
//! # Examples
//!
//! Creating proof of knowledge of signature and verifying it:
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use bbs_plus::setup::{SignatureParamsG1, KeypairG2};
//! use bbs_plus::signature::SignatureG1;
//! use bbs_plus::proof::PoKOfSignatureG1Protocol;
//! use ark_std::collections::{BTreeSet, BTreeMap};
//!
//! let params_g1 = SignatureParamsG1::<Bls12_381>::generate_using_rng(&mut rng, 5);
//! let keypair_g2 = KeypairG2::<Bls12_381>::generate_using_rng(&mut rng, &params_g1);
//!
//! // `messages` contains elements of the scalar field
//! let sig_g1 = SignatureG1::<Bls12_381>::new(&mut rng, &messages, &keypair_g2.secret_key, &params_g1).unwrap();
//! let mut blindings = BTreeMap::new();
//! let mut revealed_indices = BTreeSet::new();
//! // Populate blindings with message index and corresponding blinding
//! // Populate revealed_indices with 0-based indices of revealed messages
//! let pok = PoKOfSignatureG1Protocol::init(
//!             &mut rng,
//!             &sig_g1,
//!             &params_g1,
//!             &messages,
//!             blindings,
//!             &revealed_indices,
//!         )
//!         .unwrap();
//!
//! // challenge is generated (see tests)
//! let proof = pok.gen_proof(&challenge).unwrap();
//!
//! let mut revealed_msgs = BTreeMap::new();
//! proof
//!             .verify(
//!                 &revealed_msgs,
//!                 &challenge,
//!                 &keypair_g2.public_key,
//!                 &params_g1,
//!             )
//!             .unwrap();
//!
//! // See tests for more examples
//! ```

use crate::{
    error::BBSPlusError,
    setup::{PublicKeyG2, SignatureParamsG1},
    signature::SignatureG1,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{Field, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    end_timer,
    io::Write,
    rand::RngCore,
    start_timer, vec,
    vec::Vec,
    UniformRand,
};
use credential_utils::{
    expect_equality, serde_utils::ArkObjectBytes, signature::check_revealed_and_blinded_indices,
    signature::MultiMessageSignatureParams,
};
use itertools::multiunzip;
use schnorr_pok::{SchnorrCommitment, SchnorrResponse};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Stateful protocol to prove knowledge of signature. The protocol randomizes the signature and executes 2 Schnorr
/// proof of knowledge protocols with the verifier in addition to verification of the randomized signature.
/// It contains commitment (Schnorr step 1) and witnesses to both Schnorr protocols in `sc_comm_` and `sc_wits_`
/// respectively. The protocol executes in 2 phases, pre-challenge (`init`) which is used to create the
/// challenge and post-challenge (`gen_proof`). Thus, several instances of the protocol can be used
/// together where the pre-challenge phase of all protocols is used to create a combined challenge and then
/// that challenge is used in post-challenge phase of all protocols.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(bound = "")]
pub struct PoKOfSignatureG1Protocol<E: Pairing> {
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub A_prime: E::G1Affine,
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub A_bar: E::G1Affine,
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub d: E::G1Affine,
    /// For proving relation `A_bar - d == A_prime * -e + h_0 * r2`
    pub sc_comm_1: SchnorrCommitment<E::G1Affine>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    sc_wits_1: Vec<E::ScalarField>,
    /// For proving relation `g1 + \sum_{i in D}(h_i*m_i) == d * r3 + h_0 * -s_prime + \sum_{j notin D}(h_j * -m_j)`
    /// for all disclosed messages `m_i` and all undisclosed messages `m_j`
    pub sc_comm_2: SchnorrCommitment<E::G1Affine>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    sc_wits_2: Vec<E::ScalarField>,
}

/// Proof of knowledge of the signature. It contains the randomized signature, commitment (Schnorr step 1)
/// and response (Schnorr step 3) to both Schnorr protocols in `T_` and `sc_resp_`
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PoKOfSignatureG1Proof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub A_prime: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A_bar: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub d: E::G1Affine,
    /// Proof of relation `A_bar - d == A_prime * -e + h_0 * r2`
    #[serde_as(as = "ArkObjectBytes")]
    pub T1: E::G1Affine,
    pub sc_resp_1: SchnorrResponse<E::G1Affine>,
    /// Proof of relation `g1 + \sum_{i in D}(h_i*m_i) == d * r3 + h_0 * -s_prime + \sum_{j notin D}(h_j * -m_j)`
    #[serde_as(as = "ArkObjectBytes")]
    pub T2: E::G1Affine,
    pub sc_resp_2: SchnorrResponse<E::G1Affine>,
}

impl<E: Pairing> PoKOfSignatureG1Protocol<E> {
    /// Initiate the protocol, i.e. pre-challenge phase. This will generate the randomized signature and execute
    /// the commit-to-randomness step (step 1) of both Schnorr protocols. Accepts the indices of the
    /// multi-message which are revealed to the verifier and thus their knowledge is not proven.
    /// Accepts blindings (randomness) to be used for any hidden messages in the multi-message. This is useful
    /// when some messages need to be proven same as they will generate same response (step 3 in Schnorr protocol).
    /// Blindings for revealed messages are rejected. eg. If the multi-message is `[m_0, m_1, m_2, m_3, m_4, m_5]`
    /// and the user is providing blindings for messages `m_0` and `m_2` and revealing messages `m_3`, `m_4` and `m_5`,
    /// `blindings` is `(0 -> b_0), (2 -> b_2)` and `revealed_msg_indices` is `{3, 4, 5}`
    pub fn init<R: RngCore>(
        rng: &mut R,
        signature: &SignatureG1<E>,
        params: &SignatureParamsG1<E>,
        messages: &[E::ScalarField],
        mut blindings: BTreeMap<usize, E::ScalarField>,
        revealed_msg_indices: &BTreeSet<usize>,
    ) -> Result<Self, BBSPlusError> {
        expect_equality!(
            messages.len(),
            params.supported_message_count(),
            BBSPlusError::MessageCountIncompatibleWithSigParams
        );
        check_revealed_and_blinded_indices(messages.len(), revealed_msg_indices, &blindings)?;
        let init_time = start_timer!(|| "Init proof of knowledge of signature");

        let r1 = E::ScalarField::rand(rng);
        let r2 = E::ScalarField::rand(rng);
        let r3 = r1.inverse().ok_or(BBSPlusError::CannotInvert0)?;

        let b = params.b(messages.iter().enumerate(), &signature.s)?;
        // A' = A * r1
        let A_prime = signature.A.mul_bigint(r1.into_bigint());
        let A_prime_affine = A_prime.into_affine();
        // A_bar = r1 * b - e * A'
        let b_r1 = b * r1;
        let A_bar = b_r1 - A_prime_affine.mul_bigint(signature.e.into_bigint());
        // d = r1 * b - r2 * h_0
        let d = b_r1 - params.h_0.mul_bigint(r2.into_bigint());
        let d_affine = d.into_affine();
        // s' = s - r2*r3
        let s_prime = signature.s - (r2 * r3);

        // For proving relation `A_bar - d == A_prime * -e + h_0 * r2`
        let bases_1 = [A_prime_affine, params.h_0];
        let wits_1 = vec![-signature.e, r2];
        let sc_comm_1 = SchnorrCommitment::new(
            &bases_1,
            vec![E::ScalarField::rand(rng), E::ScalarField::rand(rng)],
        )?;

        // Since the number of disclosed messages is usually smaller than the undisclosed ones, the negations
        // are done on the disclosed side. So the relation
        // `g1 + \sum_{i in D}(h_i*m_i) == d * r3 + h_0 * -s_prime + \sum_{j notin D}(h_j * -m_j)` is transformed into
        // `d * -r3 + h_0 * s_prime + \sum_{j notin D}(h_j * m_j) == -(g1 + \sum_{i in D}(h_i*m_i))`. The right side is public.
        let (hidden_bases, hidden_blindings, hidden_msgs): (Vec<_>, Vec<_>, Vec<_>) = multiunzip(
            messages
                .iter()
                .enumerate()
                .filter(|(i, _)| !revealed_msg_indices.contains(i))
                .map(|(i, m)| {
                    (
                        params.h[i],
                        blindings
                            .remove(&i)
                            .unwrap_or_else(|| E::ScalarField::rand(rng)),
                        *m,
                    )
                }),
        );

        let mut bases_2 = Vec::with_capacity(2 + hidden_bases.len());
        bases_2.push(d_affine);
        bases_2.push(params.h_0);
        bases_2.extend(hidden_bases);
        let mut scalars_2 = Vec::with_capacity(bases_2.len());
        scalars_2.push(E::ScalarField::rand(rng));
        scalars_2.push(E::ScalarField::rand(rng));
        scalars_2.extend(hidden_blindings);
        let mut wits_2 = Vec::with_capacity(bases_2.len());
        wits_2.push(-r3);
        wits_2.push(s_prime);
        wits_2.extend(hidden_msgs);

        let sc_comm_2 = SchnorrCommitment::new(&bases_2, scalars_2)?;
        end_timer!(init_time);
        Ok(Self {
            A_prime: A_prime_affine,
            A_bar: A_bar.into_affine(),
            d: d_affine,
            sc_comm_1,
            sc_wits_1: wits_1,
            sc_comm_2,
            sc_wits_2: wits_2,
        })
    }

    /// Get the contribution of this protocol towards the challenge.
    pub fn challenge_contribution<W: Write>(
        &self,
        revealed_msgs: &BTreeMap<usize, E::ScalarField>,
        params: &SignatureParamsG1<E>,
        writer: W,
    ) -> Result<(), BBSPlusError> {
        Self::compute_challenge_contribution(
            &self.A_prime,
            &self.A_bar,
            &self.d,
            &self.sc_comm_1.t,
            &self.sc_comm_2.t,
            revealed_msgs,
            params,
            writer,
        )
    }

    /// Generate proof. post-challenge phase of the protocol.
    pub fn gen_proof(
        self,
        challenge: &E::ScalarField,
    ) -> Result<PoKOfSignatureG1Proof<E>, BBSPlusError> {
        let resp_1 = self.sc_comm_1.response(&self.sc_wits_1, challenge)?;
        let resp_2 = self.sc_comm_2.response(&self.sc_wits_2, challenge)?;

        Ok(PoKOfSignatureG1Proof {
            A_prime: self.A_prime,
            A_bar: self.A_bar,
            d: self.d,
            T1: self.sc_comm_1.t,
            sc_resp_1: resp_1,
            T2: self.sc_comm_2.t,
            sc_resp_2: resp_2,
        })
    }

    /// Helper that serializes state to get challenge contribution. Serialized the randomized signature,
    /// and commitments and instances for both Schnorr protocols
    pub fn compute_challenge_contribution<W: Write>(
        A_prime: &E::G1Affine,
        A_bar: &E::G1Affine,
        d: &E::G1Affine,
        T1: &E::G1Affine,
        T2: &E::G1Affine,
        revealed_msgs: &BTreeMap<usize, E::ScalarField>,
        params: &SignatureParamsG1<E>,
        mut writer: W,
    ) -> Result<(), BBSPlusError> {
        A_bar.serialize_compressed(&mut writer)?;

        // For 1st Schnorr
        A_prime.serialize_compressed(&mut writer)?;
        params.h_0.serialize_compressed(&mut writer)?;
        // A_bar - d
        let A_bar_minus_d = (A_bar.into_group() - d).into_affine();
        A_bar_minus_d.serialize_compressed(&mut writer)?;
        T1.serialize_compressed(&mut writer)?;

        // For 2nd Schnorr
        // `bases_disclosed` and `exponents` below are used to create g1 + h1*m1 + h2*m2.... for all disclosed messages m_i
        let mut bases_disclosed = Vec::with_capacity(1 + revealed_msgs.len());
        let mut exponents = Vec::with_capacity(1 + revealed_msgs.len());

        params.g1.serialize_compressed(&mut writer)?;
        bases_disclosed.push(params.g1);
        let r = E::ScalarField::one();
        r.serialize_compressed(&mut writer)?;
        exponents.push(r);
        for (i, msg) in revealed_msgs {
            let h_i = params
                .h
                .get(*i)
                .ok_or(BBSPlusError::InvalidMessageIdx(*i))?;
            h_i.serialize_compressed(&mut writer)?;
            bases_disclosed.push(*h_i);
            msg.serialize_compressed(&mut writer)?;
            exponents.push(*msg);
        }
        E::G1::msm_unchecked(&bases_disclosed, &exponents)
            .into_affine()
            .serialize_compressed(&mut writer)?;
        T2.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

impl<E: Pairing> PoKOfSignatureG1Proof<E> {
    /// Verify if the proof is valid. Assumes that the public key and parameters have been
    /// validated already.
    pub fn verify(
        &self,
        revealed_msgs: &BTreeMap<usize, E::ScalarField>,
        challenge: &E::ScalarField,
        pk: &PublicKeyG2<E>,
        params: &SignatureParamsG1<E>,
    ) -> Result<(), BBSPlusError> {
        if self.A_prime.is_zero() {
            return Err(BBSPlusError::ZeroSignature);
        }
        let verify_time = start_timer!(|| "Verify proof of knowledge of signature");

        // Verify the randomized signature
        if !E::multi_pairing(
            [
                E::G1Prepared::from(self.A_prime),
                E::G1Prepared::from((-self.A_bar.into_group()).into_affine()),
            ],
            [E::G2Prepared::from(pk.0), E::G2Prepared::from(params.g2)],
        )
        .is_zero()
        {
            return Err(BBSPlusError::PairingCheckFailed);
        }

        // Verify the 1st Schnorr proof
        let bases_1 = [self.A_prime, params.h_0];
        // A_bar - d
        let A_bar_minus_d = (self.A_bar.into_group() - self.d).into_affine();
        self.sc_resp_1
            .is_valid(&bases_1, &A_bar_minus_d, &self.T1, challenge)
            .map_err(|_| BBSPlusError::FirstSchnorrVerificationFailed)?;

        // Verify the 2nd Schnorr proof
        let msg_count = params.supported_message_count();
        if let Some((i, _)) = revealed_msgs.iter().find(|(i, _)| **i >= msg_count) {
            return Err(BBSPlusError::InvalidMessageIdx(*i));
        }
        let mut bases_2 = Vec::with_capacity(2 + msg_count - revealed_msgs.len());
        bases_2.push(self.d);
        bases_2.push(params.h_0);

        let mut bases_disclosed = Vec::with_capacity(1 + revealed_msgs.len());
        let mut exponents = Vec::with_capacity(1 + revealed_msgs.len());
        bases_disclosed.push(params.g1);
        exponents.push(E::ScalarField::one());
        for (i, h_i) in params.h.iter().enumerate() {
            match revealed_msgs.get(&i) {
                Some(message) => {
                    bases_disclosed.push(*h_i);
                    exponents.push(*message);
                }
                None => bases_2.push(*h_i),
            }
        }
        // pr = -(g1 + h1*m1 + h2*m2....) for all disclosed messages m_i
        let pr = -E::G1::msm_unchecked(&bases_disclosed, &exponents);
        let pr = pr.into_affine();
        self.sc_resp_2
            .is_valid(&bases_2, &pr, &self.T2, challenge)
            .map_err(|_| BBSPlusError::SecondSchnorrVerificationFailed)?;
        end_timer!(verify_time);
        Ok(())
    }

    /// For the verifier to independently calculate the challenge
    pub fn challenge_contribution<W: Write>(
        &self,
        revealed_msgs: &BTreeMap<usize, E::ScalarField>,
        params: &SignatureParamsG1<E>,
        writer: W,
    ) -> Result<(), BBSPlusError> {
        PoKOfSignatureG1Protocol::compute_challenge_contribution(
            &self.A_prime,
            &self.A_bar,
            &self.d,
            &self.T1,
            &self.T2,
            revealed_msgs,
            params,
            writer,
        )
    }

    /// Get the response from post-challenge phase of the Schnorr protocol for the given message index
    /// `msg_idx`. Used when comparing message equality
    pub fn get_resp_for_message(
        &self,
        msg_idx: usize,
        revealed_msg_ids: &BTreeSet<usize>,
    ) -> Result<&E::ScalarField, BBSPlusError> {
        // Revealed messages are not part of Schnorr protocol
        if revealed_msg_ids.contains(&msg_idx) {
            return Err(BBSPlusError::InvalidMsgIdxForResponse(msg_idx));
        }
        // Adjust message index as the revealed messages are not part of the Schnorr protocol
        let adjusted_idx = msg_idx - revealed_msg_ids.range(..msg_idx).count();
        // 2 added to the index, since 0th and 1st index are reserved for `r3` and `s_prime`
        let r = self
            .sc_resp_2
            .get_response(2 + adjusted_idx)
            .map_err(|_| BBSPlusError::InvalidMsgIdxForResponse(msg_idx))?;
        Ok(r)
    }
}
