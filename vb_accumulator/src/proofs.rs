#![allow(non_snake_case)]

//! Zero knowledge proofs of knowledge of a member (non-member) and its membership (non-membership) witness,
//! from section 7 of the paper. The protocols are split in a pre-challenge phase (`init`), a challenge contribution
//! and a post-challenge phase (`gen_proof`) so that they can be composed with other protocols under one challenge.
//! # Examples
//!
//! ```
//! use ark_bls12_381::{Bls12_381, Fr};
//! use blake2::Blake2b512;
//! use vb_accumulator::setup::{Keypair, SetupParams, MembershipProvingKey};
//! use vb_accumulator::positive::{PositiveAccumulator, Accumulator};
//! use vb_accumulator::proofs::MembershipProofProtocol;
//! use schnorr_pok::compute_random_oracle_challenge;
//!
//! // The prover and verifier should agree on the proving key
//! let prk = MembershipProvingKey::<<Bls12_381 as Pairing>::G1Affine>::new::<Blake2b512>(b"test");
//!
//! let protocol = MembershipProofProtocol::init(&mut rng, &elem, None, &m_wit, &keypair.public_key, &params, &prk);
//! let mut chal_bytes_prover = vec![];
//! protocol
//!     .challenge_contribution(accumulator.value(), &keypair.public_key, &params, &prk, &mut chal_bytes_prover)
//!     .unwrap();
//! let challenge_prover = compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_prover);
//! let proof = protocol.gen_proof(&challenge_prover);
//!
//! // Verifier recomputes the challenge from the proof
//! let mut chal_bytes_verifier = vec![];
//! proof
//!     .challenge_contribution(accumulator.value(), &keypair.public_key, &params, &prk, &mut chal_bytes_verifier)
//!     .unwrap();
//! let challenge_verifier = compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_verifier);
//! proof
//!     .verify(accumulator.value(), &challenge_verifier, &keypair.public_key, &params, &prk)
//!     .unwrap();
//! ```

use crate::{
    error::VBAccumulatorError,
    setup::{MembershipProvingKey, NonMembershipProvingKey, ProvingKey, PublicKey, SetupParams},
    witness::{MembershipWitness, NonMembershipWitness},
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, io::Write, rand::RngCore, start_timer, vec, vec::Vec, UniformRand};
use credential_utils::serde_utils::ArkObjectBytes;
use schnorr_pok::{error::SchnorrError, SchnorrChallengeContributor};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The witness `C` hidden as `E_C = C + (sigma + rho) * Z` along with commitments `T_sigma = sigma * X`
/// and `T_rho = rho * Y` to the randomness
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct RandomizedWitness<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub E_C: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub T_sigma: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub T_rho: G,
}

/// Randomness used in randomizing the witness and blindings for the Schnorr protocol
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct Blindings<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub sigma: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub rho: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub delta_sigma: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub delta_rho: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_y: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_sigma: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_rho: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_delta_sigma: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_delta_rho: F,
}

/// Schnorr commitments (step 1), one of them in the target group
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SchnorrCommit<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub R_E: PairingOutput<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_sigma: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_rho: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_delta_sigma: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_delta_rho: E::G1Affine,
}

/// Schnorr responses (step 3)
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SchnorrResponse<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub s_y: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_sigma: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_rho: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta_sigma: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta_rho: F,
}

/// Pre-challenge state of the membership proof
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
#[serde(bound = "")]
pub struct MembershipProofProtocol<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub element: E::ScalarField,
    #[zeroize(skip)]
    pub randomized_witness: RandomizedWitness<E::G1Affine>,
    #[zeroize(skip)]
    pub schnorr_commit: SchnorrCommit<E>,
    pub schnorr_blindings: Blindings<E::ScalarField>,
}

#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct MembershipProof<E: Pairing> {
    pub randomized_witness: RandomizedWitness<E::G1Affine>,
    pub schnorr_commit: SchnorrCommit<E>,
    pub schnorr_response: SchnorrResponse<E::ScalarField>,
}

/// Membership part plus commitments `E_d = d * P + tau * K` and `E_d_inv = 1/d * P + pi * K`
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct NonMembershipRandomizedWitness<G: AffineRepr> {
    pub C: RandomizedWitness<G>,
    #[serde_as(as = "ArkObjectBytes")]
    pub E_d: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub E_d_inv: G,
}

#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
#[serde(bound = "")]
pub struct NonMembershipBlindings<F: PrimeField> {
    pub C: Blindings<F>,
    #[serde_as(as = "ArkObjectBytes")]
    pub tau: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub pi: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_u: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_v: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_w: F,
}

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct NonMembershipSchnorrCommit<E: Pairing> {
    pub C: SchnorrCommit<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_A: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_B: E::G1Affine,
}

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct NonMembershipSchnorrResponse<F: PrimeField> {
    pub C: SchnorrResponse<F>,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_u: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_v: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_w: F,
}

/// Pre-challenge state of the non-membership proof
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
#[serde(bound = "")]
pub struct NonMembershipProofProtocol<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub element: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub d: E::ScalarField,
    #[zeroize(skip)]
    pub randomized_witness: NonMembershipRandomizedWitness<E::G1Affine>,
    #[zeroize(skip)]
    pub schnorr_commit: NonMembershipSchnorrCommit<E>,
    pub schnorr_blindings: NonMembershipBlindings<E::ScalarField>,
}

#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct NonMembershipProof<E: Pairing> {
    pub randomized_witness: NonMembershipRandomizedWitness<E::G1Affine>,
    pub schnorr_commit: NonMembershipSchnorrCommit<E>,
    pub schnorr_response: NonMembershipSchnorrResponse<E::ScalarField>,
}

impl<G: AffineRepr> SchnorrChallengeContributor for RandomizedWitness<G> {
    fn challenge_contribution<W: Write>(&self, mut writer: W) -> Result<(), SchnorrError> {
        self.E_C.serialize_compressed(&mut writer)?;
        self.T_sigma.serialize_compressed(&mut writer)?;
        self.T_rho.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

impl<E: Pairing> SchnorrChallengeContributor for SchnorrCommit<E> {
    fn challenge_contribution<W: Write>(&self, mut writer: W) -> Result<(), SchnorrError> {
        self.R_E.serialize_compressed(&mut writer)?;
        self.R_sigma.serialize_compressed(&mut writer)?;
        self.R_rho.serialize_compressed(&mut writer)?;
        self.R_delta_sigma.serialize_compressed(&mut writer)?;
        self.R_delta_rho.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

impl<G: AffineRepr> SchnorrChallengeContributor for NonMembershipRandomizedWitness<G> {
    fn challenge_contribution<W: Write>(&self, mut writer: W) -> Result<(), SchnorrError> {
        self.C.challenge_contribution(&mut writer)?;
        self.E_d.serialize_compressed(&mut writer)?;
        self.E_d_inv.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

impl<E: Pairing> SchnorrChallengeContributor for NonMembershipSchnorrCommit<E> {
    fn challenge_contribution<W: Write>(&self, mut writer: W) -> Result<(), SchnorrError> {
        self.C.challenge_contribution(&mut writer)?;
        self.R_A.serialize_compressed(&mut writer)?;
        self.R_B.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

impl<F: PrimeField> Blindings<F> {
    /// `s = r + c * w` for each witness
    fn responses(&self, element: &F, challenge: &F) -> SchnorrResponse<F> {
        SchnorrResponse {
            s_y: self.r_y + *challenge * element,
            s_sigma: self.r_sigma + *challenge * self.sigma,
            s_rho: self.r_rho + *challenge * self.rho,
            s_delta_sigma: self.r_delta_sigma + *challenge * self.delta_sigma,
            s_delta_rho: self.r_delta_rho + *challenge * self.delta_rho,
        }
    }
}

impl<F: PrimeField> SchnorrResponse<F> {
    pub fn get_response_for_element(&self) -> &F {
        &self.s_y
    }
}

/// Randomize the witness `C` and commit to the randomness. `pairing_extra` is paired with `P_tilde` and
/// multiplied into `R_E`. `element_blinding` lets the caller fix the blinding of the element, e.g. to prove it equal
/// to a witness of another protocol.
fn randomize_witness_and_compute_commitments<E: Pairing, R: RngCore>(
    rng: &mut R,
    element: &E::ScalarField,
    element_blinding: Option<E::ScalarField>,
    witness: &E::G1Affine,
    pairing_extra: Option<E::G1Affine>,
    pk: &PublicKey<E>,
    params: &SetupParams<E>,
    prk: &ProvingKey<E::G1Affine>,
) -> (
    RandomizedWitness<E::G1Affine>,
    SchnorrCommit<E>,
    Blindings<E::ScalarField>,
) {
    let sigma = E::ScalarField::rand(rng);
    let rho = E::ScalarField::rand(rng);
    let r_y = element_blinding.unwrap_or_else(|| E::ScalarField::rand(rng));
    let r_sigma = E::ScalarField::rand(rng);
    let r_rho = E::ScalarField::rand(rng);
    let r_delta_sigma = E::ScalarField::rand(rng);
    let r_delta_rho = E::ScalarField::rand(rng);

    let E_C = prk.Z * (sigma + rho) + *witness;
    let T_sigma = prk.X * sigma;
    let T_rho = prk.Y * rho;

    // R_E = e(E_C, P_tilde)^r_y * e(Z, P_tilde)^(-r_delta_sigma - r_delta_rho) * e(Z, Q_tilde)^(-r_sigma - r_rho)
    let mut g1 = vec![
        (E_C * r_y).into_affine(),
        (prk.Z * (-r_delta_sigma - r_delta_rho)).into_affine(),
        (prk.Z * (-r_sigma - r_rho)).into_affine(),
    ];
    let mut g2 = vec![params.P_tilde, params.P_tilde, pk.0];
    if let Some(extra) = pairing_extra {
        g1.push(extra);
        g2.push(params.P_tilde);
    }
    let R_E = E::multi_pairing(g1, g2);

    let R_sigma = prk.X * r_sigma;
    let R_rho = prk.Y * r_rho;
    let R_delta_sigma = T_sigma * r_y - prk.X * r_delta_sigma;
    let R_delta_rho = T_rho * r_y - prk.Y * r_delta_rho;

    let rw = E::G1::normalize_batch(&[E_C, T_sigma, T_rho]);
    let sc = E::G1::normalize_batch(&[R_sigma, R_rho, R_delta_sigma, R_delta_rho]);
    (
        RandomizedWitness {
            E_C: rw[0],
            T_sigma: rw[1],
            T_rho: rw[2],
        },
        SchnorrCommit {
            R_E,
            R_sigma: sc[0],
            R_rho: sc[1],
            R_delta_sigma: sc[2],
            R_delta_rho: sc[3],
        },
        Blindings {
            sigma,
            rho,
            delta_sigma: *element * sigma,
            delta_rho: *element * rho,
            r_y,
            r_sigma,
            r_rho,
            r_delta_sigma,
            r_delta_rho,
        },
    )
}

/// Writes the randomized witness, the commitments and then the public values
fn compute_challenge_contribution<E: Pairing, W: Write>(
    randomized_witness: &impl SchnorrChallengeContributor,
    schnorr_commit: &impl SchnorrChallengeContributor,
    accumulator_value: &E::G1Affine,
    pk: &PublicKey<E>,
    params: &SetupParams<E>,
    prk: &ProvingKey<E::G1Affine>,
    mut writer: W,
) -> Result<(), VBAccumulatorError> {
    randomized_witness.challenge_contribution(&mut writer)?;
    schnorr_commit.challenge_contribution(&mut writer)?;
    accumulator_value.serialize_compressed(&mut writer)?;
    pk.0.serialize_compressed(&mut writer)?;
    params.P.serialize_compressed(&mut writer)?;
    params.P_tilde.serialize_compressed(&mut writer)?;
    prk.X.serialize_compressed(&mut writer)?;
    prk.Y.serialize_compressed(&mut writer)?;
    prk.Z.serialize_compressed(&mut writer)?;
    Ok(())
}

/// Check the responses against the commitments. `pairing_extra` are paired with `P_tilde` in the
/// recomputation of `R_E`
fn verify_proof<E: Pairing>(
    randomized_witness: &RandomizedWitness<E::G1Affine>,
    schnorr_commit: &SchnorrCommit<E>,
    schnorr_response: &SchnorrResponse<E::ScalarField>,
    pairing_extra: Option<[E::G1Affine; 2]>,
    accumulator_value: &E::G1Affine,
    challenge: &E::ScalarField,
    pk: &PublicKey<E>,
    params: &SetupParams<E>,
    prk: &ProvingKey<E::G1Affine>,
) -> Result<(), VBAccumulatorError> {
    let resp = schnorr_response;
    let rw = randomized_witness;

    // R_sigma = s_sigma * X - c * T_sigma
    if (prk.X * resp.s_sigma - rw.T_sigma * *challenge).into_affine() != schnorr_commit.R_sigma {
        return Err(VBAccumulatorError::SigmaResponseInvalid);
    }
    // R_rho = s_rho * Y - c * T_rho
    if (prk.Y * resp.s_rho - rw.T_rho * *challenge).into_affine() != schnorr_commit.R_rho {
        return Err(VBAccumulatorError::RhoResponseInvalid);
    }
    // R_delta_sigma = s_y * T_sigma - s_delta_sigma * X
    if (rw.T_sigma * resp.s_y - prk.X * resp.s_delta_sigma).into_affine()
        != schnorr_commit.R_delta_sigma
    {
        return Err(VBAccumulatorError::DeltaSigmaResponseInvalid);
    }
    // R_delta_rho = s_y * T_rho - s_delta_rho * Y
    if (rw.T_rho * resp.s_y - prk.Y * resp.s_delta_rho).into_affine()
        != schnorr_commit.R_delta_rho
    {
        return Err(VBAccumulatorError::DeltaRhoResponseInvalid);
    }

    let mut g1 = E::G1::normalize_batch(&[
        rw.E_C * resp.s_y,
        prk.Z * (-resp.s_delta_sigma - resp.s_delta_rho),
        prk.Z * (-resp.s_sigma - resp.s_rho),
        *accumulator_value * (-*challenge),
        rw.E_C * *challenge,
    ]);
    let mut g2 = vec![
        params.P_tilde,
        params.P_tilde,
        pk.0,
        params.P_tilde,
        pk.0,
    ];
    if let Some(extra) = pairing_extra {
        g1.extend_from_slice(&extra);
        g2.push(params.P_tilde);
        g2.push(params.P_tilde);
    }
    if E::multi_pairing(g1, g2) != schnorr_commit.R_E {
        return Err(VBAccumulatorError::PairingResponseInvalid);
    }
    Ok(())
}

impl<E: Pairing> MembershipProofProtocol<E> {
    /// Randomize the witness and commit to the randomness
    pub fn init<R: RngCore>(
        rng: &mut R,
        element: &E::ScalarField,
        element_blinding: Option<E::ScalarField>,
        witness: &MembershipWitness<E::G1Affine>,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &MembershipProvingKey<E::G1Affine>,
    ) -> Self {
        let (randomized_witness, schnorr_commit, schnorr_blindings) =
            randomize_witness_and_compute_commitments(
                rng,
                element,
                element_blinding,
                &witness.0,
                None,
                pk,
                params,
                &prk.0,
            );
        Self {
            element: *element,
            randomized_witness,
            schnorr_commit,
            schnorr_blindings,
        }
    }

    pub fn challenge_contribution<W: Write>(
        &self,
        accumulator_value: &E::G1Affine,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &MembershipProvingKey<E::G1Affine>,
        writer: W,
    ) -> Result<(), VBAccumulatorError> {
        compute_challenge_contribution(
            &self.randomized_witness,
            &self.schnorr_commit,
            accumulator_value,
            pk,
            params,
            &prk.0,
            writer,
        )
    }

    pub fn gen_proof(self, challenge: &E::ScalarField) -> MembershipProof<E> {
        MembershipProof {
            randomized_witness: self.randomized_witness.clone(),
            schnorr_commit: self.schnorr_commit.clone(),
            schnorr_response: self.schnorr_blindings.responses(&self.element, challenge),
        }
    }
}

impl<E: Pairing> MembershipProof<E> {
    pub fn challenge_contribution<W: Write>(
        &self,
        accumulator_value: &E::G1Affine,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &MembershipProvingKey<E::G1Affine>,
        writer: W,
    ) -> Result<(), VBAccumulatorError> {
        compute_challenge_contribution(
            &self.randomized_witness,
            &self.schnorr_commit,
            accumulator_value,
            pk,
            params,
            &prk.0,
            writer,
        )
    }

    pub fn verify(
        &self,
        accumulator_value: &E::G1Affine,
        challenge: &E::ScalarField,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &MembershipProvingKey<E::G1Affine>,
    ) -> Result<(), VBAccumulatorError> {
        let verify_time = start_timer!(|| "Verify membership proof");
        let r = verify_proof(
            &self.randomized_witness,
            &self.schnorr_commit,
            &self.schnorr_response,
            None,
            accumulator_value,
            challenge,
            pk,
            params,
            &prk.0,
        );
        end_timer!(verify_time);
        r
    }

    /// Response for the member. Equal for all proofs using the same blinding and challenge.
    pub fn get_schnorr_response_for_element(&self) -> &E::ScalarField {
        self.schnorr_response.get_response_for_element()
    }
}

impl<E: Pairing> NonMembershipProofProtocol<E> {
    /// Randomize the witness, commit to `d` and `1/d`, and commit to the randomness
    pub fn init<R: RngCore>(
        rng: &mut R,
        element: &E::ScalarField,
        element_blinding: Option<E::ScalarField>,
        witness: &NonMembershipWitness<E::G1Affine>,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &NonMembershipProvingKey<E::G1Affine>,
    ) -> Result<Self, VBAccumulatorError> {
        let d_inv = witness
            .d
            .inverse()
            .ok_or(VBAccumulatorError::CannotBeZero)?;
        let tau = E::ScalarField::rand(rng);
        let pi = E::ScalarField::rand(rng);
        let r_u = E::ScalarField::rand(rng);
        let r_v = E::ScalarField::rand(rng);
        let r_w = E::ScalarField::rand(rng);

        let E_d = params.P * witness.d + prk.K * tau;
        let E_d_inv = params.P * d_inv + prk.K * pi;
        let R_A = params.P * r_u + prk.K * r_v;
        let R_B = E_d_inv * r_u + prk.K * r_w;

        let (C, schnorr_commit_C, blindings_C) = randomize_witness_and_compute_commitments(
            rng,
            element,
            element_blinding,
            &witness.C,
            Some((prk.K * (-r_v)).into_affine()),
            pk,
            params,
            &prk.XYZ,
        );
        let points = E::G1::normalize_batch(&[E_d, E_d_inv, R_A, R_B]);

        Ok(Self {
            element: *element,
            d: witness.d,
            randomized_witness: NonMembershipRandomizedWitness {
                C,
                E_d: points[0],
                E_d_inv: points[1],
            },
            schnorr_commit: NonMembershipSchnorrCommit {
                C: schnorr_commit_C,
                R_A: points[2],
                R_B: points[3],
            },
            schnorr_blindings: NonMembershipBlindings {
                C: blindings_C,
                tau,
                pi,
                r_u,
                r_v,
                r_w,
            },
        })
    }

    pub fn challenge_contribution<W: Write>(
        &self,
        accumulator_value: &E::G1Affine,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &NonMembershipProvingKey<E::G1Affine>,
        mut writer: W,
    ) -> Result<(), VBAccumulatorError> {
        compute_challenge_contribution(
            &self.randomized_witness,
            &self.schnorr_commit,
            accumulator_value,
            pk,
            params,
            &prk.XYZ,
            &mut writer,
        )?;
        prk.K.serialize_compressed(&mut writer)?;
        Ok(())
    }

    pub fn gen_proof(self, challenge: &E::ScalarField) -> NonMembershipProof<E> {
        let bl = &self.schnorr_blindings;
        let c_d = *challenge * self.d;
        NonMembershipProof {
            randomized_witness: self.randomized_witness.clone(),
            schnorr_commit: self.schnorr_commit.clone(),
            schnorr_response: NonMembershipSchnorrResponse {
                C: bl.C.responses(&self.element, challenge),
                s_u: bl.r_u + c_d,
                s_v: bl.r_v + *challenge * bl.tau,
                s_w: bl.r_w - c_d * bl.pi,
            },
        }
    }
}

impl<E: Pairing> NonMembershipProof<E> {
    pub fn challenge_contribution<W: Write>(
        &self,
        accumulator_value: &E::G1Affine,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &NonMembershipProvingKey<E::G1Affine>,
        mut writer: W,
    ) -> Result<(), VBAccumulatorError> {
        compute_challenge_contribution(
            &self.randomized_witness,
            &self.schnorr_commit,
            accumulator_value,
            pk,
            params,
            &prk.XYZ,
            &mut writer,
        )?;
        prk.K.serialize_compressed(&mut writer)?;
        Ok(())
    }

    pub fn verify(
        &self,
        accumulator_value: &E::G1Affine,
        challenge: &E::ScalarField,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
        prk: &NonMembershipProvingKey<E::G1Affine>,
    ) -> Result<(), VBAccumulatorError> {
        let verify_time = start_timer!(|| "Verify non-membership proof");
        let rw = &self.randomized_witness;
        let resp = &self.schnorr_response;

        // R_A = s_u * P + s_v * K - c * E_d
        let R_A = params.P * resp.s_u + prk.K * resp.s_v - rw.E_d * *challenge;
        if R_A.into_affine() != self.schnorr_commit.R_A {
            return Err(VBAccumulatorError::E_d_ResponseInvalid);
        }
        // R_B = s_w * K + s_u * E_d_inv - c * P
        let R_B = prk.K * resp.s_w + rw.E_d_inv * resp.s_u - params.P * *challenge;
        if R_B.into_affine() != self.schnorr_commit.R_B {
            return Err(VBAccumulatorError::E_d_inv_ResponseInvalid);
        }

        let extra = E::G1::normalize_batch(&[prk.K * (-resp.s_v), rw.E_d * *challenge]);
        let r = verify_proof(
            &rw.C,
            &self.schnorr_commit.C,
            &resp.C,
            Some([extra[0], extra[1]]),
            accumulator_value,
            challenge,
            pk,
            params,
            &prk.XYZ,
        );
        end_timer!(verify_time);
        r
    }

    /// Response for the non-member. Equal for all proofs using the same blinding and challenge.
    pub fn get_schnorr_response_for_element(&self) -> &E::ScalarField {
        self.schnorr_response.C.get_response_for_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        positive::{tests::setup_positive_accum, Accumulator},
        test_serialization,
        universal::tests::setup_universal_accum,
    };
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use schnorr_pok::compute_random_oracle_challenge;

    #[test]
    fn membership_proof_positive_accumulator() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (params, keypair, mut accumulator, mut state) = setup_positive_accum(&mut rng);
        let prk = MembershipProvingKey::<G1Affine>::generate_using_rng(&mut rng);
        test_serialization!(MembershipProvingKey<G1Affine>, prk);

        let elems: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut rng)).collect();
        for e in &elems {
            accumulator = accumulator.add(*e, &keypair.secret_key, &mut state).unwrap();
        }
        let witnesses = accumulator
            .get_membership_witnesses_for_batch(&elems, &keypair.secret_key, &state)
            .unwrap();

        for (elem, wit) in elems.iter().zip(witnesses.iter()) {
            let protocol = MembershipProofProtocol::<Bls12_381>::init(
                &mut rng,
                elem,
                None,
                wit,
                &keypair.public_key,
                &params,
                &prk,
            );
            let mut chal_bytes_prover = vec![];
            protocol
                .challenge_contribution(
                    accumulator.value(),
                    &keypair.public_key,
                    &params,
                    &prk,
                    &mut chal_bytes_prover,
                )
                .unwrap();
            let challenge_prover =
                compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_prover);
            let proof = protocol.gen_proof(&challenge_prover);
            test_serialization!(MembershipProof<Bls12_381>, proof);

            let mut chal_bytes_verifier = vec![];
            proof
                .challenge_contribution(
                    accumulator.value(),
                    &keypair.public_key,
                    &params,
                    &prk,
                    &mut chal_bytes_verifier,
                )
                .unwrap();
            assert_eq!(chal_bytes_prover, chal_bytes_verifier);
            let challenge_verifier =
                compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_verifier);
            proof
                .verify(
                    accumulator.value(),
                    &challenge_verifier,
                    &keypair.public_key,
                    &params,
                    &prk,
                )
                .unwrap();

            // Different challenge fails
            assert!(proof
                .verify(
                    accumulator.value(),
                    &Fr::rand(&mut rng),
                    &keypair.public_key,
                    &params,
                    &prk,
                )
                .is_err());

            // Different accumulator fails the pairing check
            assert!(matches!(
                proof.verify(
                    &params.P,
                    &challenge_verifier,
                    &keypair.public_key,
                    &params,
                    &prk,
                ),
                Err(VBAccumulatorError::PairingResponseInvalid)
            ));
        }
    }

    #[test]
    fn membership_proof_with_fixed_element_blinding() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (params, keypair, mut accumulator, mut state) = setup_positive_accum(&mut rng);
        let prk = MembershipProvingKey::<G1Affine>::new::<Blake2b512>(b"test-proving-key");

        let elem = Fr::rand(&mut rng);
        accumulator = accumulator.add(elem, &keypair.secret_key, &mut state).unwrap();
        let wit = accumulator
            .get_membership_witness(&elem, &keypair.secret_key, &state)
            .unwrap();

        // The same blinding and challenge give the same response for the element
        let blinding = Fr::rand(&mut rng);
        let challenge = Fr::rand(&mut rng);
        let proof_1 = MembershipProofProtocol::<Bls12_381>::init(
            &mut rng,
            &elem,
            Some(blinding),
            &wit,
            &keypair.public_key,
            &params,
            &prk,
        )
        .gen_proof(&challenge);
        let proof_2 = MembershipProofProtocol::<Bls12_381>::init(
            &mut rng,
            &elem,
            Some(blinding),
            &wit,
            &keypair.public_key,
            &params,
            &prk,
        )
        .gen_proof(&challenge);
        assert_ne!(proof_1.randomized_witness, proof_2.randomized_witness);
        assert_eq!(
            proof_1.get_schnorr_response_for_element(),
            proof_2.get_schnorr_response_for_element()
        );
        proof_1
            .verify(accumulator.value(), &challenge, &keypair.public_key, &params, &prk)
            .unwrap();
        proof_2
            .verify(accumulator.value(), &challenge, &keypair.public_key, &params, &prk)
            .unwrap();
    }

    #[test]
    fn non_membership_proof_universal_accumulator() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (params, keypair, mut accumulator, initial_elements, mut state) =
            setup_universal_accum(&mut rng, 20);
        let prk = NonMembershipProvingKey::<G1Affine>::generate_using_rng(&mut rng);
        test_serialization!(NonMembershipProvingKey<G1Affine>, prk);

        let members: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut rng)).collect();
        accumulator = accumulator
            .add_batch(members.clone(), &keypair.secret_key, &initial_elements, &mut state)
            .unwrap();

        let non_members: Vec<Fr> = (0..3).map(|_| Fr::rand(&mut rng)).collect();
        let witnesses = accumulator
            .get_non_membership_witnesses_for_batch(
                &non_members,
                &keypair.secret_key,
                &state,
                &params,
            )
            .unwrap();

        for (elem, wit) in non_members.iter().zip(witnesses.iter()) {
            let protocol = NonMembershipProofProtocol::<Bls12_381>::init(
                &mut rng,
                elem,
                None,
                wit,
                &keypair.public_key,
                &params,
                &prk,
            )
            .unwrap();
            let mut chal_bytes_prover = vec![];
            protocol
                .challenge_contribution(
                    accumulator.value(),
                    &keypair.public_key,
                    &params,
                    &prk,
                    &mut chal_bytes_prover,
                )
                .unwrap();
            let challenge_prover =
                compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_prover);
            let proof = protocol.gen_proof(&challenge_prover);
            test_serialization!(NonMembershipProof<Bls12_381>, proof);

            let mut chal_bytes_verifier = vec![];
            proof
                .challenge_contribution(
                    accumulator.value(),
                    &keypair.public_key,
                    &params,
                    &prk,
                    &mut chal_bytes_verifier,
                )
                .unwrap();
            let challenge_verifier =
                compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_verifier);
            assert_eq!(challenge_prover, challenge_verifier);
            proof
                .verify(
                    accumulator.value(),
                    &challenge_verifier,
                    &keypair.public_key,
                    &params,
                    &prk,
                )
                .unwrap();

            assert!(proof
                .verify(
                    accumulator.value(),
                    &Fr::rand(&mut rng),
                    &keypair.public_key,
                    &params,
                    &prk,
                )
                .is_err());
        }

        // Membership proving key derived from the non-membership one works for membership proofs
        let mem_prk = prk.derive_membership_proving_key();
        let wit = accumulator
            .get_membership_witness(&members[0], &keypair.secret_key, &state)
            .unwrap();
        let protocol = MembershipProofProtocol::<Bls12_381>::init(
            &mut rng,
            &members[0],
            None,
            &wit,
            &keypair.public_key,
            &params,
            &mem_prk,
        );
        let challenge = Fr::rand(&mut rng);
        protocol
            .gen_proof(&challenge)
            .verify(accumulator.value(), &challenge, &keypair.public_key, &params, &mem_prk)
            .unwrap();
    }
}
