#![cfg_attr(not(feature = "std"), no_std)]

//! Schnorr protocol to prove knowledge of 1 or more discrete logs in zero knowledge. Refer <https://crypto.stanford.edu/cs355/19sp/lec5.pdf>
//!
//! To prove knowledge of `x_1, x_2, ..., x_n` in `y = g_1 * x_1 + g_2 * x_2 + ... + g_n * x_n`:
//! 1. Prover picks random `r_i` and creates commitment `t = g_1 * r_1 + g_2 * r_2 + ... + g_n * r_n` using [`SchnorrCommitment`]
//! 2. Challenge `c` is created by hashing `t` along with the public values (see [`compute_random_oracle_challenge`])
//! 3. Prover computes responses `s_i = r_i + c * x_i` as [`SchnorrResponse`]
//! 4. Verifier checks `g_1 * s_1 + g_2 * s_2 + ... + g_n * s_n - y * c == t`
//!
//! When the same witness is used in several such relations, using the same `r_i` for it results in
//! the same response `s_i` in each, which is how equality of witnesses across relations is proven.

use crate::error::SchnorrError;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, io::Write, vec::Vec};
use credential_utils::{
    expect_equality, hashing_utils::field_elem_from_try_and_incr, serde_utils::ArkObjectBytes,
};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod error;

/// Trait implemented by Schnorr-based protocols for returning their contribution to the overall challenge.
pub trait SchnorrChallengeContributor {
    fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), SchnorrError>;
}

/// Commitment to randomness during step 1 of the Schnorr protocol to prove knowledge of 1 or more discrete logs
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct SchnorrCommitment<G: AffineRepr> {
    /// Randomness. 1 per discrete log
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub blindings: Vec<G::ScalarField>,
    /// The commitment to all the randomnesses, i.e. `bases[0] * blindings[0] + ... + bases[n] * blindings[n]`
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub t: G,
}

impl<G: AffineRepr> SchnorrCommitment<G> {
    /// Create commitment as `bases[0] * blindings[0] + bases[1] * blindings[1] + ... bases[i] * blindings[i]`
    /// for step-1 of the protocol.
    pub fn new(bases: &[G], blindings: Vec<G::ScalarField>) -> Result<Self, SchnorrError> {
        expect_equality!(
            bases.len(),
            blindings.len(),
            SchnorrError::ExpectedSameSizeSequences
        );
        let t = G::Group::msm_unchecked(bases, &blindings).into_affine();
        Ok(Self { blindings, t })
    }

    /// Create responses for each witness (discrete log) as `response[i] = self.blindings[i] + (witnesses[i] * challenge)`
    pub fn response(
        &self,
        witnesses: &[G::ScalarField],
        challenge: &G::ScalarField,
    ) -> Result<SchnorrResponse<G>, SchnorrError> {
        expect_equality!(
            self.blindings.len(),
            witnesses.len(),
            SchnorrError::ExpectedSameSizeSequences
        );
        let responses = cfg_iter!(self.blindings)
            .zip(cfg_iter!(witnesses))
            .map(|(b, w)| *b + (*w * *challenge))
            .collect::<Vec<_>>();
        Ok(SchnorrResponse(responses))
    }
}

impl<G: AffineRepr> SchnorrChallengeContributor for SchnorrCommitment<G> {
    /// Only the commitment `t` is written. The bases and `y` must be added to the challenge by the caller.
    fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), SchnorrError> {
        self.t.serialize_compressed(writer).map_err(|e| e.into())
    }
}

/// Response during step 3 of the Schnorr protocol to prove knowledge of 1 or more discrete logs
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SchnorrResponse<G: AffineRepr>(
    #[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<G::ScalarField>,
);

impl<G: AffineRepr> SchnorrResponse<G> {
    /// Check if response is valid and thus validity of Schnorr proof
    /// `bases[0]*responses[0] + bases[1]*responses[1] + ... bases[i]*responses[i] - y*challenge == t`
    pub fn is_valid(
        &self,
        bases: &[G],
        y: &G,
        t: &G,
        challenge: &G::ScalarField,
    ) -> Result<(), SchnorrError> {
        expect_equality!(
            self.0.len(),
            bases.len(),
            SchnorrError::ExpectedSameSizeSequences
        );
        let lhs = G::Group::msm_unchecked(bases, &self.0) - y.mul_bigint(challenge.into_bigint());
        if lhs.into_affine() == *t {
            Ok(())
        } else {
            Err(SchnorrError::InvalidResponse)
        }
    }

    /// Get response for the specified discrete log
    pub fn get_response(&self, idx: usize) -> Result<&G::ScalarField, SchnorrError> {
        self.0
            .get(idx)
            .ok_or(SchnorrError::IndexOutOfBounds(idx, self.0.len()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Hash the challenge bytes to a field element. Uses try-and-increment and is thus variable time
/// but the challenge bytes are public.
pub fn compute_random_oracle_challenge<F: PrimeField, D: Digest>(challenge_bytes: &[u8]) -> F {
    field_elem_from_try_and_incr::<F, D>(challenge_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_ec::pairing::Pairing;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;
    use credential_utils::test_serialization;

    macro_rules! test_schnorr_in_group {
        ($group_affine:ident) => {
            let mut rng = StdRng::seed_from_u64(0u64);
            let count = 10;
            let bases = (0..count)
                .map(|_| <Bls12_381 as Pairing>::$group_affine::rand(&mut rng))
                .collect::<Vec<_>>();
            let witnesses = (0..count).map(|_| Fr::rand(&mut rng)).collect::<Vec<_>>();
            let y = <<Bls12_381 as Pairing>::$group_affine as AffineRepr>::Group::msm_unchecked(
                &bases, &witnesses,
            )
            .into_affine();

            let blindings = (0..count).map(|_| Fr::rand(&mut rng)).collect::<Vec<_>>();
            let comm = SchnorrCommitment::new(&bases, blindings).unwrap();
            test_serialization!(SchnorrCommitment<<Bls12_381 as Pairing>::$group_affine>, comm);

            let mut chal_bytes = vec![];
            comm.challenge_contribution(&mut chal_bytes).unwrap();
            let challenge = compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes);

            let resp = comm.response(&witnesses, &challenge).unwrap();
            resp.is_valid(&bases, &y, &comm.t, &challenge).unwrap();
            test_serialization!(SchnorrResponse<<Bls12_381 as Pairing>::$group_affine>, resp);

            // Wrong challenge or witness fails
            assert!(resp
                .is_valid(&bases, &y, &comm.t, &Fr::rand(&mut rng))
                .is_err());
            let mut wrong_witnesses = witnesses.clone();
            wrong_witnesses[3] = Fr::rand(&mut rng);
            let resp = comm.response(&wrong_witnesses, &challenge).unwrap();
            assert!(resp.is_valid(&bases, &y, &comm.t, &challenge).is_err());

            assert!(resp.get_response(count).is_err());
            assert!(comm.response(&witnesses[1..], &challenge).is_err());
            assert!(SchnorrCommitment::new(&bases[1..], witnesses.clone()).is_err());
        };
    }

    #[test]
    fn schnorr_vector() {
        test_schnorr_in_group!(G1Affine);
        test_schnorr_in_group!(G2Affine);
    }

    #[test]
    fn same_blinding_gives_same_response() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let bases_1 = (0..3)
            .map(|_| <Bls12_381 as Pairing>::G1Affine::rand(&mut rng))
            .collect::<Vec<_>>();
        let bases_2 = (0..2)
            .map(|_| <Bls12_381 as Pairing>::G1Affine::rand(&mut rng))
            .collect::<Vec<_>>();
        let shared_witness = Fr::rand(&mut rng);
        let shared_blinding = Fr::rand(&mut rng);

        let comm_1 = SchnorrCommitment::new(
            &bases_1,
            vec![Fr::rand(&mut rng), shared_blinding, Fr::rand(&mut rng)],
        )
        .unwrap();
        let comm_2 =
            SchnorrCommitment::new(&bases_2, vec![shared_blinding, Fr::rand(&mut rng)]).unwrap();
        let challenge = Fr::rand(&mut rng);
        let resp_1 = comm_1
            .response(
                &[Fr::rand(&mut rng), shared_witness, Fr::rand(&mut rng)],
                &challenge,
            )
            .unwrap();
        let resp_2 = comm_2
            .response(&[shared_witness, Fr::rand(&mut rng)], &challenge)
            .unwrap();
        assert_eq!(resp_1.get_response(1).unwrap(), resp_2.get_response(0).unwrap());
    }
}
