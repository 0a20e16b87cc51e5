use ark_ec::AffineRepr;
use ark_serialize::CanonicalSerialize;
use ark_std::{
    cfg_iter_mut, collections::BTreeMap, io::Write, rand::RngCore, vec::Vec, UniformRand,
};
use schnorr_pok::{error::SchnorrError, SchnorrCommitment};
use zeroize::Zeroize;

use crate::{error::ProofSystemError, statement_proof::PedersenCommitmentProof};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Proof of knowledge of the opening of a Pedersen commitment, `commitment = commitment_key[0] * w_0 + ...`.
/// Used for commitments in both G1 and G2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchnorrProtocol<'a, G: AffineRepr> {
    pub id: usize,
    pub commitment_key: &'a [G],
    pub commitment: G,
    pub commitment_to_randomness: Option<SchnorrCommitment<G>>,
    pub witnesses: Option<Vec<G::ScalarField>>,
}

impl<'a, G: AffineRepr> SchnorrProtocol<'a, G> {
    pub fn new(id: usize, commitment_key: &'a [G], commitment: G) -> Self {
        Self {
            id,
            commitment_key,
            commitment,
            commitment_to_randomness: None,
            witnesses: None,
        }
    }

    /// `blindings` specifies the randomness to use. If some index is not present, new randomness is generated for it.
    pub fn init<R: RngCore>(
        &mut self,
        rng: &mut R,
        mut blindings: BTreeMap<usize, G::ScalarField>,
        witnesses: Vec<G::ScalarField>,
    ) -> Result<(), ProofSystemError> {
        if self.commitment_to_randomness.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(self.id));
        }
        if witnesses.len() != self.commitment_key.len() {
            return Err(ProofSystemError::PedersenCommitmentWitnessLength(
                self.id,
                self.commitment_key.len(),
                witnesses.len(),
            ));
        }
        let blindings = (0..witnesses.len())
            .map(|i| {
                blindings
                    .remove(&i)
                    .unwrap_or_else(|| G::ScalarField::rand(rng))
            })
            .collect::<Vec<_>>();
        self.commitment_to_randomness = Some(SchnorrCommitment::new(self.commitment_key, blindings)?);
        self.witnesses = Some(witnesses);
        Ok(())
    }

    pub fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), ProofSystemError> {
        let comm = self
            .commitment_to_randomness
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(self.id))?;
        Self::compute_challenge_contribution(self.commitment_key, &self.commitment, &comm.t, writer)
    }

    pub fn gen_proof_contribution_as_struct(
        &mut self,
        challenge: &G::ScalarField,
    ) -> Result<PedersenCommitmentProof<G>, ProofSystemError> {
        let commitment = self
            .commitment_to_randomness
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(self.id))?;
        let witnesses = self
            .witnesses
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(self.id))?;
        let responses = commitment.response(witnesses, challenge)?;
        Ok(PedersenCommitmentProof::new(commitment.t, responses))
    }

    pub fn verify_proof_contribution(
        &self,
        challenge: &G::ScalarField,
        proof: &PedersenCommitmentProof<G>,
    ) -> Result<(), SchnorrError> {
        proof
            .response
            .is_valid(self.commitment_key, &self.commitment, &proof.t, challenge)
    }

    /// Writes the commitment key, the commitment and the commitment to randomness, in that order
    pub fn compute_challenge_contribution<W: Write>(
        bases: &[G],
        y: &G,
        t: &G,
        mut writer: W,
    ) -> Result<(), ProofSystemError> {
        bases.serialize_compressed(&mut writer)?;
        y.serialize_compressed(&mut writer)?;
        t.serialize_compressed(writer)?;
        Ok(())
    }
}

impl<'a, G: AffineRepr> Zeroize for SchnorrProtocol<'a, G> {
    fn zeroize(&mut self) {
        if let Some(c) = self.commitment_to_randomness.as_mut() {
            c.zeroize()
        }
        if let Some(w) = self.witnesses.as_mut() {
            cfg_iter_mut!(w).for_each(|v| v.zeroize())
        }
    }
}

impl<'a, G: AffineRepr> Drop for SchnorrProtocol<'a, G> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use ark_ec::{CurveGroup, VariableBaseMSM};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use schnorr_pok::compute_random_oracle_challenge;

    macro_rules! check_pedersen {
        ($group: ident, $rng: ident) => {
            let count = 5;
            let bases = (0..count)
                .map(|_| $group::rand(&mut $rng))
                .collect::<Vec<_>>();
            let scalars = (0..count).map(|_| Fr::rand(&mut $rng)).collect::<Vec<_>>();
            let commitment =
                <$group as AffineRepr>::Group::msm_unchecked(&bases, &scalars).into_affine();

            let mut protocol = SchnorrProtocol::new(1, &bases, commitment);
            // Not initialized yet
            assert!(protocol.challenge_contribution(&mut Vec::<u8>::new()).is_err());
            protocol
                .init(&mut $rng, BTreeMap::new(), scalars.clone())
                .unwrap();
            assert!(protocol
                .init(&mut $rng, BTreeMap::new(), scalars.clone())
                .is_err());

            let mut chal_bytes = vec![];
            protocol.challenge_contribution(&mut chal_bytes).unwrap();
            let challenge = compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes);
            let proof = protocol.gen_proof_contribution_as_struct(&challenge).unwrap();
            // Responses can be generated only once
            assert!(protocol.gen_proof_contribution_as_struct(&challenge).is_err());

            let mut chal_bytes_verifier = vec![];
            SchnorrProtocol::compute_challenge_contribution(
                &bases,
                &commitment,
                &proof.t,
                &mut chal_bytes_verifier,
            )
            .unwrap();
            assert_eq!(chal_bytes, chal_bytes_verifier);
            protocol.verify_proof_contribution(&challenge, &proof).unwrap();
            assert!(protocol
                .verify_proof_contribution(&Fr::rand(&mut $rng), &proof)
                .is_err());

            // Wrong number of witnesses
            let mut protocol = SchnorrProtocol::new(2, &bases, commitment);
            assert!(matches!(
                protocol.init(&mut $rng, BTreeMap::new(), scalars[1..].to_vec()),
                Err(ProofSystemError::PedersenCommitmentWitnessLength(2, 5, 4))
            ));
        };
    }

    #[test]
    fn pedersen_commitment_in_both_groups() {
        let mut rng = StdRng::seed_from_u64(0u64);
        check_pedersen!(G1Affine, rng);
        check_pedersen!(G2Affine, rng);
    }
}
