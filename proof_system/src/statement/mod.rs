use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Serialize};

pub mod accumulator;
pub mod bbs_plus;
pub mod ped_comm;

/// Type of relation being proved and the public values for the relation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Statement<E: Pairing> {
    /// Proof of knowledge of BBS+ signature
    PoKBBSSignatureG1(bbs_plus::PoKBBSSignatureG1<E>),
    /// Membership in Accumulator
    AccumulatorMembership(accumulator::AccumulatorMembership<E>),
    /// Non-membership in Accumulator
    AccumulatorNonMembership(accumulator::AccumulatorNonMembership<E>),
    /// For proof of knowledge of committed elements in a Pedersen commitment in group G1
    PedersenCommitment(ped_comm::PedersenCommitment<E::G1Affine>),
    /// For proof of knowledge of committed elements in a Pedersen commitment in group G2
    PedersenCommitmentG2(ped_comm::PedersenCommitment<E::G2Affine>),
}

/// A collection of statements
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Statements<E: Pairing>(pub Vec<Statement<E>>);

impl<E: Pairing> Statement<E> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PoKBBSSignatureG1(_) => "PoKBBSSignatureG1",
            Self::AccumulatorMembership(_) => "AccumulatorMembership",
            Self::AccumulatorNonMembership(_) => "AccumulatorNonMembership",
            Self::PedersenCommitment(_) => "PedersenCommitment",
            Self::PedersenCommitmentG2(_) => "PedersenCommitmentG2",
        }
    }
}

impl<E: Pairing> Statements<E> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a statement and return its index
    pub fn add(&mut self, item: Statement<E>) -> usize {
        self.0.push(item);
        self.0.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<E: Pairing> Default for Statements<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl_tagged_serialization!(Statement<E: Pairing> {
    PoKBBSSignatureG1 = 0u8,
    AccumulatorMembership = 1u8,
    AccumulatorNonMembership = 2u8,
    PedersenCommitment = 3u8,
    PedersenCommitmentG2 = 4u8,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{setup_params::ParamSource, test_serialization};
    use ark_bls12_381::{Bls12_381, Fr, G1Affine, G2Affine};
    use ark_std::{
        collections::BTreeMap,
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use ::bbs_plus::prelude::{KeypairG2, SignatureParamsG1};
    use blake2::Blake2b512;
    use vb_accumulator::prelude::{
        Keypair, MembershipProvingKey, NonMembershipProvingKey, SetupParams as AccumParams,
    };

    #[test]
    fn statement_serialization() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let sig_params = SignatureParamsG1::<Bls12_381>::new::<Blake2b512>(b"test", 5);
        let sig_keypair = KeypairG2::<Bls12_381>::generate_using_rng(&mut rng, &sig_params);
        let accum_params = AccumParams::<Bls12_381>::new::<Blake2b512>(b"test");
        let accum_keypair = Keypair::<Bls12_381>::generate_using_rng(&mut rng, &accum_params);
        let non_mem_prk = NonMembershipProvingKey::<G1Affine>::new::<Blake2b512>(b"test");
        let mem_prk: MembershipProvingKey<G1Affine> = non_mem_prk.derive_membership_proving_key();
        let accum_value = G1Affine::rand(&mut rng);

        let mut revealed = BTreeMap::new();
        revealed.insert(1, Fr::rand(&mut rng));
        revealed.insert(3, Fr::rand(&mut rng));

        let mut statements = Statements::<Bls12_381>::new();
        statements.add(bbs_plus::PoKBBSSignatureG1::new_statement_from_params(
            sig_params.clone(),
            sig_keypair.public_key.clone(),
            revealed.clone(),
        ));
        // Params carried inline and the key referenced
        statements.add(bbs_plus::PoKBBSSignatureG1::new_statement(
            ParamSource::Inline(sig_params),
            ParamSource::Ref(1),
            BTreeMap::new(),
        ));
        statements.add(bbs_plus::PoKBBSSignatureG1::new_statement_from_params_ref(
            0, 1, revealed,
        ));
        statements.add(
            accumulator::AccumulatorMembership::new_statement_from_params(
                accum_params.clone(),
                accum_keypair.public_key.clone(),
                mem_prk,
                accum_value,
            ),
        );
        statements.add(
            accumulator::AccumulatorNonMembership::new_statement_from_params(
                accum_params,
                accum_keypair.public_key.clone(),
                non_mem_prk,
                accum_value,
            ),
        );
        statements.add(
            accumulator::AccumulatorNonMembership::new_statement_from_params_ref(
                2, 3, 4, accum_value,
            ),
        );
        statements.add(ped_comm::PedersenCommitment::new_statement_from_params(
            vec![G1Affine::rand(&mut rng), G1Affine::rand(&mut rng)],
            G1Affine::rand(&mut rng),
        ));
        statements.add(ped_comm::PedersenCommitment::new_statement_from_params_g2(
            vec![G2Affine::rand(&mut rng), G2Affine::rand(&mut rng)],
            G2Affine::rand(&mut rng),
        ));
        statements.add(ped_comm::PedersenCommitment::new_statement_from_params_ref_g2(
            5,
            G2Affine::rand(&mut rng),
        ));

        for s in statements.0.iter() {
            let s = s.clone();
            test_serialization!(Statement<Bls12_381>, s);
        }
        test_serialization!(Statements<Bls12_381>, statements);
    }
}
