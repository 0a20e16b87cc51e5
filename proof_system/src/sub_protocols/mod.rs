pub mod accumulator;
pub mod bbs_plus;
pub mod schnorr;

use ark_ec::pairing::Pairing;
use ark_std::io::Write;

use crate::{error::ProofSystemError, statement_proof::StatementProof};
use accumulator::{AccumulatorMembershipSubProtocol, AccumulatorNonMembershipSubProtocol};
use self::bbs_plus::PoKBBSSigG1SubProtocol;
use schnorr::SchnorrProtocol;

/// Various sub-protocols that are executed to create a `StatementProof` which are then combined to
/// form a `Proof`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubProtocol<'a, E: Pairing> {
    PoKBBSSignatureG1(PoKBBSSigG1SubProtocol<'a, E>),
    AccumulatorMembership(AccumulatorMembershipSubProtocol<'a, E>),
    AccumulatorNonMembership(AccumulatorNonMembershipSubProtocol<'a, E>),
    PoKDiscreteLogs(SchnorrProtocol<'a, E::G1Affine>),
    PoKDiscreteLogsG2(SchnorrProtocol<'a, E::G2Affine>),
}

impl<'a, E: Pairing> SubProtocol<'a, E> {
    pub fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), ProofSystemError> {
        match self {
            Self::PoKBBSSignatureG1(s) => s.challenge_contribution(writer),
            Self::AccumulatorMembership(s) => s.challenge_contribution(writer),
            Self::AccumulatorNonMembership(s) => s.challenge_contribution(writer),
            Self::PoKDiscreteLogs(s) => s.challenge_contribution(writer),
            Self::PoKDiscreteLogsG2(s) => s.challenge_contribution(writer),
        }
    }

    pub fn gen_proof_contribution(
        &mut self,
        challenge: &E::ScalarField,
    ) -> Result<StatementProof<E>, ProofSystemError> {
        match self {
            Self::PoKBBSSignatureG1(s) => s.gen_proof_contribution(challenge),
            Self::AccumulatorMembership(s) => s.gen_proof_contribution(challenge),
            Self::AccumulatorNonMembership(s) => s.gen_proof_contribution(challenge),
            Self::PoKDiscreteLogs(s) => Ok(StatementProof::PedersenCommitment(
                s.gen_proof_contribution_as_struct(challenge)?,
            )),
            Self::PoKDiscreteLogsG2(s) => Ok(StatementProof::PedersenCommitmentG2(
                s.gen_proof_contribution_as_struct(challenge)?,
            )),
        }
    }
}
