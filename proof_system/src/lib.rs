#![cfg_attr(not(feature = "std"), no_std)]

//! Create and combine zero knowledge proofs by executing several protocols as sub-protocols under
//! one Fiat-Shamir challenge.
//!
//! Each relation to be proved is a [`Statement`] and relations between [`Statement`]s are
//! [`MetaStatement`]s. Both carry only public information and are grouped in a [`ProofSpec`] which
//! unambiguously defines what is being proven. The proof spec also holds a table of [`SetupParams`] that
//! statements can refer to by index rather than each carrying their own copy. The prover supplies one
//! [`Witness`] per [`Statement`] and gets a [`Proof`] with one [`StatementProof`] per [`Statement`], in
//! the same order. The verifier uses the same [`ProofSpec`] to check the [`Proof`].
//!
//! Supported statements:
//! - proof of knowledge of a BBS+ signature with some messages revealed
//! - accumulator membership and non-membership
//! - proof of knowledge of the opening of a Pedersen commitment in group G1 or G2
//!
//! The only meta statement is witness equality. Witnesses declared equal get the same blinding so that
//! the verifier can check their Schnorr responses for equality. See the tests for combining BBS+
//! signatures with accumulators and for requesting a blind BBS+ signature.
//!
//! [`Statement`]: crate::statement::Statement
//! [`MetaStatement`]: crate::meta_statement::MetaStatement
//! [`ProofSpec`]: crate::proof_spec::ProofSpec
//! [`SetupParams`]: crate::setup_params::SetupParams
//! [`Witness`]: crate::witness::Witness
//! [`StatementProof`]: crate::statement_proof::StatementProof
//! [`Proof`]: crate::proof::Proof

#[macro_use]
mod macros;

pub mod error;
pub mod meta_statement;
pub mod proof;
pub mod proof_spec;
mod prover;
pub mod setup_params;
pub mod statement;
pub mod statement_proof;
pub mod sub_protocols;
mod verifier;
pub mod witness;

pub mod prelude {
    pub use crate::{
        error::ProofSystemError,
        meta_statement::*,
        proof::*,
        proof_spec::*,
        setup_params::*,
        statement::{
            accumulator::{
                AccumulatorMembership as AccumulatorMembershipStmt,
                AccumulatorNonMembership as AccumulatorNonMembershipStmt,
            },
            bbs_plus::PoKBBSSignatureG1 as PoKBBSSignatureG1Stmt,
            ped_comm::PedersenCommitment as PedersenCommitmentStmt,
            Statement, Statements,
        },
        statement_proof::*,
        witness::*,
    };
}

#[cfg(test)]
pub(crate) use credential_utils::test_serialization;
