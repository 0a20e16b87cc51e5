#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Dynamic positive and universal accumulators from the paper [Dynamic Universal Accumulator with Batch Update over Bilinear Groups](https://eprint.iacr.org/2020/777)
//!
//! - [`PositiveAccumulator`] supports membership witnesses and proofs.
//! - [`UniversalAccumulator`] additionally supports non-membership witnesses and proofs. Its initial elements include
//!   a fixed public set from [`universal_init_constants`].
//! - [`MembershipProofProtocol`] and [`NonMembershipProofProtocol`] prove knowledge of a (non)member and its witness
//!   without revealing either.
//!
//! Both accumulators support single and batch additions and removals. Both witness kinds can be updated by the
//! accumulator manager using the secret key or by the holder using the public [`Omega`] published after a batch.
//! The common logic lives in the traits [`Accumulator`] and [`Witness`].
//! Variable names follow the paper and thus break Rust's naming conventions at places.
//!
//! [`Accumulator`]: crate::positive::Accumulator
//! [`PositiveAccumulator`]: crate::positive::PositiveAccumulator
//! [`UniversalAccumulator`]: crate::universal::UniversalAccumulator
//! [`Witness`]: crate::witness::Witness
//! [`Omega`]: crate::batch_utils::Omega
//! [`MembershipProofProtocol`]: crate::proofs::MembershipProofProtocol
//! [`NonMembershipProofProtocol`]: crate::proofs::NonMembershipProofProtocol

pub mod batch_utils;
pub mod error;
pub mod persistence;
pub mod positive;
pub mod proofs;
pub mod setup;
pub mod universal;
pub mod universal_init_constants;
pub mod witness;

pub mod prelude {
    pub use crate::{
        batch_utils::Omega,
        error::VBAccumulatorError,
        persistence::{InitialElementsStore, State, UniversalAccumulatorState},
        positive::{Accumulator, PositiveAccumulator},
        proofs::{
            MembershipProof, MembershipProofProtocol, NonMembershipProof,
            NonMembershipProofProtocol,
        },
        setup::*,
        universal::UniversalAccumulator,
        witness::{MembershipWitness, NonMembershipWitness, Witness},
    };
}

#[cfg(test)]
pub(crate) use credential_utils::test_serialization;
