#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! BBS+ signatures over a list of messages, following [Anonymous Attestation Using the Strong Diffie Hellman
//! Assumption Revisited](https://eprint.iacr.org/2016/663), with variable names taken from the paper.
//!
//! A signature lives in G1 with the public key in G2 or the other way round. [`setup`] creates the message
//! generators, deterministically from a label when they must be reproducible, and the keys. [`signature`]
//! signs and verifies, and lets the signer sign messages it only sees a commitment to. The holder unblinds
//! the result. [`proof`] has the holder prove knowledge of a G1 signature while revealing a subset of the
//! messages. It runs standalone or as a sub-protocol of a larger proof.
//!
//! [`setup`]: crate::setup
//! [`signature`]: crate::signature
//! [`proof`]: crate::proof

pub mod error;
pub mod proof;
pub mod setup;
pub mod signature;

pub mod prelude {
    pub use crate::{
        error::BBSPlusError,
        proof::{PoKOfSignatureG1Proof, PoKOfSignatureG1Protocol},
        setup::*,
        signature::{SignatureG1, SignatureG2},
    };
}

#[cfg(test)]
pub(crate) use credential_utils::test_serialization;
