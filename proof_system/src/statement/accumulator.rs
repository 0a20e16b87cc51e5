//! Membership and non-membership of a hidden element in a VB accumulator. Both statements share one
//! layout and differ only in the proving key, which also decides the `Statement` variant.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    error::ProofSystemError,
    setup_params::{ParamSource, SetupParam, SetupParams},
    statement::Statement,
};
use credential_utils::serde_utils::ArkObjectBytes;
use vb_accumulator::prelude::{
    MembershipProvingKey, NonMembershipProvingKey, PublicKey, SetupParams as AccumParams,
};

/// Proving key of an accumulator statement
pub trait AccumulatorProvingKey<E: Pairing>: SetupParam + Sized {
    fn into_statement(statement: AccumulatorStatement<E, Self>) -> Statement<E>;

    fn from_setup_params(setup_param: &SetupParams<E>) -> Option<&Self>;
}

impl<E: Pairing> AccumulatorProvingKey<E> for MembershipProvingKey<E::G1Affine> {
    fn into_statement(statement: AccumulatorStatement<E, Self>) -> Statement<E> {
        Statement::AccumulatorMembership(statement)
    }

    fn from_setup_params(setup_param: &SetupParams<E>) -> Option<&Self> {
        match setup_param {
            SetupParams::VbAccumulatorMemProvingKey(k) => Some(k),
            _ => None,
        }
    }
}

impl<E: Pairing> AccumulatorProvingKey<E> for NonMembershipProvingKey<E::G1Affine> {
    fn into_statement(statement: AccumulatorStatement<E, Self>) -> Statement<E> {
        Statement::AccumulatorNonMembership(statement)
    }

    fn from_setup_params(setup_param: &SetupParams<E>) -> Option<&Self> {
        match setup_param {
            SetupParams::VbAccumulatorNonMemProvingKey(k) => Some(k),
            _ => None,
        }
    }
}

/// The accumulated value the hidden element is proven against, with the accumulator's params, public key
/// and the proving key. The element is the only witness, at index 0.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct AccumulatorStatement<E: Pairing, K: AccumulatorProvingKey<E>> {
    #[serde_as(as = "ArkObjectBytes")]
    pub accumulator_value: E::G1Affine,
    pub params: ParamSource<AccumParams<E>>,
    pub public_key: ParamSource<PublicKey<E>>,
    pub proving_key: ParamSource<K>,
}

pub type AccumulatorMembership<E> =
    AccumulatorStatement<E, MembershipProvingKey<<E as Pairing>::G1Affine>>;

/// Only universal accumulators support non-membership
pub type AccumulatorNonMembership<E> =
    AccumulatorStatement<E, NonMembershipProvingKey<<E as Pairing>::G1Affine>>;

impl<E: Pairing, K: AccumulatorProvingKey<E>> AccumulatorStatement<E, K> {
    pub fn new_statement(
        params: ParamSource<AccumParams<E>>,
        public_key: ParamSource<PublicKey<E>>,
        proving_key: ParamSource<K>,
        accumulator_value: E::G1Affine,
    ) -> Statement<E> {
        K::into_statement(Self {
            accumulator_value,
            params,
            public_key,
            proving_key,
        })
    }

    pub fn new_statement_from_params(
        params: AccumParams<E>,
        public_key: PublicKey<E>,
        proving_key: K,
        accumulator_value: E::G1Affine,
    ) -> Statement<E> {
        Self::new_statement(
            ParamSource::Inline(params),
            ParamSource::Inline(public_key),
            ParamSource::Inline(proving_key),
            accumulator_value,
        )
    }

    pub fn new_statement_from_params_ref(
        params_ref: usize,
        public_key_ref: usize,
        proving_key_ref: usize,
        accumulator_value: E::G1Affine,
    ) -> Statement<E> {
        Self::new_statement(
            ParamSource::Ref(params_ref),
            ParamSource::Ref(public_key_ref),
            ParamSource::Ref(proving_key_ref),
            accumulator_value,
        )
    }

    pub fn get_params<'a>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a AccumParams<E>, ProofSystemError> {
        self.params.resolve(
            setup_params,
            setup_param_of!(VbAccumulatorParams),
            ProofSystemError::IncompatibleAccumulatorSetupParamAtIndex,
        )
    }

    pub fn get_public_key<'a>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a PublicKey<E>, ProofSystemError> {
        self.public_key.resolve(
            setup_params,
            setup_param_of!(VbAccumulatorPublicKey),
            ProofSystemError::IncompatibleAccumulatorSetupParamAtIndex,
        )
    }

    pub fn get_proving_key<'a>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a K, ProofSystemError> {
        self.proving_key.resolve(
            setup_params,
            K::from_setup_params,
            ProofSystemError::IncompatibleAccumulatorSetupParamAtIndex,
        )
    }
}
