//! Represents (public) setup parameters of different protocols. Setup parameters can be either directly
//! passed to a `Statement` or wrapped in the enum `SetupParams` and referenced by index from the `Statement`.
//! The latter avoids keeping several copies of a parameter (and serializing each) when many statements
//! share it, like several BBS+ signatures by the same issuer.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use bbs_plus::prelude::{PublicKeyG2 as BBSPublicKeyG2, SignatureParamsG1 as BBSSignatureParamsG1};
use credential_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vb_accumulator::prelude::{
    MembershipProvingKey, NonMembershipProvingKey, PublicKey as AccumPublicKey,
    SetupParams as AccumParams,
};

use crate::error::ProofSystemError;

/// Holds (public) setup parameters of different protocols.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum SetupParams<E: Pairing> {
    BBSPlusSignatureParams(BBSSignatureParamsG1<E>),
    BBSPlusPublicKey(BBSPublicKeyG2<E>),
    VbAccumulatorParams(AccumParams<E>),
    VbAccumulatorPublicKey(AccumPublicKey<E>),
    VbAccumulatorMemProvingKey(MembershipProvingKey<E::G1Affine>),
    VbAccumulatorNonMemProvingKey(NonMembershipProvingKey<E::G1Affine>),
    PedersenCommitmentKey(#[serde_as(as = "Vec<ArkObjectBytes>")] Vec<E::G1Affine>),
    PedersenCommitmentKeyG2(#[serde_as(as = "Vec<ArkObjectBytes>")] Vec<E::G2Affine>),
    Bytes(Vec<u8>),
    FieldElemVec(#[serde_as(as = "Vec<ArkObjectBytes>")] Vec<E::ScalarField>),
}

impl<E: Pairing> SetupParams<E> {
    /// Name of the variant, used in errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BBSPlusSignatureParams(_) => "BBSPlusSignatureParams",
            Self::BBSPlusPublicKey(_) => "BBSPlusPublicKey",
            Self::VbAccumulatorParams(_) => "VbAccumulatorParams",
            Self::VbAccumulatorPublicKey(_) => "VbAccumulatorPublicKey",
            Self::VbAccumulatorMemProvingKey(_) => "VbAccumulatorMemProvingKey",
            Self::VbAccumulatorNonMemProvingKey(_) => "VbAccumulatorNonMemProvingKey",
            Self::PedersenCommitmentKey(_) => "PedersenCommitmentKey",
            Self::PedersenCommitmentKeyG2(_) => "PedersenCommitmentKeyG2",
            Self::Bytes(_) => "Bytes",
            Self::FieldElemVec(_) => "FieldElemVec",
        }
    }
}

/// Anything usable as a parameter of a statement
pub trait SetupParam: CanonicalSerialize + CanonicalDeserialize {}

impl<T: CanonicalSerialize + CanonicalDeserialize> SetupParam for T {}

/// Where a statement gets one of its parameters from: carried in the statement itself or at an index
/// of the `ProofSpec`'s setup params.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum ParamSource<T: SetupParam> {
    Inline(#[serde_as(as = "ArkObjectBytes")] T),
    Ref(usize),
}

impl<T: SetupParam> ParamSource<T> {
    /// Get the parameter, looking up `setup_params` for a reference. `extract` returns the parameter if the
    /// referenced setup param is of the expected kind, else `incompatible` gives the error for the index.
    pub fn resolve<'a, E: Pairing>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
        extract: impl FnOnce(&'a SetupParams<E>) -> Option<&'a T>,
        incompatible: impl FnOnce(usize) -> ProofSystemError,
    ) -> Result<&'a T, ProofSystemError> {
        match self {
            Self::Inline(p) => Ok(p),
            Self::Ref(idx) => {
                let sp = setup_params
                    .get(*idx)
                    .ok_or(ProofSystemError::InvalidSetupParamsIndex(*idx))?;
                extract(sp).ok_or_else(|| incompatible(*idx))
            }
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Self::Ref(_))
    }
}

impl_tagged_serialization!(ParamSource<T: SetupParam> {
    Inline = 0u8,
    Ref = 1u8,
});

impl_tagged_serialization!(SetupParams<E: Pairing> {
    BBSPlusSignatureParams = 0u8,
    BBSPlusPublicKey = 1u8,
    VbAccumulatorParams = 2u8,
    VbAccumulatorPublicKey = 3u8,
    VbAccumulatorMemProvingKey = 4u8,
    VbAccumulatorNonMemProvingKey = 5u8,
    PedersenCommitmentKey = 6u8,
    PedersenCommitmentKeyG2 = 7u8,
    Bytes = 8u8,
    FieldElemVec = 9u8,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_serialization;
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use bbs_plus::prelude::KeypairG2;
    use blake2::Blake2b512;

    #[test]
    fn setup_params_serialization() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let sig_params = BBSSignatureParamsG1::<Bls12_381>::new::<Blake2b512>(b"test", 5);
        let keypair = KeypairG2::<Bls12_381>::generate_using_rng(&mut rng, &sig_params);
        let accum_params = AccumParams::<Bls12_381>::new::<Blake2b512>(b"test");
        let mem_prk = MembershipProvingKey::<G1Affine>::new::<Blake2b512>(b"test");

        let all = vec![
            SetupParams::BBSPlusSignatureParams(sig_params),
            SetupParams::BBSPlusPublicKey(keypair.public_key.clone()),
            SetupParams::VbAccumulatorParams(accum_params),
            SetupParams::VbAccumulatorMemProvingKey(mem_prk),
            SetupParams::PedersenCommitmentKey(vec![G1Affine::rand(&mut rng); 3]),
            SetupParams::Bytes(vec![1, 2, 3]),
            SetupParams::FieldElemVec(vec![Fr::rand(&mut rng), Fr::rand(&mut rng)]),
        ];
        for sp in all {
            test_serialization!(SetupParams<Bls12_381>, sp);
        }

        // Unknown tag
        let bytes = [200u8, 0, 0];
        assert!(SetupParams::<Bls12_381>::deserialize_compressed(&bytes[..]).is_err());
    }

    #[test]
    fn param_source_resolution() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key = vec![G1Affine::rand(&mut rng); 2];
        let setup_params = vec![
            SetupParams::<Bls12_381>::Bytes(vec![1]),
            SetupParams::PedersenCommitmentKey(key.clone()),
        ];
        let resolve = |src: &ParamSource<Vec<G1Affine>>| {
            src.resolve(
                &setup_params,
                setup_param_of!(PedersenCommitmentKey),
                ProofSystemError::IncompatiblePedCommSetupParamAtIndex,
            )
            .cloned()
        };

        let inline = ParamSource::Inline(key.clone());
        assert!(!inline.is_ref());
        assert_eq!(resolve(&inline).unwrap(), key);
        // Inline params are not looked up at all
        assert_eq!(
            inline
                .resolve::<Bls12_381>(&[], setup_param_of!(PedersenCommitmentKey), |_| {
                    ProofSystemError::InvalidStatement
                })
                .unwrap(),
            &key
        );

        let by_ref = ParamSource::Ref(1);
        assert!(by_ref.is_ref());
        assert_eq!(resolve(&by_ref).unwrap(), key);
        assert!(matches!(
            resolve(&ParamSource::Ref(0)),
            Err(ProofSystemError::IncompatiblePedCommSetupParamAtIndex(0))
        ));
        assert!(matches!(
            resolve(&ParamSource::Ref(2)),
            Err(ProofSystemError::InvalidSetupParamsIndex(2))
        ));

        test_serialization!(ParamSource<Vec<G1Affine>>, inline);
        test_serialization!(ParamSource<Vec<G1Affine>>, by_ref);
    }
}
