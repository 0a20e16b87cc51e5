use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Same};

use crate::{
    error::ProofSystemError,
    setup_params::{ParamSource, SetupParams},
    statement::Statement,
};
use bbs_plus::prelude::{PublicKeyG2, SignatureParamsG1};
use credential_utils::serde_utils::ArkObjectBytes;

/// Knowledge of a BBS+ signature in G1 over messages of which those in `revealed_messages` are disclosed.
/// The other messages are the statement's witnesses, each referenced by its message index.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PoKBBSSignatureG1<E: Pairing> {
    #[serde_as(as = "BTreeMap<Same, ArkObjectBytes>")]
    pub revealed_messages: BTreeMap<usize, E::ScalarField>,
    pub signature_params: ParamSource<SignatureParamsG1<E>>,
    pub public_key: ParamSource<PublicKeyG2<E>>,
}

impl<E: Pairing> PoKBBSSignatureG1<E> {
    pub fn new_statement(
        signature_params: ParamSource<SignatureParamsG1<E>>,
        public_key: ParamSource<PublicKeyG2<E>>,
        revealed_messages: BTreeMap<usize, E::ScalarField>,
    ) -> Statement<E> {
        Statement::PoKBBSSignatureG1(Self {
            revealed_messages,
            signature_params,
            public_key,
        })
    }

    pub fn new_statement_from_params(
        signature_params: SignatureParamsG1<E>,
        public_key: PublicKeyG2<E>,
        revealed_messages: BTreeMap<usize, E::ScalarField>,
    ) -> Statement<E> {
        Self::new_statement(
            ParamSource::Inline(signature_params),
            ParamSource::Inline(public_key),
            revealed_messages,
        )
    }

    /// Both the params and the key are looked up in the `ProofSpec`'s setup params by index, so several
    /// statements about credentials of one issuer can share them.
    pub fn new_statement_from_params_ref(
        signature_params_ref: usize,
        public_key_ref: usize,
        revealed_messages: BTreeMap<usize, E::ScalarField>,
    ) -> Statement<E> {
        Self::new_statement(
            ParamSource::Ref(signature_params_ref),
            ParamSource::Ref(public_key_ref),
            revealed_messages,
        )
    }

    pub fn get_sig_params<'a>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a SignatureParamsG1<E>, ProofSystemError> {
        self.signature_params.resolve(
            setup_params,
            setup_param_of!(BBSPlusSignatureParams),
            ProofSystemError::IncompatibleBBSPlusSetupParamAtIndex,
        )
    }

    pub fn get_public_key<'a>(
        &'a self,
        setup_params: &'a [SetupParams<E>],
    ) -> Result<&'a PublicKeyG2<E>, ProofSystemError> {
        self.public_key.resolve(
            setup_params,
            setup_param_of!(BBSPlusPublicKey),
            ProofSystemError::IncompatibleBBSPlusSetupParamAtIndex,
        )
    }
}
