use ark_serialize::SerializationError;
use ark_std::{fmt::Debug, string::String};
use bbs_plus::prelude::BBSPlusError;
use schnorr_pok::error::SchnorrError;
use vb_accumulator::prelude::VBAccumulatorError;

use crate::meta_statement::WitnessRef;

#[derive(Debug)]
pub enum ProofSystemError {
    UnequalWitnessAndStatementCount(usize, usize),
    UnequalProofAndStatementCount(usize, usize),
    /// Witness at the given index has a different kind than the statement. Contains statement index,
    /// statement kind and witness kind.
    WitnessIncompatibleWithStatement(usize, String, String),
    ProofIncompatibleWithStatement(usize, String, String),
    /// Index into the setup params is out of range
    InvalidSetupParamsIndex(usize),
    IncompatibleBBSPlusSetupParamAtIndex(usize),
    IncompatibleAccumulatorSetupParamAtIndex(usize),
    IncompatiblePedCommSetupParamAtIndex(usize),
    /// Statement index or wire index of a witness reference does not exist in the statement's witness layout
    InvalidWitnessRef(usize, usize),
    WitnessEqualityWithFewerThanTwoWitnesses(usize),
    /// Witness reference used by 2 equalities, given by their meta statement indices. Such equalities
    /// must be combined into one by the caller.
    WitnessRefInMultipleEqualities(WitnessRef, usize, usize),
    /// Prover's witnesses differ for the given references though the meta statement requires them equal
    UnequalWitnessesInEquality(WitnessRef, WitnessRef),
    /// Responses for the given references differ in the proof though the meta statement requires them equal
    WitnessResponseNotEqual(WitnessRef, WitnessRef),
    SubProtocolNotReadyToGenerateChallenge(usize),
    SubProtocolAlreadyInitialized(usize),
    SubProtocolNotReadyToGenerateProof(usize),
    /// Witness of the BBS+ statement has neither revealed nor unrevealed message at this index
    BBSPlusProtocolMessageAbsent(usize, usize),
    /// Message index of the BBS+ statement is revealed by the statement and also given as unrevealed in the witness
    BBSPlusMessageRevealedAndHidden(usize, usize),
    /// Pedersen commitment witness has a different number of scalars than the bases
    PedersenCommitmentWitnessLength(usize, usize, usize),
    InvalidStatement,
    BBSPlusProofContributionFailed(usize, BBSPlusError),
    VBAccumProofContributionFailed(usize, VBAccumulatorError),
    SchnorrProofContributionFailed(usize, SchnorrError),
    BBSPlus(BBSPlusError),
    VBAccumulator(VBAccumulatorError),
    Schnorr(SchnorrError),
    Serialization(SerializationError),
}

impl From<SchnorrError> for ProofSystemError {
    fn from(e: SchnorrError) -> Self {
        Self::Schnorr(e)
    }
}

impl From<BBSPlusError> for ProofSystemError {
    fn from(e: BBSPlusError) -> Self {
        Self::BBSPlus(e)
    }
}

impl From<VBAccumulatorError> for ProofSystemError {
    fn from(e: VBAccumulatorError) -> Self {
        Self::VBAccumulator(e)
    }
}

impl From<SerializationError> for ProofSystemError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
