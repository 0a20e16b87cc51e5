use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use credential_utils::signature::MessageIndexError;
use schnorr_pok::error::SchnorrError;

#[derive(Debug)]
pub enum BBSPlusError {
    CannotInvert0,
    NoMessageToSign,
    /// Number of messages given and number of messages supported by the params
    MessageCountIncompatibleWithSigParams(usize, usize),
    /// Signature's `A` is 0
    ZeroSignature,
    InvalidSignature,
    /// Pairing check failed during verification of proof of knowledge of signature
    PairingCheckFailed,
    /// 1st schnorr proof failed during verification of proof of knowledge of signature
    FirstSchnorrVerificationFailed,
    /// 2nd schnorr proof failed during verification of proof of knowledge of signature
    SecondSchnorrVerificationFailed,
    InvalidMsgIdxForResponse(usize),
    /// Message index is not less than the number of messages supported by the params
    InvalidMessageIdx(usize),
    /// Blinding was provided for a message that is being revealed
    BlindingForRevealedMessage(usize),
    /// Params can only be extended to support more messages. Contains the current and requested count.
    CannotReduceMessageCount(usize, usize),
    Serialization(SerializationError),
    SchnorrError(SchnorrError),
}

impl From<SchnorrError> for BBSPlusError {
    fn from(e: SchnorrError) -> Self {
        Self::SchnorrError(e)
    }
}

impl From<SerializationError> for BBSPlusError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

impl From<MessageIndexError> for BBSPlusError {
    fn from(e: MessageIndexError) -> Self {
        match e {
            MessageIndexError::OutOfRange(i) => Self::InvalidMessageIdx(i),
            MessageIndexError::BlindingForRevealedMessage(i) => Self::BlindingForRevealedMessage(i),
        }
    }
}
