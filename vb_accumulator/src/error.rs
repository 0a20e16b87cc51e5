#![allow(non_camel_case_types)]

use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use schnorr_pok::error::SchnorrError;

#[derive(Debug)]
pub enum VBAccumulatorError {
    /// Element is one of the initial elements of a universal accumulator and cannot be added or removed
    ProhibitedElement,
    /// No more elements can be added in the accumulator
    AccumulatorFull,
    /// The batch of updates if applied will make the accumulator larger than its max size.
    BatchExceedsAccumulatorCapacity,
    /// Element is already present in the accumulator
    ElementPresent,
    /// Element is already absent in the accumulator
    ElementAbsent,
    /// Witness of an element cannot be updated after that same element is removed
    NewElementSameAsCurrent,
    NeedSameNoOfElementsAndWitnesses,
    CannotBeZero,
    /// The sum of an element and the secret key is 0. Happens only if the element is the negated secret key.
    ElementIsNegatedSecretKey,
    /// One of the fixed initial elements of the universal accumulator could not be parsed for the scalar field
    InvalidFixedInitialElement(usize),
    SigmaResponseInvalid,
    RhoResponseInvalid,
    DeltaSigmaResponseInvalid,
    DeltaRhoResponseInvalid,
    PairingResponseInvalid,
    E_d_ResponseInvalid,
    E_d_inv_ResponseInvalid,
    Serialization(SerializationError),
    SchnorrError(SchnorrError),
}

impl From<SchnorrError> for VBAccumulatorError {
    fn from(e: SchnorrError) -> Self {
        Self::SchnorrError(e)
    }
}

impl From<SerializationError> for VBAccumulatorError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
