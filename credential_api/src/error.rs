use ark_serialize::SerializationError;
use ark_std::fmt::{self, Debug, Display};
use bbs_plus::prelude::BBSPlusError;
use proof_system::prelude::ProofSystemError;
use serde::{Deserialize, Serialize};
use vb_accumulator::prelude::VBAccumulatorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// Wrong count of messages or generators, bytes of a wrong length or an argument unusable otherwise
    InvalidInput(String),
    /// Bytes don't decode to the expected object
    DecodingError(String),
    /// Element is already a member of the accumulator
    DuplicateElement,
    /// Element is not a member of the accumulator
    NotAMember,
    /// Witness equality refers to a statement or a witness that doesn't exist, or to a witness already in
    /// another equality. Contains the statement and witness index.
    InvalidWireReference(usize, usize),
    /// Statement refers to a setup param that doesn't exist or has an incompatible type. Contains the index
    /// into the setup params.
    InvalidSetupParamRef(usize),
    /// Witnesses required to be equal are not equal
    EqualityViolation(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(s) => write!(f, "invalid input: {}", s),
            Self::DecodingError(s) => write!(f, "decoding error: {}", s),
            Self::DuplicateElement => write!(f, "element already present in the accumulator"),
            Self::NotAMember => write!(f, "element not present in the accumulator"),
            Self::InvalidWireReference(s, w) => {
                write!(f, "invalid witness reference ({}, {})", s, w)
            }
            Self::InvalidSetupParamRef(i) => write!(f, "invalid setup param reference {}", i),
            Self::EqualityViolation(s) => write!(f, "witness equality violated: {}", s),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SerializationError> for ApiError {
    fn from(e: SerializationError) -> Self {
        Self::DecodingError(format!("{:?}", e))
    }
}

impl From<BBSPlusError> for ApiError {
    fn from(e: BBSPlusError) -> Self {
        match e {
            BBSPlusError::Serialization(e) => e.into(),
            e => Self::InvalidInput(format!("{:?}", e)),
        }
    }
}

impl From<VBAccumulatorError> for ApiError {
    fn from(e: VBAccumulatorError) -> Self {
        match e {
            VBAccumulatorError::ElementPresent => Self::DuplicateElement,
            VBAccumulatorError::ElementAbsent => Self::NotAMember,
            VBAccumulatorError::Serialization(e) => e.into(),
            e => Self::InvalidInput(format!("{:?}", e)),
        }
    }
}

impl From<ProofSystemError> for ApiError {
    fn from(e: ProofSystemError) -> Self {
        match e {
            ProofSystemError::InvalidWitnessRef(s, w)
            | ProofSystemError::WitnessRefInMultipleEqualities((s, w), _, _) => {
                Self::InvalidWireReference(s, w)
            }
            ProofSystemError::InvalidSetupParamsIndex(i)
            | ProofSystemError::IncompatibleBBSPlusSetupParamAtIndex(i)
            | ProofSystemError::IncompatibleAccumulatorSetupParamAtIndex(i)
            | ProofSystemError::IncompatiblePedCommSetupParamAtIndex(i) => Self::InvalidSetupParamRef(i),
            ProofSystemError::UnequalWitnessesInEquality(w1, w2) => Self::EqualityViolation(
                format!("witness {:?} is not equal to witness {:?}", w1, w2),
            ),
            ProofSystemError::Serialization(e) => e.into(),
            ProofSystemError::BBSPlus(e) => e.into(),
            ProofSystemError::VBAccumulator(e) => e.into(),
            e => Self::InvalidInput(format!("{:?}", e)),
        }
    }
}

/// Outcome of a verification. A failed verification is not an error and `error` only explains
/// why `verified` is false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
    pub error: Option<String>,
}

impl VerifyResponse {
    pub fn success() -> Self {
        Self {
            verified: true,
            error: None,
        }
    }

    pub fn failure<E: Debug>(error: E) -> Self {
        Self {
            verified: false,
            error: Some(format!("{:?}", error)),
        }
    }

    /// True when verification succeeded
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}

impl<E: Debug> From<Result<(), E>> for VerifyResponse {
    fn from(r: Result<(), E>) -> Self {
        match r {
            Ok(_) => Self::success(),
            Err(e) => Self::failure(e),
        }
    }
}

impl From<bool> for VerifyResponse {
    fn from(verified: bool) -> Self {
        if verified {
            Self::success()
        } else {
            Self {
                verified: false,
                error: None,
            }
        }
    }
}
