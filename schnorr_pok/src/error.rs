use ark_serialize::SerializationError;
use ark_std::fmt::Debug;

#[derive(Debug)]
pub enum SchnorrError {
    /// Lengths of bases, blindings, witnesses or responses differ. Contains both lengths.
    ExpectedSameSizeSequences(usize, usize),
    /// Asked for response of a witness that doesn't exist. Contains index and number of responses.
    IndexOutOfBounds(usize, usize),
    InvalidResponse,
    Serialization(SerializationError),
}

impl From<SerializationError> for SchnorrError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
