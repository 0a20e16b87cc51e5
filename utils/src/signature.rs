use ark_std::collections::{BTreeMap, BTreeSet};

/// Trait implemented by a signature scheme params that can sign multiple messages
pub trait MultiMessageSignatureParams {
    /// Number of messages supported in the multi-message
    fn supported_message_count(&self) -> usize;
}

/// Reason why a message index cannot be used while proving knowledge of a multi-message signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageIndexError {
    /// Index is not less than the number of messages
    OutOfRange(usize),
    /// A blinding was given for a message that is to be revealed
    BlindingForRevealedMessage(usize),
}

/// Checks that revealed message indices and indices of the explicitly given blindings are within
/// `message_count` and that no blinding is given for a revealed message.
pub fn check_revealed_and_blinded_indices<T>(
    message_count: usize,
    revealed: &BTreeSet<usize>,
    blindings: &BTreeMap<usize, T>,
) -> Result<(), MessageIndexError> {
    if let Some(i) = revealed
        .iter()
        .chain(blindings.keys())
        .find(|i| **i >= message_count)
    {
        return Err(MessageIndexError::OutOfRange(*i));
    }
    match blindings.keys().find(|i| revealed.contains(i)) {
        Some(i) => Err(MessageIndexError::BlindingForRevealedMessage(*i)),
        None => Ok(()),
    }
}
