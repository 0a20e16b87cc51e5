//! Relations between the witnesses of different statements. Currently only equality of witnesses is supported.
//! A witness is referenced by the pair `(statement index, witness index within the statement)`. For a BBS+
//! statement, the witness index is the message index, for an accumulator statement it is always 0 (the member
//! or non-member) and for a Pedersen commitment it is the index of the committed scalar.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Reference to a witness described as the tuple (`statement_index`, `witness_index`)
pub type WitnessRef = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaStatement {
    WitnessEquality(EqualWitnesses),
}

#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct MetaStatements(pub Vec<MetaStatement>);

/// Set of witnesses that must be equal
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct EqualWitnesses(pub BTreeSet<WitnessRef>);

impl EqualWitnesses {
    pub fn is_valid(&self) -> bool {
        self.0.len() > 1
    }
}

impl MetaStatements {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(&mut self, item: MetaStatement) -> usize {
        self.0.push(item);
        self.0.len() - 1
    }

    /// Add an equality over the given witness references
    pub fn add_witness_equality(&mut self, equality: EqualWitnesses) -> usize {
        self.add(MetaStatement::WitnessEquality(equality))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn witness_equalities(&self) -> impl Iterator<Item = &EqualWitnesses> {
        self.0.iter().map(|stmt| match stmt {
            MetaStatement::WitnessEquality(eq_wits) => eq_wits,
        })
    }

    /// A witness reference used by more than one equality, along with the indices of the first 2 meta
    /// statements using it. Such equalities are not merged and the caller should reject them.
    pub fn shared_witness_ref(&self) -> Option<(WitnessRef, usize, usize)> {
        let mut seen = BTreeMap::<WitnessRef, usize>::new();
        for (i, eq_wits) in self.witness_equalities().enumerate() {
            for wr in eq_wits.0.iter() {
                if let Some(first) = seen.insert(*wr, i) {
                    return Some((*wr, first, i));
                }
            }
        }
        None
    }
}

impl Default for MetaStatements {
    fn default() -> Self {
        Self::new()
    }
}

impl_tagged_serialization!(MetaStatement {
    WitnessEquality = 0u8,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_serialization;

    fn eq(refs: &[WitnessRef]) -> MetaStatement {
        MetaStatement::WitnessEquality(EqualWitnesses(refs.iter().cloned().collect()))
    }

    #[test]
    fn equalities_sharing_a_reference() {
        let mut meta = MetaStatements::new();
        meta.add(eq(&[(0, 1), (1, 2)]));
        meta.add(eq(&[(2, 0), (3, 0)]));
        meta.add(eq(&[(4, 4), (5, 5)]));
        assert_eq!(meta.witness_equalities().count(), 3);
        assert_eq!(meta.shared_witness_ref(), None);
        test_serialization!(MetaStatements, meta);

        // Same statement but a different witness index is not shared
        meta.add(eq(&[(0, 2), (1, 1)]));
        assert_eq!(meta.shared_witness_ref(), None);

        meta.add(eq(&[(1, 2), (3, 0)]));
        assert_eq!(meta.shared_witness_ref(), Some(((1, 2), 0, 4)));

        // Reported against the earliest equality using it
        let mut meta = MetaStatements::new();
        meta.add(eq(&[(0, 0), (1, 0)]));
        meta.add(eq(&[(1, 0), (2, 0)]));
        meta.add(eq(&[(0, 0), (2, 0)]));
        assert_eq!(meta.shared_witness_ref(), Some(((1, 0), 0, 1)));

        assert!(!EqualWitnesses([(0, 0)].into_iter().collect()).is_valid());
    }
}
