//! Storage the accumulator manager keeps beside an accumulator. The traits let a deployment
//! back them with a database, [`in_memory`] has hash set versions.

use ark_std::iter::Iterator;

/// Elements a universal accumulator is created with. They are never added or removed later and
/// are only needed by the manager.
pub trait InitialElementsStore<T> {
    fn add(&mut self, element: T);

    fn has(&self, element: &T) -> bool;
}

/// Current members of an accumulator, updated on every addition and removal
pub trait State<T> {
    fn add(&mut self, element: T);

    fn remove(&mut self, element: &T);

    fn has(&self, element: &T) -> bool;

    fn size(&self) -> u64;
}

/// Member store that can list its members, needed to compute `d` for non-membership witnesses
pub trait UniversalAccumulatorState<'a, T: 'a>: State<T> {
    type ElementIterator: Iterator<Item = &'a T>;

    fn elements(&'a self) -> Self::ElementIterator;
}

#[cfg(feature = "std")]
pub mod in_memory {
    use super::*;
    use std::{
        collections::{hash_set, HashSet},
        hash::Hash,
    };

    macro_rules! impl_hash_set_store {
        ($(#[$doc:meta])* $name:ident) => {
            $(#[$doc])*
            #[derive(Clone, Debug)]
            pub struct $name<T: Clone + Hash + Eq> {
                pub db: HashSet<T>,
            }

            impl<T: Clone + Hash + Eq> $name<T> {
                pub fn new() -> Self {
                    Self { db: HashSet::new() }
                }
            }

            impl<T: Clone + Hash + Eq> Default for $name<T> {
                fn default() -> Self {
                    Self::new()
                }
            }
        };
    }

    impl_hash_set_store!(
        /// Initial elements of a universal accumulator
        InMemoryInitialElements
    );
    impl_hash_set_store!(
        /// Members of an accumulator
        InMemoryState
    );

    impl<T: Clone + Hash + Eq> InitialElementsStore<T> for InMemoryInitialElements<T> {
        fn add(&mut self, element: T) {
            self.db.insert(element);
        }

        fn has(&self, element: &T) -> bool {
            self.db.contains(element)
        }
    }

    impl<T: Clone + Hash + Eq> State<T> for InMemoryState<T> {
        fn add(&mut self, element: T) {
            self.db.insert(element);
        }

        fn remove(&mut self, element: &T) {
            self.db.remove(element);
        }

        fn has(&self, element: &T) -> bool {
            self.db.contains(element)
        }

        fn size(&self) -> u64 {
            self.db.len() as u64
        }
    }

    impl<'a, T: Clone + Hash + Eq + 'a> UniversalAccumulatorState<'a, T> for InMemoryState<T> {
        type ElementIterator = hash_set::Iter<'a, T>;

        fn elements(&'a self) -> Self::ElementIterator {
            self.db.iter()
        }
    }

}
