#![allow(non_snake_case)]

//! A dynamic positive accumulator supporting only membership. Described in sections 2 and 3 of the paper.
//! # Examples
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use vb_accumulator::setup::{Keypair, SetupParams};
//! use vb_accumulator::positive::{PositiveAccumulator, Accumulator};
//! use vb_accumulator::persistence::State;
//!
//! let params = SetupParams::<Bls12_381>::generate_using_rng(&mut rng);
//! let keypair = Keypair::<Bls12_381>::generate_using_rng(&mut rng, &params);
//!
//! let accumulator = PositiveAccumulator::initialize(&params);
//!
//! // `state` should be a persistent database implementing the trait `State`
//! let new_accumulator = accumulator.add(elem, &keypair.secret_key, &mut state).unwrap();
//! let new_accumulator = new_accumulator.remove(&elem, &keypair.secret_key, &mut state).unwrap();
//!
//! // Or add and remove batches in one call
//! let new_accumulator = accumulator
//!     .batch_updates(additions, &removals, &keypair.secret_key, &mut state)
//!     .unwrap();
//!
//! let m_wit = new_accumulator
//!     .get_membership_witness(&member, &keypair.secret_key, &state)
//!     .unwrap();
//! assert!(new_accumulator.verify_membership(&member, &m_wit, &keypair.public_key, &params));
//! ```

use crate::{
    batch_utils::Poly_d,
    error::VBAccumulatorError,
    persistence::State,
    setup::{PublicKey, SecretKey, SetupParams},
    witness::MembershipWitness,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{batch_inversion, Field, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, end_timer, start_timer, vec::Vec};
use credential_utils::{
    msm::multiply_field_elems_with_same_group_elem, serde_utils::ArkObjectBytes,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Accumulator supporting only membership proofs. For more docs, check [`Accumulator`]
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PositiveAccumulator<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

/// `1/(element + sk)`
pub(crate) fn inverse_of_element_plus_sk<F: PrimeField>(
    element: &F,
    sk: &SecretKey<F>,
) -> Result<F, VBAccumulatorError> {
    (*element + sk.0)
        .inverse()
        .ok_or(VBAccumulatorError::ElementIsNegatedSecretKey)
}

/// Common functionality of the positive and universal accumulator.
///
/// Methods changing or reading the accumulator's members take a reference to [`State`], the database tracking
/// the members. The `_compute_*` methods contain only the math of an operation and neither check nor modify
/// `State`. They are for callers which cannot make the database available to this code. Such callers must do the
/// checks themselves as the math alone will, for example, happily create a valid membership witness for an element
/// that was never added.
pub trait Accumulator<E: Pairing> {
    /// The accumulated value of all the members. It is considered a digest of state of the accumulator
    fn value(&self) -> &E::G1Affine;

    /// Fails with `ElementPresent` if the element is already a member
    fn check_before_add(
        &self,
        element: &E::ScalarField,
        state: &dyn State<E::ScalarField>,
    ) -> Result<(), VBAccumulatorError> {
        if state.has(element) {
            return Err(VBAccumulatorError::ElementPresent);
        }
        Ok(())
    }

    /// Fails with `ElementAbsent` if the element is not a member
    fn check_before_remove(
        &self,
        element: &E::ScalarField,
        state: &dyn State<E::ScalarField>,
    ) -> Result<(), VBAccumulatorError> {
        if !state.has(element) {
            return Err(VBAccumulatorError::ElementAbsent);
        }
        Ok(())
    }

    /// New accumulated value after adding `element` as `(element + sk) * V`. Also returns the multiplier `element + sk`
    fn _compute_new_post_add(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> (E::ScalarField, E::G1Affine) {
        let y_plus_alpha = *element + sk.0;
        let new_V = self.value().mul_bigint(y_plus_alpha.into_bigint()).into_affine();
        (y_plus_alpha, new_V)
    }

    fn _add(
        &self,
        element: E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        self.check_before_add(&element, state)?;
        let t = self._compute_new_post_add(&element, sk);
        state.add(element);
        Ok(t)
    }

    /// New accumulated value after adding a batch as `d_A(-sk) * V`. Also returns the multiplier `d_A(-sk)`
    fn _compute_new_post_add_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> (E::ScalarField, E::G1Affine) {
        let d_alpha = Poly_d::eval_direct(elements, &-sk.0);
        let new_V = self.value().mul_bigint(d_alpha.into_bigint()).into_affine();
        (d_alpha, new_V)
    }

    fn _add_batch(
        &self,
        elements: Vec<E::ScalarField>,
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        for element in elements.iter() {
            self.check_before_add(element, state)?;
        }
        let t = self._compute_new_post_add_batch(&elements, sk);
        for element in elements {
            state.add(element);
        }
        Ok(t)
    }

    /// New accumulated value after removing `element` as `1/(element + sk) * V`. Also returns the multiplier
    fn _compute_new_post_remove(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        let y_plus_alpha_inv = inverse_of_element_plus_sk(element, sk)?;
        let new_V = self
            .value()
            .mul_bigint(y_plus_alpha_inv.into_bigint())
            .into_affine();
        Ok((y_plus_alpha_inv, new_V))
    }

    fn _remove(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        self.check_before_remove(element, state)?;
        let t = self._compute_new_post_remove(element, sk)?;
        state.remove(element);
        Ok(t)
    }

    /// New accumulated value after removing a batch as `1/d_D(-sk) * V`. Also returns the multiplier
    fn _compute_new_post_remove_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        let d_alpha_inv = Poly_d::eval_direct(elements, &-sk.0)
            .inverse()
            .ok_or(VBAccumulatorError::ElementIsNegatedSecretKey)?;
        let new_V = self.value().mul_bigint(d_alpha_inv.into_bigint()).into_affine();
        Ok((d_alpha_inv, new_V))
    }

    fn _remove_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        for element in elements {
            self.check_before_remove(element, state)?;
        }
        let t = self._compute_new_post_remove_batch(elements, sk)?;
        for element in elements {
            state.remove(element);
        }
        Ok(t)
    }

    /// New accumulated value after adding and removing batches as `d_A(-sk)/d_D(-sk) * V`. Also returns the multiplier
    fn _compute_new_post_batch_updates(
        &self,
        additions: &[E::ScalarField],
        removals: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        let update_time = start_timer!(|| "Accumulator batch update");
        let mut d_alpha = Poly_d::eval_direct(additions, &-sk.0);
        if !removals.is_empty() {
            d_alpha *= Poly_d::eval_direct(removals, &-sk.0)
                .inverse()
                .ok_or(VBAccumulatorError::ElementIsNegatedSecretKey)?;
        }
        let new_V = self.value().mul_bigint(d_alpha.into_bigint()).into_affine();
        end_timer!(update_time);
        Ok((d_alpha, new_V))
    }

    /// All additions must be absent and all removals present before any change is made to `state`
    fn _batch_updates(
        &self,
        additions: Vec<E::ScalarField>,
        removals: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        for element in additions.iter() {
            self.check_before_add(element, state)?;
        }
        for element in removals {
            self.check_before_remove(element, state)?;
        }
        let t = self._compute_new_post_batch_updates(&additions, removals, sk)?;
        for element in additions {
            state.add(element);
        }
        for element in removals {
            state.remove(element);
        }
        Ok(t)
    }

    /// Membership witness `C = 1/(member + sk) * V`. Does not check that `member` is a member
    fn compute_membership_witness(
        &self,
        member: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<MembershipWitness<E::G1Affine>, VBAccumulatorError> {
        let y_plus_alpha_inv = inverse_of_element_plus_sk(member, sk)?;
        Ok(MembershipWitness(
            self.value()
                .mul_bigint(y_plus_alpha_inv.into_bigint())
                .into_affine(),
        ))
    }

    /// Get membership witness for an element present in accumulator. Described in section 2 of the paper
    fn get_membership_witness(
        &self,
        member: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        state: &dyn State<E::ScalarField>,
    ) -> Result<MembershipWitness<E::G1Affine>, VBAccumulatorError> {
        self.check_before_remove(member, state)?;
        self.compute_membership_witness(member, sk)
    }

    /// Membership witnesses for a batch with one batch inversion and a window table of `V`
    fn compute_membership_witnesses_for_batch(
        &self,
        members: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<Vec<MembershipWitness<E::G1Affine>>, VBAccumulatorError> {
        let mut y_plus_alpha: Vec<_> = cfg_iter!(members).map(|e| *e + sk.0).collect();
        if cfg_iter!(y_plus_alpha).any(|y| y.is_zero()) {
            return Err(VBAccumulatorError::ElementIsNegatedSecretKey);
        }
        batch_inversion(&mut y_plus_alpha);
        Ok(MembershipWitness::projective_points_to_membership_witnesses(
            multiply_field_elems_with_same_group_elem(self.value().into_group(), &y_plus_alpha),
        ))
    }

    /// Get membership witnesses for multiple elements present in accumulator. Returns witnesses in the
    /// order of passed elements. Fails if any of the elements is not a member.
    fn get_membership_witnesses_for_batch(
        &self,
        members: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        state: &dyn State<E::ScalarField>,
    ) -> Result<Vec<MembershipWitness<E::G1Affine>>, VBAccumulatorError> {
        for element in members {
            self.check_before_remove(element, state)?;
        }
        self.compute_membership_witnesses_for_batch(members, sk)
    }

    /// Check `e(witness, member * P_tilde + Q_tilde) == e(V, P_tilde)`. Described in section 2 of the paper
    fn verify_membership(
        &self,
        member: &E::ScalarField,
        witness: &MembershipWitness<E::G1Affine>,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
    ) -> bool {
        let verify_time = start_timer!(|| "Verify membership");
        // member * P_tilde + Q_tilde
        let y_P_tilde_plus_Q_tilde = params.P_tilde.mul_bigint(member.into_bigint()) + pk.0;
        // e(witness, member * P_tilde + Q_tilde) * e(V, -P_tilde) == 1
        let valid = E::multi_pairing(
            [witness.0, *self.value()],
            [y_P_tilde_plus_Q_tilde.into_affine(), (-params.P_tilde.into_group()).into_affine()],
        )
        .is_zero();
        end_timer!(verify_time);
        valid
    }
}

impl<E: Pairing> Accumulator<E> for PositiveAccumulator<E> {
    fn value(&self) -> &E::G1Affine {
        &self.0
    }
}

impl<E: Pairing> PositiveAccumulator<E> {
    /// Create a new positive accumulator whose value is the setup parameter `P`
    pub fn initialize(setup_params: &SetupParams<E>) -> Self {
        Self(setup_params.P)
    }

    pub fn compute_new_post_add(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> E::G1Affine {
        self._compute_new_post_add(element, sk).1
    }

    /// Add an element to the accumulator and state
    pub fn add(
        &self,
        element: E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, V) = self._add(element, sk, state)?;
        Ok(Self(V))
    }

    pub fn compute_new_post_add_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> E::G1Affine {
        self._compute_new_post_add_batch(elements, sk).1
    }

    /// Add a batch of members in the accumulator
    pub fn add_batch(
        &self,
        elements: Vec<E::ScalarField>,
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, V) = self._add_batch(elements, sk, state)?;
        Ok(Self(V))
    }

    pub fn compute_new_post_remove(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<E::G1Affine, VBAccumulatorError> {
        Ok(self._compute_new_post_remove(element, sk)?.1)
    }

    /// Remove an element from the accumulator and state
    pub fn remove(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, V) = self._remove(element, sk, state)?;
        Ok(Self(V))
    }

    pub fn compute_new_post_remove_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<E::G1Affine, VBAccumulatorError> {
        Ok(self._compute_new_post_remove_batch(elements, sk)?.1)
    }

    /// Remove a batch of members from the accumulator
    pub fn remove_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, V) = self._remove_batch(elements, sk, state)?;
        Ok(Self(V))
    }

    pub fn compute_new_post_batch_updates(
        &self,
        additions: &[E::ScalarField],
        removals: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<E::G1Affine, VBAccumulatorError> {
        Ok(self
            ._compute_new_post_batch_updates(additions, removals, sk)?
            .1)
    }

    /// Add and remove batches of elements in a single update
    pub fn batch_updates(
        &self,
        additions: Vec<E::ScalarField>,
        removals: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, V) = self._batch_updates(additions, removals, sk, state)?;
        Ok(Self(V))
    }

    pub fn from_accumulated(accumulated: E::G1Affine) -> Self {
        Self(accumulated)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{persistence::in_memory::InMemoryState, setup::Keypair, test_serialization};
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };

    pub fn setup_positive_accum(
        rng: &mut StdRng,
    ) -> (
        SetupParams<Bls12_381>,
        Keypair<Bls12_381>,
        PositiveAccumulator<Bls12_381>,
        InMemoryState<Fr>,
    ) {
        let params = SetupParams::<Bls12_381>::generate_using_rng(rng);
        let keypair = Keypair::<Bls12_381>::generate_using_rng(rng, &params);
        let accumulator = PositiveAccumulator::initialize(&params);
        let state = InMemoryState::new();
        (params, keypair, accumulator, state)
    }

    #[test]
    fn membership() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (params, keypair, mut accumulator, mut state) = setup_positive_accum(&mut rng);
        test_serialization!(PositiveAccumulator<Bls12_381>, accumulator);

        let count = 20;
        let elems = (0..count).map(|_| Fr::rand(&mut rng)).collect::<Vec<_>>();
        let mut witnesses = vec![];
        for elem in &elems {
            assert!(!state.has(elem));
            let computed_new = accumulator.compute_new_post_add(elem, &keypair.secret_key);
            accumulator = accumulator
                .add(*elem, &keypair.secret_key, &mut state)
                .unwrap();
            assert_eq!(computed_new, *accumulator.value());
            assert!(state.has(elem));

            // Adding the same element again fails
            assert!(matches!(
                accumulator.add(*elem, &keypair.secret_key, &mut state),
                Err(VBAccumulatorError::ElementPresent)
            ));

            let m_wit = accumulator
                .get_membership_witness(elem, &keypair.secret_key, &state)
                .unwrap();
            assert!(accumulator.verify_membership(elem, &m_wit, &keypair.public_key, &params));
            witnesses.push(m_wit);
        }
        test_serialization!(PositiveAccumulator<Bls12_381>, accumulator);

        // Witness of a non-member cannot be fetched and a witness does not verify for another element
        let non_member = Fr::rand(&mut rng);
        assert!(matches!(
            accumulator.get_membership_witness(&non_member, &keypair.secret_key, &state),
            Err(VBAccumulatorError::ElementAbsent)
        ));
        assert!(!accumulator.verify_membership(
            &non_member,
            &witnesses[0],
            &keypair.public_key,
            &params
        ));

        // Witnesses go stale once another member is removed, so each one is fetched afresh
        // against the current accumulator before its element is removed
        for elem in elems.iter() {
            let m_wit = accumulator
                .get_membership_witness(elem, &keypair.secret_key, &state)
                .unwrap();
            assert!(accumulator.verify_membership(elem, &m_wit, &keypair.public_key, &params));
            let computed_new = accumulator
                .compute_new_post_remove(elem, &keypair.secret_key)
                .unwrap();
            accumulator = accumulator
                .remove(elem, &keypair.secret_key, &mut state)
                .unwrap();
            assert_eq!(computed_new, *accumulator.value());
            assert!(!state.has(elem));
            assert!(!accumulator.verify_membership(elem, &m_wit, &keypair.public_key, &params));

            // Removing an absent element fails
            assert!(matches!(
                accumulator.remove(elem, &keypair.secret_key, &mut state),
                Err(VBAccumulatorError::ElementAbsent)
            ));
        }
        // Once everything is removed, the accumulator is back to the initial value
        assert_eq!(*accumulator.value(), params.P);
    }

    #[test]
    fn batch_update_and_membership() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (params, keypair, accumulator_1, mut state_1) = setup_positive_accum(&mut rng);

        // Accumulators updated one element at a time and in batches must match
        let mut accumulator_2 = accumulator_1.clone();
        let mut state_2 = state_1.clone();
        let mut accumulator_3 = accumulator_1.clone();
        let mut state_3 = state_1.clone();
        let mut accumulator_4 = accumulator_1.clone();
        let mut state_4 = state_1.clone();

        let additions: Vec<Fr> = (0..10).map(|_| Fr::rand(&mut rng)).collect();
        let removals: Vec<Fr> = additions[0..5].to_vec();

        for elem in &additions {
            accumulator_2 = accumulator_2
                .add(*elem, &keypair.secret_key, &mut state_2)
                .unwrap();
        }

        let accumulator_1 = accumulator_1
            .add_batch(additions.clone(), &keypair.secret_key, &mut state_1)
            .unwrap();
        assert_eq!(*accumulator_1.value(), *accumulator_2.value());
        assert_eq!(state_1.db, state_2.db);

        // Batch add fails without touching state if any element is already present
        let mut bad_batch = vec![Fr::rand(&mut rng)];
        bad_batch.push(additions[3]);
        assert!(matches!(
            accumulator_1.add_batch(bad_batch.clone(), &keypair.secret_key, &mut state_1),
            Err(VBAccumulatorError::ElementPresent)
        ));
        assert!(!state_1.has(&bad_batch[0]));

        let witnesses = accumulator_1
            .get_membership_witnesses_for_batch(&additions, &keypair.secret_key, &state_1)
            .unwrap();
        for (i, w) in witnesses.iter().enumerate() {
            assert_eq!(
                *w,
                accumulator_1
                    .get_membership_witness(&additions[i], &keypair.secret_key, &state_1)
                    .unwrap()
            );
            assert!(accumulator_1.verify_membership(&additions[i], w, &keypair.public_key, &params));
        }

        for elem in &removals {
            accumulator_2 = accumulator_2
                .remove(elem, &keypair.secret_key, &mut state_2)
                .unwrap();
        }
        let accumulator_1 = accumulator_1
            .remove_batch(&removals, &keypair.secret_key, &mut state_1)
            .unwrap();
        assert_eq!(*accumulator_1.value(), *accumulator_2.value());
        assert_eq!(state_1.db, state_2.db);

        // Additions and removals in a single batch
        for elem in &additions {
            accumulator_3 = accumulator_3
                .add(*elem, &keypair.secret_key, &mut state_3)
                .unwrap();
            accumulator_4 = accumulator_4
                .add(*elem, &keypair.secret_key, &mut state_4)
                .unwrap();
        }
        let new_additions: Vec<Fr> = (0..8).map(|_| Fr::rand(&mut rng)).collect();
        for elem in &new_additions {
            accumulator_3 = accumulator_3
                .add(*elem, &keypair.secret_key, &mut state_3)
                .unwrap();
        }
        for elem in &removals {
            accumulator_3 = accumulator_3
                .remove(elem, &keypair.secret_key, &mut state_3)
                .unwrap();
        }
        let computed_new = accumulator_4
            .compute_new_post_batch_updates(&new_additions, &removals, &keypair.secret_key)
            .unwrap();
        let accumulator_4 = accumulator_4
            .batch_updates(new_additions, &removals, &keypair.secret_key, &mut state_4)
            .unwrap();
        assert_eq!(*accumulator_3.value(), *accumulator_4.value());
        assert_eq!(computed_new, *accumulator_4.value());
        assert_eq!(state_3.db, state_4.db);
    }
}
