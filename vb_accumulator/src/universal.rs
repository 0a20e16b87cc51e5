#![allow(non_snake_case)]

//! Universal accumulator that support single as well as batched additions, removals and generating
//! membership and non-membership witness for single or a multiple elements at once. Described in section 2
//! of the paper
//! # Examples
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use vb_accumulator::setup::{Keypair, SetupParams};
//! use vb_accumulator::positive::Accumulator;
//! use vb_accumulator::universal::UniversalAccumulator;
//! use vb_accumulator::persistence::{State, InitialElementsStore};
//!
//! let params = SetupParams::<Bls12_381>::generate_using_rng(&mut rng);
//! let keypair = Keypair::<Bls12_381>::generate_using_rng(&mut rng, &params);
//! // Maximum number of members accumulator should have
//! let max_size = 100;
//!
//! // `initial_elements` should be a persistent db implementing the trait `InitialElementsStore`
//! let accumulator = UniversalAccumulator::initialize(&mut rng,
//!             &params,
//!             max_size,
//!             &keypair.secret_key,
//!             &mut initial_elements).unwrap();
//!
//! // Addition, removal, creating and verifying membership witness has same API as `PositiveAccumulator`
//! // except that the initial elements store is also needed.
//!
//! // `non_member` should be absent in the accumulator
//! let nm_wit = accumulator
//!                 .get_non_membership_witness(&non_member, &keypair.secret_key, &state, &params)
//!                 .unwrap();
//! assert!(accumulator.verify_non_membership(&non_member, &nm_wit, &keypair.public_key, &params));
//!
//! // When the members cannot be iterated in one place, `d` can be computed over partitions and combined
//! let d_1 = UniversalAccumulator::<Bls12_381>::compute_d_given_members(&non_member, &members_1);
//! let d_2 = UniversalAccumulator::<Bls12_381>::compute_d_given_members(&non_member, &members_2);
//! let d = UniversalAccumulator::<Bls12_381>::combine_multiple_d(vec![d_1, d_2]);
//! let nm_wit = accumulator
//!                 .compute_non_membership_witness_given_d(d, &non_member, &keypair.secret_key, &params)
//!                 .unwrap();
//! ```

use crate::{
    error::VBAccumulatorError,
    persistence::{InitialElementsStore, State, UniversalAccumulatorState},
    positive::{inverse_of_element_plus_sk, Accumulator},
    setup::{PublicKey, SecretKey, SetupParams},
    universal_init_constants::fixed_initial_elements,
    witness::NonMembershipWitness,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{batch_inversion, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, cfg_iter, end_timer, rand::RngCore, start_timer, vec, vec::Vec, UniformRand};
use credential_utils::{
    msm::multiply_field_elems_with_same_group_elem, serde_utils::ArkObjectBytes,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Accumulator supporting both membership and non-membership proofs. Is capped at a size defined
/// at setup to avoid non-membership witness forgery attack described in section 6 of the paper.
/// For more docs, check [`Accumulator`]
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct UniversalAccumulator<E: Pairing> {
    /// The accumulated value
    #[serde_as(as = "ArkObjectBytes")]
    pub V: E::G1Affine,
    /// `f_V(alpha)`, the discrete log of `V` wrt. `P`. Known only to the manager and used to compute
    /// non-membership witnesses
    #[serde_as(as = "ArkObjectBytes")]
    pub f_V: E::ScalarField,
    /// The maximum elements the accumulator can store
    pub max_size: u64,
}

impl<E: Pairing> Accumulator<E> for UniversalAccumulator<E> {
    fn value(&self) -> &E::G1Affine {
        &self.V
    }
}

impl<E: Pairing> UniversalAccumulator<E> {
    /// Create a new universal accumulator. The initial elements are the fixed public ones and `max_size + 1`
    /// random ones. All are written to `initial_elements_store` and can never be added or removed later.
    pub fn initialize<R: RngCore>(
        rng: &mut R,
        setup_params: &SetupParams<E>,
        max_size: u64,
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &mut dyn InitialElementsStore<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let mut initial_elements = fixed_initial_elements::<E::ScalarField>()?;
        for _ in 0..max_size + 1 {
            initial_elements.push(E::ScalarField::rand(rng));
        }
        Ok(Self::initialize_given_initial_elements(
            setup_params,
            max_size,
            initial_elements,
            sk,
            initial_elements_store,
        ))
    }

    /// Create a new universal accumulator from the given initial elements. The caller is responsible for including
    /// the fixed initial elements.
    pub fn initialize_given_initial_elements(
        setup_params: &SetupParams<E>,
        max_size: u64,
        initial_elements: Vec<E::ScalarField>,
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &mut dyn InitialElementsStore<E::ScalarField>,
    ) -> Self {
        let f_V = Self::compute_initial_f_V(&initial_elements, sk);
        for elem in initial_elements {
            initial_elements_store.add(elem);
        }
        Self::initialize_given_f_V(f_V, setup_params, max_size)
    }

    /// Create a new universal accumulator given `f_V = (y_1 + alpha) * (y_2 + alpha) *...*(y_n + alpha)` where `y_i`
    /// are the initial elements and `alpha` is the secret key
    pub fn initialize_given_f_V(
        f_V: E::ScalarField,
        setup_params: &SetupParams<E>,
        max_size: u64,
    ) -> Self {
        let V = setup_params.P.mul_bigint(f_V.into_bigint()).into_affine();
        Self { V, f_V, max_size }
    }

    /// Compute `f_V = (y_1 + alpha) * (y_2 + alpha) *...*(y_n + alpha)` where `y_i` are the initial elements
    /// and `alpha` is the secret key. When the initial elements are too many to be passed at once, this can be
    /// called over chunks and the outputs combined with [`Self::combine_multiple_initial_f_V`]
    pub fn compute_initial_f_V(
        initial_elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> E::ScalarField {
        cfg_iter!(initial_elements)
            .map(|e| *e + sk.0)
            .product::<E::ScalarField>()
    }

    pub fn combine_multiple_initial_f_V(f_Vs: Vec<E::ScalarField>) -> E::ScalarField {
        cfg_into_iter!(f_Vs).product::<E::ScalarField>()
    }

    /// Maximum elements the accumulator should hold
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Elements from the initial set can neither be added nor removed
    pub fn is_element_acceptable(
        &self,
        element: &E::ScalarField,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
    ) -> bool {
        !initial_elements_store.has(element)
    }

    fn check_acceptable<'b>(
        &self,
        elements: impl Iterator<Item = &'b E::ScalarField>,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
    ) -> Result<(), VBAccumulatorError> {
        for element in elements {
            if !self.is_element_acceptable(element, initial_elements_store) {
                return Err(VBAccumulatorError::ProhibitedElement);
            }
        }
        Ok(())
    }

    /// Update the accumulated values with the given ones
    pub fn get_updated(&self, f_V: E::ScalarField, V: E::G1Affine) -> Self {
        Self {
            V,
            f_V,
            max_size: self.max_size,
        }
    }

    /// New `f_V` and accumulated value after adding `element`
    pub fn compute_new_post_add(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> (E::ScalarField, E::G1Affine) {
        let (y_plus_alpha, V) = self._compute_new_post_add(element, sk);
        (y_plus_alpha * self.f_V, V)
    }

    /// Add an element to the accumulator and state. Described in section 2 of the paper
    pub fn add(
        &self,
        element: E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        if state.size() >= self.max_size() {
            return Err(VBAccumulatorError::AccumulatorFull);
        }
        self.check_acceptable([element].iter(), initial_elements_store)?;
        let (y_plus_alpha, V) = self._add(element, sk, state)?;
        Ok(self.get_updated(y_plus_alpha * self.f_V, V))
    }

    pub fn compute_new_post_add_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> (E::ScalarField, E::G1Affine) {
        let (d_alpha, V) = self._compute_new_post_add_batch(elements, sk);
        (d_alpha * self.f_V, V)
    }

    /// Add a batch of members in the accumulator. Described in section 3 of the paper
    pub fn add_batch(
        &self,
        elements: Vec<E::ScalarField>,
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        if state.size() + elements.len() as u64 > self.max_size() {
            return Err(VBAccumulatorError::BatchExceedsAccumulatorCapacity);
        }
        self.check_acceptable(elements.iter(), initial_elements_store)?;
        let (d_alpha, V) = self._add_batch(elements, sk, state)?;
        Ok(self.get_updated(d_alpha * self.f_V, V))
    }

    pub fn compute_new_post_remove(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        let (y_plus_alpha_inv, V) = self._compute_new_post_remove(element, sk)?;
        Ok((y_plus_alpha_inv * self.f_V, V))
    }

    /// Remove an element from the accumulator and state. Described in section 2 of the paper
    pub fn remove(
        &self,
        element: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        self.check_acceptable([*element].iter(), initial_elements_store)?;
        let (y_plus_alpha_inv, V) = self._remove(element, sk, state)?;
        Ok(self.get_updated(y_plus_alpha_inv * self.f_V, V))
    }

    pub fn compute_new_post_remove_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        let (d_alpha_inv, V) = self._compute_new_post_remove_batch(elements, sk)?;
        Ok((d_alpha_inv * self.f_V, V))
    }

    /// Remove a batch of members from the accumulator. Described in section 3 of the paper
    pub fn remove_batch(
        &self,
        elements: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        self.check_acceptable(elements.iter(), initial_elements_store)?;
        let (d_alpha_inv, V) = self._remove_batch(elements, sk, state)?;
        Ok(self.get_updated(d_alpha_inv * self.f_V, V))
    }

    pub fn compute_new_post_batch_updates(
        &self,
        additions: &[E::ScalarField],
        removals: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<(E::ScalarField, E::G1Affine), VBAccumulatorError> {
        let (d_alpha, V) = self._compute_new_post_batch_updates(additions, removals, sk)?;
        Ok((d_alpha * self.f_V, V))
    }

    /// Add and remove batches of elements in a single update. Described in section 3 of the paper
    pub fn batch_updates(
        &self,
        additions: Vec<E::ScalarField>,
        removals: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        initial_elements_store: &dyn InitialElementsStore<E::ScalarField>,
        state: &mut dyn State<E::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        if state.size() + additions.len() as u64 > self.max_size() + removals.len() as u64 {
            return Err(VBAccumulatorError::BatchExceedsAccumulatorCapacity);
        }
        self.check_acceptable(additions.iter().chain(removals), initial_elements_store)?;
        let (d_alpha, V) = self._batch_updates(additions, removals, sk, state)?;
        Ok(self.get_updated(d_alpha * self.f_V, V))
    }

    /// Compute `d = (member_0 - non_member)*(member_1 - non_member)*...(member_n - non_member)` over the members
    /// added after initialization. The members can be partitioned and the outputs over each partition combined
    /// with [`Self::combine_multiple_d`]
    pub fn compute_d_given_members(
        non_member: &E::ScalarField,
        members: &[E::ScalarField],
    ) -> E::ScalarField {
        cfg_iter!(members)
            .map(|member| *member - non_member)
            .product::<E::ScalarField>()
    }

    pub fn combine_multiple_d(ds: Vec<E::ScalarField>) -> E::ScalarField {
        cfg_into_iter!(ds).product::<E::ScalarField>()
    }

    /// Compute `d` for each non-member of the batch. As with [`Self::compute_d_given_members`], members can be
    /// partitioned and the outputs combined with [`Self::combine_multiple_d_for_batch`]
    pub fn compute_d_for_batch_given_members(
        non_members: &[E::ScalarField],
        members: &[E::ScalarField],
    ) -> Vec<E::ScalarField> {
        let mut ds = vec![E::ScalarField::one(); non_members.len()];
        for member in members {
            Self::multiply_d_for_batch(&mut ds, non_members, member);
        }
        ds
    }

    /// Multiply the `d`s computed over different partitions of members, element-wise
    pub fn combine_multiple_d_for_batch(
        ds: Vec<Vec<E::ScalarField>>,
    ) -> Result<Vec<E::ScalarField>, VBAccumulatorError> {
        let mut iter = ds.into_iter();
        let mut combined = match iter.next() {
            Some(d) => d,
            None => return Ok(vec![]),
        };
        for d in iter {
            if d.len() != combined.len() {
                return Err(VBAccumulatorError::NeedSameNoOfElementsAndWitnesses);
            }
            for (c, d_i) in combined.iter_mut().zip(d) {
                *c *= d_i;
            }
        }
        Ok(combined)
    }

    fn multiply_d_for_batch(
        ds: &mut [E::ScalarField],
        non_members: &[E::ScalarField],
        member: &E::ScalarField,
    ) {
        let factors = cfg_iter!(non_members)
            .map(|e| *member - *e)
            .collect::<Vec<_>>();
        for (d, f) in ds.iter_mut().zip(factors) {
            *d *= f;
        }
    }

    /// Non-membership witness `(C, d)` with `C = (f_V - d)/(non_member + sk) * P`. Described in section 2 of the paper
    pub fn compute_non_membership_witness_given_d(
        &self,
        d: E::ScalarField,
        non_member: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        params: &SetupParams<E>,
    ) -> Result<NonMembershipWitness<E::G1Affine>, VBAccumulatorError> {
        if d.is_zero() {
            return Err(VBAccumulatorError::CannotBeZero);
        }
        let y_plus_alpha_inv = inverse_of_element_plus_sk(non_member, sk)?;
        let C = params
            .P
            .mul_bigint(((self.f_V - d) * y_plus_alpha_inv).into_bigint())
            .into_affine();
        Ok(NonMembershipWitness { C, d })
    }

    /// Get non-membership witness for an element absent in accumulator. Iterates over all members in `state`.
    pub fn get_non_membership_witness<'a, S: UniversalAccumulatorState<'a, E::ScalarField>>(
        &self,
        non_member: &E::ScalarField,
        sk: &SecretKey<E::ScalarField>,
        state: &'a S,
        params: &SetupParams<E>,
    ) -> Result<NonMembershipWitness<E::G1Affine>, VBAccumulatorError> {
        if state.has(non_member) {
            return Err(VBAccumulatorError::ElementPresent);
        }
        let mut d = E::ScalarField::one();
        for member in state.elements() {
            d *= *member - non_member;
        }
        self.compute_non_membership_witness_given_d(d, non_member, sk, params)
    }

    /// Non-membership witnesses for a batch given `d` for each. Uses a batch inversion and a window table of `P`
    pub fn compute_non_membership_witnesses_for_batch_given_d(
        &self,
        d: Vec<E::ScalarField>,
        non_members: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        params: &SetupParams<E>,
    ) -> Result<Vec<NonMembershipWitness<E::G1Affine>>, VBAccumulatorError> {
        if d.len() != non_members.len() {
            return Err(VBAccumulatorError::NeedSameNoOfElementsAndWitnesses);
        }
        if cfg_iter!(d).any(|x| x.is_zero()) {
            return Err(VBAccumulatorError::CannotBeZero);
        }
        let timer = start_timer!(|| "Non-membership witnesses for batch");
        let mut y_plus_alpha_inv: Vec<_> = cfg_iter!(non_members).map(|y| *y + sk.0).collect();
        if cfg_iter!(y_plus_alpha_inv).any(|y| y.is_zero()) {
            return Err(VBAccumulatorError::ElementIsNegatedSecretKey);
        }
        batch_inversion(&mut y_plus_alpha_inv);

        let P_multiples = cfg_iter!(d)
            .zip(cfg_iter!(y_plus_alpha_inv))
            .map(|(d, denom)| (self.f_V - *d) * *denom)
            .collect::<Vec<_>>();
        let wits = multiply_field_elems_with_same_group_elem(params.P.into_group(), &P_multiples);
        let wits_affine = E::G1::normalize_batch(&wits);
        end_timer!(timer);
        Ok(cfg_into_iter!(wits_affine)
            .zip(cfg_into_iter!(d))
            .map(|(C, d)| NonMembershipWitness { C, d })
            .collect())
    }

    /// Get non-membership witnesses for multiple elements absent in accumulator. Returns witnesses in the
    /// order of passed elements. Iterates over `state` once. Fails if any of the elements is a member
    pub fn get_non_membership_witnesses_for_batch<
        'a,
        S: UniversalAccumulatorState<'a, E::ScalarField>,
    >(
        &self,
        non_members: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        state: &'a S,
        params: &SetupParams<E>,
    ) -> Result<Vec<NonMembershipWitness<E::G1Affine>>, VBAccumulatorError> {
        for element in non_members {
            if state.has(element) {
                return Err(VBAccumulatorError::ElementPresent);
            }
        }
        let mut ds = vec![E::ScalarField::one(); non_members.len()];
        for member in state.elements() {
            Self::multiply_d_for_batch(&mut ds, non_members, member);
        }
        self.compute_non_membership_witnesses_for_batch_given_d(ds, non_members, sk, params)
    }

    /// Check `d != 0` and `e(C, non_member * P_tilde + Q_tilde) * e(d * P - V, P_tilde) == 1`
    pub fn verify_non_membership_given_accumulated(
        V: &E::G1Affine,
        non_member: &E::ScalarField,
        witness: &NonMembershipWitness<E::G1Affine>,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
    ) -> bool {
        if witness.d.is_zero() {
            return false;
        }
        let verify_time = start_timer!(|| "Verify non-membership");
        let y_P_tilde_plus_Q_tilde = params.P_tilde.mul_bigint(non_member.into_bigint()) + pk.0;
        let d_P_minus_V = params.P.mul_bigint(witness.d.into_bigint()) - V.into_group();
        let valid = E::multi_pairing(
            [witness.C, d_P_minus_V.into_affine()],
            [y_P_tilde_plus_Q_tilde.into_affine(), params.P_tilde],
        )
        .is_zero();
        end_timer!(verify_time);
        valid
    }

    /// Check if element is absent in accumulator. Described in section 2 of the paper
    pub fn verify_non_membership(
        &self,
        non_member: &E::ScalarField,
        witness: &NonMembershipWitness<E::G1Affine>,
        pk: &PublicKey<E>,
        params: &SetupParams<E>,
    ) -> bool {
        Self::verify_non_membership_given_accumulated(self.value(), non_member, witness, pk, params)
    }

    pub fn from_value(f_V: E::ScalarField, V: E::G1Affine, max_size: u64) -> Self {
        Self { f_V, V, max_size }
    }

    /// Accumulator only good for verification as `f_V` and `max_size` are unknown
    pub fn from_accumulated(V: E::G1Affine) -> Self {
        Self::from_value(E::ScalarField::zero(), V, 0)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{
        persistence::in_memory::{InMemoryInitialElements, InMemoryState},
        setup::Keypair,
        test_serialization,
        universal_init_constants::FIXED_INITIAL_ELEMENTS_COUNT,
    };
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    pub fn setup_universal_accum(
        rng: &mut StdRng,
        max: u64,
    ) -> (
        SetupParams<Bls12_381>,
        Keypair<Bls12_381>,
        UniversalAccumulator<Bls12_381>,
        InMemoryInitialElements<Fr>,
        InMemoryState<Fr>,
    ) {
        let params = SetupParams::<Bls12_381>::generate_using_rng(rng);
        let keypair = Keypair::<Bls12_381>::generate_using_rng(rng, &params);
        let mut initial_elements = InMemoryInitialElements::new();
        let accumulator = UniversalAccumulator::initialize(
            rng,
            &params,
            max,
            &keypair.secret_key,
            &mut initial_elements,
        )
        .unwrap();
        let state = InMemoryState::new();
        (params, keypair, accumulator, initial_elements, state)
    }

    #[test]
    fn initialization() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let max_size = 10;
        let (params, keypair, accumulator, initial_elements, _) =
            setup_universal_accum(&mut rng, max_size);
        test_serialization!(UniversalAccumulator<Bls12_381>, accumulator);

        assert_eq!(
            initial_elements.db.len(),
            FIXED_INITIAL_ELEMENTS_COUNT + max_size as usize + 1
        );
        for e in fixed_initial_elements::<Fr>().unwrap() {
            assert!(initial_elements.has(&e));
        }

        // f_V computed over chunks and combined is the same as over all elements at once
        let elems = initial_elements.db.iter().cloned().collect::<Vec<_>>();
        let f_V = UniversalAccumulator::<Bls12_381>::compute_initial_f_V(&elems, &keypair.secret_key);
        assert_eq!(f_V, accumulator.f_V);
        let f_V_1 =
            UniversalAccumulator::<Bls12_381>::compute_initial_f_V(&elems[0..5], &keypair.secret_key);
        let f_V_2 =
            UniversalAccumulator::<Bls12_381>::compute_initial_f_V(&elems[5..], &keypair.secret_key);
        assert_eq!(
            UniversalAccumulator::<Bls12_381>::combine_multiple_initial_f_V(vec![f_V_1, f_V_2]),
            f_V
        );
        let accumulator_1 =
            UniversalAccumulator::initialize_given_f_V(f_V, &params, max_size);
        assert_eq!(accumulator, accumulator_1);
        assert_eq!(accumulator.V, params.P.mul_bigint(f_V.into_bigint()).into_affine());
    }

    #[test]
    fn membership_non_membership() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let max_size = 20;
        let (params, keypair, mut accumulator, initial_elements, mut state) =
            setup_universal_accum(&mut rng, max_size);

        // Initial elements can neither be added nor removed
        let initial = *initial_elements.db.iter().next().unwrap();
        assert!(matches!(
            accumulator.add(initial, &keypair.secret_key, &initial_elements, &mut state),
            Err(VBAccumulatorError::ProhibitedElement)
        ));
        assert!(matches!(
            accumulator.remove(&initial, &keypair.secret_key, &initial_elements, &mut state),
            Err(VBAccumulatorError::ProhibitedElement)
        ));

        let mut elems = vec![];
        for _ in 0..max_size {
            let elem = Fr::rand(&mut rng);

            // Absent element has a valid non-membership witness
            let nm_wit = accumulator
                .get_non_membership_witness(&elem, &keypair.secret_key, &state, &params)
                .unwrap();
            assert!(accumulator.verify_non_membership(
                &elem,
                &nm_wit,
                &keypair.public_key,
                &params
            ));

            let (f_V, V) = accumulator.compute_new_post_add(&elem, &keypair.secret_key);
            accumulator = accumulator
                .add(elem, &keypair.secret_key, &initial_elements, &mut state)
                .unwrap();
            assert_eq!(f_V, accumulator.f_V);
            assert_eq!(V, accumulator.V);

            assert!(matches!(
                accumulator.add(elem, &keypair.secret_key, &initial_elements, &mut state),
                Err(VBAccumulatorError::AccumulatorFull) | Err(VBAccumulatorError::ElementPresent)
            ));
            assert!(matches!(
                accumulator.get_non_membership_witness(&elem, &keypair.secret_key, &state, &params),
                Err(VBAccumulatorError::ElementPresent)
            ));
            // Old non-membership witness is no longer valid
            assert!(!accumulator.verify_non_membership(
                &elem,
                &nm_wit,
                &keypair.public_key,
                &params
            ));

            let m_wit = accumulator
                .get_membership_witness(&elem, &keypair.secret_key, &state)
                .unwrap();
            assert!(accumulator.verify_membership(&elem, &m_wit, &keypair.public_key, &params));
            elems.push(elem);
        }

        // Accumulator is full
        assert_eq!(state.size(), max_size);
        assert!(matches!(
            accumulator.add(Fr::rand(&mut rng), &keypair.secret_key, &initial_elements, &mut state),
            Err(VBAccumulatorError::AccumulatorFull)
        ));

        // A verifier only knows the accumulated value
        let non_member = Fr::rand(&mut rng);
        let nm_wit = accumulator
            .get_non_membership_witness(&non_member, &keypair.secret_key, &state, &params)
            .unwrap();
        let verification_accumulator = UniversalAccumulator::<Bls12_381>::from_accumulated(accumulator.V);
        assert!(verification_accumulator.verify_non_membership(
            &non_member,
            &nm_wit,
            &keypair.public_key,
            &params
        ));
        test_serialization!(NonMembershipWitness<<Bls12_381 as Pairing>::G1Affine>, nm_wit);

        // Witness with d = 0 is rejected
        let mut bad_wit = nm_wit.clone();
        bad_wit.d = Fr::zero();
        assert!(!accumulator.verify_non_membership(
            &non_member,
            &bad_wit,
            &keypair.public_key,
            &params
        ));
        assert!(matches!(
            accumulator.compute_non_membership_witness_given_d(
                Fr::zero(),
                &non_member,
                &keypair.secret_key,
                &params
            ),
            Err(VBAccumulatorError::CannotBeZero)
        ));

        for elem in elems {
            accumulator = accumulator
                .remove(&elem, &keypair.secret_key, &initial_elements, &mut state)
                .unwrap();
            assert!(matches!(
                accumulator.remove(&elem, &keypair.secret_key, &initial_elements, &mut state),
                Err(VBAccumulatorError::ElementAbsent)
            ));
            let nm_wit = accumulator
                .get_non_membership_witness(&elem, &keypair.secret_key, &state, &params)
                .unwrap();
            assert!(accumulator.verify_non_membership(
                &elem,
                &nm_wit,
                &keypair.public_key,
                &params
            ));
        }
    }

    #[test]
    fn batch_update_and_non_membership() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let max_size = 30;
        let (params, keypair, accumulator_1, initial_elements, mut state_1) =
            setup_universal_accum(&mut rng, max_size);
        let mut accumulator_2 = accumulator_1.clone();
        let mut state_2 = state_1.clone();

        let additions: Vec<Fr> = (0..10).map(|_| Fr::rand(&mut rng)).collect();
        let removals: Vec<Fr> = additions[0..4].to_vec();

        // Batch exceeding capacity is rejected
        let too_many: Vec<Fr> = (0..max_size + 1).map(|_| Fr::rand(&mut rng)).collect();
        assert!(matches!(
            accumulator_1.add_batch(too_many, &keypair.secret_key, &initial_elements, &mut state_1),
            Err(VBAccumulatorError::BatchExceedsAccumulatorCapacity)
        ));

        for elem in &additions {
            accumulator_2 = accumulator_2
                .add(*elem, &keypair.secret_key, &initial_elements, &mut state_2)
                .unwrap();
        }
        let accumulator_1 = accumulator_1
            .add_batch(additions.clone(), &keypair.secret_key, &initial_elements, &mut state_1)
            .unwrap();
        assert_eq!(accumulator_1, accumulator_2);

        for elem in &removals {
            accumulator_2 = accumulator_2
                .remove(elem, &keypair.secret_key, &initial_elements, &mut state_2)
                .unwrap();
        }
        let accumulator_1 = accumulator_1
            .remove_batch(&removals, &keypair.secret_key, &initial_elements, &mut state_1)
            .unwrap();
        assert_eq!(accumulator_1, accumulator_2);

        let new_additions: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut rng)).collect();
        let new_removals = additions[4..7].to_vec();
        let accumulator_3 = accumulator_1
            .batch_updates(
                new_additions.clone(),
                &new_removals,
                &keypair.secret_key,
                &initial_elements,
                &mut state_1,
            )
            .unwrap();
        for elem in &new_additions {
            accumulator_2 = accumulator_2
                .add(*elem, &keypair.secret_key, &initial_elements, &mut state_2)
                .unwrap();
        }
        for elem in &new_removals {
            accumulator_2 = accumulator_2
                .remove(elem, &keypair.secret_key, &initial_elements, &mut state_2)
                .unwrap();
        }
        assert_eq!(accumulator_3, accumulator_2);

        // Removed elements are non-members again
        let mut non_members = removals.clone();
        non_members.extend_from_slice(&new_removals);
        let nm_wits = accumulator_3
            .get_non_membership_witnesses_for_batch(
                &non_members,
                &keypair.secret_key,
                &state_1,
                &params,
            )
            .unwrap();
        for (i, w) in nm_wits.iter().enumerate() {
            assert_eq!(
                *w,
                accumulator_3
                    .get_non_membership_witness(&non_members[i], &keypair.secret_key, &state_1, &params)
                    .unwrap()
            );
            assert!(accumulator_3.verify_non_membership(
                &non_members[i],
                w,
                &keypair.public_key,
                &params
            ));
        }

        let members = state_1.db.iter().cloned().collect::<Vec<_>>();
        let m_wits = accumulator_3
            .get_membership_witnesses_for_batch(&members, &keypair.secret_key, &state_1)
            .unwrap();
        for (i, w) in m_wits.iter().enumerate() {
            assert!(accumulator_3.verify_membership(&members[i], w, &keypair.public_key, &params));
        }
    }

    #[test]
    fn computing_d() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let members: Vec<Fr> = (0..10).map(|_| Fr::rand(&mut rng)).collect();
        let non_members: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut rng)).collect();

        let d = UniversalAccumulator::<Bls12_381>::compute_d_given_members(&non_members[0], &members);
        let d_1 =
            UniversalAccumulator::<Bls12_381>::compute_d_given_members(&non_members[0], &members[0..3]);
        let d_2 =
            UniversalAccumulator::<Bls12_381>::compute_d_given_members(&non_members[0], &members[3..]);
        assert_eq!(
            UniversalAccumulator::<Bls12_381>::combine_multiple_d(vec![d_1, d_2]),
            d
        );

        let ds = UniversalAccumulator::<Bls12_381>::compute_d_for_batch_given_members(
            &non_members,
            &members,
        );
        for (i, nm) in non_members.iter().enumerate() {
            assert_eq!(
                ds[i],
                UniversalAccumulator::<Bls12_381>::compute_d_given_members(nm, &members)
            );
        }
        let ds_1 = UniversalAccumulator::<Bls12_381>::compute_d_for_batch_given_members(
            &non_members,
            &members[0..6],
        );
        let ds_2 = UniversalAccumulator::<Bls12_381>::compute_d_for_batch_given_members(
            &non_members,
            &members[6..],
        );
        assert_eq!(
            UniversalAccumulator::<Bls12_381>::combine_multiple_d_for_batch(vec![ds_1, ds_2])
                .unwrap(),
            ds
        );
        assert!(
            UniversalAccumulator::<Bls12_381>::combine_multiple_d_for_batch(vec![
                ds.clone(),
                ds[0..2].to_vec()
            ])
            .is_err()
        );
    }
}
