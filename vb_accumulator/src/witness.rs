#![allow(non_snake_case)]

//! Membership and non-membership witnesses and their updates, both by the manager using the secret key
//! and by the (non)member using the public update info `Omega`. Described in sections 2, 3 and 4 of the paper
//! # Examples
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use vb_accumulator::setup::{Keypair, SetupParams};
//! use vb_accumulator::positive::{PositiveAccumulator, Accumulator};
//! use vb_accumulator::witness::MembershipWitness;
//! use vb_accumulator::batch_utils::Omega;
//!
//! let m_wit = accumulator
//!                 .get_membership_witness(&elem, &keypair.secret_key, &state)
//!                 .unwrap();
//!
//! // After `new_elem` is added, the witness is updated with the accumulator before the addition
//! let new_accumulator = accumulator.add(new_elem, &keypair.secret_key, &mut state).unwrap();
//! let new_wit = m_wit.update_after_addition(&elem, &new_elem, accumulator.value());
//!
//! // After a removal, the witness is updated with the accumulator after the removal
//! let newer_accumulator = new_accumulator.remove(&new_elem, &keypair.secret_key, &mut state).unwrap();
//! let new_wit = new_wit
//!                 .update_after_removal(&elem, &new_elem, newer_accumulator.value())
//!                 .unwrap();
//!
//! // For a batch update, the manager publishes `Omega` computed on the accumulator before the update
//! let omega = Omega::new(&additions, &removals, accumulator.value(), &keypair.secret_key).unwrap();
//! let new_wit = m_wit
//!                 .update_using_public_info_after_batch_updates(&additions, &removals, &omega, &elem)
//!                 .unwrap();
//! ```

use crate::{
    batch_utils::{Omega, Poly_d, Poly_v_A, Poly_v_AD, Poly_v_D},
    error::VBAccumulatorError,
    setup::SecretKey,
};
use ark_ec::{AffineRepr, CurveGroup, Group, VariableBaseMSM};
use ark_ff::{batch_inversion, Field, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, cfg_iter, end_timer, start_timer, vec, vec::Vec};
use credential_utils::{msm::WindowTable, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Update logic shared by membership and non-membership witnesses. Each function returns the updated witness
/// point `C` and the factor by which a non-membership witness's `d` must be multiplied.
pub trait Witness<G: AffineRepr> {
    /// `C' = (addition - element) * C + V` where `V` is the accumulator before the addition
    fn compute_update_after_addition(
        element: &G::ScalarField,
        addition: &G::ScalarField,
        old_witness: &G,
        old_accumulator: &G,
    ) -> (G::ScalarField, G) {
        let d_factor = *addition - *element;
        let new_C = old_witness.mul_bigint(d_factor.into_bigint()) + *old_accumulator;
        (d_factor, new_C.into_affine())
    }

    /// `C' = (C - V') / (removal - element)` where `V'` is the accumulator after the removal
    fn compute_update_after_removal(
        element: &G::ScalarField,
        removal: &G::ScalarField,
        old_witness: &G,
        new_accumulator: &G,
    ) -> Result<(G::ScalarField, G), VBAccumulatorError> {
        let d_factor = (*removal - *element)
            .inverse()
            .ok_or(VBAccumulatorError::NewElementSameAsCurrent)?;
        let new_C = (old_witness.into_group() - new_accumulator.into_group())
            .mul_bigint(d_factor.into_bigint());
        Ok((d_factor, new_C.into_affine()))
    }

    /// `C' = d_A(y) * C + v_A(y) * V` for each `y` in `elements`, `V` being the accumulator before the additions
    fn compute_update_using_secret_key_after_batch_additions(
        additions: &[G::ScalarField],
        elements: &[G::ScalarField],
        old_witnesses: &[G],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<(Vec<G::ScalarField>, Vec<G>), VBAccumulatorError> {
        if elements.len() != old_witnesses.len() {
            return Err(VBAccumulatorError::NeedSameNoOfElementsAndWitnesses);
        }
        let d_A: Vec<_> = cfg_iter!(elements)
            .map(|y| Poly_d::eval_direct(additions, y))
            .collect();
        let v_A = Poly_v_A::eval_direct_on_batch(additions, &sk.0, elements);
        let new_wits = scale_and_shift_witnesses(old_witnesses, &d_A, &v_A, old_accumulator);
        Ok((d_A, new_wits))
    }

    /// `C' = 1/d_D(y) * C - v_D(y)/d_D(y) * V` for each `y` in `elements`, `V` being the accumulator before the removals
    fn compute_update_using_secret_key_after_batch_removals(
        removals: &[G::ScalarField],
        elements: &[G::ScalarField],
        old_witnesses: &[G],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<(Vec<G::ScalarField>, Vec<G>), VBAccumulatorError> {
        if elements.len() != old_witnesses.len() {
            return Err(VBAccumulatorError::NeedSameNoOfElementsAndWitnesses);
        }
        let d_D_inv = inverse_of_d_on_batch(removals, elements)?;
        let v_D = Poly_v_D::eval_direct_on_batch(removals, &sk.0, elements)?;
        let v_D_scaled: Vec<_> = cfg_iter!(v_D)
            .zip(cfg_iter!(d_D_inv))
            .map(|(v, d_inv)| -(*v * d_inv))
            .collect();
        let new_wits =
            scale_and_shift_witnesses(old_witnesses, &d_D_inv, &v_D_scaled, old_accumulator);
        Ok((d_D_inv, new_wits))
    }

    /// `C' = d_A(y)/d_D(y) * C + v_{A,D}(y)/d_D(y) * V` for each `y` in `elements`, `V` being the accumulator
    /// before the update
    fn compute_update_using_secret_key_after_batch_updates(
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        elements: &[G::ScalarField],
        old_witnesses: &[G],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<(Vec<G::ScalarField>, Vec<G>), VBAccumulatorError> {
        if elements.len() != old_witnesses.len() {
            return Err(VBAccumulatorError::NeedSameNoOfElementsAndWitnesses);
        }
        let d_D_inv = inverse_of_d_on_batch(removals, elements)?;
        let v_AD = Poly_v_AD::eval_direct_on_batch(additions, removals, &sk.0, elements)?;
        let (d_factors, v_factors): (Vec<_>, Vec<_>) = cfg_iter!(elements)
            .zip(cfg_iter!(d_D_inv))
            .zip(cfg_iter!(v_AD))
            .map(|((y, d_inv), v)| (Poly_d::eval_direct(additions, y) * d_inv, *v * d_inv))
            .unzip();
        let new_wits =
            scale_and_shift_witnesses(old_witnesses, &d_factors, &v_factors, old_accumulator);
        Ok((d_factors, new_wits))
    }

    /// `C' = d_A(y)/d_D(y) * C + 1/d_D(y) * <[1, y, y^2, ...], Omega>`. Needs no secret. Described in
    /// section 4.1 of the paper
    fn compute_update_using_public_info_after_batch_updates(
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        omega: &Omega<G>,
        element: &G::ScalarField,
        old_witness: &G,
    ) -> Result<(G::ScalarField, G), VBAccumulatorError> {
        let d_D_inv = Poly_d::eval_direct(removals, element)
            .inverse()
            .ok_or(VBAccumulatorError::CannotBeZero)?;
        let d_factor = Poly_d::eval_direct(additions, element) * d_D_inv;
        let new_C = old_witness.mul_bigint(d_factor.into_bigint())
            + omega.inner_product_with_scaled_powers_of_y(element, &d_D_inv);
        Ok((d_factor, new_C.into_affine()))
    }

    /// Apply several consecutive batch updates at once. Each item of `updates_and_omegas` is
    /// `(additions, removals, omega)` of one batch, oldest first. Described in section 4.2 of the paper
    fn compute_update_using_public_info_after_multiple_batch_updates(
        updates_and_omegas: Vec<(&[G::ScalarField], &[G::ScalarField], &Omega<G>)>,
        element: &G::ScalarField,
        old_witness: &G,
    ) -> Result<(G::ScalarField, G), VBAccumulatorError> {
        match updates_and_omegas.len() {
            0 => return Ok((G::ScalarField::one(), *old_witness)),
            1 => {
                let (additions, removals, omega) = updates_and_omegas[0];
                return Self::compute_update_using_public_info_after_batch_updates(
                    additions,
                    removals,
                    omega,
                    element,
                    old_witness,
                );
            }
            _ => (),
        }
        let timer = start_timer!(|| "Witness update for multiple batches");

        let d_A: Vec<_> = cfg_iter!(updates_and_omegas)
            .map(|(a, _, _)| Poly_d::eval_direct(a, element))
            .collect();
        let d_D: Vec<_> = cfg_iter!(updates_and_omegas)
            .map(|(_, r, _)| Poly_d::eval_direct(r, element))
            .collect();

        // Omega of batch `t` is scaled by `d_A` of all later batches and `d_D` of all earlier batches
        let n = updates_and_omegas.len();
        let mut omega_factors = vec![G::ScalarField::one(); n];
        let mut d_D_before = G::ScalarField::one();
        for t in 0..n {
            omega_factors[t] = d_D_before;
            d_D_before *= d_D[t];
        }
        let mut d_A_after = G::ScalarField::one();
        for t in (0..n).rev() {
            omega_factors[t] *= d_A_after;
            d_A_after *= d_A[t];
        }
        // After both loops, `d_D_before` and `d_A_after` are products over all batches
        let d_D_all_inv = d_D_before
            .inverse()
            .ok_or(VBAccumulatorError::CannotBeZero)?;

        let max_omega_len = updates_and_omegas
            .iter()
            .map(|(_, _, o)| o.len())
            .max()
            .unwrap_or(0);
        let powers = Omega::<G>::scaled_powers_of_y(element, &d_D_all_inv, max_omega_len);
        let mut bases = Vec::new();
        let mut scalars = Vec::new();
        for (t, (_, _, omega)) in updates_and_omegas.iter().enumerate() {
            for i in 0..omega.len() {
                bases.push(*omega.coefficient(i));
                scalars.push(omega_factors[t] * powers[i]);
            }
        }
        let d_factor = d_A_after * d_D_all_inv;
        let new_C = old_witness.mul_bigint(d_factor.into_bigint())
            + G::Group::msm_unchecked(&bases, &scalars);
        end_timer!(timer);
        Ok((d_factor, new_C.into_affine()))
    }
}

/// `1/d(y)` for each `y` in `elements`, failing if any `y` is one of `updates`
fn inverse_of_d_on_batch<F: PrimeField>(
    updates: &[F],
    elements: &[F],
) -> Result<Vec<F>, VBAccumulatorError> {
    let mut d: Vec<_> = cfg_iter!(elements)
        .map(|y| Poly_d::eval_direct(updates, y))
        .collect();
    if cfg_iter!(d).any(|d_i| d_i.is_zero()) {
        return Err(VBAccumulatorError::NewElementSameAsCurrent);
    }
    batch_inversion(&mut d);
    Ok(d)
}

/// `C_i' = a_i * C_i + b_i * V` using a window table for `V`
fn scale_and_shift_witnesses<G: AffineRepr>(
    old_witnesses: &[G],
    a: &[G::ScalarField],
    b: &[G::ScalarField],
    accumulator: &G,
) -> Vec<G> {
    let table = WindowTable::new(old_witnesses.len(), accumulator.into_group());
    let new_wits: Vec<G::Group> = cfg_iter!(old_witnesses)
        .zip(cfg_iter!(a))
        .zip(cfg_iter!(b))
        .map(|((C, a_i), b_i)| C.mul_bigint(a_i.into_bigint()) + table.multiply(b_i))
        .collect();
    G::Group::normalize_batch(&new_wits)
}

/// Witness to check membership
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct MembershipWitness<G: AffineRepr>(#[serde_as(as = "ArkObjectBytes")] pub G);

/// Witness to check non-membership
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct NonMembershipWitness<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub d: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub C: G,
}

impl<G: AffineRepr> AsRef<G> for MembershipWitness<G> {
    fn as_ref(&self) -> &G {
        &self.0
    }
}

impl<G: AffineRepr> AsRef<G> for NonMembershipWitness<G> {
    fn as_ref(&self) -> &G {
        &self.C
    }
}

impl<G: AffineRepr> From<G> for MembershipWitness<G> {
    fn from(value: G) -> Self {
        Self(value)
    }
}

impl<G: AffineRepr> Witness<G> for MembershipWitness<G> {}

impl<G: AffineRepr> MembershipWitness<G> {
    /// Needs the accumulator before the addition
    pub fn update_after_addition(
        &self,
        member: &G::ScalarField,
        addition: &G::ScalarField,
        old_accumulator: &G,
    ) -> Self {
        Self(Self::compute_update_after_addition(member, addition, &self.0, old_accumulator).1)
    }

    /// Needs the accumulator after the removal
    pub fn update_after_removal(
        &self,
        member: &G::ScalarField,
        removal: &G::ScalarField,
        new_accumulator: &G,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, C) = Self::compute_update_after_removal(member, removal, &self.0, new_accumulator)?;
        Ok(Self(C))
    }

    /// Manager-side update of several witnesses after a batch of additions. Needs the accumulator before the additions
    pub fn update_using_secret_key_after_batch_additions(
        additions: &[G::ScalarField],
        members: &[G::ScalarField],
        old_witnesses: &[MembershipWitness<G>],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Vec<Self>, VBAccumulatorError> {
        let (_, wits) = Self::compute_update_using_secret_key_after_batch_additions(
            additions,
            members,
            &Self::points(old_witnesses),
            old_accumulator,
            sk,
        )?;
        Ok(Self::affine_points_to_membership_witnesses(wits))
    }

    /// Manager-side update of several witnesses after a batch of removals. Needs the accumulator before the removals
    pub fn update_using_secret_key_after_batch_removals(
        removals: &[G::ScalarField],
        members: &[G::ScalarField],
        old_witnesses: &[MembershipWitness<G>],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Vec<Self>, VBAccumulatorError> {
        let (_, wits) = Self::compute_update_using_secret_key_after_batch_removals(
            removals,
            members,
            &Self::points(old_witnesses),
            old_accumulator,
            sk,
        )?;
        Ok(Self::affine_points_to_membership_witnesses(wits))
    }

    /// Manager-side update of several witnesses after additions and removals. Needs the accumulator before the update
    pub fn update_using_secret_key_after_batch_updates(
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        members: &[G::ScalarField],
        old_witnesses: &[MembershipWitness<G>],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Vec<Self>, VBAccumulatorError> {
        let (_, wits) = Self::compute_update_using_secret_key_after_batch_updates(
            additions,
            removals,
            members,
            &Self::points(old_witnesses),
            old_accumulator,
            sk,
        )?;
        Ok(Self::affine_points_to_membership_witnesses(wits))
    }

    pub fn update_using_public_info_after_batch_updates(
        &self,
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        omega: &Omega<G>,
        member: &G::ScalarField,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, C) = Self::compute_update_using_public_info_after_batch_updates(
            additions, removals, omega, member, &self.0,
        )?;
        Ok(Self(C))
    }

    pub fn update_using_public_info_after_multiple_batch_updates(
        &self,
        updates_and_omegas: Vec<(&[G::ScalarField], &[G::ScalarField], &Omega<G>)>,
        member: &G::ScalarField,
    ) -> Result<Self, VBAccumulatorError> {
        let (_, C) = Self::compute_update_using_public_info_after_multiple_batch_updates(
            updates_and_omegas,
            member,
            &self.0,
        )?;
        Ok(Self(C))
    }

    pub fn projective_points_to_membership_witnesses(wits: Vec<G::Group>) -> Vec<Self> {
        Self::affine_points_to_membership_witnesses(G::Group::normalize_batch(&wits))
    }

    pub fn affine_points_to_membership_witnesses(wits: Vec<G>) -> Vec<Self> {
        cfg_into_iter!(wits).map(MembershipWitness).collect()
    }

    fn points(witnesses: &[Self]) -> Vec<G> {
        cfg_iter!(witnesses).map(|w| w.0).collect()
    }
}

impl<G: AffineRepr> Witness<G> for NonMembershipWitness<G> {}

impl<G: AffineRepr> NonMembershipWitness<G> {
    /// Needs the accumulator before the addition
    pub fn update_after_addition(
        &self,
        non_member: &G::ScalarField,
        addition: &G::ScalarField,
        old_accumulator: &G,
    ) -> Self {
        let (d_factor, C) =
            Self::compute_update_after_addition(non_member, addition, &self.C, old_accumulator);
        Self {
            d: d_factor * self.d,
            C,
        }
    }

    /// Needs the accumulator after the removal
    pub fn update_after_removal(
        &self,
        non_member: &G::ScalarField,
        removal: &G::ScalarField,
        new_accumulator: &G,
    ) -> Result<Self, VBAccumulatorError> {
        let (d_factor, C) =
            Self::compute_update_after_removal(non_member, removal, &self.C, new_accumulator)?;
        Ok(Self {
            d: d_factor * self.d,
            C,
        })
    }

    pub fn update_using_secret_key_after_batch_additions(
        additions: &[G::ScalarField],
        non_members: &[G::ScalarField],
        old_witnesses: &[NonMembershipWitness<G>],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Vec<Self>, VBAccumulatorError> {
        let r = Self::compute_update_using_secret_key_after_batch_additions(
            additions,
            non_members,
            &Self::points(old_witnesses),
            old_accumulator,
            sk,
        )?;
        Ok(Self::combine_with_old(r, old_witnesses))
    }

    pub fn update_using_secret_key_after_batch_removals(
        removals: &[G::ScalarField],
        non_members: &[G::ScalarField],
        old_witnesses: &[NonMembershipWitness<G>],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Vec<Self>, VBAccumulatorError> {
        let r = Self::compute_update_using_secret_key_after_batch_removals(
            removals,
            non_members,
            &Self::points(old_witnesses),
            old_accumulator,
            sk,
        )?;
        Ok(Self::combine_with_old(r, old_witnesses))
    }

    pub fn update_using_secret_key_after_batch_updates(
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        non_members: &[G::ScalarField],
        old_witnesses: &[NonMembershipWitness<G>],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Vec<Self>, VBAccumulatorError> {
        let r = Self::compute_update_using_secret_key_after_batch_updates(
            additions,
            removals,
            non_members,
            &Self::points(old_witnesses),
            old_accumulator,
            sk,
        )?;
        Ok(Self::combine_with_old(r, old_witnesses))
    }

    pub fn update_using_public_info_after_batch_updates(
        &self,
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        omega: &Omega<G>,
        non_member: &G::ScalarField,
    ) -> Result<Self, VBAccumulatorError> {
        let (d_factor, C) = Self::compute_update_using_public_info_after_batch_updates(
            additions, removals, omega, non_member, &self.C,
        )?;
        Ok(Self {
            d: d_factor * self.d,
            C,
        })
    }

    pub fn update_using_public_info_after_multiple_batch_updates(
        &self,
        updates_and_omegas: Vec<(&[G::ScalarField], &[G::ScalarField], &Omega<G>)>,
        non_member: &G::ScalarField,
    ) -> Result<Self, VBAccumulatorError> {
        let (d_factor, C) = Self::compute_update_using_public_info_after_multiple_batch_updates(
            updates_and_omegas,
            non_member,
            &self.C,
        )?;
        Ok(Self {
            d: d_factor * self.d,
            C,
        })
    }

    fn points(witnesses: &[Self]) -> Vec<G> {
        cfg_iter!(witnesses).map(|w| w.C).collect()
    }

    fn combine_with_old(
        (d_factors, wits): (Vec<G::ScalarField>, Vec<G>),
        old_witnesses: &[Self],
    ) -> Vec<Self> {
        cfg_into_iter!(wits)
            .zip(cfg_into_iter!(d_factors))
            .zip(cfg_iter!(old_witnesses))
            .map(|((C, d_factor), old)| Self {
                d: d_factor * old.d,
                C,
            })
            .collect()
    }
}
