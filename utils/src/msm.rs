//! Multiplications of a single group element by many scalars using a precomputed window table.

use ark_ec::{scalar_mul::fixed_base::FixedBase, CurveGroup};
use ark_ff::PrimeField;
use ark_std::vec::Vec;

/// Window table of a fixed base. Worth building when the same group element is multiplied by several scalars.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct WindowTable<G: CurveGroup> {
    scalar_size: usize,
    window_size: usize,
    outerc: usize,
    table: Vec<Vec<G::Affine>>,
}

impl<G: CurveGroup> WindowTable<G> {
    /// `num_multiplications` is an estimate of the number of scalars `base` will be multiplied with
    /// and only affects performance.
    pub fn new(num_multiplications: usize, base: G) -> Self {
        let scalar_size = G::ScalarField::MODULUS_BIT_SIZE as usize;
        let window_size = FixedBase::get_mul_window_size(num_multiplications);
        let outerc = (scalar_size + window_size - 1) / window_size;
        let table = FixedBase::get_window_table(scalar_size, window_size, base);
        Self {
            scalar_size,
            window_size,
            outerc,
            table,
        }
    }

    pub fn multiply(&self, scalar: &G::ScalarField) -> G {
        FixedBase::windowed_mul(self.outerc, self.window_size, &self.table, scalar)
    }

    pub fn multiply_many(&self, scalars: &[G::ScalarField]) -> Vec<G> {
        FixedBase::msm(self.scalar_size, self.window_size, &self.table, scalars)
    }
}

/// Returns `[group_elem * elements[0], group_elem * elements[1], ...]`
pub fn multiply_field_elems_with_same_group_elem<G: CurveGroup>(
    group_elem: G,
    elements: &[G::ScalarField],
) -> Vec<G> {
    WindowTable::new(elements.len(), group_elem).multiply_many(elements)
}

/// Same as `multiply_field_elems_with_same_group_elem` but the products are returned in affine form
pub fn multiply_field_elems_with_same_group_elem_affine<G: CurveGroup>(
    group_elem: G,
    elements: &[G::ScalarField],
) -> Vec<G::Affine> {
    G::normalize_batch(&multiply_field_elems_with_same_group_elem(
        group_elem, elements,
    ))
}
