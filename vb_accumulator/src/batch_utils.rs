#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

//! Polynomials used in batch updates of the accumulators and witnesses, and the update-info `Omega`
//! published by the manager. Described in sections 3 and 4 of the paper

use crate::{error::VBAccumulatorError, setup::SecretKey};
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{batch_inversion, One, PrimeField, Zero};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, end_timer, start_timer, vec, vec::Vec};
use credential_utils::{
    msm::multiply_field_elems_with_same_group_elem_affine, poly::multiply_poly,
    serde_utils::ArkObjectBytes,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Polynomial `d_A` and `d_D`. Same polynomial is used for both additions and removals.
pub struct Poly_d<F: PrimeField>(pub DensePolynomial<F>);

/// Polynomial `v_A`. Used for batch additions
pub struct Poly_v_A<F: PrimeField>(pub DensePolynomial<F>);

/// Polynomial `v_D`. Used for batch removals
pub struct Poly_v_D<F: PrimeField>(pub DensePolynomial<F>);

/// Polynomial `v_{A, D}`. Used when doing batch additions and removals in the same call
pub struct Poly_v_AD<F: PrimeField>(pub DensePolynomial<F>);

fn constant_poly<F: PrimeField>(c: F) -> DensePolynomial<F> {
    DensePolynomial::from_coefficients_vec(vec![c])
}

/// The polynomial `point - x`
fn linear_poly<F: PrimeField>(point: &F) -> DensePolynomial<F> {
    DensePolynomial::from_coefficients_vec(vec![*point, -F::one()])
}

/// `[1, (u_0 + alpha), (u_0 + alpha)*(u_1 + alpha), ..., (u_0 + alpha)*...*(u_{n-1} + alpha)]`, i.e. `n+1` prefix
/// products of the updates shifted by the secret key
fn prefix_products_with_alpha<F: PrimeField>(updates: &[F], alpha: &F) -> Vec<F> {
    let mut products = Vec::with_capacity(updates.len() + 1);
    products.push(F::one());
    for (i, u) in updates.iter().enumerate() {
        let next = products[i] * (*u + alpha);
        products.push(next);
    }
    products
}

impl<F: PrimeField> Poly_d<F> {
    /// Given a list of elements as `updates`, generates the polynomial `(updates[0]-x) * (updates[1]-x) * ... * (updates[last] - x)`.
    /// For no updates, this is the constant polynomial 1 as its evaluation scales the old witness.
    pub fn generate(updates: &[F]) -> Self {
        let p = updates
            .iter()
            .fold(constant_poly(F::one()), |p, u| multiply_poly(&p, &linear_poly(u)));
        Self(p)
    }

    pub fn eval(&self, x: &F) -> F {
        self.0.evaluate(x)
    }

    /// Evaluation of the polynomial without creating it, `(updates[0]-x)*(updates[1]-x)*...*(updates[n]-x)`
    pub fn eval_direct(updates: &[F], x: &F) -> F {
        updates.iter().fold(F::one(), |acc, u| acc * (*u - *x))
    }
}

impl<F: PrimeField> Poly_v_A<F> {
    /// Generate polynomial `v_A(x) = sum_s (prod_{i<s} (y_i + alpha)) * (prod_{j>s} (y_j - x))` given the list of
    /// elements `y_A` as `additions` and the secret key `alpha`
    pub fn generate(additions: &[F], alpha: &F) -> Self {
        let n = additions.len();
        if n == 0 {
            return Self(DensePolynomial::zero());
        }
        let factors = prefix_products_with_alpha(additions, alpha);
        // Walk from the last term where the product over `j > s` is empty.
        let mut suffix = constant_poly(F::one());
        let mut sum = DensePolynomial::zero();
        for s in (0..n).rev() {
            sum += &(&suffix * factors[s]);
            suffix = multiply_poly(&suffix, &linear_poly(&additions[s]));
        }
        Self(sum)
    }

    pub fn eval(&self, x: &F) -> F {
        self.0.evaluate(x)
    }

    /// Evaluation of the polynomial without creating it
    pub fn eval_direct(additions: &[F], alpha: &F, x: &F) -> F {
        let factors = prefix_products_with_alpha(additions, alpha);
        let mut suffix = F::one();
        let mut sum = F::zero();
        for s in (0..additions.len()).rev() {
            sum += factors[s] * suffix;
            suffix *= additions[s] - x;
        }
        sum
    }

    /// Evaluate the polynomial at each of `xs`
    pub fn eval_direct_on_batch(additions: &[F], alpha: &F, xs: &[F]) -> Vec<F> {
        let factors = prefix_products_with_alpha(additions, alpha);
        cfg_iter!(xs)
            .map(|x| {
                let mut suffix = F::one();
                let mut sum = F::zero();
                for s in (0..additions.len()).rev() {
                    sum += factors[s] * suffix;
                    suffix *= additions[s] - x;
                }
                sum
            })
            .collect()
    }
}

impl<F: PrimeField> Poly_v_D<F> {
    /// Inverses of the prefix products `(y_0 + alpha)*...*(y_s + alpha)` for `s` in `0..n`
    fn inverse_factors(removals: &[F], alpha: &F) -> Result<Vec<F>, VBAccumulatorError> {
        let mut factors = prefix_products_with_alpha(removals, alpha);
        factors.remove(0);
        if factors.iter().any(|f| f.is_zero()) {
            return Err(VBAccumulatorError::ElementIsNegatedSecretKey);
        }
        batch_inversion(&mut factors);
        Ok(factors)
    }

    /// Generate polynomial `v_D(x) = sum_s (prod_{i<s} (y_i - x)) / (prod_{i<=s} (y_i + alpha))` given the list of
    /// elements `y_D` as `removals` and the secret key `alpha`
    pub fn generate(removals: &[F], alpha: &F) -> Result<Self, VBAccumulatorError> {
        if removals.is_empty() {
            return Ok(Self(DensePolynomial::zero()));
        }
        let factors = Self::inverse_factors(removals, alpha)?;
        let mut prefix = constant_poly(F::one());
        let mut sum = DensePolynomial::zero();
        for (s, r) in removals.iter().enumerate() {
            sum += &(&prefix * factors[s]);
            prefix = multiply_poly(&prefix, &linear_poly(r));
        }
        Ok(Self(sum))
    }

    pub fn eval(&self, x: &F) -> F {
        self.0.evaluate(x)
    }

    /// Evaluation of the polynomial without creating it
    pub fn eval_direct(removals: &[F], alpha: &F, x: &F) -> Result<F, VBAccumulatorError> {
        let factors = Self::inverse_factors(removals, alpha)?;
        Ok(Self::eval_given_factors(removals, &factors, x))
    }

    /// Evaluate the polynomial at each of `xs`
    pub fn eval_direct_on_batch(
        removals: &[F],
        alpha: &F,
        xs: &[F],
    ) -> Result<Vec<F>, VBAccumulatorError> {
        let factors = Self::inverse_factors(removals, alpha)?;
        Ok(cfg_iter!(xs)
            .map(|x| Self::eval_given_factors(removals, &factors, x))
            .collect())
    }

    fn eval_given_factors(removals: &[F], factors: &[F], x: &F) -> F {
        let mut prefix = F::one();
        let mut sum = F::zero();
        for (s, r) in removals.iter().enumerate() {
            sum += factors[s] * prefix;
            prefix *= *r - x;
        }
        sum
    }
}

impl<F: PrimeField> Poly_v_AD<F> {
    /// Generate polynomial `v_{A,D}(x) = v_A(x) - (prod_i (y_A_i + alpha)) * v_D(x)`, given `y_A` as `additions`,
    /// `y_D` as `removals` and the secret key `alpha`
    pub fn generate(additions: &[F], removals: &[F], alpha: &F) -> Result<Self, VBAccumulatorError> {
        let mut p = Poly_v_A::generate(additions, alpha).0;
        if !removals.is_empty() {
            let v_D = Poly_v_D::generate(removals, alpha)?.0;
            p -= &(&v_D * Self::additions_factor(additions, alpha));
        }
        Ok(Self(p))
    }

    pub fn eval(&self, x: &F) -> F {
        self.0.evaluate(x)
    }

    /// Evaluation of the polynomial without creating it
    pub fn eval_direct(
        additions: &[F],
        removals: &[F],
        alpha: &F,
        x: &F,
    ) -> Result<F, VBAccumulatorError> {
        let mut e = Poly_v_A::eval_direct(additions, alpha, x);
        if !removals.is_empty() {
            e -= Poly_v_D::eval_direct(removals, alpha, x)? * Self::additions_factor(additions, alpha);
        }
        Ok(e)
    }

    /// Evaluate the polynomial at each of `xs`
    pub fn eval_direct_on_batch(
        additions: &[F],
        removals: &[F],
        alpha: &F,
        xs: &[F],
    ) -> Result<Vec<F>, VBAccumulatorError> {
        let mut e = Poly_v_A::eval_direct_on_batch(additions, alpha, xs);
        if !removals.is_empty() {
            let factor = Self::additions_factor(additions, alpha);
            let v_D = Poly_v_D::eval_direct_on_batch(removals, alpha, xs)?;
            for (e_i, v) in e.iter_mut().zip(v_D) {
                *e_i -= v * factor;
            }
        }
        Ok(e)
    }

    pub fn get_omega_coefficients(&self) -> &[F] {
        &self.0.coeffs
    }

    fn additions_factor(additions: &[F], alpha: &F) -> F {
        additions.iter().fold(F::one(), |acc, a| acc * (*a + alpha))
    }
}

/// Published by the accumulator manager to allow witness updates without secret info. Contains the coefficients
/// of the polynomial `v_{A,D}` each multiplied by the accumulator before the update.
/// Defined in section 4.1 of the paper
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Omega<G: AffineRepr>(#[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<G>);

impl<G: AffineRepr> Omega<G> {
    /// Create `Omega` for the given batch of additions and removals, applied to `old_accumulator`
    pub fn new(
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) -> Result<Self, VBAccumulatorError> {
        let omega_time = start_timer!(|| "Omega::new");
        let poly = Poly_v_AD::generate(additions, removals, &sk.0)?;
        let omega = Self(multiply_field_elems_with_same_group_elem_affine(
            old_accumulator.into_group(),
            poly.get_omega_coefficients(),
        ));
        end_timer!(omega_time);
        Ok(omega)
    }

    /// Inner product of powers of `y`, i.e. the element whose witness is being updated, and `omega`,
    /// scaled by `scale`, i.e. `scale * <[1, y, y^2, ...], omega>`. Used by the (non)member to update
    /// its witness without the knowledge of secret key.
    pub fn inner_product_with_scaled_powers_of_y(
        &self,
        y: &G::ScalarField,
        scale: &G::ScalarField,
    ) -> G::Group {
        let powers = Self::scaled_powers_of_y(y, scale, self.len());
        G::Group::msm_unchecked(&self.0, &powers)
    }

    /// `[scale, scale * y, scale * y^2, ..., scale * y^{n-1}]`
    pub fn scaled_powers_of_y(
        y: &G::ScalarField,
        scale: &G::ScalarField,
        n: usize,
    ) -> Vec<G::ScalarField> {
        let mut powers = Vec::with_capacity(n);
        if n > 0 {
            powers.push(*scale);
        }
        for i in 1..n {
            powers.push(powers[i - 1] * y);
        }
        powers
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coefficient (`c_i`) at the _ith_ position
    pub fn coefficient(&self, i: usize) -> &G {
        &self.0[i]
    }

    /// Test function to check that `omega` evaluated at `element` equals `v_{A,D}(element)/d_D(element) * V`
    #[cfg(test)]
    pub(crate) fn check(
        additions: &[G::ScalarField],
        removals: &[G::ScalarField],
        element: &G::ScalarField,
        old_accumulator: &G,
        sk: &SecretKey<G::ScalarField>,
    ) {
        use ark_ff::Field;

        let v_AD = Poly_v_AD::eval_direct(additions, removals, &sk.0, element).unwrap();
        let d_D_inv = Poly_d::eval_direct(removals, element).inverse().unwrap();

        let expected = old_accumulator.mul_bigint((v_AD * d_D_inv).into_bigint());

        let omega = Self::new(additions, removals, old_accumulator, sk).unwrap();
        let y_omega_ip = omega.inner_product_with_scaled_powers_of_y(element, &d_D_inv);
        assert_eq!(expected.into_affine(), y_omega_ip.into_affine());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_serialization;
    use ark_bls12_381::{Fr, G1Affine, G1Projective};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };

    #[test]
    fn polys() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let updates = (0..50).map(|_| Fr::rand(&mut rng)).collect::<Vec<Fr>>();
        let x = Fr::rand(&mut rng);

        let poly_d = Poly_d::generate(&updates);
        assert_eq!(Poly_d::eval_direct(&updates, &x), poly_d.eval(&x));

        let single_update = vec![Fr::rand(&mut rng)];
        assert_eq!(
            Poly_d::eval_direct(&single_update, &x),
            single_update[0] - x
        );
        assert_eq!(Poly_d::generate(&single_update).eval(&x), single_update[0] - x);
        assert_eq!(Poly_d::eval_direct(&[], &x), Fr::one());
        assert_eq!(Poly_d::generate(&[]).eval(&x), Fr::one());

        let alpha = Fr::rand(&mut rng);

        let poly_v_A = Poly_v_A::generate(&updates, &alpha);
        assert_eq!(
            Poly_v_A::eval_direct(&updates, &alpha, &x),
            poly_v_A.eval(&x)
        );
        assert_eq!(Poly_v_A::eval_direct(&[], &alpha, &x), Fr::zero());
        assert_eq!(Poly_v_A::generate(&[], &alpha).eval(&x), Fr::zero());

        let poly_v_D = Poly_v_D::generate(&updates, &alpha).unwrap();
        assert_eq!(
            Poly_v_D::eval_direct(&updates, &alpha, &x).unwrap(),
            poly_v_D.eval(&x)
        );
        assert_eq!(Poly_v_D::eval_direct(&[], &alpha, &x).unwrap(), Fr::zero());

        // Removing the negated secret key is not possible
        assert!(matches!(
            Poly_v_D::generate(&[Fr::rand(&mut rng), -alpha], &alpha),
            Err(VBAccumulatorError::ElementIsNegatedSecretKey)
        ));

        let xs = (0..5).map(|_| Fr::rand(&mut rng)).collect::<Vec<Fr>>();
        for i in [30, 20, 10, 1, 0] {
            let removals = (0..i).map(|_| Fr::rand(&mut rng)).collect::<Vec<Fr>>();
            let poly_v_AD = Poly_v_AD::generate(&updates, &removals, &alpha).unwrap();
            assert_eq!(
                Poly_v_AD::eval_direct(&updates, &removals, &alpha, &x).unwrap(),
                poly_v_AD.eval(&x)
            );
            let batch = Poly_v_AD::eval_direct_on_batch(&updates, &removals, &alpha, &xs).unwrap();
            for (x_i, e) in xs.iter().zip(batch) {
                assert_eq!(poly_v_AD.eval(x_i), e);
            }
        }
    }

    #[test]
    fn omega() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let sk = SecretKey(Fr::rand(&mut rng));
        let V = G1Projective::rand(&mut rng).into_affine();
        let element = Fr::rand(&mut rng);

        for (a, r) in [(10, 0), (0, 10), (8, 5), (1, 1)] {
            let additions = (0..a).map(|_| Fr::rand(&mut rng)).collect::<Vec<Fr>>();
            let removals = (0..r).map(|_| Fr::rand(&mut rng)).collect::<Vec<Fr>>();
            Omega::check(&additions, &removals, &element, &V, &sk);

            let omega = Omega::<G1Affine>::new(&additions, &removals, &V, &sk).unwrap();
            test_serialization!(Omega<G1Affine>, omega);
        }
    }
}
