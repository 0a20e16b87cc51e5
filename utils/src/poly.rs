use ark_ff::{PrimeField, Zero};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_std::{cfg_iter, vec, vec::Vec};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Naive multiplication (n^2) of 2 polynomials defined over prime fields. Faster than the
/// FFT based multiplication of `ark-poly` for the small degrees seen in batch updates.
pub fn multiply_poly<F: PrimeField>(
    left: &DensePolynomial<F>,
    right: &DensePolynomial<F>,
) -> DensePolynomial<F> {
    if left.is_zero() || right.is_zero() {
        return DensePolynomial::zero();
    }
    let mut product = vec![F::zero(); left.degree() + right.degree() + 1];
    for (i, l) in left.coeffs.iter().enumerate() {
        for (j, r) in right.coeffs.iter().enumerate() {
            product[i + j] += *l * r;
        }
    }
    DensePolynomial::from_coefficients_vec(product)
}

/// Product of all given polynomials. Product of an empty list is the constant 1.
pub fn multiply_many_polys<F: PrimeField>(polys: Vec<DensePolynomial<F>>) -> DensePolynomial<F> {
    let one = || DensePolynomial::from_coefficients_vec(vec![F::one()]);

    #[cfg(not(feature = "parallel"))]
    let r = polys
        .into_iter()
        .fold(one(), |a, b| multiply_poly(&a, &b));

    #[cfg(feature = "parallel")]
    let r = polys
        .into_par_iter()
        .reduce(one, |a, b| multiply_poly(&a, &b));

    r
}

/// Create the polynomial `(points[0] - x) * (points[1] - x) * ... * (points[n-1] - x)`. Returns the
/// zero polynomial when `points` is empty.
pub fn poly_from_points_minus_x<F: PrimeField>(points: &[F]) -> DensePolynomial<F> {
    if points.is_empty() {
        return DensePolynomial::zero();
    }
    let minus_one = -F::one();
    let terms = cfg_iter!(points)
        .map(|p| DensePolynomial::from_coefficients_slice(&[*p, minus_one]))
        .collect::<Vec<_>>();
    multiply_many_polys(terms)
}
