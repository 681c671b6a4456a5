//! Scalar-vector and matrix helpers. Binary element-wise operations treat the
//! shorter operand as zero-extended, so callers never pad explicitly.

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{Field, PrimeField, Zero};
use ark_std::{cfg_into_iter, cfg_iter, rand::RngCore, vec, vec::Vec, UniformRand};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inner product `<a, b>` over the common prefix of the two vectors.
pub fn inner_product<F: PrimeField>(a: &[F], b: &[F]) -> F {
    let size = a.len().min(b.len());
    cfg_into_iter!(0..size)
        .map(|i| a[i] * b[i])
        .sum()
}

/// Weighted inner product `<a, b>_mu = sum_i a_i * b_i * mu^{i+1}`.
pub fn weighted_inner_product<F: PrimeField>(a: &[F], b: &[F], mu: &F) -> F {
    let size = a.len().min(b.len());
    let mut res = F::zero();
    let mut exp = *mu;
    for i in 0..size {
        res += a[i] * b[i] * exp;
        exp *= mu;
    }
    res
}

/// Weighted norm `|n|^2_mu = <n, n>_mu`.
pub fn weighted_norm<F: PrimeField>(n: &[F], mu: &F) -> F {
    weighted_inner_product(n, n, mu)
}

/// Multiplies every element of `v` by `s`.
pub fn scale<F: PrimeField>(v: &[F], s: &F) -> Vec<F> {
    cfg_iter!(v).map(|e| *e * s).collect()
}

/// Element-wise sum, zero-extending the shorter vector.
pub fn add_vecs<F: PrimeField>(a: &[F], b: &[F]) -> Vec<F> {
    (0..a.len().max(b.len()))
        .map(|i| {
            *a.get(i).unwrap_or(&F::zero()) + b.get(i).unwrap_or(&F::zero())
        })
        .collect()
}

/// Element-wise difference, zero-extending the shorter vector.
pub fn sub_vecs<F: PrimeField>(a: &[F], b: &[F]) -> Vec<F> {
    (0..a.len().max(b.len()))
        .map(|i| {
            *a.get(i).unwrap_or(&F::zero()) - b.get(i).unwrap_or(&F::zero())
        })
        .collect()
}

/// Element-wise product over the common prefix.
pub fn hadamard_product<F: PrimeField>(a: &[F], b: &[F]) -> Vec<F> {
    let size = a.len().min(b.len());
    (0..size).map(|i| a[i] * b[i]).collect()
}

/// Geometric sequence `(1, v, v^2, ..., v^{n-1})`.
pub fn powers<F: PrimeField>(v: &F, n: usize) -> Vec<F> {
    powers_starting_from(F::one(), v, n)
}

/// `(first, first*v, first*v^2, ..., first*v^{n-1})`.
pub fn powers_starting_from<F: PrimeField>(first: F, v: &F, n: usize) -> Vec<F> {
    let mut res = Vec::with_capacity(n);
    let mut current = first;
    for _ in 0..n {
        res.push(current);
        current *= v;
    }
    res
}

/// Tensor product `a ⊗ b = (a*b_0 || a*b_1 || ... || a*b_{m-1})`.
pub fn tensor_product<F: PrimeField>(a: &[F], b: &[F]) -> Vec<F> {
    let mut res = Vec::with_capacity(a.len() * b.len());
    for b_i in b {
        res.extend(scale(a, b_i));
    }
    res
}

/// Row vector times matrix: `res_j = sum_i a_i * m[i][j]`.
pub fn vector_matrix_mul<F: PrimeField>(a: &[F], m: &[Vec<F>]) -> Vec<F> {
    let cols = m.first().map(|row| row.len()).unwrap_or(0);
    cfg_into_iter!(0..cols)
        .map(|j| {
            let mut res = F::zero();
            for i in 0..a.len().min(m.len()) {
                res += a[i] * m[i][j];
            }
            res
        })
        .collect()
}

/// Splits a vector into its even- and odd-indexed halves.
pub fn split_vec<T: Clone>(original: &[T]) -> (Vec<T>, Vec<T>) {
    let mut even = Vec::with_capacity((original.len() + 1) / 2);
    let mut odd = Vec::with_capacity(original.len() / 2);
    for (i, v) in original.iter().enumerate() {
        if i % 2 == 0 {
            even.push(v.clone());
        } else {
            odd.push(v.clone());
        }
    }
    (even, odd)
}

/// Multi-scalar multiplication over the common prefix of bases and scalars.
pub fn msm<G: AffineRepr>(bases: &[G], scalars: &[G::ScalarField]) -> G::Group {
    let size = bases.len().min(scalars.len());
    G::Group::msm_unchecked(&bases[..size], &scalars[..size])
}

/// Uniform scalar from `[1, q)`.
pub fn non_zero_rand<F: PrimeField, R: RngCore>(rng: &mut R) -> F {
    loop {
        let v = F::rand(rng);
        if !v.is_zero() {
            return v;
        }
    }
}

/// `n` uniform scalars.
pub fn n_rand<F: PrimeField, R: RngCore>(rng: &mut R, n: usize) -> Vec<F> {
    (0..n).map(|_| F::rand(rng)).collect()
}

/// `x^e` for a small non-negative exponent.
pub fn pow<F: PrimeField>(x: &F, e: usize) -> F {
    x.pow([e as u64])
}

/// All-zero vector.
pub fn zero_vec<F: PrimeField>(n: usize) -> Vec<F> {
    vec![F::zero(); n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    #[test]
    fn weighted_inner_product_weights_start_at_mu() {
        let a = [fr(1), fr(2)];
        let b = [fr(3), fr(4)];
        let mu = fr(2);
        // 1*3*2 + 2*4*4 = 38
        assert_eq!(weighted_inner_product(&a, &b, &mu), fr(38));
        assert_eq!(weighted_norm(&[fr(3)], &mu), fr(18));
    }

    #[test]
    fn add_sub_zero_extend() {
        let a = [fr(1), fr(2), fr(3)];
        let b = [fr(5)];
        assert_eq!(add_vecs(&a, &b), vec![fr(6), fr(2), fr(3)]);
        assert_eq!(sub_vecs(&b, &a), vec![fr(4), -fr(2), -fr(3)]);
    }

    #[test]
    fn tensor_is_b_major() {
        let a = [fr(1), fr(2)];
        let b = [fr(3), fr(4)];
        assert_eq!(
            tensor_product(&a, &b),
            vec![fr(3), fr(6), fr(4), fr(8)]
        );
    }

    #[test]
    fn vector_matrix_mul_columns() {
        let m = vec![vec![fr(1), fr(2)], vec![fr(3), fr(4)]];
        let a = [fr(5), fr(6)];
        assert_eq!(vector_matrix_mul(&a, &m), vec![fr(23), fr(34)]);
    }

    #[test]
    fn split_parity() {
        let (even, odd) = split_vec(&[1, 2, 3, 4, 5]);
        assert_eq!(even, vec![1, 3, 5]);
        assert_eq!(odd, vec![2, 4]);
    }
}
