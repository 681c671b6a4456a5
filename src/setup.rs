use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};

use crate::ff::{inner_product, msm, n_rand, non_zero_rand, weighted_norm};

/// Public parameters of the weight norm linear argument: generators for the
/// value, the `l` and `n` sides, the public coefficient vector `c` and the
/// weight challenge pair with invariant `mu = rho^2`.
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct WeightNormLinearPublic<G: AffineRepr> {
    pub G: G,
    pub G_vec: Vec<G>,
    pub H_vec: Vec<G>,
    pub c: Vec<G::ScalarField>,
    pub rho: G::ScalarField,
    pub mu: G::ScalarField,
}

impl<G: AffineRepr> WeightNormLinearPublic<G> {
    /// Fresh random parameters. `l_len` and `n_len` should be powers of two
    /// so that the argument folds without padding.
    pub fn new<R: RngCore>(rng: &mut R, l_len: usize, n_len: usize) -> Self {
        let rho = non_zero_rand(rng);
        Self {
            G: G::Group::rand(rng).into_affine(),
            G_vec: random_points(rng, n_len),
            H_vec: random_points(rng, l_len),
            c: n_rand(rng, l_len),
            rho,
            mu: rho * rho,
        }
    }

    /// `Com = v*G + <l, H_vec> + <n, G_vec>` with `v = <c, l> + |n|^2_mu`.
    pub fn commit(&self, l: &[G::ScalarField], n: &[G::ScalarField]) -> G {
        let v = inner_product(&self.c, l) + weighted_norm(n, &self.mu);
        (self.G * v + msm(&self.H_vec, l) + msm(&self.G_vec, n)).into_affine()
    }
}

/// `count` uniform non-identity points.
pub fn random_points<G: AffineRepr, R: RngCore>(rng: &mut R, count: usize) -> Vec<G> {
    let points = (0..count)
        .map(|_| G::Group::rand(rng))
        .collect::<Vec<_>>();
    G::Group::normalize_batch(&points)
}
