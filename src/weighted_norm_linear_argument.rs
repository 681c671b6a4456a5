//! Weight norm linear argument: logarithmic-size proof of knowledge of
//! vectors `l`, `n` opening `Com = v*G + <l, H_vec> + <n, G_vec>` with
//! `v = <c, l> + |n|^2_mu`.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{format, vec::Vec};

use crate::{
    error::BpppError,
    ff::{add_vecs, inner_product, msm, scale, split_vec, weighted_inner_product, weighted_norm},
    setup::WeightNormLinearPublic,
    transcript::Transcript,
};

#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct WeightedNormLinearArgument<G: AffineRepr> {
    pub X: Vec<G>,
    pub R: Vec<G>,
    pub l: Vec<G::ScalarField>,
    pub n: Vec<G::ScalarField>,
}

impl<G: AffineRepr> WeightedNormLinearArgument<G> {
    /// Create the argument for openings `l`, `n` of `commitment`.
    ///
    /// Each folding round halves the vectors by parity split and replaces
    /// `(rho, mu)` with `(mu, mu^2)`; once fewer than six scalars remain the
    /// openings are sent in the clear.
    pub fn new(
        public: &WeightNormLinearPublic<G>,
        commitment: &G,
        mut l: Vec<G::ScalarField>,
        mut n: Vec<G::ScalarField>,
        transcript: &mut impl Transcript,
    ) -> Result<Self, BpppError> {
        if l.len() != public.c.len() || l.len() != public.H_vec.len() {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "length of l={} must equal lengths of c={} and H_vec={}",
                l.len(),
                public.c.len(),
                public.H_vec.len()
            )));
        }
        if n.len() != public.G_vec.len() {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "length of n={} must equal length of G_vec={}",
                n.len(),
                public.G_vec.len()
            )));
        }

        let mut c = public.c.clone();
        let mut h_vec = public.H_vec.clone();
        let mut g_vec = public.G_vec.clone();
        let mut rho = public.rho;
        let mut mu = public.mu;
        let mut com = commitment.into_group();

        let mut X = Vec::new();
        let mut R = Vec::new();

        while l.len() + n.len() >= 6 {
            let rho_inv = rho.inverse().unwrap();
            let mu_sqr = mu.square();

            let (l_0, l_1) = split_vec(&l);
            let (n_0, n_1) = split_vec(&n);
            let (c_0, c_1) = split_vec(&c);
            let (g_0, g_1) = split_vec(&g_vec);
            let (h_0, h_1) = split_vec(&h_vec);

            let v_x = rho_inv.double() * weighted_inner_product(&n_0, &n_1, &mu_sqr)
                + inner_product(&c_0, &l_1)
                + inner_product(&c_1, &l_0);
            let v_r = weighted_norm(&n_1, &mu_sqr) + inner_product(&c_1, &l_1);

            // X_i = v_x*G + <l_1, h_0> + <l_0, h_1> + <rho*n_1, g_0> + <rho_inv*n_0, g_1>
            let X_i = (public.G * v_x
                + msm(&h_0, &l_1)
                + msm(&h_1, &l_0)
                + msm(&g_0, &scale(&n_1, &rho))
                + msm(&g_1, &scale(&n_0, &rho_inv)))
            .into_affine();

            // R_i = v_r*G + <l_1, h_1> + <n_1, g_1>
            let R_i = (public.G * v_r + msm(&h_1, &l_1) + msm(&g_1, &n_1)).into_affine();

            let com_affine = com.into_affine();
            transcript.append_point(&com_affine);
            transcript.append_point(&X_i);
            transcript.append_point(&R_i);
            transcript.append_scalar(&G::ScalarField::from(h_vec.len() as u64));
            transcript.append_scalar(&G::ScalarField::from(g_vec.len() as u64));
            let y = transcript.challenge_scalar::<G::ScalarField>();

            l = add_vecs(&l_0, &scale(&l_1, &y));
            c = add_vecs(&c_0, &scale(&c_1, &y));
            n = add_vecs(&scale(&n_0, &rho_inv), &scale(&n_1, &y));
            h_vec = fold_points(&h_0, &h_1, &G::ScalarField::one(), &y);
            g_vec = fold_points(&g_0, &g_1, &rho, &y);

            com = com + X_i * y + R_i * (y.square() - G::ScalarField::one());
            rho = mu;
            mu = mu_sqr;
            X.push(X_i);
            R.push(R_i);
        }

        Ok(Self { X, R, l, n })
    }

    /// Verify the argument against `commitment`. Runs the folding rounds on
    /// public data only and compares the recomputed base-case commitment.
    pub fn verify(
        &self,
        public: &WeightNormLinearPublic<G>,
        commitment: &G,
        transcript: &mut impl Transcript,
    ) -> Result<(), BpppError> {
        if self.X.len() != self.R.len() {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "length of X={} not equal to length of R={}",
                self.X.len(),
                self.R.len()
            )));
        }
        if public.c.len() != public.H_vec.len() {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "length of c={} not equal to length of H_vec={}",
                public.c.len(),
                public.H_vec.len()
            )));
        }

        let mut c = public.c.clone();
        let mut h_vec = public.H_vec.clone();
        let mut g_vec = public.G_vec.clone();
        let mut rho = public.rho;
        let mut mu = public.mu;
        let mut com = commitment.into_group();

        for i in 0..self.X.len() {
            let com_affine = com.into_affine();
            transcript.append_point(&com_affine);
            transcript.append_point(&self.X[i]);
            transcript.append_point(&self.R[i]);
            transcript.append_scalar(&G::ScalarField::from(h_vec.len() as u64));
            transcript.append_scalar(&G::ScalarField::from(g_vec.len() as u64));
            let y = transcript.challenge_scalar::<G::ScalarField>();

            let (c_0, c_1) = split_vec(&c);
            let (g_0, g_1) = split_vec(&g_vec);
            let (h_0, h_1) = split_vec(&h_vec);

            c = add_vecs(&c_0, &scale(&c_1, &y));
            h_vec = fold_points(&h_0, &h_1, &G::ScalarField::one(), &y);
            g_vec = fold_points(&g_0, &g_1, &rho, &y);

            com = com + self.X[i] * y + self.R[i] * (y.square() - G::ScalarField::one());
            rho = mu;
            mu = mu.square();
        }

        let v = inner_product(&c, &self.l) + weighted_norm(&self.n, &mu);
        let expected = public.G * v + msm(&h_vec, &self.l) + msm(&g_vec, &self.n);
        if com != expected {
            return Err(BpppError::WeightedNormLinearArgumentVerificationFailed);
        }
        Ok(())
    }
}

/// `a_i*s_a + b_i*s_b` element-wise; a missing `b_i` contributes nothing.
fn fold_points<G: AffineRepr>(
    a: &[G],
    b: &[G],
    s_a: &G::ScalarField,
    s_b: &G::ScalarField,
) -> Vec<G> {
    let folded = (0..a.len().max(b.len()))
        .map(|i| {
            let mut p = G::Group::zero();
            if let Some(a_i) = a.get(i) {
                p += *a_i * *s_a;
            }
            if let Some(b_i) = b.get(i) {
                p += *b_i * *s_b;
            }
            p
        })
        .collect::<Vec<_>>();
    G::Group::normalize_batch(&folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::KeccakTranscript;
    use ark_bn254::{Fr, G1Affine};
    use ark_std::rand::{prelude::StdRng, SeedableRng};

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    fn check<G: AffineRepr>(
        rng: &mut StdRng,
        l: Vec<G::ScalarField>,
        n: Vec<G::ScalarField>,
    ) -> WeightedNormLinearArgument<G> {
        let public = WeightNormLinearPublic::<G>::new(rng, l.len(), n.len());
        let com = public.commit(&l, &n);

        let mut prover_transcript = KeccakTranscript::new();
        let proof =
            WeightedNormLinearArgument::new(&public, &com, l, n, &mut prover_transcript).unwrap();

        let mut verifier_transcript = KeccakTranscript::new();
        proof
            .verify(&public, &com, &mut verifier_transcript)
            .unwrap();
        proof
    }

    #[test]
    fn wnla_l4_n2() {
        let mut rng = StdRng::seed_from_u64(0u64);
        check::<G1Affine>(
            &mut rng,
            vec![fr(4), fr(5), fr(10), fr(1)],
            vec![fr(2), fr(1)],
        );
    }

    #[test]
    fn wnla_l8_n4() {
        let mut rng = StdRng::seed_from_u64(0u64);
        check::<G1Affine>(
            &mut rng,
            vec![
                fr(4),
                fr(5),
                fr(10),
                fr(1),
                fr(99),
                fr(35),
                fr(1),
                fr(15),
            ],
            vec![fr(1), fr(3), fr(42), fr(14)],
        );
    }

    #[test]
    fn wnla_bls12_381() {
        use ark_bls12_381::Fr as BlsFr;
        let mut rng = StdRng::seed_from_u64(1u64);
        check::<ark_bls12_381::G1Affine>(
            &mut rng,
            vec![BlsFr::from(7u64), BlsFr::from(9u64)],
            vec![
                BlsFr::from(3u64),
                BlsFr::from(8u64),
                BlsFr::from(2u64),
                BlsFr::from(6u64),
            ],
        );
    }

    #[test]
    fn base_case_sends_openings_in_clear() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let l = vec![fr(11), fr(12)];
        let n = vec![fr(13)];
        let public = WeightNormLinearPublic::<G1Affine>::new(&mut rng, l.len(), n.len());
        let com = public.commit(&l, &n);

        let mut transcript = KeccakTranscript::new();
        let proof = WeightedNormLinearArgument::new(
            &public,
            &com,
            l.clone(),
            n.clone(),
            &mut transcript,
        )
        .unwrap();

        assert!(proof.X.is_empty());
        assert!(proof.R.is_empty());
        assert_eq!(proof.l, l);
        assert_eq!(proof.n, n);

        let mut transcript = KeccakTranscript::new();
        proof.verify(&public, &com, &mut transcript).unwrap();
    }

    #[test]
    fn proofs_are_deterministic_for_fixed_parameters() {
        let l = vec![fr(4), fr(5), fr(10), fr(1)];
        let n = vec![fr(2), fr(1)];

        let mut rng = StdRng::seed_from_u64(3u64);
        let public = WeightNormLinearPublic::<G1Affine>::new(&mut rng, l.len(), n.len());
        let com = public.commit(&l, &n);

        let mut t1 = KeccakTranscript::new();
        let p1 =
            WeightedNormLinearArgument::new(&public, &com, l.clone(), n.clone(), &mut t1).unwrap();
        let mut t2 = KeccakTranscript::new();
        let p2 = WeightedNormLinearArgument::new(&public, &com, l, n, &mut t2).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn corrupted_round_commitment_fails() {
        use ark_std::UniformRand;

        let mut rng = StdRng::seed_from_u64(4u64);
        let l = vec![fr(4), fr(5), fr(10), fr(1)];
        let n = vec![fr(2), fr(1)];
        let public = WeightNormLinearPublic::<G1Affine>::new(&mut rng, l.len(), n.len());
        let com = public.commit(&l, &n);

        let mut transcript = KeccakTranscript::new();
        let mut proof =
            WeightedNormLinearArgument::new(&public, &com, l, n, &mut transcript).unwrap();
        assert!(!proof.X.is_empty());

        proof.X[0] = ark_bn254::G1Projective::rand(&mut rng).into_affine();
        let mut transcript = KeccakTranscript::new();
        assert!(proof.verify(&public, &com, &mut transcript).is_err());
    }
}
