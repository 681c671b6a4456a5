//! Arithmetic-circuit argument: proves that a committed assignment satisfies
//! `W_m*w + a_m = w_l ∘ w_r` and `W_l*w + v + a_l = 0` for the composite
//! witness `w = w_l || w_r || w_o`, by reduction to the weight norm linear
//! argument over a Laurent polynomial in the challenge `t`.

use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{Field, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{format, rand::RngCore, vec, vec::Vec};

use crate::{
    error::BpppError,
    ff::{
        add_vecs, hadamard_product, inner_product, msm, n_rand, pow, powers,
        powers_starting_from, scale, sub_vecs, tensor_product, vector_matrix_mul,
        weighted_inner_product, weighted_norm, zero_vec,
    },
    setup::WeightNormLinearPublic,
    transcript::Transcript,
    weighted_norm_linear_argument::WeightedNormLinearArgument,
};

/// Destination slot for an output-wire entry inside the round commitments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartitionType {
    LO,
    LL,
    LR,
    NO,
}

/// Public parameters of one circuit family.
///
/// Dimensions: `nm` multiplication gates, `no` output wires,
/// `nw = 2*nm + no` composite witness entries, `nv` entries per committed
/// vector, `k` committed vectors and `nl = nv*k` linear constraints.
/// `H_vec` carries `nv + 9` generators (nine blinding slots in front);
/// `G_vec_aux`/`H_vec_aux` pad the norm-argument bases to powers of two.
pub struct ArithmeticCircuitPublic<G, P>
where
    G: AffineRepr,
    P: Fn(PartitionType, usize) -> Option<usize>,
{
    pub nm: usize,
    pub nl: usize,
    pub nv: usize,
    pub nw: usize,
    pub no: usize,
    pub k: usize,
    pub G: G,
    pub G_vec: Vec<G>,
    pub H_vec: Vec<G>,
    pub W_m: Vec<Vec<G::ScalarField>>,
    pub W_l: Vec<Vec<G::ScalarField>>,
    pub a_m: Vec<G::ScalarField>,
    pub a_l: Vec<G::ScalarField>,
    pub f_l: bool,
    pub f_m: bool,
    /// Routes output-wire index `j` of the requested slot kind to an index
    /// into `w_o`, or to nothing.
    pub partition: P,
    pub G_vec_aux: Vec<G>,
    pub H_vec_aux: Vec<G>,
}

/// Secret assignment: committed vectors `v` with blindings `s_v`, and the
/// left/right/output wires of the multiplication gates.
#[derive(Clone, Debug)]
pub struct ArithmeticCircuitWitness<F: Field> {
    pub v: Vec<Vec<F>>,
    pub s_v: Vec<F>,
    pub w_l: Vec<F>,
    pub w_r: Vec<F>,
    pub w_o: Vec<F>,
}

#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct ArithmeticCircuitProof<G: AffineRepr> {
    pub C_L: G,
    pub C_R: G,
    pub C_O: G,
    pub C_S: G,
    pub norm_proof: WeightedNormLinearArgument<G>,
}

impl<G, P> ArithmeticCircuitPublic<G, P>
where
    G: AffineRepr,
    P: Fn(PartitionType, usize) -> Option<usize>,
{
    /// `Com = v[0]*G + s*H_vec[0] + <v[1:], H_vec[9:]>`
    pub fn commit_witness(&self, v: &[G::ScalarField], s: &G::ScalarField) -> G {
        (self.G * v[0] + self.H_vec[0] * *s + msm(&self.H_vec[9..], &v[1..])).into_affine()
    }

    /// `<H_vec, r || l> + <G_vec, n>`
    fn commit_round(
        &self,
        r: &[G::ScalarField],
        l: &[G::ScalarField],
        n: &[G::ScalarField],
    ) -> G {
        let mut h_scalars = r.to_vec();
        h_scalars.extend_from_slice(l);
        (msm(&self.H_vec, &h_scalars) + msm(&self.G_vec, n)).into_affine()
    }

    fn validate(&self) -> Result<(), BpppError> {
        if self.nw != 2 * self.nm + self.no {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "nw={} must equal 2*nm+no={}",
                self.nw,
                2 * self.nm + self.no
            )));
        }
        if self.nl != self.nv * self.k {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "nl={} must equal nv*k={}",
                self.nl,
                self.nv * self.k
            )));
        }
        if self.W_m.len() != self.nm || self.a_m.len() != self.nm {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "W_m has {} rows and a_m {} entries, both must be nm={}",
                self.W_m.len(),
                self.a_m.len(),
                self.nm
            )));
        }
        if self.W_l.len() != self.nl || self.a_l.len() != self.nl {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "W_l has {} rows and a_l {} entries, both must be nl={}",
                self.W_l.len(),
                self.a_l.len(),
                self.nl
            )));
        }
        if self.W_m.iter().any(|row| row.len() != self.nw)
            || self.W_l.iter().any(|row| row.len() != self.nw)
        {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "every constraint row must have nw={} columns",
                self.nw
            )));
        }
        if self.G_vec.len() != self.nm {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "length of G_vec={} must be nm={}",
                self.G_vec.len(),
                self.nm
            )));
        }
        if self.H_vec.len() != self.nv + 9 {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "length of H_vec={} must be nv+9={}",
                self.H_vec.len(),
                self.nv + 9
            )));
        }
        let g_total = self.G_vec.len() + self.G_vec_aux.len();
        let h_total = self.H_vec.len() + self.H_vec_aux.len();
        if !g_total.is_power_of_two() || !h_total.is_power_of_two() {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "padded base sizes {} and {} must be powers of two",
                g_total, h_total
            )));
        }
        Ok(())
    }

    fn wnla_public(
        &self,
        c: Vec<G::ScalarField>,
        rho: G::ScalarField,
        mu: G::ScalarField,
    ) -> WeightNormLinearPublic<G> {
        WeightNormLinearPublic {
            G: self.G,
            G_vec: [self.G_vec.as_slice(), self.G_vec_aux.as_slice()].concat(),
            H_vec: [self.H_vec.as_slice(), self.H_vec_aux.as_slice()].concat(),
            c,
            rho,
            mu,
        }
    }
}

impl<G: AffineRepr> ArithmeticCircuitProof<G> {
    /// Prove that `witness` satisfies the circuit described by `public`.
    pub fn new<R, P>(
        public: &ArithmeticCircuitPublic<G, P>,
        witness: &ArithmeticCircuitWitness<G::ScalarField>,
        rng: &mut R,
        transcript: &mut impl Transcript,
    ) -> Result<Self, BpppError>
    where
        R: RngCore,
        P: Fn(PartitionType, usize) -> Option<usize>,
    {
        public.validate()?;
        validate_witness(public, witness)?;

        let two = G::ScalarField::from(2u64);

        // Blinding rows; the zeroed slots are fixed by the polynomial
        // identity below and must not be randomized.
        let mut r_o: Vec<G::ScalarField> = n_rand(rng, 9);
        r_o[4] = G::ScalarField::zero();
        r_o[8] = G::ScalarField::zero();
        let mut r_l: Vec<G::ScalarField> = n_rand(rng, 9);
        r_l[3] = G::ScalarField::zero();
        r_l[7] = G::ScalarField::zero();
        r_l[8] = G::ScalarField::zero();
        let mut r_r: Vec<G::ScalarField> = n_rand(rng, 9);
        r_r[2] = G::ScalarField::zero();
        r_r[6] = G::ScalarField::zero();
        r_r[7] = G::ScalarField::zero();
        r_r[8] = G::ScalarField::zero();

        let n_l = witness.w_l.clone();
        let n_r = witness.w_r.clone();
        let n_o = scatter(&public.partition, PartitionType::NO, &witness.w_o, public.nm);
        let l_o = scatter(&public.partition, PartitionType::LO, &witness.w_o, public.nv);
        let l_l = scatter(&public.partition, PartitionType::LL, &witness.w_o, public.nv);
        let l_r = scatter(&public.partition, PartitionType::LR, &witness.w_o, public.nv);

        let C_L = public.commit_round(&r_l, &l_l, &n_l);
        let C_R = public.commit_round(&r_r, &l_r, &n_r);
        let C_O = public.commit_round(&r_o, &l_o, &n_o);

        transcript.append_point(&C_L);
        transcript.append_point(&C_R);
        transcript.append_point(&C_O);

        let rho = transcript.challenge_scalar::<G::ScalarField>();
        let lambda = transcript.challenge_scalar::<G::ScalarField>();
        let beta = transcript.challenge_scalar::<G::ScalarField>();
        let delta = transcript.challenge_scalar::<G::ScalarField>();
        let mu = rho.square();

        let ch = ChallengeVectors::new(public, &lambda, &mu);

        let l_s: Vec<G::ScalarField> = n_rand(rng, public.nv);
        let n_s: Vec<G::ScalarField> = n_rand(rng, public.nm);

        let lcomb = |i: usize| {
            flag_combination(public.f_l, public.f_m, &lambda, &mu, public.nv, i)
        };

        // Flag-selected aggregates over the committed vectors.
        let mut v_hat = G::ScalarField::zero();
        for i in 0..public.k {
            v_hat += witness.v[i][0] * lcomb(i);
        }
        v_hat *= two;

        let mut r_v = zero_vec::<G::ScalarField>(9);
        for i in 0..public.k {
            r_v[0] += witness.s_v[i] * lcomb(i);
        }
        r_v[0] *= two;

        let mut v_1 = zero_vec::<G::ScalarField>(public.nv.saturating_sub(1));
        for i in 0..public.k {
            v_1 = add_vecs(&v_1, &scale(&witness.v[i][1..], &lcomb(i)));
        }
        v_1 = scale(&v_1, &two);

        let delta_inv = delta.inverse().unwrap();
        let beta_inv = beta.inverse().unwrap();

        let nl_cnR = add_vecs(&n_l, &ch.c_nR);
        let nr_cnL = add_vecs(&n_r, &ch.c_nL);

        // Laurent coefficients of f(t); the t^3 coefficient is the
        // constraint residual and vanishes for a satisfying witness, every
        // other one is cancelled through the rs channel below.
        let f_tm2 = -weighted_norm(&n_s, &mu);
        let f_tm1 = inner_product(&ch.cl0, &l_s)
            + two * delta * weighted_inner_product(&n_s, &n_o, &mu);
        let f_t0 = -(two * inner_product(&ch.c_lR, &l_s))
            - delta * inner_product(&ch.cl0, &l_o)
            - two * weighted_inner_product(&n_s, &nl_cnR, &mu)
            - delta.square() * weighted_norm(&n_o, &mu);
        let f_t1 = two * inner_product(&ch.c_lL, &l_s)
            + two * delta * inner_product(&ch.c_lR, &l_o)
            + inner_product(&ch.cl0, &l_l)
            + two * weighted_inner_product(&n_s, &nr_cnL, &mu)
            + two * delta * weighted_inner_product(&n_o, &nl_cnR, &mu);
        let f_t2 = weighted_norm(&ch.c_nR, &mu)
            - two * delta_inv * inner_product(&ch.c_lO, &l_s)
            - two * delta * inner_product(&ch.c_lL, &l_o)
            - two * inner_product(&ch.c_lR, &l_l)
            - inner_product(&ch.cl0, &l_r)
            - two * delta_inv * weighted_inner_product(&n_s, &ch.c_nO, &mu)
            - two * delta * weighted_inner_product(&n_o, &nr_cnL, &mu)
            - weighted_norm(&nl_cnR, &mu);
        let f_t4 = two * delta_inv * weighted_inner_product(&ch.c_nO, &ch.c_nR, &mu)
            + weighted_norm(&ch.c_nL, &mu)
            - two * delta_inv * inner_product(&ch.c_lO, &l_l)
            - two * inner_product(&ch.c_lL, &l_r)
            - two * inner_product(&ch.c_lR, &v_1)
            - two * delta_inv * weighted_inner_product(&nl_cnR, &ch.c_nO, &mu)
            - weighted_norm(&nr_cnL, &mu);
        let f_t5 = -(two * delta_inv * weighted_inner_product(&ch.c_nO, &ch.c_nL, &mu))
            + two * delta_inv * inner_product(&ch.c_lO, &l_r)
            + two * inner_product(&ch.c_lL, &v_1)
            + two * delta_inv * weighted_inner_product(&nr_cnL, &ch.c_nO, &mu);
        let f_t6 = -(two * delta_inv * inner_product(&ch.c_lO, &v_1));

        #[cfg(debug_assertions)]
        {
            let residual = two
                * (inner_product(&ch.lambda_vec, &public.a_l)
                    - inner_product(&ch.mu_vec, &public.a_m))
                - two * weighted_inner_product(&ch.c_nL, &ch.c_nR, &mu)
                + v_hat
                + two * inner_product(&ch.c_lO, &l_o)
                + two * inner_product(&ch.c_lL, &l_l)
                + two * inner_product(&ch.c_lR, &l_r)
                + inner_product(&ch.cl0, &v_1)
                + two * weighted_inner_product(&n_o, &ch.c_nO, &mu)
                + two * weighted_inner_product(&nl_cnR, &nr_cnL, &mu);
            debug_assert!(residual.is_zero(), "witness does not satisfy the circuit");
        }

        let rs = vec![
            f_tm1 + beta * (delta * r_o[1]),
            f_tm2 * beta_inv,
            (f_t0 + delta * r_o[0]) * beta_inv - r_l[1],
            (f_t1 - r_l[0]) * beta_inv + (r_r[1] + delta * r_o[2]),
            (f_t2 + r_r[0]) * beta_inv + (delta * r_o[3] - r_l[2]),
            -(r_v[0] * beta_inv),
            f_t4 * beta_inv + (delta * r_o[5] + (r_r[3] - r_l[4])),
            f_t5 * beta_inv + ((r_r[4] + delta * r_o[6]) - r_l[5]),
            f_t6 * beta_inv + ((delta * r_o[7] - r_l[6]) + r_r[5]),
        ];

        let C_S = public.commit_round(&rs, &l_s, &n_s);
        transcript.append_point(&C_S);

        let t = transcript.challenge_scalar::<G::ScalarField>();
        let t_inv = t.inverse().unwrap();
        let t2 = t.square();
        let t3 = t2 * t;

        // l_T = t^-1*(rs||ls) - delta*(ro||lo) + t*(rl||ll) - t^2*(rr||lr) + t^3*(rv||v_1)
        let mut l_T = scale(&concat(&rs, &l_s), &t_inv);
        l_T = sub_vecs(&l_T, &scale(&concat(&r_o, &l_o), &delta));
        l_T = add_vecs(&l_T, &scale(&concat(&r_l, &l_l), &t));
        l_T = sub_vecs(&l_T, &scale(&concat(&r_r, &l_r), &t2));
        l_T = add_vecs(&l_T, &scale(&concat(&r_v, &v_1), &t3));

        let (pn_T, ps_T) = ch.reduced_public_terms(public, &mu, &delta_inv, &t, &t2, &t3);

        // n_T = pn_T + t^-1*ns - delta*no + t*nl - t^2*nr
        let mut n_T = scale(&n_s, &t_inv);
        n_T = sub_vecs(&n_T, &scale(&n_o, &delta));
        n_T = add_vecs(&n_T, &scale(&n_l, &t));
        n_T = sub_vecs(&n_T, &scale(&n_r, &t2));
        n_T = add_vecs(&pn_T, &n_T);

        let mut c_T = ch.combined_c_vec(&beta, &delta_inv, &t_inv, &t, &t2, &t3);

        let v_T = ps_T + v_hat * t3;
        let C_T =
            (public.G * v_T + msm(&public.H_vec, &l_T) + msm(&public.G_vec, &n_T)).into_affine();

        // Zero-pad to the power-of-two norm-argument sizes.
        let h_total = public.H_vec.len() + public.H_vec_aux.len();
        let g_total = public.G_vec.len() + public.G_vec_aux.len();
        l_T.resize(h_total, G::ScalarField::zero());
        c_T.resize(h_total, G::ScalarField::zero());
        n_T.resize(g_total, G::ScalarField::zero());

        let norm_proof = WeightedNormLinearArgument::new(
            &public.wnla_public(c_T, rho, mu),
            &C_T,
            l_T,
            n_T,
            transcript,
        )?;

        Ok(Self {
            C_L,
            C_R,
            C_O,
            C_S,
            norm_proof,
        })
    }

    /// Verify the proof against the committed vectors `V`.
    pub fn verify<P>(
        &self,
        public: &ArithmeticCircuitPublic<G, P>,
        V: &[G],
        transcript: &mut impl Transcript,
    ) -> Result<(), BpppError>
    where
        P: Fn(PartitionType, usize) -> Option<usize>,
    {
        public.validate()?;
        if V.len() != public.k {
            return Err(BpppError::UnexpectedLengthOfVectors(format!(
                "{} committed vectors, expected k={}",
                V.len(),
                public.k
            )));
        }

        transcript.append_point(&self.C_L);
        transcript.append_point(&self.C_R);
        transcript.append_point(&self.C_O);

        let rho = transcript.challenge_scalar::<G::ScalarField>();
        let lambda = transcript.challenge_scalar::<G::ScalarField>();
        let beta = transcript.challenge_scalar::<G::ScalarField>();
        let delta = transcript.challenge_scalar::<G::ScalarField>();
        let mu = rho.square();

        let ch = ChallengeVectors::new(public, &lambda, &mu);

        transcript.append_point(&self.C_S);

        let t = transcript.challenge_scalar::<G::ScalarField>();
        let t_inv = t.inverse().unwrap();
        let t2 = t.square();
        let t3 = t2 * t;
        let delta_inv = delta.inverse().unwrap();

        let (pn_T, ps_T) = ch.reduced_public_terms(public, &mu, &delta_inv, &t, &t2, &t3);
        let P_T = public.G * ps_T + msm(&public.G_vec, &pn_T);

        let mut c_T = ch.combined_c_vec(&beta, &delta_inv, &t_inv, &t, &t2, &t3);
        c_T.resize(
            public.H_vec.len() + public.H_vec_aux.len(),
            G::ScalarField::zero(),
        );

        let mut V_hat = G::Group::zero();
        for i in 0..public.k {
            V_hat += V[i] * flag_combination(public.f_l, public.f_m, &lambda, &mu, public.nv, i);
        }
        V_hat.double_in_place();

        let C_T = (P_T + self.C_S * t_inv - self.C_O * delta + self.C_L * t - self.C_R * t2
            + V_hat * t3)
            .into_affine();

        self.norm_proof
            .verify(&public.wnla_public(c_T, rho, mu), &C_T, transcript)
    }
}

/// `F_l*lambda^(nv*i) + F_m*mu^(nv*i+1)`
fn flag_combination<F: ark_ff::PrimeField>(
    f_l: bool,
    f_m: bool,
    lambda: &F,
    mu: &F,
    nv: usize,
    i: usize,
) -> F {
    let mut res = F::zero();
    if f_l {
        res += pow(lambda, nv * i);
    }
    if f_m {
        res += pow(mu, nv * i + 1);
    }
    res
}

/// Routes `w_o` through the partition into a `len`-sized slot vector.
fn scatter<F: Field, P: Fn(PartitionType, usize) -> Option<usize>>(
    partition: &P,
    typ: PartitionType,
    w_o: &[F],
    len: usize,
) -> Vec<F> {
    (0..len)
        .map(|j| partition(typ, j).map(|i| w_o[i]).unwrap_or_else(F::zero))
        .collect()
}

/// Challenge-dependent coefficient vectors shared by prover and verifier.
struct ChallengeVectors<F: Field> {
    lambda_vec: Vec<F>,
    mu_vec: Vec<F>,
    c_nL: Vec<F>,
    c_nR: Vec<F>,
    c_nO: Vec<F>,
    c_lL: Vec<F>,
    c_lR: Vec<F>,
    c_lO: Vec<F>,
    cl0: Vec<F>,
}

impl<F: ark_ff::PrimeField> ChallengeVectors<F> {
    fn new<G, P>(public: &ArithmeticCircuitPublic<G, P>, lambda: &F, mu: &F) -> Self
    where
        G: AffineRepr<ScalarField = F>,
        P: Fn(PartitionType, usize) -> Option<usize>,
    {
        let (nm, nv, nl, k) = (public.nm, public.nv, public.nl, public.k);

        let mut lambda_vec = powers(lambda, nl);
        if public.f_l && public.f_m {
            let cross = add_vecs(
                &tensor_product(&scale(&powers(lambda, nv), mu), &powers(&pow(mu, nv), k)),
                &tensor_product(&powers(mu, nv), &powers(&pow(lambda, nv), k)),
            );
            lambda_vec = sub_vecs(&lambda_vec, &cross);
        }

        let mu_vec = scale(&powers(mu, nm), mu);

        let sl = WeightSlices::new(public);
        let mu_inv = mu.inverse().unwrap();
        let mu_inv_powers = powers_starting_from(mu_inv, &mu_inv, nm);

        let c_n = |m_l: &[Vec<F>], m_m: &[Vec<F>]| {
            hadamard_product(
                &sub_vecs(
                    &vector_matrix_mul(&lambda_vec, m_l),
                    &vector_matrix_mul(&mu_vec, m_m),
                ),
                &mu_inv_powers,
            )
        };
        let c_l = |m_l: &[Vec<F>], m_m: &[Vec<F>]| {
            sub_vecs(
                &vector_matrix_mul(&lambda_vec, m_l),
                &vector_matrix_mul(&mu_vec, m_m),
            )
        };

        let c_nL = c_n(&sl.ln_L, &sl.mn_L);
        let c_nR = c_n(&sl.ln_R, &sl.mn_R);
        let c_nO = c_n(&sl.ln_O, &sl.mn_O);
        let c_lL = c_l(&sl.ll_L, &sl.ml_L);
        let c_lR = c_l(&sl.ll_R, &sl.ml_R);
        let c_lO = c_l(&sl.ll_O, &sl.ml_O);

        let mut cl0 = zero_vec(nv.saturating_sub(1));
        if public.f_l {
            cl0 = add_vecs(&cl0, &powers(lambda, nv)[1..]);
        }
        if public.f_m {
            cl0 = sub_vecs(&cl0, &scale(&powers(mu, nv)[1..], mu));
        }

        Self {
            lambda_vec,
            mu_vec,
            c_nL,
            c_nR,
            c_nO,
            c_lL,
            c_lR,
            c_lO,
            cl0,
        }
    }

    /// `pn_T = (t^3/delta)*c_nO - t^2*c_nL + t*c_nR` and the matching scalar
    /// `ps_T = |pn_T|^2_mu + 2t^3*(<lambda_vec, a_l> - <mu_vec, a_m>)`.
    fn reduced_public_terms<G, P>(
        &self,
        public: &ArithmeticCircuitPublic<G, P>,
        mu: &F,
        delta_inv: &F,
        t: &F,
        t2: &F,
        t3: &F,
    ) -> (Vec<F>, F)
    where
        G: AffineRepr<ScalarField = F>,
        P: Fn(PartitionType, usize) -> Option<usize>,
    {
        let two = F::from(2u64);
        let mut pn_T = scale(&self.c_nO, &(*delta_inv * t3));
        pn_T = sub_vecs(&pn_T, &scale(&self.c_nL, t2));
        pn_T = add_vecs(&pn_T, &scale(&self.c_nR, t));

        let ps_T = weighted_norm(&pn_T, mu)
            + two * *t3 * inner_product(&self.lambda_vec, &public.a_l)
            - two * *t3 * inner_product(&self.mu_vec, &public.a_m);
        (pn_T, ps_T)
    }

    /// `c_T = (1, beta*t^-1, beta*t, ..., beta*t^7) || (2*((t^3/delta)*c_lO - t^2*c_lL + t*c_lR) - cl0)`
    fn combined_c_vec(
        &self,
        beta: &F,
        delta_inv: &F,
        t_inv: &F,
        t: &F,
        t2: &F,
        t3: &F,
    ) -> Vec<F> {
        let two = F::from(2u64);
        let t4 = *t3 * t;
        let t5 = t4 * t;
        let t6 = t5 * t;
        let t7 = t6 * t;

        let mut c_T = vec![
            F::one(),
            *beta * t_inv,
            *beta * t,
            *beta * t2,
            *beta * t3,
            *beta * t4,
            *beta * t5,
            *beta * t6,
            *beta * t7,
        ];

        let mut c_l = scale(&self.c_lO, &(*t3 * delta_inv));
        c_l = sub_vecs(&c_l, &scale(&self.c_lL, t2));
        c_l = add_vecs(&c_l, &scale(&self.c_lR, t));
        c_l = sub_vecs(&scale(&c_l, &two), &self.cl0);

        c_T.extend(c_l);
        c_T
    }
}

/// Column blocks of the constraint matrices, split by the witness slot they
/// act on: the `w_l` block, the `w_r` block, and the `w_o` block scattered
/// through the partition into the `n_o`/`l_l`/`l_r`/`l_o` positions.
struct WeightSlices<F> {
    ln_L: Vec<Vec<F>>,
    mn_L: Vec<Vec<F>>,
    ln_R: Vec<Vec<F>>,
    mn_R: Vec<Vec<F>>,
    ln_O: Vec<Vec<F>>,
    mn_O: Vec<Vec<F>>,
    ll_L: Vec<Vec<F>>,
    ml_L: Vec<Vec<F>>,
    ll_R: Vec<Vec<F>>,
    ml_R: Vec<Vec<F>>,
    ll_O: Vec<Vec<F>>,
    ml_O: Vec<Vec<F>>,
}

impl<F: Field> WeightSlices<F> {
    fn new<G, P>(public: &ArithmeticCircuitPublic<G, P>) -> Self
    where
        G: AffineRepr<ScalarField = F>,
        P: Fn(PartitionType, usize) -> Option<usize>,
    {
        let nm = public.nm;
        let block = |m: &[Vec<F>], from: usize, to: usize| -> Vec<Vec<F>> {
            m.iter().map(|row| row[from..to].to_vec()).collect()
        };
        let scatter_cols = |m: &[Vec<F>], typ: PartitionType, cols: usize| -> Vec<Vec<F>> {
            m.iter()
                .map(|row| {
                    (0..cols)
                        .map(|j| {
                            (public.partition)(typ, j)
                                .map(|i| row[2 * nm + i])
                                .unwrap_or_else(F::zero)
                        })
                        .collect()
                })
                .collect()
        };

        Self {
            ln_L: block(&public.W_l, 0, nm),
            mn_L: block(&public.W_m, 0, nm),
            ln_R: block(&public.W_l, nm, 2 * nm),
            mn_R: block(&public.W_m, nm, 2 * nm),
            ln_O: scatter_cols(&public.W_l, PartitionType::NO, nm),
            mn_O: scatter_cols(&public.W_m, PartitionType::NO, nm),
            ll_L: scatter_cols(&public.W_l, PartitionType::LL, public.nv),
            ml_L: scatter_cols(&public.W_m, PartitionType::LL, public.nv),
            ll_R: scatter_cols(&public.W_l, PartitionType::LR, public.nv),
            ml_R: scatter_cols(&public.W_m, PartitionType::LR, public.nv),
            ll_O: scatter_cols(&public.W_l, PartitionType::LO, public.nv),
            ml_O: scatter_cols(&public.W_m, PartitionType::LO, public.nv),
        }
    }
}

fn validate_witness<G, P>(
    public: &ArithmeticCircuitPublic<G, P>,
    witness: &ArithmeticCircuitWitness<G::ScalarField>,
) -> Result<(), BpppError>
where
    G: AffineRepr,
    P: Fn(PartitionType, usize) -> Option<usize>,
{
    if witness.v.len() != public.k || witness.s_v.len() != public.k {
        return Err(BpppError::UnexpectedLengthOfVectors(format!(
            "{} committed vectors with {} blindings, expected k={}",
            witness.v.len(),
            witness.s_v.len(),
            public.k
        )));
    }
    if witness.v.iter().any(|v_i| v_i.len() != public.nv) {
        return Err(BpppError::UnexpectedLengthOfVectors(format!(
            "every committed vector must have nv={} entries",
            public.nv
        )));
    }
    if witness.w_l.len() != public.nm || witness.w_r.len() != public.nm {
        return Err(BpppError::UnexpectedLengthOfVectors(format!(
            "w_l has {} and w_r {} entries, both must be nm={}",
            witness.w_l.len(),
            witness.w_r.len(),
            public.nm
        )));
    }
    if witness.w_o.len() != public.no {
        return Err(BpppError::UnexpectedLengthOfVectors(format!(
            "w_o has {} entries, expected no={}",
            witness.w_o.len(),
            public.no
        )));
    }
    Ok(())
}

fn concat<F: Field>(a: &[F], b: &[F]) -> Vec<F> {
    let mut res = a.to_vec();
    res.extend_from_slice(b);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{setup::WeightNormLinearPublic, transcript::KeccakTranscript};
    use ark_bn254::{Fr, G1Affine};
    use ark_std::{
        rand::{prelude::StdRng, SeedableRng},
        UniformRand,
    };

    fn fr(v: i64) -> Fr {
        Fr::from(v)
    }

    fn frac(a: i64, b: i64) -> Fr {
        fr(a) * fr(b).inverse().unwrap()
    }

    fn prove_and_verify<P>(
        public: &ArithmeticCircuitPublic<G1Affine, P>,
        witness: &ArithmeticCircuitWitness<Fr>,
        rng: &mut StdRng,
    ) where
        P: Fn(PartitionType, usize) -> Option<usize>,
    {
        let V = (0..public.k)
            .map(|i| public.commit_witness(&witness.v[i], &witness.s_v[i]))
            .collect::<Vec<_>>();

        let mut prover_transcript = KeccakTranscript::new();
        let proof =
            ArithmeticCircuitProof::new(public, witness, rng, &mut prover_transcript).unwrap();

        let mut verifier_transcript = KeccakTranscript::new();
        proof
            .verify(public, &V, &mut verifier_transcript)
            .unwrap();
    }

    // x + y = r and x * y = z for public r, z.
    #[test]
    fn sum_and_product_circuit() {
        let mut rng = StdRng::seed_from_u64(0u64);

        let (x, y) = (fr(3), fr(5));
        let (r, z) = (fr(8), fr(15));

        let (nm, no, nv, k) = (1, 2, 2, 1);
        let nl = nv * k;
        let nw = nm + nm + no;

        let wnla = WeightNormLinearPublic::<G1Affine>::new(&mut rng, 16, 1);

        let public = ArithmeticCircuitPublic {
            nm,
            nl,
            nv,
            nw,
            no,
            k,
            G: wnla.G,
            G_vec: wnla.G_vec[..nm].to_vec(),
            H_vec: wnla.H_vec[..9 + nv].to_vec(),
            W_m: vec![vec![fr(0), fr(0), fr(1), fr(0)]],
            W_l: vec![
                vec![fr(0), fr(1), fr(0), fr(0)],
                vec![fr(1), fr(0), fr(0), fr(-1)],
            ],
            a_m: vec![fr(0)],
            a_l: vec![-r, fr(0)],
            f_l: true,
            f_m: false,
            partition: |typ: PartitionType, index: usize| {
                if typ == PartitionType::LL {
                    Some(index)
                } else {
                    None
                }
            },
            G_vec_aux: wnla.G_vec[nm..].to_vec(),
            H_vec_aux: wnla.H_vec[9 + nv..].to_vec(),
        };

        let witness = ArithmeticCircuitWitness {
            v: vec![vec![x, y]],
            s_v: vec![Fr::rand(&mut rng)],
            w_l: vec![x],
            w_r: vec![y],
            w_o: vec![z, r],
        };

        prove_and_verify(&public, &witness, &mut rng);
    }

    // Knowledge of p, q with p*q = 15, routed through the n_o slots.
    #[test]
    fn product_relation_circuit() {
        let mut rng = StdRng::seed_from_u64(1u64);

        let (p, q) = (fr(3), fr(5));

        // M = [-p, -q] * (z*p + z^2*q)^-1 at z = 10 maps the single-output
        // relation onto the two committed values.
        let m = scale(&[fr(-3), fr(-5)], &frac(1, 530));
        let a_l = scale(&m, &fr(-15_000));
        let W_l_w = scale(&m, &fr(15_530));
        let w_inv = [frac(3, 259), frac(5, 259), frac(15, 259)];

        let W_l = (0..2)
            .map(|i| (0..3).map(|j| W_l_w[i] * w_inv[j]).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let W_m = vec![vec![fr(0), fr(0), fr(1)]];

        let (nm, no, nv, k) = (1, 1, 2, 1);
        let nl = nv * k;
        let nw = nm + nm + no;

        let wnla = WeightNormLinearPublic::<G1Affine>::new(&mut rng, 16, 1);

        let public = ArithmeticCircuitPublic {
            nm,
            nl,
            nv,
            nw,
            no,
            k,
            G: wnla.G,
            G_vec: wnla.G_vec[..nm].to_vec(),
            H_vec: wnla.H_vec[..9 + nv].to_vec(),
            W_m,
            W_l,
            a_m: vec![fr(0)],
            a_l,
            f_l: true,
            f_m: false,
            partition: |typ: PartitionType, index: usize| {
                if typ == PartitionType::NO {
                    Some(index)
                } else {
                    None
                }
            },
            G_vec_aux: wnla.G_vec[nm..].to_vec(),
            H_vec_aux: wnla.H_vec[9 + nv..].to_vec(),
        };

        let witness = ArithmeticCircuitWitness {
            v: vec![vec![p, q]],
            s_v: vec![Fr::rand(&mut rng)],
            w_l: vec![p],
            w_r: vec![q],
            w_o: vec![p * q],
        };

        prove_and_verify(&public, &witness, &mut rng);
    }

    // Each bit b of 0110 satisfies b*b = a and a - b = 0.
    #[test]
    fn binary_range_circuit() {
        let mut rng = StdRng::seed_from_u64(2u64);

        let value = [fr(0), fr(1), fr(1), fr(0)];
        let a = hadamard_product(&value, &value);

        let (nm, no, nv, k) = (4, 4, 2, 4);
        let nl = nv * k; // 8
        let nw = nm + nm + no; // 12

        let mut W_m = vec![zero_vec::<Fr>(nw); nm];
        for i in 0..nm {
            W_m[i][2 * nm + i] = fr(1);
        }

        let mut W_l = vec![zero_vec::<Fr>(nw); nl];
        for i in 0..nm {
            W_l[2 * i][i] = fr(-1);
            W_l[2 * i + 1][i] = fr(-1);
        }

        let wnla = WeightNormLinearPublic::<G1Affine>::new(&mut rng, 16, nm);

        let public = ArithmeticCircuitPublic {
            nm,
            nl,
            nv,
            nw,
            no,
            k,
            G: wnla.G,
            G_vec: wnla.G_vec[..nm].to_vec(),
            H_vec: wnla.H_vec[..9 + nv].to_vec(),
            W_m,
            W_l,
            a_m: zero_vec(nm),
            a_l: zero_vec(nl),
            f_l: true,
            f_m: false,
            partition: |typ: PartitionType, index: usize| {
                if typ == PartitionType::NO {
                    Some(index)
                } else {
                    None
                }
            },
            G_vec_aux: wnla.G_vec[nm..].to_vec(),
            H_vec_aux: wnla.H_vec[9 + nv..].to_vec(),
        };

        let witness = ArithmeticCircuitWitness {
            v: (0..k).map(|i| vec![value[i], a[i]]).collect(),
            s_v: (0..k).map(|_| Fr::rand(&mut rng)).collect(),
            w_l: value.to_vec(),
            w_r: value.to_vec(),
            w_o: a.clone(),
        };

        prove_and_verify(&public, &witness, &mut rng);
    }
}
