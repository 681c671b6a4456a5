//! Reciprocal range proof: shows that the value committed in
//! `V = x*G + s*H_vec[0]` lies in `[0, base^nd)` by proving, through the
//! arithmetic-circuit argument, that its base-`np` digits satisfy the
//! reciprocal identity `sum_j 1/(d_j + e) = sum_i m_i/(i + e)`.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{batch_inversion, Field, One};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{format, rand::RngCore, vec, vec::Vec, UniformRand};

use crate::{
    circuit::{
        ArithmeticCircuitProof, ArithmeticCircuitPublic, ArithmeticCircuitWitness, PartitionType,
    },
    error::BpppError,
    ff::{msm, powers, zero_vec},
    setup::random_points,
    transcript::Transcript,
};

/// Public parameters for range proofs over `nd` digits in base `np`.
///
/// `H_vec` holds `nv + 9` generators for the committed vector
/// `[x, d_0..d_{nd-1}, m_0..m_{np-1}, r_0..r_{nd-1}]` (`nv = 2*nd + np + 1`);
/// the aux vectors pad the norm-argument bases to powers of two.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RangeProofPublic<G: AffineRepr> {
    pub G: G,
    pub G_vec: Vec<G>,
    pub H_vec: Vec<G>,
    pub nd: usize,
    pub np: usize,
    pub G_vec_aux: Vec<G>,
    pub H_vec_aux: Vec<G>,
}

/// Secret side of the statement: the value, its little-endian digits, the
/// per-pole multiplicities `m_i = #{j : d_j = i}` and the commitment blinding.
#[derive(Clone, Debug)]
pub struct RangeProofWitness<F: Field> {
    pub x: F,
    pub digits: Vec<F>,
    pub multiplicities: Vec<F>,
    pub s: F,
}

#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct RangeProof<G: AffineRepr> {
    pub circuit_proof: ArithmeticCircuitProof<G>,
    /// Commitment to the digit, multiplicity and reciprocal slots; the
    /// verifier adds it to the value commitment to obtain the circuit input.
    pub R: G,
}

impl<G: AffineRepr> RangeProofPublic<G> {
    pub fn new<R: RngCore>(rng: &mut R, nd: usize, np: usize) -> Self {
        let nv = 2 * nd + np + 1;
        let h_total = (nv + 9).next_power_of_two();
        let g_total = nd.next_power_of_two();
        let mut h_vec: Vec<G> = random_points(rng, h_total);
        let mut g_vec: Vec<G> = random_points(rng, g_total);
        let h_vec_aux = h_vec.split_off(nv + 9);
        let g_vec_aux = g_vec.split_off(nd);
        Self {
            G: G::Group::rand(rng).into_affine(),
            G_vec: g_vec,
            H_vec: h_vec,
            nd,
            np,
            G_vec_aux: g_vec_aux,
            H_vec_aux: h_vec_aux,
        }
    }

    /// `V = x*G + s*H_vec[0]`
    pub fn commit_value(&self, x: &G::ScalarField, s: &G::ScalarField) -> G {
        (self.G * *x + self.H_vec[0] * *s).into_affine()
    }
}

impl<G: AffineRepr> RangeProof<G> {
    /// Prove that the value committed in `V` decomposes into `nd` digits of
    /// base `np`.
    pub fn new<R: RngCore>(
        public: &RangeProofPublic<G>,
        V: &G,
        witness: &RangeProofWitness<G::ScalarField>,
        rng: &mut R,
        transcript: &mut impl Transcript,
    ) -> Result<Self, BpppError> {
        if witness.digits.len() != public.nd {
            return Err(BpppError::ValueIncompatibleWithBase(format!(
                "{} digits, expected nd={}",
                witness.digits.len(),
                public.nd
            )));
        }
        if witness.multiplicities.len() != public.np {
            return Err(BpppError::ValueIncompatibleWithBase(format!(
                "{} multiplicities, expected np={}",
                witness.multiplicities.len(),
                public.np
            )));
        }

        transcript.append_point(V);
        let e = transcript.challenge_scalar::<G::ScalarField>();

        // r_j = 1/(d_j + e)
        let mut r = witness
            .digits
            .iter()
            .map(|d| *d + e)
            .collect::<Vec<_>>();
        batch_inversion(&mut r);

        let mut v = Vec::with_capacity(2 * public.nd + public.np + 1);
        v.push(witness.x);
        v.extend_from_slice(&witness.digits);
        v.extend_from_slice(&witness.multiplicities);
        v.extend_from_slice(&r);

        // Commits every slot of `v` except the value, so that the circuit
        // commitment is the sum of V and R.
        let r_blind = G::ScalarField::rand(rng);
        let R = (public.H_vec[0] * r_blind + msm(&public.H_vec[9..], &v[1..])).into_affine();

        let circuit = reciprocal_circuit(public, &e);
        let circuit_witness = ArithmeticCircuitWitness {
            v: vec![v],
            s_v: vec![witness.s + r_blind],
            w_l: witness.digits.clone(),
            w_r: r,
            w_o: witness.multiplicities.clone(),
        };

        let circuit_proof =
            ArithmeticCircuitProof::new(&circuit, &circuit_witness, rng, transcript)?;
        Ok(Self { circuit_proof, R })
    }

    /// Verify against the value commitment `V`.
    pub fn verify(
        &self,
        public: &RangeProofPublic<G>,
        V: &G,
        transcript: &mut impl Transcript,
    ) -> Result<(), BpppError> {
        transcript.append_point(V);
        let e = transcript.challenge_scalar::<G::ScalarField>();

        let circuit = reciprocal_circuit(public, &e);
        let V_full = (V.into_group() + self.R).into_affine();
        self.circuit_proof.verify(&circuit, &[V_full], transcript)
    }
}

/// Constraint system of the reciprocal argument for challenge `e`, over the
/// witness `w = d || r || m` and committed vector `[x, d, m, r]`:
/// multiplication gates `r_i*(d_i + e) = 1`, one linear row tying
/// `x = sum_j d_j*np^j`, diagonal rows tying the `d` and `m` slots, and `nd`
/// rows enforcing `sum_j r_j = sum_i m_i/(e + i)`.
fn reciprocal_circuit<G: AffineRepr>(
    public: &RangeProofPublic<G>,
    e: &G::ScalarField,
) -> ArithmeticCircuitPublic<G, impl Fn(PartitionType, usize) -> Option<usize>> {
    let nd = public.nd;
    let np = public.np;
    let nm = nd;
    let no = np;
    let nv = 2 * nd + np + 1;
    let nl = nv;
    let nw = 2 * nd + np;

    let mut W_m = vec![zero_vec::<G::ScalarField>(nw); nm];
    for i in 0..nm {
        W_m[i][nd + i] = -*e;
    }
    let a_m = vec![G::ScalarField::one(); nm];

    let mut W_l = vec![zero_vec::<G::ScalarField>(nw); nl];

    let base_powers = powers(&G::ScalarField::from(np as u64), nd);
    for j in 0..nd {
        W_l[0][j] = -base_powers[j];
    }
    for i in 0..nd {
        W_l[1 + i][i] = -G::ScalarField::one();
    }
    for i in 0..np {
        W_l[1 + nd + i][2 * nd + i] = -G::ScalarField::one();
    }

    let mut pole_invs = (0..np)
        .map(|j| *e + G::ScalarField::from(j as u64))
        .collect::<Vec<_>>();
    batch_inversion(&mut pole_invs);
    for i in 0..nd {
        let row = 1 + nd + np + i;
        for j in 0..nd {
            if j != i {
                W_l[row][nd + j] = G::ScalarField::one();
            }
        }
        for j in 0..np {
            W_l[row][2 * nd + j] = -pole_invs[j];
        }
    }

    ArithmeticCircuitPublic {
        nm,
        nl,
        nv,
        nw,
        no,
        k: 1,
        G: public.G,
        G_vec: public.G_vec.clone(),
        H_vec: public.H_vec.clone(),
        W_m,
        W_l,
        a_m,
        a_l: zero_vec(nl),
        f_l: true,
        f_m: false,
        partition: move |typ: PartitionType, index: usize| {
            if typ == PartitionType::LL && index < np {
                Some(index)
            } else {
                None
            }
        },
        G_vec_aux: public.G_vec_aux.clone(),
        H_vec_aux: public.H_vec_aux.clone(),
    }
}
