//! Keccak-based Fiat-Shamir transcript. The prover and verifier each drive
//! their own instance; identical absorb sequences yield identical challenges.

use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalSerialize;
use ark_std::vec::Vec;
use digest::Digest;
use sha3::Keccak256;

pub trait Transcript {
    fn append_point<G: AffineRepr>(&mut self, point: &G);
    fn append_scalar<F: PrimeField>(&mut self, scalar: &F);
    fn challenge_scalar<F: PrimeField>(&mut self) -> F;
}

/// Random-oracle transcript over a running Keccak256 sponge. A monotone
/// counter is absorbed before every challenge so that consecutive challenges
/// differ even without intervening absorbs.
#[derive(Clone, Default)]
pub struct KeccakTranscript {
    state: Keccak256,
    counter: u64,
}

impl KeccakTranscript {
    pub fn new() -> Self {
        Self {
            state: Keccak256::new(),
            counter: 0,
        }
    }
}

impl Transcript for KeccakTranscript {
    fn append_point<G: AffineRepr>(&mut self, point: &G) {
        let mut bytes = Vec::new();
        point
            .serialize_compressed(&mut bytes)
            .expect("serialization into a Vec is infallible");
        self.state.update(&bytes);
    }

    fn append_scalar<F: PrimeField>(&mut self, scalar: &F) {
        self.state.update(scalar_to_32_bytes(scalar));
    }

    fn challenge_scalar<F: PrimeField>(&mut self) -> F {
        self.counter += 1;
        self.append_scalar(&F::from(self.counter));
        // Sum without resetting: later absorbs continue the same sponge.
        let digest = self.state.clone().finalize();
        F::from_be_bytes_mod_order(&digest)
    }
}

/// 32-byte big-endian encoding, left-padded. Longer encodings keep their
/// first 32 bytes; canonical scalars of the supported fields never exceed 32.
pub fn scalar_to_32_bytes<F: PrimeField>(scalar: &F) -> [u8; 32] {
    let bytes = scalar.into_bigint().to_bytes_be();
    let mut res = [0u8; 32];
    if bytes.len() >= 32 {
        res.copy_from_slice(&bytes[..32]);
    } else {
        res[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn challenge_matches_keccak_of_absorbed_bytes() {
        let mut transcript = KeccakTranscript::new();
        transcript.append_scalar(&Fr::from(1u64));
        transcript.append_scalar(&Fr::from(2u64));
        let c1: Fr = transcript.challenge_scalar();

        let mut hasher = Keccak256::new();
        hasher.update(scalar_to_32_bytes(&Fr::from(1u64)));
        hasher.update(scalar_to_32_bytes(&Fr::from(2u64)));
        // counter absorbed before the first challenge
        hasher.update(scalar_to_32_bytes(&Fr::from(1u64)));
        let expected = Fr::from_be_bytes_mod_order(&hasher.finalize());

        assert_eq!(c1, expected);

        transcript.append_scalar(&Fr::from(3u64));
        let c2: Fr = transcript.challenge_scalar();

        let mut hasher = Keccak256::new();
        hasher.update(scalar_to_32_bytes(&Fr::from(1u64)));
        hasher.update(scalar_to_32_bytes(&Fr::from(2u64)));
        hasher.update(scalar_to_32_bytes(&Fr::from(1u64)));
        hasher.update(scalar_to_32_bytes(&Fr::from(3u64)));
        hasher.update(scalar_to_32_bytes(&Fr::from(2u64)));
        let expected = Fr::from_be_bytes_mod_order(&hasher.finalize());

        assert_eq!(c2, expected);
    }

    #[test]
    fn consecutive_challenges_differ() {
        let mut transcript = KeccakTranscript::new();
        let c1: Fr = transcript.challenge_scalar();
        let c2: Fr = transcript.challenge_scalar();
        assert_ne!(c1, c2);
    }

    #[test]
    fn same_absorbs_same_challenges() {
        let mut a = KeccakTranscript::new();
        let mut b = KeccakTranscript::new();
        a.append_scalar(&Fr::from(42u64));
        b.append_scalar(&Fr::from(42u64));
        assert_eq!(a.challenge_scalar::<Fr>(), b.challenge_scalar::<Fr>());
    }
}
