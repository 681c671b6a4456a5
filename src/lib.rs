#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

pub mod circuit;
pub mod error;
pub mod ff;
pub mod rangeproof;
pub mod setup;
pub mod transcript;
pub mod util;
pub mod weighted_norm_linear_argument;

pub mod prelude {
    pub use crate::{
        circuit::{
            ArithmeticCircuitProof, ArithmeticCircuitPublic, ArithmeticCircuitWitness,
            PartitionType,
        },
        error::BpppError,
        rangeproof::{RangeProof, RangeProofPublic, RangeProofWitness},
        setup::WeightNormLinearPublic,
        transcript::{KeccakTranscript, Transcript},
        weighted_norm_linear_argument::WeightedNormLinearArgument,
    };
}
