use ark_std::string::String;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum BpppError {
    UnexpectedLengthOfVectors(String),
    ValueIncompatibleWithBase(String),
    WeightedNormLinearArgumentVerificationFailed,
}
