//! Three-move public-coin proof system for the Diffie-Hellman tuple
//! relation `{(g, h, u, v; w) : u = g^w and v = h^w}`.
//!
//! The verifier's challenge is a uniform bit string of exactly `t` bits for
//! a soundness parameter `t` with `2^t < q`, giving a cheating prover at
//! most a `2^-t` success probability.

/// Prover implementation (first and second protocol messages).
pub mod prover;
/// Honest-verifier simulator used to argue zero knowledge.
pub mod simulator;
/// Verifier implementation (challenge sampling and verification).
pub mod verifier;

use core::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

pub use prover::SigmaDhProver;
pub use simulator::{SigmaDhSimulator, SigmaSimulatorOutput};
pub use verifier::SigmaDhVerifier;

use crate::{DlogGroup, Error, Result};

/// The statement shared by prover and verifier: `(h, u, v)` with the group
/// generator `g` implied, for the alleged relation `u = g^w`, `v = h^w`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigmaDhCommonInput<G: DlogGroup> {
    h: G::Element,
    u: G::Element,
    v: G::Element,
}

impl<G: DlogGroup> SigmaDhCommonInput<G> {
    /// Creates the common input from the three public elements.
    pub fn new(h: G::Element, u: G::Element, v: G::Element) -> Self {
        Self { h, u, v }
    }

    /// The second generator `h`.
    pub fn h(&self) -> &G::Element {
        &self.h
    }

    /// The alleged `g^w`.
    pub fn u(&self) -> &G::Element {
        &self.u
    }

    /// The alleged `h^w`.
    pub fn v(&self) -> &G::Element {
        &self.v
    }
}

/// The prover's input: the common statement together with the witness `w`.
#[derive(Clone, Debug)]
pub struct SigmaDhProverInput<G: DlogGroup> {
    common: SigmaDhCommonInput<G>,
    witness: BigUint,
}

impl<G: DlogGroup> SigmaDhProverInput<G> {
    /// Pairs a statement with its witness.
    pub fn new(common: SigmaDhCommonInput<G>, witness: BigUint) -> Self {
        Self { common, witness }
    }

    /// The public part of the input.
    pub fn common(&self) -> &SigmaDhCommonInput<G> {
        &self.common
    }

    /// The witness `w`.
    pub fn witness(&self) -> &BigUint {
        &self.witness
    }

    pub(crate) fn into_parts(self) -> (SigmaDhCommonInput<G>, BigUint) {
        (self.common, self.witness)
    }
}

/// The prover's first message: the pair `(a, b) = (g^r, h^r)` in sendable
/// form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SigmaDhMessage {
    a: Vec<u8>,
    b: Vec<u8>,
}

impl SigmaDhMessage {
    /// Wraps the sendable encodings of the two elements.
    pub fn new(a: Vec<u8>, b: Vec<u8>) -> Self {
        Self { a, b }
    }

    /// Sendable form of `a`.
    pub fn a(&self) -> &[u8] {
        &self.a
    }

    /// Sendable form of `b`.
    pub fn b(&self) -> &[u8] {
        &self.b
    }

    /// Serializes as `[a_len: u32 BE][a][b]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.a.len() + self.b.len());
        out.extend_from_slice(&(self.a.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.a);
        out.extend_from_slice(&self.b);
        out
    }

    /// Parses the serialized form produced by [`SigmaDhMessage::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::BadInput(
                "Sigma DH message is too short for its length prefix".to_string(),
            ));
        }
        let a_len = u32::from_be_bytes(
            bytes[..4]
                .try_into()
                .unwrap_or_else(|_| unreachable!("slice is exactly 4 bytes")),
        ) as usize;
        let rest = &bytes[4..];
        if a_len == 0 || a_len >= rest.len() {
            return Err(Error::BadInput(
                "Sigma DH message carries an inconsistent element length".to_string(),
            ));
        }
        Ok(Self {
            a: rest[..a_len].to_vec(),
            b: rest[a_len..].to_vec(),
        })
    }
}

impl fmt::Display for SigmaDhMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(&self.a), hex::encode(&self.b))
    }
}

impl FromStr for SigmaDhMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (a, b) = s.split_once(':').ok_or_else(|| {
            Error::BadInput("Sigma DH message string is missing the ':' delimiter".to_string())
        })?;
        let a = hex::decode(a)
            .map_err(|e| Error::BadInput(format!("Sigma DH message element a is not hex: {e}")))?;
        let b = hex::decode(b)
            .map_err(|e| Error::BadInput(format!("Sigma DH message element b is not hex: {e}")))?;
        if a.is_empty() || b.is_empty() {
            return Err(Error::BadInput(
                "Sigma DH message elements must be non-empty".to_string(),
            ));
        }
        Ok(Self { a, b })
    }
}

/// The prover's second message: the single exponent `z`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SigmaBiMessage {
    z: BigUint,
}

impl SigmaBiMessage {
    /// Wraps the response exponent.
    pub fn new(z: BigUint) -> Self {
        Self { z }
    }

    /// The response `z`.
    pub fn z(&self) -> &BigUint {
        &self.z
    }

    /// Big-endian byte form of `z`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.z.to_bytes_be()
    }

    /// Parses the big-endian byte form.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            z: BigUint::from_bytes_be(bytes),
        }
    }
}

/// Number of challenge bytes for a soundness parameter of `t` bits.
pub(crate) fn challenge_byte_len(t: u32) -> usize {
    (t as usize).div_ceil(8)
}

/// The soundness parameter is valid iff `2^t < q`.
pub(crate) fn soundness_holds(t: u32, order: &BigUint) -> bool {
    (BigUint::one() << (t as usize)) < *order
}

pub(crate) fn check_soundness(t: u32, order: &BigUint) -> Result<()> {
    if !soundness_holds(t, order) {
        return Err(Error::BadInput(format!(
            "Soundness parameter t = {t} does not satisfy 2^t < q"
        )));
    }
    Ok(())
}

pub(crate) fn check_challenge_length(t: u32, challenge: &[u8]) -> Result<()> {
    if challenge.len() != challenge_byte_len(t) {
        return Err(Error::CheatAttempt(format!(
            "Challenge of {} bytes differs from the soundness parameter ({} bytes expected)",
            challenge.len(),
            challenge_byte_len(t)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dh_message_byte_roundtrip() {
        let msg = SigmaDhMessage::new(vec![1, 2, 3], vec![4, 5]);
        let back = SigmaDhMessage::from_bytes(&msg.to_bytes()).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn dh_message_string_roundtrip() {
        let msg = SigmaDhMessage::new(vec![0xde, 0xad], vec![0xbe, 0xef]);
        assert_eq!(msg.to_string(), "dead:beef");
        assert_eq!("dead:beef".parse::<SigmaDhMessage>().unwrap(), msg);
    }

    #[test]
    fn dh_message_rejects_truncation() {
        let msg = SigmaDhMessage::new(vec![1, 2, 3], vec![4, 5]);
        let mut bytes = msg.to_bytes();
        bytes.truncate(6);
        assert!(SigmaDhMessage::from_bytes(&bytes).is_err());
        assert!(SigmaDhMessage::from_bytes(&bytes[..3]).is_err());
    }

    #[test]
    fn dh_message_rejects_missing_delimiter() {
        assert!("deadbeef".parse::<SigmaDhMessage>().is_err());
    }

    #[test]
    fn bi_message_roundtrip() {
        let msg = SigmaBiMessage::new(BigUint::from(123456789u64));
        assert_eq!(SigmaBiMessage::from_bytes(&msg.to_bytes()), msg);
    }

    #[test]
    fn challenge_byte_len_rounds_up() {
        assert_eq!(challenge_byte_len(80), 10);
        assert_eq!(challenge_byte_len(81), 11);
        assert_eq!(challenge_byte_len(3), 1);
    }

    #[test]
    fn soundness_boundary() {
        let eleven = BigUint::from(11u8);
        assert!(soundness_holds(3, &eleven));
        assert!(!soundness_holds(4, &eleven));
    }
}
