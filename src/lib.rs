//! # Pedersen Commitments and the Diffie-Hellman Sigma Protocol
//!
//! ## Overview
//!
//! This library implements the cryptographic core of a two-party
//! secure-computation stack:
//!
//! - A **Pedersen commitment scheme** with a trapdoor extension. A receiver
//!   establishes `h = g^tau` for a private trapdoor `tau`; a committer then
//!   commits to a value `x` as `c = g^r * h^x` and later decommits by
//!   revealing `(x, r)`. The scheme is unconditionally hiding and
//!   computationally binding under the discrete-log assumption.
//! - A **sigma protocol for the Diffie-Hellman tuple relation**
//!   `{(g, h, u, v; w) : u = g^w and v = h^w}`, with prover, verifier and
//!   honest-verifier simulator roles parameterised by a soundness parameter
//!   `t` (the verifier's challenge is exactly `t` bits).
//!
//! Both protocols run over a prime-order cyclic group in which the
//! Decisional Diffie-Hellman assumption is believed to hold, and exchange
//! messages through a blocking, length-prefixed byte [`channel`](crate::channel).
//!
//! ## Quick start
//!
//! ```rust
//! use sigma_pedersen::{
//!     DlogGroup, SecureRng, SigmaDhCommonInput, SigmaDhProver, SigmaDhProverInput,
//!     SigmaDhVerifier, ZpGroup,
//! };
//!
//! let group = ZpGroup::rfc5114_2048_256();
//! let mut rng = SecureRng::new();
//!
//! // The prover knows w with u = g^w and v = h^w.
//! let w = group.random_exponent(&mut rng);
//! let h = group.exponentiate(group.generator(), &group.random_exponent(&mut rng));
//! let u = group.exponentiate(group.generator(), &w);
//! let v = group.exponentiate(&h, &w);
//!
//! let common = SigmaDhCommonInput::new(h, u, v);
//! let mut prover = SigmaDhProver::new(group.clone(), 80, SecureRng::new()).unwrap();
//! let mut verifier = SigmaDhVerifier::new(group, 80, rng).unwrap();
//!
//! let first = prover
//!     .compute_first_message(SigmaDhProverInput::new(common.clone(), w))
//!     .unwrap();
//! let challenge = verifier.sample_challenge();
//! let second = prover.compute_second_message(&challenge).unwrap();
//!
//! assert!(verifier.verify(&common, &first, &second).unwrap());
//! ```
//!
//! ## Security considerations
//!
//! - **Group agreement**: committer and receiver must construct identical
//!   group parameters out-of-band; both roles reject groups that are not
//!   DDH-hard or fail their own validation predicate.
//! - **Randomness**: every role takes a caller-supplied
//!   [`CryptoRngCore`](rand_core::CryptoRngCore); use [`SecureRng`] unless
//!   you have a reason not to.
//! - **Single-use provers**: a [`SigmaDhProver`] drives exactly one proof;
//!   create a fresh instance per proof.
//! - **Secret hygiene**: the prover's nonce is overwritten with zero as soon
//!   as the response is computed, and the verifier wipes its stored
//!   challenge after deciding.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all)]

/// Blocking length-prefixed byte channel between the two endpoints.
pub mod channel;
/// Cryptographic primitives: the dlog group contract and randomness.
pub mod crypto;
/// Error types for the library.
pub mod error;
/// Concrete dlog group implementations.
pub mod groups;
/// Wall-clock task measurement with a JSON report.
pub mod measurement;
/// Pedersen commitment scheme (committer, receiver, trapdoor extension).
pub mod pedersen;
/// Sigma protocol for the Diffie-Hellman tuple relation.
pub mod sigma;

pub use channel::{Channel, TcpChannel};
pub use crypto::{DlogGroup, SecureRng};
pub use error::Error;
pub use groups::ZpGroup;
pub use measurement::Measurement;
pub use pedersen::{
    CommitPhaseOutput, CommitValue, PedersenCommitmentMessage, PedersenCommitter,
    PedersenDecommitmentMessage, PedersenReceiver, PedersenTrapdoorCommitter,
    PedersenTrapdoorReceiver, TrapdoorMessage,
};
pub use sigma::{
    SigmaBiMessage, SigmaDhCommonInput, SigmaDhMessage, SigmaDhProver, SigmaDhProverInput,
    SigmaDhSimulator, SigmaDhVerifier, SigmaSimulatorOutput,
};

/// A specialized Result type for protocol operations.
pub type Result<T> = core::result::Result<T, Error>;
