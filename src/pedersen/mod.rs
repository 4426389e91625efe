//! Pedersen commitment scheme over a channel.
//!
//! Two cooperating roles. The receiver runs a pre-processing phase that
//! fixes `h = g^tau` for a private trapdoor `tau` and sends `h` across the
//! channel; the committer then commits to a value `x` under a caller-chosen
//! id as `c = g^r * h^x` and later decommits by revealing `(x, r)`.
//!
//! The trapdoor extension in [`trapdoor`] lets the receiver reveal `tau`
//! after the commit phase, which higher-level protocols use for
//! equivocation-based arguments.

/// Committer role.
pub mod committer;
/// Receiver role.
pub mod receiver;
/// Trapdoor extension for both roles.
pub mod trapdoor;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

pub use committer::PedersenCommitter;
pub use receiver::PedersenReceiver;
pub use trapdoor::{PedersenTrapdoorCommitter, PedersenTrapdoorReceiver, TrapdoorMessage};

use crate::{DlogGroup, Error, Result};

/// A value a committer can commit to.
///
/// The Pedersen scheme commits to exponents, so only the big-integer
/// variant is accepted by
/// [`PedersenCommitter::generate_commitment_message`]; handing it a group
/// element is [`Error::BadInput`]. Schemes committing to group elements
/// share this type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CommitValue {
    /// An exponent in `[0, q-1]`.
    BigInteger(BigUint),
    /// A group element in its sendable form.
    GroupElement(Vec<u8>),
}

impl CommitValue {
    /// The committed value as bytes: big-endian for integers, the sendable
    /// form for group elements.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            CommitValue::BigInteger(x) => x.to_bytes_be(),
            CommitValue::GroupElement(bytes) => bytes.clone(),
        }
    }
}

/// What the receiver retains from a commit phase, sufficient to pair a
/// later decommitment with its commitment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommitPhaseOutput {
    /// Ordinary commit phase: just the commitment id.
    Basic {
        /// The committer-chosen id.
        id: u64,
    },
    /// Trapdoor mode: the id together with the receiver's trapdoor.
    Trapdoor {
        /// The committer-chosen id.
        id: u64,
        /// The exponent `tau` with `h = g^tau`.
        trapdoor: BigUint,
    },
}

impl CommitPhaseOutput {
    /// The commitment id, whichever the mode.
    pub fn id(&self) -> u64 {
        match self {
            CommitPhaseOutput::Basic { id } => *id,
            CommitPhaseOutput::Trapdoor { id, .. } => *id,
        }
    }
}

/// Commit-phase message: the commitment element under a caller-chosen id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PedersenCommitmentMessage {
    id: u64,
    commitment: Vec<u8>,
}

impl PedersenCommitmentMessage {
    /// Wraps the sendable form of the commitment element.
    pub fn new(id: u64, commitment: Vec<u8>) -> Self {
        Self { id, commitment }
    }

    /// The commitment id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Sendable form of the commitment element `c`.
    pub fn commitment(&self) -> &[u8] {
        &self.commitment
    }

    /// Serializes as `[id: u64 BE][c]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.commitment.len());
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.commitment);
        out
    }

    /// Parses the serialized form produced by
    /// [`PedersenCommitmentMessage::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() <= 8 {
            return Err(Error::BadInput(
                "Commitment message is too short to carry an id and an element".to_string(),
            ));
        }
        let id = u64::from_be_bytes(
            bytes[..8]
                .try_into()
                .unwrap_or_else(|_| unreachable!("slice is exactly 8 bytes")),
        );
        Ok(Self {
            id,
            commitment: bytes[8..].to_vec(),
        })
    }
}

/// Decommit-phase message: the revealed value and randomness `(x, r)`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PedersenDecommitmentMessage {
    x: BigUint,
    r: BigUint,
}

impl PedersenDecommitmentMessage {
    /// Wraps the revealed pair.
    pub fn new(x: BigUint, r: BigUint) -> Self {
        Self { x, r }
    }

    /// The revealed committed value.
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// The revealed commitment randomness.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Serializes as `[x_len: u32 BE][x BE][r BE]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let x = self.x.to_bytes_be();
        let r = self.r.to_bytes_be();
        let mut out = Vec::with_capacity(4 + x.len() + r.len());
        out.extend_from_slice(&(x.len() as u32).to_be_bytes());
        out.extend_from_slice(&x);
        out.extend_from_slice(&r);
        out
    }

    /// Parses the serialized form produced by
    /// [`PedersenDecommitmentMessage::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::BadInput(
                "Decommitment message is too short for its length prefix".to_string(),
            ));
        }
        let x_len = u32::from_be_bytes(
            bytes[..4]
                .try_into()
                .unwrap_or_else(|_| unreachable!("slice is exactly 4 bytes")),
        ) as usize;
        let rest = &bytes[4..];
        if x_len > rest.len() {
            return Err(Error::BadInput(
                "Decommitment message carries an inconsistent value length".to_string(),
            ));
        }
        Ok(Self {
            x: BigUint::from_bytes_be(&rest[..x_len]),
            r: BigUint::from_bytes_be(&rest[x_len..]),
        })
    }
}

/// What the committer retains per commitment id: the randomness, the
/// committed value and the commitment element itself.
#[derive(Clone, Debug)]
pub struct CommitmentPhaseValues<G: DlogGroup> {
    r: BigUint,
    value: CommitValue,
    commitment: G::Element,
}

impl<G: DlogGroup> CommitmentPhaseValues<G> {
    pub(crate) fn new(r: BigUint, value: CommitValue, commitment: G::Element) -> Self {
        Self {
            r,
            value,
            commitment,
        }
    }

    /// The commitment randomness `r`.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The committed value.
    pub fn value(&self) -> &CommitValue {
        &self.value
    }

    /// The commitment element `c`.
    pub fn commitment(&self) -> &G::Element {
        &self.commitment
    }
}
