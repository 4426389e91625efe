//! Trapdoor extension of the Pedersen scheme.
//!
//! The receiver may reveal the trapdoor `tau` (with `h = g^tau`) to the
//! committer after the commit phase. Whoever holds `tau` can open a
//! Pedersen commitment to any value, which higher-level protocols exploit
//! for equivocation; this module contributes the revealing message and the
//! committer-side validation predicate.

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use super::{
    CommitPhaseOutput, CommitValue, PedersenCommitmentMessage, PedersenCommitter,
    PedersenDecommitmentMessage, PedersenReceiver,
};
use crate::channel::Channel;
use crate::{DlogGroup, Error, Result};

/// Message carrying the receiver's revealed trapdoor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TrapdoorMessage {
    trapdoor: BigUint,
}

impl TrapdoorMessage {
    /// Wraps a trapdoor exponent.
    pub fn new(trapdoor: BigUint) -> Self {
        Self { trapdoor }
    }

    /// The revealed exponent `tau`.
    pub fn trapdoor(&self) -> &BigUint {
        &self.trapdoor
    }

    /// Big-endian byte form of `tau`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.trapdoor.to_bytes_be()
    }

    /// Parses the big-endian byte form.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            trapdoor: BigUint::from_bytes_be(bytes),
        }
    }
}

/// Receiver role in trapdoor mode.
///
/// Behaves like [`PedersenReceiver`] except that commit-phase outputs carry
/// the trapdoor, and the trapdoor can be packaged for revealing.
pub struct PedersenTrapdoorReceiver<G: DlogGroup, C: Channel, R: CryptoRngCore> {
    inner: PedersenReceiver<G, C, R>,
}

impl<G: DlogGroup, C: Channel, R: CryptoRngCore> PedersenTrapdoorReceiver<G, C, R> {
    /// Creates the trapdoor receiver; same checks as [`PedersenReceiver::new`].
    pub fn new(group: G, channel: Option<C>, rng: R) -> Result<Self> {
        Ok(Self {
            inner: PedersenReceiver::new(group, channel, rng)?,
        })
    }

    /// Runs the pre-processing phase of the underlying receiver.
    pub fn preprocess(&mut self) -> Result<()> {
        self.inner.preprocess()
    }

    /// Receives one commitment; the output carries the trapdoor.
    pub fn receive_commitment(&mut self) -> Result<CommitPhaseOutput> {
        let trapdoor = self
            .inner
            .trapdoor_value()
            .ok_or_else(|| {
                Error::BadInput("The pre-processing phase has not been run".to_string())
            })?
            .clone();
        let output = self.inner.receive_commitment()?;
        Ok(CommitPhaseOutput::Trapdoor {
            id: output.id(),
            trapdoor,
        })
    }

    /// Receives and verifies the decommitment for `id`.
    pub fn receive_decommitment(&mut self, id: u64) -> Result<Option<CommitValue>> {
        self.inner.receive_decommitment(id)
    }

    /// Packages the trapdoor for revealing to the committer.
    pub fn reveal_trapdoor(&self) -> Result<TrapdoorMessage> {
        let trapdoor = self.inner.trapdoor_value().ok_or_else(|| {
            Error::BadInput("The pre-processing phase has not been run".to_string())
        })?;
        Ok(TrapdoorMessage::new(trapdoor.clone()))
    }

    /// The underlying plain receiver.
    pub fn inner(&self) -> &PedersenReceiver<G, C, R> {
        &self.inner
    }

    /// The underlying plain receiver, mutably.
    pub fn inner_mut(&mut self) -> &mut PedersenReceiver<G, C, R> {
        &mut self.inner
    }
}

/// Committer role in trapdoor mode.
///
/// Behaves like [`PedersenCommitter`] and can additionally check a trapdoor
/// the receiver claims against the pre-processed `h`.
pub struct PedersenTrapdoorCommitter<G: DlogGroup, C: Channel, R: CryptoRngCore> {
    inner: PedersenCommitter<G, C, R>,
}

impl<G: DlogGroup, C: Channel, R: CryptoRngCore> PedersenTrapdoorCommitter<G, C, R> {
    /// Creates the trapdoor committer; same checks as [`PedersenCommitter::new`].
    pub fn new(group: G, channel: Option<C>, rng: R) -> Result<Self> {
        Ok(Self {
            inner: PedersenCommitter::new(group, channel, rng)?,
        })
    }

    /// Receives the receiver's `h`; see [`PedersenCommitter::preprocess`].
    pub fn preprocess(&mut self) -> Result<()> {
        self.inner.preprocess()
    }

    /// Commits to `value` under `id`; see
    /// [`PedersenCommitter::generate_commitment_message`].
    pub fn generate_commitment_message(
        &mut self,
        value: CommitValue,
        id: u64,
    ) -> Result<PedersenCommitmentMessage> {
        self.inner.generate_commitment_message(value, id)
    }

    /// Reveals `(x, r)` for `id`; see
    /// [`PedersenCommitter::generate_decommitment_message`].
    pub fn generate_decommitment_message(&self, id: u64) -> Result<PedersenDecommitmentMessage> {
        self.inner.generate_decommitment_message(id)
    }

    /// Checks a claimed trapdoor: true iff `g^tau` equals the
    /// pre-processed `h`.
    ///
    /// Fails with [`Error::BadInput`] before preprocessing.
    pub fn validate(&self, claimed: &TrapdoorMessage) -> Result<bool> {
        let h = self.inner.preprocessed_values().ok_or_else(|| {
            Error::BadInput("The pre-processing phase has not been run".to_string())
        })?;
        let group = self.inner.group();
        let g_to_trapdoor = group.exponentiate(group.generator(), claimed.trapdoor());
        Ok(g_to_trapdoor == *h)
    }

    /// The underlying plain committer.
    pub fn inner(&self) -> &PedersenCommitter<G, C, R> {
        &self.inner
    }

    /// The underlying plain committer, mutably.
    pub fn inner_mut(&mut self) -> &mut PedersenCommitter<G, C, R> {
        &mut self.inner
    }
}
