use std::collections::HashMap;

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use tracing::debug;

use super::{
    CommitValue, CommitmentPhaseValues, PedersenCommitmentMessage, PedersenDecommitmentMessage,
};
use crate::channel::Channel;
use crate::{DlogGroup, Error, Result};

/// Committer side of the Pedersen commitment scheme.
///
/// After [`preprocess`](PedersenCommitter::preprocess) has received the
/// receiver's `h`, the committer can hold any number of concurrently open
/// commitments, keyed by caller-chosen ids. Generated messages are *not*
/// sent automatically; the surrounding protocol driver serializes them and
/// writes them through [`channel_mut`](PedersenCommitter::channel_mut),
/// which keeps the wire interleaving under the driver's control.
pub struct PedersenCommitter<G: DlogGroup, C: Channel, R: CryptoRngCore> {
    group: G,
    channel: C,
    rng: R,
    h: Option<G::Element>,
    commitments: HashMap<u64, CommitmentPhaseValues<G>>,
}

impl<G: DlogGroup, C: Channel, R: CryptoRngCore> PedersenCommitter<G, C, R> {
    /// Creates a committer over `group` talking through `channel`.
    ///
    /// Performs no I/O. Fails with [`Error::SecurityLevel`] when the group
    /// does not claim DDH hardness, [`Error::InvalidGroup`] when it fails
    /// its own validation, and [`Error::MissingChannel`] when no channel is
    /// supplied.
    pub fn new(group: G, channel: Option<C>, rng: R) -> Result<Self> {
        if !group.is_ddh_secure() {
            return Err(Error::SecurityLevel(
                "The dlog group must have the DDH security level".to_string(),
            ));
        }
        if !group.validate_group() {
            return Err(Error::InvalidGroup(
                "The committer's group failed validation".to_string(),
            ));
        }
        let channel = channel.ok_or(Error::MissingChannel)?;
        Ok(Self {
            group,
            channel,
            rng,
            h: None,
            commitments: HashMap::new(),
        })
    }

    /// Receives the receiver's pre-processing message and installs `h`.
    ///
    /// Fails with [`Error::CheatAttempt`] when the received element is not
    /// a member of the group.
    pub fn preprocess(&mut self) -> Result<()> {
        let raw = self.channel.read_with_size()?;
        let h = self.group.reconstruct_element(true, &raw)?;
        if !self.group.is_member(&h) {
            return Err(Error::CheatAttempt(
                "The h element is not a member of the current dlog group".to_string(),
            ));
        }
        debug!("installed receiver h element");
        self.h = Some(h);
        Ok(())
    }

    /// Commits to `value` under `id`, returning the commit-phase message.
    ///
    /// Samples fresh randomness `r`, computes `c = g^r * h^x` and records
    /// `(r, x, c)` under `id`, replacing any previous commitment with the
    /// same id. Fails with [`Error::BadInput`] when the value is not a
    /// big integer in `[0, q-1]`, or before preprocessing.
    pub fn generate_commitment_message(
        &mut self,
        value: CommitValue,
        id: u64,
    ) -> Result<PedersenCommitmentMessage> {
        let h = self.h.as_ref().ok_or_else(|| {
            Error::BadInput("The pre-processing phase has not been run".to_string())
        })?;
        let x = match &value {
            CommitValue::BigInteger(x) => x,
            CommitValue::GroupElement(_) => {
                return Err(Error::BadInput(
                    "The committed value must be a big integer".to_string(),
                ))
            }
        };
        if *x >= *self.group.order() {
            return Err(Error::BadInput(
                "The committed value must be in Zq".to_string(),
            ));
        }

        let r = self.group.random_exponent(&mut self.rng);
        let g_to_r = self.group.exponentiate(self.group.generator(), &r);
        let h_to_x = self.group.exponentiate(h, x);
        let c = self.group.multiply(&g_to_r, &h_to_x);

        let message = PedersenCommitmentMessage::new(id, self.group.element_to_bytes(&c));
        self.commitments
            .insert(id, CommitmentPhaseValues::new(r, value, c));
        debug!(id, "generated commitment");
        Ok(message)
    }

    /// Reveals `(x, r)` for the commitment stored under `id`.
    ///
    /// Fails with [`Error::BadInput`] when no commitment was generated
    /// under that id.
    pub fn generate_decommitment_message(&self, id: u64) -> Result<PedersenDecommitmentMessage> {
        let values = self.commitments.get(&id).ok_or_else(|| {
            Error::BadInput(format!("No commitment was generated under id {id}"))
        })?;
        let x = match values.value() {
            CommitValue::BigInteger(x) => x.clone(),
            CommitValue::GroupElement(_) => {
                unreachable!("only big-integer values are ever stored")
            }
        };
        Ok(PedersenDecommitmentMessage::new(x, values.r().clone()))
    }

    /// The `h` element received during preprocessing, if any.
    pub fn preprocessed_values(&self) -> Option<&G::Element> {
        self.h.as_ref()
    }

    /// The record retained for `id`, for inspection.
    pub fn commitment_phase_values(&self, id: u64) -> Option<&CommitmentPhaseValues<G>> {
        self.commitments.get(&id)
    }

    /// Byte form of a commit value, big-endian for integers.
    pub fn commit_value_bytes(value: &CommitValue) -> Vec<u8> {
        value.to_bytes()
    }

    /// The underlying channel, for the protocol driver to send generated
    /// messages through.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub(crate) fn group(&self) -> &G {
        &self.group
    }
}
