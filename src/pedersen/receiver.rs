use std::collections::HashMap;

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use tracing::debug;

use super::{
    CommitPhaseOutput, CommitValue, PedersenCommitmentMessage, PedersenDecommitmentMessage,
};
use crate::channel::Channel;
use crate::{DlogGroup, Error, Result};

/// Receiver side of the Pedersen commitment scheme.
///
/// [`preprocess`](PedersenReceiver::preprocess) samples the trapdoor `tau`,
/// sends `h = g^tau` to the committer, and must run before any commitment
/// is received. Received commitments are stored by id until their
/// decommitment arrives.
pub struct PedersenReceiver<G: DlogGroup, C: Channel, R: CryptoRngCore> {
    group: G,
    channel: C,
    rng: R,
    trapdoor: Option<BigUint>,
    h: Option<G::Element>,
    commitments: HashMap<u64, PedersenCommitmentMessage>,
}

impl<G: DlogGroup, C: Channel, R: CryptoRngCore> PedersenReceiver<G, C, R> {
    /// Creates a receiver over `group` talking through `channel`.
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
                "The receiver's group failed validation".to_string(),
            ));
        }
        let channel = channel.ok_or(Error::MissingChannel)?;
        Ok(Self {
            group,
            channel,
            rng,
            trapdoor: None,
            h: None,
            commitments: HashMap::new(),
        })
    }

    /// Runs the pre-processing phase: samples the trapdoor `tau`, computes
    /// `h = g^tau` and sends `h` to the committer.
    pub fn preprocess(&mut self) -> Result<()> {
        let tau = self.group.random_exponent(&mut self.rng);
        let h = self.group.exponentiate(self.group.generator(), &tau);
        self.channel
            .write_with_size(&self.group.element_to_bytes(&h))?;
        debug!("sent pre-processing h element");
        self.trapdoor = Some(tau);
        self.h = Some(h);
        Ok(())
    }

    /// Receives one commit-phase message and stores it under its id.
    pub fn receive_commitment(&mut self) -> Result<CommitPhaseOutput> {
        let raw = self.channel.read_with_size()?;
        let message = PedersenCommitmentMessage::from_bytes(&raw)?;
        let id = message.id();
        self.commitments.insert(id, message);
        debug!(id, "received commitment");
        Ok(CommitPhaseOutput::Basic { id })
    }

    /// Receives the decommitment for `id` and verifies it against the
    /// stored commitment.
    ///
    /// Returns `None` when the decommitment is rejected. Fails with
    /// [`Error::BadInput`] when no commitment was received under `id`.
    pub fn receive_decommitment(&mut self, id: u64) -> Result<Option<CommitValue>> {
        let raw = self.channel.read_with_size()?;
        let decommitment = PedersenDecommitmentMessage::from_bytes(&raw)?;
        let commitment = self.commitments.get(&id).ok_or_else(|| {
            Error::BadInput(format!("No commitment was received under id {id}"))
        })?;
        self.verify_decommitment(commitment, &decommitment)
    }

    /// Verifies a decommitment `(x, r)` against a commitment message.
    ///
    /// Accepts iff `x` is in `[0, q-1]` and `g^r * h^x` equals the
    /// committed element; a rejected opening is `None`, not an error.
    pub fn verify_decommitment(
        &self,
        commitment: &PedersenCommitmentMessage,
        decommitment: &PedersenDecommitmentMessage,
    ) -> Result<Option<CommitValue>> {
        let h = self.h.as_ref().ok_or_else(|| {
            Error::BadInput("The pre-processing phase has not been run".to_string())
        })?;

        let x = decommitment.x();
        if *x >= *self.group.order() {
            return Ok(None);
        }

        let committed = self
            .group
            .reconstruct_element(true, commitment.commitment())?;
        let g_to_r = self
            .group
            .exponentiate(self.group.generator(), decommitment.r());
        let h_to_x = self.group.exponentiate(h, x);
        let expected = self.group.multiply(&g_to_r, &h_to_x);

        if committed == expected {
            Ok(Some(CommitValue::BigInteger(x.clone())))
        } else {
            debug!(id = commitment.id(), "rejected decommitment");
            Ok(None)
        }
    }

    /// The `h` element established during preprocessing, if any.
    pub fn preprocessed_values(&self) -> Option<&G::Element> {
        self.h.as_ref()
    }

    /// The commitment element stored under `id`, reconstructed.
    ///
    /// Fails with [`Error::BadInput`] when no commitment was received under
    /// that id.
    pub fn commitment_phase_values(&self, id: u64) -> Result<G::Element> {
        let message = self.commitments.get(&id).ok_or_else(|| {
            Error::BadInput(format!("No commitment was received under id {id}"))
        })?;
        self.group.reconstruct_element(true, message.commitment())
    }

    /// The underlying channel, for the protocol driver.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub(crate) fn group(&self) -> &G {
        &self.group
    }

    pub(crate) fn trapdoor_value(&self) -> Option<&BigUint> {
        self.trapdoor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{pair, PairChannel};
    use crate::{SecureRng, ZpGroup};

    fn toy_group() -> ZpGroup {
        ZpGroup::new(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8)).unwrap()
    }

    fn preprocessed_receiver() -> (
        PedersenReceiver<ZpGroup, PairChannel, SecureRng>,
        PairChannel,
    ) {
        let (committer_end, receiver_end) = pair();
        let mut receiver =
            PedersenReceiver::new(toy_group(), Some(receiver_end), SecureRng::new()).unwrap();
        receiver.preprocess().unwrap();
        let mut committer_end = committer_end;
        let _h = committer_end.read_with_size().unwrap();
        (receiver, committer_end)
    }

    fn commit(
        receiver: &PedersenReceiver<ZpGroup, PairChannel, SecureRng>,
        x: u8,
        r: u8,
    ) -> PedersenCommitmentMessage {
        let group = receiver.group();
        let h = receiver.preprocessed_values().unwrap();
        let c = group.multiply(
            &group.exponentiate(group.generator(), &BigUint::from(r)),
            &group.exponentiate(h, &BigUint::from(x)),
        );
        PedersenCommitmentMessage::new(1, group.element_to_bytes(&c))
    }

    #[test]
    fn missing_channel_is_rejected() {
        let result =
            PedersenReceiver::<_, PairChannel, _>::new(toy_group(), None, SecureRng::new());
        assert!(matches!(result, Err(Error::MissingChannel)));
    }

    #[test]
    fn preprocess_publishes_g_to_trapdoor() {
        let (receiver, mut committer_end) = {
            let (committer_end, receiver_end) = pair();
            let mut receiver =
                PedersenReceiver::new(toy_group(), Some(receiver_end), SecureRng::new()).unwrap();
            receiver.preprocess().unwrap();
            (receiver, committer_end)
        };
        let raw = committer_end.read_with_size().unwrap();
        let group = receiver.group();
        let h = group.reconstruct_element(false, &raw).unwrap();
        let tau = receiver.trapdoor_value().unwrap();
        assert_eq!(&h, receiver.preprocessed_values().unwrap());
        assert_eq!(h, group.exponentiate(group.generator(), tau));
    }

    #[test]
    fn accepts_valid_decommitment() {
        let (receiver, _committer_end) = preprocessed_receiver();
        let commitment = commit(&receiver, 9, 5);
        let decommitment =
            PedersenDecommitmentMessage::new(BigUint::from(9u8), BigUint::from(5u8));
        let value = receiver
            .verify_decommitment(&commitment, &decommitment)
            .unwrap();
        assert_eq!(value, Some(CommitValue::BigInteger(BigUint::from(9u8))));
    }

    #[test]
    fn rejects_wrong_value() {
        let (receiver, _committer_end) = preprocessed_receiver();
        let commitment = commit(&receiver, 9, 5);
        let decommitment =
            PedersenDecommitmentMessage::new(BigUint::from(8u8), BigUint::from(5u8));
        let value = receiver
            .verify_decommitment(&commitment, &decommitment)
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn rejects_value_at_group_order() {
        let (receiver, _committer_end) = preprocessed_receiver();
        let commitment = commit(&receiver, 0, 5);
        let decommitment =
            PedersenDecommitmentMessage::new(BigUint::from(11u8), BigUint::from(5u8));
        let value = receiver
            .verify_decommitment(&commitment, &decommitment)
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn decommitment_for_unknown_id_is_an_error() {
        let (mut receiver, mut committer_end) = preprocessed_receiver();
        committer_end
            .write_with_size(
                &PedersenDecommitmentMessage::new(BigUint::from(1u8), BigUint::from(2u8))
                    .to_bytes(),
            )
            .unwrap();
        assert!(matches!(
            receiver.receive_decommitment(42),
            Err(Error::BadInput(_))
        ));
    }
}
