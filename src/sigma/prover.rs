use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;

use super::{
    check_challenge_length, check_soundness, SigmaBiMessage, SigmaDhMessage, SigmaDhProverInput,
};
use crate::{DlogGroup, Error, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ProverState {
    Init,
    AwaitingChallenge,
    Done,
}

/// Prover side of the Diffie-Hellman sigma protocol.
///
/// Drives a single proof through two messages:
///
/// 1. [`compute_first_message`](SigmaDhProver::compute_first_message) samples
///    a nonce `r` and sends `(a, b) = (g^r, h^r)`.
/// 2. [`compute_second_message`](SigmaDhProver::compute_second_message)
///    answers the verifier's challenge `e` with `z = (r + e*w) mod q`.
///
/// A prover instance is single-use; create a fresh one for each proof. The
/// nonce is overwritten with zero as soon as the response is computed.
pub struct SigmaDhProver<G: DlogGroup, R: CryptoRngCore> {
    group: G,
    t: u32,
    rng: R,
    witness: BigUint,
    nonce: BigUint,
    state: ProverState,
}

impl<G: DlogGroup, R: CryptoRngCore> SigmaDhProver<G, R> {
    /// Creates a prover over `group` with soundness parameter `t` bits.
    ///
    /// Fails with [`Error::BadInput`] unless `2^t < q`.
    pub fn new(group: G, t: u32, rng: R) -> Result<Self> {
        check_soundness(t, group.order())?;
        Ok(Self {
            group,
            t,
            rng,
            witness: BigUint::zero(),
            nonce: BigUint::zero(),
            state: ProverState::Init,
        })
    }

    /// The soundness parameter in bits.
    pub fn soundness_param(&self) -> u32 {
        self.t
    }

    /// Samples the nonce and computes the first message `(g^r, h^r)`.
    ///
    /// Fails with [`Error::BadInput`] when the witness is not in `[0, q-1]`
    /// or when a first message was already produced by this instance.
    pub fn compute_first_message(
        &mut self,
        input: SigmaDhProverInput<G>,
    ) -> Result<SigmaDhMessage> {
        if self.state != ProverState::Init {
            return Err(Error::BadInput(
                "The prover already produced its first message".to_string(),
            ));
        }
        let (common, witness) = input.into_parts();
        if witness >= *self.group.order() {
            return Err(Error::BadInput(
                "The witness must be in the range [0, q-1]".to_string(),
            ));
        }

        let r = self.group.random_exponent(&mut self.rng);
        let a = self.group.exponentiate(self.group.generator(), &r);
        let b = self.group.exponentiate(common.h(), &r);

        self.witness = witness;
        self.nonce = r;
        self.state = ProverState::AwaitingChallenge;
        Ok(SigmaDhMessage::new(
            self.group.element_to_bytes(&a),
            self.group.element_to_bytes(&b),
        ))
    }

    /// Computes the response `z = (r + e*w) mod q` to the given challenge.
    ///
    /// Fails with [`Error::CheatAttempt`] when the challenge length differs
    /// from the soundness parameter, and with [`Error::BadInput`] when no
    /// first message was produced. The nonce is zeroed before returning.
    pub fn compute_second_message(&mut self, challenge: &[u8]) -> Result<SigmaBiMessage> {
        if self.state != ProverState::AwaitingChallenge {
            return Err(Error::BadInput(
                "The prover has no outstanding first message".to_string(),
            ));
        }
        check_challenge_length(self.t, challenge)?;

        let q = self.group.order();
        let e = BigUint::from_bytes_be(challenge);
        let ew = (e * &self.witness) % q;
        let z = (&self.nonce + ew) % q;

        self.nonce = BigUint::zero();
        self.witness = BigUint::zero();
        self.state = ProverState::Done;
        Ok(SigmaBiMessage::new(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigma::SigmaDhCommonInput;
    use crate::{SecureRng, ZpGroup};

    fn toy_group() -> ZpGroup {
        ZpGroup::new(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8)).unwrap()
    }

    fn prover_input(group: &ZpGroup, w: u8) -> SigmaDhProverInput<ZpGroup> {
        let w = BigUint::from(w);
        let h = group.exponentiate(group.generator(), &BigUint::from(3u8));
        let u = group.exponentiate(group.generator(), &w);
        let v = group.exponentiate(&h, &w);
        SigmaDhProverInput::new(SigmaDhCommonInput::new(h, u, v), w)
    }

    #[test]
    fn response_is_reduced_mod_q() {
        let group = toy_group();
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        prover.compute_first_message(prover_input(&group, 7)).unwrap();
        let response = prover.compute_second_message(&[0xff]).unwrap();
        assert!(response.z() < group.order());
    }

    #[test]
    fn rejects_out_of_range_witness() {
        let group = toy_group();
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        let mut input = prover_input(&group, 7);
        input = SigmaDhProverInput::new(input.common().clone(), BigUint::from(11u8));
        assert!(matches!(
            prover.compute_first_message(input),
            Err(Error::BadInput(_))
        ));
    }

    #[test]
    fn rejects_wrong_challenge_length() {
        let group = toy_group();
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        prover.compute_first_message(prover_input(&group, 2)).unwrap();
        assert!(matches!(
            prover.compute_second_message(&[0, 1]),
            Err(Error::CheatAttempt(_))
        ));
        // A correct-length challenge still succeeds afterwards.
        assert!(prover.compute_second_message(&[1]).is_ok());
    }

    #[test]
    fn prover_is_single_use() {
        let group = toy_group();
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        prover.compute_first_message(prover_input(&group, 2)).unwrap();
        prover.compute_second_message(&[1]).unwrap();
        assert!(matches!(
            prover.compute_first_message(prover_input(&group, 2)),
            Err(Error::BadInput(_))
        ));
        assert!(matches!(
            prover.compute_second_message(&[1]),
            Err(Error::BadInput(_))
        ));
    }

    #[test]
    fn rejects_invalid_soundness_parameter() {
        let group = toy_group();
        assert!(matches!(
            SigmaDhProver::new(group, 4, SecureRng::new()),
            Err(Error::BadInput(_))
        ));
    }
}
