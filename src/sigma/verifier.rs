use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use super::{
    challenge_byte_len, check_challenge_length, check_soundness, SigmaBiMessage,
    SigmaDhCommonInput, SigmaDhMessage,
};
use crate::{DlogGroup, Error, Result};

/// Verifier side of the Diffie-Hellman sigma protocol.
///
/// Samples a uniform `t`-bit challenge and accepts a transcript
/// `((a, b), e, z)` iff `h` is a group member, `g^z = a * u^e` and
/// `h^z = b * v^e`. A failed equality is the boolean answer `false`, never
/// an error; only malformed messages raise.
pub struct SigmaDhVerifier<G: DlogGroup, R: CryptoRngCore> {
    group: G,
    t: u32,
    rng: R,
    challenge: Vec<u8>,
}

impl<G: DlogGroup, R: CryptoRngCore> SigmaDhVerifier<G, R> {
    /// Creates a verifier over `group` with soundness parameter `t` bits.
    ///
    /// Fails with [`Error::InvalidGroup`] when the group does not validate
    /// and with [`Error::BadInput`] unless `2^t < q`.
    pub fn new(group: G, t: u32, rng: R) -> Result<Self> {
        if !group.validate_group() {
            return Err(Error::InvalidGroup(
                "The verifier's group failed validation".to_string(),
            ));
        }
        check_soundness(t, group.order())?;
        Ok(Self {
            group,
            t,
            rng,
            challenge: Vec::new(),
        })
    }

    /// The soundness parameter in bits.
    pub fn soundness_param(&self) -> u32 {
        self.t
    }

    /// Samples a fresh uniform challenge of exactly `ceil(t/8)` bytes,
    /// stores it for the upcoming [`verify`](SigmaDhVerifier::verify) call
    /// and returns a copy for transmission to the prover.
    pub fn sample_challenge(&mut self) -> Vec<u8> {
        let mut e = vec![0u8; challenge_byte_len(self.t)];
        self.rng.fill_bytes(&mut e);
        self.challenge = e.clone();
        e
    }

    /// Installs an externally chosen challenge instead of sampling one.
    ///
    /// Fails with [`Error::CheatAttempt`] when the length differs from the
    /// soundness parameter.
    pub fn set_challenge(&mut self, challenge: &[u8]) -> Result<()> {
        check_challenge_length(self.t, challenge)?;
        self.challenge = challenge.to_vec();
        Ok(())
    }

    /// The currently stored challenge; empty before sampling and after a
    /// verification round.
    pub fn challenge(&self) -> &[u8] {
        &self.challenge
    }

    /// Decides the transcript against the stored challenge.
    ///
    /// Reconstructs `(a, b)` from their sendable forms, then checks the two
    /// verification equations together with membership of `h`. The stored
    /// challenge is wiped afterwards, so another round requires sampling
    /// again. Fails with [`Error::BadInput`] when no challenge is stored or
    /// a sendable form does not decode.
    pub fn verify(
        &mut self,
        input: &SigmaDhCommonInput<G>,
        first_message: &SigmaDhMessage,
        second_message: &SigmaBiMessage,
    ) -> Result<bool> {
        if self.challenge.is_empty() {
            return Err(Error::BadInput(
                "A challenge must be sampled before verification".to_string(),
            ));
        }

        let mut verified = self.group.is_member(input.h());

        let a = self.group.reconstruct_element(true, first_message.a())?;
        let b = self.group.reconstruct_element(true, first_message.b())?;
        let e = BigUint::from_bytes_be(&self.challenge);
        let z = second_message.z();

        // g^z = a * u^e
        let left = self.group.exponentiate(self.group.generator(), z);
        let u_to_e = self.group.exponentiate(input.u(), &e);
        let right = self.group.multiply(&a, &u_to_e);
        verified = verified && left == right;

        // h^z = b * v^e
        let left = self.group.exponentiate(input.h(), z);
        let v_to_e = self.group.exponentiate(input.v(), &e);
        let right = self.group.multiply(&b, &v_to_e);
        verified = verified && left == right;

        self.challenge.zeroize();
        self.challenge.clear();
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigma::{SigmaDhProver, SigmaDhProverInput};
    use crate::{SecureRng, ZpGroup};

    fn toy_group() -> ZpGroup {
        ZpGroup::new(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8)).unwrap()
    }

    fn statement(group: &ZpGroup, w: u8) -> (SigmaDhCommonInput<ZpGroup>, BigUint) {
        let w = BigUint::from(w);
        let h = group.exponentiate(group.generator(), &BigUint::from(3u8));
        let u = group.exponentiate(group.generator(), &w);
        let v = group.exponentiate(&h, &w);
        (SigmaDhCommonInput::new(h, u, v), w)
    }

    #[test]
    fn accepts_honest_transcript() {
        let group = toy_group();
        let (common, w) = statement(&group, 7);
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        let mut verifier = SigmaDhVerifier::new(group, 3, SecureRng::new()).unwrap();

        let first = prover
            .compute_first_message(SigmaDhProverInput::new(common.clone(), w))
            .unwrap();
        let challenge = verifier.sample_challenge();
        let second = prover.compute_second_message(&challenge).unwrap();

        assert!(verifier.verify(&common, &first, &second).unwrap());
        assert!(verifier.challenge().is_empty());
    }

    #[test]
    fn rejects_wrong_witness() {
        let group = toy_group();
        let (common, _) = statement(&group, 7);
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        let mut verifier = SigmaDhVerifier::new(group, 3, SecureRng::new()).unwrap();

        let first = prover
            .compute_first_message(SigmaDhProverInput::new(common.clone(), BigUint::from(8u8)))
            .unwrap();
        // In the tiny test group a sampled challenge congruent to 0 mod q
        // would mask the wrong witness; pin a challenge that cannot.
        verifier.set_challenge(&[1]).unwrap();
        let second = prover.compute_second_message(&[1]).unwrap();

        assert!(!verifier.verify(&common, &first, &second).unwrap());
    }

    #[test]
    fn verify_without_challenge_is_an_error() {
        let group = toy_group();
        let (common, w) = statement(&group, 2);
        let mut prover = SigmaDhProver::new(group.clone(), 3, SecureRng::new()).unwrap();
        let mut verifier = SigmaDhVerifier::new(group, 3, SecureRng::new()).unwrap();

        let first = prover
            .compute_first_message(SigmaDhProverInput::new(common.clone(), w))
            .unwrap();
        let second = prover.compute_second_message(&[1]).unwrap();
        assert!(matches!(
            verifier.verify(&common, &first, &second),
            Err(Error::BadInput(_))
        ));
    }

    #[test]
    fn set_challenge_enforces_length() {
        let group = toy_group();
        let mut verifier = SigmaDhVerifier::new(group, 3, SecureRng::new()).unwrap();
        assert!(matches!(
            verifier.set_challenge(&[1, 2]),
            Err(Error::CheatAttempt(_))
        ));
        assert!(verifier.set_challenge(&[9]).is_ok());
    }
}
