use num_bigint::BigUint;
use rand_core::CryptoRngCore;

use super::{
    challenge_byte_len, check_challenge_length, check_soundness, SigmaBiMessage,
    SigmaDhCommonInput, SigmaDhMessage,
};
use crate::{DlogGroup, Result};

/// A full simulated transcript `((a, b), e, z)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigmaSimulatorOutput {
    first_message: SigmaDhMessage,
    challenge: Vec<u8>,
    response: SigmaBiMessage,
}

impl SigmaSimulatorOutput {
    /// The simulated first message `(a, b)`.
    pub fn first_message(&self) -> &SigmaDhMessage {
        &self.first_message
    }

    /// The challenge the transcript answers.
    pub fn challenge(&self) -> &[u8] {
        &self.challenge
    }

    /// The simulated response `z`.
    pub fn response(&self) -> &SigmaBiMessage {
        &self.response
    }
}

/// Honest-verifier simulator for the Diffie-Hellman sigma protocol.
///
/// Produces transcripts distributed identically to honest ones without
/// knowing the witness, by sampling the response first and solving the
/// verification equations backwards:
/// `a = g^z * u^(-e mod q)`, `b = h^z * v^(-e mod q)`.
pub struct SigmaDhSimulator<G: DlogGroup, R: CryptoRngCore> {
    group: G,
    t: u32,
    rng: R,
}

impl<G: DlogGroup, R: CryptoRngCore> SigmaDhSimulator<G, R> {
    /// Creates a simulator over `group` with soundness parameter `t` bits.
    ///
    /// Fails with [`Error::BadInput`](crate::Error::BadInput) unless
    /// `2^t < q`.
    pub fn new(group: G, t: u32, rng: R) -> Result<Self> {
        check_soundness(t, group.order())?;
        Ok(Self { group, t, rng })
    }

    /// The soundness parameter in bits.
    pub fn soundness_param(&self) -> u32 {
        self.t
    }

    /// Simulates a transcript answering the given challenge.
    ///
    /// Fails with [`Error::CheatAttempt`](crate::Error::CheatAttempt) when
    /// the challenge length differs from the soundness parameter.
    pub fn simulate(
        &mut self,
        input: &SigmaDhCommonInput<G>,
        challenge: Vec<u8>,
    ) -> Result<SigmaSimulatorOutput> {
        check_challenge_length(self.t, &challenge)?;

        let q = self.group.order().clone();
        let z = self.group.random_exponent(&mut self.rng);
        let e = BigUint::from_bytes_be(&challenge) % &q;
        let minus_e = (&q - e) % &q;

        let g_to_z = self.group.exponentiate(self.group.generator(), &z);
        let u_to_minus_e = self.group.exponentiate(input.u(), &minus_e);
        let a = self.group.multiply(&g_to_z, &u_to_minus_e);

        let h_to_z = self.group.exponentiate(input.h(), &z);
        let v_to_minus_e = self.group.exponentiate(input.v(), &minus_e);
        let b = self.group.multiply(&h_to_z, &v_to_minus_e);

        Ok(SigmaSimulatorOutput {
            first_message: SigmaDhMessage::new(
                self.group.element_to_bytes(&a),
                self.group.element_to_bytes(&b),
            ),
            challenge,
            response: SigmaBiMessage::new(z),
        })
    }

    /// Samples a uniform challenge of `ceil(t/8)` bytes and simulates a
    /// transcript for it.
    pub fn simulate_random_challenge(
        &mut self,
        input: &SigmaDhCommonInput<G>,
    ) -> Result<SigmaSimulatorOutput> {
        let mut challenge = vec![0u8; challenge_byte_len(self.t)];
        self.rng.fill_bytes(&mut challenge);
        self.simulate(input, challenge)
    }
}
