use core::fmt::Debug;

use num_bigint::{BigUint, RandBigInt};
use rand_core::CryptoRngCore;

use crate::Result;

/// A cyclic group of prime order `q` with a distinguished generator `g`,
/// in which the discrete-log problem is assumed hard.
///
/// Exponents are arbitrary-precision non-negative integers; implementations
/// reduce them modulo the group order, so `exponentiate(g, e)` equals
/// `exponentiate(g, e mod q)` for any `e`.
///
/// Both endpoints of a protocol must construct the group from identical
/// parameters; nothing in the wire format carries them.
pub trait DlogGroup: Clone + Debug + Send + Sync + 'static {
    /// A group element. Equality is algebraic equality in the group.
    type Element: Clone + Debug + Eq + PartialEq + Send + Sync;

    /// A short human-readable name for the parameter set.
    fn name(&self) -> &'static str;

    /// The prime order `q` of the group.
    fn order(&self) -> &BigUint;

    /// The generator `g`.
    fn generator(&self) -> &Self::Element;

    /// Computes `base^exponent`.
    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element;

    /// Computes the group product of `lhs` and `rhs`.
    fn multiply(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;

    /// Returns true iff `element` belongs to the group.
    fn is_member(&self, element: &Self::Element) -> bool;

    /// Runs the group's self-validation predicate over its parameters.
    fn validate_group(&self) -> bool;

    /// Whether the Decisional Diffie-Hellman assumption is believed to hold
    /// for this parameter set. Protocol roles refuse groups that answer
    /// false.
    fn is_ddh_secure(&self) -> bool;

    /// Serializes `element` into its canonical sendable byte form.
    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8>;

    /// Rebuilds an element from its sendable byte form.
    ///
    /// With `trusted` set, the caller asserts that membership of the encoded
    /// element was established independently and only the encoding itself is
    /// checked. Untrusted reconstruction additionally runs the membership
    /// test and fails with [`Error::CheatAttempt`](crate::Error::CheatAttempt)
    /// on non-members.
    fn reconstruct_element(&self, trusted: bool, bytes: &[u8]) -> Result<Self::Element>;

    /// Samples an exponent uniformly from `[0, q - 1]`.
    fn random_exponent<R: CryptoRngCore>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_below(self.order())
    }
}
