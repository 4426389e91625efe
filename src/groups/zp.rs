use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::{DlogGroup, Error, Result};

/// A prime-order subgroup of `Z_p^*`.
///
/// Parameterised by `(p, q, g)` where `q` divides `p - 1` and `g` generates
/// the subgroup of order `q`. Membership of `x` is `0 < x < p` together with
/// `x^q = 1 (mod p)`.
///
/// DDH is believed to hold in prime-order subgroups of `Z_p^*` for properly
/// generated parameters, so [`DlogGroup::is_ddh_secure`] answers true.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ZpGroup {
    p: BigUint,
    q: BigUint,
    generator: ZpElement,
}

/// An element of a [`ZpGroup`], held as its residue mod `p`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ZpElement(BigUint);

impl ZpElement {
    /// The underlying residue.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl ZpGroup {
    /// Creates a group from explicit parameters.
    ///
    /// Fails with [`Error::InvalidGroup`] when the parameters do not describe
    /// a prime-order subgroup: `q` must divide `p - 1` and `g` must be a
    /// non-identity element of order `q`.
    ///
    /// Primality of `p` and `q` is the parameter publisher's obligation and
    /// is not re-checked here; use a standardized parameter set such as
    /// [`ZpGroup::rfc5114_2048_256`] unless you generate your own.
    pub fn new(p: BigUint, q: BigUint, generator: BigUint) -> Result<Self> {
        let group = Self {
            p,
            q,
            generator: ZpElement(generator),
        };
        if !group.validate_group() {
            return Err(Error::InvalidGroup(
                "(p, q, g) does not describe a prime-order subgroup of Zp*".to_string(),
            ));
        }
        Ok(group)
    }

    /// The 2048-bit MODP group with a 256-bit prime-order subgroup from
    /// RFC 5114 section 2.3.
    pub fn rfc5114_2048_256() -> Self {
        let p = biguint_from_hex(RFC5114_P_HEX);
        let q = biguint_from_hex(RFC5114_Q_HEX);
        let g = biguint_from_hex(RFC5114_G_HEX);
        Self::new(p, q, g).unwrap_or_else(|_| unreachable!("RFC 5114 constants are valid"))
    }

    /// The safe-prime modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }
}

impl DlogGroup for ZpGroup {
    type Element = ZpElement;

    fn name(&self) -> &'static str {
        "Zp-prime-order-subgroup"
    }

    fn order(&self) -> &BigUint {
        &self.q
    }

    fn generator(&self) -> &Self::Element {
        &self.generator
    }

    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element {
        ZpElement(base.0.modpow(exponent, &self.p))
    }

    fn multiply(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        ZpElement((&lhs.0 * &rhs.0) % &self.p)
    }

    fn is_member(&self, element: &Self::Element) -> bool {
        if element.0.is_zero() || element.0 >= self.p {
            return false;
        }
        element.0.modpow(&self.q, &self.p).is_one()
    }

    fn validate_group(&self) -> bool {
        if self.p <= BigUint::from(3u8) || self.q <= BigUint::one() {
            return false;
        }
        if ((&self.p - BigUint::one()) % &self.q) != BigUint::zero() {
            return false;
        }
        let g = &self.generator.0;
        if g.is_zero() || g.is_one() || *g >= self.p {
            return false;
        }
        g.modpow(&self.q, &self.p).is_one()
    }

    fn is_ddh_secure(&self) -> bool {
        true
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        element.0.to_bytes_be()
    }

    fn reconstruct_element(&self, trusted: bool, bytes: &[u8]) -> Result<Self::Element> {
        let value = BigUint::from_bytes_be(bytes);
        if value.is_zero() || value >= self.p {
            return Err(Error::BadInput(
                "Element encoding is outside the residue range".to_string(),
            ));
        }
        let element = ZpElement(value);
        if !trusted && !self.is_member(&element) {
            return Err(Error::CheatAttempt(
                "Received element is not a member of the group".to_string(),
            ));
        }
        Ok(element)
    }
}

fn biguint_from_hex(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .unwrap_or_else(|| unreachable!("constant hex strings are well-formed"))
}

const RFC5114_P_HEX: &str = "87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8EF6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

const RFC5114_Q_HEX: &str = "8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3";

const RFC5114_G_HEX: &str = "3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA12510DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0ADB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C32F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659";
