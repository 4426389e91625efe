use num_bigint::BigUint;
use sigma_pedersen::groups::ZpElement;
use sigma_pedersen::{DlogGroup, Result, ZpGroup};

/// A structurally valid group that does not claim DDH hardness, for
/// exercising the security-level checks.
#[derive(Clone, Debug)]
pub struct NoDdhGroup(ZpGroup);

impl NoDdhGroup {
    pub fn new() -> Self {
        Self(
            ZpGroup::new(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8))
                .expect("toy parameters are valid"),
        )
    }
}

impl DlogGroup for NoDdhGroup {
    type Element = ZpElement;

    fn name(&self) -> &'static str {
        "no-ddh-test-group"
    }

    fn order(&self) -> &BigUint {
        self.0.order()
    }

    fn generator(&self) -> &Self::Element {
        self.0.generator()
    }

    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element {
        self.0.exponentiate(base, exponent)
    }

    fn multiply(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        self.0.multiply(lhs, rhs)
    }

    fn is_member(&self, element: &Self::Element) -> bool {
        self.0.is_member(element)
    }

    fn validate_group(&self) -> bool {
        self.0.validate_group()
    }

    fn is_ddh_secure(&self) -> bool {
        false
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        self.0.element_to_bytes(element)
    }

    fn reconstruct_element(&self, trusted: bool, bytes: &[u8]) -> Result<Self::Element> {
        self.0.reconstruct_element(trusted, bytes)
    }
}
