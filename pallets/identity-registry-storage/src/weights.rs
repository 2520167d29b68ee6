//! Weights for pallet-identity-registry-storage.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn bind_identity_registry() -> Weight;
    fn unbind_identity_registry() -> Weight;
}

impl WeightInfo for () {
    fn bind_identity_registry() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn unbind_identity_registry() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
