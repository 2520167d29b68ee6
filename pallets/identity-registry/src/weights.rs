//! Weights for pallet-identity-registry.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn register_identity() -> Weight;
    fn batch_register_identity(n: u32) -> Weight;
    fn update_identity() -> Weight;
    fn update_country() -> Weight;
    fn delete_identity() -> Weight;
}

impl WeightInfo for () {
    fn register_identity() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn batch_register_identity(n: u32) -> Weight {
        Weight::from_parts(10_000, 0).saturating_mul(n.max(1) as u64)
    }
    fn update_identity() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn update_country() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn delete_identity() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
