//! Weights for pallet-onchain-identity.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn create_identity() -> Weight;
    fn add_key() -> Weight;
    fn remove_key() -> Weight;
    fn add_claim() -> Weight;
    fn remove_claim() -> Weight;
    fn revoke_claim() -> Weight;
}

impl WeightInfo for () {
    fn create_identity() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn add_key() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn remove_key() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    // Includes one secp256k1 recovery
    fn add_claim() -> Weight {
        Weight::from_parts(50_000, 0)
    }
    fn remove_claim() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn revoke_claim() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
