//! Weights for pallet-claim-registry.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn add_claim_topic() -> Weight;
    fn remove_claim_topic() -> Weight;
    fn add_trusted_issuer() -> Weight;
    fn remove_trusted_issuer() -> Weight;
    fn update_issuer_claim_topics() -> Weight;
}

impl WeightInfo for () {
    fn add_claim_topic() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn remove_claim_topic() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn add_trusted_issuer() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn remove_trusted_issuer() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn update_issuer_claim_topics() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
