//! Weights for pallet-agent-manager.
//!
//! Flat placeholder weights until the pallet is benchmarked.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn add_agent_admin() -> Weight;
    fn remove_agent_admin() -> Weight;
    fn add_agent() -> Weight;
    fn remove_agent() -> Weight;
    fn transfer_ownership() -> Weight;
    fn force_set_owner() -> Weight;
}

impl WeightInfo for () {
    fn add_agent_admin() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn remove_agent_admin() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn add_agent() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn remove_agent() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn transfer_ownership() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn force_set_owner() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
