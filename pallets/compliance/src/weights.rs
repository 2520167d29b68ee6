//! Weights for pallet-compliance.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn bind_module() -> Weight;
    fn unbind_module() -> Weight;
    fn preset_identity_balance() -> Weight;
    fn preset_tracked_supply() -> Weight;
}

impl WeightInfo for () {
    fn bind_module() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn unbind_module() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn preset_identity_balance() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn preset_tracked_supply() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
