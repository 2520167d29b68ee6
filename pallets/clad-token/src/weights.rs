//! Weights for pallet-clad-token.
//!
//! Calls that verify holders read every required claim and recover each
//! signature, so they are priced above the plain state changes.

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn mint() -> Weight;
    fn transfer() -> Weight;
    fn burn() -> Weight;
    fn pause() -> Weight;
    fn unpause() -> Weight;
    fn freeze() -> Weight;
    fn unfreeze() -> Weight;
    fn freeze_partial_tokens() -> Weight;
    fn unfreeze_partial_tokens() -> Weight;
    fn forced_transfer() -> Weight;
    fn set_token_info() -> Weight;
}

impl WeightInfo for () {
    fn mint() -> Weight {
        Weight::from_parts(50_000, 0)
    }
    fn transfer() -> Weight {
        Weight::from_parts(100_000, 0)
    }
    fn burn() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn pause() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn unpause() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn freeze() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn unfreeze() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn freeze_partial_tokens() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn unfreeze_partial_tokens() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn forced_transfer() -> Weight {
        Weight::from_parts(50_000, 0)
    }
    fn set_token_info() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
