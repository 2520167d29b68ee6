use crate as pallet_compliance;
use clad_primitives::{CountryCode, IdentityId, IdentityRegistryInspect, VerificationError};
use frame_support::{
    derive_impl,
    traits::{ConstU32, ConstU64},
};
use frame_system::EnsureRoot;
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
/// Second wallet of BOB's identity
pub const BOB_SAVINGS: u64 = 3;
pub const CHARLIE: u64 = 4;
pub const UNKNOWN: u64 = 99;

pub const US: CountryCode = 840;
pub const KP: CountryCode = 408;

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Compliance: pallet_compliance,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

/// Fixed holder table: ALICE and BOB in the US, CHARLIE in KP, BOB holding
/// two wallets, UNKNOWN unregistered.
pub struct Registry;
impl Registry {
    fn record(holder: &u64) -> Option<(IdentityId, CountryCode)> {
        match *holder {
            ALICE => Some((100, US)),
            BOB | BOB_SAVINGS => Some((200, US)),
            CHARLIE => Some((300, KP)),
            _ => None,
        }
    }
}

impl IdentityRegistryInspect<u64> for Registry {
    fn check_verified(holder: &u64) -> Result<(), VerificationError> {
        Self::record(holder).map(|_| ()).ok_or(VerificationError::NotRegistered)
    }

    fn identity_of(holder: &u64) -> Option<IdentityId> {
        Self::record(holder).map(|(identity, _)| identity)
    }

    fn country_of(holder: &u64) -> Option<CountryCode> {
        Self::record(holder).map(|(_, country)| country)
    }
}

impl pallet_compliance::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureRoot<u64>;
    type IdentityRegistry = Registry;
    type MaxModules = ConstU32<2>;
    type WeightInfo = ();
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    let t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
