use crate as pallet_identity_registry_storage;
use clad_primitives::{AgentPermissions, ProtectedTarget, RegistryId};
use frame_support::{
    derive_impl,
    traits::{ConstU32, ConstU64},
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

pub const OWNER: u64 = 1;
pub const AGENT: u64 = 2;
pub const EVE: u64 = 9;

pub const REGISTRY: RegistryId = *b"registry";
pub const NEW_REGISTRY: RegistryId = *b"registr2";

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        IdentityRegistryStorage: pallet_identity_registry_storage,
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

/// OWNER owns the storage, AGENT is its agent.
pub struct StoragePermissions;
impl AgentPermissions<u64> for StoragePermissions {
    fn is_owner(target: ProtectedTarget, who: &u64) -> bool {
        target == ProtectedTarget::IdentityRegistryStorage && *who == OWNER
    }

    fn is_agent(target: ProtectedTarget, who: &u64) -> bool {
        target == ProtectedTarget::IdentityRegistryStorage && *who == AGENT
    }
}

impl pallet_identity_registry_storage::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Permissions = StoragePermissions;
    type WeightInfo = ();
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_identity_registry_storage::GenesisConfig::<Test> {
        bound_registry: Some(REGISTRY),
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
