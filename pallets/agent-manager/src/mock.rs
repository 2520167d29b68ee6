use crate as pallet_agent_manager;
use clad_primitives::ProtectedTarget;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
    PalletId,
};
use frame_system::EnsureRoot;
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

pub const OWNER: u64 = 1;
pub const AGENT_ADMIN: u64 = 2;
pub const AGENT: u64 = 3;
pub const OPERATOR: u64 = 4;
pub const OUTSIDER: u64 = 9;

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        AgentManager: pallet_agent_manager,
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

parameter_types! {
    pub const AgentManagerPalletId: PalletId = PalletId(*b"clad/agm");
}

impl pallet_agent_manager::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureRoot<u64>;
    type PalletId = AgentManagerPalletId;
    type WeightInfo = ();
}

// Token and manager owned by OWNER, one agent admin and one agent on the token.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_agent_manager::GenesisConfig::<Test> {
        owners: vec![(ProtectedTarget::Token, OWNER), (ProtectedTarget::AgentManager, OWNER)],
        agent_admins: vec![(ProtectedTarget::Token, AGENT_ADMIN)],
        agents: vec![(ProtectedTarget::Token, AGENT)],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
