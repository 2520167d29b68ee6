use crate as pallet_clad_token;
use clad_primitives::{
    claim_digest, signing_key_hash, ClaimScheme, IdentityId, KeyPurpose, KeyType, ProtectedTarget,
    RegistryId,
};
use codec::Encode;
use frame_support::{
    assert_ok, derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
    PalletId,
};
use frame_system::EnsureRoot;
use sp_core::{ecdsa, Pair, H256};
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

pub const OWNER: u64 = 1;
pub const AGENT: u64 = 2;
pub const ISSUER_ADMIN: u64 = 3;
pub const ALICE: u64 = 10;
pub const BOB: u64 = 11;
pub const CHARLIE: u64 = 12;
pub const EVE: u64 = 99;

pub const KYC: u32 = 1;
pub const US: u16 = 840;

/// Identity of the trusted KYC issuer, created before anything else.
pub const ISSUER: IdentityId = 0;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        AgentManager: pallet_agent_manager,
        OnchainIdentity: pallet_onchain_identity,
        ClaimRegistry: pallet_claim_registry,
        IdentityRegistryStorage: pallet_identity_registry_storage,
        IdentityRegistry: pallet_identity_registry,
        Compliance: pallet_compliance,
        CladToken: pallet_clad_token,
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
    pub const RegistryName: RegistryId = *b"idreg/01";
}

impl pallet_agent_manager::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureRoot<u64>;
    type PalletId = AgentManagerPalletId;
    type WeightInfo = ();
}

impl pallet_onchain_identity::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type MaxClaimsPerTopic = ConstU32<4>;
    type ClaimTrust = ClaimRegistry;
    type WeightInfo = ();
}

impl pallet_claim_registry::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureRoot<u64>;
    type MaxClaimTopics = ConstU32<8>;
    type MaxTopicsPerIssuer = ConstU32<8>;
    type MaxTrustedIssuers = ConstU32<8>;
    type WeightInfo = ();
}

impl pallet_identity_registry_storage::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Permissions = AgentManager;
    type WeightInfo = ();
}

impl pallet_identity_registry::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Permissions = AgentManager;
    type IdentityStorage = IdentityRegistryStorage;
    type Identities = OnchainIdentity;
    type ClaimTrust = ClaimRegistry;
    type ThisRegistry = RegistryName;
    type MaxBatchSize = ConstU32<16>;
    type WeightInfo = ();
}

impl pallet_compliance::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureRoot<u64>;
    type IdentityRegistry = IdentityRegistry;
    type MaxModules = ConstU32<3>;
    type WeightInfo = ();
}

impl pallet_clad_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Permissions = AgentManager;
    type IdentityRegistry = IdentityRegistry;
    type Compliance = Compliance;
    type WeightInfo = ();
}

/// Token and registries owned by OWNER with AGENT as their agent. KYC is the
/// only required topic and identity [`ISSUER`] is trusted for it. Nobody is
/// onboarded and nothing is minted.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_agent_manager::GenesisConfig::<Test> {
        owners: vec![
            (ProtectedTarget::Token, OWNER),
            (ProtectedTarget::IdentityRegistry, OWNER),
            (ProtectedTarget::IdentityRegistryStorage, OWNER),
            (ProtectedTarget::AgentManager, OWNER),
        ],
        agent_admins: vec![],
        agents: vec![(ProtectedTarget::Token, AGENT), (ProtectedTarget::IdentityRegistry, AGENT)],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_claim_registry::GenesisConfig::<Test> {
        claim_topics: vec![KYC],
        trusted_issuers: vec![(ISSUER, vec![KYC])],
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_identity_registry_storage::GenesisConfig::<Test> {
        bound_registry: Some(RegistryName::get()),
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_clad_token::GenesisConfig::<Test> {
        token_name: b"Test Token".to_vec(),
        token_symbol: b"TST".to_vec(),
        decimals: 6,
        paused: false,
        initial_balances: vec![],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        assert_eq!(create_identity(ISSUER_ADMIN), ISSUER);
        assert_ok!(OnchainIdentity::add_key(
            RuntimeOrigin::signed(ISSUER_ADMIN),
            ISSUER,
            signing_key_hash(&issuer_key().public().encode()),
            KeyPurpose::Claim,
            KeyType::Ecdsa,
        ));
    });
    ext
}

pub fn issuer_key() -> ecdsa::Pair {
    ecdsa::Pair::from_seed(&[7u8; 32])
}

pub fn create_identity(management: u64) -> IdentityId {
    let identity = pallet_onchain_identity::NextIdentityId::<Test>::get();
    assert_ok!(OnchainIdentity::create_identity(RuntimeOrigin::signed(management), management));
    identity
}

/// Attach a KYC claim from [`ISSUER`] to the identity `holder` manages.
pub fn add_kyc_claim(holder: u64, identity: IdentityId) {
    let data = b"kyc:passed".to_vec();
    let signature = issuer_key().sign_prehashed(&claim_digest(identity, KYC, &data)).encode();
    assert_ok!(OnchainIdentity::add_claim(
        RuntimeOrigin::signed(holder),
        identity,
        KYC,
        ClaimScheme::Ecdsa,
        ISSUER,
        signature,
        data,
        vec![],
    ));
}

pub fn register(holder: u64, identity: IdentityId, country: u16) {
    assert_ok!(IdentityRegistry::register_identity(
        RuntimeOrigin::signed(AGENT),
        holder,
        identity,
        country
    ));
}

/// Make `holder` a verified holder in `country`.
pub fn onboard_in(holder: u64, country: u16) -> IdentityId {
    let identity = create_identity(holder);
    add_kyc_claim(holder, identity);
    register(holder, identity, country);
    identity
}

pub fn onboard(holder: u64) -> IdentityId {
    onboard_in(holder, US)
}

pub fn mint(to: u64, amount: u128) {
    assert_ok!(CladToken::mint(RuntimeOrigin::signed(AGENT), to, amount));
}
