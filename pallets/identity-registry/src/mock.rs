use crate as pallet_identity_registry;
use clad_primitives::{
    claim_digest, signing_key_hash, IdentityId, KeyPurpose, KeyType,
    ProtectedTarget, RegistryId,
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
pub const EVE: u64 = 99;

pub const KYC: u32 = 1;
pub const ACCREDITED: u32 = 2;
pub const US: u16 = 840;

/// First identity created in every test, trusted for KYC at genesis.
pub const ISSUER: IdentityId = 0;

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        AgentManager: pallet_agent_manager,
        OnchainIdentity: pallet_onchain_identity,
        ClaimRegistry: pallet_claim_registry,
        IdentityRegistryStorage: pallet_identity_registry_storage,
        IdentityRegistry: pallet_identity_registry,
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
    type MaxBatchSize = ConstU32<3>;
    type WeightInfo = ();
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_agent_manager::GenesisConfig::<Test> {
        owners: vec![
            (ProtectedTarget::IdentityRegistry, OWNER),
            (ProtectedTarget::IdentityRegistryStorage, OWNER),
        ],
        agent_admins: vec![],
        agents: vec![(ProtectedTarget::IdentityRegistry, AGENT)],
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

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        let issuer = create_identity(ISSUER_ADMIN);
        assert_eq!(issuer, ISSUER);
        add_claim_key(ISSUER, ISSUER_ADMIN, &issuer_key());
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

/// Register `pair` as a claim signing key of `issuer`, managed by `admin`.
pub fn add_claim_key(issuer: IdentityId, admin: u64, pair: &ecdsa::Pair) {
    assert_ok!(OnchainIdentity::add_key(
        RuntimeOrigin::signed(admin),
        issuer,
        signing_key_hash(&pair.public().encode()),
        KeyPurpose::Claim,
        KeyType::Ecdsa,
    ));
}

/// Management account used for issuers created with [`create_issuer`].
pub fn issuer_admin(issuer: IdentityId) -> u64 {
    1_000 + issuer
}

pub fn create_issuer(pair: &ecdsa::Pair) -> IdentityId {
    let issuer = pallet_onchain_identity::NextIdentityId::<Test>::get();
    assert_eq!(create_identity(issuer_admin(issuer)), issuer);
    add_claim_key(issuer, issuer_admin(issuer), pair);
    issuer
}

/// Put a claim signed by `pair` for `issuer` onto `identity`, managed by
/// `holder`.
pub fn give_claim(
    holder: u64,
    identity: IdentityId,
    issuer: IdentityId,
    pair: &ecdsa::Pair,
    topic: u32,
) {
    let data = b"verified".to_vec();
    let signature = pair.sign_prehashed(&claim_digest(identity, topic, &data)).encode();
    assert_ok!(OnchainIdentity::add_claim(
        RuntimeOrigin::signed(holder),
        identity,
        topic,
        clad_primitives::ClaimScheme::Ecdsa,
        issuer,
        signature,
        data,
        vec![],
    ));
}

/// Identity with a KYC claim from the trusted issuer, registered for
/// `holder`.
pub fn onboard(holder: u64) -> IdentityId {
    let identity = create_identity(holder);
    give_claim(holder, identity, ISSUER, &issuer_key(), KYC);
    assert_ok!(IdentityRegistry::register_identity(
        RuntimeOrigin::signed(AGENT),
        holder,
        identity,
        US
    ));
    identity
}
