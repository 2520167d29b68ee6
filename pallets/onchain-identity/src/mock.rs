use crate as pallet_onchain_identity;
use clad_primitives::{
    claim_digest, signing_key_hash, ClaimTopic, ClaimTrustInspect, IdentityId, KeyHash,
};
use codec::Encode;
use frame_support::{
    derive_impl,
    traits::{ConstU32, ConstU64},
};
use sp_core::{ecdsa, Pair, H256};
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const ISSUER_ADMIN: u64 = 3;
pub const EVE: u64 = 9;

/// The only issuer identity trusted to write claims onto others, for `TRUSTED_TOPIC`.
pub const TRUSTED_ISSUER: IdentityId = 1;
pub const TRUSTED_TOPIC: ClaimTopic = 1;

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        OnchainIdentity: pallet_onchain_identity,
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

pub struct TrustedIssuers;

impl ClaimTrustInspect for TrustedIssuers {
    fn required_topics() -> Vec<ClaimTopic> {
        vec![TRUSTED_TOPIC]
    }

    fn is_trusted_issuer_for_topic(issuer: IdentityId, topic: ClaimTopic) -> bool {
        issuer == TRUSTED_ISSUER && topic == TRUSTED_TOPIC
    }
}

impl pallet_onchain_identity::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type MaxClaimsPerTopic = ConstU32<2>;
    type ClaimTrust = TrustedIssuers;
    type WeightInfo = ();
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    let t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

pub fn claim_signer(seed: u8) -> ecdsa::Pair {
    ecdsa::Pair::from_seed(&[seed; 32])
}

pub fn signer_key(pair: &ecdsa::Pair) -> KeyHash {
    signing_key_hash(&pair.public().encode())
}

pub fn sign_claim(
    pair: &ecdsa::Pair,
    subject: IdentityId,
    topic: ClaimTopic,
    data: &[u8],
) -> Vec<u8> {
    pair.sign_prehashed(&claim_digest(subject, topic, data)).encode()
}
