use clad_primitives::{KeyPurpose, KeyType};
use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::{pallet_prelude::ConstU32, BoundedVec};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

/// One slot per [`KeyPurpose`] variant.
pub const MAX_KEY_PURPOSES: u32 = 4;

/// A key registered on an identity.
#[derive(Clone, PartialEq, Eq, Encode, Decode, MaxEncodedLen, TypeInfo, RuntimeDebug)]
pub struct Key {
    pub purposes: BoundedVec<KeyPurpose, ConstU32<MAX_KEY_PURPOSES>>,
    pub key_type: KeyType,
}

impl Key {
    pub fn has_purpose(&self, purpose: KeyPurpose) -> bool {
        self.purposes.contains(&purpose)
    }
}

#[derive(Clone, PartialEq, Eq, Default, Encode, Decode, MaxEncodedLen, TypeInfo, RuntimeDebug)]
pub struct IdentityDetails {
    /// Never drops below one.
    pub management_keys: u32,
    pub claims: u32,
}
