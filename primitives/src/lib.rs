//! Primitives shared by the Clad permissioned token pallets.
//!
//! The pallets never call each other directly. Every cross-pallet dependency
//! goes through one of the traits in [`traits`], and the concrete wiring is
//! chosen in the runtime `Config` of each pallet:
//!
//! - [`AgentPermissions`]: role checks, implemented by `pallet-agent-manager`
//! - [`IdentityInspect`]: identity keys and claims, `pallet-onchain-identity`
//! - [`ClaimTrustInspect`]: required topics and trusted issuers, `pallet-claim-registry`
//! - [`IdentityStorage`]: holder records, `pallet-identity-registry-storage`
//! - [`IdentityRegistryInspect`]: eligibility, `pallet-identity-registry`
//! - [`ComplianceHooks`]: transfer rules, `pallet-compliance`

#![cfg_attr(not(feature = "std"), no_std)]

pub mod claim;
pub mod traits;

pub use claim::*;
pub use traits::*;

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_runtime::RuntimeDebug;

pub use sp_core::H256;

/// Reference to an on-chain identity.
pub type IdentityId = u64;

/// Claim topic tag (e.g. KYC, accreditation).
pub type ClaimTopic = u32;

/// ISO-3166 numeric country code of a holder.
pub type CountryCode = u16;

/// Identifier an identity registry writes to its storage under.
pub type RegistryId = [u8; 8];

/// Hash of a key held by an identity.
pub type KeyHash = H256;

/// Identifier of a claim within an identity, derived from `(issuer, topic)`.
pub type ClaimId = H256;

/// Token amount.
pub type Balance = u128;

/// Purpose a key serves on an identity.
#[derive(
    Clone, Copy, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub enum KeyPurpose {
    /// May add and remove keys and claims.
    #[codec(index = 1)]
    Management,
    /// May act on behalf of the identity.
    #[codec(index = 2)]
    Action,
    /// May sign claims issued by the identity.
    #[codec(index = 3)]
    Claim,
    #[codec(index = 4)]
    Encryption,
}

#[derive(
    Clone, Copy, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub enum KeyType {
    #[codec(index = 1)]
    Ecdsa,
    #[codec(index = 2)]
    Rsa,
}

/// Holder entry kept by the identity registry storage.
#[derive(
    Clone, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub struct IdentityRecord {
    pub identity: IdentityId,
    pub country: CountryCode,
}

/// Pallets whose privileged calls are gated by the agent manager.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
    Serialize,
    Deserialize,
)]
pub enum ProtectedTarget {
    Token,
    IdentityRegistry,
    IdentityRegistryStorage,
    AgentManager,
}

/// Authority an account holds over a [`ProtectedTarget`].
///
/// Variants are ordered from weakest to strongest.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
pub enum Role {
    Agent,
    AgentAdmin,
    Owner,
}

impl Role {
    /// Whether an account holding `self` may grant or revoke `role`.
    ///
    /// Only strictly weaker roles can be managed, so nobody promotes a peer.
    pub fn can_grant(self, role: Role) -> bool {
        role != Role::Owner && self > role
    }
}

/// Reason a holder failed the eligibility check.
#[derive(
    Clone, Copy, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub enum VerificationError {
    /// The holder has no identity record.
    NotRegistered,
    /// No claim is held for a required topic.
    MissingClaim,
    /// Claims for a required topic come only from issuers not trusted for it.
    UntrustedIssuer,
    /// A trusted issuer's claim failed signature validation.
    InvalidSignature,
}
