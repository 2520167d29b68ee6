//! Claim layout and signature handling.
//!
//! A claim is an issuer's signed statement that an identity satisfies a topic.
//! The signed message is always
//!
//! ```text
//! digest = blake2_256(SCALE(subject: IdentityId, topic: ClaimTopic, data: Vec<u8>))
//! ```
//!
//! and the signing key must be registered with the `Claim` purpose on the
//! issuer's identity. Key material never lives on-chain, only its hash.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_core::{ConstU32, H256};
use sp_io::hashing::blake2_256;
use sp_runtime::{BoundedVec, RuntimeDebug};

use crate::{ClaimId, ClaimTopic, IdentityId, KeyHash};

pub const MAX_CLAIM_SIGNATURE_LEN: u32 = 128;
pub const MAX_CLAIM_DATA_LEN: u32 = 256;
pub const MAX_CLAIM_URI_LEN: u32 = 128;

/// Length of a recoverable secp256k1 signature (`r || s || v`).
pub const ECDSA_SIGNATURE_LEN: usize = 65;

/// `n / 2` for the secp256k1 group order `n`, big-endian.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

pub type ClaimSignature = BoundedVec<u8, ConstU32<MAX_CLAIM_SIGNATURE_LEN>>;
pub type ClaimData = BoundedVec<u8, ConstU32<MAX_CLAIM_DATA_LEN>>;
pub type ClaimUri = BoundedVec<u8, ConstU32<MAX_CLAIM_URI_LEN>>;

/// Signature scheme a claim was signed with.
///
/// Only single-signature attestation is supported. New schemes get a new
/// variant and a new arm in [`recover_claim_signer`].
#[derive(
    Clone, Copy, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub enum ClaimScheme {
    /// secp256k1 ECDSA with public key recovery.
    #[codec(index = 1)]
    Ecdsa,
}

/// A signed attestation held by an identity.
#[derive(
    Clone, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub struct Claim {
    pub topic: ClaimTopic,
    pub scheme: ClaimScheme,
    /// Identity of the issuer whose claim key signed `signature`.
    pub issuer: IdentityId,
    pub signature: ClaimSignature,
    pub data: ClaimData,
    pub uri: ClaimUri,
}

impl Claim {
    pub fn id(&self) -> ClaimId {
        claim_id(self.issuer, self.topic)
    }
}

/// Identifier of the claim `issuer` holds over `topic` on any identity.
pub fn claim_id(issuer: IdentityId, topic: ClaimTopic) -> ClaimId {
    H256(blake2_256(&(issuer, topic).encode()))
}

/// Message an issuer signs to attest `topic` for `subject`.
pub fn claim_digest(subject: IdentityId, topic: ClaimTopic, data: &[u8]) -> [u8; 32] {
    blake2_256(&(subject, topic, data).encode())
}

/// Key hash under which an account is registered on an identity.
pub fn account_key_hash<AccountId: Encode>(who: &AccountId) -> KeyHash {
    H256(blake2_256(&who.encode()))
}

/// Key hash of a signing public key, in its serialized form.
pub fn signing_key_hash(public: &[u8]) -> KeyHash {
    H256(blake2_256(public))
}

/// Hash a revoked signature is recorded under.
pub fn signature_hash(signature: &[u8]) -> H256 {
    H256(blake2_256(signature))
}

/// Recover the hash of the key that produced `signature` over `digest`.
///
/// Returns `None` when the signature is malformed for `scheme` or no key can be
/// recovered from it. ECDSA signatures must be in canonical form (`s <= n/2`
/// and a raw recovery id of 0 or 1), so every attestation has exactly one
/// accepted encoding and revoking it by [`signature_hash`] is final.
pub fn recover_claim_signer(
    scheme: ClaimScheme,
    signature: &[u8],
    digest: &[u8; 32],
) -> Option<KeyHash> {
    match scheme {
        ClaimScheme::Ecdsa => {
            let signature: &[u8; ECDSA_SIGNATURE_LEN] = signature.try_into().ok()?;
            if signature[64] > 1 || signature[32..64] > SECP256K1_HALF_ORDER[..] {
                return None;
            }
            let public = sp_io::crypto::secp256k1_ecdsa_recover_compressed(signature, digest).ok()?;
            Some(signing_key_hash(&public))
        },
    }
}
