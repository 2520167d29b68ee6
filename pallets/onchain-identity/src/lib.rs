//! # On-chain Identity
//!
//! Identities hold keys and claims. Keys are stored by hash and carry one or
//! more [`KeyPurpose`]s: management keys administer the identity, claim keys
//! sign claims the identity issues to others.
//!
//! Claims are written either by the subject (a management or claim key of the
//! identity receiving the claim) or by the issuer (a management or claim key
//! of the issuing identity). Issuer-side writes are only accepted from issuers
//! `Config::ClaimTrust` trusts for the topic, so an untrusted issuer cannot
//! occupy a subject's claim slots. Whether a stored claim counts is still
//! decided by [`Pallet::is_claim_valid`] and the trusted issuers registry at
//! verification time.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{
    account_key_hash, claim_digest, recover_claim_signer, signature_hash, Claim, ClaimData,
    ClaimId, ClaimScheme, ClaimSignature, ClaimTopic, ClaimTrustInspect, ClaimUri, IdentityId,
    IdentityInspect, KeyHash, KeyPurpose, KeyType, H256,
};
use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;
pub use types::{IdentityDetails, Key};
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


pub mod types;
pub mod weights;

const LOG_TARGET: &str = "pallet-onchain-identity";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Claims one identity may hold for a single topic (one per issuer).
        #[pallet::constant]
        type MaxClaimsPerTopic: Get<u32>;

        /// Decides which issuers may write claims onto other identities.
        type ClaimTrust: ClaimTrustInspect;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::storage]
    pub type NextIdentityId<T> = StorageValue<_, IdentityId, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn identity)]
    pub type Identities<T> =
        StorageMap<_, Blake2_128Concat, IdentityId, IdentityDetails, OptionQuery>;

    #[pallet::storage]
    pub type Keys<T> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        IdentityId,
        Blake2_128Concat,
        KeyHash,
        Key,
        OptionQuery,
    >;

    #[pallet::storage]
    pub type Claims<T> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        IdentityId,
        Blake2_128Concat,
        ClaimId,
        Claim,
        OptionQuery,
    >;

    /// Claim ids held by an identity, grouped by topic
    #[pallet::storage]
    pub type ClaimsByTopic<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        IdentityId,
        Twox64Concat,
        ClaimTopic,
        BoundedVec<ClaimId, T::MaxClaimsPerTopic>,
        ValueQuery,
    >;

    /// Signatures an issuer has withdrawn, by signature hash
    #[pallet::storage]
    pub type RevokedSignatures<T> =
        StorageDoubleMap<_, Blake2_128Concat, IdentityId, Identity, H256, bool, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        IdentityCreated { identity: IdentityId, management: T::AccountId },
        KeyAdded { identity: IdentityId, key: KeyHash, purpose: KeyPurpose, key_type: KeyType },
        KeyRemoved { identity: IdentityId, key: KeyHash, purpose: KeyPurpose },
        ClaimAdded { identity: IdentityId, claim_id: ClaimId, topic: ClaimTopic, issuer: IdentityId },
        ClaimChanged {
            identity: IdentityId,
            claim_id: ClaimId,
            topic: ClaimTopic,
            issuer: IdentityId,
        },
        ClaimRemoved {
            identity: IdentityId,
            claim_id: ClaimId,
            topic: ClaimTopic,
            issuer: IdentityId,
        },
        ClaimRevoked { issuer: IdentityId, signature_hash: H256 },
    }

    #[pallet::error]
    pub enum Error<T> {
        IdentityNotFound,
        IssuerNotFound,
        /// Caller holds no management key on the identity.
        NotManagementKey,
        /// Caller may not write claims on the identity.
        Unauthorized,
        /// Issuer-side write from an issuer not trusted for the topic.
        IssuerNotTrusted,
        KeyAlreadyHasPurpose,
        TooManyPurposes,
        KeyNotFound,
        /// Removing the key would leave the identity without a management key.
        LastManagementKey,
        SignatureTooLong,
        DataTooLong,
        UriTooLong,
        /// The signature does not come from a claim key of the issuer.
        InvalidSignature,
        TooManyClaims,
        ClaimNotFound,
        AlreadyRevoked,
        Overflow,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Create an identity managed by `management`.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::create_identity())]
        pub fn create_identity(origin: OriginFor<T>, management: T::AccountId) -> DispatchResult {
            ensure_signed(origin)?;
            let identity = NextIdentityId::<T>::get();
            let next = identity.checked_add(1).ok_or(Error::<T>::Overflow)?;

            let key = Key {
                purposes: BoundedVec::truncate_from(Vec::from([KeyPurpose::Management])),
                key_type: KeyType::Ecdsa,
            };
            Keys::<T>::insert(identity, account_key_hash(&management), key);
            Identities::<T>::insert(identity, IdentityDetails { management_keys: 1, claims: 0 });
            NextIdentityId::<T>::put(next);

            Self::deposit_event(Event::IdentityCreated { identity, management });
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::add_key())]
        pub fn add_key(
            origin: OriginFor<T>,
            identity: IdentityId,
            key: KeyHash,
            purpose: KeyPurpose,
            key_type: KeyType,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_management(identity, &caller)?;

            let entry = match Keys::<T>::get(identity, key) {
                Some(mut entry) => {
                    ensure!(!entry.has_purpose(purpose), Error::<T>::KeyAlreadyHasPurpose);
                    entry.purposes.try_push(purpose).map_err(|_| Error::<T>::TooManyPurposes)?;
                    entry
                },
                None => Key { purposes: BoundedVec::truncate_from(Vec::from([purpose])), key_type },
            };

            if purpose == KeyPurpose::Management {
                Identities::<T>::try_mutate(identity, |details| -> DispatchResult {
                    let details = details.as_mut().ok_or(Error::<T>::IdentityNotFound)?;
                    details.management_keys =
                        details.management_keys.checked_add(1).ok_or(Error::<T>::Overflow)?;
                    Ok(())
                })?;
            }
            let key_type = entry.key_type;
            Keys::<T>::insert(identity, key, entry);

            Self::deposit_event(Event::KeyAdded { identity, key, purpose, key_type });
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::remove_key())]
        pub fn remove_key(
            origin: OriginFor<T>,
            identity: IdentityId,
            key: KeyHash,
            purpose: KeyPurpose,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_management(identity, &caller)?;

            let mut entry = Keys::<T>::get(identity, key).ok_or(Error::<T>::KeyNotFound)?;
            ensure!(entry.has_purpose(purpose), Error::<T>::KeyNotFound);

            if purpose == KeyPurpose::Management {
                Identities::<T>::try_mutate(identity, |details| -> DispatchResult {
                    let details = details.as_mut().ok_or(Error::<T>::IdentityNotFound)?;
                    ensure!(details.management_keys > 1, Error::<T>::LastManagementKey);
                    details.management_keys -= 1;
                    Ok(())
                })?;
            }

            entry.purposes.retain(|p| *p != purpose);
            if entry.purposes.is_empty() {
                Keys::<T>::remove(identity, key);
            } else {
                Keys::<T>::insert(identity, key, entry);
            }

            Self::deposit_event(Event::KeyRemoved { identity, key, purpose });
            Ok(())
        }

        /// Record a claim on `identity`, replacing any earlier claim from the
        /// same issuer on the same topic.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::add_claim())]
        #[allow(clippy::too_many_arguments)]
        pub fn add_claim(
            origin: OriginFor<T>,
            identity: IdentityId,
            topic: ClaimTopic,
            scheme: ClaimScheme,
            issuer: IdentityId,
            signature: Vec<u8>,
            data: Vec<u8>,
            uri: Vec<u8>,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            ensure!(Identities::<T>::contains_key(identity), Error::<T>::IdentityNotFound);
            ensure!(Identities::<T>::contains_key(issuer), Error::<T>::IssuerNotFound);
            if !Self::can_write_claims(identity, &caller) {
                ensure!(Self::can_write_claims(issuer, &caller), Error::<T>::Unauthorized);
                ensure!(
                    T::ClaimTrust::is_trusted_issuer_for_topic(issuer, topic),
                    Error::<T>::IssuerNotTrusted
                );
            }

            let signature: ClaimSignature =
                signature.try_into().map_err(|_| Error::<T>::SignatureTooLong)?;
            let data: ClaimData = data.try_into().map_err(|_| Error::<T>::DataTooLong)?;
            let uri: ClaimUri = uri.try_into().map_err(|_| Error::<T>::UriTooLong)?;

            ensure!(
                Self::is_claim_valid(issuer, identity, topic, scheme, &signature, &data),
                Error::<T>::InvalidSignature
            );

            let claim = Claim { topic, scheme, issuer, signature, data, uri };
            let claim_id = claim.id();

            if Claims::<T>::contains_key(identity, claim_id) {
                Claims::<T>::insert(identity, claim_id, claim);
                Self::deposit_event(Event::ClaimChanged { identity, claim_id, topic, issuer });
                return Ok(());
            }

            ClaimsByTopic::<T>::try_mutate(identity, topic, |ids| {
                ids.try_push(claim_id).map_err(|_| Error::<T>::TooManyClaims)
            })?;
            Claims::<T>::insert(identity, claim_id, claim);
            Identities::<T>::mutate(identity, |details| {
                if let Some(details) = details {
                    details.claims = details.claims.saturating_add(1);
                }
            });

            Self::deposit_event(Event::ClaimAdded { identity, claim_id, topic, issuer });
            Ok(())
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::remove_claim())]
        pub fn remove_claim(
            origin: OriginFor<T>,
            identity: IdentityId,
            claim_id: ClaimId,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            let claim = Claims::<T>::get(identity, claim_id).ok_or(Error::<T>::ClaimNotFound)?;
            ensure!(
                Self::can_write_claims(identity, &caller) ||
                    Self::can_write_claims(claim.issuer, &caller),
                Error::<T>::Unauthorized
            );

            Claims::<T>::remove(identity, claim_id);
            ClaimsByTopic::<T>::mutate_exists(identity, claim.topic, |ids| {
                if let Some(list) = ids {
                    list.retain(|id| *id != claim_id);
                    if list.is_empty() {
                        *ids = None;
                    }
                }
            });
            Identities::<T>::mutate(identity, |details| {
                if let Some(details) = details {
                    details.claims = details.claims.saturating_sub(1);
                }
            });

            Self::deposit_event(Event::ClaimRemoved {
                identity,
                claim_id,
                topic: claim.topic,
                issuer: claim.issuer,
            });
            Ok(())
        }

        /// Withdraw a signature `issuer` produced. Every claim carrying it stops
        /// validating, wherever it is stored.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::revoke_claim())]
        pub fn revoke_claim(
            origin: OriginFor<T>,
            issuer: IdentityId,
            signature: Vec<u8>,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_management(issuer, &caller)?;

            let signature_hash = signature_hash(&signature);
            ensure!(
                !RevokedSignatures::<T>::get(issuer, signature_hash),
                Error::<T>::AlreadyRevoked
            );
            RevokedSignatures::<T>::insert(issuer, signature_hash, true);

            Self::deposit_event(Event::ClaimRevoked { issuer, signature_hash });
            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn key_has_purpose(identity: IdentityId, key: &KeyHash, purpose: KeyPurpose) -> bool {
        Keys::<T>::get(identity, key).is_some_and(|entry| entry.has_purpose(purpose))
    }

    pub fn claims_by_topic(identity: IdentityId, topic: ClaimTopic) -> Vec<Claim> {
        ClaimsByTopic::<T>::get(identity, topic)
            .iter()
            .filter_map(|claim_id| Claims::<T>::get(identity, claim_id))
            .collect()
    }

    /// First claim `identity` holds on `topic`, in insertion order.
    pub fn get_claim(identity: IdentityId, topic: ClaimTopic) -> Option<Claim> {
        ClaimsByTopic::<T>::get(identity, topic)
            .first()
            .and_then(|claim_id| Claims::<T>::get(identity, claim_id))
    }

    /// Whether `signature` over `(subject, topic, data)` was produced by a claim
    /// key of `issuer` and has not been revoked.
    pub fn is_claim_valid(
        issuer: IdentityId,
        subject: IdentityId,
        topic: ClaimTopic,
        scheme: ClaimScheme,
        signature: &[u8],
        data: &[u8],
    ) -> bool {
        if RevokedSignatures::<T>::get(issuer, signature_hash(signature)) {
            log::debug!(target: LOG_TARGET, "Claim signature revoked by issuer {}", issuer);
            return false;
        }

        let digest = claim_digest(subject, topic, data);
        match recover_claim_signer(scheme, signature, &digest) {
            Some(signer) => Self::key_has_purpose(issuer, &signer, KeyPurpose::Claim),
            None => {
                log::debug!(
                    target: LOG_TARGET,
                    "Malformed claim signature for identity {} topic {}",
                    subject,
                    topic
                );
                false
            },
        }
    }

    fn ensure_management(identity: IdentityId, who: &T::AccountId) -> DispatchResult {
        ensure!(Identities::<T>::contains_key(identity), Error::<T>::IdentityNotFound);
        ensure!(
            Self::key_has_purpose(identity, &account_key_hash(who), KeyPurpose::Management),
            Error::<T>::NotManagementKey
        );
        Ok(())
    }

    fn can_write_claims(identity: IdentityId, who: &T::AccountId) -> bool {
        let key = account_key_hash(who);
        Self::key_has_purpose(identity, &key, KeyPurpose::Management) ||
            Self::key_has_purpose(identity, &key, KeyPurpose::Claim)
    }
}

impl<T: Config> IdentityInspect for Pallet<T> {
    fn identity_exists(identity: IdentityId) -> bool {
        Identities::<T>::contains_key(identity)
    }

    fn claims_by_topic(identity: IdentityId, topic: ClaimTopic) -> Vec<Claim> {
        Pallet::<T>::claims_by_topic(identity, topic)
    }

    fn is_claim_valid(
        issuer: IdentityId,
        subject: IdentityId,
        topic: ClaimTopic,
        scheme: ClaimScheme,
        signature: &[u8],
        data: &[u8],
    ) -> bool {
        Pallet::<T>::is_claim_valid(issuer, subject, topic, scheme, signature, data)
    }
}
