//! # Identity Registry
//!
//! Decides whether a token holder is eligible. A holder is verified when
//!
//! 1. an identity record exists for it in the identity registry storage, and
//! 2. for every required claim topic, the holder's identity carries a claim
//!    from an issuer trusted for that topic whose signature still validates.
//!
//! Trust and validity are evaluated on every call, so removing an issuer,
//! revoking a signature or dropping a signing key takes effect immediately.
//!
//! Records are written by agents of [`ProtectedTarget::IdentityRegistry`] and
//! land in the storage pallet under [`Config::ThisRegistry`]; once the storage
//! is rebound to another registry every write from this one is refused.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{
    AgentPermissions, ClaimTopic, ClaimTrustInspect, CountryCode, IdentityId, IdentityInspect,
    IdentityRegistryInspect, IdentityStorage, ProtectedTarget, RegistryId, VerificationError,
};
use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


pub mod weights;

const LOG_TARGET: &str = "pallet-identity-registry";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type Permissions: AgentPermissions<Self::AccountId>;

        /// Where holder records live
        type IdentityStorage: IdentityStorage<Self::AccountId>;

        /// Identity keys and claims
        type Identities: IdentityInspect;

        /// Required topics and trusted issuers
        type ClaimTrust: ClaimTrustInspect;

        /// Id this registry writes to the storage under
        #[pallet::constant]
        type ThisRegistry: Get<RegistryId>;

        #[pallet::constant]
        type MaxBatchSize: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        IdentityRegistered { holder: T::AccountId, identity: IdentityId, country: CountryCode },
        IdentityRemoved { holder: T::AccountId, identity: IdentityId },
        IdentityUpdated { holder: T::AccountId, previous: IdentityId, identity: IdentityId },
        CountryUpdated { holder: T::AccountId, country: CountryCode },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller is not an agent of the registry.
        Unauthorized,
        AlreadyRegistered,
        NotRegistered,
        /// The identity does not exist in the identity store.
        IdentityNotFound,
        BatchTooLarge,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::register_identity())]
        pub fn register_identity(
            origin: OriginFor<T>,
            holder: T::AccountId,
            identity: IdentityId,
            country: CountryCode,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            Self::do_register(holder, identity, country)
        }

        /// Register several holders at once. Any failing entry reverts the
        /// whole batch.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::batch_register_identity(entries.len() as u32))]
        pub fn batch_register_identity(
            origin: OriginFor<T>,
            entries: Vec<(T::AccountId, IdentityId, CountryCode)>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            ensure!(entries.len() as u32 <= T::MaxBatchSize::get(), Error::<T>::BatchTooLarge);

            for (holder, identity, country) in entries {
                Self::do_register(holder, identity, country)?;
            }
            Ok(())
        }

        /// Point `holder` at a different identity, e.g. after key loss.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::update_identity())]
        pub fn update_identity(
            origin: OriginFor<T>,
            holder: T::AccountId,
            identity: IdentityId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            let previous = T::IdentityStorage::stored_identity(&holder)
                .ok_or(Error::<T>::NotRegistered)?;
            ensure!(T::Identities::identity_exists(identity), Error::<T>::IdentityNotFound);

            T::IdentityStorage::modify_identity(T::ThisRegistry::get(), &holder, identity)?;

            Self::deposit_event(Event::IdentityUpdated { holder, previous, identity });
            Ok(())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::update_country())]
        pub fn update_country(
            origin: OriginFor<T>,
            holder: T::AccountId,
            country: CountryCode,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            ensure!(Self::contains(&holder), Error::<T>::NotRegistered);

            T::IdentityStorage::modify_country(T::ThisRegistry::get(), &holder, country)?;

            Self::deposit_event(Event::CountryUpdated { holder, country });
            Ok(())
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::delete_identity())]
        pub fn delete_identity(origin: OriginFor<T>, holder: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            let identity = T::IdentityStorage::stored_identity(&holder)
                .ok_or(Error::<T>::NotRegistered)?;

            T::IdentityStorage::remove_identity(T::ThisRegistry::get(), &holder)?;

            Self::deposit_event(Event::IdentityRemoved { holder, identity });
            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn contains(holder: &T::AccountId) -> bool {
        T::IdentityStorage::stored_record(holder).is_some()
    }

    pub fn identity_of(holder: &T::AccountId) -> Option<IdentityId> {
        T::IdentityStorage::stored_identity(holder)
    }

    pub fn investor_country(holder: &T::AccountId) -> Option<CountryCode> {
        T::IdentityStorage::stored_country(holder)
    }

    pub fn is_verified(holder: &T::AccountId) -> bool {
        Self::check_verified(holder).is_ok()
    }

    /// Eligibility of `holder`, with the reason it fails.
    ///
    /// Required topics are checked in order and the first failing topic
    /// decides the error.
    pub fn check_verified(holder: &T::AccountId) -> Result<(), VerificationError> {
        let identity =
            T::IdentityStorage::stored_identity(holder).ok_or(VerificationError::NotRegistered)?;

        for topic in T::ClaimTrust::required_topics() {
            if let Err(e) = Self::check_topic(identity, topic) {
                log::debug!(
                    target: LOG_TARGET,
                    "Identity {} fails topic {}: {:?}",
                    identity,
                    topic,
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// A topic passes on the first trusted claim with a valid signature.
    /// Otherwise an invalid trusted claim outranks an untrusted one, which
    /// outranks no claim at all.
    fn check_topic(identity: IdentityId, topic: ClaimTopic) -> Result<(), VerificationError> {
        let mut untrusted = false;
        let mut invalid = false;

        for claim in T::Identities::claims_by_topic(identity, topic) {
            if !T::ClaimTrust::is_trusted_issuer_for_topic(claim.issuer, topic) {
                untrusted = true;
                continue;
            }
            if T::Identities::is_claim_valid(
                claim.issuer,
                identity,
                topic,
                claim.scheme,
                &claim.signature,
                &claim.data,
            ) {
                return Ok(());
            }
            invalid = true;
        }

        Err(if invalid {
            VerificationError::InvalidSignature
        } else if untrusted {
            VerificationError::UntrustedIssuer
        } else {
            VerificationError::MissingClaim
        })
    }

    fn ensure_agent(who: &T::AccountId) -> DispatchResult {
        ensure!(T::Permissions::is_agent(ProtectedTarget::IdentityRegistry, who), Error::<T>::Unauthorized);
        Ok(())
    }

    fn do_register(holder: T::AccountId, identity: IdentityId, country: CountryCode) -> DispatchResult {
        ensure!(!Self::contains(&holder), Error::<T>::AlreadyRegistered);
        ensure!(T::Identities::identity_exists(identity), Error::<T>::IdentityNotFound);

        T::IdentityStorage::add_identity(T::ThisRegistry::get(), &holder, identity, country)?;

        Self::deposit_event(Event::IdentityRegistered { holder, identity, country });
        Ok(())
    }
}

impl<T: Config> IdentityRegistryInspect<T::AccountId> for Pallet<T> {
    fn check_verified(holder: &T::AccountId) -> Result<(), VerificationError> {
        Pallet::<T>::check_verified(holder)
    }

    fn identity_of(holder: &T::AccountId) -> Option<IdentityId> {
        Pallet::<T>::identity_of(holder)
    }

    fn country_of(holder: &T::AccountId) -> Option<CountryCode> {
        Pallet::<T>::investor_country(holder)
    }
}
