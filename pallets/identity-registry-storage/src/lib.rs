//! # Identity Registry Storage
//!
//! Holder records (`holder → identity, country`) kept apart from the registry
//! logic so a registry can be replaced without migrating holders.
//!
//! Exactly one registry is bound at a time. Writes through
//! [`IdentityStorage`] name the registry performing them and fail with
//! [`Error::RegistryNotBound`] unless it is the bound one. Binding a new
//! registry silently revokes the previous one.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{
    AgentPermissions, CountryCode, IdentityId, IdentityRecord, IdentityStorage, ProtectedTarget,
    RegistryId,
};
use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


pub mod weights;

const LOG_TARGET: &str = "pallet-identity-registry-storage";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Owners and agents of `IdentityRegistryStorage` manage the binding
        type Permissions: AgentPermissions<Self::AccountId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::storage]
    pub type StoredIdentities<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, IdentityRecord, OptionQuery>;

    /// The only registry allowed to write
    #[pallet::storage]
    pub type BoundRegistry<T> = StorageValue<_, RegistryId, OptionQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        IdentityRegistryBound { registry: RegistryId, previous: Option<RegistryId> },
        IdentityRegistryUnbound { registry: RegistryId },
        IdentityStored { holder: T::AccountId, identity: IdentityId, country: CountryCode },
        IdentityUnstored { holder: T::AccountId, identity: IdentityId },
        IdentityModified { holder: T::AccountId, previous: IdentityId, identity: IdentityId },
        CountryModified { holder: T::AccountId, country: CountryCode },
    }

    #[pallet::error]
    pub enum Error<T> {
        Unauthorized,
        /// The writing registry is not the bound one.
        RegistryNotBound,
        /// No registry is bound.
        NotBound,
        AlreadyStored,
        NotStored,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Make `registry` the single writer, replacing any previous binding.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::bind_identity_registry())]
        pub fn bind_identity_registry(origin: OriginFor<T>, registry: RegistryId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_manager(&who)?;

            let previous = BoundRegistry::<T>::get();
            BoundRegistry::<T>::put(registry);

            if let Some(previous) = previous.filter(|p| *p != registry) {
                log::info!(
                    target: LOG_TARGET,
                    "Registry {:?} replaced by {:?}",
                    previous,
                    registry
                );
            }
            Self::deposit_event(Event::IdentityRegistryBound { registry, previous });
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::unbind_identity_registry())]
        pub fn unbind_identity_registry(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_manager(&who)?;

            let registry = BoundRegistry::<T>::take().ok_or(Error::<T>::NotBound)?;

            Self::deposit_event(Event::IdentityRegistryUnbound { registry });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Registry bound at genesis
        pub bound_registry: Option<RegistryId>,
        #[serde(skip)]
        pub _config: sp_std::marker::PhantomData<T>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            if let Some(registry) = self.bound_registry {
                BoundRegistry::<T>::put(registry);
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn bound_registry() -> Option<RegistryId> {
        BoundRegistry::<T>::get()
    }

    fn ensure_manager(who: &T::AccountId) -> DispatchResult {
        ensure!(
            T::Permissions::is_owner_or_agent(ProtectedTarget::IdentityRegistryStorage, who),
            Error::<T>::Unauthorized
        );
        Ok(())
    }

    fn ensure_bound(registry: RegistryId) -> DispatchResult {
        ensure!(BoundRegistry::<T>::get() == Some(registry), Error::<T>::RegistryNotBound);
        Ok(())
    }
}

impl<T: Config> IdentityStorage<T::AccountId> for Pallet<T> {
    fn stored_record(holder: &T::AccountId) -> Option<IdentityRecord> {
        StoredIdentities::<T>::get(holder)
    }

    fn add_identity(
        registry: RegistryId,
        holder: &T::AccountId,
        identity: IdentityId,
        country: CountryCode,
    ) -> DispatchResult {
        Self::ensure_bound(registry)?;
        ensure!(!StoredIdentities::<T>::contains_key(holder), Error::<T>::AlreadyStored);

        StoredIdentities::<T>::insert(holder, IdentityRecord { identity, country });
        Self::deposit_event(Event::IdentityStored { holder: holder.clone(), identity, country });
        Ok(())
    }

    fn modify_identity(
        registry: RegistryId,
        holder: &T::AccountId,
        identity: IdentityId,
    ) -> DispatchResult {
        Self::ensure_bound(registry)?;
        let previous = StoredIdentities::<T>::try_mutate(holder, |record| {
            let record = record.as_mut().ok_or(Error::<T>::NotStored)?;
            Ok::<_, Error<T>>(core::mem::replace(&mut record.identity, identity))
        })?;

        Self::deposit_event(Event::IdentityModified { holder: holder.clone(), previous, identity });
        Ok(())
    }

    fn modify_country(
        registry: RegistryId,
        holder: &T::AccountId,
        country: CountryCode,
    ) -> DispatchResult {
        Self::ensure_bound(registry)?;
        StoredIdentities::<T>::try_mutate(holder, |record| {
            let record = record.as_mut().ok_or(Error::<T>::NotStored)?;
            record.country = country;
            Ok::<_, Error<T>>(())
        })?;

        Self::deposit_event(Event::CountryModified { holder: holder.clone(), country });
        Ok(())
    }

    fn remove_identity(registry: RegistryId, holder: &T::AccountId) -> DispatchResult {
        Self::ensure_bound(registry)?;
        let record = StoredIdentities::<T>::take(holder).ok_or(Error::<T>::NotStored)?;

        Self::deposit_event(Event::IdentityUnstored {
            holder: holder.clone(),
            identity: record.identity,
        });
        Ok(())
    }
}
