//! # Compliance
//!
//! Transfer rules for the Clad token. The token asks [`ComplianceHooks::can_transfer`]
//! before every mint and transfer and reports the committed movement through
//! the `transferred`, `created` and `destroyed` hooks.
//!
//! Rules are [`modules`] bound by `AdminOrigin`, at most one of each kind.
//! With nothing bound every transfer is allowed; otherwise the bound modules
//! are asked in binding order and the first veto rejects the transfer.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{Balance, ComplianceHooks, IdentityId, IdentityRegistryInspect};
use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*, traits::EnsureOrigin};
use frame_system::pallet_prelude::*;
use sp_std::prelude::*;

pub use modules::{
    ComplianceModule, CountryRestrict, MaxBalance, ModuleConfig, ModuleKind, SupplyLimit,
};
pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


pub mod modules;
pub mod weights;

const LOG_TARGET: &str = "pallet-compliance";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// Countries and identities of holders
        type IdentityRegistry: IdentityRegistryInspect<Self::AccountId>;

        #[pallet::constant]
        type MaxModules: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Bound modules in evaluation order
    #[pallet::storage]
    pub type Modules<T: Config> = StorageValue<_, BoundedVec<ModuleConfig, T::MaxModules>, ValueQuery>;

    /// Holdings per identity, maintained while `MaxBalance` is bound
    #[pallet::storage]
    pub type IdentityBalances<T> = StorageMap<_, Blake2_128Concat, IdentityId, Balance, ValueQuery>;

    /// Minted minus burned, maintained while `SupplyLimit` is bound
    #[pallet::storage]
    pub type TrackedSupply<T> = StorageValue<_, Balance, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        ModuleBound { kind: ModuleKind },
        ModuleUnbound { kind: ModuleKind },
        IdentityBalancePreset { identity: IdentityId, balance: Balance },
        TrackedSupplyPreset { supply: Balance },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// A module of this kind is already bound.
        ModuleAlreadyBound,
        ModuleNotBound,
        TooManyModules,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Append a module. It is consulted from the next transfer on.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::bind_module())]
        pub fn bind_module(origin: OriginFor<T>, module: ModuleConfig) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            let kind = module.kind();

            Modules::<T>::try_mutate(|modules| -> DispatchResult {
                ensure!(!modules.iter().any(|m| m.kind() == kind), Error::<T>::ModuleAlreadyBound);
                modules.try_push(module).map_err(|_| Error::<T>::TooManyModules)?;
                Ok(())
            })?;

            Self::deposit_event(Event::ModuleBound { kind });
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::unbind_module())]
        pub fn unbind_module(origin: OriginFor<T>, kind: ModuleKind) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            Modules::<T>::try_mutate(|modules| -> DispatchResult {
                let pos = modules
                    .iter()
                    .position(|m| m.kind() == kind)
                    .ok_or(Error::<T>::ModuleNotBound)?;
                modules.remove(pos);
                Ok(())
            })?;

            Self::deposit_event(Event::ModuleUnbound { kind });
            Ok(())
        }

        /// Seed the tracked holdings of `identity`, for balances that existed
        /// before `MaxBalance` was bound.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::preset_identity_balance())]
        pub fn preset_identity_balance(
            origin: OriginFor<T>,
            identity: IdentityId,
            balance: Balance,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            IdentityBalances::<T>::insert(identity, balance);
            Self::deposit_event(Event::IdentityBalancePreset { identity, balance });
            Ok(())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::preset_tracked_supply())]
        pub fn preset_tracked_supply(origin: OriginFor<T>, supply: Balance) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            TrackedSupply::<T>::put(supply);
            Self::deposit_event(Event::TrackedSupplyPreset { supply });
            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn bound_modules() -> Vec<ModuleKind> {
        Modules::<T>::get().iter().map(ModuleConfig::kind).collect()
    }

    pub fn is_module_bound(kind: ModuleKind) -> bool {
        Modules::<T>::get().iter().any(|m| m.kind() == kind)
    }
}

impl<T: Config> ComplianceHooks<T::AccountId> for Pallet<T> {
    fn can_transfer(from: Option<&T::AccountId>, to: &T::AccountId, amount: Balance) -> bool {
        for config in Modules::<T>::get().iter() {
            let module = config.as_module::<T>();
            if !module.can_transfer(from, to, amount) {
                log::debug!(target: LOG_TARGET, "Transfer vetoed by {:?}", module.kind());
                return false;
            }
        }
        true
    }

    fn transferred(from: &T::AccountId, to: &T::AccountId, amount: Balance) {
        for config in Modules::<T>::get().iter() {
            config.as_module::<T>().transferred(from, to, amount);
        }
    }

    fn created(to: &T::AccountId, amount: Balance) {
        for config in Modules::<T>::get().iter() {
            config.as_module::<T>().created(to, amount);
        }
    }

    fn destroyed(from: &T::AccountId, amount: Balance) {
        for config in Modules::<T>::get().iter() {
            config.as_module::<T>().destroyed(from, amount);
        }
    }
}
