//! # Agent Manager
//!
//! Permission table for the pallets whose privileged calls are reserved to
//! agents (see [`ProtectedTarget`]). Three roles exist per target:
//!
//! - **Owner**: one account per target, installed at genesis or by
//!   `AdminOrigin`, handed over with `transfer_ownership`.
//! - **AgentAdmin**: granted and revoked by the owner.
//! - **Agent**: granted and revoked by the owner or an agent admin.
//!
//! A role only ever manages strictly weaker roles ([`Role::can_grant`]).
//!
//! Ownership is not fixed at deployment. The current owner may hand it over
//! and `AdminOrigin` may replace it for bootstrap or recovery, but no admin or
//! agent, delegated or direct, can ever change it.
//!
//! ## Delegation
//!
//! The pallet has its own account ([`Pallet::account_id`]). When the owner of
//! a target makes that account an agent of the target, every agent of
//! [`ProtectedTarget::AgentManager`] becomes an agent of the target too.
//! Removing the single manager entry withdraws all of them at once.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{AgentPermissions, ProtectedTarget, Role};
use frame_support::{
    dispatch::DispatchResult, ensure, pallet_prelude::*, traits::EnsureOrigin, PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_runtime::traits::AccountIdConversion;
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


pub mod weights;

const LOG_TARGET: &str = "pallet-agent-manager";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Origin allowed to install a target owner outside the role hierarchy.
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// Seed of the account the manager holds agent entries under.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Owner of each protected target
    #[pallet::storage]
    pub type Owners<T: Config> =
        StorageMap<_, Blake2_128Concat, ProtectedTarget, T::AccountId, OptionQuery>;

    /// Agent admins per target
    #[pallet::storage]
    pub type AgentAdmins<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        ProtectedTarget,
        Blake2_128Concat,
        T::AccountId,
        bool,
        ValueQuery,
    >;

    /// Agents per target (direct grants only)
    #[pallet::storage]
    pub type Agents<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        ProtectedTarget,
        Blake2_128Concat,
        T::AccountId,
        bool,
        ValueQuery,
    >;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        AgentAdminAdded { target: ProtectedTarget, who: T::AccountId, by: T::AccountId },
        AgentAdminRemoved { target: ProtectedTarget, who: T::AccountId, by: T::AccountId },
        AgentAdded { target: ProtectedTarget, who: T::AccountId, by: T::AccountId },
        AgentRemoved { target: ProtectedTarget, who: T::AccountId, by: T::AccountId },
        OwnershipTransferred {
            target: ProtectedTarget,
            previous: Option<T::AccountId>,
            owner: T::AccountId,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller does not hold a role strong enough for the operation.
        Unauthorized,
        AlreadyAgentAdmin,
        NotAgentAdmin,
        AlreadyAgent,
        NotAgent,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::add_agent_admin())]
        pub fn add_agent_admin(
            origin: OriginFor<T>,
            target: ProtectedTarget,
            who: T::AccountId,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_can_grant(target, &caller, Role::AgentAdmin)?;
            ensure!(!AgentAdmins::<T>::get(target, &who), Error::<T>::AlreadyAgentAdmin);

            AgentAdmins::<T>::insert(target, &who, true);
            Self::deposit_event(Event::AgentAdminAdded { target, who, by: caller });
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::remove_agent_admin())]
        pub fn remove_agent_admin(
            origin: OriginFor<T>,
            target: ProtectedTarget,
            who: T::AccountId,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_can_grant(target, &caller, Role::AgentAdmin)?;
            ensure!(AgentAdmins::<T>::get(target, &who), Error::<T>::NotAgentAdmin);

            AgentAdmins::<T>::remove(target, &who);
            Self::deposit_event(Event::AgentAdminRemoved { target, who, by: caller });
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::add_agent())]
        pub fn add_agent(
            origin: OriginFor<T>,
            target: ProtectedTarget,
            who: T::AccountId,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_can_grant(target, &caller, Role::Agent)?;
            ensure!(!Agents::<T>::get(target, &who), Error::<T>::AlreadyAgent);

            Agents::<T>::insert(target, &who, true);
            Self::deposit_event(Event::AgentAdded { target, who, by: caller });
            Ok(())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::remove_agent())]
        pub fn remove_agent(
            origin: OriginFor<T>,
            target: ProtectedTarget,
            who: T::AccountId,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::ensure_can_grant(target, &caller, Role::Agent)?;
            ensure!(Agents::<T>::get(target, &who), Error::<T>::NotAgent);

            Agents::<T>::remove(target, &who);
            Self::deposit_event(Event::AgentRemoved { target, who, by: caller });
            Ok(())
        }

        /// Hand `target` over to `owner`. The caller keeps no role on it.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::transfer_ownership())]
        pub fn transfer_ownership(
            origin: OriginFor<T>,
            target: ProtectedTarget,
            owner: T::AccountId,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            ensure!(Self::is_owner(target, &caller), Error::<T>::Unauthorized);

            Owners::<T>::insert(target, &owner);
            Self::deposit_event(Event::OwnershipTransferred {
                target,
                previous: Some(caller),
                owner,
            });
            Ok(())
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::force_set_owner())]
        pub fn force_set_owner(
            origin: OriginFor<T>,
            target: ProtectedTarget,
            owner: T::AccountId,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            let previous = Owners::<T>::get(target);

            log::info!(target: LOG_TARGET, "Owner of {:?} forcibly replaced", target);

            Owners::<T>::insert(target, &owner);
            Self::deposit_event(Event::OwnershipTransferred { target, previous, owner });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Owner of each protected target
        pub owners: Vec<(ProtectedTarget, T::AccountId)>,
        /// Agent admins granted at genesis
        pub agent_admins: Vec<(ProtectedTarget, T::AccountId)>,
        /// Agents granted at genesis
        pub agents: Vec<(ProtectedTarget, T::AccountId)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            for (target, owner) in &self.owners {
                Owners::<T>::insert(target, owner);
            }
            for (target, who) in &self.agent_admins {
                AgentAdmins::<T>::insert(target, who, true);
            }
            for (target, who) in &self.agents {
                Agents::<T>::insert(target, who, true);
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    /// Account the manager holds agent entries under.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    pub fn owner(target: ProtectedTarget) -> Option<T::AccountId> {
        Owners::<T>::get(target)
    }

    /// Strongest role `who` holds over `target`, delegation included.
    pub fn authority_of(target: ProtectedTarget, who: &T::AccountId) -> Option<Role> {
        if Self::is_owner(target, who) {
            Some(Role::Owner)
        } else if AgentAdmins::<T>::get(target, who) {
            Some(Role::AgentAdmin)
        } else if Self::is_agent(target, who) {
            Some(Role::Agent)
        } else {
            None
        }
    }

    /// Whether `who` is an agent of `target` only through the manager.
    pub fn is_delegated_agent(target: ProtectedTarget, who: &T::AccountId) -> bool {
        target != ProtectedTarget::AgentManager &&
            Agents::<T>::get(target, Self::account_id()) &&
            Agents::<T>::get(ProtectedTarget::AgentManager, who)
    }

    fn ensure_can_grant(
        target: ProtectedTarget,
        caller: &T::AccountId,
        role: Role,
    ) -> DispatchResult {
        let authority = Self::authority_of(target, caller).ok_or(Error::<T>::Unauthorized)?;
        ensure!(authority.can_grant(role), Error::<T>::Unauthorized);
        Ok(())
    }
}

impl<T: Config> AgentPermissions<T::AccountId> for Pallet<T> {
    fn is_owner(target: ProtectedTarget, who: &T::AccountId) -> bool {
        Owners::<T>::get(target).as_ref() == Some(who)
    }

    fn is_agent(target: ProtectedTarget, who: &T::AccountId) -> bool {
        Agents::<T>::get(target, who) || Self::is_delegated_agent(target, who)
    }
}
