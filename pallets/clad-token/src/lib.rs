//! # Clad Token
//!
//! Permissioned fungible token. Balances only ever move between verified
//! holders, i.e. accounts the identity registry accepts, and every mint and
//! transfer must pass the compliance engine.
//!
//! Operations are reserved to agents of [`ProtectedTarget::Token`] except for
//! `transfer`, which any holder signs for their own balance, and
//! `set_token_info`, which is reserved to the token owner.
//!
//! ## Freezing
//!
//! A frozen account neither sends nor receives. Partial freezes lock part of a
//! balance: only `balance - frozen_tokens` can be transferred. Agents can still
//! burn or force-transfer locked tokens, which unlocks them as needed.
//!
//! ## Invariants
//!
//! - `TotalSupply` equals the sum of all `Balances`.
//! - `FrozenTokens[a] <= Balances[a]` for every account.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{
    AgentPermissions, Balance, ComplianceHooks, IdentityRegistryInspect, ProtectedTarget,
    VerificationError,
};
use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


pub mod migrations;
pub mod weights;

pub const MAX_NAME_LEN: u32 = 64;
pub const MAX_SYMBOL_LEN: u32 = 16;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(2);

const LOG_TARGET: &str = "pallet-clad-token";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Owner and agents of the token
        type Permissions: AgentPermissions<Self::AccountId>;

        /// Eligibility of holders
        type IdentityRegistry: IdentityRegistryInspect<Self::AccountId>;

        /// Transfer rules, notified after every balance change
        type Compliance: ComplianceHooks<Self::AccountId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Token name (e.g., "Sovereign Bond Token")
    #[pallet::storage]
    #[pallet::getter(fn token_name)]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<MAX_NAME_LEN>>, ValueQuery>;

    /// Token symbol (e.g., "SBT")
    #[pallet::storage]
    #[pallet::getter(fn token_symbol)]
    pub type TokenSymbol<T> =
        StorageValue<_, BoundedVec<u8, ConstU32<MAX_SYMBOL_LEN>>, ValueQuery>;

    /// Token decimals, fixed at genesis
    #[pallet::storage]
    #[pallet::getter(fn decimals)]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, Balance, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, Balance, ValueQuery>;

    /// Frozen accounts (cannot send or receive)
    #[pallet::storage]
    #[pallet::getter(fn is_frozen)]
    pub type Frozen<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Locked part of each balance
    #[pallet::storage]
    #[pallet::getter(fn frozen_tokens)]
    pub type FrozenTokens<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, Balance, ValueQuery>;

    /// While set, mints and transfers are refused
    #[pallet::storage]
    #[pallet::getter(fn is_paused)]
    pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Tokens transferred from one account to another
        Transferred { from: T::AccountId, to: T::AccountId, amount: Balance },
        /// Tokens moved by an agent without the holder's signature
        ForcedTransferred { from: T::AccountId, to: T::AccountId, amount: Balance },
        /// New tokens minted
        Minted { to: T::AccountId, amount: Balance },
        Burned { from: T::AccountId, amount: Balance },
        /// Account frozen (cannot send or receive)
        Frozen { account: T::AccountId },
        /// Account unfrozen
        Unfrozen { account: T::AccountId },
        TokensFrozen { account: T::AccountId, amount: Balance },
        TokensUnfrozen { account: T::AccountId, amount: Balance },
        Paused { by: T::AccountId },
        Unpaused { by: T::AccountId },
        TokenInfoUpdated { name: Vec<u8>, symbol: Vec<u8> },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller lacks the required role on the token.
        Unauthorized,
        Paused,
        NotPaused,
        AlreadyPaused,
        /// Holder has no identity record.
        NotRegistered,
        /// Holder lacks a claim for a required topic.
        NotVerified,
        /// Holder's claims for a required topic come only from untrusted issuers.
        UntrustedIssuer,
        /// A trusted issuer's claim no longer validates.
        InvalidSignature,
        /// A compliance module vetoed the operation.
        ComplianceRejected,
        InsufficientBalance,
        AccountFrozen,
        Overflow,
        /// Partial freeze larger than the balance, or unfreeze larger than
        /// the locked amount.
        FrozenAmountExceeded,
        NameTooLong,
        SymbolTooLong,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(origin: OriginFor<T>, to: T::AccountId, amount: Balance) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            ensure!(!Paused::<T>::get(), Error::<T>::Paused);
            Self::ensure_verified(&to)?;
            ensure!(T::Compliance::can_transfer(None, &to, amount), Error::<T>::ComplianceRejected);

            let supply = TotalSupply::<T>::get().checked_add(amount).ok_or(Error::<T>::Overflow)?;
            let balance = Balances::<T>::get(&to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
            TotalSupply::<T>::put(supply);
            Balances::<T>::insert(&to, balance);

            T::Compliance::created(&to, amount);
            Self::deposit_event(Event::Minted { to, amount });
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: Balance) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            ensure!(!Paused::<T>::get(), Error::<T>::Paused);
            ensure!(!Frozen::<T>::get(&sender), Error::<T>::AccountFrozen);
            ensure!(!Frozen::<T>::get(&to), Error::<T>::AccountFrozen);
            ensure!(Self::free_balance(&sender) >= amount, Error::<T>::InsufficientBalance);
            Self::ensure_verified(&sender)?;
            Self::ensure_verified(&to)?;
            ensure!(
                T::Compliance::can_transfer(Some(&sender), &to, amount),
                Error::<T>::ComplianceRejected
            );

            Self::move_balance(&sender, &to, amount)?;

            T::Compliance::transferred(&sender, &to, amount);
            Self::deposit_event(Event::Transferred { from: sender, to, amount });
            Ok(())
        }

        /// Destroy `amount` of `from`'s tokens, unlocking frozen tokens if the
        /// free balance does not cover it. Allowed while paused.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::burn())]
        pub fn burn(origin: OriginFor<T>, from: T::AccountId, amount: Balance) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            let balance = Balances::<T>::get(&from);
            ensure!(balance >= amount, Error::<T>::InsufficientBalance);

            Self::release_frozen(&from, amount);
            Balances::<T>::insert(&from, balance - amount);
            TotalSupply::<T>::mutate(|supply| *supply = supply.saturating_sub(amount));

            T::Compliance::destroyed(&from, amount);
            Self::deposit_event(Event::Burned { from, amount });
            Ok(())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::pause())]
        pub fn pause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            ensure!(!Paused::<T>::get(), Error::<T>::AlreadyPaused);

            Paused::<T>::put(true);
            log::info!(target: LOG_TARGET, "Token paused");
            Self::deposit_event(Event::Paused { by: who });
            Ok(())
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::unpause())]
        pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            ensure!(Paused::<T>::get(), Error::<T>::NotPaused);

            Paused::<T>::put(false);
            log::info!(target: LOG_TARGET, "Token unpaused");
            Self::deposit_event(Event::Unpaused { by: who });
            Ok(())
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::freeze())]
        pub fn freeze(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            Frozen::<T>::insert(&account, true);
            Self::deposit_event(Event::Frozen { account });
            Ok(())
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::unfreeze())]
        pub fn unfreeze(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            Frozen::<T>::remove(&account);
            Self::deposit_event(Event::Unfrozen { account });
            Ok(())
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::freeze_partial_tokens())]
        pub fn freeze_partial_tokens(
            origin: OriginFor<T>,
            account: T::AccountId,
            amount: Balance,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;

            let frozen = FrozenTokens::<T>::get(&account)
                .checked_add(amount)
                .ok_or(Error::<T>::Overflow)?;
            ensure!(frozen <= Balances::<T>::get(&account), Error::<T>::FrozenAmountExceeded);
            Self::set_frozen_tokens(&account, frozen);

            Self::deposit_event(Event::TokensFrozen { account, amount });
            Ok(())
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::unfreeze_partial_tokens())]
        pub fn unfreeze_partial_tokens(
            origin: OriginFor<T>,
            account: T::AccountId,
            amount: Balance,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;

            let frozen = FrozenTokens::<T>::get(&account);
            ensure!(amount <= frozen, Error::<T>::FrozenAmountExceeded);
            Self::set_frozen_tokens(&account, frozen - amount);

            Self::deposit_event(Event::TokensUnfrozen { account, amount });
            Ok(())
        }

        /// Move tokens out of `from` without its signature, e.g. for recovery
        /// or a court order. Pause, freezes and compliance vetoes do not
        /// apply, but the receiver must be verified.
        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::forced_transfer())]
        pub fn forced_transfer(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: Balance,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_agent(&who)?;
            ensure!(Balances::<T>::get(&from) >= amount, Error::<T>::InsufficientBalance);
            Self::ensure_verified(&to)?;

            // Nothing leaves the account on a self transfer, so its locks stay
            if from != to {
                Self::release_frozen(&from, amount);
                Self::move_balance(&from, &to, amount)?;
            }

            log::info!(target: LOG_TARGET, "Forced transfer of {} by agent", amount);
            T::Compliance::transferred(&from, &to, amount);
            Self::deposit_event(Event::ForcedTransferred { from, to, amount });
            Ok(())
        }

        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::set_token_info())]
        pub fn set_token_info(
            origin: OriginFor<T>,
            name: Vec<u8>,
            symbol: Vec<u8>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(T::Permissions::is_owner(ProtectedTarget::Token, &who), Error::<T>::Unauthorized);

            let bounded_name: BoundedVec<u8, ConstU32<MAX_NAME_LEN>> =
                name.clone().try_into().map_err(|_| Error::<T>::NameTooLong)?;
            let bounded_symbol: BoundedVec<u8, ConstU32<MAX_SYMBOL_LEN>> =
                symbol.clone().try_into().map_err(|_| Error::<T>::SymbolTooLong)?;
            TokenName::<T>::put(bounded_name);
            TokenSymbol::<T>::put(bounded_symbol);

            Self::deposit_event(Event::TokenInfoUpdated { name, symbol });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Token name
        pub token_name: Vec<u8>,
        /// Token symbol
        pub token_symbol: Vec<u8>,
        /// Token decimals
        pub decimals: u8,
        /// Start paused
        pub paused: bool,
        /// Initial token mints (account, amount), not subject to verification
        pub initial_balances: Vec<(T::AccountId, Balance)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let name: BoundedVec<u8, ConstU32<MAX_NAME_LEN>> =
                self.token_name.clone().try_into().expect("Token name too long (max 64 bytes)");
            TokenName::<T>::put(name);

            let symbol: BoundedVec<u8, ConstU32<MAX_SYMBOL_LEN>> =
                self.token_symbol.clone().try_into().expect("Token symbol too long (max 16 bytes)");
            TokenSymbol::<T>::put(symbol);

            Decimals::<T>::put(self.decimals);
            Paused::<T>::put(self.paused);

            let mut total: Balance = 0;
            for (account, amount) in &self.initial_balances {
                Balances::<T>::mutate(account, |balance| *balance = balance.saturating_add(*amount));
                total = total.checked_add(*amount).expect("Initial balances overflow total supply");
            }
            TotalSupply::<T>::put(total);
        }
    }
}

impl<T: Config> From<VerificationError> for Error<T> {
    fn from(error: VerificationError) -> Self {
        match error {
            VerificationError::NotRegistered => Error::<T>::NotRegistered,
            VerificationError::MissingClaim => Error::<T>::NotVerified,
            VerificationError::UntrustedIssuer => Error::<T>::UntrustedIssuer,
            VerificationError::InvalidSignature => Error::<T>::InvalidSignature,
        }
    }
}

impl<T: Config> Pallet<T> {
    /// Part of the balance not locked by a partial freeze.
    pub fn free_balance(who: &T::AccountId) -> Balance {
        Balances::<T>::get(who).saturating_sub(FrozenTokens::<T>::get(who))
    }

    fn ensure_agent(who: &T::AccountId) -> DispatchResult {
        ensure!(T::Permissions::is_agent(ProtectedTarget::Token, who), Error::<T>::Unauthorized);
        Ok(())
    }

    fn ensure_verified(holder: &T::AccountId) -> DispatchResult {
        T::IdentityRegistry::check_verified(holder).map_err(Error::<T>::from)?;
        Ok(())
    }

    fn move_balance(from: &T::AccountId, to: &T::AccountId, amount: Balance) -> DispatchResult {
        if from == to {
            return Ok(());
        }
        let from_balance =
            Balances::<T>::get(from).checked_sub(amount).ok_or(Error::<T>::InsufficientBalance)?;
        let to_balance = Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
        Balances::<T>::insert(from, from_balance);
        Balances::<T>::insert(to, to_balance);
        Ok(())
    }

    /// Unlock just enough of `who`'s frozen tokens for `amount` to leave the
    /// account.
    fn release_frozen(who: &T::AccountId, amount: Balance) {
        let free = Self::free_balance(who);
        if amount <= free {
            return;
        }
        let frozen = FrozenTokens::<T>::get(who);
        let released = (amount - free).min(frozen);
        Self::set_frozen_tokens(who, frozen - released);
        Self::deposit_event(Event::TokensUnfrozen { account: who.clone(), amount: released });
    }

    fn set_frozen_tokens(who: &T::AccountId, amount: Balance) {
        if amount == 0 {
            FrozenTokens::<T>::remove(who);
        } else {
            FrozenTokens::<T>::insert(who, amount);
        }
    }

    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), DispatchError> {
        let mut sum: Balance = 0;
        for (account, balance) in Balances::<T>::iter() {
            sum = sum.checked_add(balance).ok_or(DispatchError::Other("Balances overflow"))?;
            ensure!(
                FrozenTokens::<T>::get(&account) <= balance,
                DispatchError::Other("Frozen tokens exceed balance")
            );
        }
        ensure!(
            sum == TotalSupply::<T>::get(),
            DispatchError::Other("Total supply differs from the sum of balances")
        );
        for (account, _) in FrozenTokens::<T>::iter() {
            ensure!(
                Balances::<T>::contains_key(&account),
                DispatchError::Other("Frozen tokens on an empty account")
            );
        }
        Ok(())
    }
}
