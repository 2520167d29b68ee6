//! Built-in compliance modules.
//!
//! Each module vetoes transfers on its own; the pallet runs them in the order
//! they were bound and the first veto wins. Modules that keep state update it
//! from the post-transfer hooks.

use clad_primitives::{Balance, CountryCode, IdentityRegistryInspect};
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::{pallet_prelude::ConstU32, BoundedVec};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

use crate::{Config, IdentityBalances, TrackedSupply};

/// Enough for every ISO-3166 country.
pub const MAX_BLOCKED_COUNTRIES: u32 = 250;

/// A compliance rule a token can enforce.
pub trait ComplianceModule<T: Config> {
    fn kind(&self) -> ModuleKind;

    /// Whether the module allows moving `amount` from `from` to `to`. `from`
    /// is `None` for mints.
    fn can_transfer(&self, from: Option<&T::AccountId>, to: &T::AccountId, amount: Balance) -> bool;

    fn transferred(&self, _from: &T::AccountId, _to: &T::AccountId, _amount: Balance) {}

    fn created(&self, _to: &T::AccountId, _amount: Balance) {}

    fn destroyed(&self, _from: &T::AccountId, _amount: Balance) {}
}

#[derive(
    Clone, Copy, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub enum ModuleKind {
    CountryRestrict,
    MaxBalance,
    SupplyLimit,
}

/// A bound module together with its parameters.
#[derive(
    Clone, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub enum ModuleConfig {
    CountryRestrict(CountryRestrict),
    MaxBalance(MaxBalance),
    SupplyLimit(SupplyLimit),
}

impl ModuleConfig {
    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleConfig::CountryRestrict(_) => ModuleKind::CountryRestrict,
            ModuleConfig::MaxBalance(_) => ModuleKind::MaxBalance,
            ModuleConfig::SupplyLimit(_) => ModuleKind::SupplyLimit,
        }
    }

    pub fn as_module<T: Config>(&self) -> &dyn ComplianceModule<T> {
        match self {
            ModuleConfig::CountryRestrict(m) => m,
            ModuleConfig::MaxBalance(m) => m,
            ModuleConfig::SupplyLimit(m) => m,
        }
    }
}

/// Refuses receivers registered in a blocked country.
#[derive(
    Clone, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub struct CountryRestrict {
    pub blocked: BoundedVec<CountryCode, ConstU32<MAX_BLOCKED_COUNTRIES>>,
}

impl<T: Config> ComplianceModule<T> for CountryRestrict {
    fn kind(&self) -> ModuleKind {
        ModuleKind::CountryRestrict
    }

    fn can_transfer(&self, _from: Option<&T::AccountId>, to: &T::AccountId, _amount: Balance) -> bool {
        match T::IdentityRegistry::country_of(to) {
            Some(country) => !self.blocked.contains(&country),
            None => true,
        }
    }
}

/// Caps the balance held by one identity across all of its wallets.
///
/// Balances are tracked per identity from the hooks. Holdings that predate
/// binding the module are seeded with `preset_identity_balance`.
#[derive(
    Clone, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub struct MaxBalance {
    pub limit: Balance,
}

impl<T: Config> ComplianceModule<T> for MaxBalance {
    fn kind(&self) -> ModuleKind {
        ModuleKind::MaxBalance
    }

    fn can_transfer(&self, from: Option<&T::AccountId>, to: &T::AccountId, amount: Balance) -> bool {
        let Some(receiver) = T::IdentityRegistry::identity_of(to) else {
            return false;
        };
        // Moving between wallets of one identity leaves its holdings unchanged
        if from.and_then(T::IdentityRegistry::identity_of) == Some(receiver) {
            return true;
        }
        IdentityBalances::<T>::get(receiver)
            .checked_add(amount)
            .is_some_and(|balance| balance <= self.limit)
    }

    fn transferred(&self, from: &T::AccountId, to: &T::AccountId, amount: Balance) {
        let sender = T::IdentityRegistry::identity_of(from);
        let receiver = T::IdentityRegistry::identity_of(to);
        if sender == receiver {
            return;
        }
        if let Some(sender) = sender {
            IdentityBalances::<T>::mutate(sender, |b| *b = b.saturating_sub(amount));
        }
        if let Some(receiver) = receiver {
            IdentityBalances::<T>::mutate(receiver, |b| *b = b.saturating_add(amount));
        }
    }

    fn created(&self, to: &T::AccountId, amount: Balance) {
        if let Some(receiver) = T::IdentityRegistry::identity_of(to) {
            IdentityBalances::<T>::mutate(receiver, |b| *b = b.saturating_add(amount));
        }
    }

    fn destroyed(&self, from: &T::AccountId, amount: Balance) {
        if let Some(sender) = T::IdentityRegistry::identity_of(from) {
            IdentityBalances::<T>::mutate(sender, |b| *b = b.saturating_sub(amount));
        }
    }
}

/// Caps the supply that may be minted.
#[derive(
    Clone, PartialEq, Eq, Encode, Decode, DecodeWithMemTracking, MaxEncodedLen, TypeInfo, RuntimeDebug,
)]
pub struct SupplyLimit {
    pub limit: Balance,
}

impl<T: Config> ComplianceModule<T> for SupplyLimit {
    fn kind(&self) -> ModuleKind {
        ModuleKind::SupplyLimit
    }

    fn can_transfer(&self, from: Option<&T::AccountId>, _to: &T::AccountId, amount: Balance) -> bool {
        if from.is_some() {
            return true;
        }
        TrackedSupply::<T>::get().checked_add(amount).is_some_and(|supply| supply <= self.limit)
    }

    fn created(&self, _to: &T::AccountId, amount: Balance) {
        TrackedSupply::<T>::mutate(|s| *s = s.saturating_add(amount));
    }

    fn destroyed(&self, _from: &T::AccountId, amount: Balance) {
        TrackedSupply::<T>::mutate(|s| *s = s.saturating_sub(amount));
    }
}
