//! Storage migrations for pallet-clad-token.
//!
//! Each migration checks the on-chain storage version first, so running it on
//! an already migrated chain only costs the version read. Wire them into the
//! runtime's `Executive` in order:
//!
//! ```ignore
//! pub type Executive = frame_executive::Executive<
//!     Runtime,
//!     Block,
//!     frame_system::ChainContext<Runtime>,
//!     Runtime,
//!     AllPalletsWithSystem,
//!     (pallet_clad_token::migrations::v2::MigrateToV2<Runtime>,),
//! >;
//! ```

use frame_support::{
    pallet_prelude::*,
    storage::{storage_prefix, unhashed},
    traits::{OnRuntimeUpgrade, PalletInfoAccess},
};
use sp_std::marker::PhantomData;

use crate::{Config, Pallet, LOG_TARGET};

/// Version 2 replaces the admin-maintained whitelist with identity
/// verification.
///
/// Eligibility now comes from the identity registry, so the `Whitelist` map
/// of version 1 is dead storage and gets cleared. Balances, freezes and
/// metadata keep their layout; `Paused` and `FrozenTokens` start empty.
pub mod v2 {
    use super::*;

    /// Upper bound on whitelist entries cleared in one upgrade.
    pub const MAX_CLEARED: u32 = 10_000;

    pub fn whitelist_prefix<T: Config>() -> [u8; 32] {
        storage_prefix(<Pallet<T> as PalletInfoAccess>::name().as_bytes(), b"Whitelist")
    }

    pub struct MigrateToV2<T>(PhantomData<T>);

    impl<T: Config> OnRuntimeUpgrade for MigrateToV2<T> {
        fn on_runtime_upgrade() -> Weight {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();

            if on_chain_version < 2 {
                let result =
                    unhashed::clear_prefix(&whitelist_prefix::<T>(), Some(MAX_CLEARED), None);
                if result.maybe_cursor.is_some() {
                    log::warn!(
                        target: LOG_TARGET,
                        "Whitelist not fully cleared, {} entries removed",
                        result.unique
                    );
                }

                StorageVersion::new(2).put::<Pallet<T>>();
                log::info!(
                    target: LOG_TARGET,
                    "Migrated storage from {:?} to v2, {} whitelist entries removed",
                    on_chain_version,
                    result.unique
                );

                let removed = result.unique as u64;
                T::DbWeight::get().reads_writes(1 + removed, 1 + removed)
            } else {
                log::info!(
                    target: LOG_TARGET,
                    "Storage already at {:?}, skipping v2 migration",
                    on_chain_version
                );
                T::DbWeight::get().reads(1)
            }
        }

        #[cfg(feature = "try-runtime")]
        fn pre_upgrade() -> Result<sp_std::vec::Vec<u8>, sp_runtime::TryRuntimeError> {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();
            log::info!(
                target: LOG_TARGET,
                "Pre-upgrade: on-chain storage version is {:?}",
                on_chain_version
            );
            Ok(on_chain_version.encode())
        }

        #[cfg(feature = "try-runtime")]
        fn post_upgrade(state: sp_std::vec::Vec<u8>) -> Result<(), sp_runtime::TryRuntimeError> {
            let pre_version: u16 = Decode::decode(&mut &state[..])
                .map_err(|_| sp_runtime::TryRuntimeError::Other("Failed to decode pre-state"))?;
            let post_version = Pallet::<T>::on_chain_storage_version();

            if pre_version < 2 {
                ensure!(
                    post_version >= 2,
                    sp_runtime::TryRuntimeError::Other("Migration to v2 did not complete")
                );
                ensure!(
                    !unhashed::contains_prefixed_key(&whitelist_prefix::<T>()),
                    sp_runtime::TryRuntimeError::Other("Whitelist entries left after v2")
                );
            }
            Pallet::<T>::do_try_state()
        }
    }
}
