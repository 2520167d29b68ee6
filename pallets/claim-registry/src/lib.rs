//! # Claim Registry
//!
//! Holds the two lists an identity is verified against:
//!
//! - the claim topics every holder must carry a claim for, and
//! - the issuers trusted to sign claims, each for a fixed set of topics.
//!
//! Both lists are maintained by `AdminOrigin` and read by the identity
//! registry through [`ClaimTrustInspect`]. Changes take effect on the next
//! verification; nothing is cached downstream.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use clad_primitives::{ClaimTopic, ClaimTrustInspect, IdentityId};
use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*, traits::EnsureOrigin};
use frame_system::pallet_prelude::*;
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;



pub mod weights;

const LOG_TARGET: &str = "pallet-claim-registry";

/// Topics one issuer is trusted for, sorted and without duplicates.
pub type IssuerTopics<T> = BoundedVec<ClaimTopic, <T as Config>::MaxTopicsPerIssuer>;

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Origin that maintains required topics and trusted issuers
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        #[pallet::constant]
        type MaxClaimTopics: Get<u32>;

        #[pallet::constant]
        type MaxTopicsPerIssuer: Get<u32>;

        #[pallet::constant]
        type MaxTrustedIssuers: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Required claim topics, ascending
    #[pallet::storage]
    #[pallet::getter(fn claim_topics)]
    pub type ClaimTopics<T: Config> =
        StorageValue<_, BoundedVec<ClaimTopic, T::MaxClaimTopics>, ValueQuery>;

    #[pallet::storage]
    pub type TrustedIssuers<T: Config> =
        StorageMap<_, Blake2_128Concat, IdentityId, IssuerTopics<T>, OptionQuery>;

    #[pallet::storage]
    pub type TrustedIssuerCount<T> = StorageValue<_, u32, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        ClaimTopicAdded { topic: ClaimTopic },
        ClaimTopicRemoved { topic: ClaimTopic },
        TrustedIssuerAdded { issuer: IdentityId, topics: IssuerTopics<T> },
        TrustedIssuerRemoved { issuer: IdentityId },
        ClaimTopicsUpdated { issuer: IdentityId, topics: IssuerTopics<T> },
    }

    #[pallet::error]
    pub enum Error<T> {
        TooManyClaimTopics,
        IssuerAlreadyTrusted,
        IssuerNotTrusted,
        /// An issuer must be trusted for at least one topic.
        EmptyClaimTopics,
        TooManyTopics,
        TooManyTrustedIssuers,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Require holders to carry a claim for `topic`. Adding a topic that is
        /// already required changes nothing.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::add_claim_topic())]
        pub fn add_claim_topic(origin: OriginFor<T>, topic: ClaimTopic) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            let added = ClaimTopics::<T>::try_mutate(|topics| -> Result<bool, DispatchError> {
                match topics.binary_search(&topic) {
                    Ok(_) => Ok(false),
                    Err(pos) => {
                        topics.try_insert(pos, topic).map_err(|_| Error::<T>::TooManyClaimTopics)?;
                        Ok(true)
                    },
                }
            })?;

            if added {
                Self::deposit_event(Event::ClaimTopicAdded { topic });
            }
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::remove_claim_topic())]
        pub fn remove_claim_topic(origin: OriginFor<T>, topic: ClaimTopic) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            let removed = ClaimTopics::<T>::mutate(|topics| match topics.binary_search(&topic) {
                Ok(pos) => {
                    topics.remove(pos);
                    true
                },
                Err(_) => false,
            });

            if removed {
                Self::deposit_event(Event::ClaimTopicRemoved { topic });
            }
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::add_trusted_issuer())]
        pub fn add_trusted_issuer(
            origin: OriginFor<T>,
            issuer: IdentityId,
            topics: Vec<ClaimTopic>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            ensure!(!TrustedIssuers::<T>::contains_key(issuer), Error::<T>::IssuerAlreadyTrusted);

            let topics = Self::normalize_topics(topics)?;
            let count = TrustedIssuerCount::<T>::get();
            ensure!(count < T::MaxTrustedIssuers::get(), Error::<T>::TooManyTrustedIssuers);

            TrustedIssuers::<T>::insert(issuer, &topics);
            TrustedIssuerCount::<T>::put(count + 1);

            Self::deposit_event(Event::TrustedIssuerAdded { issuer, topics });
            Ok(())
        }

        /// Stop trusting `issuer`. Claims it signed stop counting immediately.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::remove_trusted_issuer())]
        pub fn remove_trusted_issuer(origin: OriginFor<T>, issuer: IdentityId) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            ensure!(TrustedIssuers::<T>::contains_key(issuer), Error::<T>::IssuerNotTrusted);

            TrustedIssuers::<T>::remove(issuer);
            TrustedIssuerCount::<T>::mutate(|count| *count = count.saturating_sub(1));

            log::info!(target: LOG_TARGET, "Trusted issuer {} removed", issuer);
            Self::deposit_event(Event::TrustedIssuerRemoved { issuer });
            Ok(())
        }

        /// Replace the topics `issuer` is trusted for.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::update_issuer_claim_topics())]
        pub fn update_issuer_claim_topics(
            origin: OriginFor<T>,
            issuer: IdentityId,
            topics: Vec<ClaimTopic>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            ensure!(TrustedIssuers::<T>::contains_key(issuer), Error::<T>::IssuerNotTrusted);

            let topics = Self::normalize_topics(topics)?;
            TrustedIssuers::<T>::insert(issuer, &topics);

            Self::deposit_event(Event::ClaimTopicsUpdated { issuer, topics });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Required claim topics
        pub claim_topics: Vec<ClaimTopic>,
        /// Trusted issuers with the topics they may sign
        pub trusted_issuers: Vec<(IdentityId, Vec<ClaimTopic>)>,
        #[serde(skip)]
        pub _config: sp_std::marker::PhantomData<T>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let mut topics = self.claim_topics.clone();
            topics.sort_unstable();
            topics.dedup();
            let topics: BoundedVec<ClaimTopic, T::MaxClaimTopics> =
                topics.try_into().expect("Too many claim topics");
            ClaimTopics::<T>::put(topics);

            assert!(
                self.trusted_issuers.len() as u32 <= T::MaxTrustedIssuers::get(),
                "Too many trusted issuers"
            );
            for (issuer, topics) in &self.trusted_issuers {
                let topics = Pallet::<T>::normalize_topics(topics.clone())
                    .expect("Invalid trusted issuer topics");
                TrustedIssuers::<T>::insert(issuer, topics);
            }
            TrustedIssuerCount::<T>::put(TrustedIssuers::<T>::iter_keys().count() as u32);
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn required_topics() -> Vec<ClaimTopic> {
        ClaimTopics::<T>::get().into_inner()
    }

    pub fn is_trusted_issuer(issuer: IdentityId) -> bool {
        TrustedIssuers::<T>::contains_key(issuer)
    }

    pub fn issuer_topics(issuer: IdentityId) -> Vec<ClaimTopic> {
        TrustedIssuers::<T>::get(issuer).map(|t| t.into_inner()).unwrap_or_default()
    }

    pub fn is_trusted_issuer_for_topic(issuer: IdentityId, topic: ClaimTopic) -> bool {
        TrustedIssuers::<T>::get(issuer).is_some_and(|topics| topics.binary_search(&topic).is_ok())
    }

    pub fn trusted_issuers_for_topic(topic: ClaimTopic) -> Vec<IdentityId> {
        let mut issuers: Vec<IdentityId> = TrustedIssuers::<T>::iter()
            .filter(|(_, topics)| topics.binary_search(&topic).is_ok())
            .map(|(issuer, _)| issuer)
            .collect();
        issuers.sort_unstable();
        issuers
    }

    fn normalize_topics(mut topics: Vec<ClaimTopic>) -> Result<IssuerTopics<T>, Error<T>> {
        topics.sort_unstable();
        topics.dedup();
        ensure!(!topics.is_empty(), Error::<T>::EmptyClaimTopics);
        topics.try_into().map_err(|_| Error::<T>::TooManyTopics)
    }
}

impl<T: Config> ClaimTrustInspect for Pallet<T> {
    fn required_topics() -> Vec<ClaimTopic> {
        Pallet::<T>::required_topics()
    }

    fn is_trusted_issuer_for_topic(issuer: IdentityId, topic: ClaimTopic) -> bool {
        Pallet::<T>::is_trusted_issuer_for_topic(issuer, topic)
    }
}
