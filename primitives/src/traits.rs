//! Seams between the pallets.

use sp_runtime::DispatchResult;
use sp_std::vec::Vec;

use crate::{
    Balance, Claim, ClaimScheme, ClaimTopic, CountryCode, IdentityId, IdentityRecord,
    ProtectedTarget, RegistryId, VerificationError,
};

/// Role lookups over the agent permission table.
pub trait AgentPermissions<AccountId> {
    fn is_owner(target: ProtectedTarget, who: &AccountId) -> bool;

    /// Whether `who` may call agent-gated operations on `target`, directly or
    /// through the agent manager's delegation.
    fn is_agent(target: ProtectedTarget, who: &AccountId) -> bool;

    fn is_owner_or_agent(target: ProtectedTarget, who: &AccountId) -> bool {
        Self::is_owner(target, who) || Self::is_agent(target, who)
    }
}

/// Read access to on-chain identities and the claims they hold.
pub trait IdentityInspect {
    fn identity_exists(identity: IdentityId) -> bool;

    fn claims_by_topic(identity: IdentityId, topic: ClaimTopic) -> Vec<Claim>;

    /// Whether `signature` is a live attestation by `issuer` of `topic` for
    /// `subject`. Does not consider whether the issuer is trusted.
    fn is_claim_valid(
        issuer: IdentityId,
        subject: IdentityId,
        topic: ClaimTopic,
        scheme: ClaimScheme,
        signature: &[u8],
        data: &[u8],
    ) -> bool;
}

/// Required claim topics and the issuers trusted to attest them.
pub trait ClaimTrustInspect {
    fn required_topics() -> Vec<ClaimTopic>;

    fn is_trusted_issuer_for_topic(issuer: IdentityId, topic: ClaimTopic) -> bool;
}

/// Persistence layer of the identity registry.
///
/// Writes carry the id of the registry performing them and only the currently
/// bound registry is accepted.
pub trait IdentityStorage<AccountId> {
    fn stored_record(holder: &AccountId) -> Option<IdentityRecord>;

    fn stored_identity(holder: &AccountId) -> Option<IdentityId> {
        Self::stored_record(holder).map(|record| record.identity)
    }

    fn stored_country(holder: &AccountId) -> Option<CountryCode> {
        Self::stored_record(holder).map(|record| record.country)
    }

    fn add_identity(
        registry: RegistryId,
        holder: &AccountId,
        identity: IdentityId,
        country: CountryCode,
    ) -> DispatchResult;

    fn modify_identity(registry: RegistryId, holder: &AccountId, identity: IdentityId)
        -> DispatchResult;

    fn modify_country(registry: RegistryId, holder: &AccountId, country: CountryCode)
        -> DispatchResult;

    fn remove_identity(registry: RegistryId, holder: &AccountId) -> DispatchResult;
}

/// Eligibility of token holders.
pub trait IdentityRegistryInspect<AccountId> {
    fn check_verified(holder: &AccountId) -> Result<(), VerificationError>;

    fn is_verified(holder: &AccountId) -> bool {
        Self::check_verified(holder).is_ok()
    }

    fn identity_of(holder: &AccountId) -> Option<IdentityId>;

    fn country_of(holder: &AccountId) -> Option<CountryCode>;
}

/// Transfer rules consulted by the token ledger.
///
/// `can_transfer` must not mutate state. The remaining hooks run after the
/// ledger has applied the matching balance change.
pub trait ComplianceHooks<AccountId> {
    /// `from` is `None` for mints.
    fn can_transfer(from: Option<&AccountId>, to: &AccountId, amount: Balance) -> bool;

    fn transferred(from: &AccountId, to: &AccountId, amount: Balance);

    fn created(to: &AccountId, amount: Balance);

    fn destroyed(from: &AccountId, amount: Balance);
}

/// No rules: every transfer is allowed.
impl<AccountId> ComplianceHooks<AccountId> for () {
    fn can_transfer(_from: Option<&AccountId>, _to: &AccountId, _amount: Balance) -> bool {
        true
    }

    fn transferred(_from: &AccountId, _to: &AccountId, _amount: Balance) {}

    fn created(_to: &AccountId, _amount: Balance) {}

    fn destroyed(_from: &AccountId, _amount: Balance) {}
}
