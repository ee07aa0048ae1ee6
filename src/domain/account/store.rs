//! Account store trait

use async_trait::async_trait;

use super::entity::{Account, AccountId};
use crate::domain::DomainError;

/// Persistence capability consumed by the account directory
///
/// Implementations must enforce login id uniqueness themselves (a unique index or
/// equivalent) and report a violation as [`DomainError::DuplicateIdentifier`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Check whether a login id is taken
    async fn exists(&self, login_id: &str) -> Result<bool, DomainError>;

    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError>;

    /// Insert the account if its id is new, otherwise overwrite the stored one
    async fn save(&self, account: Account) -> Result<Account, DomainError>;

    /// Remove the account permanently
    async fn delete(&self, account: &Account) -> Result<(), DomainError>;

    /// All accounts in the store's natural order
    async fn find_all(&self) -> Result<Vec<Account>, DomainError>;

    /// Check that the backing storage is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
