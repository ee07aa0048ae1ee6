//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::{AccountId, AccountProjection, AccountStatus, AccountStore};
use crate::domain::DomainError;
use crate::infrastructure::account::{
    AccountDirectory, CredentialCodec, RegistrationRequest, UpdateRequest,
};
use crate::infrastructure::observability::record_account_operation;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_directory: Arc<dyn AccountDirectoryTrait>,
}

impl AppState {
    pub fn new(account_directory: Arc<dyn AccountDirectoryTrait>) -> Self {
        Self { account_directory }
    }
}

/// Trait for account directory operations
#[async_trait::async_trait]
pub trait AccountDirectoryTrait: Send + Sync {
    async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<AccountProjection, DomainError>;
    async fn login(&self, login_id: &str, password: &str)
        -> Result<AccountProjection, DomainError>;
    async fn list_all(&self) -> Result<Vec<AccountProjection>, DomainError>;
    async fn get_by_login_id(&self, login_id: &str) -> Result<AccountProjection, DomainError>;
    async fn update(
        &self,
        id: AccountId,
        request: UpdateRequest,
    ) -> Result<AccountProjection, DomainError>;
    async fn update_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<AccountProjection, DomainError>;
    async fn delete(&self, id: AccountId) -> Result<(), DomainError>;
    async fn check_store(&self) -> Result<(), DomainError>;
}

/// Count the outcome of an operation and hand the result back unchanged
fn observe<T>(operation: &'static str, result: Result<T, DomainError>) -> Result<T, DomainError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };

    record_account_operation(operation, outcome);
    result
}

#[async_trait::async_trait]
impl<S, C> AccountDirectoryTrait for AccountDirectory<S, C>
where
    S: AccountStore + 'static,
    C: CredentialCodec + 'static,
{
    async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<AccountProjection, DomainError> {
        observe("register", AccountDirectory::register(self, request).await)
    }

    async fn login(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<AccountProjection, DomainError> {
        observe("login", AccountDirectory::login(self, login_id, password).await)
    }

    async fn list_all(&self) -> Result<Vec<AccountProjection>, DomainError> {
        observe("list_all", AccountDirectory::list_all(self).await)
    }

    async fn get_by_login_id(&self, login_id: &str) -> Result<AccountProjection, DomainError> {
        observe(
            "get_by_login_id",
            AccountDirectory::get_by_login_id(self, login_id).await,
        )
    }

    async fn update(
        &self,
        id: AccountId,
        request: UpdateRequest,
    ) -> Result<AccountProjection, DomainError> {
        observe("update", AccountDirectory::update(self, id, request).await)
    }

    async fn update_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<AccountProjection, DomainError> {
        observe(
            "update_status",
            AccountDirectory::update_status(self, id, status).await,
        )
    }

    async fn delete(&self, id: AccountId) -> Result<(), DomainError> {
        observe("delete", AccountDirectory::delete(self, id).await)
    }

    async fn check_store(&self) -> Result<(), DomainError> {
        AccountDirectory::check_store(self).await
    }
}
