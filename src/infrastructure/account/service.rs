//! Account directory: registration, login and account lifecycle

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::account::{
    Account, AccountId, AccountProjection, AccountStatus, AccountStore,
};
use crate::domain::DomainError;

use super::codec::CredentialCodec;

/// Plaintext behind the hash verified when a login id is unknown
const UNKNOWN_ACCOUNT_PASSWORD: &str = "unknown-account-placeholder";

/// Request for registering a new account
#[derive(Clone)]
pub struct RegistrationRequest {
    pub login_id: String,
    pub password: String,
    pub display_name: Option<String>,
    pub email: String,
}

/// Request for updating an existing account
///
/// A `None` or empty password keeps the stored hash.
#[derive(Clone)]
pub struct UpdateRequest {
    pub login_id: String,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub email: String,
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("login_id", &self.login_id)
            .field("password", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .finish()
    }
}

impl std::fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("login_id", &self.login_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .finish()
    }
}

/// Account directory
///
/// Holds no mutable state of its own; isolation and the authoritative uniqueness
/// guard belong to the store.
pub struct AccountDirectory<S: AccountStore, C: CredentialCodec> {
    store: Arc<S>,
    codec: Arc<C>,
    /// Hashed with the configured cost on first use
    unknown_account_hash: OnceCell<String>,
}

impl<S: AccountStore, C: CredentialCodec> std::fmt::Debug for AccountDirectory<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountDirectory").finish_non_exhaustive()
    }
}

impl<S, C> AccountDirectory<S, C>
where
    S: AccountStore,
    C: CredentialCodec + 'static,
{
    /// Create a new account directory
    pub fn new(store: Arc<S>, codec: Arc<C>) -> Self {
        Self {
            store,
            codec,
            unknown_account_hash: OnceCell::new(),
        }
    }

    /// Register a new account
    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<AccountProjection, DomainError> {
        // Early exit only; the store's unique index settles races
        if self.store.exists(&request.login_id).await? {
            debug!(login_id = %request.login_id, "Registration rejected: login id taken");
            return Err(DomainError::duplicate_identifier(request.login_id));
        }

        let password_hash = self.hash_password(request.password).await?;
        let account = Account::new(
            request.login_id,
            password_hash,
            request.display_name,
            request.email,
        );

        let saved = self.store.save(account).await?;
        info!(account_id = %saved.id(), login_id = %saved.login_id(), "Account registered");

        Ok(AccountProjection::from(saved))
    }

    /// Verify credentials and return the matching account
    ///
    /// An unknown login id and a wrong password fail identically.
    pub async fn login(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<AccountProjection, DomainError> {
        let account = match self.store.find_by_login_id(login_id).await? {
            Some(account) => account,
            None => {
                // Same Argon2 cost as a wrong password
                let hash = self.unknown_account_hash().await?;
                self.verify_password(password.to_string(), hash).await?;

                warn!(login_id = %login_id, "Login rejected");
                return Err(DomainError::invalid_credentials());
            }
        };

        let verified = self
            .verify_password(password.to_string(), account.password_hash().to_string())
            .await?;

        if !verified {
            warn!(login_id = %login_id, "Login rejected");
            return Err(DomainError::invalid_credentials());
        }

        debug!(account_id = %account.id(), "Login succeeded");
        Ok(AccountProjection::from(account))
    }

    /// List every account
    pub async fn list_all(&self) -> Result<Vec<AccountProjection>, DomainError> {
        let accounts = self.store.find_all().await?;
        Ok(accounts.iter().map(AccountProjection::from).collect())
    }

    /// Get an account by login id
    pub async fn get_by_login_id(&self, login_id: &str) -> Result<AccountProjection, DomainError> {
        self.store
            .find_by_login_id(login_id)
            .await?
            .map(AccountProjection::from)
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", login_id)))
    }

    /// Overwrite an account's profile, re-hashing the password only when one is given
    pub async fn update(
        &self,
        id: AccountId,
        request: UpdateRequest,
    ) -> Result<AccountProjection, DomainError> {
        let mut account = self.require(id).await?;

        account.set_profile(request.login_id, request.display_name, request.email);

        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            let password_hash = self.hash_password(password).await?;
            account.set_password_hash(password_hash);
            debug!(account_id = %id, "Password replaced");
        }

        let saved = self.store.save(account).await?;
        info!(account_id = %id, login_id = %saved.login_id(), "Account updated");

        Ok(AccountProjection::from(saved))
    }

    /// Set an account's status
    pub async fn update_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<AccountProjection, DomainError> {
        let mut account = self.require(id).await?;

        account.set_status(status);

        let saved = self.store.save(account).await?;
        info!(account_id = %id, status = %status, "Account status changed");

        Ok(AccountProjection::from(saved))
    }

    /// Permanently delete an account
    pub async fn delete(&self, id: AccountId) -> Result<(), DomainError> {
        let account = self.require(id).await?;

        self.store.delete(&account).await?;
        info!(account_id = %id, "Account deleted");

        Ok(())
    }

    /// Check that the underlying store is reachable
    pub async fn check_store(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }

    async fn require(&self, id: AccountId) -> Result<Account, DomainError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", id)))
    }

    async fn unknown_account_hash(&self) -> Result<String, DomainError> {
        self.unknown_account_hash
            .get_or_try_init(|| self.hash_password(UNKNOWN_ACCOUNT_PASSWORD.to_string()))
            .await
            .cloned()
    }

    // Argon2 is deliberately slow; keep it off the async worker threads.

    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let codec = Arc::clone(&self.codec);

        tokio::task::spawn_blocking(move || codec.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, DomainError> {
        let codec = Arc::clone(&self.codec);

        tokio::task::spawn_blocking(move || codec.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password verification task failed: {}", e)))
    }
}
