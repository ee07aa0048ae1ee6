//! In-memory account store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountStore};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<AccountId, Account>,
    /// Index for login id -> account id lookup
    login_index: HashMap<String, AccountId>,
}

/// In-memory implementation of AccountStore
///
/// Both maps live behind a single lock so the login index can never disagree
/// with the accounts it points at.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: Arc<RwLock<Accounts>>,
}

impl InMemoryAccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial accounts
    ///
    /// Later accounts win when two share a login id.
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let mut inner = Accounts::default();

        for account in accounts {
            if let Some(previous) = inner.login_index.insert(account.login_id().to_string(), account.id()) {
                inner.by_id.remove(&previous);
            }
            inner.by_id.insert(account.id(), account);
        }

        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn exists(&self, login_id: &str) -> Result<bool, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.login_index.contains_key(login_id))
    }

    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .login_index
            .get(login_id)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn save(&self, account: Account) -> Result<Account, DomainError> {
        let mut inner = self.inner.write().await;
        let id = account.id();

        if let Some(owner) = inner.login_index.get(account.login_id()) {
            if *owner != id {
                return Err(DomainError::duplicate_identifier(account.login_id()));
            }
        }

        // Drop the old index entry when the login id changed
        let previous_login_id = inner
            .by_id
            .get(&id)
            .map(|existing| existing.login_id().to_string())
            .filter(|previous| previous != account.login_id());

        if let Some(previous) = previous_login_id {
            inner.login_index.remove(&previous);
        }

        inner.login_index.insert(account.login_id().to_string(), id);
        inner.by_id.insert(id, account.clone());

        Ok(account)
    }

    async fn delete(&self, account: &Account) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let removed = inner.by_id.remove(&account.id());

        match removed {
            Some(removed) => {
                inner.login_index.remove(removed.login_id());
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account.id()
            ))),
        }
    }

    async fn find_all(&self) -> Result<Vec<Account>, DomainError> {
        let inner = self.inner.read().await;

        let mut accounts: Vec<Account> = inner.by_id.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at());

        Ok(accounts)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account(login_id: &str) -> Account {
        Account::new(login_id, "hashed_password", None, "a@x.com")
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryAccountStore::new();
        let account = create_test_account("alice");

        store.save(account.clone()).await.unwrap();

        let by_id = store.find_by_id(account.id()).await.unwrap();
        assert_eq!(by_id, Some(account.clone()));

        let by_login = store.find_by_login_id("alice").await.unwrap();
        assert_eq!(by_login, Some(account));

        assert!(store.find_by_login_id("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists() {
        let store = InMemoryAccountStore::new();

        assert!(!store.exists("alice").await.unwrap());
        store.save(create_test_account("alice")).await.unwrap();
        assert!(store.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_login_id() {
        let store = InMemoryAccountStore::new();

        store.save(create_test_account("alice")).await.unwrap();

        let result = store.save(create_test_account("alice")).await;
        assert!(matches!(
            result,
            Err(DomainError::DuplicateIdentifier { ref login_id }) if login_id == "alice"
        ));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let store = InMemoryAccountStore::new();
        let mut account = create_test_account("alice");

        store.save(account.clone()).await.unwrap();

        account.set_profile("alice", Some("Alice".to_string()), "b@x.com");
        store.save(account.clone()).await.unwrap();

        let stored = store.find_by_id(account.id()).await.unwrap().unwrap();
        assert_eq!(stored.email(), "b@x.com");
        assert_eq!(stored.display_name(), Some("Alice"));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_updates_index() {
        let store = InMemoryAccountStore::new();
        let mut account = create_test_account("alice");

        store.save(account.clone()).await.unwrap();

        account.set_profile("alicia", None, "a@x.com");
        store.save(account.clone()).await.unwrap();

        assert!(store.find_by_login_id("alice").await.unwrap().is_none());
        assert!(!store.exists("alice").await.unwrap());
        assert_eq!(
            store.find_by_login_id("alicia").await.unwrap().map(|a| a.id()),
            Some(account.id())
        );
    }

    #[tokio::test]
    async fn test_rename_conflict() {
        let store = InMemoryAccountStore::new();
        let alice = create_test_account("alice");
        let mut bob = create_test_account("bob");

        store.save(alice.clone()).await.unwrap();
        store.save(bob.clone()).await.unwrap();

        bob.set_profile("alice", None, "a@x.com");

        let result = store.save(bob.clone()).await;
        assert!(matches!(result, Err(DomainError::DuplicateIdentifier { .. })));

        // Neither account changed
        let stored_bob = store.find_by_id(bob.id()).await.unwrap().unwrap();
        assert_eq!(stored_bob.login_id(), "bob");
        assert_eq!(
            store.find_by_login_id("alice").await.unwrap().map(|a| a.id()),
            Some(alice.id())
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryAccountStore::new();
        let account = create_test_account("alice");

        store.save(account.clone()).await.unwrap();
        store.delete(&account).await.unwrap();

        assert!(store.find_by_id(account.id()).await.unwrap().is_none());
        assert!(!store.exists("alice").await.unwrap());

        let again = store.delete(&account).await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_all_in_creation_order() {
        let store = InMemoryAccountStore::new();

        let first = create_test_account("alice");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = create_test_account("bob");

        store.save(second.clone()).await.unwrap();
        store.save(first.clone()).await.unwrap();

        let all = store.find_all().await.unwrap();
        let ids: Vec<AccountId> = all.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[tokio::test]
    async fn test_with_accounts() {
        let store = InMemoryAccountStore::with_accounts(vec![
            create_test_account("alice"),
            create_test_account("bob"),
        ]);

        assert_eq!(store.find_all().await.unwrap().len(), 2);
        assert!(store.exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let store = Arc::new(InMemoryAccountStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.save(create_test_account("alice")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }
}
