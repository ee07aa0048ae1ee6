//! Account entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::AccountValidationError;

/// Account identifier - assigned once at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidAccountId(s.to_string()))
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    /// Symbolic name, as stored and as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(AccountValidationError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account entity
///
/// Intentionally not `Serialize`: the password hash must only leave the process
/// through a store, never through a response. Use [`super::AccountProjection`] for output.
#[derive(Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    login_id: String,
    password_hash: String,
    display_name: Option<String>,
    email: String,
    status: AccountStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Flat persisted form of an account, used by stores to rebuild entities
#[derive(Clone)]
pub struct AccountRecord {
    pub id: AccountId,
    pub login_id: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub email: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, active account with a freshly assigned id
    pub fn new(
        login_id: impl Into<String>,
        password_hash: impl Into<String>,
        display_name: Option<String>,
        email: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: AccountId::generate(),
            login_id: login_id.into(),
            password_hash: password_hash.into(),
            display_name,
            email: email.into(),
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an account from its persisted form
    pub fn restore(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            login_id: record.login_id,
            password_hash: record.password_hash,
            display_name: record.display_name,
            email: record.email,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Replace the profile fields in one step
    pub fn set_profile(
        &mut self,
        login_id: impl Into<String>,
        display_name: Option<String>,
        email: impl Into<String>,
    ) {
        self.login_id = login_id.into();
        self.display_name = display_name;
        self.email = email.into();
        self.touch();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("login_id", &self.login_id)
            .field("password_hash", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl std::fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRecord")
            .field("id", &self.id)
            .field("login_id", &self.login_id)
            .finish_non_exhaustive()
    }
}
