//! Response-safe view of an account

use serde::{Deserialize, Serialize};

use super::entity::{Account, AccountId, AccountStatus};

/// Account projection - everything a caller may see, never the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProjection {
    pub id: AccountId,
    pub login_id: String,
    pub display_name: Option<String>,
    pub email: String,
    pub status: AccountStatus,
}

impl From<&Account> for AccountProjection {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            login_id: account.login_id().to_string(),
            display_name: account.display_name().map(String::from),
            email: account.email().to_string(),
            status: account.status(),
        }
    }
}

impl From<Account> for AccountProjection {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}
