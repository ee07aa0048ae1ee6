//! PostgreSQL account store implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::domain::account::{Account, AccountId, AccountRecord, AccountStatus, AccountStore};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = r#"
    SELECT id, login_id, password_hash, display_name, email, status, created_at, updated_at
    FROM accounts
"#;

/// PostgreSQL implementation of AccountStore
///
/// Login id uniqueness is enforced by the `accounts_login_id_key` unique index.
#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn exists(&self, login_id: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE login_id = $1)")
            .bind(login_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check login id: {}", e)))
    }

    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE login_id = $1", SELECT_COLUMNS))
            .bind(login_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to get account by login id: {}", e))
            })?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn save(&self, account: Account) -> Result<Account, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, login_id, password_hash, display_name, email, status,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET login_id = EXCLUDED.login_id,
                password_hash = EXCLUDED.password_hash,
                display_name = EXCLUDED.display_name,
                email = EXCLUDED.email,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.login_id())
        .bind(account.password_hash())
        .bind(account.display_name())
        .bind(account.email())
        .bind(account.status().as_str())
        .bind(account.created_at())
        .bind(account.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_identifier(account.login_id())
            } else {
                DomainError::storage(format!("Failed to save account: {}", e))
            }
        })?;

        Ok(account)
    }

    async fn delete(&self, account: &Account) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account.id().as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete account: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account.id()
            )));
        }

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at, id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list accounts: {}", e)))?;

        rows.iter().map(row_to_account).collect()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database unreachable: {}", e)))?;

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let id: Uuid = column(row, "id")?;
    let status: String = column(row, "status")?;

    Ok(Account::restore(AccountRecord {
        id: AccountId::from_uuid(id),
        login_id: column(row, "login_id")?,
        password_hash: column(row, "password_hash")?,
        display_name: column(row, "display_name")?,
        email: column(row, "email")?,
        status: str_to_status(&status)?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    }))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Invalid account row column '{}': {}", name, e)))
}

fn str_to_status(s: &str) -> Result<AccountStatus, DomainError> {
    match s {
        "ACTIVE" => Ok(AccountStatus::Active),
        "INACTIVE" => Ok(AccountStatus::Inactive),
        other => Err(DomainError::storage(format!(
            "Unknown account status in database: '{}'",
            other
        ))),
    }
}
