//! Account Directory
//!
//! A small account service with:
//! - Registration with unique login ids and Argon2id password hashing
//! - Login that never reveals whether the login id exists
//! - Profile, password and status updates, listing and deletion
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::{AccountDirectoryTrait, AppState};
use infrastructure::account::{
    AccountDirectory, Argon2Codec, InMemoryAccountStore, PostgresAccountStore,
};
use infrastructure::storage::{connect_pool, run_account_migrations, StorageConfig};
use tracing::info;

/// Create the application state from configuration
///
/// For the postgres backend this connects the pool and applies pending migrations.
pub async fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let codec = Arc::new(Argon2Codec::new(&config.hashing)?);
    let storage = StorageConfig::from_settings(&config.storage)?;

    info!("Storage backend: {:?}", storage.storage_type());

    let directory: Arc<dyn AccountDirectoryTrait> = match storage {
        StorageConfig::InMemory => {
            let store = Arc::new(InMemoryAccountStore::new());
            Arc::new(AccountDirectory::new(store, codec))
        }
        StorageConfig::Postgres(pg_config) => {
            let pool = connect_pool(&pg_config).await?;
            run_account_migrations(&pool).await?;

            let store = Arc::new(PostgresAccountStore::new(pool));
            Arc::new(AccountDirectory::new(store, codec))
        }
    };

    Ok(AppState::new(directory))
}
