//! Migrate command - applies or reverts PostgreSQL migrations

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{
    account_migrations, connect_pool, Migrator, PostgresMigrator, StorageConfig,
};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

/// Run migrations against the configured PostgreSQL database
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let StorageConfig::Postgres(pg_config) = StorageConfig::from_settings(&config.storage)? else {
        anyhow::bail!("Migrations require the postgres storage backend (set APP__STORAGE__BACKEND=postgres)");
    };

    let pool = connect_pool(&pg_config).await?;
    let migrator = PostgresMigrator::new(pool, account_migrations());

    if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    match migrator.version().await? {
        Some(version) => info!(version, "Database schema is at version {}", version),
        None => info!("No migrations applied"),
    }

    Ok(())
}
