//! Storage backend selection

use crate::config::StorageSettings;
use crate::domain::DomainError;

use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL storage configuration
    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Resolve the storage configuration from application settings
    ///
    /// The postgres backend requires a database URL.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        let storage_type = StorageType::parse(&settings.backend).ok_or_else(|| {
            DomainError::invalid_input(format!(
                "Unknown storage backend '{}'. Expected 'memory' or 'postgres'",
                settings.backend
            ))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings.database_url.as_deref().ok_or_else(|| {
                    DomainError::invalid_input(
                        "The postgres backend requires storage.database_url or DATABASE_URL",
                    )
                })?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(settings.max_connections)
                        .with_min_connections(settings.min_connections)
                        .with_connect_timeout(settings.connect_timeout_secs)
                        .with_idle_timeout(settings.idle_timeout_secs),
                ))
            }
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parse() {
        assert_eq!(StorageType::parse("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse("in-memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse("Postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("postgresql"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("unknown"), None);
    }

    #[test]
    fn test_storage_config_types() {
        let in_memory = StorageConfig::in_memory();
        assert_eq!(in_memory.storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::postgres_url("postgres://localhost/test");
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[test]
    fn test_from_default_settings_is_in_memory() {
        let config = StorageConfig::from_settings(&StorageSettings::default()).unwrap();
        assert_eq!(config.storage_type(), StorageType::InMemory);
    }

    #[test]
    fn test_from_settings_postgres() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/test".to_string()),
            max_connections: 20,
            ..Default::default()
        };

        match StorageConfig::from_settings(&settings).unwrap() {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://localhost/test");
                assert_eq!(pg.max_connections, 20);
            }
            other => panic!("Expected Postgres config, got {:?}", other),
        }
    }

    #[test]
    fn test_from_settings_postgres_requires_url() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: None,
            ..Default::default()
        };

        assert!(StorageConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_from_settings_unknown_backend() {
        let settings = StorageSettings {
            backend: "redis".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            StorageConfig::from_settings(&settings),
            Err(DomainError::InvalidInput { .. })
        ));
    }
}
