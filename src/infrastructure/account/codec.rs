//! Password hashing using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;

use crate::domain::DomainError;

/// One-way password transformation
///
/// Implementations hold no per-call state, so a single instance may be shared
/// across threads.
pub trait CredentialCodec: Send + Sync {
    /// Hash a plaintext password with a fresh random salt
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored hash
    ///
    /// Returns `false` for malformed hashes instead of failing.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2 cost parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl HashingConfig {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

/// Argon2id credential codec
#[derive(Debug, Clone)]
pub struct Argon2Codec {
    params: Params,
}

impl Argon2Codec {
    /// Create a codec with the given cost parameters
    pub fn new(config: &HashingConfig) -> Result<Self, DomainError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| DomainError::internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Codec {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialCodec for Argon2Codec {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::invalid_input(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Parameters come from the PHC string, so hashes made under an older cost still verify.
        // The digest comparison inside `verify_password` is constant-time.
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_codec() -> Argon2Codec {
        Argon2Codec::new(&HashingConfig::new(1024, 1, 1)).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let codec = fast_codec();
        let password = "my_secure_password";

        let hash = codec.hash(password).unwrap();

        assert!(codec.verify(password, &hash));
        assert!(!codec.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let codec = fast_codec();
        let password = "my_secure_password";

        let hash1 = codec.hash(password).unwrap();
        let hash2 = codec.hash(password).unwrap();

        assert_ne!(hash1, hash2);
        assert!(codec.verify(password, &hash1));
        assert!(codec.verify(password, &hash2));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let codec = fast_codec();
        let hash = codec.hash("plaintext-marker").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plaintext-marker"));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let codec = fast_codec();

        assert!(!codec.verify("password", "invalid_hash_format"));
        assert!(!codec.verify("password", ""));
        assert!(!codec.verify("password", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_empty_password() {
        let codec = fast_codec();

        let hash = codec.hash("").unwrap();
        assert!(codec.verify("", &hash));
        assert!(!codec.verify(" ", &hash));
    }

    #[test]
    fn test_verify_uses_embedded_parameters() {
        let weak = fast_codec();
        let stronger = Argon2Codec::new(&HashingConfig::new(2048, 2, 1)).unwrap();

        let hash = weak.hash("pw1").unwrap();
        assert!(stronger.verify("pw1", &hash));
    }

    #[test]
    fn test_cost_parameters_are_applied() {
        let codec = Argon2Codec::new(&HashingConfig::new(2048, 3, 2)).unwrap();
        let hash = codec.hash("pw1").unwrap();

        assert!(hash.contains("m=2048,t=3,p=2"));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(Argon2Codec::new(&HashingConfig::new(1024, 0, 1)).is_err());
    }

    #[test]
    fn test_default_config_matches_recommended_params() {
        let config = HashingConfig::default();

        assert_eq!(config.memory_kib, 19 * 1024);
        assert_eq!(config.iterations, 2);
        assert_eq!(config.parallelism, 1);
    }
}
