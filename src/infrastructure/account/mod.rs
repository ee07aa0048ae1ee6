//! Account infrastructure module
//!
//! This module provides the account directory together with its collaborators:
//! Argon2 credential hashing and the in-memory and PostgreSQL account stores.

mod codec;
mod in_memory_store;
mod postgres_store;
mod service;

pub use codec::{Argon2Codec, CredentialCodec, HashingConfig};
pub use in_memory_store::InMemoryAccountStore;
pub use postgres_store::PostgresAccountStore;
pub use service::{AccountDirectory, RegistrationRequest, UpdateRequest};
