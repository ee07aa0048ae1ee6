//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;

pub use account::{Account, AccountId, AccountProjection, AccountStatus, AccountStore};
pub use error::DomainError;
