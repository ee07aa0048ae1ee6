//! Account domain
//!
//! This module provides domain types and traits for the account lifecycle,
//! including the account entity, its response projection, boundary validation
//! and the store trait.

mod entity;
mod projection;
mod store;
mod validation;

pub use entity::{Account, AccountId, AccountRecord, AccountStatus};
pub use projection::AccountProjection;
pub use store::AccountStore;
pub use validation::{
    validate_display_name, validate_email, validate_login_id, validate_password,
    AccountValidationError,
};

#[cfg(test)]
pub use store::mock::MockAccountStore;
