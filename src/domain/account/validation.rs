//! Account input validation, applied at the request boundary

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during account input validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountValidationError {
    #[error("Login id cannot be empty")]
    EmptyLoginId,

    #[error("Login id exceeds maximum length of {0} characters")]
    LoginIdTooLong(usize),

    #[error("Login id contains invalid character: {0:?}. Whitespace and control characters are not allowed")]
    InvalidLoginIdCharacter(char),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email address is malformed")]
    MalformedEmail,

    #[error("Display name exceeds maximum length of {0} characters")]
    DisplayNameTooLong(usize),

    #[error("Invalid account status '{0}'. Expected ACTIVE or INACTIVE")]
    InvalidStatus(String),

    #[error("Invalid account id '{0}'")]
    InvalidAccountId(String),
}

impl From<AccountValidationError> for DomainError {
    fn from(err: AccountValidationError) -> Self {
        DomainError::invalid_input(err.to_string())
    }
}

const MAX_LOGIN_ID_LENGTH: usize = 50;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Validate a login id
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
/// - No whitespace or control characters
pub fn validate_login_id(login_id: &str) -> Result<(), AccountValidationError> {
    if login_id.is_empty() {
        return Err(AccountValidationError::EmptyLoginId);
    }

    if login_id.chars().count() > MAX_LOGIN_ID_LENGTH {
        return Err(AccountValidationError::LoginIdTooLong(MAX_LOGIN_ID_LENGTH));
    }

    if let Some(c) = login_id
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(AccountValidationError::InvalidLoginIdCharacter(c));
    }

    Ok(())
}

/// Validate a password supplied at registration
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.is_empty() {
        return Err(AccountValidationError::EmptyPassword);
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate an email address
///
/// Only the shape is checked (one `@`, non-empty local and domain parts);
/// deliverability is out of scope.
pub fn validate_email(email: &str) -> Result<(), AccountValidationError> {
    if email.is_empty() {
        return Err(AccountValidationError::EmptyEmail);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(AccountValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(AccountValidationError::MalformedEmail);
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(AccountValidationError::MalformedEmail),
    }
}

pub fn validate_display_name(display_name: Option<&str>) -> Result<(), AccountValidationError> {
    match display_name {
        Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LENGTH => Err(
            AccountValidationError::DisplayNameTooLong(MAX_DISPLAY_NAME_LENGTH),
        ),
        _ => Ok(()),
    }
}
