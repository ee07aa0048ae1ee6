//! Account endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::{
    validate_display_name, validate_email, validate_login_id, validate_password, AccountId,
    AccountProjection, AccountStatus, AccountValidationError,
};
use crate::infrastructure::account::{RegistrationRequest, UpdateRequest};

/// Request body for `POST /accounts/register`
#[derive(Clone, Deserialize)]
pub struct RegisterAccountRequest {
    #[serde(alias = "ids")]
    pub login_id: String,
    pub password: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    pub email: String,
}

/// Request body for `POST /accounts/login`
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "ids")]
    pub login_id: String,
    pub password: String,
}

/// Request body for `PUT /accounts/{id}`
#[derive(Clone, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(alias = "ids")]
    pub login_id: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    pub email: String,
}

/// Query for `PUT /accounts/{id}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

impl RegisterAccountRequest {
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        validate_login_id(&self.login_id)?;
        validate_password(&self.password)?;
        validate_email(&self.email)?;
        validate_display_name(self.display_name.as_deref())
    }
}

impl UpdateAccountRequest {
    /// An absent or empty password means "keep the current one"
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        validate_login_id(&self.login_id)?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            validate_password(password)?;
        }

        validate_email(&self.email)?;
        validate_display_name(self.display_name.as_deref())
    }
}

impl From<RegisterAccountRequest> for RegistrationRequest {
    fn from(req: RegisterAccountRequest) -> Self {
        Self {
            login_id: req.login_id,
            password: req.password,
            display_name: req.display_name,
            email: req.email,
        }
    }
}

impl From<UpdateAccountRequest> for UpdateRequest {
    fn from(req: UpdateAccountRequest) -> Self {
        Self {
            login_id: req.login_id,
            password: req.password,
            display_name: req.display_name,
            email: req.email,
        }
    }
}

macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"[REDACTED]")
                    .finish()
            }
        }
    };
}

redacted_debug!(RegisterAccountRequest { login_id, display_name, email });
redacted_debug!(LoginRequest { login_id });
redacted_debug!(UpdateAccountRequest { login_id, display_name, email });

fn invalid_input(err: AccountValidationError) -> ApiError {
    ApiError::from(crate::domain::DomainError::from(err))
}

fn parse_account_id(raw: &str) -> Result<AccountId, ApiError> {
    raw.parse::<AccountId>()
        .map_err(|e| invalid_input(e).with_param("id"))
}

/// Create the `/accounts` router
pub fn create_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/all", get(list_all))
        .route(
            "/{id}",
            get(get_by_login_id).put(update).delete(delete),
        )
        .route("/{id}/status", put(update_status))
}

/// POST /accounts/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(login_id = %request.login_id, "Registering account");

    request.validate().map_err(invalid_input)?;

    let projection = state.account_directory.register(request.into()).await?;

    Ok((StatusCode::CREATED, Json(projection)))
}

/// POST /accounts/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AccountProjection>, ApiError> {
    debug!(login_id = %request.login_id, "Login attempt");

    let projection = state
        .account_directory
        .login(&request.login_id, &request.password)
        .await?;

    Ok(Json(projection))
}

/// GET /accounts/all
pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountProjection>>, ApiError> {
    let accounts = state.account_directory.list_all().await?;

    Ok(Json(accounts))
}

/// GET /accounts/{login_id}
pub async fn get_by_login_id(
    State(state): State<AppState>,
    Path(login_id): Path<String>,
) -> Result<Json<AccountProjection>, ApiError> {
    let projection = state.account_directory.get_by_login_id(&login_id).await?;

    Ok(Json(projection))
}

/// PUT /accounts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountProjection>, ApiError> {
    let id = parse_account_id(&id)?;
    debug!(account_id = %id, login_id = %request.login_id, "Updating account");

    request.validate().map_err(invalid_input)?;

    let projection = state.account_directory.update(id, request.into()).await?;

    Ok(Json(projection))
}

/// PUT /accounts/{id}/status?status=ACTIVE|INACTIVE
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<AccountProjection>, ApiError> {
    let id = parse_account_id(&id)?;

    let status = query
        .status
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing 'status' query parameter").with_param("status"))?
        .parse::<AccountStatus>()
        .map_err(|e| invalid_input(e).with_param("status"))?;

    debug!(account_id = %id, status = %status, "Updating account status");

    let projection = state.account_directory.update_status(id, status).await?;

    Ok(Json(projection))
}

/// DELETE /accounts/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_account_id(&id)?;

    state.account_directory.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
