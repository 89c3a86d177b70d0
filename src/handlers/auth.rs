use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::credentials::{self, NewUser};
use auth::password;
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::user::{self, UserRole};
use sea_orm::{ActiveEnum, ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1))]
    pub name: String,
    /// Login email (must be unique)
    #[validate(email)]
    pub email: String,
    /// Plaintext password; stored only as a salted hash
    #[validate(length(min = 8))]
    pub password: String,
    /// Either "buyer" or "agent"; admin accounts are provisioned from the CLI
    pub role: String,
    /// Contact phone number
    pub phone: Option<String>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for updating the caller's profile.
///
/// Role and email are deliberately absent: neither is updatable.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

/// User response model (never includes the password hash)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role.to_value(),
            phone: model.phone,
            created_at: model.created_at,
        }
    }
}

/// A fresh session token together with the account it belongs to
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// Self-service registration grants buyer or agent only. The admin role is
// not reachable from this endpoint.
fn parse_registration_role(role_str: &str) -> Result<UserRole, ApiError> {
    match role_str {
        "buyer" => Ok(UserRole::Buyer),
        "agent" => Ok(UserRole::Agent),
        other => Err(ApiError::Validation(format!(
            "Invalid role '{}'. Must be one of: buyer, agent",
            other
        ))),
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    trace!("Entering register function");

    // Validate before any mutation
    let role = parse_registration_role(&request.role)?;
    debug!("Registering '{}' with role: {}", request.email, request.role);

    let created = credentials::create_user(
        &state.db,
        NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
            role,
            phone: request.phone,
        },
    )
    .await?;

    let token = state.tokens.issue(created.id, created.role)?;
    info!("User registered successfully with ID: {}", created.id);

    let response = ApiResponse {
        data: AuthResponse {
            token,
            user: UserResponse::from(created),
        },
        message: "User registered successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    trace!("Entering login function");

    let user_model =
        credentials::verify_credentials(&state.db, &request.email, &request.password).await?;

    let token = state.tokens.issue(user_model.id, user_model.role)?;
    info!("Login successful for user ID: {}", user_model.id);

    let response = ApiResponse {
        data: AuthResponse {
            token,
            user: UserResponse::from(user_model),
        },
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the authenticated caller's account
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn me(auth_user: AuthUser) -> Json<ApiResponse<UserResponse>> {
    let response = ApiResponse {
        data: UserResponse::from(auth_user.0),
        message: "Current user retrieved successfully".to_string(),
        success: true,
    };
    Json(response)
}

/// Update the caller's profile (name, phone, password)
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "auth",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth_user, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Valid(Json(request)): Valid<Json<UpdateProfileRequest>>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering update_profile function");
    let current = auth_user.0;
    let user_id = current.id;

    let mut user_active: user::ActiveModel = current.clone().into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name {
        user_active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(phone) = request.phone {
        user_active.phone = Set(Some(phone));
        updated_fields.push("phone");
    }
    if let Some(new_password) = request.password {
        // Re-hash with a fresh salt. Tokens issued before the change stay
        // valid until their natural expiry.
        user_active.password_hash = Set(password::hash_password(&new_password)?);
        updated_fields.push("password");
    }

    if updated_fields.is_empty() {
        debug!("No profile fields to update for user ID: {}", user_id);
        let response = ApiResponse {
            data: UserResponse::from(current),
            message: "Profile updated successfully".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let updated = user_active.update(&state.db).await?;
    info!(
        "Profile for user ID {} updated. Updated fields: {}",
        user_id,
        updated_fields.join(", ")
    );

    let response = ApiResponse {
        data: UserResponse::from(updated),
        message: "Profile updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
