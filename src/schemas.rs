use auth::TokenService;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::auth::{AuthResponse, UserResponse};
use crate::handlers::favorites::{CheckFavoriteResponse, FavoriteResponse};
use crate::handlers::inquiries::InquiryResponse;
use crate::handlers::photos::PhotoResponse;
use crate::handlers::properties::PropertyResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Issues and verifies session tokens
    pub tokens: TokenService,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::auth::update_profile,
        crate::handlers::properties::list_properties,
        crate::handlers::properties::get_property,
        crate::handlers::properties::create_property,
        crate::handlers::properties::update_property,
        crate::handlers::properties::delete_property,
        crate::handlers::photos::add_photo,
        crate::handlers::photos::delete_photo,
        crate::handlers::inquiries::list_inquiries,
        crate::handlers::inquiries::get_property_inquiries,
        crate::handlers::inquiries::create_inquiry,
        crate::handlers::inquiries::get_inquiry,
        crate::handlers::inquiries::delete_inquiry,
        crate::handlers::favorites::list_favorites,
        crate::handlers::favorites::add_favorite,
        crate::handlers::favorites::remove_favorite,
        crate::handlers::favorites::check_favorite,
    ),
    components(
        schemas(
            ApiResponse<AuthResponse>,
            ApiResponse<UserResponse>,
            ApiResponse<PropertyResponse>,
            ApiResponse<Vec<PropertyResponse>>,
            ApiResponse<PhotoResponse>,
            ApiResponse<InquiryResponse>,
            ApiResponse<Vec<InquiryResponse>>,
            ApiResponse<FavoriteResponse>,
            ApiResponse<Vec<FavoriteResponse>>,
            ApiResponse<CheckFavoriteResponse>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::UpdateProfileRequest,
            crate::handlers::auth::UserResponse,
            crate::handlers::auth::AuthResponse,
            crate::handlers::properties::CreatePropertyRequest,
            crate::handlers::properties::UpdatePropertyRequest,
            crate::handlers::properties::PropertyFilterQuery,
            crate::handlers::properties::PropertyResponse,
            crate::handlers::photos::AddPhotoRequest,
            crate::handlers::photos::PhotoResponse,
            crate::handlers::inquiries::CreateInquiryRequest,
            crate::handlers::inquiries::InquiryResponse,
            crate::handlers::favorites::AddFavoriteRequest,
            crate::handlers::favorites::FavoriteResponse,
            crate::handlers::favorites::CheckFavoriteResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login, and profile endpoints"),
        (name = "properties", description = "Property listing endpoints"),
        (name = "photos", description = "Property photo endpoints"),
        (name = "inquiries", description = "Buyer inquiry endpoints"),
        (name = "favorites", description = "Saved property endpoints"),
    ),
    info(
        title = "HomeMarket API",
        description = "Property marketplace backend - listings, inquiries, and favorites with role-based access",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
