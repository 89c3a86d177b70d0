use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::handlers::properties::PropertyResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::error::is_unique_violation;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{favorite, property, property_photo};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for saving a property
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub property_id: i32,
}

/// A saved property with its listing details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponse {
    pub favorite_id: i32,
    pub property: PropertyResponse,
}

/// Response for the favorite check endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckFavoriteResponse {
    pub is_favorite: bool,
    pub favorite_id: Option<i32>,
}

// Favorites are implicitly owned: the user id always comes from the
// authenticated caller, never from the payload.

/// List the caller's saved properties
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Favorites retrieved successfully", body = ApiResponse<Vec<FavoriteResponse>>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<FavoriteResponse>>>, ApiError> {
    trace!("Entering list_favorites function");

    let favorites = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(auth_user.0.id))
        .all(&state.db)
        .await?;

    let mut data = Vec::with_capacity(favorites.len());
    for saved in favorites {
        let Some(listing) = saved.find_related(property::Entity).one(&state.db).await? else {
            continue;
        };
        let photos = listing
            .find_related(property_photo::Entity)
            .all(&state.db)
            .await?;
        data.push(FavoriteResponse {
            favorite_id: saved.id,
            property: PropertyResponse::from_parts(listing, photos),
        });
    }

    debug!("Retrieved {} favorites for user {}", data.len(), auth_user.0.id);
    let response = ApiResponse {
        data,
        message: "Favorites retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Save a property for the caller
#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    tag = "favorites",
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Property added to favorites", body = ApiResponse<CheckFavoriteResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 409, description = "Property already in favorites", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckFavoriteResponse>>), ApiError> {
    trace!("Entering add_favorite function");

    if property::Entity::find_by_id(request.property_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        warn!("Favorite for missing property {}", request.property_id);
        return Err(ApiError::NotFound("Property"));
    }

    // No look-then-insert: the unique (user, property) index decides the
    // race between concurrent adds, and the loser surfaces as a conflict.
    let inserted = favorite::ActiveModel {
        user_id: Set(auth_user.0.id),
        property_id: Set(request.property_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await;

    let saved = match inserted {
        Ok(saved) => saved,
        Err(db_error) if is_unique_violation(&db_error) => {
            debug!(
                "Duplicate favorite for user {} and property {}",
                auth_user.0.id, request.property_id
            );
            return Err(ApiError::Conflict("Property already in favorites".to_string()));
        }
        Err(db_error) => return Err(ApiError::Database(db_error)),
    };

    info!("Favorite {} created for user {}", saved.id, auth_user.0.id);
    let response = ApiResponse {
        data: CheckFavoriteResponse {
            is_favorite: true,
            favorite_id: Some(saved.id),
        },
        message: "Property added to favorites".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Remove a property from the caller's favorites
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{property_id}",
    tag = "favorites",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Property removed from favorites", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Favorite not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_favorite(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering remove_favorite function for property_id: {}", property_id);

    let Some(saved) = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(auth_user.0.id))
        .filter(favorite::Column::PropertyId.eq(property_id))
        .one(&state.db)
        .await?
    else {
        warn!(
            "No favorite for user {} and property {}",
            auth_user.0.id, property_id
        );
        return Err(ApiError::NotFound("Favorite"));
    };

    saved.delete(&state.db).await?;

    info!(
        "Favorite removed for user {} and property {}",
        auth_user.0.id, property_id
    );
    let response = ApiResponse {
        data: format!("Property {} removed from favorites", property_id),
        message: "Property removed from favorites".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Check whether a property is in the caller's favorites
#[utoipa::path(
    get,
    path = "/api/v1/favorites/check/{property_id}",
    tag = "favorites",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Check completed", body = ApiResponse<CheckFavoriteResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn check_favorite(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<CheckFavoriteResponse>>, ApiError> {
    trace!("Entering check_favorite function for property_id: {}", property_id);

    let saved = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(auth_user.0.id))
        .filter(favorite::Column::PropertyId.eq(property_id))
        .one(&state.db)
        .await?;

    let response = ApiResponse {
        data: CheckFavoriteResponse {
            is_favorite: saved.is_some(),
            favorite_id: saved.map(|favorite| favorite.id),
        },
        message: "Check completed".to_string(),
        success: true,
    };
    Ok(Json(response))
}
