use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::policy;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{property, property_photo};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for attaching a photo to a listing
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct AddPhotoRequest {
    /// Photo URL; treated as an opaque string
    #[validate(length(min = 1))]
    pub photo_url: String,
}

/// Photo response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponse {
    pub id: i32,
    pub property_id: i32,
    pub photo_url: String,
}

impl From<property_photo::Model> for PhotoResponse {
    fn from(model: property_photo::Model) -> Self {
        Self {
            id: model.id,
            property_id: model.property_id,
            photo_url: model.photo_url,
        }
    }
}

/// Attach a photo to a listing (owning agent or admin)
#[utoipa::path(
    post,
    path = "/api/v1/properties/{property_id}/photos",
    tag = "photos",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    request_body = AddPhotoRequest,
    responses(
        (status = 201, description = "Photo added successfully", body = ApiResponse<PhotoResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller does not own this listing", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_photo(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
    Valid(Json(request)): Valid<Json<AddPhotoRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PhotoResponse>>), ApiError> {
    trace!("Entering add_photo function for property_id: {}", property_id);

    let Some(listing) = property::Entity::find_by_id(property_id).one(&state.db).await? else {
        warn!("Property with ID {} not found for photo add", property_id);
        return Err(ApiError::NotFound("Property"));
    };

    policy::require_property_owner(&auth_user.caller(), listing.agent_id)?;

    let photo = property_photo::ActiveModel {
        property_id: Set(property_id),
        photo_url: Set(request.photo_url),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Photo {} added to property {}", photo.id, property_id);
    let response = ApiResponse {
        data: PhotoResponse::from(photo),
        message: "Photo added successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Delete a photo (owner of the parent listing or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/photos/{photo_id}",
    tag = "photos",
    params(
        ("photo_id" = i32, Path, description = "Photo ID"),
    ),
    responses(
        (status = 200, description = "Photo deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller does not own the parent listing", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_photo(
    Path(photo_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_photo function for photo_id: {}", photo_id);

    let Some(photo) = property_photo::Entity::find_by_id(photo_id).one(&state.db).await? else {
        warn!("Photo with ID {} not found for deletion", photo_id);
        return Err(ApiError::NotFound("Photo"));
    };

    // The ownership rule applies to the photo's parent listing
    let Some(listing) = photo.find_related(property::Entity).one(&state.db).await? else {
        return Err(ApiError::NotFound("Property"));
    };

    policy::require_property_owner(&auth_user.caller(), listing.agent_id)?;

    photo.delete(&state.db).await?;

    info!("Photo with ID {} deleted successfully", photo_id);
    let response = ApiResponse {
        data: format!("Photo {} deleted", photo_id),
        message: "Photo deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
