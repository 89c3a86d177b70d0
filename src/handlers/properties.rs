use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::handlers::photos::PhotoResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::policy;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{property, property_photo};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a property listing
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    /// Asking price; must be positive
    pub price: Decimal,
    /// Listing type: "house" or "apartment"
    pub property_type: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    /// Floor area in square meters
    pub area: Option<Decimal>,
    /// Photo URLs attached atomically with the listing itself
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Request body for updating a property listing
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    /// Listing type: "house" or "apartment"
    pub property_type: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    pub area: Option<Decimal>,
}

/// Query parameters for listing properties
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PropertyFilterQuery {
    /// Filter by listing type ("house" or "apartment")
    pub property_type: Option<String>,
    /// Substring match on location
    pub location: Option<String>,
    /// Lower price bound (inclusive)
    pub min_price: Option<Decimal>,
    /// Upper price bound (inclusive)
    pub max_price: Option<Decimal>,
    /// Minimum number of bedrooms
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    /// Minimum number of bathrooms
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    /// Only listings owned by this agent
    pub agent_id: Option<i32>,
}

/// Property response model, photos included
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyResponse {
    pub id: i32,
    pub agent_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub property_type: String,
    pub location: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub photos: Vec<PhotoResponse>,
}

impl PropertyResponse {
    pub fn from_parts(model: property::Model, photos: Vec<property_photo::Model>) -> Self {
        Self {
            id: model.id,
            agent_id: model.agent_id,
            title: model.title,
            description: model.description,
            price: model.price,
            property_type: model.property_type.to_value(),
            location: model.location,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            area: model.area,
            created_at: model.created_at,
            photos: photos.into_iter().map(PhotoResponse::from).collect(),
        }
    }
}

// Helper function to parse a type string into the closed PropertyType set
pub(crate) fn parse_property_type(type_str: &str) -> Result<property::PropertyType, ApiError> {
    match type_str {
        "house" => Ok(property::PropertyType::House),
        "apartment" => Ok(property::PropertyType::Apartment),
        other => Err(ApiError::Validation(format!(
            "Invalid type '{}'. Must be one of: house, apartment",
            other
        ))),
    }
}

fn ensure_positive(field: &'static str, value: Decimal) -> Result<(), ApiError> {
    if value <= Decimal::ZERO {
        return Err(ApiError::Validation(format!("{} must be positive", field)));
    }
    Ok(())
}

/// List properties with optional filters (public)
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "properties",
    params(PropertyFilterQuery),
    responses(
        (status = 200, description = "Properties retrieved successfully", body = ApiResponse<Vec<PropertyResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_properties(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PropertyFilterQuery>>,
) -> Result<Json<ApiResponse<Vec<PropertyResponse>>>, ApiError> {
    trace!("Entering list_properties function");

    let mut finder = property::Entity::find();

    if let Some(ref type_str) = query.property_type {
        let property_type = parse_property_type(type_str)?;
        finder = finder.filter(property::Column::PropertyType.eq(property_type));
    }
    if let Some(ref location) = query.location {
        finder = finder.filter(property::Column::Location.contains(location));
    }
    if let Some(min_price) = query.min_price {
        finder = finder.filter(property::Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        finder = finder.filter(property::Column::Price.lte(max_price));
    }
    if let Some(bedrooms) = query.bedrooms {
        finder = finder.filter(property::Column::Bedrooms.gte(bedrooms));
    }
    if let Some(bathrooms) = query.bathrooms {
        finder = finder.filter(property::Column::Bathrooms.gte(bathrooms));
    }
    if let Some(agent_id) = query.agent_id {
        finder = finder.filter(property::Column::AgentId.eq(agent_id));
    }

    let rows = finder
        .order_by_desc(property::Column::CreatedAt)
        .find_with_related(property_photo::Entity)
        .all(&state.db)
        .await?;

    let count = rows.len();
    debug!("Retrieved {} properties from database", count);

    let data: Vec<PropertyResponse> = rows
        .into_iter()
        .map(|(listing, photos)| PropertyResponse::from_parts(listing, photos))
        .collect();

    info!("Successfully retrieved {} properties", count);
    let response = ApiResponse {
        data,
        message: "Properties retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a single property by ID (public)
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}",
    tag = "properties",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Property retrieved successfully", body = ApiResponse<PropertyResponse>),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_property(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PropertyResponse>>, ApiError> {
    trace!("Entering get_property function for property_id: {}", property_id);

    let Some(listing) = property::Entity::find_by_id(property_id).one(&state.db).await? else {
        warn!("Property with ID {} not found", property_id);
        return Err(ApiError::NotFound("Property"));
    };

    let photos = listing
        .find_related(property_photo::Entity)
        .all(&state.db)
        .await?;

    let response = ApiResponse {
        data: PropertyResponse::from_parts(listing, photos),
        message: "Property retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Create a new property listing (agent/admin only)
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created successfully", body = ApiResponse<PropertyResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller is not an agent", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_property(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Valid(Json(request)): Valid<Json<CreatePropertyRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PropertyResponse>>), ApiError> {
    trace!("Entering create_property function");
    policy::require_agent(&auth_user.caller())?;

    // All validation happens before the first write
    let property_type = parse_property_type(&request.property_type)?;
    ensure_positive("Price", request.price)?;
    if let Some(area) = request.area {
        ensure_positive("Area", area)?;
    }

    let agent_id = auth_user.0.id;
    debug!(
        "Creating property '{}' for agent {} with {} photos",
        request.title,
        agent_id,
        request.photos.len()
    );

    // The listing and its photos commit together or not at all; a failure
    // on any photo rolls the whole thing back.
    let (created, photos) = state
        .db
        .transaction::<_, (property::Model, Vec<property_photo::Model>), DbErr>(move |txn| {
            Box::pin(async move {
                let created = property::ActiveModel {
                    agent_id: Set(agent_id),
                    title: Set(request.title),
                    description: Set(request.description),
                    price: Set(request.price),
                    property_type: Set(property_type),
                    location: Set(request.location),
                    bedrooms: Set(request.bedrooms),
                    bathrooms: Set(request.bathrooms),
                    area: Set(request.area),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let mut photos = Vec::with_capacity(request.photos.len());
                for photo_url in request.photos {
                    let photo = property_photo::ActiveModel {
                        property_id: Set(created.id),
                        photo_url: Set(photo_url),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    photos.push(photo);
                }

                Ok((created, photos))
            })
        })
        .await?;

    info!("Property created successfully with ID: {}", created.id);
    let response = ApiResponse {
        data: PropertyResponse::from_parts(created, photos),
        message: "Property created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a property listing (owning agent or admin)
#[utoipa::path(
    put,
    path = "/api/v1/properties/{property_id}",
    tag = "properties",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Property updated successfully", body = ApiResponse<PropertyResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller does not own this listing", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_property(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
    Valid(Json(request)): Valid<Json<UpdatePropertyRequest>>,
) -> Result<Json<ApiResponse<PropertyResponse>>, ApiError> {
    trace!("Entering update_property function for property_id: {}", property_id);

    let Some(existing) = property::Entity::find_by_id(property_id).one(&state.db).await? else {
        warn!("Property with ID {} not found for update", property_id);
        return Err(ApiError::NotFound("Property"));
    };

    policy::require_property_owner(&auth_user.caller(), existing.agent_id)?;

    // Validate every provided field before applying any of them
    let parsed_type = request
        .property_type
        .as_deref()
        .map(parse_property_type)
        .transpose()?;
    if let Some(price) = request.price {
        ensure_positive("Price", price)?;
    }
    if let Some(area) = request.area {
        ensure_positive("Area", area)?;
    }

    let mut listing_active: property::ActiveModel = existing.clone().into();
    let mut updated_fields = Vec::new();

    if let Some(title) = request.title {
        listing_active.title = Set(title);
        updated_fields.push("title");
    }
    if let Some(description) = request.description {
        listing_active.description = Set(Some(description));
        updated_fields.push("description");
    }
    if let Some(price) = request.price {
        listing_active.price = Set(price);
        updated_fields.push("price");
    }
    if let Some(property_type) = parsed_type {
        listing_active.property_type = Set(property_type);
        updated_fields.push("property_type");
    }
    if let Some(location) = request.location {
        listing_active.location = Set(location);
        updated_fields.push("location");
    }
    if let Some(bedrooms) = request.bedrooms {
        listing_active.bedrooms = Set(Some(bedrooms));
        updated_fields.push("bedrooms");
    }
    if let Some(bathrooms) = request.bathrooms {
        listing_active.bathrooms = Set(Some(bathrooms));
        updated_fields.push("bathrooms");
    }
    if let Some(area) = request.area {
        listing_active.area = Set(Some(area));
        updated_fields.push("area");
    }

    let updated = if updated_fields.is_empty() {
        debug!("No fields to update for property ID: {}", property_id);
        existing
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
        listing_active.update(&state.db).await?
    };

    let photos = updated
        .find_related(property_photo::Entity)
        .all(&state.db)
        .await?;

    info!("Property with ID {} updated successfully", property_id);
    let response = ApiResponse {
        data: PropertyResponse::from_parts(updated, photos),
        message: "Property updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a property listing and everything attached to it
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{property_id}",
    tag = "properties",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Property deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller does not own this listing", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_property(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_property function for property_id: {}", property_id);

    let Some(existing) = property::Entity::find_by_id(property_id).one(&state.db).await? else {
        warn!("Property with ID {} not found for deletion", property_id);
        return Err(ApiError::NotFound("Property"));
    };

    policy::require_property_owner(&auth_user.caller(), existing.agent_id)?;

    // Photos, inquiries, and favorites go with it (ON DELETE CASCADE)
    existing.delete(&state.db).await?;

    info!("Property with ID {} deleted successfully", property_id);
    let response = ApiResponse {
        data: format!("Property {} deleted", property_id),
        message: "Property deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
