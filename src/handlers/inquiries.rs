use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::policy::{self, InquiryScope};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{inquiry, property};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QuerySelect,
    RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating an inquiry
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateInquiryRequest {
    pub property_id: i32,
    #[validate(length(min = 1))]
    pub message: String,
}

/// Inquiry response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryResponse {
    pub id: i32,
    pub property_id: i32,
    pub buyer_id: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<inquiry::Model> for InquiryResponse {
    fn from(model: inquiry::Model) -> Self {
        Self {
            id: model.id,
            property_id: model.property_id,
            buyer_id: model.buyer_id,
            message: model.message,
            created_at: model.created_at,
        }
    }
}

/// List inquiries visible to the caller.
///
/// Buyers see their own, agents see inquiries on their listings, admins
/// see everything.
#[utoipa::path(
    get,
    path = "/api/v1/inquiries",
    tag = "inquiries",
    responses(
        (status = 200, description = "Inquiries retrieved successfully", body = ApiResponse<Vec<InquiryResponse>>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_inquiries(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<InquiryResponse>>>, ApiError> {
    trace!("Entering list_inquiries function");

    let finder = match policy::inquiry_scope(&auth_user.caller()) {
        InquiryScope::All => inquiry::Entity::find(),
        InquiryScope::SentBy(buyer_id) => {
            inquiry::Entity::find().filter(inquiry::Column::BuyerId.eq(buyer_id))
        }
        InquiryScope::OnListingsOf(agent_id) => inquiry::Entity::find()
            .join(JoinType::InnerJoin, inquiry::Relation::Property.def())
            .filter(property::Column::AgentId.eq(agent_id)),
    };

    let inquiries = finder.all(&state.db).await?;
    let count = inquiries.len();
    debug!("Retrieved {} inquiries for caller", count);

    let data: Vec<InquiryResponse> = inquiries.into_iter().map(InquiryResponse::from).collect();

    let response = ApiResponse {
        data,
        message: "Inquiries retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// List all inquiries on one listing (owning agent or admin)
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}/inquiries",
    tag = "inquiries",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
    ),
    responses(
        (status = 200, description = "Inquiries retrieved successfully", body = ApiResponse<Vec<InquiryResponse>>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller does not own this listing", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_property_inquiries(
    Path(property_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<InquiryResponse>>>, ApiError> {
    trace!("Entering get_property_inquiries for property_id: {}", property_id);

    let Some(listing) = property::Entity::find_by_id(property_id).one(&state.db).await? else {
        warn!("Property with ID {} not found", property_id);
        return Err(ApiError::NotFound("Property"));
    };

    policy::require_property_owner(&auth_user.caller(), listing.agent_id)?;

    let inquiries = listing.find_related(inquiry::Entity).all(&state.db).await?;
    let data: Vec<InquiryResponse> = inquiries.into_iter().map(InquiryResponse::from).collect();

    let response = ApiResponse {
        data,
        message: "Inquiries retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Send an inquiry about a listing (any authenticated user)
#[utoipa::path(
    post,
    path = "/api/v1/inquiries",
    tag = "inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry created successfully", body = ApiResponse<InquiryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_inquiry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Valid(Json(request)): Valid<Json<CreateInquiryRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<InquiryResponse>>), ApiError> {
    trace!("Entering create_inquiry function");

    // The listing must exist before we record anything against it
    if property::Entity::find_by_id(request.property_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        warn!("Inquiry for missing property {}", request.property_id);
        return Err(ApiError::NotFound("Property"));
    }

    // The sender is always the authenticated caller
    let created = inquiry::ActiveModel {
        property_id: Set(request.property_id),
        buyer_id: Set(auth_user.0.id),
        message: Set(request.message),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Inquiry created successfully with ID: {}", created.id);
    let response = ApiResponse {
        data: InquiryResponse::from(created),
        message: "Inquiry created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a single inquiry under the role-based access rule
#[utoipa::path(
    get,
    path = "/api/v1/inquiries/{inquiry_id}",
    tag = "inquiries",
    params(
        ("inquiry_id" = i32, Path, description = "Inquiry ID"),
    ),
    responses(
        (status = 200, description = "Inquiry retrieved successfully", body = ApiResponse<InquiryResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller may not view this inquiry", body = ErrorResponse),
        (status = 404, description = "Inquiry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_inquiry(
    Path(inquiry_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<InquiryResponse>>, ApiError> {
    trace!("Entering get_inquiry function for inquiry_id: {}", inquiry_id);

    let found = load_inquiry_with_owner(&state, inquiry_id).await?;
    let (question, property_agent_id) = found;

    policy::require_inquiry_access(&auth_user.caller(), question.buyer_id, property_agent_id)?;

    let response = ApiResponse {
        data: InquiryResponse::from(question),
        message: "Inquiry retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a single inquiry under the role-based access rule
#[utoipa::path(
    delete,
    path = "/api/v1/inquiries/{inquiry_id}",
    tag = "inquiries",
    params(
        ("inquiry_id" = i32, Path, description = "Inquiry ID"),
    ),
    responses(
        (status = 200, description = "Inquiry deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Caller may not delete this inquiry", body = ErrorResponse),
        (status = 404, description = "Inquiry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_inquiry(
    Path(inquiry_id): Path<i32>,
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_inquiry function for inquiry_id: {}", inquiry_id);

    let (question, property_agent_id) = load_inquiry_with_owner(&state, inquiry_id).await?;

    policy::require_inquiry_access(&auth_user.caller(), question.buyer_id, property_agent_id)?;

    question.delete(&state.db).await?;

    info!("Inquiry with ID {} deleted successfully", inquiry_id);
    let response = ApiResponse {
        data: format!("Inquiry {} deleted", inquiry_id),
        message: "Inquiry deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Load an inquiry together with the agent id of its parent listing.
async fn load_inquiry_with_owner(
    state: &AppState,
    inquiry_id: i32,
) -> Result<(inquiry::Model, i32), ApiError> {
    let Some(question) = inquiry::Entity::find_by_id(inquiry_id).one(&state.db).await? else {
        warn!("Inquiry with ID {} not found", inquiry_id);
        return Err(ApiError::NotFound("Inquiry"));
    };

    // The parent listing always exists while the inquiry does (cascade)
    let Some(listing) = question.find_related(property::Entity).one(&state.db).await? else {
        return Err(ApiError::NotFound("Property"));
    };

    Ok((question, listing.agent_id))
}
