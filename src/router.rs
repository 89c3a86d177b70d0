use crate::handlers::{
    auth::{login, me, register, update_profile},
    favorites::{add_favorite, check_favorite, list_favorites, remove_favorite},
    health::health_check,
    inquiries::{
        create_inquiry, delete_inquiry, get_inquiry, get_property_inquiries, list_inquiries,
    },
    photos::{add_photo, delete_photo},
    properties::{
        create_property, delete_property, get_property, list_properties, update_property,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/profile", put(update_profile))
        // Property routes (viewing is public, mutation is not)
        .route("/api/v1/properties", get(list_properties))
        .route("/api/v1/properties", post(create_property))
        .route("/api/v1/properties/:property_id", get(get_property))
        .route("/api/v1/properties/:property_id", put(update_property))
        .route("/api/v1/properties/:property_id", delete(delete_property))
        // Photo routes
        .route("/api/v1/properties/:property_id/photos", post(add_photo))
        .route("/api/v1/photos/:photo_id", delete(delete_photo))
        // Inquiry routes
        .route("/api/v1/inquiries", get(list_inquiries))
        .route("/api/v1/inquiries", post(create_inquiry))
        .route("/api/v1/inquiries/:inquiry_id", get(get_inquiry))
        .route("/api/v1/inquiries/:inquiry_id", delete(delete_inquiry))
        .route(
            "/api/v1/properties/:property_id/inquiries",
            get(get_property_inquiries),
        )
        // Favorites routes
        .route("/api/v1/favorites", get(list_favorites))
        .route("/api/v1/favorites", post(add_favorite))
        .route("/api/v1/favorites/:property_id", delete(remove_favorite))
        .route("/api/v1/favorites/check/:property_id", get(check_favorite))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
