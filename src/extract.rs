use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use model::entities::user;
use sea_orm::EntityTrait;
use tracing::debug;

use auth::Caller;

use crate::error::ApiError;
use crate::schemas::AppState;

/// The authenticated caller.
///
/// Resolved exactly once per request: the bearer token is verified, then
/// the user row is loaded to confirm the account still exists. Handlers
/// receive this as an immutable value; authorization decisions are pure
/// functions over [`Caller`] plus the target entity.
pub struct AuthUser(pub user::Model);

impl AuthUser {
    pub fn caller(&self) -> Caller {
        Caller {
            id: self.0.id,
            role: self.0.role,
        }
    }
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The password hash stays out of spans and logs
        f.debug_struct("AuthUser")
            .field("id", &self.0.id)
            .field("role", &self.0.role)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let claims = state.tokens.verify(token)?;

        // Signature and expiry are fine; the account must also still exist
        let found = user::Entity::find_by_id(claims.user_id)
            .one(&state.db)
            .await?;

        match found {
            Some(user_model) => Ok(AuthUser(user_model)),
            None => {
                debug!(user_id = claims.user_id, "valid token for a missing user");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
