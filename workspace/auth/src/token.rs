//! Stateless signed session tokens.
//!
//! A token is a self-contained HS256 claim set `{user_id, role, exp}` with
//! no server-side session row. Verification needs only the signing secret;
//! the HTTP layer still confirms afterwards that the user row exists.
//!
//! There is no revocation list: logout and password change do not
//! invalidate tokens that are already out. They lapse at `exp`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user::UserRole;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, Result};

/// Fixed token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// The signed claim set carried inside a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    /// Role as its stored string form ("buyer" / "agent" / "admin").
    pub role: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: usize,
}

impl Claims {
    /// Parse the role claim back into the fixed enumeration.
    pub fn role(&self) -> Result<UserRole> {
        UserRole::try_from_value(&self.role).map_err(|_| AuthError::Unauthenticated)
    }
}

/// Issues and verifies session tokens with a symmetric key.
///
/// The key is operational configuration (`JWT_SECRET`); it is never
/// compiled into the binary.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The keys stay out of logs and spans
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for a user, expiring at now + [`TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_id: i32, role: UserRole) -> Result<String> {
        let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
        let claims = Claims {
            user_id,
            role: role.to_value(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Expired, malformed, and tampered tokens all come back as
    /// `Unauthenticated`; the distinction is logged, never returned, so
    /// callers cannot probe which failure they hit.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        // Expiry is exact: a token one second past `exp` is dead
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                debug!(kind = ?err.kind(), "rejected session token");
                Err(AuthError::Unauthenticated)
            }
        }
    }
}
