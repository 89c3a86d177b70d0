use anyhow::{Context, Result};
use auth::TokenService;
use sea_orm::Database;

use crate::schemas::AppState;

/// Initialize application configuration and state
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // The token signing key is an operational secret. There is no
    // compiled-in default.
    let secret = std::env::var("JWT_SECRET")
        .context("JWT_SECRET must be set; session tokens cannot be signed without it")?;
    let tokens = TokenService::new(&secret);

    Ok(AppState { db, tokens })
}
