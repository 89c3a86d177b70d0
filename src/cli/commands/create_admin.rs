use anyhow::{Context, Result};
use auth::credentials::{self, NewUser};
use model::entities::user::UserRole;
use sea_orm::Database;
use tracing::info;

/// Create an admin account directly in the database.
///
/// The HTTP registration endpoint never grants the admin role, so this is
/// the only way an admin comes into existence.
pub async fn create_admin(
    database_url: &str,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    dotenvy::dotenv().ok();

    let db = Database::connect(database_url).await?;

    let created = credentials::create_user(
        &db,
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::Admin,
            phone: None,
        },
    )
    .await
    .context("Failed to create admin account")?;

    info!(user_id = created.id, "admin account created");
    println!("Created admin {} (id {})", created.email, created.id);

    Ok(())
}
