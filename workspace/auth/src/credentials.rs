//! The credential store: user creation and password-based verification.
//!
//! Email uniqueness is enforced by the database's unique index, never by a
//! look-then-insert sequence; two concurrent registrations for the same
//! address resolve to one row and one `DuplicateEmail` failure.

use chrono::Utc;
use model::entities::user::{self, UserRole};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info};

use crate::error::{is_unique_violation, AuthError, Result};
use crate::password;

/// Input for creating a user. The password arrives in plaintext and leaves
/// this function only as a hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub phone: Option<String>,
}

/// Create a user with a hashed password.
pub async fn create_user<C: ConnectionTrait>(db: &C, new_user: NewUser) -> Result<user::Model> {
    let password_hash = password::hash_password(&new_user.password)?;

    let row = user::ActiveModel {
        name: Set(new_user.name),
        email: Set(new_user.email.clone()),
        password_hash: Set(password_hash),
        role: Set(new_user.role),
        phone: Set(new_user.phone),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(created) => {
            info!(user_id = created.id, "user created");
            Ok(created)
        }
        Err(db_error) if is_unique_violation(&db_error) => {
            debug!(email = %new_user.email, "registration rejected, email taken");
            Err(AuthError::DuplicateEmail)
        }
        Err(db_error) => Err(AuthError::Database(db_error)),
    }
}

/// Look up a user by email and check the password.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn verify_credentials<C: ConnectionTrait>(
    db: &C,
    email: &str,
    plain_password: &str,
) -> Result<user::Model> {
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    let Some(user_model) = found else {
        debug!("login attempt for unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    password::verify_password(plain_password, &user_model.password_hash)?;
    Ok(user_model)
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    use super::*;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        db
    }

    fn buyer(email: &str) -> NewUser {
        NewUser {
            name: "Bob Buyer".to_string(),
            email: email.to_string(),
            password: "pw123456".to_string(),
            role: UserRole::Buyer,
            phone: None,
        }
    }

    #[tokio::test]
    async fn create_then_verify() {
        let db = setup_db().await;

        let created = create_user(&db, buyer("b@example.com")).await.unwrap();
        assert_eq!(created.role, UserRole::Buyer);
        // Hash, not plaintext
        assert_ne!(created.password_hash, "pw123456");

        let verified = verify_credentials(&db, "b@example.com", "pw123456")
            .await
            .unwrap();
        assert_eq!(verified.id, created.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_the_same_failure() {
        let db = setup_db().await;
        create_user(&db, buyer("b@example.com")).await.unwrap();

        let wrong_password = verify_credentials(&db, "b@example.com", "pw654321")
            .await
            .unwrap_err();
        let unknown_email = verify_credentials(&db, "nobody@example.com", "pw123456")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = setup_db().await;
        create_user(&db, buyer("dup@example.com")).await.unwrap();

        let err = create_user(&db, buyer("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn same_password_hashes_differently_per_user() {
        let db = setup_db().await;
        let first = create_user(&db, buyer("one@example.com")).await.unwrap();
        let second = create_user(&db, buyer("two@example.com")).await.unwrap();
        assert_ne!(first.password_hash, second.password_hash);
    }
}
