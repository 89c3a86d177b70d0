use thiserror::Error;

/// Error types for the auth module
#[derive(Error, Debug)]
pub enum AuthError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Wrong email or wrong password. Deliberately a single variant so
    /// callers cannot tell which one it was.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, expired, or tampered token
    #[error("Missing or invalid authentication token")]
    Unauthenticated,

    /// Authenticated, but the role/ownership rules say no
    #[error("Insufficient permissions")]
    Forbidden,

    /// Role string outside the fixed enumeration
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Email uniqueness violation surfaced by the storage layer
    #[error("Email already registered")]
    DuplicateEmail,

    /// Error from password hashing
    #[error("Password hashing error: {0}")]
    Hash(String),

    /// Error while signing a token
    #[error("Token signing error: {0}")]
    Token(String),
}

/// Type alias for Result with AuthError
pub type Result<T> = std::result::Result<T, AuthError>;

/// Whether a database error is a uniqueness-constraint violation.
///
/// SQLite and Postgres word these differently; matching on the message
/// covers both drivers the same way the rest of the stack does.
pub fn is_unique_violation(db_error: &sea_orm::DbErr) -> bool {
    let msg = db_error.to_string().to_lowercase();
    msg.contains("unique") || msg.contains("constraint")
}
