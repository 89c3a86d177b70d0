use sea_orm::entity::prelude::*;

/// Coarse-grained capability class. Stored as a lowercase string so the
/// column stays readable in raw SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "buyer")]
    Buyer,
    #[sea_orm(string_value = "agent")]
    Agent,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Account for a buyer, an agent, or an administrator.
///
/// The role is fixed at creation; profile updates may touch name, phone and
/// password only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Uniqueness is enforced by the database, not by a pre-insert check.
    #[sea_orm(unique)]
    pub email: String,
    /// PHC-format Argon2 hash. Never the plaintext password.
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Listings published by this user (agents only).
    #[sea_orm(has_many = "super::property::Entity")]
    Property,
    /// Inquiries this user has sent as a buyer.
    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiry,
    /// Properties this user has saved.
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorite,
}

impl ActiveModelBehavior for ActiveModel {}
