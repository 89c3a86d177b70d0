use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::user;

/// Closed set of listing types. Create and update both validate against
/// this enumeration before touching the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum PropertyType {
    #[sea_orm(string_value = "house")]
    House,
    #[sea_orm(string_value = "apartment")]
    Apartment,
}

/// A listing published by exactly one agent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The agent (or admin) who owns this listing.
    pub agent_id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Asking price. Must be positive.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub price: Decimal,
    pub property_type: PropertyType,
    pub location: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub area: Option<Decimal>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A listing belongs to one agent.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AgentId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Photos are removed together with the listing.
    #[sea_orm(has_many = "super::property_photo::Entity")]
    PropertyPhoto,
    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiry,
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorite,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::property_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyPhoto.def()
    }
}

impl Related<super::inquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiry.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorite.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
