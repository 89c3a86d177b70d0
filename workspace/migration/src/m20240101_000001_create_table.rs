use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 20))
                    .col(string_null(Users::Phone))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(pk_auto(Properties::Id))
                    .col(integer(Properties::AgentId))
                    .col(string(Properties::Title))
                    .col(text_null(Properties::Description))
                    .col(decimal(Properties::Price).decimal_len(15, 2))
                    .col(string_len(Properties::PropertyType, 50))
                    .col(string(Properties::Location))
                    .col(integer_null(Properties::Bedrooms))
                    .col(integer_null(Properties::Bathrooms))
                    .col(decimal_null(Properties::Area).decimal_len(10, 2))
                    .col(timestamp_with_time_zone(Properties::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_agent")
                            .from(Properties::Table, Properties::AgentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create property_photos table
        manager
            .create_table(
                Table::create()
                    .table(PropertyPhotos::Table)
                    .if_not_exists()
                    .col(pk_auto(PropertyPhotos::Id))
                    .col(integer(PropertyPhotos::PropertyId))
                    .col(string_len(PropertyPhotos::PhotoUrl, 500))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_photo_property")
                            .from(PropertyPhotos::Table, PropertyPhotos::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create inquiries table
        manager
            .create_table(
                Table::create()
                    .table(Inquiries::Table)
                    .if_not_exists()
                    .col(pk_auto(Inquiries::Id))
                    .col(integer(Inquiries::PropertyId))
                    .col(integer(Inquiries::BuyerId))
                    .col(text(Inquiries::Message))
                    .col(timestamp_with_time_zone(Inquiries::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_property")
                            .from(Inquiries::Table, Inquiries::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_buyer")
                            .from(Inquiries::Table, Inquiries::BuyerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create favorites table
        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(pk_auto(Favorites::Id))
                    .col(integer(Favorites::UserId))
                    .col(integer(Favorites::PropertyId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_user")
                            .from(Favorites::Table, Favorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_property")
                            .from(Favorites::Table, Favorites::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One favorite row per (user, property) pair; the constraint, not
        // application code, decides races between concurrent inserts.
        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_user_property")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::PropertyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Favorites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Inquiries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PropertyPhotos::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Phone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    AgentId,
    Title,
    Description,
    Price,
    PropertyType,
    Location,
    Bedrooms,
    Bathrooms,
    Area,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PropertyPhotos {
    Table,
    Id,
    PropertyId,
    PhotoUrl,
}

#[derive(DeriveIden)]
enum Inquiries {
    Table,
    Id,
    PropertyId,
    BuyerId,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Id,
    UserId,
    PropertyId,
}
