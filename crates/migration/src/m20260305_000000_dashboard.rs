//! Non-budget dashboard schema: todos, recipes with their categories and
//! cooking sessions, and the inbox notifications.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Todos {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Status,
    Priority,
    Completed,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Category,
    Ingredients,
    Directions,
    ServingSize,
    TotalTime,
    TotalTimeValue,
    TotalTimeUnit,
    Notes,
    ImageUrl,
    IsFavorite,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RecipeCategories {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Count,
    CreatedAt,
}

#[derive(Iden)]
enum CookingSessions {
    Table,
    UserId,
    RecipeId,
    IsPlaying,
    IsPaused,
    StartTime,
    PauseTime,
    TotalPauseDuration,
    CheckedSteps,
    UpdatedAt,
}

#[derive(Iden)]
enum InboxNotifications {
    Table,
    Id,
    UserId,
    Title,
    Message,
    Kind,
    Link,
    IsRead,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Todos::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Todos::UserId).string().not_null())
                    .col(ColumnDef::new(Todos::Title).string().not_null())
                    .col(ColumnDef::new(Todos::Description).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Todos::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Todos::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(Todos::Completed).boolean().not_null())
                    .col(ColumnDef::new(Todos::DueDate).date())
                    .col(ColumnDef::new(Todos::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Todos::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::UserId).string().not_null())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::Description).string().not_null().default(""))
                    .col(ColumnDef::new(Recipes::Category).string().not_null())
                    .col(ColumnDef::new(Recipes::Ingredients).json().not_null())
                    .col(ColumnDef::new(Recipes::Directions).json().not_null())
                    .col(ColumnDef::new(Recipes::ServingSize).integer().not_null().default(1))
                    .col(ColumnDef::new(Recipes::TotalTime).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Recipes::TotalTimeValue)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Recipes::TotalTimeUnit)
                            .string()
                            .not_null()
                            .default("minutes"),
                    )
                    .col(ColumnDef::new(Recipes::Notes).string())
                    .col(ColumnDef::new(Recipes::ImageUrl).string())
                    .col(ColumnDef::new(Recipes::IsFavorite).boolean().not_null())
                    .col(ColumnDef::new(Recipes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Recipes::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipes-user_id-category")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .col(Recipes::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeCategories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeCategories::UserId).string().not_null())
                    .col(ColumnDef::new(RecipeCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(RecipeCategories::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RecipeCategories::Count)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RecipeCategories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_categories-user_id-name")
                    .table(RecipeCategories::Table)
                    .col(RecipeCategories::UserId)
                    .col(RecipeCategories::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CookingSessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CookingSessions::UserId).string().not_null())
                    .col(ColumnDef::new(CookingSessions::RecipeId).string().not_null())
                    .col(ColumnDef::new(CookingSessions::IsPlaying).boolean().not_null())
                    .col(ColumnDef::new(CookingSessions::IsPaused).boolean().not_null())
                    .col(ColumnDef::new(CookingSessions::StartTime).string())
                    .col(ColumnDef::new(CookingSessions::PauseTime).string())
                    .col(
                        ColumnDef::new(CookingSessions::TotalPauseDuration)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CookingSessions::CheckedSteps).json().not_null())
                    .col(
                        ColumnDef::new(CookingSessions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CookingSessions::UserId)
                            .col(CookingSessions::RecipeId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InboxNotifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InboxNotifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InboxNotifications::UserId).string().not_null())
                    .col(ColumnDef::new(InboxNotifications::Title).string().not_null())
                    .col(ColumnDef::new(InboxNotifications::Message).string().not_null())
                    .col(
                        ColumnDef::new(InboxNotifications::Kind)
                            .string()
                            .not_null()
                            .default("info"),
                    )
                    .col(ColumnDef::new(InboxNotifications::Link).string())
                    .col(ColumnDef::new(InboxNotifications::IsRead).boolean().not_null())
                    .col(
                        ColumnDef::new(InboxNotifications::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InboxNotifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CookingSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Todos::Table).to_owned())
            .await?;
        Ok(())
    }
}
