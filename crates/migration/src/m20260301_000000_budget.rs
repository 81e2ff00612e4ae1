//! Budget schema: recurring templates, month buckets and their instances,
//! the flat legacy budget items, and the derived notification/event records.
//!
//! Month buckets are stored one row per instance (`monthly_transactions`)
//! plus a marker row per materialized month (`budget_months`), so appending
//! to or removing from a bucket is a single-row write.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum BudgetTemplates {
    Table,
    Id,
    UserId,
    Source,
    Category,
    Purpose,
    DueDay,
    DateType,
    DynamicRule,
    Amount,
    ExpectedAmount,
    Target,
    CurrentAmount,
    StepupDate,
    StepupAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BudgetMonths {
    Table,
    UserId,
    MonthKey,
    CreatedAt,
}

#[derive(Iden)]
enum MonthlyTransactions {
    Table,
    Seq,
    Id,
    UserId,
    MonthKey,
    TemplateId,
    Source,
    Category,
    Purpose,
    DueDay,
    DateType,
    DynamicRule,
    Amount,
    ExpectedAmount,
    Target,
    CurrentAmount,
    StepupDate,
    StepupAmount,
    IsCustomized,
    UpdatedAt,
}

#[derive(Iden)]
enum BudgetTransactions {
    Table,
    Id,
    UserId,
    Source,
    Category,
    Purpose,
    DueDay,
    Amount,
    ExpectedAmount,
    Target,
    CurrentAmount,
    StepupDate,
    StepupAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    DueDate,
    Priority,
    RepeatType,
    SourceType,
    SourceId,
    Category,
    MonthKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    UserId,
    Title,
    Date,
    Priority,
    RepeatType,
    SourceType,
    SourceId,
    Category,
    MonthKey,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Templates
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetTemplates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetTemplates::UserId).string().not_null())
                    .col(ColumnDef::new(BudgetTemplates::Source).string().not_null())
                    .col(ColumnDef::new(BudgetTemplates::Category).string().not_null())
                    .col(ColumnDef::new(BudgetTemplates::Purpose).string().not_null())
                    .col(ColumnDef::new(BudgetTemplates::DueDay).integer().not_null())
                    .col(
                        ColumnDef::new(BudgetTemplates::DateType)
                            .string()
                            .not_null()
                            .default("fixed"),
                    )
                    .col(
                        ColumnDef::new(BudgetTemplates::DynamicRule)
                            .string()
                            .not_null()
                            .default("next"),
                    )
                    .col(ColumnDef::new(BudgetTemplates::Amount).double().not_null())
                    .col(
                        ColumnDef::new(BudgetTemplates::ExpectedAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(BudgetTemplates::Target).double())
                    .col(ColumnDef::new(BudgetTemplates::CurrentAmount).double())
                    .col(ColumnDef::new(BudgetTemplates::StepupDate).string())
                    .col(ColumnDef::new(BudgetTemplates::StepupAmount).double())
                    .col(
                        ColumnDef::new(BudgetTemplates::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetTemplates::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_templates-user_id")
                    .table(BudgetTemplates::Table)
                    .col(BudgetTemplates::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Month bucket markers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetMonths::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BudgetMonths::UserId).string().not_null())
                    .col(ColumnDef::new(BudgetMonths::MonthKey).string().not_null())
                    .col(ColumnDef::new(BudgetMonths::CreatedAt).timestamp().not_null())
                    .primary_key(
                        Index::create()
                            .col(BudgetMonths::UserId)
                            .col(BudgetMonths::MonthKey),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Month instances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MonthlyTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyTransactions::Seq)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyTransactions::Id).string().not_null())
                    .col(ColumnDef::new(MonthlyTransactions::UserId).string().not_null())
                    .col(
                        ColumnDef::new(MonthlyTransactions::MonthKey)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyTransactions::TemplateId).string())
                    .col(ColumnDef::new(MonthlyTransactions::Source).string().not_null())
                    .col(
                        ColumnDef::new(MonthlyTransactions::Category)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyTransactions::Purpose).string().not_null())
                    .col(ColumnDef::new(MonthlyTransactions::DueDay).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyTransactions::DateType)
                            .string()
                            .not_null()
                            .default("fixed"),
                    )
                    .col(
                        ColumnDef::new(MonthlyTransactions::DynamicRule)
                            .string()
                            .not_null()
                            .default("next"),
                    )
                    .col(ColumnDef::new(MonthlyTransactions::Amount).double().not_null())
                    .col(
                        ColumnDef::new(MonthlyTransactions::ExpectedAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(MonthlyTransactions::Target).double())
                    .col(ColumnDef::new(MonthlyTransactions::CurrentAmount).double())
                    .col(ColumnDef::new(MonthlyTransactions::StepupDate).string())
                    .col(ColumnDef::new(MonthlyTransactions::StepupAmount).double())
                    .col(
                        ColumnDef::new(MonthlyTransactions::IsCustomized)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyTransactions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-monthly_transactions-bucket")
                            .from(
                                MonthlyTransactions::Table,
                                (MonthlyTransactions::UserId, MonthlyTransactions::MonthKey),
                            )
                            .to(
                                BudgetMonths::Table,
                                (BudgetMonths::UserId, BudgetMonths::MonthKey),
                            )
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-monthly_transactions-bucket-id-unique")
                    .table(MonthlyTransactions::Table)
                    .col(MonthlyTransactions::UserId)
                    .col(MonthlyTransactions::MonthKey)
                    .col(MonthlyTransactions::Id)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-monthly_transactions-template_id")
                    .table(MonthlyTransactions::Table)
                    .col(MonthlyTransactions::UserId)
                    .col(MonthlyTransactions::TemplateId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Flat budget items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetTransactions::UserId).string().not_null())
                    .col(ColumnDef::new(BudgetTransactions::Source).string().not_null())
                    .col(
                        ColumnDef::new(BudgetTransactions::Category)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BudgetTransactions::Purpose).string().not_null())
                    .col(ColumnDef::new(BudgetTransactions::DueDay).integer().not_null())
                    .col(ColumnDef::new(BudgetTransactions::Amount).double().not_null())
                    .col(ColumnDef::new(BudgetTransactions::ExpectedAmount).double())
                    .col(ColumnDef::new(BudgetTransactions::Target).double())
                    .col(ColumnDef::new(BudgetTransactions::CurrentAmount).double())
                    .col(ColumnDef::new(BudgetTransactions::StepupDate).string())
                    .col(ColumnDef::new(BudgetTransactions::StepupAmount).double())
                    .col(
                        ColumnDef::new(BudgetTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Derived notifications
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::DueDate).date().not_null())
                    .col(ColumnDef::new(Notifications::Priority).string().not_null())
                    .col(ColumnDef::new(Notifications::RepeatType).string().not_null())
                    .col(ColumnDef::new(Notifications::SourceType).string().not_null())
                    .col(ColumnDef::new(Notifications::SourceId).string().not_null())
                    .col(ColumnDef::new(Notifications::Category).string().not_null())
                    .col(ColumnDef::new(Notifications::MonthKey).string())
                    .col(ColumnDef::new(Notifications::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Notifications::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-source")
                    .table(Notifications::Table)
                    .col(Notifications::SourceType)
                    .col(Notifications::SourceId)
                    .col(Notifications::MonthKey)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-user_id-due_date")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::DueDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Derived calendar events
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Events::UserId).string().not_null())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Date).date().not_null())
                    .col(ColumnDef::new(Events::Priority).string().not_null())
                    .col(ColumnDef::new(Events::RepeatType).string().not_null())
                    .col(ColumnDef::new(Events::SourceType).string().not_null())
                    .col(ColumnDef::new(Events::SourceId).string().not_null())
                    .col(ColumnDef::new(Events::Category).string().not_null())
                    .col(ColumnDef::new(Events::MonthKey).string())
                    .col(
                        ColumnDef::new(Events::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Events::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-source")
                    .table(Events::Table)
                    .col(Events::SourceType)
                    .col(Events::SourceId)
                    .col(Events::MonthKey)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-user_id-date")
                    .table(Events::Table)
                    .col(Events::UserId)
                    .col(Events::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetMonths::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetTemplates::Table).to_owned())
            .await?;
        Ok(())
    }
}
