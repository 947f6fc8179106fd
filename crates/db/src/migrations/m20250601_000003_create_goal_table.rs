//! Create goal table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Goal::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goal::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Goal::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Goal::Description).text())
                    .col(ColumnDef::new(Goal::Category).string_len(64))
                    .col(ColumnDef::new(Goal::Color).string_len(32))
                    .col(ColumnDef::new(Goal::Icon).string_len(64))
                    .col(ColumnDef::new(Goal::CreatedBy).string_len(32))
                    .col(ColumnDef::new(Goal::SubscriberCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Goal::IsPinned).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Goal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Goal::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: category
        manager
            .create_index(
                Index::create()
                    .name("idx_goal_category")
                    .table(Goal::Table)
                    .col(Goal::Category)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_goal_created_at")
                    .table(Goal::Table)
                    .col(Goal::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Goal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Goal {
    Table,
    Id,
    Title,
    Description,
    Category,
    Color,
    Icon,
    CreatedBy,
    SubscriberCount,
    IsPinned,
    CreatedAt,
    UpdatedAt,
}
