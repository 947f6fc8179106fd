//! Create subscription table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscription::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscription::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Subscription::GoalId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Subscription::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Subscription::CurrentCycle)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Subscription::CycleStartDate).date().not_null())
                    .col(ColumnDef::new(Subscription::AnswerWhy).text())
                    .col(ColumnDef::new(Subscription::AnswerWhen).text())
                    .col(ColumnDef::new(Subscription::AnswerWhat).text())
                    .col(
                        ColumnDef::new(Subscription::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Subscription::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_user")
                            .from(Subscription::Table, Subscription::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_goal")
                            .from(Subscription::Table, Subscription::GoalId)
                            .to(Goal::Table, Goal::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one subscription per (user, goal)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_user_goal")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .col(Subscription::GoalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: goal_id (subscriber listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_goal")
                    .table(Subscription::Table)
                    .col(Subscription::GoalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscription {
    Table,
    Id,
    UserId,
    GoalId,
    Status,
    CurrentCycle,
    CycleStartDate,
    AnswerWhy,
    AnswerWhen,
    AnswerWhat,
    JoinedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Goal {
    Table,
    Id,
}
