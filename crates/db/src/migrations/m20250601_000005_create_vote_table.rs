//! Create vote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vote::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Vote::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::GoalId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::SubscriptionId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::CycleNumber).integer().not_null())
                    .col(ColumnDef::new(Vote::Answer).string_len(8).not_null())
                    .col(ColumnDef::new(Vote::Date).date().not_null())
                    .col(ColumnDef::new(Vote::Quantity).integer())
                    .col(ColumnDef::new(Vote::HasReflection).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Vote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_user")
                            .from(Vote::Table, Vote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_goal")
                            .from(Vote::Table, Vote::GoalId)
                            .to(Goal::Table, Goal::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_subscription")
                            .from(Vote::Table, Vote::SubscriptionId)
                            .to(Subscription::Table, Subscription::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one vote per (user, goal, day)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_user_goal_date")
                    .table(Vote::Table)
                    .col(Vote::UserId)
                    .col(Vote::GoalId)
                    .col(Vote::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (user, goal, cycle) for per-cycle history queries
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_user_goal_cycle")
                    .table(Vote::Table)
                    .col(Vote::UserId)
                    .col(Vote::GoalId)
                    .col(Vote::CycleNumber)
                    .to_owned(),
            )
            .await?;

        // Index: goal_id (goal-wide vote statistics)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_goal")
                    .table(Vote::Table)
                    .col(Vote::GoalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    Id,
    UserId,
    GoalId,
    SubscriptionId,
    CycleNumber,
    Answer,
    Date,
    Quantity,
    HasReflection,
    CreatedAt,
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

#[derive(Iden)]
enum Subscription {
    Table,
    Id,
}
