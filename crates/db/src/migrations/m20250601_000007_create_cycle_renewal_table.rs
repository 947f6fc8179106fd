//! Create cycle renewal table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CycleRenewal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CycleRenewal::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CycleRenewal::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(CycleRenewal::GoalId).string_len(32).not_null())
                    .col(ColumnDef::new(CycleRenewal::SubscriptionId).string_len(32).not_null())
                    .col(ColumnDef::new(CycleRenewal::CycleNumber).integer().not_null())
                    .col(ColumnDef::new(CycleRenewal::CycleWhy).text())
                    .col(ColumnDef::new(CycleRenewal::WorkSchedule).text())
                    .col(ColumnDef::new(CycleRenewal::Goals).text())
                    .col(
                        ColumnDef::new(CycleRenewal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cycle_renewal_user")
                            .from(CycleRenewal::Table, CycleRenewal::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cycle_renewal_subscription")
                            .from(CycleRenewal::Table, CycleRenewal::SubscriptionId)
                            .to(Subscription::Table, Subscription::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one renewal per (subscription, cycle)
        manager
            .create_index(
                Index::create()
                    .name("idx_cycle_renewal_subscription_cycle")
                    .table(CycleRenewal::Table)
                    .col(CycleRenewal::SubscriptionId)
                    .col(CycleRenewal::CycleNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CycleRenewal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CycleRenewal {
    Table,
    Id,
    UserId,
    GoalId,
    SubscriptionId,
    CycleNumber,
    CycleWhy,
    WorkSchedule,
    Goals,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Subscription {
    Table,
    Id,
}
