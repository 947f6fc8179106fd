//! Create reflection and reflection like tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reflection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reflection::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reflection::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Reflection::GoalId).string_len(32).not_null())
                    .col(ColumnDef::new(Reflection::Content).text().not_null())
                    .col(ColumnDef::new(Reflection::LikeCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Reflection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reflection_user")
                            .from(Reflection::Table, Reflection::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reflection_goal")
                            .from(Reflection::Table, Reflection::GoalId)
                            .to(Goal::Table, Goal::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (goal, created_at) for goal feeds
        manager
            .create_index(
                Index::create()
                    .name("idx_reflection_goal_created_at")
                    .table(Reflection::Table)
                    .col(Reflection::GoalId)
                    .col(Reflection::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (profile stats)
        manager
            .create_index(
                Index::create()
                    .name("idx_reflection_user")
                    .table(Reflection::Table)
                    .col(Reflection::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReflectionLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReflectionLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReflectionLike::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ReflectionLike::ReflectionId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ReflectionLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reflection_like_user")
                            .from(ReflectionLike::Table, ReflectionLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reflection_like_reflection")
                            .from(ReflectionLike::Table, ReflectionLike::ReflectionId)
                            .to(Reflection::Table, Reflection::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one like per (user, reflection)
        manager
            .create_index(
                Index::create()
                    .name("idx_reflection_like_user_reflection")
                    .table(ReflectionLike::Table)
                    .col(ReflectionLike::UserId)
                    .col(ReflectionLike::ReflectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReflectionLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reflection::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reflection {
    Table,
    Id,
    UserId,
    GoalId,
    Content,
    LikeCount,
    CreatedAt,
}

#[derive(Iden)]
enum ReflectionLike {
    Table,
    Id,
    UserId,
    ReflectionId,
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
