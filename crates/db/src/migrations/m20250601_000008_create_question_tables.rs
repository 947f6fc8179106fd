//! Create question, question response, and response like tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Question::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Question::Text).text().not_null())
                    .col(
                        ColumnDef::new(Question::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionResponse::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(QuestionResponse::QuestionId).string_len(32).not_null())
                    .col(ColumnDef::new(QuestionResponse::Content).text().not_null())
                    .col(
                        ColumnDef::new(QuestionResponse::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_user")
                            .from(QuestionResponse::Table, QuestionResponse::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_question")
                            .from(QuestionResponse::Table, QuestionResponse::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (question, created_at) for response feeds
        manager
            .create_index(
                Index::create()
                    .name("idx_question_response_question_created_at")
                    .table(QuestionResponse::Table)
                    .col(QuestionResponse::QuestionId)
                    .col(QuestionResponse::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionResponseLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionResponseLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionResponseLike::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(QuestionResponseLike::ResponseId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(QuestionResponseLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_like_user")
                            .from(QuestionResponseLike::Table, QuestionResponseLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_like_response")
                            .from(QuestionResponseLike::Table, QuestionResponseLike::ResponseId)
                            .to(QuestionResponse::Table, QuestionResponse::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one like per (user, response)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_response_like_user_response")
                    .table(QuestionResponseLike::Table)
                    .col(QuestionResponseLike::UserId)
                    .col(QuestionResponseLike::ResponseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionResponseLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionResponse::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
    Text,
    CreatedAt,
}

#[derive(Iden)]
enum QuestionResponse {
    Table,
    Id,
    UserId,
    QuestionId,
    Content,
    LikeCount,
    CreatedAt,
}

#[derive(Iden)]
enum QuestionResponseLike {
    Table,
    Id,
    UserId,
    ResponseId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
