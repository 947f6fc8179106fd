//! Question and question response repositories.

use std::sync::Arc;

use crate::entities::{
    Question, QuestionResponse, QuestionResponseLike, question, question_response,
    question_response_like,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tandem_common::{AppError, AppResult};

/// Question repository for database operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a question by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<question::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question not found: {id}")))
    }

    /// List questions, newest first.
    pub async fn list(&self, limit: u64) -> AppResult<Vec<question::Model>> {
        Question::find()
            .order_by_desc(question::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new question.
    pub async fn create(&self, model: question::ActiveModel) -> AppResult<question::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Question response repository for database operations.
#[derive(Clone)]
pub struct QuestionResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionResponseRepository {
    /// Create a new question response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a response by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<question_response::Model>> {
        QuestionResponse::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a response by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<question_response::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Response not found: {id}")))
    }

    /// Responses to a question, newest first.
    pub async fn find_by_question(
        &self,
        question_id: &str,
        limit: u64,
    ) -> AppResult<Vec<question_response::Model>> {
        QuestionResponse::find()
            .filter(question_response::Column::QuestionId.eq(question_id))
            .order_by_desc(question_response::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new response.
    pub async fn create(
        &self,
        model: question_response::ActiveModel,
    ) -> AppResult<question_response::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the like count atomically.
    pub async fn increment_like_count(&self, response_id: &str) -> AppResult<()> {
        QuestionResponse::update_many()
            .col_expr(
                question_response::Column::LikeCount,
                Expr::col(question_response::Column::LikeCount).add(1),
            )
            .filter(question_response::Column::Id.eq(response_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the like count atomically, clamped at zero.
    pub async fn decrement_like_count(&self, response_id: &str) -> AppResult<()> {
        QuestionResponse::update_many()
            .col_expr(
                question_response::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            )
            .filter(question_response::Column::Id.eq(response_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Question response like repository for database operations.
#[derive(Clone)]
pub struct QuestionResponseLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionResponseLikeRepository {
    /// Create a new question response like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and response.
    pub async fn find_by_user_and_response(
        &self,
        user_id: &str,
        response_id: &str,
    ) -> AppResult<Option<question_response_like::Model>> {
        QuestionResponseLike::find()
            .filter(question_response_like::Column::UserId.eq(user_id))
            .filter(question_response_like::Column::ResponseId.eq(response_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new like.
    pub async fn create(
        &self,
        model: question_response_like::ActiveModel,
    ) -> AppResult<question_response_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a like by user and response. Returns how many rows were deleted.
    pub async fn delete_by_user_and_response(
        &self,
        user_id: &str,
        response_id: &str,
    ) -> AppResult<u64> {
        let result = QuestionResponseLike::delete_many()
            .filter(question_response_like::Column::UserId.eq(user_id))
            .filter(question_response_like::Column::ResponseId.eq(response_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
