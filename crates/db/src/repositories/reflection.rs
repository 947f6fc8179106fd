//! Reflection repositories.

use std::sync::Arc;

use crate::entities::{Reflection, ReflectionLike, reflection, reflection_like};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tandem_common::{AppError, AppResult};

/// Reflection repository for database operations.
#[derive(Clone)]
pub struct ReflectionRepository {
    db: Arc<DatabaseConnection>,
}

impl ReflectionRepository {
    /// Create a new reflection repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a reflection by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<reflection::Model>> {
        Reflection::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a reflection by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<reflection::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reflection not found: {id}")))
    }

    /// Reflections posted on a goal, newest first.
    pub async fn find_by_goal(&self, goal_id: &str, limit: u64) -> AppResult<Vec<reflection::Model>> {
        Reflection::find()
            .filter(reflection::Column::GoalId.eq(goal_id))
            .order_by_desc(reflection::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total reflections a user has posted.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Reflection::find()
            .filter(reflection::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reflection.
    pub async fn create(&self, model: reflection::ActiveModel) -> AppResult<reflection::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the like count atomically.
    pub async fn increment_like_count(&self, reflection_id: &str) -> AppResult<()> {
        Reflection::update_many()
            .col_expr(
                reflection::Column::LikeCount,
                Expr::col(reflection::Column::LikeCount).add(1),
            )
            .filter(reflection::Column::Id.eq(reflection_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the like count atomically, clamped at zero.
    pub async fn decrement_like_count(&self, reflection_id: &str) -> AppResult<()> {
        Reflection::update_many()
            .col_expr(
                reflection::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            )
            .filter(reflection::Column::Id.eq(reflection_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Reflection like repository for database operations.
#[derive(Clone)]
pub struct ReflectionLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ReflectionLikeRepository {
    /// Create a new reflection like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and reflection.
    pub async fn find_by_user_and_reflection(
        &self,
        user_id: &str,
        reflection_id: &str,
    ) -> AppResult<Option<reflection_like::Model>> {
        ReflectionLike::find()
            .filter(reflection_like::Column::UserId.eq(user_id))
            .filter(reflection_like::Column::ReflectionId.eq(reflection_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new like.
    pub async fn create(
        &self,
        model: reflection_like::ActiveModel,
    ) -> AppResult<reflection_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a like by user and reflection. Returns how many rows were deleted.
    pub async fn delete_by_user_and_reflection(
        &self,
        user_id: &str,
        reflection_id: &str,
    ) -> AppResult<u64> {
        let result = ReflectionLike::delete_many()
            .filter(reflection_like::Column::UserId.eq(user_id))
            .filter(reflection_like::Column::ReflectionId.eq(reflection_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
