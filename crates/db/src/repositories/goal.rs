//! Goal repository.

use std::sync::Arc;

use crate::entities::{Goal, goal};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tandem_common::{AppError, AppResult};

/// Goal repository for database operations.
#[derive(Clone)]
pub struct GoalRepository {
    db: Arc<DatabaseConnection>,
}

impl GoalRepository {
    /// Create a new goal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a goal by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<goal::Model>> {
        Goal::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a goal by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<goal::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::GoalNotFound(id.to_string()))
    }

    /// List goals, pinned first, then newest first.
    pub async fn list(&self, limit: u64) -> AppResult<Vec<goal::Model>> {
        Goal::find()
            .order_by_desc(goal::Column::IsPinned)
            .order_by_desc(goal::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List goals in a category, newest first.
    pub async fn list_by_category(&self, category: &str, limit: u64) -> AppResult<Vec<goal::Model>> {
        Goal::find()
            .filter(goal::Column::Category.eq(category))
            .order_by_desc(goal::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new goal.
    pub async fn create(&self, model: goal::ActiveModel) -> AppResult<goal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the subscriber count atomically.
    pub async fn increment_subscriber_count(&self, goal_id: &str) -> AppResult<()> {
        Goal::update_many()
            .col_expr(
                goal::Column::SubscriberCount,
                Expr::col(goal::Column::SubscriberCount).add(1),
            )
            .filter(goal::Column::Id.eq(goal_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the subscriber count atomically, clamped at zero.
    pub async fn decrement_subscriber_count(&self, goal_id: &str) -> AppResult<()> {
        Goal::update_many()
            .col_expr(
                goal::Column::SubscriberCount,
                Expr::cust("GREATEST(subscriber_count - 1, 0)"),
            )
            .filter(goal::Column::Id.eq(goal_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
