//! Vote repository.

use std::sync::Arc;

use crate::entities::{Vote, vote, vote::VoteAnswer};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use tandem_common::{AppError, AppResult};

/// Vote repository for database operations.
///
/// Votes are append-only. A user casts at most one vote per goal per day,
/// enforced by a unique index over (user_id, goal_id, date).
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All votes a user has cast on a goal, oldest first.
    pub async fn find_by_user_and_goal(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::GoalId.eq(goal_id))
            .order_by_asc(vote::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Votes a user cast on a goal within one cycle, oldest first.
    pub async fn find_by_user_goal_cycle(
        &self,
        user_id: &str,
        goal_id: &str,
        cycle_number: i32,
    ) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::GoalId.eq(goal_id))
            .filter(vote::Column::CycleNumber.eq(cycle_number))
            .order_by_asc(vote::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's vote on a goal for a specific day.
    pub async fn find_by_user_goal_date(
        &self,
        user_id: &str,
        goal_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::GoalId.eq(goal_id))
            .filter(vote::Column::Date.eq(date))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a vote. A duplicate (user, goal, date) maps to a conflict.
    pub async fn create(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Conflict("Already voted on this goal today".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Total votes a user has cast across all goals.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total votes cast on a goal by everyone.
    pub async fn count_by_goal(&self, goal_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::GoalId.eq(goal_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Votes with a given answer cast on a goal by everyone.
    pub async fn count_by_goal_and_answer(
        &self,
        goal_id: &str,
        answer: VoteAnswer,
    ) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::GoalId.eq(goal_id))
            .filter(vote::Column::Answer.eq(answer))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
