//! Goal service.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tandem_common::{AppResult, IdGenerator};
use tandem_db::{
    entities::{goal, vote::VoteAnswer},
    repositories::{GoalRepository, VoteRepository},
};
use validator::Validate;

/// Goal service for business logic.
#[derive(Clone)]
pub struct GoalService {
    goal_repo: GoalRepository,
    vote_repo: VoteRepository,
    id_gen: IdGenerator,
}

/// Input for creating a goal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(max = 2048))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub category: Option<String>,

    #[validate(length(max = 32))]
    pub color: Option<String>,

    #[validate(length(max = 64))]
    pub icon: Option<String>,
}

/// Vote totals across all subscribers of a goal.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalVoteStats {
    pub total_votes: u64,
    pub yes_votes: u64,
    pub no_votes: u64,
}

/// A goal together with its computed vote statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithStats {
    #[serde(flatten)]
    pub goal: goal::Model,
    pub vote_stats: GoalVoteStats,
}

impl GoalService {
    /// Create a new goal service.
    #[must_use]
    pub const fn new(goal_repo: GoalRepository, vote_repo: VoteRepository) -> Self {
        Self {
            goal_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a goal.
    pub async fn create(&self, user_id: &str, input: CreateGoalInput) -> AppResult<goal::Model> {
        input.validate()?;

        let model = goal::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            category: Set(input.category),
            color: Set(input.color),
            icon: Set(input.icon),
            created_by: Set(Some(user_id.to_string())),
            ..Default::default()
        };

        self.goal_repo.create(model).await
    }

    /// Get a goal by ID.
    pub async fn get(&self, id: &str) -> AppResult<goal::Model> {
        self.goal_repo.get_by_id(id).await
    }

    /// Get a goal with its vote statistics.
    pub async fn get_with_stats(&self, id: &str) -> AppResult<GoalWithStats> {
        let goal = self.goal_repo.get_by_id(id).await?;
        let vote_stats = self.vote_stats(&goal.id).await?;
        Ok(GoalWithStats { goal, vote_stats })
    }

    /// List goals with vote statistics, pinned first.
    pub async fn list(&self, limit: u64) -> AppResult<Vec<GoalWithStats>> {
        let goals = self.goal_repo.list(limit).await?;
        self.with_stats(goals).await
    }

    /// List goals in a category with vote statistics.
    pub async fn list_by_category(
        &self,
        category: &str,
        limit: u64,
    ) -> AppResult<Vec<GoalWithStats>> {
        let goals = self.goal_repo.list_by_category(category, limit).await?;
        self.with_stats(goals).await
    }

    async fn with_stats(&self, goals: Vec<goal::Model>) -> AppResult<Vec<GoalWithStats>> {
        let mut result = Vec::with_capacity(goals.len());
        for goal in goals {
            let vote_stats = self.vote_stats(&goal.id).await?;
            result.push(GoalWithStats { goal, vote_stats });
        }
        Ok(result)
    }

    async fn vote_stats(&self, goal_id: &str) -> AppResult<GoalVoteStats> {
        let total_votes = self.vote_repo.count_by_goal(goal_id).await?;
        let yes_votes = self
            .vote_repo
            .count_by_goal_and_answer(goal_id, VoteAnswer::Yes)
            .await?;

        Ok(GoalVoteStats {
            total_votes,
            yes_votes,
            no_votes: total_votes - yes_votes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tandem_common::AppError;

    #[tokio::test]
    async fn test_get_goal_not_found() {
        let goal_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<goal::Model>::new()])
                .into_connection(),
        );
        let vote_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = GoalService::new(GoalRepository::new(goal_db), VoteRepository::new(vote_db));

        let result = service.get("nonexistent").await;
        match result {
            Err(AppError::GoalNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected GoalNotFound error"),
        }
    }

    #[test]
    fn test_create_goal_input_validation() {
        let input = CreateGoalInput {
            title: String::new(),
            description: None,
            category: None,
            color: None,
            icon: None,
        };
        assert!(input.validate().is_err());

        let input = CreateGoalInput {
            title: "Read every day".to_string(),
            description: Some("At least ten pages".to_string()),
            category: Some("learning".to_string()),
            color: Some("#4caf50".to_string()),
            icon: Some("book".to_string()),
        };
        assert!(input.validate().is_ok());
    }
}
