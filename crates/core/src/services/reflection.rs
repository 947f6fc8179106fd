//! Reflection service.

use sea_orm::Set;
use serde::Deserialize;
use tandem_common::{AppResult, IdGenerator};
use tandem_db::{
    entities::{reflection, reflection_like},
    repositories::{GoalRepository, ReflectionLikeRepository, ReflectionRepository},
};
use validator::Validate;

/// Reflection service for business logic.
#[derive(Clone)]
pub struct ReflectionService {
    reflection_repo: ReflectionRepository,
    like_repo: ReflectionLikeRepository,
    goal_repo: GoalRepository,
    id_gen: IdGenerator,
}

/// Input for posting a reflection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostReflectionInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

impl ReflectionService {
    /// Create a new reflection service.
    #[must_use]
    pub const fn new(
        reflection_repo: ReflectionRepository,
        like_repo: ReflectionLikeRepository,
        goal_repo: GoalRepository,
    ) -> Self {
        Self {
            reflection_repo,
            like_repo,
            goal_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a reflection on a goal.
    pub async fn post(
        &self,
        user_id: &str,
        goal_id: &str,
        input: PostReflectionInput,
    ) -> AppResult<reflection::Model> {
        input.validate()?;

        // Goal must exist
        self.goal_repo.get_by_id(goal_id).await?;

        let model = reflection::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            goal_id: Set(goal_id.to_string()),
            content: Set(input.content),
            ..Default::default()
        };

        self.reflection_repo.create(model).await
    }

    /// Get a reflection by ID.
    pub async fn get(&self, id: &str) -> AppResult<reflection::Model> {
        self.reflection_repo.get_by_id(id).await
    }

    /// Reflections posted on a goal, newest first.
    pub async fn list_by_goal(
        &self,
        goal_id: &str,
        limit: u64,
    ) -> AppResult<Vec<reflection::Model>> {
        self.reflection_repo.find_by_goal(goal_id, limit).await
    }

    /// Toggle a like on a reflection. Returns true when the like now exists.
    pub async fn toggle_like(&self, user_id: &str, reflection_id: &str) -> AppResult<bool> {
        // Reflection must exist
        self.reflection_repo.get_by_id(reflection_id).await?;

        if self
            .like_repo
            .find_by_user_and_reflection(user_id, reflection_id)
            .await?
            .is_some()
        {
            let deleted = self
                .like_repo
                .delete_by_user_and_reflection(user_id, reflection_id)
                .await?;
            if deleted > 0 {
                self.reflection_repo
                    .decrement_like_count(reflection_id)
                    .await?;
            }
            return Ok(false);
        }

        let model = reflection_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            reflection_id: Set(reflection_id.to_string()),
            ..Default::default()
        };
        self.like_repo.create(model).await?;
        self.reflection_repo
            .increment_like_count(reflection_id)
            .await?;

        Ok(true)
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use tandem_common::AppError;

    fn create_test_reflection(id: &str, user_id: &str) -> reflection::Model {
        reflection::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            goal_id: "goal1".to_string(),
            content: "Kept at it today".to_string(),
            like_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_like(id: &str, user_id: &str, reflection_id: &str) -> reflection_like::Model {
        reflection_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            reflection_id: reflection_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_toggle_like_on_missing_reflection() {
        let reflection_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reflection::Model>::new()])
                .into_connection(),
        );

        let service = ReflectionService::new(
            ReflectionRepository::new(reflection_db),
            ReflectionLikeRepository::new(empty_db()),
            GoalRepository::new(empty_db()),
        );

        let result = service.toggle_like("user1", "missing").await;
        match result {
            Err(AppError::NotFound(_)) => {}
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_toggle_like_removes_existing_like() {
        let reflection = create_test_reflection("ref1", "author1");
        let like = create_test_like("like1", "user1", "ref1");

        let reflection_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reflection]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = ReflectionService::new(
            ReflectionRepository::new(reflection_db),
            ReflectionLikeRepository::new(like_db),
            GoalRepository::new(empty_db()),
        );

        let liked = service.toggle_like("user1", "ref1").await.unwrap();
        assert!(!liked);
    }

    #[test]
    fn test_post_reflection_input_validation() {
        let input = PostReflectionInput {
            content: String::new(),
        };
        assert!(input.validate().is_err());

        let input = PostReflectionInput {
            content: "a".repeat(3000),
        };
        assert!(input.validate().is_err());

        let input = PostReflectionInput {
            content: "Small win today".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
