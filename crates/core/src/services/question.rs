//! Question service.
//!
//! Community prompts with user responses and response likes.

use sea_orm::Set;
use serde::Deserialize;
use tandem_common::{AppResult, IdGenerator};
use tandem_db::{
    entities::{question, question_response, question_response_like},
    repositories::{
        QuestionRepository, QuestionResponseLikeRepository, QuestionResponseRepository,
    },
};
use validator::Validate;

/// Question service for business logic.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    response_repo: QuestionResponseRepository,
    like_repo: QuestionResponseLikeRepository,
    id_gen: IdGenerator,
}

/// Input for responding to a question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub const fn new(
        question_repo: QuestionRepository,
        response_repo: QuestionResponseRepository,
        like_repo: QuestionResponseLikeRepository,
    ) -> Self {
        Self {
            question_repo,
            response_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List questions, newest first.
    pub async fn list(&self, limit: u64) -> AppResult<Vec<question::Model>> {
        self.question_repo.list(limit).await
    }

    /// Responses to a question, newest first.
    pub async fn responses(
        &self,
        question_id: &str,
        limit: u64,
    ) -> AppResult<Vec<question_response::Model>> {
        self.question_repo.get_by_id(question_id).await?;
        self.response_repo.find_by_question(question_id, limit).await
    }

    /// Post a response to a question.
    pub async fn respond(
        &self,
        user_id: &str,
        question_id: &str,
        input: RespondInput,
    ) -> AppResult<question_response::Model> {
        input.validate()?;

        self.question_repo.get_by_id(question_id).await?;

        let model = question_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            question_id: Set(question_id.to_string()),
            content: Set(input.content),
            ..Default::default()
        };

        self.response_repo.create(model).await
    }

    /// Toggle a like on a response. Returns true when the like now exists.
    pub async fn toggle_response_like(&self, user_id: &str, response_id: &str) -> AppResult<bool> {
        self.response_repo.get_by_id(response_id).await?;

        if self
            .like_repo
            .find_by_user_and_response(user_id, response_id)
            .await?
            .is_some()
        {
            let deleted = self
                .like_repo
                .delete_by_user_and_response(user_id, response_id)
                .await?;
            if deleted > 0 {
                self.response_repo.decrement_like_count(response_id).await?;
            }
            return Ok(false);
        }

        let model = question_response_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            response_id: Set(response_id.to_string()),
            ..Default::default()
        };
        self.like_repo.create(model).await?;
        self.response_repo.increment_like_count(response_id).await?;

        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tandem_common::AppError;

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_respond_to_missing_question() {
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<question::Model>::new()])
                .into_connection(),
        );

        let service = QuestionService::new(
            QuestionRepository::new(question_db),
            QuestionResponseRepository::new(empty_db()),
            QuestionResponseLikeRepository::new(empty_db()),
        );

        let result = service
            .respond(
                "user1",
                "missing",
                RespondInput {
                    content: "My answer".to_string(),
                },
            )
            .await;
        match result {
            Err(AppError::NotFound(_)) => {}
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_respond_input_validation() {
        let input = RespondInput {
            content: String::new(),
        };
        assert!(input.validate().is_err());

        let input = RespondInput {
            content: "One step at a time".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
