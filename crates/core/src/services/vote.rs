//! Vote service.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use tandem_common::{AppError, AppResult, IdGenerator};
use tandem_db::{
    entities::{reflection, subscription::SubscriptionStatus, vote, vote::VoteAnswer},
    repositories::{ReflectionRepository, SubscriptionRepository, VoteRepository},
};
use validator::Validate;

use crate::history::{self, BoardDay, VoteDay};

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    subscription_repo: SubscriptionRepository,
    reflection_repo: ReflectionRepository,
    id_gen: IdGenerator,
    cycle_days: u32,
}

/// Input for casting a daily vote.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteInput {
    pub answer: VoteAnswer,

    #[validate(range(min = 0, max = 10000))]
    pub quantity: Option<i32>,

    /// Optional reflection posted together with the vote.
    #[validate(length(min = 1, max = 2000))]
    pub reflection: Option<String>,
}

/// A cast vote together with the reflection posted alongside it, if any.
#[derive(Debug)]
pub struct CastVoteResult {
    pub vote: vote::Model,
    pub reflection: Option<reflection::Model>,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(
        vote_repo: VoteRepository,
        subscription_repo: SubscriptionRepository,
        reflection_repo: ReflectionRepository,
        cycle_days: u32,
    ) -> Self {
        Self {
            vote_repo,
            subscription_repo,
            reflection_repo,
            id_gen: IdGenerator::new(),
            cycle_days,
        }
    }

    /// Cast today's vote on a goal. One vote per user, goal, and day.
    pub async fn cast(
        &self,
        user_id: &str,
        goal_id: &str,
        input: CastVoteInput,
    ) -> AppResult<CastVoteResult> {
        input.validate()?;

        let subscription = self
            .subscription_repo
            .find_by_user_and_goal(user_id, goal_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Not subscribed to this goal".to_string()))?;

        match subscription.status {
            SubscriptionStatus::Active => {}
            SubscriptionStatus::PendingRenewal => {
                return Err(AppError::Conflict(
                    "Cycle has ended; renew the subscription first".to_string(),
                ));
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Subscription is not active".to_string(),
                ));
            }
        }

        let today = today();
        if history::needs_renewal(subscription.cycle_start_date, today, self.cycle_days) {
            return Err(AppError::Conflict(
                "Cycle has ended; renew the subscription first".to_string(),
            ));
        }

        if self
            .vote_repo
            .find_by_user_goal_date(user_id, goal_id, today)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Already voted on this goal today".to_string(),
            ));
        }

        // Quantity only means anything for a yes vote.
        let quantity = if input.answer == VoteAnswer::Yes {
            input.quantity
        } else {
            None
        };

        let vote_model = vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            goal_id: Set(goal_id.to_string()),
            subscription_id: Set(subscription.id),
            cycle_number: Set(subscription.current_cycle),
            answer: Set(input.answer),
            date: Set(today),
            quantity: Set(quantity),
            has_reflection: Set(input.reflection.is_some()),
            ..Default::default()
        };

        let vote = self.vote_repo.create(vote_model).await?;

        let reflection = if let Some(content) = input.reflection {
            let model = reflection::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                goal_id: Set(goal_id.to_string()),
                content: Set(content),
                ..Default::default()
            };
            Some(self.reflection_repo.create(model).await?)
        } else {
            None
        };

        Ok(CastVoteResult { vote, reflection })
    }

    /// Today's vote on a goal, if the user has cast one.
    pub async fn today_vote(&self, user_id: &str, goal_id: &str) -> AppResult<Option<vote::Model>> {
        self.vote_repo
            .find_by_user_goal_date(user_id, goal_id, today())
            .await
    }

    /// Votes cast within one cycle, oldest first.
    pub async fn votes_for_cycle(
        &self,
        user_id: &str,
        goal_id: &str,
        cycle_number: i32,
    ) -> AppResult<Vec<vote::Model>> {
        self.vote_repo
            .find_by_user_goal_cycle(user_id, goal_id, cycle_number)
            .await
    }

    /// The current cycle's vote board, future days masked.
    pub async fn board(&self, user_id: &str, goal_id: &str) -> AppResult<Vec<BoardDay>> {
        let subscription = self
            .subscription_repo
            .find_by_user_and_goal(user_id, goal_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Not subscribed to this goal".to_string()))?;

        let votes = self
            .vote_repo
            .find_by_user_goal_cycle(user_id, goal_id, subscription.current_cycle)
            .await?;
        let days: Vec<VoteDay> = votes.iter().map(to_vote_day).collect();

        Ok(history::vote_board(
            subscription.cycle_start_date,
            &days,
            today(),
            self.cycle_days,
        ))
    }
}

/// Strip a vote row down to what history derivation needs.
pub(crate) fn to_vote_day(vote: &vote::Model) -> VoteDay {
    VoteDay {
        date: vote.date,
        yes: vote.answer == VoteAnswer::Yes,
        quantity: vote.quantity,
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Days;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tandem_db::entities::subscription;

    fn create_test_subscription(user_id: &str, goal_id: &str) -> subscription::Model {
        subscription::Model {
            id: "sub1".to_string(),
            user_id: user_id.to_string(),
            goal_id: goal_id.to_string(),
            status: SubscriptionStatus::Active,
            current_cycle: 1,
            cycle_start_date: today(),
            answer_why: None,
            answer_when: None,
            answer_what: None,
            joined_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_vote(user_id: &str, goal_id: &str, date: NaiveDate) -> vote::Model {
        vote::Model {
            id: "vote1".to_string(),
            user_id: user_id.to_string(),
            goal_id: goal_id.to_string(),
            subscription_id: "sub1".to_string(),
            cycle_number: 1,
            answer: VoteAnswer::Yes,
            date,
            quantity: None,
            has_reflection: false,
            created_at: Utc::now().into(),
        }
    }

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn cast_input(answer: VoteAnswer) -> CastVoteInput {
        CastVoteInput {
            answer,
            quantity: None,
            reflection: None,
        }
    }

    #[tokio::test]
    async fn test_cast_without_subscription_rejected() {
        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subscription::Model>::new()])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(empty_db()),
            SubscriptionRepository::new(sub_db),
            ReflectionRepository::new(empty_db()),
            30,
        );

        let result = service
            .cast("user1", "goal1", cast_input(VoteAnswer::Yes))
            .await;
        match result {
            Err(AppError::BadRequest(_)) => {}
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_cast_twice_same_day_conflicts() {
        let subscription = create_test_subscription("user1", "goal1");
        let existing = create_test_vote("user1", "goal1", today());

        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subscription]])
                .into_connection(),
        );
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            SubscriptionRepository::new(sub_db),
            ReflectionRepository::new(empty_db()),
            30,
        );

        let result = service
            .cast("user1", "goal1", cast_input(VoteAnswer::No))
            .await;
        match result {
            Err(AppError::Conflict(_)) => {}
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_cast_on_overdue_cycle_requires_renewal() {
        let mut subscription = create_test_subscription("user1", "goal1");
        subscription.cycle_start_date = today().checked_sub_days(Days::new(31)).unwrap();

        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subscription]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(empty_db()),
            SubscriptionRepository::new(sub_db),
            ReflectionRepository::new(empty_db()),
            30,
        );

        let result = service
            .cast("user1", "goal1", cast_input(VoteAnswer::Yes))
            .await;
        match result {
            Err(AppError::Conflict(_)) => {}
            _ => panic!("Expected Conflict error"),
        }
    }

    #[test]
    fn test_quantity_validation() {
        let input = CastVoteInput {
            answer: VoteAnswer::Yes,
            quantity: Some(-1),
            reflection: None,
        };
        assert!(input.validate().is_err());

        let input = CastVoteInput {
            answer: VoteAnswer::Yes,
            quantity: Some(5),
            reflection: Some("Did it before breakfast".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_to_vote_day_maps_answer() {
        let mut vote = create_test_vote("user1", "goal1", today());
        vote.quantity = Some(3);

        let day = to_vote_day(&vote);
        assert!(day.yes);
        assert_eq!(day.quantity, Some(3));

        vote.answer = VoteAnswer::No;
        assert!(!to_vote_day(&vote).yes);
    }
}
