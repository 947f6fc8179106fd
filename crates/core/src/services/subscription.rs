//! Subscription service.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use tandem_common::{AppError, AppResult, IdGenerator};
use tandem_db::{
    entities::{cycle_renewal, subscription, subscription::SubscriptionStatus},
    repositories::{CycleRenewalRepository, GoalRepository, SubscriptionRepository},
};
use validator::Validate;

use crate::history;

/// Subscription service for business logic.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    goal_repo: GoalRepository,
    renewal_repo: CycleRenewalRepository,
    id_gen: IdGenerator,
    cycle_days: u32,
}

/// Intake answers collected when joining a goal.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinGoalInput {
    #[validate(length(max = 2048))]
    pub answer_why: Option<String>,

    #[validate(length(max = 2048))]
    pub answer_when: Option<String>,

    #[validate(length(max = 2048))]
    pub answer_what: Option<String>,
}

/// Answers collected when renewing a cycle.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenewCycleInput {
    #[validate(length(max = 2048))]
    pub cycle_why: Option<String>,

    #[validate(length(max = 2048))]
    pub work_schedule: Option<String>,

    #[validate(length(max = 2048))]
    pub goals: Option<String>,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        subscription_repo: SubscriptionRepository,
        goal_repo: GoalRepository,
        renewal_repo: CycleRenewalRepository,
        cycle_days: u32,
    ) -> Self {
        Self {
            subscription_repo,
            goal_repo,
            renewal_repo,
            id_gen: IdGenerator::new(),
            cycle_days,
        }
    }

    /// Join a goal. Rejects a second subscription to the same goal.
    pub async fn join(
        &self,
        user_id: &str,
        goal_id: &str,
        input: JoinGoalInput,
    ) -> AppResult<subscription::Model> {
        input.validate()?;

        // Goal must exist
        self.goal_repo.get_by_id(goal_id).await?;

        if self
            .subscription_repo
            .find_by_user_and_goal(user_id, goal_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Already subscribed to this goal".to_string(),
            ));
        }

        let model = subscription::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            goal_id: Set(goal_id.to_string()),
            status: Set(SubscriptionStatus::Active),
            current_cycle: Set(1),
            cycle_start_date: Set(today()),
            answer_why: Set(input.answer_why),
            answer_when: Set(input.answer_when),
            answer_what: Set(input.answer_what),
            ..Default::default()
        };

        let subscription = self.subscription_repo.create(model).await?;
        self.goal_repo.increment_subscriber_count(goal_id).await?;

        Ok(subscription)
    }

    /// Get a subscription, verifying ownership.
    pub async fn get_owned(
        &self,
        user_id: &str,
        subscription_id: &str,
    ) -> AppResult<subscription::Model> {
        let subscription = self.subscription_repo.get_by_id(subscription_id).await?;
        if subscription.user_id != user_id {
            return Err(AppError::Forbidden(
                "Subscription belongs to another user".to_string(),
            ));
        }
        Ok(subscription)
    }

    /// List a user's subscriptions, flagging overdue cycles as pending renewal.
    pub async fn my_subscriptions(&self, user_id: &str) -> AppResult<Vec<subscription::Model>> {
        let subscriptions = self.subscription_repo.find_by_user(user_id).await?;

        let mut result = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            result.push(self.sync_renewal_state(subscription).await?);
        }
        Ok(result)
    }

    /// Move an active subscription past its cycle length to pending renewal.
    pub async fn sync_renewal_state(
        &self,
        subscription: subscription::Model,
    ) -> AppResult<subscription::Model> {
        if subscription.status == SubscriptionStatus::Active
            && history::needs_renewal(subscription.cycle_start_date, today(), self.cycle_days)
        {
            let mut active: subscription::ActiveModel = subscription.into();
            active.status = Set(SubscriptionStatus::PendingRenewal);
            active.updated_at = Set(Some(Utc::now().into()));
            return self.subscription_repo.update(active).await;
        }
        Ok(subscription)
    }

    /// Pause an active subscription.
    pub async fn pause(&self, user_id: &str, subscription_id: &str) -> AppResult<subscription::Model> {
        self.set_status(user_id, subscription_id, SubscriptionStatus::Paused)
            .await
    }

    /// Resume a paused subscription.
    pub async fn resume(
        &self,
        user_id: &str,
        subscription_id: &str,
    ) -> AppResult<subscription::Model> {
        let subscription = self.get_owned(user_id, subscription_id).await?;
        if subscription.status != SubscriptionStatus::Paused {
            return Err(AppError::BadRequest(
                "Only a paused subscription can be resumed".to_string(),
            ));
        }

        let mut active: subscription::ActiveModel = subscription.into();
        active.status = Set(SubscriptionStatus::Active);
        active.updated_at = Set(Some(Utc::now().into()));
        self.subscription_repo.update(active).await
    }

    /// Finish a subscription and release the subscriber slot.
    pub async fn finish(
        &self,
        user_id: &str,
        subscription_id: &str,
    ) -> AppResult<subscription::Model> {
        let subscription = self.get_owned(user_id, subscription_id).await?;
        if subscription.status == SubscriptionStatus::Finished {
            return Err(AppError::BadRequest(
                "Subscription is already finished".to_string(),
            ));
        }

        let goal_id = subscription.goal_id.clone();
        let mut active: subscription::ActiveModel = subscription.into();
        active.status = Set(SubscriptionStatus::Finished);
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.subscription_repo.update(active).await?;

        self.goal_repo.decrement_subscriber_count(&goal_id).await?;

        Ok(updated)
    }

    /// Renew a subscription into its next cycle, snapshotting the answers.
    pub async fn renew(
        &self,
        user_id: &str,
        subscription_id: &str,
        input: RenewCycleInput,
    ) -> AppResult<subscription::Model> {
        input.validate()?;

        let subscription = self.get_owned(user_id, subscription_id).await?;
        match subscription.status {
            SubscriptionStatus::Active | SubscriptionStatus::PendingRenewal => {}
            _ => {
                return Err(AppError::BadRequest(
                    "Only an active subscription can be renewed".to_string(),
                ));
            }
        }

        let renewal = cycle_renewal::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(subscription.user_id.clone()),
            goal_id: Set(subscription.goal_id.clone()),
            subscription_id: Set(subscription.id.clone()),
            cycle_number: Set(subscription.current_cycle),
            cycle_why: Set(input.cycle_why),
            work_schedule: Set(input.work_schedule),
            goals: Set(input.goals),
            ..Default::default()
        };
        self.renewal_repo.create(renewal).await?;

        let next_cycle = subscription.current_cycle + 1;
        let mut active: subscription::ActiveModel = subscription.into();
        active.status = Set(SubscriptionStatus::Active);
        active.current_cycle = Set(next_cycle);
        active.cycle_start_date = Set(today());
        active.updated_at = Set(Some(Utc::now().into()));

        self.subscription_repo.update(active).await
    }

    /// Renewal history for a subscription, most recent cycle first.
    pub async fn renewals(
        &self,
        user_id: &str,
        subscription_id: &str,
    ) -> AppResult<Vec<cycle_renewal::Model>> {
        self.get_owned(user_id, subscription_id).await?;
        self.renewal_repo.find_by_subscription(subscription_id).await
    }

    async fn set_status(
        &self,
        user_id: &str,
        subscription_id: &str,
        status: SubscriptionStatus,
    ) -> AppResult<subscription::Model> {
        let subscription = self.get_owned(user_id, subscription_id).await?;

        let mut active: subscription::ActiveModel = subscription.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));
        self.subscription_repo.update(active).await
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
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use tandem_db::entities::goal;

    fn create_test_subscription(id: &str, user_id: &str, goal_id: &str) -> subscription::Model {
        subscription::Model {
            id: id.to_string(),
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

    fn create_test_goal(id: &str) -> goal::Model {
        goal::Model {
            id: id.to_string(),
            title: "Test Goal".to_string(),
            description: None,
            category: None,
            color: None,
            icon: None,
            created_by: None,
            subscriber_count: 0,
            is_pinned: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_join_twice_conflicts() {
        let existing = create_test_subscription("sub1", "user1", "goal1");

        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let goal_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_goal("goal1")]])
                .into_connection(),
        );

        let service = SubscriptionService::new(
            SubscriptionRepository::new(sub_db),
            GoalRepository::new(goal_db),
            CycleRenewalRepository::new(empty_db()),
            30,
        );

        let result = service
            .join("user1", "goal1", JoinGoalInput::default())
            .await;
        match result {
            Err(AppError::Conflict(_)) => {}
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_join_missing_goal() {
        let goal_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<goal::Model>::new()])
                .into_connection(),
        );

        let service = SubscriptionService::new(
            SubscriptionRepository::new(empty_db()),
            GoalRepository::new(goal_db),
            CycleRenewalRepository::new(empty_db()),
            30,
        );

        let result = service
            .join("user1", "missing", JoinGoalInput::default())
            .await;
        match result {
            Err(AppError::GoalNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected GoalNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_pause_foreign_subscription_forbidden() {
        let subscription = create_test_subscription("sub1", "owner", "goal1");

        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subscription]])
                .into_connection(),
        );

        let service = SubscriptionService::new(
            SubscriptionRepository::new(sub_db),
            GoalRepository::new(empty_db()),
            CycleRenewalRepository::new(empty_db()),
            30,
        );

        let result = service.pause("intruder", "sub1").await;
        match result {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_overdue_subscription_becomes_pending_renewal() {
        let mut subscription = create_test_subscription("sub1", "user1", "goal1");
        subscription.cycle_start_date = today().checked_sub_days(Days::new(31)).unwrap();

        let mut updated = subscription.clone();
        updated.status = SubscriptionStatus::PendingRenewal;

        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let service = SubscriptionService::new(
            SubscriptionRepository::new(sub_db),
            GoalRepository::new(empty_db()),
            CycleRenewalRepository::new(empty_db()),
            30,
        );

        let result = service.sync_renewal_state(subscription).await.unwrap();
        assert_eq!(result.status, SubscriptionStatus::PendingRenewal);
    }

    #[tokio::test]
    async fn test_fresh_subscription_stays_active() {
        let subscription = create_test_subscription("sub1", "user1", "goal1");

        let service = SubscriptionService::new(
            SubscriptionRepository::new(empty_db()),
            GoalRepository::new(empty_db()),
            CycleRenewalRepository::new(empty_db()),
            30,
        );

        let result = service.sync_renewal_state(subscription).await.unwrap();
        assert_eq!(result.status, SubscriptionStatus::Active);
    }
}
