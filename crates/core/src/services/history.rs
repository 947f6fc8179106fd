//! History service.
//!
//! Reconstructs cycles, streaks, and statistics from votes by composing the
//! repositories with the pure derivation functions in [`crate::history`].

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tandem_common::AppResult;
use tandem_db::{
    entities::subscription::SubscriptionStatus,
    repositories::{GoalRepository, SubscriptionRepository, VoteRepository},
};

use crate::history::{self, Cycle, CycleStats, GoalStats, VoteDay};
use crate::services::vote::to_vote_day;

/// History service for business logic.
#[derive(Clone)]
pub struct HistoryService {
    vote_repo: VoteRepository,
    subscription_repo: SubscriptionRepository,
    goal_repo: GoalRepository,
    cycle_days: u32,
}

/// A cycle together with its completion statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleWithStats {
    #[serde(flatten)]
    pub cycle: Cycle,
    pub stats: CycleStats,
}

/// Full vote-derived history of one user on one goal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalHistory {
    pub goal_id: String,
    pub goal_title: String,
    pub status: SubscriptionStatus,
    pub current_streak: u32,
    pub cycles: Vec<CycleWithStats>,
    pub stats: GoalStats,
}

/// One goal's line in the all-goals overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewEntry {
    pub goal_id: String,
    pub goal_title: String,
    pub status: SubscriptionStatus,
    pub current_streak: u32,
    pub stats: GoalStats,
}

/// Aggregate statistics across all of a user's goals.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub active_goals: u32,
    pub total_cycles: u32,
    /// Average of per-goal completion rates, rounded half up.
    pub average_completion: u32,
}

/// The all-goals overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub goals: Vec<OverviewEntry>,
    pub stats: OverviewStats,
}

impl HistoryService {
    /// Create a new history service.
    #[must_use]
    pub const fn new(
        vote_repo: VoteRepository,
        subscription_repo: SubscriptionRepository,
        goal_repo: GoalRepository,
        cycle_days: u32,
    ) -> Self {
        Self {
            vote_repo,
            subscription_repo,
            goal_repo,
            cycle_days,
        }
    }

    /// A user's full history on one goal.
    pub async fn goal_history(&self, user_id: &str, goal_id: &str) -> AppResult<GoalHistory> {
        let goal = self.goal_repo.get_by_id(goal_id).await?;
        let status = self
            .subscription_repo
            .find_by_user_and_goal(user_id, goal_id)
            .await?
            .map_or(SubscriptionStatus::Active, |s| s.status);

        let votes = self
            .vote_repo
            .find_by_user_and_goal(user_id, goal_id)
            .await?;
        let days: Vec<VoteDay> = votes.iter().map(to_vote_day).collect();

        let today = today();
        let cycles = history::build_cycles(&days, today, self.cycle_days);
        let current_streak = history::current_streak(&days, today);
        let stats = history::goal_stats(&cycles);

        let cycles = cycles
            .into_iter()
            .map(|cycle| {
                let stats = history::cycle_stats(&cycle);
                CycleWithStats { cycle, stats }
            })
            .collect();

        Ok(GoalHistory {
            goal_id: goal.id,
            goal_title: goal.title,
            status,
            current_streak,
            cycles,
            stats,
        })
    }

    /// Overview across every goal the user has ever subscribed to.
    pub async fn overview(&self, user_id: &str) -> AppResult<UserOverview> {
        let subscriptions = self.subscription_repo.find_by_user(user_id).await?;
        let today = today();

        let mut goals = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let goal = self.goal_repo.get_by_id(&subscription.goal_id).await?;
            let votes = self
                .vote_repo
                .find_by_user_and_goal(user_id, &subscription.goal_id)
                .await?;
            let days: Vec<VoteDay> = votes.iter().map(to_vote_day).collect();

            let cycles = history::build_cycles(&days, today, self.cycle_days);
            goals.push(OverviewEntry {
                goal_id: goal.id,
                goal_title: goal.title,
                status: subscription.status,
                current_streak: history::current_streak(&days, today),
                stats: history::goal_stats(&cycles),
            });
        }

        let active_goals = goals
            .iter()
            .filter(|g| g.status == SubscriptionStatus::Active)
            .count() as u32;
        let total_cycles = goals.iter().map(|g| g.stats.total_cycles).sum();
        let rates: Vec<u32> = goals.iter().map(|g| g.stats.average_completion).collect();
        let average_completion = if rates.is_empty() {
            0
        } else {
            let sum: u32 = rates.iter().sum();
            (sum + rates.len() as u32 / 2) / rates.len() as u32
        };

        Ok(UserOverview {
            goals,
            stats: OverviewStats {
                active_goals,
                total_cycles,
                average_completion,
            },
        })
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
    use tandem_db::entities::{goal, subscription, vote, vote::VoteAnswer};

    fn create_test_goal(id: &str, title: &str) -> goal::Model {
        goal::Model {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            category: None,
            color: None,
            icon: None,
            created_by: None,
            subscriber_count: 1,
            is_pinned: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_subscription(goal_id: &str) -> subscription::Model {
        subscription::Model {
            id: "sub1".to_string(),
            user_id: "user1".to_string(),
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

    fn create_test_vote(id: &str, goal_id: &str, date: NaiveDate, yes: bool) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            user_id: "user1".to_string(),
            goal_id: goal_id.to_string(),
            subscription_id: "sub1".to_string(),
            cycle_number: 1,
            answer: if yes { VoteAnswer::Yes } else { VoteAnswer::No },
            date,
            quantity: None,
            has_reflection: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_goal_history_from_votes() {
        let today = today();
        let votes = vec![
            create_test_vote("v1", "goal1", today.checked_sub_days(Days::new(2)).unwrap(), true),
            create_test_vote("v2", "goal1", today.checked_sub_days(Days::new(1)).unwrap(), true),
            create_test_vote("v3", "goal1", today, true),
        ];

        let goal_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_goal("goal1", "Daily reading")]])
                .into_connection(),
        );
        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_subscription("goal1")]])
                .into_connection(),
        );
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([votes])
                .into_connection(),
        );

        let service = HistoryService::new(
            VoteRepository::new(vote_db),
            SubscriptionRepository::new(sub_db),
            GoalRepository::new(goal_db),
            30,
        );

        let history = service.goal_history("user1", "goal1").await.unwrap();
        assert_eq!(history.goal_title, "Daily reading");
        assert_eq!(history.current_streak, 3);
        assert_eq!(history.cycles.len(), 1);
        assert_eq!(history.cycles[0].stats.completion_rate, 100);
        assert_eq!(history.stats.total_cycles, 1);
    }

    #[tokio::test]
    async fn test_goal_history_no_votes() {
        let goal_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_goal("goal1", "Daily reading")]])
                .into_connection(),
        );
        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_subscription("goal1")]])
                .into_connection(),
        );
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<vote::Model>::new()])
                .into_connection(),
        );

        let service = HistoryService::new(
            VoteRepository::new(vote_db),
            SubscriptionRepository::new(sub_db),
            GoalRepository::new(goal_db),
            30,
        );

        let history = service.goal_history("user1", "goal1").await.unwrap();
        assert_eq!(history.current_streak, 0);
        assert!(history.cycles.is_empty());
    }

    #[tokio::test]
    async fn test_overview_empty() {
        let sub_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subscription::Model>::new()])
                .into_connection(),
        );
        let goal_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let vote_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = HistoryService::new(
            VoteRepository::new(vote_db),
            SubscriptionRepository::new(sub_db),
            GoalRepository::new(goal_db),
            30,
        );

        let overview = service.overview("user1").await.unwrap();
        assert!(overview.goals.is_empty());
        assert_eq!(overview.stats.active_goals, 0);
        assert_eq!(overview.stats.average_completion, 0);
    }
}
