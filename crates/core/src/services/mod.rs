//! Business logic services.

#![allow(missing_docs)]

pub mod goal;
pub mod history;
pub mod question;
pub mod reflection;
pub mod subscription;
pub mod user;
pub mod vote;

pub use goal::{CreateGoalInput, GoalService, GoalVoteStats, GoalWithStats};
pub use history::{GoalHistory, HistoryService, OverviewEntry, OverviewStats, UserOverview};
pub use question::{QuestionService, RespondInput};
pub use reflection::{PostReflectionInput, ReflectionService};
pub use subscription::{JoinGoalInput, RenewCycleInput, SubscriptionService};
pub use user::{CreateUserInput, ProfileStats, UpdateUserInput, UserService};
pub use vote::{CastVoteInput, CastVoteResult, VoteService};
