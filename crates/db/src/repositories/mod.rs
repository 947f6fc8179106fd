//! Database repositories.

mod cycle_renewal;
mod goal;
mod question;
mod reflection;
mod subscription;
mod user;
mod user_profile;
mod vote;

pub use cycle_renewal::CycleRenewalRepository;
pub use goal::GoalRepository;
pub use question::{QuestionRepository, QuestionResponseLikeRepository, QuestionResponseRepository};
pub use reflection::{ReflectionLikeRepository, ReflectionRepository};
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
pub use vote::VoteRepository;
