//! Database entities.

#![allow(missing_docs)]

pub mod cycle_renewal;
pub mod goal;
pub mod question;
pub mod question_response;
pub mod question_response_like;
pub mod reflection;
pub mod reflection_like;
pub mod subscription;
pub mod user;
pub mod user_profile;
pub mod vote;

pub use cycle_renewal::Entity as CycleRenewal;
pub use goal::Entity as Goal;
pub use question::Entity as Question;
pub use question_response::Entity as QuestionResponse;
pub use question_response_like::Entity as QuestionResponseLike;
pub use reflection::Entity as Reflection;
pub use reflection_like::Entity as ReflectionLike;
pub use subscription::Entity as Subscription;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
pub use vote::Entity as Vote;
