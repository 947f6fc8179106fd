//! Subscription entity linking a user to a goal, with cycle tracking.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "finished")]
    Finished,
    /// The 30-day cycle elapsed and the user has not yet renewed.
    #[sea_orm(string_value = "pending_renewal")]
    PendingRenewal,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(indexed)]
    pub goal_id: String,

    pub status: SubscriptionStatus,

    /// 1-based number of the cycle the subscriber is currently in
    pub current_cycle: i32,

    /// First day of the current cycle
    pub cycle_start_date: Date,

    /// Intake answer: why the user joined
    #[sea_orm(column_type = "Text", nullable)]
    pub answer_why: Option<String>,

    /// Intake answer: when the user plans to work on the goal
    #[sea_orm(column_type = "Text", nullable)]
    pub answer_when: Option<String>,

    /// Intake answer: what the user wants to achieve
    #[sea_orm(column_type = "Text", nullable)]
    pub answer_what: Option<String>,

    pub joined_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::goal::Entity",
        from = "Column::GoalId",
        to = "super::goal::Column::Id",
        on_delete = "Cascade"
    )]
    Goal,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
