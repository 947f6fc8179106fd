//! Cycle renewal entity - snapshot of renewal-intake answers when a cycle ends.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cycle_renewal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(indexed)]
    pub goal_id: String,

    #[sea_orm(indexed)]
    pub subscription_id: String,

    /// Number of the cycle being started by this renewal (1-based)
    pub cycle_number: i32,

    /// Why the user wants to continue for another cycle
    #[sea_orm(column_type = "Text", nullable)]
    pub cycle_why: Option<String>,

    /// The user's planned work schedule for the new cycle
    #[sea_orm(column_type = "Text", nullable)]
    pub work_schedule: Option<String>,

    /// What the user wants to achieve in the new cycle
    #[sea_orm(column_type = "Text", nullable)]
    pub goals: Option<String>,

    pub created_at: DateTimeWithTimeZone,
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
        belongs_to = "super::subscription::Entity",
        from = "Column::SubscriptionId",
        to = "super::subscription::Column::Id",
        on_delete = "Cascade"
    )]
    Subscription,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
