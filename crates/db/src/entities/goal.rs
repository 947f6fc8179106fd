//! Goal entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Category label (e.g. "health", "learning")
    #[sea_orm(nullable, indexed)]
    pub category: Option<String>,

    /// Display color (hex string)
    #[sea_orm(nullable)]
    pub color: Option<String>,

    /// Display icon name
    #[sea_orm(nullable)]
    pub icon: Option<String>,

    /// User who created the goal, if created by a user rather than seeded
    #[sea_orm(nullable, indexed)]
    pub created_by: Option<String>,

    /// Number of active subscribers (denormalized)
    #[sea_orm(default_value = 0)]
    pub subscriber_count: i32,

    /// Pinned goals are surfaced first in listings
    #[sea_orm(default_value = false)]
    pub is_pinned: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,

    #[sea_orm(has_many = "super::subscription::Entity")]
    Subscriptions,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,

    #[sea_orm(has_many = "super::reflection::Entity")]
    Reflections,
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::reflection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reflections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
