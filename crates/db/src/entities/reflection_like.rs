//! Reflection like entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reflection like - a record of a user liking a reflection.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reflection_like")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who liked the reflection.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Reflection that was liked.
    #[sea_orm(indexed)]
    pub reflection_id: String,

    /// When the like was created.
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
        belongs_to = "super::reflection::Entity",
        from = "Column::ReflectionId",
        to = "super::reflection::Column::Id",
        on_delete = "Cascade"
    )]
    Reflection,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::reflection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reflection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
