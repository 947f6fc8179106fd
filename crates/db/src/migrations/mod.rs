//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_user_profile_table;
mod m20250601_000003_create_goal_table;
mod m20250601_000004_create_subscription_table;
mod m20250601_000005_create_vote_table;
mod m20250601_000006_create_reflection_tables;
mod m20250601_000007_create_cycle_renewal_table;
mod m20250601_000008_create_question_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_user_profile_table::Migration),
            Box::new(m20250601_000003_create_goal_table::Migration),
            Box::new(m20250601_000004_create_subscription_table::Migration),
            Box::new(m20250601_000005_create_vote_table::Migration),
            Box::new(m20250601_000006_create_reflection_tables::Migration),
            Box::new(m20250601_000007_create_cycle_renewal_table::Migration),
            Box::new(m20250601_000008_create_question_tables::Migration),
        ]
    }
}
