//! Cycle renewal repository.

use std::sync::Arc;

use crate::entities::{CycleRenewal, cycle_renewal};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tandem_common::{AppError, AppResult};

/// Cycle renewal repository for database operations.
#[derive(Clone)]
pub struct CycleRenewalRepository {
    db: Arc<DatabaseConnection>,
}

impl CycleRenewalRepository {
    /// Create a new cycle renewal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Renewals recorded for a subscription, most recent cycle first.
    pub async fn find_by_subscription(
        &self,
        subscription_id: &str,
    ) -> AppResult<Vec<cycle_renewal::Model>> {
        CycleRenewal::find()
            .filter(cycle_renewal::Column::SubscriptionId.eq(subscription_id))
            .order_by_desc(cycle_renewal::Column::CycleNumber)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new renewal record.
    pub async fn create(&self, model: cycle_renewal::ActiveModel) -> AppResult<cycle_renewal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
