//! # Storage Traits
//!
//! Storage abstraction used by the domain layer, so the deposit workflow can run
//! against the SQL repository or a test double without modification.

use async_trait::async_trait;
use shared::DepositSchedule;

use crate::domain::models::deposit::{DepositParameters, DepositRecord};
use crate::storage::error::StoreResult;

/// Trait defining the interface for deposit calculation storage
#[async_trait]
pub trait DepositStorage: Send + Sync {
    /// Find the record whose parameters match exactly on all four fields
    async fn find(&self, parameters: &DepositParameters) -> StoreResult<Option<DepositRecord>>;

    /// Persist a new record and commit.
    /// Fails with `StoreError::ConstraintViolation` if the parameters are already stored.
    async fn create(
        &self,
        parameters: &DepositParameters,
        calculation_result: &DepositSchedule,
    ) -> StoreResult<DepositRecord>;
}
