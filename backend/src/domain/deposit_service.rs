//! Deposit calculation workflow.
//!
//! A request first looks for a stored calculation with the same parameters. On a miss
//! the schedule is computed on the blocking pool and stored. Two identical requests
//! can both miss and race on the insert; the loser gets `ConstraintViolation` from the
//! store and answers with the winner's stored result instead.

use anyhow::{Context, Result};
use shared::DepositSchedule;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::deposit_calculator::DepositCalculator;
use crate::domain::models::deposit::DepositParameters;
use crate::storage::{DepositStorage, StoreError};

/// Service for calculating and memoizing deposit schedules
pub struct DepositService<S: DepositStorage> {
    storage: Arc<S>,
    calculator: DepositCalculator,
}

impl<S: DepositStorage> Clone for DepositService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            calculator: self.calculator,
        }
    }
}

impl<S: DepositStorage + 'static> DepositService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
            calculator: DepositCalculator::new(),
        }
    }

    /// Return the stored schedule for `parameters`, computing and storing it on a miss
    pub async fn calculate_deposit(&self, parameters: DepositParameters) -> Result<DepositSchedule> {
        if let Some(record) = self
            .storage
            .find(&parameters)
            .await
            .context("failed to look up deposit")?
        {
            if let Some(schedule) = record.calculation_result {
                info!(id = %record.id, %parameters, "Returning stored deposit calculation");
                return Ok(schedule);
            }
            // stored rows are immutable; answer without rewriting the empty one
            warn!(id = %record.id, %parameters, "Stored deposit has no calculation result, recomputing");
            return self.compute(parameters).await;
        }

        let schedule = self.compute(parameters).await?;
        self.persist(parameters, schedule).await
    }

    async fn compute(&self, parameters: DepositParameters) -> Result<DepositSchedule> {
        let calculator = self.calculator;
        tokio::task::spawn_blocking(move || calculator.compute(&parameters))
            .await
            .context("deposit calculation task failed")
    }

    async fn persist(&self, parameters: DepositParameters, schedule: DepositSchedule) -> Result<DepositSchedule> {
        match self.storage.create(&parameters, &schedule).await {
            Ok(record) => {
                info!(id = %record.id, %parameters, periods = schedule.len(), "Stored new deposit calculation");
                Ok(schedule)
            }
            Err(StoreError::ConstraintViolation) => {
                warn!(%parameters, "Deposit was stored concurrently, returning the stored result");
                let stored = self
                    .storage
                    .find(&parameters)
                    .await
                    .context("failed to reload concurrently stored deposit")?;
                Ok(stored
                    .and_then(|record| record.calculation_result)
                    .unwrap_or(schedule))
            }
            Err(e) => Err(e).context("failed to store deposit"),
        }
    }
}
