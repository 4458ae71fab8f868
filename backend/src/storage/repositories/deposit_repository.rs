use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::DepositSchedule;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use crate::domain::models::deposit::{DepositParameters, DepositRecord};
use crate::storage::connection::DbConnection;
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::traits::DepositStorage;

/// Repository for the `deposits` table
#[derive(Clone)]
pub struct DepositRepository {
    db: DbConnection,
}

impl DepositRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> StoreResult<DepositRecord> {
        let date: NaiveDateTime = row.try_get("date")?;
        let periods: i64 = row.try_get("periods")?;
        let periods = u32::try_from(periods).map_err(|_| StoreError::InvalidColumn {
            column: "periods",
            value: periods.to_string(),
        })?;
        let calculation_result = row
            .try_get::<Option<String>, _>("calculation_result")?
            .map(|json| serde_json::from_str::<DepositSchedule>(&json))
            .transpose()?;

        Ok(DepositRecord {
            id: row.try_get("id")?,
            parameters: DepositParameters {
                date: date.date(),
                periods,
                amount: row.try_get("amount")?,
                rate: row.try_get("rate")?,
            },
            calculation_result,
        })
    }
}

#[async_trait]
impl DepositStorage for DepositRepository {
    async fn find(&self, parameters: &DepositParameters) -> StoreResult<Option<DepositRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, date, periods, amount, rate, calculation_result
            FROM deposits
            WHERE date = ? AND periods = ? AND amount = ? AND rate = ?
            "#,
        )
        .bind(parameters.start_timestamp())
        .bind(i64::from(parameters.periods))
        .bind(parameters.amount)
        .bind(parameters.rate)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn create(
        &self,
        parameters: &DepositParameters,
        calculation_result: &DepositSchedule,
    ) -> StoreResult<DepositRecord> {
        let record = DepositRecord::new(*parameters, calculation_result.clone());
        let json = serde_json::to_string(calculation_result)?;

        let mut tx = self.db.pool().begin().await?;
        sqlx::query(
            r#"
            INSERT INTO deposits (id, date, periods, amount, rate, calculation_result)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(parameters.start_timestamp())
        .bind(i64::from(parameters.periods))
        .bind(parameters.amount)
        .bind(parameters.rate)
        .bind(json)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(id = %record.id, %parameters, "Stored deposit calculation");
        Ok(record)
    }
}

impl DepositRepository {
    /// Number of stored records for a parameter tuple
    #[cfg(test)]
    pub async fn count_matching(&self, parameters: &DepositParameters) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM deposits WHERE date = ? AND periods = ? AND amount = ? AND rate = ?",
        )
        .bind(parameters.start_timestamp())
        .bind(i64::from(parameters.periods))
        .bind(parameters.amount)
        .bind(parameters.rate)
        .fetch_one(self.db.pool())
        .await?;
        Ok(count)
    }
}
