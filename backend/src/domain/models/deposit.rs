//! Domain models for deposit calculations.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::DepositSchedule;
use std::fmt;
use uuid::Uuid;

/// Inputs of a deposit calculation. The four fields together are the natural key
/// of a stored calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepositParameters {
    pub date: NaiveDate,
    pub periods: u32,
    pub amount: i64,
    pub rate: f64,
}

impl DepositParameters {
    /// Start date as stored in the `date` timestamp column (midnight)
    pub fn start_timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }
}

impl fmt::Display for DepositParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "date={} periods={} amount={} rate={}",
            self.date, self.periods, self.amount, self.rate
        )
    }
}

/// A persisted calculation. Written once per parameter tuple and never updated.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositRecord {
    pub id: Uuid,
    pub parameters: DepositParameters,
    /// Nullable in the schema; always written by this service
    pub calculation_result: Option<DepositSchedule>,
}

impl DepositRecord {
    pub fn new(parameters: DepositParameters, calculation_result: DepositSchedule) -> Self {
        Self {
            id: Uuid::new_v4(),
            parameters,
            calculation_result: Some(calculation_result),
        }
    }
}
