//! Monthly compounding schedule for a fixed-term deposit.
//!
//! The value at the end of period `i` is `amount * (1 + rate / 100 / 12)^i`, computed
//! from the original principal for every period, and keyed by the last day of the
//! period's month.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{DepositSchedule, DATE_FORMAT};

use crate::domain::calendar::{last_day_of_month, next_month_first_day};
use crate::domain::models::deposit::DepositParameters;

/// Stateless calculator; cheap to clone into a blocking task
#[derive(Debug, Clone, Copy, Default)]
pub struct DepositCalculator;

impl DepositCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Produce one entry per period, in chronological order
    pub fn compute(&self, parameters: &DepositParameters) -> DepositSchedule {
        let monthly_factor = 1.0 + parameters.rate / 100.0 / 12.0;
        let principal = parameters.amount as f64;

        let mut schedule = DepositSchedule::with_capacity(parameters.periods as usize);
        let mut cursor = last_day_of_month(parameters.date);
        for period in 1..=parameters.periods {
            let value = principal * monthly_factor.powf(f64::from(period));
            schedule.push(cursor.format(DATE_FORMAT).to_string(), round_to_cents(value));
            cursor = last_day_of_month(next_month_first_day(cursor));
        }
        schedule
    }
}

/// Round half to even at two decimals, operating on the exact binary value
pub fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}
