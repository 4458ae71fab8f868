//! # Domain Module
//!
//! Business logic for deposit calculations, independent of HTTP and SQL.
//!
//! ## Module Organization
//!
//! - **calendar**: month-end date arithmetic
//! - **deposit_calculator**: monthly compounding schedule
//! - **deposit_service**: lookup-or-compute-and-store workflow
//! - **models**: parameter and record types
//!
//! ## Business Rules
//!
//! - Every period is compounded from the original principal, not from the previous
//!   period's value
//! - Schedule keys are month-end dates, starting with the end of the start date's month
//! - Values are rounded to cents
//! - A calculation is stored once per `(date, periods, amount, rate)` and never changed

pub mod calendar;
pub mod deposit_calculator;
pub mod deposit_service;
pub mod models;

pub use deposit_calculator::DepositCalculator;
pub use deposit_service::DepositService;
pub use models::deposit::{DepositParameters, DepositRecord};
