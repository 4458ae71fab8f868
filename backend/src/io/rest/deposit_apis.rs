//! # REST API for Deposit Calculations
//!
//! `POST /api/v1/deposit/calculate-deposit` returns the month-end balances of a
//! deposit, computing them on the first request for a parameter set and serving the
//! stored result afterwards.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use shared::DepositSchedule;
use tracing::info;

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::deposit_mapper::DepositMapper;
use crate::AppState;

/// Calculate or retrieve a deposit schedule
pub async fn calculate_deposit(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DepositSchedule>, ApiError> {
    let Json(body) =
        payload.map_err(|rejection| ApiError::Validation(format!("body: {}", rejection.body_text())))?;
    info!("POST /api/v1/deposit/calculate-deposit - request: {}", body);

    let parameters = DepositMapper::from_json(body)?;
    let schedule = state.deposit_service.calculate_deposit(parameters).await?;
    Ok(Json(schedule))
}
