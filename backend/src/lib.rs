//! # Deposit API
//!
//! HTTP service that computes the month-by-month growth of a fixed-term deposit and
//! memoizes each result under its input parameters.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, validation, request boundary)
//!     ↓
//! Domain Layer (calendar, calculator, deposit service)
//!     ↓
//! Storage Layer (SQLite pool, deposit repository)
//! ```
//!
//! `config` and `telemetry` are set up by the binary and handed down explicitly.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;
pub mod telemetry;

use anyhow::Result;
use axum::{routing::post, Router};
use tracing::info;

use crate::config::Settings;
use crate::domain::DepositService;
use crate::storage::{DbConnection, DepositRepository};

pub const DEPOSIT_CALCULATE_PATH: &str = "/api/v1/deposit/calculate-deposit";

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub deposit_service: DepositService<DepositRepository>,
    db: DbConnection,
}

impl AppState {
    pub fn new(deposit_service: DepositService<DepositRepository>, db: DbConnection) -> Self {
        Self { deposit_service, db }
    }

    /// Release the connection pool
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(settings: &Settings) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::connect(&settings.database).await?;

    info!("Setting up domain model");
    let deposit_service = DepositService::new(DepositRepository::new(db_conn.clone()));

    Ok(AppState::new(deposit_service, db_conn))
}

/// Create the Axum router with all routes configured
pub fn build_router(app_state: AppState) -> Router {
    let api_routes = Router::new().route(DEPOSIT_CALCULATE_PATH, post(io::calculate_deposit));

    io::with_request_boundary(api_routes).with_state(app_state)
}
