//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain logic.
//!
//! ## Supported Operations
//!
//! - **POST /api/v1/deposit/calculate-deposit**: month-end balances of a deposit
//!
//! ## Error Format
//!
//! - 400 `{"error": "field: message; field: message"}` for rejected input
//! - 500 `{"detail": "Internal server error"}` for everything else

pub mod rest;

pub use rest::deposit_apis::calculate_deposit;
pub use rest::error::ApiError;
pub use rest::middleware::with_request_boundary;
