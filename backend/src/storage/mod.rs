//! # Storage Module
//!
//! Persistence for deposit calculations.
//!
//! The domain layer talks to the `DepositStorage` trait; the SQLite repository
//! behind it memoizes each calculation under its natural key
//! `(date, periods, amount, rate)`.
//!
//! ## Components
//!
//! - **connection.rs** - connection pool and schema setup
//! - **repositories/** - SQL repositories implementing the storage traits
//! - **traits.rs** - storage abstractions consumed by the domain layer
//! - **error.rs** - storage error classification (unique violations vs. the rest)

pub mod connection;
pub mod error;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use error::{StoreError, StoreResult};
pub use repositories::DepositRepository;
pub use traits::DepositStorage;
