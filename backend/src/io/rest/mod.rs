//! # REST API Interface Layer
//!
//! HTTP endpoints of the deposit service. This layer handles:
//! - JSON request/response serialization
//! - Input validation before anything reaches the domain
//! - Translation of domain errors into status codes and response bodies
//! - Request logging and panic recovery (see `middleware`)

pub mod deposit_apis;
pub mod error;
pub mod mappers;
pub mod middleware;
