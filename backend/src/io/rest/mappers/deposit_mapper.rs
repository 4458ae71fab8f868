//! Validation and mapping of deposit request DTOs into domain parameters.

use serde_json::Value;
use shared::{CalculateDepositRequest, DepositRequestBody};
use validator::{Validate, ValidationErrors};

use crate::domain::models::deposit::DepositParameters;
use crate::io::rest::error::ApiError;

pub struct DepositMapper;

impl DepositMapper {
    /// Map a parsed JSON body. Anything but an object is rejected as a whole.
    pub fn from_json(value: Value) -> Result<DepositParameters, ApiError> {
        if !value.is_object() {
            return Err(ApiError::Validation(
                "body: Input should be a valid dictionary or object to extract fields from".to_string(),
            ));
        }
        let body: DepositRequestBody = serde_json::from_value(value)
            .map_err(|err| ApiError::Validation(format!("body: {}", err)))?;
        Self::from_body(body)
    }

    /// Type check the raw body, then validate and convert it
    pub fn from_body(body: DepositRequestBody) -> Result<DepositParameters, ApiError> {
        let request = body
            .into_request()
            .map_err(|errors| ApiError::Validation(format_validation_errors(&errors)))?;
        Self::to_domain(&request)
    }

    /// Validate `dto` and convert it. Every failing field contributes one clause.
    pub fn to_domain(dto: &CalculateDepositRequest) -> Result<DepositParameters, ApiError> {
        dto.validate()
            .map_err(|errors| ApiError::Validation(format_validation_errors(&errors)))?;

        let date = dto.parsed_date().ok_or_else(|| {
            ApiError::Validation(format!("date: Invalid date format: {}", dto.date))
        })?;
        let periods = u32::try_from(dto.periods)
            .map_err(|_| ApiError::Validation("periods: must be between 1 and 60".to_string()))?;

        Ok(DepositParameters {
            date,
            periods,
            amount: dto.amount,
            rate: dto.rate,
        })
    }
}

/// Render `field: message` clauses in field declaration order, joined with "; "
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut clauses = Vec::new();
    for field in CalculateDepositRequest::FIELDS {
        if let Some(errs) = field_errors.get(field) {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_deref()
                    .map(str::to_owned)
                    .unwrap_or_else(|| err.code.to_string());
                clauses.push(format!("{}: {}", field, message));
            }
        }
    }
    clauses.join("; ")
}
