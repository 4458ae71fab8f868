use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// Date format used for request dates and schedule keys (`dd.mm.yyyy`)
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub const MIN_PERIODS: i64 = 1;
pub const MAX_PERIODS: i64 = 60;

pub const MIN_AMOUNT: i64 = 10_000;
pub const MAX_AMOUNT: i64 = 3_000_000;

pub const MIN_RATE: f64 = 1.0;
pub const MAX_RATE: f64 = 8.0;

/// Request body for POST /api/v1/deposit/calculate-deposit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CalculateDepositRequest {
    /// Start date in dd.mm.yyyy format
    #[validate(custom(function = "validate_deposit_date"))]
    pub date: String,
    /// Number of deposit months
    #[validate(range(min = 1, max = 60, message = "must be between 1 and 60"))]
    pub periods: i64,
    /// Deposit amount
    #[validate(range(min = 10_000, max = 3_000_000, message = "must be between 10000 and 3000000"))]
    pub amount: i64,
    /// Annual interest rate, percent
    #[validate(range(min = 1.0, max = 8.0, message = "must be between 1.0 and 8.0"))]
    pub rate: f64,
}

impl CalculateDepositRequest {
    /// Field names in declaration order, used to keep error messages stable
    pub const FIELDS: [&'static str; 4] = ["date", "periods", "amount", "rate"];

    /// Parse the request date. Only meaningful after `validate()` succeeded.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_deposit_date(&self.date)
    }
}

/// Parse a `dd.mm.yyyy` date. Whitespace and signs are rejected, which chrono alone
/// would tolerate before each number.
pub fn parse_deposit_date(value: &str) -> Option<NaiveDate> {
    if !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn validate_deposit_date(value: &str) -> Result<(), ValidationError> {
    if parse_deposit_date(value).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("date_format");
    error.message = Some(Cow::from(format!(
        "Invalid date format: {}. Expected format: dd.mm.yyyy",
        value
    )));
    Err(error)
}

/// Request body as received on the wire, before any field is type checked.
///
/// Every field is kept as raw JSON so that missing and mistyped fields can be reported
/// together with the range errors of the remaining ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DepositRequestBody {
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub periods: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub rate: Option<Value>,
}

/// Distinguishes an explicit `null` (`Some(Value::Null)`) from a missing key (`None`)
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl DepositRequestBody {
    /// Coerce and validate every field, collecting one error per failing field.
    pub fn into_request(self) -> Result<CalculateDepositRequest, ValidationErrors> {
        let date = self.date.ok_or_else(field_required).and_then(coerce_string);
        let periods = self.periods.ok_or_else(field_required).and_then(coerce_integer);
        let amount = self.amount.ok_or_else(field_required).and_then(coerce_integer);
        let rate = self.rate.ok_or_else(field_required).and_then(coerce_number);

        let request = CalculateDepositRequest {
            date: date.clone().unwrap_or_else(|_| "01.01.2000".to_string()),
            periods: *periods.as_ref().unwrap_or(&MIN_PERIODS),
            amount: *amount.as_ref().unwrap_or(&MIN_AMOUNT),
            rate: *rate.as_ref().unwrap_or(&MIN_RATE),
        };
        let range_errors = request.validate().err().unwrap_or_default();
        let range_errors = range_errors.field_errors();

        let coercion_errors = [
            ("date", date.err()),
            ("periods", periods.err()),
            ("amount", amount.err()),
            ("rate", rate.err()),
        ];
        let mut errors = ValidationErrors::new();
        for (field, coercion_error) in coercion_errors {
            match coercion_error {
                Some(error) => errors.add(field, error),
                None => {
                    for error in range_errors.get(field).into_iter().flat_map(|errs| errs.iter()) {
                        errors.add(field, error.clone());
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(errors)
        }
    }
}

fn type_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::from(message))
}

fn field_required() -> ValidationError {
    type_error("missing", "Field required")
}

fn coerce_string(value: Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(type_error("string_type", "Input should be a valid string")),
    }
}

/// Integers, whole-number floats and integer strings are accepted
fn coerce_integer(value: Value) -> Result<i64, ValidationError> {
    const INVALID: &str = "Input should be a valid integer";
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() != 0.0 => Err(type_error(
                    "int_from_float",
                    "Input should be a valid integer, got a number with a fractional part",
                )),
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
                _ => Err(type_error("int_type", INVALID)),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            type_error(
                "int_parsing",
                "Input should be a valid integer, unable to parse string as an integer",
            )
        }),
        _ => Err(type_error("int_type", INVALID)),
    }
}

/// Numbers and numeric strings are accepted
fn coerce_number(value: Value) -> Result<f64, ValidationError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| type_error("float_type", "Input should be a valid number")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| {
                type_error(
                    "float_parsing",
                    "Input should be a valid number, unable to parse string as a number",
                )
            }),
        _ => Err(type_error("float_type", "Input should be a valid number")),
    }
}

/// Month-end balances of a deposit, keyed by `dd.mm.yyyy`.
///
/// Serialized as a JSON object; entries keep their insertion order, which is the
/// chronological order of the periods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepositSchedule {
    entries: Vec<(String, f64)>,
}

impl DepositSchedule {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, date: impl Into<String>, value: f64) {
        self.entries.push((date.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == date)
            .map(|(_, value)| *value)
    }

    pub fn contains_key(&self, date: &str) -> bool {
        self.get(date).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl Serialize for DepositSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (date, value) in &self.entries {
            map.serialize_entry(date, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DepositSchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = DepositSchedule;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of dd.mm.yyyy dates to amounts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut schedule = DepositSchedule::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((date, value)) = access.next_entry::<String, f64>()? {
                    schedule.push(date, value);
                }
                Ok(schedule)
            }
        }

        deserializer.deserialize_map(ScheduleVisitor)
    }
}

/// 400 response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    /// `field: message` clauses joined with "; "
    pub error: String,
}

/// 500 response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalErrorResponse {
    pub detail: String,
}

impl InternalErrorResponse {
    pub fn generic() -> Self {
        Self {
            detail: "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CalculateDepositRequest {
        CalculateDepositRequest {
            date: "01.01.2024".to_string(),
            periods: 12,
            amount: 10_000,
            rate: 5.0,
        }
    }

    #[test]
    fn test_valid_request_passes_validation() {
        let request = valid_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.parsed_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_iso_date_is_rejected() {
        let request = CalculateDepositRequest {
            date: "2024-01-01".to_string(),
            ..valid_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("date"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let low = CalculateDepositRequest {
            periods: MIN_PERIODS,
            amount: MIN_AMOUNT,
            rate: MIN_RATE,
            ..valid_request()
        };
        let high = CalculateDepositRequest {
            periods: MAX_PERIODS,
            amount: MAX_AMOUNT,
            rate: MAX_RATE,
            ..valid_request()
        };
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_are_reported() {
        let request = CalculateDepositRequest {
            date: "01.01.2024".to_string(),
            periods: 61,
            amount: 9_999,
            rate: 8.5,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("periods"));
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("rate"));
        assert!(!fields.contains_key("date"));
    }

    #[test]
    fn test_padded_date_is_rejected() {
        assert_eq!(parse_deposit_date(" 01.01.2024"), None);
        assert_eq!(parse_deposit_date("01.01.2024 "), None);
        assert_eq!(parse_deposit_date("01. 01.2024"), None);
        assert_eq!(parse_deposit_date("01.01.-2024"), None);
        assert_eq!(parse_deposit_date("01.01.2024"), NaiveDate::from_ymd_opt(2024, 1, 1));

        let request = CalculateDepositRequest {
            date: " 01.01.2024".to_string(),
            ..valid_request()
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("date"));
    }

    fn body(json: serde_json::Value) -> DepositRequestBody {
        serde_json::from_value(json).unwrap()
    }

    fn messages(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().filter_map(|e| e.message.as_deref().map(str::to_owned)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_body_with_valid_fields_becomes_request() {
        let request = body(serde_json::json!({
            "date": "01.01.2024", "periods": 12, "amount": 10000, "rate": 5
        }))
        .into_request()
        .unwrap();

        assert_eq!(request, CalculateDepositRequest { rate: 5.0, ..valid_request() });
    }

    #[test]
    fn test_whole_number_floats_and_numeric_strings_are_coerced() {
        let request = body(serde_json::json!({
            "date": "01.01.2024", "periods": "12", "amount": 10000.0, "rate": "5.5"
        }))
        .into_request()
        .unwrap();

        assert_eq!(request.periods, 12);
        assert_eq!(request.amount, 10_000);
        assert_eq!(request.rate, 5.5);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = body(serde_json::json!({ "periods": 2, "amount": 10000 }))
            .into_request()
            .unwrap_err();

        assert_eq!(messages(&errors, "date"), vec!["Field required"]);
        assert_eq!(messages(&errors, "rate"), vec!["Field required"]);
        assert!(messages(&errors, "periods").is_empty());
        assert!(messages(&errors, "amount").is_empty());
    }

    #[test]
    fn test_type_errors_sit_alongside_range_errors() {
        let errors = body(serde_json::json!({
            "date": "32.13.2023", "periods": "x", "amount": -5000, "rate": 0.0
        }))
        .into_request()
        .unwrap_err();

        assert!(messages(&errors, "date")[0].starts_with("Invalid date format: 32.13.2023"));
        assert_eq!(
            messages(&errors, "periods"),
            vec!["Input should be a valid integer, unable to parse string as an integer"]
        );
        assert_eq!(messages(&errors, "amount"), vec!["must be between 10000 and 3000000"]);
        assert_eq!(messages(&errors, "rate"), vec!["must be between 1.0 and 8.0"]);
    }

    #[test]
    fn test_null_fractional_and_boolean_inputs_are_type_errors() {
        let errors = body(serde_json::json!({
            "date": null, "periods": 2.5, "amount": true, "rate": [5.0]
        }))
        .into_request()
        .unwrap_err();

        assert_eq!(messages(&errors, "date"), vec!["Input should be a valid string"]);
        assert_eq!(
            messages(&errors, "periods"),
            vec!["Input should be a valid integer, got a number with a fractional part"]
        );
        assert_eq!(messages(&errors, "amount"), vec!["Input should be a valid integer"]);
        assert_eq!(messages(&errors, "rate"), vec!["Input should be a valid number"]);
    }

    #[test]
    fn test_schedule_serializes_in_insertion_order() {
        let mut schedule = DepositSchedule::with_capacity(3);
        schedule.push("31.03.2024", 3.0);
        schedule.push("31.01.2024", 1.0);
        schedule.push("29.02.2024", 2.0);

        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"{"31.03.2024":3.0,"31.01.2024":1.0,"29.02.2024":2.0}"#);

        let parsed: DepositSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schedule);
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["31.03.2024", "31.01.2024", "29.02.2024"]);
    }

    #[test]
    fn test_internal_error_body() {
        let body = serde_json::to_value(InternalErrorResponse::generic()).unwrap();
        assert_eq!(body, serde_json::json!({ "detail": "Internal server error" }));
    }
}
