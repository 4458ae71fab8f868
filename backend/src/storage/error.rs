use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A record with the same (date, periods, amount, rate) already exists
    #[error("a deposit with identical parameters already exists")]
    ConstraintViolation,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("stored column {column} holds an invalid value: {value}")]
    InvalidColumn { column: &'static str, value: String },

    #[error("stored calculation result is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::ConstraintViolation
            }
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
