//! Error types for Pocketwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no transactions found")]
    NoTransactions,

    #[error("invalid date range: start date must be before end date")]
    InvalidDateRange,

    #[error("invalid date format, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("category cannot be empty")]
    InvalidCategory,

    #[error("type must be either 'income' or 'expense'")]
    InvalidType,

    #[error("amount sign must match transaction type")]
    InvalidAmount,

    /// The caller gave up before advice was produced
    #[error("request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether this error came from validating a transaction record
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate | Self::InvalidCategory | Self::InvalidType | Self::InvalidAmount
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
