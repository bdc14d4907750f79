//! Error types for cadence-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CadenceError {
    #[error("Invalid window: till ({till}) must be after since ({since})")]
    InvalidWindow { since: String, till: String },

    #[error("Requested duration of {minutes} minutes exceeds the limit of {limit} minutes")]
    DurationTooLong { minutes: i64, limit: i64 },

    #[error("Requested duration must be positive, got {0} minutes")]
    NonPositiveDuration(i64),

    #[error("Search horizon of {days} days from {since} runs past the supported date range")]
    HorizonOutOfRange { since: String, days: u32 },

    #[error("User set must not be empty")]
    EmptyUserSet,

    #[error("Malformed event definition {id}: {reason}")]
    MalformedDefinition { id: String, reason: String },

    #[error("Unknown repetition rule: {0}")]
    UnknownRule(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
