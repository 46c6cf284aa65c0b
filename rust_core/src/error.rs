//! Boundary errors for the pool core.
//!
//! Scoring and visibility never fail; these only surface when parsing
//! configuration or feed values into core types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("unknown time zone: {0} (expected IANA tz like America/New_York)")]
    UnknownTimeZone(String),

    #[error("unknown pick result: {0} (expected pending|win|loss|push)")]
    UnknownPickResult(String),

    #[error("invalid instant {value}: {source}")]
    InvalidInstant {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
