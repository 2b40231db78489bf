use crate::response::Status;
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;
use thiserror::Error;

/// Caller-input errors of the dedup engine, raised before any comparison work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DedupError {
    #[error("field set must name at least one field")]
    InvalidFieldSet,
    #[error("fuzzy threshold must lie within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("{verdicts} verdicts given for {records} records")]
    LengthMismatch { records: usize, verdicts: usize },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceError {
    pub msg: String,
    pub status: Status,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl error::Error for ServiceError {}

impl ServiceError {
    pub fn bad_request<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            status: Status::BadRequest,
        }
    }

    pub fn internal_server_error<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            status: Status::InternalServerError,
        }
    }
}

impl From<DedupError> for ServiceError {
    fn from(err: DedupError) -> Self {
        ServiceError::bad_request(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_errors_are_bad_requests() {
        let err = ServiceError::from(DedupError::InvalidThreshold(1.5));
        assert!(matches!(err.status, Status::BadRequest));
        assert_eq!(err.msg, "fuzzy threshold must lie within [0, 1], got 1.5");
    }

    #[test]
    fn display_is_json() {
        let err = ServiceError::internal_server_error("boom");
        let value: serde_json::Value = serde_json::from_str(&err.to_string()).unwrap();
        assert_eq!(value["msg"], "boom");
        assert_eq!(value["status"], 500);
    }
}
